//! Independent per-entry Bernoulli selection.

use std::sync::Arc;

use crate::catalog::Weighted;
use crate::sampler::random::RandomSource;

/// One random draw and its outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub id: String,
    pub value: f64,
    pub fired: bool,
}

/// Selects which entries fire on a tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedSampler;

impl WeightedSampler {
    pub fn new() -> Self {
        Self
    }

    /// Draw once per item and keep those whose draw is below their weight.
    ///
    /// Exactly `items.len()` values are consumed from `random`, in order,
    /// whether or not an item fires. The result preserves input order.
    pub fn sample<T: Weighted>(&self, items: &[Arc<T>], random: &mut dyn RandomSource) -> Vec<Arc<T>> {
        items
            .iter()
            .filter(|item| random.next() < item.weight())
            .cloned()
            .collect()
    }

    /// Like [`sample`](Self::sample), also appending every draw to `draws`.
    pub fn sample_recorded<T: Weighted>(
        &self,
        items: &[Arc<T>],
        random: &mut dyn RandomSource,
        draws: &mut Vec<Draw>,
    ) -> Vec<Arc<T>> {
        let mut fired = Vec::new();
        for item in items {
            let value = random.next();
            let hit = value < item.weight();
            draws.push(Draw {
                id: item.id().to_string(),
                value,
                fired: hit,
            });
            if hit {
                fired.push(item.clone());
            }
        }
        fired
    }
}
