//! In-memory tutorial store.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tutorial {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub published: bool,
}

/// Fields accepted on create and update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TutorialInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub published: Option<bool>,
}

#[derive(Debug)]
pub struct TutorialStore {
    tutorials: DashMap<u64, Tutorial>,
    next_id: AtomicU64,
}

impl Default for TutorialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TutorialStore {
    pub fn new() -> Self {
        Self {
            tutorials: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn create(&self, input: TutorialInput) -> Tutorial {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let tutorial = Tutorial {
            id,
            title: input.title.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
            published: input.published.unwrap_or(false),
        };
        self.tutorials.insert(id, tutorial.clone());
        tutorial
    }

    pub fn get(&self, id: u64) -> Option<Tutorial> {
        self.tutorials.get(&id).map(|t| t.value().clone())
    }

    /// All tutorials ordered by id.
    pub fn list(&self) -> Vec<Tutorial> {
        let mut all: Vec<Tutorial> = self.tutorials.iter().map(|t| t.value().clone()).collect();
        all.sort_by_key(|t| t.id);
        all
    }

    /// Apply the provided fields. `None` if the id is unknown.
    pub fn update(&self, id: u64, input: TutorialInput) -> Option<Tutorial> {
        let mut entry = self.tutorials.get_mut(&id)?;
        if let Some(title) = input.title {
            entry.title = title;
        }
        if let Some(description) = input.description {
            entry.description = description;
        }
        if let Some(published) = input.published {
            entry.published = published;
        }
        Some(entry.clone())
    }

    pub fn delete(&self, id: u64) -> Option<Tutorial> {
        self.tutorials.remove(&id).map(|(_, t)| t)
    }

    pub fn is_empty(&self) -> bool {
        self.tutorials.is_empty()
    }
}
