//! Category-based sink routing.

use async_trait::async_trait;
use std::sync::Arc;

use crate::catalog::ScenarioEntry;
use crate::sampler::TickContext;
use crate::sink::{Delivery, EmissionSink, SinkError, SinkResult};

/// Sends log categories to every log sink and HTTP calls to the HTTP sink.
#[derive(Clone, Default)]
pub struct RoutingSink {
    log_sinks: Vec<Arc<dyn EmissionSink>>,
    http_sink: Option<Arc<dyn EmissionSink>>,
}

impl RoutingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_sink(mut self, sink: Arc<dyn EmissionSink>) -> Self {
        self.log_sinks.push(sink);
        self
    }

    pub fn with_http_sink(mut self, sink: Arc<dyn EmissionSink>) -> Self {
        self.http_sink = Some(sink);
        self
    }
}

#[async_trait]
impl EmissionSink for RoutingSink {
    async fn emit(&self, entry: &ScenarioEntry, ctx: &TickContext) -> SinkResult {
        if !entry.category.is_log() {
            return match &self.http_sink {
                Some(sink) => sink.emit(entry, ctx).await,
                None => Err(SinkError::Unroutable(entry.category.to_string())),
            };
        }

        if self.log_sinks.is_empty() {
            return Err(SinkError::Unroutable(entry.category.to_string()));
        }

        // Every log sink is attempted; the first failure is reported.
        let mut outcome: SinkResult = Ok(Delivery::logged());
        for sink in &self.log_sinks {
            if let Err(e) = sink.emit(entry, ctx).await {
                if outcome.is_ok() {
                    outcome = Err(e);
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Target};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    struct Counting {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl EmissionSink for Counting {
        async fn emit(&self, _entry: &ScenarioEntry, _ctx: &TickContext) -> SinkResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(SinkError::Other("down".into()))
            } else {
                Ok(Delivery::logged())
            }
        }
    }

    fn counting(fail: bool) -> Arc<Counting> {
        Arc::new(Counting {
            calls: AtomicUsize::new(0),
            fail,
        })
    }

    #[tokio::test]
    async fn test_routes_by_category() {
        let logs = counting(false);
        let http = counting(false);
        let sink = RoutingSink::new()
            .with_log_sink(logs.clone())
            .with_http_sink(http.clone());
        let ctx = TickContext::new(0, Instant::now());

        sink.emit(&ScenarioEntry::log("a", Category::Error, 1.0, ""), &ctx).await.unwrap();
        sink.emit(&ScenarioEntry::http("b", 1.0, Target::get("/")), &ctx).await.unwrap();

        assert_eq!(logs.calls.load(Ordering::SeqCst), 1);
        assert_eq!(http.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failing_log_sink_does_not_skip_others() {
        let broken = counting(true);
        let healthy = counting(false);
        let sink = RoutingSink::new()
            .with_log_sink(broken.clone())
            .with_log_sink(healthy.clone());
        let ctx = TickContext::new(0, Instant::now());

        let result = sink.emit(&ScenarioEntry::log("a", Category::Info, 1.0, ""), &ctx).await;
        assert!(result.is_err());
        assert_eq!(healthy.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_http_without_sink_is_unroutable() {
        let sink = RoutingSink::new();
        let ctx = TickContext::new(0, Instant::now());
        let result = sink.emit(&ScenarioEntry::http("b", 1.0, Target::get("/")), &ctx).await;
        assert_eq!(result, Err(SinkError::Unroutable("http_call".into())));
    }
}
