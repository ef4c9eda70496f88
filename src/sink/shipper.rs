//! Remote log shipper sink.
//!
//! Posts one JSON record per emission to a collector endpoint
//! (fluentd HTTP input, vector, an OTLP-logs bridge, ...).

use async_trait::async_trait;
use serde::Serialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use url::Url;
use uuid::Uuid;

use crate::catalog::{Payload, ScenarioEntry};
use crate::sampler::TickContext;
use crate::sink::{Delivery, EmissionSink, SinkError, SinkResult};

/// Wire record sent to the collector.
#[derive(Debug, Serialize)]
pub struct ShippedRecord<'a> {
    pub tag: &'a str,
    pub level: &'static str,
    pub entry: &'a str,
    pub message: serde_json::Value,
    pub tick: u64,
    pub correlation_id: Uuid,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone)]
pub struct LogShipperSink {
    client: reqwest::Client,
    endpoint: Url,
    tag: String,
}

impl LogShipperSink {
    pub fn new(endpoint: Url, tag: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            tag: tag.into(),
        })
    }

    fn record<'a>(&'a self, entry: &'a ScenarioEntry, ctx: &TickContext) -> ShippedRecord<'a> {
        let message = match &entry.payload {
            Payload::Structured(value) => value.clone(),
            Payload::Text(text) => serde_json::Value::String(text.clone()),
        };
        ShippedRecord {
            tag: &self.tag,
            level: entry.category.as_str(),
            entry: &entry.id,
            message,
            tick: ctx.sequence,
            correlation_id: ctx.correlation_id,
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64,
        }
    }
}

#[async_trait]
impl EmissionSink for LogShipperSink {
    async fn emit(&self, entry: &ScenarioEntry, ctx: &TickContext) -> SinkResult {
        let record = self.record(entry, ctx);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&record)
            .send()
            .await
            .map_err(|e| SinkError::Shipper(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Shipper(format!("collector returned {}", status)));
        }
        Ok(Delivery::with_status(status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use std::time::Instant;

    #[test]
    fn test_record_shape() {
        let sink = LogShipperSink::new(
            Url::parse("http://localhost:8006/logs").unwrap(),
            "demo",
            Duration::from_secs(1),
        )
        .unwrap();
        let entry = ScenarioEntry::log("log.record", Category::Info, 1.0, "")
            .with_payload(Payload::Structured(serde_json::json!({ "record": "r" })));
        let ctx = TickContext::new(3, Instant::now());

        let json = serde_json::to_value(sink.record(&entry, &ctx)).unwrap();
        assert_eq!(json["tag"], "demo");
        assert_eq!(json["level"], "info");
        assert_eq!(json["tick"], 3);
        assert_eq!(json["message"]["record"], "r");
        assert_eq!(json["correlation_id"], ctx.correlation_id.to_string());
    }
}
