//! Resource API capability and its HTTP implementation.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::catalog::FlowDefinition;
use crate::sampler::TickContext;
use crate::sink::http::{CORRELATION_HEADER, TICK_HEADER};

/// Identifier returned by the create step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(pub String);

impl ResourceId {
    /// Extract `id` from a create response body.
    ///
    /// Accepts `{"id": 42}` and `{"id": "42"}`. A string id must be usable as
    /// one path segment; anything else is malformed.
    pub fn from_response(body: &serde_json::Value) -> Result<Self, FlowStepError> {
        match body.get("id") {
            Some(serde_json::Value::Number(n)) => Ok(Self(n.to_string())),
            Some(serde_json::Value::String(s)) if is_path_segment(s) => Ok(Self(s.clone())),
            Some(serde_json::Value::String(s)) => Err(FlowStepError::MalformedIdentifier(format!(
                "id {:?} is not a single path segment",
                s
            ))),
            Some(other) => Err(FlowStepError::MalformedIdentifier(format!("unexpected id value {}", other))),
            None => Err(FlowStepError::MalformedIdentifier(format!("no id field in {}", body))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_path_segment(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '?' | '#') || c.is_control())
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    Create,
    Update,
    Delete,
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlowStep::Create => "create",
            FlowStep::Update => "update",
            FlowStep::Delete => "delete",
        })
    }
}

/// Failure of a single flow step.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FlowStepError {
    #[error("{step} request failed: {reason}")]
    Request { step: FlowStep, reason: String },

    #[error("{step} returned status {status}")]
    Status { step: FlowStep, status: u16 },

    #[error("create response malformed: {0}")]
    MalformedIdentifier(String),
}

impl FlowStepError {
    pub fn step(&self) -> FlowStep {
        match self {
            FlowStepError::Request { step, .. } | FlowStepError::Status { step, .. } => *step,
            FlowStepError::MalformedIdentifier(_) => FlowStep::Create,
        }
    }
}

/// The external resource API a flow drives.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn create(&self, flow: &FlowDefinition, ctx: &TickContext) -> Result<ResourceId, FlowStepError>;

    async fn update(&self, flow: &FlowDefinition, id: &ResourceId, ctx: &TickContext) -> Result<(), FlowStepError>;

    async fn delete(&self, flow: &FlowDefinition, id: &ResourceId, ctx: &TickContext) -> Result<(), FlowStepError>;
}

/// JSON-over-HTTP collection API: `POST {collection}`, `PUT/DELETE {collection}/{id}`.
#[derive(Debug, Clone)]
pub struct HttpResourceClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpResourceClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn url(&self, step: FlowStep, path: &str) -> Result<Url, FlowStepError> {
        self.base_url.join(path).map_err(|e| FlowStepError::Request {
            step,
            reason: format!("invalid path {}: {}", path, e),
        })
    }

    /// `{collection}/{id}` with the id percent-encoded as a single segment.
    fn item_url(&self, step: FlowStep, flow: &FlowDefinition, id: &ResourceId) -> Result<Url, FlowStepError> {
        let mut url = self.url(step, &flow.collection)?;
        url.path_segments_mut()
            .map_err(|_| FlowStepError::Request {
                step,
                reason: format!("{} cannot address items", self.base_url),
            })?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }

    async fn send(
        &self,
        step: FlowStep,
        request: reqwest::RequestBuilder,
        ctx: &TickContext,
    ) -> Result<reqwest::Response, FlowStepError> {
        let response = request
            .header(CORRELATION_HEADER, ctx.correlation_id.to_string())
            .header(TICK_HEADER, ctx.sequence.to_string())
            .send()
            .await
            .map_err(|e| FlowStepError::Request {
                step,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FlowStepError::Status {
                step,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn create(&self, flow: &FlowDefinition, ctx: &TickContext) -> Result<ResourceId, FlowStepError> {
        let url = self.url(FlowStep::Create, &flow.collection)?;
        let response = self
            .send(FlowStep::Create, self.client.post(url).json(&flow.create_payload), ctx)
            .await?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| FlowStepError::MalformedIdentifier(e.to_string()))?;
        ResourceId::from_response(&body)
    }

    async fn update(&self, flow: &FlowDefinition, id: &ResourceId, ctx: &TickContext) -> Result<(), FlowStepError> {
        let url = self.item_url(FlowStep::Update, flow, id)?;
        self.send(FlowStep::Update, self.client.put(url).json(&flow.update_payload), ctx)
            .await?;
        Ok(())
    }

    async fn delete(&self, flow: &FlowDefinition, id: &ResourceId, ctx: &TickContext) -> Result<(), FlowStepError> {
        let url = self.item_url(FlowStep::Delete, flow, id)?;
        self.send(FlowStep::Delete, self.client.delete(url), ctx).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_from_number_and_string() {
        assert_eq!(ResourceId::from_response(&json!({ "id": 42 })).unwrap().as_str(), "42");
        assert_eq!(ResourceId::from_response(&json!({ "id": "abc" })).unwrap().as_str(), "abc");
    }

    #[test]
    fn test_id_malformed() {
        for body in [json!({}), json!([1, 2]), json!({ "id": null }), json!({ "id": "" }), json!("42")] {
            assert!(matches!(
                ResourceId::from_response(&body),
                Err(FlowStepError::MalformedIdentifier(_))
            ));
        }
    }

    #[test]
    fn test_id_must_be_one_path_segment() {
        for id in ["7/../../../admin", "..", ".", "a?b", "a#b", "a\\b", "a\nb"] {
            assert!(
                matches!(
                    ResourceId::from_response(&json!({ "id": id })),
                    Err(FlowStepError::MalformedIdentifier(_))
                ),
                "{:?} accepted",
                id
            );
        }
        assert!(ResourceId::from_response(&json!({ "id": "a-b_c.d~1" })).is_ok());
    }

    fn client() -> HttpResourceClient {
        HttpResourceClient::new(Url::parse("http://localhost:3002").unwrap(), Duration::from_secs(1)).unwrap()
    }

    fn flow(collection: &str) -> FlowDefinition {
        FlowDefinition {
            id: "f".into(),
            weight: 1.0,
            collection: collection.into(),
            create_payload: json!({}),
            update_payload: json!({}),
        }
    }

    #[test]
    fn test_item_url() {
        let url = client()
            .item_url(FlowStep::Update, &flow("/api/tutorials/"), &ResourceId::from("7"))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:3002/api/tutorials/7");

        let url = client()
            .item_url(FlowStep::Delete, &flow("/api/tutorials"), &ResourceId::from("7"))
            .unwrap();
        assert_eq!(url.path(), "/api/tutorials/7");
    }

    #[test]
    fn test_item_url_encodes_separators() {
        let url = client()
            .item_url(FlowStep::Update, &flow("/api/tutorials"), &ResourceId::from("a/b?c"))
            .unwrap();
        assert_eq!(url.path(), "/api/tutorials/a%2Fb%3Fc");
        assert_eq!(url.query(), None);
    }
}
