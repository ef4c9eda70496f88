//! Catalog entry types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity or kind of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Info,
    Warning,
    Error,
    Debug,
    HttpCall,
}

impl Category {
    /// Whether this entry is written as a log record (as opposed to a network call).
    pub fn is_log(&self) -> bool {
        !matches!(self, Category::HttpCall)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Info => "info",
            Category::Warning => "warning",
            Category::Error => "error",
            Category::Debug => "debug",
            Category::HttpCall => "http_call",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of an emission: a plain message or a structured record.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    Structured(serde_json::Value),
}

impl Payload {
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Text(text) => text.is_empty(),
            Payload::Structured(value) => value.is_null(),
        }
    }
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Text(String::new())
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Text(text) => f.write_str(text),
            Payload::Structured(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_reqwest(&self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// URL-like descriptor of where an HTTP entry is sent.
///
/// `path` may be relative (resolved against the configured base URL)
/// or an absolute `http(s)://` URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Target {
    #[serde(default)]
    pub method: HttpMethod,
    pub path: String,
}

impl Target {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
        }
    }
}

/// One emittable event. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScenarioEntry {
    pub id: String,
    pub category: Category,
    /// Fire when a fresh draw in [0,1) is below this value.
    pub weight: f64,
    #[serde(default)]
    pub payload: Payload,
    #[serde(default)]
    pub target: Option<Target>,
}

impl ScenarioEntry {
    /// Create a log entry with a text message.
    pub fn log(id: impl Into<String>, category: Category, weight: f64, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category,
            weight,
            payload: Payload::Text(message.into()),
            target: None,
        }
    }

    /// Create an HTTP call entry without a body.
    pub fn http(id: impl Into<String>, weight: f64, target: Target) -> Self {
        Self {
            id: id.into(),
            category: Category::HttpCall,
            weight,
            payload: Payload::default(),
            target: Some(target),
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }
}

/// A create→update→delete lifecycle against a resource collection.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FlowDefinition {
    pub id: String,
    pub weight: f64,
    /// Collection path, e.g. `/api/tutorials`. Items live at `{collection}/{id}`.
    pub collection: String,
    pub create_payload: serde_json::Value,
    pub update_payload: serde_json::Value,
}

/// Anything the sampler can run an independent Bernoulli trial on.
pub trait Weighted {
    fn id(&self) -> &str;
    fn weight(&self) -> f64;
}

impl Weighted for ScenarioEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn weight(&self) -> f64 {
        self.weight
    }
}

impl Weighted for FlowDefinition {
    fn id(&self) -> &str {
        &self.id
    }

    fn weight(&self) -> f64 {
        self.weight
    }
}
