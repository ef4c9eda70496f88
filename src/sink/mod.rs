//! Emission sinks.
//!
//! # Data Flow
//! ```text
//! TickPipeline (one call per fired entry, concurrently)
//!     → routing.rs
//!         - log categories → log.rs (console via tracing)
//!                          → shipper.rs (remote collector, optional)
//!         - http_call      → http.rs (reqwest against target base URL)
//!     → SinkResult per entry
//! ```
//!
//! # Design Decisions
//! - The core only sees the `EmissionSink` trait; transports are adapters
//! - A failed emission is returned, never raised past the pipeline
//! - Calls share no mutable state, so entries in a tick are isolated

pub mod http;
pub mod log;
pub mod routing;
pub mod shipper;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::ScenarioEntry;
use crate::sampler::TickContext;

pub use http::HttpSink;
pub use log::TracingLogSink;
pub use routing::RoutingSink;
pub use shipper::LogShipperSink;

/// Successful emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delivery {
    /// HTTP status for network sinks.
    pub status: Option<u16>,
}

impl Delivery {
    pub fn logged() -> Self {
        Self { status: None }
    }

    pub fn with_status(status: u16) -> Self {
        Self {
            status: Some(status),
        }
    }
}

/// Reason an emission attempt failed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SinkError {
    #[error("entry {0} has no target")]
    MissingTarget(String),

    #[error("invalid target {target}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("no sink accepts category {0}")]
    Unroutable(String),

    #[error("log shipper rejected record: {0}")]
    Shipper(String),

    /// Raised by test and custom sinks.
    #[error("{0}")]
    Other(String),
}

/// Outcome of a single emission attempt.
pub type SinkResult = Result<Delivery, SinkError>;

/// Capability to write one resolved entry somewhere.
#[async_trait]
pub trait EmissionSink: Send + Sync {
    async fn emit(&self, entry: &ScenarioEntry, ctx: &TickContext) -> SinkResult;
}
