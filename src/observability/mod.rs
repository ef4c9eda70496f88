//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Generator internals produce:
//!     → logging.rs (structured tracing events, pretty or JSON)
//!     → metrics.rs (tick, emission and flow counters)
//!
//! Synthetic records are a separate stream: they go through the sinks,
//! under the `synthetic` tracing target for the console sink.
//! ```
//!
//! # Design Decisions
//! - One subscriber, initialised once by the binary
//! - RUST_LOG overrides the configured level
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
