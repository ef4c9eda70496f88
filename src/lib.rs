//! Synthetic traffic and log generator library.
//!
//! Emits weighted-random log records, HTTP calls and correlated
//! create→update→delete flows on a fixed cadence, for exercising
//! APM agents and log pipelines.

pub mod catalog;
pub mod config;
pub mod demo;
pub mod flow;
pub mod generator;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod sampler;
pub mod scheduler;
pub mod sink;

pub use config::SynthConfig;
pub use generator::{Generator, GeneratorError};
pub use lifecycle::Shutdown;
pub use scheduler::CancellationHandle;
