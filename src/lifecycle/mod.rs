//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → shutdown_signal() resolves
//!     → trigger_on_signal() calls Shutdown::trigger()
//!
//! Shutdown (shutdown.rs):
//!     trigger() → every wait() future resolves
//!     → traffic-synth: main loop stops the generator, which drains
//!       (bounded by drain_timeout_ms) or abandons in-flight ticks
//!     → demo-target: axum graceful shutdown finishes open requests
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: stop scheduling, drain, exit
//! - One broadcast channel fans the signal out to all long-running tasks

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::{shutdown_signal, trigger_on_signal};
