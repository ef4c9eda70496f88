//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SynthConfig (validated, immutable)
//!     → Generator::start
//!
//! On file change (--watch):
//!     watcher.rs sees the file (or a rename onto it) in its directory
//!     → debounce: one reload per burst of events
//!     → loader.rs loads, validation.rs validates
//!     → skipped if equal to the last delivered config
//!     → daemon calls Generator::reload (stop, drain, start)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart of the tick loop
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    DemoConfig, EntryConfig, GeneratorSettings, LogFormat, ObservabilityConfig, ShipperConfig, SynthConfig,
    TargetConfig,
};
