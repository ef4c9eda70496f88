//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval > 0, weights in (0, 1])
//! - Check URLs and socket addresses parse
//! - HTTP catalog entries must name a target
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SynthConfig → Result<(), Vec<ValidationError>>
//! - Scenario names are checked later against the catalog

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::SynthConfig;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("generator.interval_ms must be greater than 0")]
    ZeroInterval,

    #[error("generator.scenarios must not be empty")]
    NoScenarios,

    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("targets.request_timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("catalog entry #{index} has an empty id")]
    EmptyEntryId { index: usize },

    #[error("catalog entry {id} has weight {weight}, expected a value in (0, 1]")]
    WeightOutOfRange { id: String, weight: f64 },

    #[error("catalog entry {id} is an http_call without a target")]
    MissingTarget { id: String },
}

pub fn validate_config(config: &SynthConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.generator.interval_ms == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.generator.scenarios.is_empty() {
        errors.push(ValidationError::NoScenarios);
    }

    if Url::parse(&config.targets.base_url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "targets.base_url",
            value: config.targets.base_url.clone(),
        });
    }
    if config.targets.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.shipper.enabled && Url::parse(&config.shipper.endpoint).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "shipper.endpoint",
            value: config.shipper.endpoint.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.demo.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "demo.bind_address",
            value: config.demo.bind_address.clone(),
        });
    }

    for (index, entry) in config.catalog.iter().enumerate() {
        if entry.id.trim().is_empty() {
            errors.push(ValidationError::EmptyEntryId { index });
        }
        if !(entry.weight > 0.0 && entry.weight <= 1.0) {
            errors.push(ValidationError::WeightOutOfRange {
                id: entry.id.clone(),
                weight: entry.weight,
            });
        }
        if !entry.category.is_log() && entry.target.is_none() {
            errors.push(ValidationError::MissingTarget { id: entry.id.clone() });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
