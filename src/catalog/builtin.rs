//! Built-in demo scenarios.
//!
//! Mirrors the traffic the demo target server expects: a log burst
//! generator, a `/movies` poller, synthetic error endpoints and a
//! tutorial CRUD lifecycle.

use serde_json::json;

use crate::catalog::entry::{Category, FlowDefinition, Payload, ScenarioEntry, Target};
use crate::catalog::registry::{CatalogError, ScenarioCatalog};

pub const LOG_VOLUME: &str = "log-volume";
pub const MOVIES_POLL: &str = "movies-poll";
pub const HTTP_ERRORS: &str = "http-errors";
pub const CRUD_FLOW: &str = "crud-flow";

/// Register every built-in scenario into `catalog`.
pub fn register_builtin(catalog: &mut ScenarioCatalog) -> Result<(), CatalogError> {
    catalog.register(LOG_VOLUME, ScenarioEntry::log("log.info", Category::Info, 0.9, "Info Log Sample"))?;
    catalog.register(LOG_VOLUME, ScenarioEntry::log("log.warning", Category::Warning, 0.7, "Warning log sample"))?;
    catalog.register(LOG_VOLUME, ScenarioEntry::log("log.error", Category::Error, 0.5, "Error log sample"))?;
    catalog.register(LOG_VOLUME, ScenarioEntry::log("log.debug", Category::Debug, 0.3, "Debug log sample"))?;
    catalog.register(
        LOG_VOLUME,
        ScenarioEntry::log("log.record", Category::Info, 1.0, "")
            .with_payload(Payload::Structured(json!({ "record": "this is a log" }))),
    )?;

    catalog.register(MOVIES_POLL, ScenarioEntry::http("http.movies", 1.0, Target::get("/movies")))?;

    catalog.register(HTTP_ERRORS, ScenarioEntry::http("http.tutorials", 1.0, Target::get("/api/tutorials")))?;
    catalog.register(HTTP_ERRORS, ScenarioEntry::http("http.error", 0.5, Target::get("/error")))?;
    catalog.register(HTTP_ERRORS, ScenarioEntry::http("http.error-500", 0.5, Target::get("/500-error")))?;
    catalog.register(HTTP_ERRORS, ScenarioEntry::http("http.error-504", 0.3, Target::get("/504-error")))?;

    catalog.register_flow(
        CRUD_FLOW,
        FlowDefinition {
            id: "flow.tutorial".into(),
            weight: 1.0,
            collection: "/api/tutorials".into(),
            create_payload: json!({ "title": "git3", "description": "test description3" }),
            update_payload: json!({ "title": "git4", "description": "test description4" }),
        },
    )?;

    Ok(())
}

/// A fresh catalog holding only the built-in scenarios.
pub fn builtin_catalog() -> Result<ScenarioCatalog, CatalogError> {
    let mut catalog = ScenarioCatalog::new();
    register_builtin(&mut catalog)?;
    Ok(catalog)
}
