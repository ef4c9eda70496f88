//! Control surface: wire catalog, sinks and resource client into a running scheduler.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::catalog::builtin::register_builtin;
use crate::catalog::{CatalogError, ScenarioCatalog, ScenarioEntry};
use crate::config::{GeneratorSettings, SynthConfig};
use crate::flow::{HttpResourceClient, ResourceClient};
use crate::pipeline::TickPipeline;
use crate::sampler::{SeededRandom, TickPlanner};
use crate::scheduler::{CancellationHandle, ScheduleSettings, TickScheduler};
use crate::sink::{EmissionSink, HttpSink, LogShipperSink, RoutingSink, TracingLogSink};

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("invalid URL {value}: {source}")]
    InvalidUrl { value: String, source: url::ParseError },

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),

    #[error("tick interval must be greater than 0")]
    ZeroInterval,
}

pub struct Generator {
    catalog: Arc<ScenarioCatalog>,
    sink: Arc<dyn EmissionSink>,
    resources: Arc<dyn ResourceClient>,
}

impl Generator {
    pub fn new(
        catalog: Arc<ScenarioCatalog>,
        sink: Arc<dyn EmissionSink>,
        resources: Arc<dyn ResourceClient>,
    ) -> Self {
        Self {
            catalog,
            sink,
            resources,
        }
    }

    /// Build the production wiring: built-in plus configured catalog,
    /// console (and optionally shipped) logs, HTTP sink and resource client.
    pub fn from_config(config: &SynthConfig) -> Result<Self, GeneratorError> {
        let catalog = Arc::new(build_catalog(config)?);
        let timeout = Duration::from_secs(config.targets.request_timeout_secs);
        let base_url = parse_url(&config.targets.base_url)?;

        let mut sink = RoutingSink::new()
            .with_log_sink(Arc::new(TracingLogSink::new()))
            .with_http_sink(Arc::new(HttpSink::new(base_url.clone(), timeout)?));
        if config.shipper.enabled {
            let endpoint = parse_url(&config.shipper.endpoint)?;
            sink = sink.with_log_sink(Arc::new(LogShipperSink::new(endpoint, config.shipper.tag.clone(), timeout)?));
        }

        let resources = Arc::new(HttpResourceClient::new(base_url, timeout)?);

        tracing::info!(
            scenarios = ?catalog.scenario_names(),
            entries = catalog.all_entries().len(),
            base_url = %config.targets.base_url,
            shipper = config.shipper.enabled,
            "Generator initialized"
        );

        Ok(Self::new(catalog, Arc::new(sink), resources))
    }

    /// Start ticking the given scenarios.
    pub fn start(&self, settings: &GeneratorSettings) -> Result<CancellationHandle, GeneratorError> {
        if settings.interval_ms == 0 {
            return Err(GeneratorError::ZeroInterval);
        }

        let planner = TickPlanner::new(
            self.catalog.clone(),
            &settings.scenarios,
            Box::new(SeededRandom::new(settings.seed)),
        )?;
        let pipeline = TickPipeline::new(self.sink.clone(), self.resources.clone());

        Ok(TickScheduler::start(
            planner,
            pipeline,
            ScheduleSettings {
                interval: Duration::from_millis(settings.interval_ms),
                drain_on_cancel: settings.drain_on_cancel,
                drain_timeout: Duration::from_millis(settings.drain_timeout_ms),
            },
        ))
    }

    /// Stop a running generator. Calling it again is a no-op.
    pub fn stop(handle: &CancellationHandle) {
        TickScheduler::stop(handle);
    }

    /// Stop `current`, wait for it to wind down, then build and start a run
    /// from `config`.
    ///
    /// On error nothing is running; the caller decides what to restart.
    pub async fn reload(
        current: &CancellationHandle,
        config: &SynthConfig,
    ) -> Result<(Self, CancellationHandle), GeneratorError> {
        Self::stop(current);
        current.join().await;
        let generator = Self::from_config(config)?;
        let handle = generator.start(&config.generator)?;
        Ok((generator, handle))
    }
}

/// Built-in scenarios followed by the config file's `[[catalog]]` entries.
pub fn build_catalog(config: &SynthConfig) -> Result<ScenarioCatalog, CatalogError> {
    let mut catalog = ScenarioCatalog::new();
    register_builtin(&mut catalog)?;
    for entry in &config.catalog {
        catalog.register(
            &entry.scenario,
            ScenarioEntry {
                id: entry.id.clone(),
                category: entry.category,
                weight: entry.weight,
                payload: entry.payload.clone(),
                target: entry.target.clone(),
            },
        )?;
    }
    Ok(catalog)
}

fn parse_url(value: &str) -> Result<Url, GeneratorError> {
    Url::parse(value).map_err(|source| GeneratorError::InvalidUrl {
        value: value.to_string(),
        source,
    })
}
