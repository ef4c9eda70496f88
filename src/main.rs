//! traffic-synth daemon.
//!
//! ```text
//!   config.toml ──▶ Generator ──▶ TickScheduler ──┬──▶ console / shipped logs
//!        ▲                                        ├──▶ HTTP calls
//!        │ --watch                                └──▶ create→update→delete flows
//!   ConfigWatcher (restart on change)
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use traffic_synth::config::watcher::ConfigWatcher;
use traffic_synth::config::{load_config, SynthConfig};
use traffic_synth::lifecycle::{trigger_on_signal, Shutdown};
use traffic_synth::observability::{logging, metrics};
use traffic_synth::Generator;

#[derive(Parser, Debug)]
#[command(name = "traffic-synth")]
#[command(about = "Synthetic traffic and log generator for APM pipelines", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override generator.interval_ms.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Override generator.seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override generator.scenarios (repeatable).
    #[arg(short, long = "scenario")]
    scenarios: Vec<String>,

    /// Restart the generator when the config file changes.
    #[arg(long, requires = "config")]
    watch: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut SynthConfig) {
        if let Some(interval_ms) = self.interval_ms {
            config.generator.interval_ms = interval_ms;
        }
        if let Some(seed) = self.seed {
            config.generator.seed = Some(seed);
        }
        if !self.scenarios.is_empty() {
            config.generator.scenarios = self.scenarios.clone();
        }
    }

    fn load(&self) -> Result<SynthConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SynthConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match cli.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("traffic-synth: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_logging(&config.observability) {
        eprintln!("traffic-synth: failed to initialise logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, mut config: SynthConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("traffic-synth v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let mut generator = Generator::from_config(&config)?;
    let mut handle = generator.start(&config.generator)?;

    // Keep the watcher alive for the lifetime of the loop.
    let (_watcher, mut updates) = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), Some(updates))
        }
        _ => (None, None),
    };

    let shutdown = Shutdown::new();
    let stopped = shutdown.wait();
    tokio::pin!(stopped);
    trigger_on_signal(shutdown);

    loop {
        tokio::select! {
            _ = &mut stopped => break,
            Some(mut new_config) = next_update(&mut updates) => {
                cli.apply_overrides(&mut new_config);
                match Generator::reload(&handle, &new_config).await {
                    Ok((new_generator, new_handle)) => {
                        generator = new_generator;
                        handle = new_handle;
                        config = new_config;
                        tracing::info!("Generator restarted with reloaded configuration");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Reloaded configuration rejected, restarting previous one");
                        handle = generator.start(&config.generator)?;
                    }
                }
            }
        }
    }

    Generator::stop(&handle);
    if let Some(summary) = handle.join().await {
        tracing::info!(
            ticks_started = summary.ticks_started,
            drained = summary.drained,
            "Shutdown complete"
        );
    }
    Ok(())
}

async fn next_update(
    updates: &mut Option<tokio::sync::mpsc::UnboundedReceiver<SynthConfig>>,
) -> Option<SynthConfig> {
    match updates {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
