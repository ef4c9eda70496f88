//! Demo target server for the generator's HTTP scenarios.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use traffic_synth::config::{load_config, SynthConfig};
use traffic_synth::demo::{self, DemoState};
use traffic_synth::lifecycle::{trigger_on_signal, Shutdown};
use traffic_synth::observability::logging;

#[derive(Parser)]
#[command(name = "demo-target")]
#[command(about = "Canned endpoints, synthetic error codes and a tutorial CRUD API", long_about = None)]
struct Cli {
    /// Path to a TOML config file; only [demo] and [observability] are read.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override demo.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SynthConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.demo.bind_address = bind;
    }

    logging::init_logging(&config.observability)?;

    let shutdown = Shutdown::new();
    let stopped = shutdown.wait();
    trigger_on_signal(shutdown);

    let listener = TcpListener::bind(&config.demo.bind_address).await?;
    demo::serve(listener, DemoState::new(&config.demo), stopped).await?;
    Ok(())
}
