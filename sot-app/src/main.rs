//! Spatial orientation test: window driver, CLI and result wiring.

mod app;
mod assets;
mod cli;
mod input;
mod view;

use anyhow::Context;
use app::{App, Sinks};
use cli::Cli;
use sot_experiment::{ExperimentConfig, JsonFileSink, LineHost, StandaloneSink, SurveySink};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    // --verbose enables debug-level output; RUST_LOG wins when set
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => ExperimentConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ExperimentConfig::default(),
    };
    if let Some(mode) = cli.mode {
        config.capture_mode = mode.into();
    }
    info!(?config, "configuration");

    let assets = assets::load(
        cli.catalog.clone(),
        cli.font.clone(),
        config.asset_load_timeout(),
    )
    .context("loading assets")?;

    let app = App::new(config, assets.catalog, assets.font, build_sinks(&cli));
    app.run()
}

fn build_sinks(cli: &Cli) -> Sinks {
    let mut sinks: Sinks = Vec::new();
    if cli.hosted {
        // stdout carries the host protocol, so logs go to stderr
        sinks.push(Box::new(SurveySink::new(LineHost::new(std::io::stdout()))));
    } else {
        sinks.push(Box::new(StandaloneSink));
    }
    if let Some(path) = &cli.results {
        sinks.push(Box::new(JsonFileSink::new(path)));
    }
    sinks
}
