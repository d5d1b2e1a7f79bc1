//! Reactor property exporter.
//!
//! Downloads a property with its environments, data elements, extensions,
//! rules and rule components into a browsable directory tree.
//!
//! Usage:
//!   reactor-export --property-id PR123 --output ./export
//!
//! Credentials are read from flags, `REACTOR_*` environment variables or the
//! settings file (`./.reactor-settings.json` by default).

use anyhow::{Context, Result};
use clap::Parser;
use reactor_export::PropertyExporter;
use reactor_export_cli::{Args, RunConfig, SettingsFile};
use reactor_source::ReactorClient;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let settings = SettingsFile::load(&args.settings_path)?;
    let config = RunConfig::resolve(&args, &settings)?;
    info!("Using Reactor API at {}", config.reactor.base_url);

    let client = ReactorClient::new(config.reactor).context("failed to create Reactor client")?;
    let exporter = PropertyExporter::new(&client, config.options);
    let summary = exporter
        .export(&config.property_id)
        .await
        .with_context(|| format!("failed to export property {}", config.property_id))?;

    println!("{summary}");
    if !summary.is_complete() {
        warn!(
            "{} entities were exported incompletely, see the warnings above",
            summary.partial()
        );
    }
    Ok(())
}
