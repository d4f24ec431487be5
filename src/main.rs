//! heartbeat-monitor - keeps configured components registered and alive
//!
//! Loads configuration, registers every configured component with the
//! registry and heartbeats on their behalf until interrupted.

#![allow(missing_docs)]

use anyhow::Context;
use clap::Parser;
use futures::future::join_all;
use heartbeat_rs::{Config, HeartbeatMonitor, HttpRegistrar, init_logging};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(
    name = "heartbeat-monitor",
    version,
    long_version = heartbeat_rs::LONG_VERSION,
    about
)]
struct Args {
    /// YAML configuration file; `HEARTBEAT_*` variables are used when absent
    #[arg(short, long, env = "HEARTBEAT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the registry base URL
    #[arg(long, env = "HEARTBEAT_REGISTRY_URL")]
    registry_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::from_env().context("reading HEARTBEAT_* environment")?,
    };
    if let Some(url) = args.registry_url {
        config.registry.base_url = url;
        config.validate()?;
    }

    init_logging(&config.logging)?;
    info!(
        "Starting heartbeat monitor {} against {}",
        heartbeat_rs::build_info(),
        config.registry.base_url
    );

    let registrar = Arc::new(HttpRegistrar::new(
        config.registry.base_url.clone(),
        Duration::from_secs(config.registry.request_timeout_secs),
    )?);
    let monitor = HeartbeatMonitor::new(&config)?;

    for component in &config.components {
        let registration = component.to_registration(registrar.clone());
        match registration.register().await {
            Ok(true) => info!("Registered {}", component.id),
            Ok(false) => warn!(
                "Registry refused {}, heartbeats will retry the handshake",
                component.id
            ),
            Err(e) => warn!("Initial registration of {} failed: {}", component.id, e),
        }
        monitor.register_component(registration).await;
    }

    if config.components.is_empty() {
        warn!("No components configured; only the registry prober will run");
    }

    monitor.start().await;
    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    info!("Shutting down");
    monitor.stop().await;
    let results = join_all(
        config
            .components
            .iter()
            .map(|component| registrar.deregister(&component.id)),
    )
    .await;
    for (component, result) in config.components.iter().zip(results) {
        if let Err(e) = result {
            error!("Failed to unregister {}: {}", component.id, e);
        }
        monitor.unregister_component(&component.id).await;
    }

    Ok(())
}
