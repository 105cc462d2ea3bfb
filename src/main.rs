//! artifact-cache server - pull-through HTTP cache for build artifacts.

use artifact_cache::{ArtifactService, Config};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "artifact-cache")]
#[command(about = "Pull-through cache for build artifacts")]
struct Args {
    /// JSON config file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind to, overrides server.bind_address
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Directory for downloaded artifacts, overrides storage.download_dir
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// Enable debug logging (ignored when RUST_LOG is set)
    #[arg(short, long)]
    debug: bool,
}

fn load_config(args: &Args) -> artifact_cache::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    if let Some(dir) = &args.download_dir {
        config.storage.download_dir = dir.clone();
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Set up logging
    let default_level = if args.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let config = match load_config(&args) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(
        download_dir = %config.storage.download_dir.display(),
        timeout_secs = config.fetch.timeout.as_secs(),
        "Starting artifact cache"
    );

    let service = match ArtifactService::from_config(&config) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            error!(error = %e, "failed to build artifact service");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = artifact_cache::api::start_api_server(service, config).await {
        error!(error = %e, "artifact server failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
