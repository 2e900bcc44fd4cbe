use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use ghibli_studio::{config::Config, server::Server, service::TransformService, StyleRegistry};

#[derive(Parser)]
#[command(
    name = "ghibli-studio",
    version,
    about = "Serve a soft, bright color-grading filter over HTTP",
    long_about = "Ghibli Studio accepts base64-encoded images on POST /api/transform, brightens them in Lab space, softens them with a small Gaussian blur and returns the result as base64 JPEG."
)]
struct Cli {
    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind, overrides the configuration file
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides the configuration file
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    info!("Starting Ghibli Studio v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    let registry = StyleRegistry::new();
    let service = TransformService::from_config(&config, &registry)?;
    info!("Using {} style", service.style_name());

    let server = Server::bind(&config.server, service).await?;
    server.run().await?;

    info!("Server stopped");
    Ok(())
}
