// Apply the configured style to image files on disk

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use ghibli_studio::{config::Config, service::TransformService, StyleRegistry};

#[derive(Parser)]
#[command(
    name = "ghibli-apply",
    version,
    about = "Apply the Ghibli style to image files"
)]
struct Cli {
    /// Input images (PNG or JPEG)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for the styled JPEG files
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn output_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    output_dir.join(format!("{}_ghibli.jpg", stem))
}

fn process(service: &TransformService, input: &Path, output_dir: &Path) -> Result<PathBuf> {
    let bytes = std::fs::read(input).with_context(|| format!("reading {:?}", input))?;
    let jpeg = service
        .transform_bytes(&bytes)
        .with_context(|| format!("transforming {:?}", input))?;

    let output = output_path(output_dir, input);
    std::fs::write(&output, jpeg).with_context(|| format!("writing {:?}", output))?;
    Ok(output)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.validate()?;

    let service = TransformService::from_config(&config, &StyleRegistry::new())?;
    std::fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("creating {:?}", cli.output_dir))?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.batch.threads)
        .build()?;

    info!(
        "Applying {} style to {} file(s) on {} thread(s)",
        service.style_name(),
        cli.inputs.len(),
        config.batch.threads
    );

    let failures = AtomicUsize::new(0);
    pool.install(|| {
        cli.inputs.par_iter().for_each(|input| {
            match process(&service, input, &cli.output_dir) {
                Ok(output) => info!("{:?} -> {:?}", input, output),
                Err(e) => {
                    error!("{:#}", e);
                    failures.fetch_add(1, Ordering::Relaxed);
                }
            }
        });
    });

    let failures = failures.into_inner();
    if failures > 0 {
        anyhow::bail!("{} of {} file(s) failed", failures, cli.inputs.len());
    }

    info!("Done");
    Ok(())
}
