use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shellac_core::{
    load_config, validate_config, BatchRunner, FfmpegTranscoder, Transcoder,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("SHELLAC_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("shellac {} starting", VERSION);
    info!(
        "Source: {} -> output: {} (overwrite: {})",
        config.run.source_dir.display(),
        config.run.output_dir.display(),
        config.run.overwrite
    );

    let transcoder = FfmpegTranscoder::new(config.ffmpeg.clone(), config.encoding.clone());

    // Dependency and permission check: fatal before any file is touched.
    tokio::fs::create_dir_all(&config.run.output_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create output folder {}",
                config.run.output_dir.display()
            )
        })?;
    transcoder
        .validate(&config.run.output_dir)
        .await
        .context("Dependency check failed")?;
    info!("ffmpeg/ffprobe available, output folder writable");

    let output_dir = config.run.output_dir.clone();
    let runner = BatchRunner::new(config.run, transcoder);
    let summary = runner.run().await.context("Batch run failed")?;

    // Final tally; per-file failures do not affect the exit status.
    info!("=== conversion finished in {} ms ===", summary.duration_ms);
    info!("Total files:  {}", summary.total);
    info!("Converted:    {}", summary.converted);
    info!("Failed:       {}", summary.failed);
    info!("Skipped:      {}", summary.skipped);
    info!("Output folder: {}", output_dir.display());

    Ok(())
}
