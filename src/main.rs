//! Scribeboard - handwriting-recognition whiteboard
//!
//! Draw strokes with the pointer; each completed stroke is rasterized,
//! sent to a remote recognition endpoint, and replaced with the recognized
//! text at the drawn location.

mod app;
mod canvas;
mod config;
mod overlay;
mod recognition;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::AppConfig;
use crate::recognition::{RecognitionClient, RecognitionWorker};

/// Scribeboard - a whiteboard that turns handwritten strokes into text
#[derive(Parser, Debug)]
#[command(name = "scribeboard")]
#[command(about = "A whiteboard that turns handwritten strokes into text overlays")]
struct Args {
    /// Path to a configuration file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recognition API key (overrides the environment and config file)
    #[arg(long)]
    api_key: Option<String>,

    /// Recognition model name override
    #[arg(long)]
    model: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Scribeboard starting...");

    let mut config = load_or_create_config(args.config.as_deref());
    if let Some(model) = args.model {
        config.recognition.model = model;
    }

    let api_key = config
        .recognition
        .resolve_api_key(args.api_key.as_deref())
        .context(
            "No recognition API key configured. Pass --api-key, export GEMINI_API_KEY, \
             or set recognition.api_key in the config file",
        )?;

    let client = RecognitionClient::new(&config.recognition, api_key)?;
    let worker = RecognitionWorker::spawn(client)?;

    app::run_whiteboard(config, worker).map_err(|e| anyhow::anyhow!("window error: {e}"))?;

    info!("Scribeboard shutdown complete");

    Ok(())
}

/// Load configuration from file, writing defaults on first run
fn load_or_create_config(override_path: Option<&Path>) -> AppConfig {
    let path = match override_path {
        Some(path) => path.to_path_buf(),
        None => match config::default_config_path() {
            Ok(path) => path,
            Err(err) => {
                warn!("Could not determine config path: {err}; using defaults");
                return AppConfig::default();
            }
        },
    };

    if path.exists() {
        match config::load_config(&path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                return config;
            }
            Err(err) => {
                warn!("Failed to load {:?}: {err}; using defaults", path);
                return AppConfig::default();
            }
        }
    }

    let config = AppConfig::default();
    match config::save_config(&config, &path) {
        Ok(()) => info!("Wrote default configuration to {:?}", path),
        Err(err) => warn!("Failed to write default configuration to {:?}: {err}", path),
    }
    config
}
