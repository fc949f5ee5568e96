//! ScanPass - fingerprint-gated text scanner
//!
//! Capture or pick an image, read its text with OCR and show it, after the
//! user passed a fingerprint prompt. OCR, image acquisition and the sensor are
//! external tools; this program sequences them and renders the result.

mod biometric;
mod capture;
mod config;
mod i18n;
mod screen;
mod storage;
mod vision;
mod workflow;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::biometric::{BiometricGate, FprintdGate, SupportOptions};
use crate::capture::CommandImageSource;
use crate::config::AppConfig;
use crate::i18n::Locale;
use crate::vision::TesseractRecognizer;
use crate::workflow::{WorkflowController, WorkflowSettings};

/// ScanPass - fingerprint-gated OCR scanner
#[derive(Parser, Debug)]
#[command(name = "scanpass")]
#[command(about = "Capture or pick an image and recognize its text, behind a fingerprint prompt")]
struct Args {
    /// Configuration file (defaults to the per-user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// UI language, overrides the configuration
    #[arg(short, long, value_enum)]
    locale: Option<Locale>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Report detected biometric support and OCR engine, then exit
    #[arg(long)]
    check: bool,

    /// Write the default configuration to the config path and exit
    #[arg(long)]
    write_default_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => storage::default_config_path()?,
    };

    if args.write_default_config {
        config::save_config(&AppConfig::default(), &config_path)?;
        println!("Wrote default configuration to {}", config_path.display());
        return Ok(());
    }

    let mut config = load_or_default_config(&config_path);
    if let Some(locale) = args.locale {
        config.general.locale = locale;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .thread_name("scanpass-workflow")
        .build()
        .context("Failed to create tokio runtime")?;

    if args.check {
        return runtime.block_on(run_check(&config));
    }

    info!("ScanPass starting...");

    let cache_dir = storage::get_cache_dir()?;
    let source = CommandImageSource::from_settings(&config.capture, cache_dir);
    if let Err(e) = runtime.block_on(source.clear_cache()) {
        warn!("Failed to clear image cache: {}", e);
    }

    let controller = Arc::new(WorkflowController::new(
        FprintdGate::new(&config.biometric),
        source,
        TesseractRecognizer::from_settings(&config.recognition),
        WorkflowSettings::from_config(&config),
    ));

    if let Err(e) = screen::run_app(controller, runtime.handle().clone()) {
        tracing::error!("Window error: {}", e);
    }

    runtime.shutdown_timeout(std::time::Duration::from_secs(1));
    info!("ScanPass shutdown complete");

    Ok(())
}

/// Load configuration from file or fall back to defaults
fn load_or_default_config(path: &std::path::Path) -> AppConfig {
    if path.exists() {
        match config::load_config(path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                return config;
            }
            Err(e) => warn!("Ignoring configuration: {:#}", e),
        }
    }
    info!("Using default configuration");
    AppConfig::default()
}

/// Print what the desktop backends detect
async fn run_check(config: &AppConfig) -> Result<()> {
    let gate = FprintdGate::new(&config.biometric);
    match gate.is_supported(&SupportOptions::default()).await {
        Ok(method) if method.is_face_based() => {
            println!("Biometrics: {} (not accepted, fingerprint required)", method)
        }
        Ok(method) => println!("Biometrics: {}", method),
        Err(e) => println!("Biometrics: unavailable ({})", e),
    }

    let recognizer = TesseractRecognizer::from_settings(&config.recognition);
    match recognizer.version().await {
        Some(version) => println!("OCR engine: {}", version),
        None => println!("OCR engine: {} not found", config.recognition.tesseract),
    }

    println!("Camera command: {}", config.capture.camera_command.join(" "));
    println!("Picker command: {}", config.capture.picker_command.join(" "));
    println!("Cache directory: {}", storage::get_cache_dir()?.display());

    Ok(())
}
