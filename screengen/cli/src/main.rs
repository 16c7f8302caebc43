//! Screengen - Synthetic Desktop Screenshot Generator
//!
//! Generates a labeled dataset of fake desktop screenshots.
//!
//! # Usage
//!
//! ```bash
//! # Ten raw images with debug overlays in ./output
//! screengen
//!
//! # Full normalized Windows dataset from real assets
//! screengen --run-mode prod --family windows --resources ./resources
//!
//! # With config file
//! screengen --config ./screengen.toml
//!
//! # Verbose logging
//! RUST_LOG=debug screengen
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use screengen_core::{
    load_config, load_config_from_path, BatchRunner, ConfigOverrides, DirectoryProvider,
    ExportMode, ProceduralProvider, ResourceProvider, RunMode, UiFamily,
};

/// Screengen - synthetic desktop screenshots with exact UI labels
#[derive(Parser, Debug)]
#[command(name = "screengen")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "SCREENGEN_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run preset (test, prod)
    #[arg(short = 'r', long, value_parser = RunMode::parse)]
    run_mode: Option<RunMode>,

    /// UI family (mac, windows)
    #[arg(short = 'f', long, value_parser = UiFamily::parse)]
    family: Option<UiFamily>,

    /// Output directory
    #[arg(short = 'o', long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Asset directory; procedural sprites are used when absent
    #[arg(long, value_name = "DIR")]
    resources: Option<PathBuf>,

    /// Export mode (raw, normalized, yolo)
    #[arg(short = 'm', long, value_parser = ExportMode::parse)]
    mode: Option<ExportMode>,

    /// Batch seed
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Maximum images generated at once
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Number of training images
    #[arg(long)]
    training: Option<usize>,

    /// Stop at the first failed image
    #[arg(long)]
    fail_fast: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "SCREENGEN_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        overrides.run_mode = self.run_mode;
        overrides.family = self.family;
        overrides.output_dir.clone_from(&self.output);
        overrides.resources_dir.clone_from(&self.resources);
        overrides.mode = self.mode;
        overrides.seed = self.seed;
        overrides.concurrency = self.concurrency;
        overrides.training = self.training;
        if self.fail_fast {
            overrides = overrides.with_fail_fast(true);
        }
        overrides
    }
}

/// Initialize logging with the specified level
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("screengen={level},screengen_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging first
    init_logging(&args.log_level);

    info!("Screengen starting");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = match args.config {
        Some(ref path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            load_config_from_path(Some(path.clone()))
        }
        None => load_config(),
    }
    .context("Failed to load configuration")?;

    args.overrides().apply(&mut config);
    config.validate().context("Invalid configuration")?;

    info!(
        source = %config.source(),
        run_mode = config.run_mode.as_str(),
        family = %config.family,
        seed = config.seed,
        output = %config.output_dir.display(),
        "Configuration loaded"
    );

    let provider: Box<dyn ResourceProvider> = match config.resources_dir {
        Some(ref dir) => {
            info!(path = %dir.display(), "Loading assets from directory");
            Box::new(DirectoryProvider::new(dir.clone()))
        }
        None => {
            warn!("No resource directory configured, using procedural sprites");
            Box::new(ProceduralProvider::default())
        }
    };

    let runner = BatchRunner::load(config.batch_settings(), provider.as_ref()).await;
    let report = runner.run().await.context("Batch generation failed")?;

    if report.is_complete() {
        info!(
            generated = report.generated,
            classes = report.classes.len(),
            "Dataset written to {}",
            config.output_dir.display()
        );
    } else {
        warn!(
            generated = report.generated,
            failed = report.failed.len(),
            "Dataset written with failures: {}",
            report.failed.join(", ")
        );
    }

    Ok(())
}
