//! survey-report - survey CSV to LaTeX frequency tables and bar charts
//!
//! Reads a survey export, counts the answers to the tracked questions,
//! writes the counts as LaTeX tables and renders the age and price range
//! distributions as PNG bar charts.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Input CSV not found, or any other runtime error

mod analysis;
mod cli;
mod config;
mod loader;
mod models;
mod pipeline;
mod report;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, DEFAULT_CONFIG_FILE};
use loader::LoadError;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config(&args);
    }

    init_logging(&args);

    info!("survey-report v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_report(&args) {
        Ok(()) => Ok(()),
        Err(e) => {
            if let Some(LoadError::NotFound(_)) = e.downcast_ref::<LoadError>() {
                println!("{}", e);
            } else {
                error!("Report failed: {:#}", e);
                eprintln!("\n❌ Error: {:#}", e);
            }
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .survey-report.toml.
fn handle_init_config(args: &Args) -> Result<()> {
    let path = args.root.join(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            path.display()
        );
        std::process::exit(1);
    }

    let content = Config::default_toml()?;
    std::fs::write(&path, &content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✅ Created {} with default settings.", path.display());
    println!("   Edit it to change input/output paths, column names and chart settings.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the configuration and run the report once.
fn run_report(args: &Args) -> Result<()> {
    let config = load_config(args)?.rooted_at(&args.root);

    let outcome = pipeline::run(&config)?;

    debug!(
        "Read {} rows from {} ({}), {} sections written",
        outcome.rows,
        outcome.input.display(),
        outcome.encoding,
        outcome.summary.available().count()
    );

    println!(
        "Generated: {} and figures in {}",
        outcome.document.display(),
        outcome.figures_dir.display()
    );
    for chart in &outcome.charts {
        println!("   {}", chart.display());
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try the root directory
    match Config::load_from_root(&args.root) {
        Ok(Some(config)) => {
            info!("Loaded config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
