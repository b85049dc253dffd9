//! Macroharvest main entry point
//!
//! Command-line interface for the nutrition-database harvester.

use clap::Parser;
use macroharvest::config::{load_config_with_hash, Config};
use macroharvest::crawler::harvest;
use macroharvest::output::{load_statistics, print_statistics};
use macroharvest::storage::FileCheckpointStore;
use macroharvest::terms::TERM_SPACE_SIZE;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Macroharvest: a resumable nutrition-database harvester
///
/// Macroharvest drives a UI-automation backend through every 3-letter
/// search term, extracts nutrition records from each result, and
/// checkpoints progress so an interrupted run picks up where it stopped.
#[derive(Parser, Debug)]
#[command(name = "macroharvest")]
#[command(version = "1.0.0")]
#[command(about = "A resumable nutrition-database harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (optional; built-in defaults apply)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Start a fresh harvest, ignoring any existing checkpoint
    #[arg(long)]
    fresh: bool,

    /// Validate config and show what would be harvested without running
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the checkpoint files and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load configuration (built-in defaults when no file is given)
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No config file given, using built-in defaults");
            Config::default()
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_harvest(config, cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("macroharvest=info,warn"),
            1 => EnvFilter::new("macroharvest=debug,info"),
            2 => EnvFilter::new("macroharvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the harvest plan
fn handle_dry_run(config: &Config) {
    println!("=== Macroharvest Dry Run ===\n");

    println!("Backend:");
    println!("  Endpoint: {}", config.backend.endpoint);
    println!(
        "  Device: {} ({} {})",
        config.backend.device_name, config.backend.platform_name, config.backend.platform_version
    );
    println!("  Automation: {}", config.backend.automation_name);

    println!("\nCrawl:");
    println!(
        "  Retry: {} attempts, {}ms delay",
        config.crawl.retry_attempts, config.crawl.retry_delay_ms
    );
    println!(
        "  Waits: results {}ms, detail {}ms (poll {}ms)",
        config.crawl.results_wait_ms, config.crawl.detail_wait_ms, config.crawl.poll_interval_ms
    );
    println!("  Checkpoint every {} terms", config.crawl.save_every_terms);

    println!("\nOutput:");
    println!("  Dataset: {}", config.output.dataset_path);
    println!("  Processed terms: {}", config.output.terms_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would harvest {} search terms", TERM_SPACE_SIZE);
}

/// Handles the --stats mode: shows statistics from the checkpoint files
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Dataset: {}\n", config.output.dataset_path);

    let store = FileCheckpointStore::from_config(&config.output);
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, fresh: bool) -> anyhow::Result<()> {
    match harvest(&config, fresh).await {
        Ok(report) => {
            if report.interrupted {
                tracing::info!("Harvest interrupted cleanly; checkpoint is up to date");
            } else {
                tracing::info!("Harvest completed successfully");
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
