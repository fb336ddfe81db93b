//! feedwatch CLI
//!
//! Local execution entry point for fetching feeds and checking their health.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use feedwatch::{
    error::Result,
    models::{Config, active_sources},
    pipeline,
    services::FeedService,
};

/// feedwatch - Feed fetcher and health monitor
#[derive(Parser, Debug)]
#[command(
    name = "feedwatch",
    version,
    about = "Fetch feeds and track source health"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "feedwatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch articles from all active sources
    Fetch {
        /// Write the batch outcome as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check the health of all active sources
    ///
    /// Health history lives only for the duration of one run; use
    /// `--rounds` to accumulate consecutive failures.
    Health {
        /// Number of check rounds to run
        #[arg(short, long, default_value_t = 1)]
        rounds: u32,

        /// Seconds to wait between rounds
        #[arg(short, long, default_value_t = 60)]
        interval: u64,

        /// Write the health summary as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,

    /// List configured sources
    Sources,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    log::info!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Fetch { output } => {
            config.validate()?;
            let service = FeedService::from_config(&config)?;
            let outcome = pipeline::run_fetch(&config, &service, output.as_deref()).await?;
            if output.is_none() {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
        }

        Command::Health {
            rounds,
            interval,
            output,
        } => {
            config.validate()?;
            let service = FeedService::from_config(&config)?;
            let summary = pipeline::run_health(
                &config,
                &service,
                rounds,
                Duration::from_secs(interval),
                output.as_deref(),
            )
            .await?;
            if output.is_none() {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} sources, {} active)",
                config.sources.len(),
                active_sources(&config.sources).len()
            );
        }

        Command::Sources => {
            for source in &config.sources {
                let state = if source.active { "active" } else { "inactive" };
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    source.id, source.name, source.category, state, source.url
                );
            }
        }
    }

    Ok(())
}
