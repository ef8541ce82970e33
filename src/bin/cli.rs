//! pagewatch CLI
//!
//! Local execution entry point, intended to be invoked by an external
//! scheduler (cron, CI timer). The `run` command always exits 0 so that
//! transient fetch or delivery problems never trip scheduler alerting.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pagewatch::{
    error::Result,
    models::Config,
    pipeline::{self, NotifyOutcome},
    services::{HttpFetcher, Notifier, TelegramNotifier},
    storage::{LocalStore, StateStore},
};

/// pagewatch - Remote Document Change Watcher
#[derive(Parser, Debug)]
#[command(name = "pagewatch", version, about = "Remote document change watcher")]
struct Cli {
    /// Path to state directory containing config and per-resource state
    #[arg(short, long, default_value = "state")]
    state_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check all tracked resources once and notify on changes
    Run,

    /// Validate configuration files
    Validate,

    /// Show last-checked state for each tracked resource
    Info,
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

    let config_path = cli.state_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);
    let store = LocalStore::new(&cli.state_dir);

    match cli.command {
        Command::Run => {
            log::info!(
                "Checking {} tracked resources...",
                config.resources.len()
            );

            // A broken local setup still must not fail the scheduler.
            let fetcher = match HttpFetcher::new(&config.watcher) {
                Ok(fetcher) => fetcher,
                Err(e) => {
                    log::error!("Could not build HTTP client: {e}");
                    return Ok(());
                }
            };

            let notifier = match TelegramNotifier::from_env(&config.notify) {
                Ok(notifier) => notifier,
                Err(e) => {
                    log::error!("Could not build notifier: {e}");
                    None
                }
            };

            let summary = pipeline::run_once(
                &config,
                &fetcher,
                &store,
                notifier.as_ref().map(|n| n as &dyn Notifier),
            )
            .await;

            log::info!(
                "Run complete: {} checked, {} changed, {} failed",
                summary.checked,
                summary.changes.len(),
                summary.failed
            );
            if summary.notified == NotifyOutcome::Failed {
                log::warn!("Notification was not delivered; see errors above.");
            }

            std::process::exit(summary.exit_status());
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} resources)", config.resources.len());
        }

        Command::Info => {
            log::info!("State directory: {}", cli.state_dir.display());

            for resource in config.tracked_resources() {
                let slug = match resource.slug() {
                    Ok(slug) => slug,
                    Err(e) => {
                        log::warn!("{}: invalid URL ({})", resource.url, e);
                        continue;
                    }
                };

                match store.read_record(&slug).await? {
                    Some(record) => {
                        log::info!(
                            "{}: checked {}, {} bytes, digest {}",
                            resource.url,
                            record.checked_at,
                            record.size_bytes,
                            &record.sha256[..12.min(record.sha256.len())]
                        );
                    }
                    None => {
                        log::info!("{}: not yet observed", resource.url);
                    }
                }
            }
        }
    }

    Ok(())
}
