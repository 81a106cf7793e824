// src/main.rs

//! stockwatch CLI
//!
//! Single-shot availability monitor meant to be launched by cron or CI.
//! Each invocation runs one scrape-diff-notify cycle and exits; the host
//! scheduler provides the cadence and sees pass/fail through the exit code.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use stockwatch::{
    error::{AppError, Result},
    models::Config,
    notify,
    pipeline::{run_check, run_status, run_validate},
    storage::LocalStateStore,
};

/// stockwatch - retail availability monitor
#[derive(Parser, Debug)]
#[command(
    name = "stockwatch",
    version,
    about = "Retail product availability monitor"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one scrape-diff-notify cycle
    Check,

    /// Validate the configuration and report notification channels
    Validate,

    /// Show the persisted product state
    Status,

    /// Send a test message through every configured channel
    NotifyTest,
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
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Check => {
            let config = Arc::new(Config::load_or_default(&cli.config));
            let store = LocalStateStore::new(&config.storage.state_file);

            let notifiers = notify::from_env();
            if notifiers.is_empty() {
                log::warn!("No notification channels configured, changes will only be logged");
            }

            run_check(&config, &store, &notifiers).await?;
        }
        Command::Validate => run_validate(&cli.config)?,
        Command::Status => {
            let config = Arc::new(Config::load_or_default(&cli.config));
            let store = LocalStateStore::new(&config.storage.state_file);
            run_status(&store).await?;
        }
        Command::NotifyTest => {
            let notifiers = notify::from_env();
            if notifiers.is_empty() {
                return Err(AppError::config(
                    "no notification channels configured, set Telegram or email credentials",
                ));
            }
            for notifier in &notifiers {
                notifier
                    .send(
                        "Stock monitor test",
                        "<b>Stock monitor test message</b>",
                        "Stock monitor test message",
                    )
                    .await?;
                log::info!("{}: test message delivered", notifier.name());
            }
        }
    }

    Ok(())
}
