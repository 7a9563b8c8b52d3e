//! Zoo Farm Bot - Main Entry Point
//!
//! Logs into every configured account, collects rewards, feeds and grows
//! the zoo, then waits until the next feed time and repeats.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use zoo_farm_bot::api::ZooClient;
use zoo_farm_bot::config::{AccountList, BotSettings};
use zoo_farm_bot::scheduler::{CycleScheduler, FarmAccount};

/// Multi-account automation client for the Zoo mini-game.
#[derive(Parser, Debug)]
#[command(name = "zoo_bot")]
#[command(about = "Claim rewards, feed animals and grow your Zoo on every account")]
#[command(version)]
struct Args {
    /// File with one Telegram initData string per line.
    #[arg(short, long, default_value = "data.txt")]
    data: PathBuf,

    /// Optional file with one proxy per line, matched to accounts by position.
    #[arg(short, long, default_value = "proxy.txt")]
    proxies: PathBuf,

    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Run a single cycle and exit.
    #[arg(long)]
    once: bool,

    /// Do not draw the countdown between cycles.
    #[arg(long)]
    no_countdown: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    let settings = BotSettings::from_env_with_defaults();
    debug!("Settings: {:?}", settings);

    let list = AccountList::load(&args.data, Some(args.proxies.as_path()))
        .context("Failed to load accounts")?;

    for rejected in &list.rejected {
        warn!("Skipping account {}: {}", rejected.index + 1, rejected.error);
    }

    info!(
        "Loaded {} account(s), {} with proxy",
        list.len(),
        list.accounts.iter().filter(|a| a.proxy.is_some()).count()
    );

    let mut accounts = Vec::with_capacity(list.len());
    for entry in list.accounts {
        let username = entry.init_data.username().to_owned();
        let api = ZooClient::new(&settings, entry.init_data, entry.proxy)
            .with_context(|| format!("Failed to build HTTP client for account {}", entry.index + 1))?;
        accounts.push(FarmAccount {
            index: entry.index,
            username,
            api,
        });
    }

    let scheduler = CycleScheduler::new(accounts, settings).with_countdown(!args.no_countdown);
    let max_cycles = args.once.then_some(1);

    info!("Bot is running. Use Ctrl+C to stop.");

    tokio::select! {
        () = scheduler.run(max_cycles) => {}
        _ = tokio::signal::ctrl_c() => {
            println!();
            info!("Received Ctrl+C, shutting down...");
        }
    }

    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
