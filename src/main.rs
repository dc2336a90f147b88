//! # Official News Watch
//!
//! Watches the news pages of Armenian government bodies, detects when a
//! listing changes, extracts the newest article, summarizes it through an
//! OpenAI-compatible API and posts the summary to a Telegram channel.
//!
//! ## Usage
//!
//! ```sh
//! official_news_watch --once --dry-run
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: download a source's listing page ([`fetcher`])
//! 2. **Scraping**: site-specific extraction of title/date/link entries ([`scrapers`])
//! 3. **Detection**: compare with the stored snapshot, pick the newest article ([`detector`], [`snapshot`])
//! 4. **Publishing**: summarize, escape and deliver ([`api`], [`telegram`]) on a schedule ([`scheduler`])

use clap::Parser;
use reqwest::Client;
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod detector;
mod error;
mod fetcher;
mod models;
mod scheduler;
mod scrapers;
mod snapshot;
mod telegram;
mod utils;

use api::Summarizer;
use cli::Cli;
use detector::UpdateDetector;
use fetcher::HttpFetcher;
use scheduler::Monitor;
use snapshot::FileSnapshotStore;
use telegram::{Delivery, TelegramClient};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("official_news_watch starting up");

    let args = Cli::parse();
    debug!(?args.snapshot_dir, ?args.config, once = args.once, dry_run = args.dry_run, "Parsed CLI arguments");

    let schedule = config::load_schedule(args.config.as_deref()).await?;
    ensure_writable_dir(&args.snapshot_dir).await?;

    let fetcher = HttpFetcher::new(schedule.request_timeout())?;
    let store = FileSnapshotStore::new(&args.snapshot_dir);
    let detector = UpdateDetector::new(fetcher, store);

    let api_client = Client::builder().timeout(schedule.request_timeout() * 4).build()?;

    let summarizer = match args.openai_api_key.clone() {
        Some(key) => Summarizer::openai(api_client.clone(), &args.openai_base_url, key, args.model.clone()),
        None => {
            warn!("OPENAI_API_KEY not set; articles will be forwarded without summarization");
            Summarizer::Passthrough
        }
    };

    let delivery = if args.dry_run {
        Delivery::DryRun
    } else {
        match (args.bot_token.clone(), args.channel_id) {
            (Some(token), Some(chat_id)) => Delivery::Telegram(TelegramClient::new(api_client, token, chat_id)),
            _ => return Err("BOT_TOKEN and CHANNEL_ID are required unless --dry-run is given".into()),
        }
    };

    let monitor = Monitor::new(detector, summarizer, delivery, args.sources());

    if args.once {
        let report = monitor.run_cycle().await;
        info!(
            delivered = ?report.delivered,
            unchanged = ?report.unchanged,
            failed = ?report.failed,
            "Single cycle complete"
        );
        return Ok(());
    }

    monitor.run(&schedule).await;
    Ok(())
}
