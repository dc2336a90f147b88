//! Command-line interface definitions.
//!
//! Every option can also be provided through the environment variable named
//! next to it, which is how the service is configured when deployed.

use crate::models::Source;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the news watcher.
///
/// # Examples
///
/// ```sh
/// # Check every source once and print the messages instead of sending them
/// official_news_watch --once --dry-run
///
/// # Run the schedule, posting to a channel
/// BOT_TOKEN=... CHANNEL_ID=-100123 OPENAI_API_KEY=... official_news_watch
///
/// # Only watch two sources
/// official_news_watch --sources MFA,GOV
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the per-source snapshot files
    #[arg(long, env = "SNAPSHOT_DIR", default_value = "snapshots")]
    pub snapshot_dir: PathBuf,

    /// Comma-separated source keys to watch (default: all)
    #[arg(long, env = "NEWS_SOURCES", value_delimiter = ',')]
    pub sources: Vec<Source>,

    /// Optional path to a schedule YAML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Telegram bot token
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    /// Telegram channel id messages are posted to
    #[arg(long, env = "CHANNEL_ID", allow_negative_numbers = true)]
    pub channel_id: Option<i64>,

    /// API key for the OpenAI-compatible summarization endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Model used for summaries
    #[arg(long, env = "MINI_LLM_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    /// Run a single check of every source now and exit
    #[arg(long)]
    pub once: bool,

    /// Log messages instead of sending them to Telegram
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Sources to watch, in polling order, without duplicates.
    pub fn sources(&self) -> Vec<Source> {
        if self.sources.is_empty() {
            return Source::ALL.to_vec();
        }
        Source::ALL
            .into_iter()
            .filter(|s| self.sources.contains(s))
            .collect()
    }
}
