//! Message formatting and delivery to a Telegram channel.
//!
//! Summaries are sent with `MarkdownV2` parse mode, which rejects any
//! unescaped reserved character, so everything the summarizer produced is
//! escaped before the source link (which must stay live markup) is inserted.

use crate::api::SOURCE_LINK_PLACEHOLDER;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{info, instrument};

const API_BASE: &str = "https://api.telegram.org";

static RESERVED: Lazy<Regex> = Lazy::new(|| Regex::new(r"([_\[\]()~`>#+\-=|{}.!])").unwrap());

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Telegram request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Telegram rejected the message: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for DeliveryError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL embeds the bot token.
        DeliveryError::Http(e.without_url())
    }
}

/// Escape `MarkdownV2` reserved characters and turn `**bold**` into the
/// single-asterisk form Telegram expects.
pub fn escape_markdown_v2(text: &str) -> String {
    RESERVED.replace_all(text, r"\$1").replace("**", "*")
}

/// Final channel message: escaped summary with the placeholder replaced by a
/// `[SOURCE](link)` markup link.
pub fn format_message(summary: &str, link: &str) -> String {
    let escaped_link = link.replace('\\', r"\\").replace(')', r"\)");
    escape_markdown_v2(summary).replace(
        SOURCE_LINK_PLACEHOLDER,
        &format!("[SOURCE]({escaped_link})"),
    )
}

/// Sends a finished message somewhere.
pub trait Deliver {
    async fn deliver(&self, message: &str) -> Result<(), DeliveryError>;
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

/// Bot API client posting into one channel.
pub struct TelegramClient {
    client: Client,
    token: String,
    chat_id: i64,
}

impl TelegramClient {
    pub fn new(client: Client, token: String, chat_id: i64) -> Self {
        Self {
            client,
            token,
            chat_id,
        }
    }

    /// Post `text` to the configured chat as MarkdownV2 with link previews off.
    ///
    /// # Arguments
    ///
    /// * `text` - A message already escaped by [`format_message`]
    ///
    /// # Errors
    ///
    /// - [`DeliveryError::Http`] on transport failures or an unreadable reply
    ///   (the bot token is stripped from the error)
    /// - [`DeliveryError::Rejected`] when the Bot API answers with `ok: false`
    #[instrument(level = "info", skip_all, fields(chat_id = self.chat_id))]
    pub async fn send_message(&self, text: &str) -> Result<(), DeliveryError> {
        let body = SendMessage {
            chat_id: self.chat_id,
            text,
            parse_mode: "MarkdownV2",
            disable_web_page_preview: true,
        };
        let response = self
            .client
            .post(format!("{API_BASE}/bot{}/sendMessage", self.token))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let reply: ApiResponse = response.json().await?;
        if !reply.ok {
            return Err(DeliveryError::Rejected(
                reply
                    .description
                    .unwrap_or_else(|| format!("HTTP {status}")),
            ));
        }

        info!("Message sent");
        Ok(())
    }
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

/// Where finished messages go.
#[derive(Debug)]
pub enum Delivery {
    Telegram(TelegramClient),
    /// Log the message instead of sending it.
    DryRun,
}

impl Deliver for Delivery {
    async fn deliver(&self, message: &str) -> Result<(), DeliveryError> {
        match self {
            Delivery::Telegram(client) => client.send_message(message).await,
            Delivery::DryRun => {
                info!(%message, "Dry run; message not sent");
                Ok(())
            }
        }
    }
}
