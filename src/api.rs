//! Article summarization through an OpenAI-compatible chat completions API.
//!
//! # Architecture
//!
//! - [`Summarize`]: async "article text in, summary out"
//! - [`OpenAiSummarizer`]: one `chat/completions` request per article
//! - [`RetrySummarize`]: decorator adding exponential backoff with jitter
//! - [`Summarizer`]: what the binary wires in, either the retrying OpenAI
//!   client or a passthrough used when no API key is configured
//!
//! Summaries end with the literal [`SOURCE_LINK_PLACEHOLDER`], which the
//! Telegram layer replaces with a link to the original article.

use rand::{Rng, rng};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Token the summary carries where the source link should go.
pub const SOURCE_LINK_PLACEHOLDER: &str = "SOURCELINK";

const SYSTEM_PROMPT: &str = "You summarize official press releases of government bodies for a \
news channel. Write a short English summary: a bold one-line headline wrapped in **double \
asterisks**, then two to four sentences with the key facts, names and figures. Do not invent \
anything that is not in the text. End the message with a new line containing only the word \
SOURCELINK.";

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("summarization request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("summarization API returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("summarization API returned no choices")]
    Empty,
}

/// Turns raw article text into a channel-ready summary.
pub trait Summarize {
    async fn summarize(&self, article: &str) -> Result<String, SummarizeError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Client for `{base_url}/chat/completions`.
pub struct OpenAiSummarizer {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(client: Client, base_url: &str, api_key: String, model: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }
}

impl fmt::Debug for OpenAiSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSummarizer")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl Summarize for OpenAiSummarizer {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn summarize(&self, article: &str) -> Result<String, SummarizeError> {
        let t0 = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: article,
                },
            ],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Status { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        let summary = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(SummarizeError::Empty)?;

        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            chars = summary.chars().count(),
            "Summary received"
        );
        Ok(summary)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`Summarize`] implementation.
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetrySummarize<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T: Summarize> RetrySummarize<T> {
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetrySummarize<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetrySummarize")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T: Summarize> Summarize for RetrySummarize<T> {
    #[instrument(level = "info", skip_all)]
    async fn summarize(&self, article: &str) -> Result<String, SummarizeError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.summarize(article).await {
                Ok(summary) => return Ok(summary),
                Err(e) => {
                    attempt += 1;
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "summarize() exhausted retries"
                        );
                        return Err(e);
                    }

                    let delay = self
                        .base_delay
                        .saturating_mul(1 << (attempt - 1).min(16))
                        .min(self.max_delay);
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "summarize() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// The summarizer selected at startup.
#[derive(Debug)]
pub enum Summarizer {
    OpenAi(RetrySummarize<OpenAiSummarizer>),
    /// Forwards the article text unchanged, followed by the link placeholder.
    Passthrough,
}

impl Summarizer {
    pub fn openai(client: Client, base_url: &str, api_key: String, model: String) -> Self {
        let inner = OpenAiSummarizer::new(client, base_url, api_key, model);
        Summarizer::OpenAi(RetrySummarize::new(inner, 5, StdDuration::from_secs(1)))
    }
}

impl Summarize for Summarizer {
    async fn summarize(&self, article: &str) -> Result<String, SummarizeError> {
        match self {
            Summarizer::OpenAi(api) => api.summarize(article).await,
            Summarizer::Passthrough => Ok(format!("{article}\n\n{SOURCE_LINK_PLACEHOLDER}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails the first `failures` calls, then echoes the input.
    struct Flaky {
        failures: usize,
        calls: AtomicUsize,
    }

    impl Summarize for Flaky {
        async fn summarize(&self, article: &str) -> Result<String, SummarizeError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(SummarizeError::Empty)
            } else {
                Ok(format!("summary of {article}"))
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_after_transient_failures() {
        let flaky = Flaky {
            failures: 2,
            calls: AtomicUsize::new(0),
        };
        let api = RetrySummarize::new(flaky, 5, StdDuration::from_secs(1));

        let summary = api.summarize("text").await.unwrap();

        assert_eq!(summary, "summary of text");
        assert_eq!(api.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_gives_up_after_max_retries() {
        let flaky = Flaky {
            failures: usize::MAX,
            calls: AtomicUsize::new(0),
        };
        let api = RetrySummarize::new(flaky, 2, StdDuration::from_secs(1));

        let err = api.summarize("text").await.unwrap_err();

        assert!(matches!(err, SummarizeError::Empty));
        assert_eq!(api.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_passthrough_appends_placeholder() {
        let summary = Summarizer::Passthrough.summarize("# T\n\nBody").await.unwrap();
        assert_eq!(summary, "# T\n\nBody\n\nSOURCELINK");
    }

    #[test]
    fn test_chat_request_shape() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "s",
                },
                ChatMessage {
                    role: "user",
                    content: "u",
                },
            ],
            temperature: 0.2,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "u");
    }

    #[test]
    fn test_chat_response_parsing() {
        let raw = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"**Hi**\nSOURCELINK"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "**Hi**\nSOURCELINK");
    }
}
