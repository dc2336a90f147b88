//! HTTP page fetching.
//!
//! [`PageFetcher`] is the seam between the detector and the network: the
//! production [`HttpFetcher`] downloads and parses pages, tests substitute
//! canned documents.

use crate::error::FetchError;
use reqwest::Client;
use scraper::Html;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Retrieves a page and parses it into a queryable document.
pub trait PageFetcher {
    /// GET `url` and parse the body as HTML.
    ///
    /// Fails on transport errors and non-success status codes. There are no
    /// retries; the next polling cycle is the retry.
    async fn fetch(&self, url: &str) -> Result<Html, FetchError>;
}

/// [`PageFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with its own HTTP client.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Total time allowed for one request, body included
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Html, FetchError> {
        let t0 = Instant::now();
        let http_err = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "Non-success status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(http_err)?;
        debug!(
            %url,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(Html::parse_document(&body))
    }
}
