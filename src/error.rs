//! Error types for the fetch, parse and persistence layers.
//!
//! The detector never recovers from any of these itself; the polling cycle
//! logs them per source and moves on to the next site.

use crate::models::Source;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Network or HTTP failure while downloading a page.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, timeout or body decoding failure
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// HTTP client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),
}

/// The page no longer has the structure a scraper expects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{site}: page layout changed, missing {field}")]
pub struct LayoutError {
    pub site: Source,
    pub field: &'static str,
}

impl LayoutError {
    pub fn new(site: Source, field: &'static str) -> Self {
        Self { site, field }
    }
}

/// Snapshot read or write failure.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("snapshot I/O failed at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("snapshot at {} is not a valid listing: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot encoding failed: {0}")]
    Encode(#[source] serde_json::Error),
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PersistenceError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Any failure of a single update check.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] FetchError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
