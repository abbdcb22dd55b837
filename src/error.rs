//! Errors surfaced by [`PlatformClient`](crate::PlatformClient).
//!
//! Nothing is retried or swallowed: every failure of the token exchange, the transport,
//! or the response decoding is handed back to the caller as a [`PlatformError`].

use std::path::PathBuf;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Authentication failed: {0}")]
    Authentication(#[source] BoxError),

    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Cannot open file '{}': {source}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),
}

pub type Result<T, E = PlatformError> = std::result::Result<T, E>;
