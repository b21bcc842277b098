//! Error types for reviews-feed.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error for the binary (config, logging, I/O)
//! - [`ProviderError`] - A page request could not be served
//! - [`PageError`] - A page was served but could not be turned into records
//! - [`ImageError`] - One image tier failed to produce bytes
//!
//! # Error Recovery Strategy
//!
//! Nothing in the list core is fatal. Page failures re-arm the loader so the
//! next request retries the same offset. Image failures fall through to the
//! next tier and end as an absent image. Only configuration and logging setup
//! in the binary propagate to `main`.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for the `reviews-feed` binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Provider could not be constructed.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Neither a reviews file nor a reviews URL was configured.
    #[error("No reviews source configured: pass --file or --url, or set reviews_file / reviews_url")]
    MissingSource,

    /// Terminal output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a [`crate::provider::ReviewsProvider`] to deliver page bytes.
///
/// Transport-level only: a successfully delivered body that does not decode
/// is a [`PageError::Decode`].
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Request could not be sent or the body could not be read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server answered with a non-success status.
    #[error("Server returned HTTP {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Local collection file could not be read.
    #[error("Failed to read reviews file {path:?}: {source}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Local collection file is not a valid reviews document.
    #[error("Invalid reviews file {path:?}: {reason}")]
    InvalidFile {
        /// Offending file.
        path: PathBuf,
        /// Decode failure details.
        reason: String,
    },

    /// In-process page could not be serialized.
    #[error("Failed to encode reviews page: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

/// Failure to load one page into the list.
#[derive(Debug, Error)]
pub enum PageError {
    /// Provider could not deliver bytes.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Bytes did not decode as a reviews page.
    #[error("Malformed reviews page: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure of a single image tier.
///
/// Cloneable so a coalesced resolution can hand the same outcome to every
/// waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// Network read failed or returned a non-success status.
    #[error("Network error for {key}: {reason}")]
    Network {
        /// Cache key (URL) being fetched.
        key: String,
        /// Failure details.
        reason: String,
    },

    /// Bytes were read but are not a decodable image.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Disk tier read or write failed.
    #[error("I/O error: {0}")]
    Io(String),
}
