//! Network tier.

use crate::model::{ImageError, ProviderError};
use async_trait::async_trait;
use std::time::Duration;

/// Loads the encoded bytes for a cache key.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch the bytes behind `key`.
    async fn load(&self, key: &str) -> Result<Vec<u8>, ImageError>;
}

/// Treats keys as URLs and GETs them.
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: reqwest::Client,
}

impl HttpImageSource {
    /// Source with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Transport` if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn load(&self, key: &str) -> Result<Vec<u8>, ImageError> {
        let network = |reason: String| ImageError::Network {
            key: key.to_string(),
            reason,
        };

        let response = self
            .client
            .get(key)
            .send()
            .await
            .map_err(|err| network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(network(format!("HTTP {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| network(err.to_string()))?;
        Ok(bytes.to_vec())
    }
}
