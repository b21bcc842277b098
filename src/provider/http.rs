//! HTTP provider.

use super::ReviewsProvider;
use crate::model::ProviderError;
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;

/// Fetches pages with `GET {base_url}?offset=&limit=`.
#[derive(Debug, Clone)]
pub struct HttpReviewsProvider {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpReviewsProvider {
    /// Provider for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Transport` if the URL does not parse or the
    /// client cannot be built.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, ProviderError> {
        let base_url = Url::parse(base_url.as_ref()).map_err(|err| {
            ProviderError::Transport(format!("invalid reviews URL {:?}: {err}", base_url.as_ref()))
        })?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, client })
    }

    /// Request URL for one page.
    pub fn page_url(&self, offset: usize, limit: usize) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &limit.to_string());
        url
    }
}

#[async_trait]
impl ReviewsProvider for HttpReviewsProvider {
    async fn get_page(&self, offset: usize, limit: usize) -> Result<Vec<u8>, ProviderError> {
        let url = self.page_url(offset, limit);
        tracing::debug!(%url, "requesting reviews page");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
