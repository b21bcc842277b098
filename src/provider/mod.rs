//! Review page providers.
//!
//! A provider turns `(offset, limit)` into the raw bytes of one page. The
//! bytes decode to `{ "items": [...], "count": N }`; decoding happens in the
//! store so every provider shares one failure path.
//!
//! - `http`: GET against a reviews endpoint
//! - `file`: a local JSON document served in slices
//! - `memory`: an in-process collection served in slices

use crate::config::ResolvedConfig;
use crate::model::{ProviderError, ReviewRecord, ReviewsPage};
use async_trait::async_trait;
use std::sync::Arc;

pub mod file;
pub mod http;
pub mod memory;

pub use file::FileReviewsProvider;
pub use http::HttpReviewsProvider;
pub use memory::MemoryReviewsProvider;

/// Async page-fetch contract.
#[async_trait]
pub trait ReviewsProvider: Send + Sync {
    /// Fetch the page starting at `offset` with at most `limit` items.
    ///
    /// # Errors
    ///
    /// Returns a `ProviderError` when the page bytes cannot be delivered.
    /// Malformed bytes are not the provider's concern.
    async fn get_page(&self, offset: usize, limit: usize) -> Result<Vec<u8>, ProviderError>;
}

/// Encode the `offset..offset + limit` window of `records` as page bytes.
///
/// Windows past the end are empty; `count` is always the full length.
pub(crate) fn encode_window(
    records: &[ReviewRecord],
    offset: usize,
    limit: usize,
) -> Result<Vec<u8>, ProviderError> {
    let start = offset.min(records.len());
    let end = offset.saturating_add(limit).min(records.len());
    let page = ReviewsPage {
        items: records[start..end].to_vec(),
        count: records.len(),
    };
    Ok(page.to_vec()?)
}

/// Build the provider selected by `config`.
///
/// A local file wins over a URL. Returns `Ok(None)` when neither is set.
///
/// # Errors
///
/// Returns a `ProviderError` if the file cannot be loaded or the HTTP client
/// cannot be built.
pub fn from_config(config: &ResolvedConfig) -> Result<Option<Arc<dyn ReviewsProvider>>, ProviderError> {
    if let Some(path) = &config.reviews_file {
        let provider = FileReviewsProvider::load(path)?;
        return Ok(Some(Arc::new(provider)));
    }

    if let Some(url) = &config.reviews_url {
        let provider = HttpReviewsProvider::new(url.clone(), config.request_timeout)?;
        return Ok(Some(Arc::new(provider)));
    }

    Ok(None)
}
