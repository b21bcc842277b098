//! Local JSON document provider.
//!
//! The document has the same shape as a page (`{ "items": [...], "count" }`)
//! but holds the whole collection; `count` in the file is ignored and the
//! item count is served as the total instead.

use super::{encode_window, ReviewsProvider};
use crate::model::{ProviderError, ReviewRecord, ReviewsPage};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Serves slices of a collection read once from disk.
#[derive(Debug, Clone)]
pub struct FileReviewsProvider {
    path: PathBuf,
    records: Vec<ReviewRecord>,
    latency: Option<Duration>,
}

impl FileReviewsProvider {
    /// Read and decode the collection at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Io` if the file cannot be read and
    /// `ProviderError::InvalidFile` if it is not a reviews document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ProviderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = ReviewsPage::from_slice(&bytes).map_err(|err| ProviderError::InvalidFile {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        tracing::info!(
            path = %path.display(),
            reviews = document.items.len(),
            "loaded reviews file"
        );

        Ok(Self {
            path: path.to_path_buf(),
            records: document.items,
            latency: None,
        })
    }

    /// Simulate network latency on every request.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Source file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of reviews in the file.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the file holds no reviews.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ReviewsProvider for FileReviewsProvider {
    async fn get_page(&self, offset: usize, limit: usize) -> Result<Vec<u8>, ProviderError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        encode_window(&self.records, offset, limit)
    }
}
