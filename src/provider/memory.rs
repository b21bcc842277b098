//! In-process provider.

use super::{encode_window, ReviewsProvider};
use crate::model::{ProviderError, ReviewRecord};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

/// Serves slices of an owned collection and records every request.
#[derive(Debug, Default)]
pub struct MemoryReviewsProvider {
    records: Vec<ReviewRecord>,
    latency: Option<Duration>,
    requests: Mutex<Vec<(usize, usize)>>,
}

impl MemoryReviewsProvider {
    /// Provider over `records`.
    pub fn new(records: Vec<ReviewRecord>) -> Self {
        Self {
            records,
            latency: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Sleep for `latency` before answering each request.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of `get_page` calls so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    /// `(offset, limit)` of every call, in order.
    pub fn requests(&self) -> Vec<(usize, usize)> {
        self.requests.lock().clone()
    }

    /// Full collection size.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ReviewsProvider for MemoryReviewsProvider {
    async fn get_page(&self, offset: usize, limit: usize) -> Result<Vec<u8>, ProviderError> {
        self.requests.lock().push((offset, limit));

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        encode_window(&self.records, offset, limit)
    }
}
