//! Two-tier image cache with network fallback.
//!
//! Keys (URLs) resolve through memory, then disk, then the network. A hit in
//! a slower tier is written back to the faster ones. Concurrent fetches of
//! one key share a single resolution.
//!
//! - `memory`: cost-bounded LRU
//! - `disk`: one file per key
//! - `source`: network loader seam

pub mod disk;
pub mod image;
pub mod memory;
pub mod source;

pub use self::image::Image;
pub use disk::DiskCache;
pub use memory::MemoryCache;
pub use source::{HttpImageSource, ImageSource};

use crate::config::ResolvedConfig;
use crate::model::{ImageError, ProviderError};
use futures_util::future::join_all;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Counters of where fetches were served from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Fetches answered from memory.
    pub memory_hits: u64,
    /// Resolutions answered from disk.
    pub disk_hits: u64,
    /// Requests made to the network source.
    pub network_loads: u64,
    /// Resolutions that produced no image.
    pub failures: u64,
}

#[derive(Debug, Default)]
struct StatsCounters {
    memory_hits: AtomicU64,
    disk_hits: AtomicU64,
    network_loads: AtomicU64,
    failures: AtomicU64,
}

impl StatsCounters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CacheStats {
        CacheStats {
            memory_hits: self.memory_hits.load(Ordering::Relaxed),
            disk_hits: self.disk_hits.load(Ordering::Relaxed),
            network_loads: self.network_loads.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

type Resolution = Arc<OnceCell<Option<Image>>>;

/// Memory + disk + network image cache.
///
/// Share it behind an `Arc`; every method takes `&self`.
pub struct ImageCache {
    memory: Mutex<MemoryCache>,
    disk: Option<DiskCache>,
    source: Option<Arc<dyn ImageSource>>,
    in_flight: Mutex<HashMap<String, Resolution>>,
    stats: StatsCounters,
}

impl fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageCache")
            .field("memory", &self.memory)
            .field("disk", &self.disk)
            .field("has_source", &self.source.is_some())
            .field("stats", &self.stats())
            .finish()
    }
}

impl ImageCache {
    /// Memory-only cache with a `memory_limit_bytes` cost budget.
    pub fn new(memory_limit_bytes: usize) -> Self {
        Self {
            memory: Mutex::new(MemoryCache::new(memory_limit_bytes)),
            disk: None,
            source: None,
            in_flight: Mutex::new(HashMap::new()),
            stats: StatsCounters::default(),
        }
    }

    /// Add a disk tier under `dir`.
    pub fn with_disk(mut self, dir: impl Into<PathBuf>) -> Self {
        self.disk = Some(DiskCache::new(dir));
        self
    }

    /// Add a network tier.
    pub fn with_source(mut self, source: Arc<dyn ImageSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Cache with all three tiers configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Transport` if the HTTP client cannot be built.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, ProviderError> {
        let source = HttpImageSource::new(config.request_timeout)?;
        Ok(Self::new(config.memory_cache_limit_bytes)
            .with_disk(config.image_cache_dir.clone())
            .with_source(Arc::new(source)))
    }

    /// Memory-only lookup without side effects.
    pub fn get(&self, key: &str) -> Option<Image> {
        self.memory.lock().peek(key)
    }

    /// Insert into memory and start a background disk write.
    pub fn put(&self, key: &str, image: Image) {
        let encoded = image.encoded_shared();
        self.insert_memory(key, image);
        if let Some(disk) = &self.disk {
            disk.spawn_write(key.to_string(), encoded);
        }
    }

    /// Resolve `key` through memory, disk and network.
    ///
    /// Returns `None` when every tier fails.
    pub async fn fetch(&self, key: &str) -> Option<Image> {
        if let Some(image) = self.memory.lock().get(key) {
            StatsCounters::bump(&self.stats.memory_hits);
            return Some(image);
        }

        let resolution = {
            let mut in_flight = self.in_flight.lock();
            Arc::clone(in_flight.entry(key.to_string()).or_default())
        };

        let image = resolution.get_or_init(|| self.resolve(key)).await.clone();

        let mut in_flight = self.in_flight.lock();
        if in_flight
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, &resolution))
        {
            in_flight.remove(key);
        }

        image
    }

    /// Fetch every key concurrently; returns the images that resolved.
    pub async fn fetch_many<I>(&self, keys: I) -> Vec<Image>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let keys: Vec<I::Item> = keys.into_iter().collect();
        join_all(keys.iter().map(|key| self.fetch(key.as_ref())))
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Drop `key` from memory, keeping the disk copy.
    pub fn evict_memory(&self, key: &str) -> bool {
        self.memory.lock().remove(key)
    }

    /// Drop every memory entry, keeping disk copies.
    pub fn clear_memory(&self) {
        self.memory.lock().clear();
    }

    /// Total cost currently held in memory.
    pub fn memory_usage(&self) -> usize {
        self.memory.lock().used_bytes()
    }

    /// Number of resolutions currently running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Counter snapshot.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    fn insert_memory(&self, key: &str, image: Image) {
        let evicted = self.memory.lock().insert(key.to_string(), image);
        if !evicted.is_empty() {
            tracing::debug!(count = evicted.len(), "evicted images from memory");
        }
    }

    async fn resolve(&self, key: &str) -> Option<Image> {
        // Another resolution may have finished between the miss and now.
        if let Some(image) = self.memory.lock().get(key) {
            StatsCounters::bump(&self.stats.memory_hits);
            return Some(image);
        }

        if let Some(image) = self.load_from_disk(key).await {
            StatsCounters::bump(&self.stats.disk_hits);
            tracing::debug!(key, "image served from disk");
            self.insert_memory(key, image.clone());
            return Some(image);
        }

        match self.load_from_network(key).await {
            Ok(image) => {
                tracing::debug!(key, "image served from network");
                self.put(key, image.clone());
                Some(image)
            }
            Err(err) => {
                StatsCounters::bump(&self.stats.failures);
                tracing::warn!(key, error = %err, "image unavailable");
                None
            }
        }
    }

    async fn load_from_disk(&self, key: &str) -> Option<Image> {
        let disk = self.disk.as_ref()?;
        let bytes = match disk.read(key).await {
            Ok(bytes) => bytes?,
            Err(err) => {
                tracing::debug!(key, error = %err, "disk cache read failed");
                return None;
            }
        };

        match Image::decode(bytes) {
            Ok(image) => Some(image),
            Err(err) => {
                tracing::debug!(key, error = %err, "discarding undecodable disk entry");
                None
            }
        }
    }

    async fn load_from_network(&self, key: &str) -> Result<Image, ImageError> {
        let source = self.source.as_ref().ok_or_else(|| ImageError::Network {
            key: key.to_string(),
            reason: "no image source configured".to_string(),
        })?;

        StatsCounters::bump(&self.stats.network_loads);
        let bytes = source.load(key).await?;
        Image::decode(bytes)
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
