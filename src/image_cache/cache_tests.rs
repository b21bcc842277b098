//! Tests for tier resolution and coalescing.

use super::image::png_bytes;
use super::*;
use async_trait::async_trait;
use std::sync::atomic::AtomicUsize;
use std::time::Duration;

const AVATAR: &str = "https://img.example.com/avatar.png";
const PHOTO: &str = "https://img.example.com/photo.png";
const MISSING: &str = "https://img.example.com/missing.png";
const BUDGET: usize = 1 << 20;

/// Network stand-in serving fixed bytes and counting loads.
struct FakeSource {
    images: HashMap<String, Vec<u8>>,
    loads: AtomicUsize,
    delay: Duration,
}

impl FakeSource {
    fn new(delay: Duration) -> Arc<Self> {
        let images = [(AVATAR, png_bytes(6, 6)), (PHOTO, png_bytes(12, 9))]
            .into_iter()
            .map(|(key, bytes)| (key.to_string(), bytes))
            .collect();
        Arc::new(Self {
            images,
            loads: AtomicUsize::new(0),
            delay,
        })
    }

    fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSource for FakeSource {
    async fn load(&self, key: &str) -> Result<Vec<u8>, ImageError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.images
            .get(key)
            .cloned()
            .ok_or_else(|| ImageError::Network {
                key: key.to_string(),
                reason: "HTTP 404 Not Found".to_string(),
            })
    }
}

fn cache_with(source: &Arc<FakeSource>, dir: &std::path::Path) -> ImageCache {
    ImageCache::new(BUDGET)
        .with_disk(dir)
        .with_source(Arc::clone(source) as Arc<dyn ImageSource>)
}

/// Wait for a background disk write of `key` to land.
async fn wait_for_file(dir: &std::path::Path, key: &str) -> PathBuf {
    let path = DiskCache::new(dir).path_for(key);
    for _ in 0..200 {
        if path.exists() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(path.exists(), "disk write for {key} never landed");
    path
}

/// Wait until `path` holds exactly `expected`.
async fn wait_for_contents(path: &std::path::Path, expected: &[u8]) {
    for _ in 0..200 {
        if std::fs::read(path).is_ok_and(|bytes| bytes == expected) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{} never held the expected bytes", path.display());
}

#[test]
fn put_then_get_hits_memory() {
    let cache = ImageCache::new(BUDGET);
    let image = Image::decode(png_bytes(4, 4)).expect("decode");

    cache.put(AVATAR, image);

    assert_eq!(cache.get(AVATAR).map(|i| i.dimensions()), Some((4, 4)));
}

#[test]
fn oversized_put_does_not_leave_stale_image() {
    let small = Image::decode(png_bytes(4, 4)).expect("decode");
    let cache = ImageCache::new(small.cost() * 2);
    cache.put(AVATAR, small);
    assert_eq!(cache.get(AVATAR).map(|i| i.dimensions()), Some((4, 4)));

    cache.put(AVATAR, Image::decode(png_bytes(64, 64)).expect("decode"));

    assert!(cache.get(AVATAR).is_none());
    assert_eq!(cache.memory_usage(), 0);
}

#[tokio::test]
async fn oversized_put_is_served_from_disk_afterwards() {
    let dir = tempfile::tempdir().expect("tempdir");
    let small = Image::decode(png_bytes(4, 4)).expect("decode");
    let cache = ImageCache::new(small.cost() * 2).with_disk(dir.path());
    let small_bytes = small.encoded().to_vec();
    let path = DiskCache::new(dir.path()).path_for(AVATAR);
    cache.put(AVATAR, small);
    wait_for_contents(&path, &small_bytes).await;

    let big = Image::decode(png_bytes(64, 64)).expect("decode");
    let big_bytes = big.encoded().to_vec();
    cache.put(AVATAR, big);
    wait_for_contents(&path, &big_bytes).await;

    let image = cache.fetch(AVATAR).await.expect("disk");
    assert_eq!(image.dimensions(), (64, 64));
    assert_eq!(cache.stats().disk_hits, 1);
}

#[test]
fn get_miss_has_no_side_effects() {
    let cache = ImageCache::new(BUDGET);
    assert!(cache.get(AVATAR).is_none());
    assert_eq!(cache.stats(), CacheStats::default());
    assert_eq!(cache.in_flight(), 0);
}

#[tokio::test]
async fn network_result_fills_memory_and_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FakeSource::new(Duration::ZERO);
    let cache = cache_with(&source, dir.path());

    let image = cache.fetch(PHOTO).await.expect("image");

    assert_eq!(image.dimensions(), (12, 9));
    assert!(cache.get(PHOTO).is_some());
    wait_for_file(dir.path(), PHOTO).await;
    assert_eq!(cache.stats().network_loads, 1);
    assert_eq!(source.loads(), 1);
}

#[tokio::test]
async fn network_result_does_not_depend_on_disk_write() {
    let dir = tempfile::tempdir().expect("tempdir");
    // a regular file where the cache directory should be
    let blocked = dir.path().join("not-a-dir");
    std::fs::write(&blocked, b"x").expect("seed file");
    let source = FakeSource::new(Duration::ZERO);
    let cache = cache_with(&source, &blocked);

    let image = cache.fetch(PHOTO).await.expect("image");

    assert_eq!(image.dimensions(), (12, 9));
    assert!(cache.get(PHOTO).is_some());
    assert_eq!(cache.in_flight(), 0);
}

#[tokio::test]
async fn second_fetch_hits_memory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FakeSource::new(Duration::ZERO);
    let cache = cache_with(&source, dir.path());

    cache.fetch(AVATAR).await.expect("first");
    cache.fetch(AVATAR).await.expect("second");

    let stats = cache.stats();
    assert_eq!(stats.memory_hits, 1);
    assert_eq!(stats.network_loads, 1);
}

#[tokio::test]
async fn evicted_memory_entry_is_served_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FakeSource::new(Duration::ZERO);
    let cache = cache_with(&source, dir.path());

    cache.fetch(AVATAR).await.expect("network");
    wait_for_file(dir.path(), AVATAR).await;
    assert!(cache.evict_memory(AVATAR));
    assert!(cache.get(AVATAR).is_none());

    let image = cache.fetch(AVATAR).await.expect("disk");

    assert_eq!(image.dimensions(), (6, 6));
    assert_eq!(cache.stats().disk_hits, 1);
    assert_eq!(source.loads(), 1, "disk hit must not reach the network");
    assert!(cache.get(AVATAR).is_some(), "disk hit is promoted to memory");
}

#[tokio::test]
async fn clear_memory_keeps_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FakeSource::new(Duration::ZERO);
    let cache = cache_with(&source, dir.path());

    cache.fetch_many([AVATAR, PHOTO]).await;
    wait_for_file(dir.path(), AVATAR).await;
    wait_for_file(dir.path(), PHOTO).await;
    cache.clear_memory();
    assert_eq!(cache.memory_usage(), 0);

    let images = cache.fetch_many([AVATAR, PHOTO]).await;

    assert_eq!(images.len(), 2);
    assert_eq!(cache.stats().disk_hits, 2);
    assert_eq!(source.loads(), 2);
}

#[tokio::test]
async fn concurrent_fetches_share_one_network_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FakeSource::new(Duration::from_millis(50));
    let cache = cache_with(&source, dir.path());

    let results = join_all((0..8).map(|_| cache.fetch(PHOTO))).await;

    assert!(results.iter().all(Option::is_some));
    assert_eq!(source.loads(), 1);
    assert_eq!(cache.stats().network_loads, 1);
    assert_eq!(cache.in_flight(), 0);
}

#[tokio::test]
async fn concurrent_fetches_across_tasks_share_one_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FakeSource::new(Duration::from_millis(50));
    let cache = Arc::new(cache_with(&source, dir.path()));

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.fetch(AVATAR).await.is_some() })
        })
        .collect();
    for task in tasks {
        assert!(task.await.expect("task"));
    }

    assert_eq!(source.loads(), 1);
}

#[tokio::test]
async fn total_failure_returns_none_and_is_retried_later() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FakeSource::new(Duration::ZERO);
    let cache = cache_with(&source, dir.path());

    assert!(cache.fetch(MISSING).await.is_none());
    assert!(cache.fetch(MISSING).await.is_none());

    assert_eq!(cache.stats().failures, 2);
    assert_eq!(source.loads(), 2, "failures are not cached");
    assert_eq!(cache.in_flight(), 0);
}

#[tokio::test]
async fn undecodable_disk_entry_falls_through_to_network() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FakeSource::new(Duration::ZERO);
    let cache = cache_with(&source, dir.path());
    DiskCache::new(dir.path())
        .write(AVATAR, b"corrupt")
        .await
        .expect("seed disk");

    let image = cache.fetch(AVATAR).await.expect("network");

    assert_eq!(image.dimensions(), (6, 6));
    assert_eq!(cache.stats().disk_hits, 0);
    assert_eq!(source.loads(), 1);
}

#[tokio::test]
async fn fetch_many_returns_only_successes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FakeSource::new(Duration::ZERO);
    let cache = cache_with(&source, dir.path());

    let images = cache.fetch_many(vec![AVATAR, MISSING, PHOTO]).await;

    assert_eq!(images.len(), 2);
    assert_eq!(cache.stats().failures, 1);
}

#[tokio::test]
async fn memory_only_cache_without_source_misses() {
    let cache = ImageCache::new(BUDGET);
    assert!(cache.fetch(AVATAR).await.is_none());
    assert_eq!(cache.stats().failures, 1);
    assert_eq!(cache.stats().network_loads, 0);
}

#[tokio::test]
async fn put_persists_to_disk_in_background() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = ImageCache::new(BUDGET).with_disk(dir.path());
    let image = Image::decode(png_bytes(3, 3)).expect("decode");

    cache.put(AVATAR, image);
    wait_for_file(dir.path(), AVATAR).await;

    cache.clear_memory();
    assert!(cache.fetch(AVATAR).await.is_some());
    assert_eq!(cache.stats().disk_hits, 1);
}
