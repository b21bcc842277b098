//! Memory tier: LRU with a byte-cost budget.

use super::image::Image;
use lru::LruCache;

/// Least-recently-used image map bounded by total [`Image::cost`].
#[derive(Debug)]
pub struct MemoryCache {
    entries: LruCache<String, Image>,
    limit_bytes: usize,
    used_bytes: usize,
}

impl MemoryCache {
    /// Empty tier holding at most `limit_bytes` of image cost.
    pub fn new(limit_bytes: usize) -> Self {
        Self {
            entries: LruCache::unbounded(),
            limit_bytes,
            used_bytes: 0,
        }
    }

    /// Look up `key` and mark it most recently used.
    pub fn get(&mut self, key: &str) -> Option<Image> {
        self.entries.get(key).cloned()
    }

    /// Look up `key` without touching recency.
    pub fn peek(&self, key: &str) -> Option<Image> {
        self.entries.peek(key).cloned()
    }

    /// Insert `image`, evicting least-recently-used entries over budget.
    ///
    /// An image costing more than the whole budget is not stored, and any
    /// earlier entry for `key` is dropped so it cannot be served stale.
    /// Returns the keys evicted to make room.
    pub fn insert(&mut self, key: String, image: Image) -> Vec<String> {
        let cost = image.cost();
        if cost > self.limit_bytes {
            tracing::debug!(key = %key, cost, limit = self.limit_bytes, "image exceeds memory budget");
            self.remove(&key);
            return Vec::new();
        }

        if let Some(previous) = self.entries.put(key, image) {
            self.used_bytes -= previous.cost();
        }
        self.used_bytes += cost;

        let mut evicted = Vec::new();
        while self.used_bytes > self.limit_bytes {
            let Some((old_key, old_image)) = self.entries.pop_lru() else {
                break;
            };
            self.used_bytes -= old_image.cost();
            evicted.push(old_key);
        }
        evicted
    }

    /// Drop `key`; returns whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.entries.pop(key) {
            Some(image) => {
                self.used_bytes -= image.cost();
                true
            }
            None => false,
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.used_bytes = 0;
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total cost of cached images.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Cost budget.
    pub fn limit_bytes(&self) -> usize {
        self.limit_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_cache::image::png_bytes;

    fn image() -> Image {
        Image::decode(png_bytes(8, 8)).expect("decode")
    }

    #[test]
    fn insert_then_get() {
        let mut cache = MemoryCache::new(1 << 20);
        cache.insert("a".into(), image());
        assert!(cache.get("a").is_some());
        assert_eq!(cache.used_bytes(), image().cost());
    }

    #[test]
    fn evicts_least_recently_used_over_budget() {
        let cost = image().cost();
        let mut cache = MemoryCache::new(cost * 2);
        cache.insert("a".into(), image());
        cache.insert("b".into(), image());
        // touch "a" so "b" becomes the eviction candidate
        cache.get("a");

        let evicted = cache.insert("c".into(), image());

        assert_eq!(evicted, vec!["b".to_string()]);
        assert!(cache.peek("a").is_some());
        assert!(cache.peek("b").is_none());
        assert!(cache.used_bytes() <= cache.limit_bytes());
    }

    #[test]
    fn peek_does_not_promote() {
        let cost = image().cost();
        let mut cache = MemoryCache::new(cost * 2);
        cache.insert("a".into(), image());
        cache.insert("b".into(), image());
        cache.peek("a");

        let evicted = cache.insert("c".into(), image());

        assert_eq!(evicted, vec!["a".to_string()]);
    }

    #[test]
    fn oversized_image_is_not_stored() {
        let mut cache = MemoryCache::new(16);
        cache.insert("big".into(), image());
        assert!(cache.is_empty());
        assert_eq!(cache.used_bytes(), 0);
    }

    #[test]
    fn oversized_replacement_drops_previous_entry() {
        let small = image();
        let mut cache = MemoryCache::new(small.cost() * 2);
        cache.insert("a".into(), small);
        let big = Image::decode(png_bytes(64, 64)).expect("decode");
        assert!(big.cost() > cache.limit_bytes());

        let evicted = cache.insert("a".into(), big);

        assert!(evicted.is_empty());
        assert!(cache.peek("a").is_none());
        assert!(cache.is_empty());
        assert_eq!(cache.used_bytes(), 0);
    }

    #[test]
    fn replacing_a_key_does_not_double_count() {
        let mut cache = MemoryCache::new(1 << 20);
        cache.insert("a".into(), image());
        cache.insert("a".into(), image());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.used_bytes(), image().cost());
    }

    #[test]
    fn remove_and_clear_release_budget() {
        let mut cache = MemoryCache::new(1 << 20);
        cache.insert("a".into(), image());
        cache.insert("b".into(), image());

        assert!(cache.remove("a"));
        assert!(!cache.remove("a"));
        assert_eq!(cache.used_bytes(), image().cost());

        cache.clear();
        assert_eq!(cache.used_bytes(), 0);
        assert!(cache.is_empty());
    }
}
