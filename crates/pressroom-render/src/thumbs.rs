//! LRU thumbnail cache.
//!
//! Thumbnails are small enough to cache aggressively but numerous enough
//! that an unbounded map would grow with document size, so the cache is a
//! capacity-bounded LRU. Keys carry the page version; after an edit the old
//! thumbnail is simply never asked for again and ages out, in addition to
//! the explicit invalidation the session performs.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;
use tracing::debug;

use crate::rasterizer::PageCanvas;

/// Default number of thumbnails kept in memory.
pub const DEFAULT_THUMB_CAPACITY: usize = 64;

/// Default longest-edge size for generated thumbnails, in pixels.
pub const THUMB_MAX_EDGE: u32 = 160;

/// Thumbnail cache key. `raw` distinguishes untransformed base thumbnails
/// from thumbnails with crop and rotation baked in.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct ThumbKey {
    pub page: u32,
    pub version: u64,
    pub raw: bool,
}

pub struct ThumbnailCache {
    inner: Mutex<LruCache<ThumbKey, Arc<PageCanvas>>>,
}

impl ThumbnailCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(DEFAULT_THUMB_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, key: &ThumbKey) -> Option<Arc<PageCanvas>> {
        self.lock().get(key).cloned()
    }

    pub fn insert(&self, key: ThumbKey, canvas: Arc<PageCanvas>) {
        let mut cache = self.lock();
        if let Some((evicted, _)) = cache.push(key, canvas) {
            debug!(page = evicted.page, version = evicted.version, "thumbnail evicted");
        }
    }

    /// Drop every thumbnail for a page, across versions and raw/processed
    /// variants.
    pub fn invalidate_page(&self, page: u32) {
        let mut cache = self.lock();
        let stale: Vec<ThumbKey> = cache
            .iter()
            .filter(|(key, _)| key.page == page)
            .map(|(key, _)| key.clone())
            .collect();
        for key in stale {
            cache.pop(&key);
        }
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<ThumbKey, Arc<PageCanvas>>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ThumbnailCache {
    fn default() -> Self {
        Self::new(DEFAULT_THUMB_CAPACITY)
    }
}
