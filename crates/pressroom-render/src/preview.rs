//! Versioned asynchronous preview cache.
//!
//! Every page carries a monotonically increasing version counter. Edits
//! bump the version; a render writes its result into the cache only if the
//! page's version is unchanged between render start and render completion.
//! There is no true cancellation: a render made stale by an edit runs to
//! completion and its result is silently discarded at write-back. This is
//! sufficient because renders are idempotent pure functions of
//! `(page, transforms, size)`.
//!
//! At most one render is in flight per page; concurrent callers share the
//! same pending future. A failed render clears its pending entry so the
//! next call retries instead of observing a permanently broken future.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

use pressroom_core::PageTransforms;

use crate::error::{RenderError, RenderResult};
use crate::pixel;
use crate::rasterizer::{PageCanvas, Rasterizer};

/// Cache key: a render is addressed by page, the exact transforms baked
/// into it, and the requested target size.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct PreviewKey {
    pub page: u32,
    /// Stable serialization of the page transforms.
    pub fingerprint: String,
    pub width: u32,
    pub height: u32,
}

impl PreviewKey {
    pub fn new(page: u32, transforms: &PageTransforms, width: u32, height: u32) -> Self {
        Self {
            page,
            fingerprint: transforms.fingerprint(),
            width,
            height,
        }
    }
}

type SharedRender = Shared<BoxFuture<'static, RenderResult<Arc<PageCanvas>>>>;

struct PendingRender {
    key: PreviewKey,
    version: u64,
    future: SharedRender,
}

#[derive(Default)]
struct CacheState {
    /// Per-page version counters, seeded at document load.
    versions: HashMap<u32, u64>,
    /// Completed renders.
    entries: HashMap<PreviewKey, Arc<PageCanvas>>,
    /// At most one in-flight render per page.
    pending: HashMap<u32, PendingRender>,
}

impl CacheState {
    fn version(&self, page: u32) -> u64 {
        self.versions.get(&page).copied().unwrap_or(0)
    }
}

/// The per-document preview cache. One instance per document session; never
/// shared across sessions.
pub struct PreviewCache {
    state: Arc<Mutex<CacheState>>,
    rasterizer: Arc<dyn Rasterizer>,
}

impl PreviewCache {
    pub fn new(rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
            rasterizer,
        }
    }

    /// Seed version counters for every page of the loaded document, so bulk
    /// invalidation reaches pages that have never been rendered.
    pub fn register_pages(&self, pages: impl IntoIterator<Item = u32>) {
        let mut state = lock(&self.state);
        for page in pages {
            state.versions.entry(page).or_insert(0);
        }
    }

    pub fn version(&self, page: u32) -> u64 {
        lock(&self.state).version(page)
    }

    /// True when any completed render for the page is cached.
    pub fn is_cached(&self, page: u32) -> bool {
        lock(&self.state).entries.keys().any(|k| k.page == page)
    }

    pub fn entry_count(&self) -> usize {
        lock(&self.state).entries.len()
    }

    /// Bump the page's version and evict its cache and pending bookkeeping.
    /// An in-flight render is left to finish; the version check discards
    /// its result.
    pub fn invalidate(&self, page: u32) {
        let mut state = lock(&self.state);
        *state.versions.entry(page).or_insert(0) += 1;
        state.entries.retain(|k, _| k.page != page);
        state.pending.remove(&page);
        debug!(page, version = state.version(page), "preview invalidated");
    }

    /// Bump the version of every registered page, not only pages with
    /// cache entries, so renders in flight before a bulk reset are also
    /// discarded.
    pub fn invalidate_all(&self) {
        let mut state = lock(&self.state);
        for version in state.versions.values_mut() {
            *version += 1;
        }
        state.entries.clear();
        state.pending.clear();
    }

    /// Drop all cache, pending, and version state.
    pub fn clear(&self) {
        let mut state = lock(&self.state);
        state.entries.clear();
        state.pending.clear();
        state.versions.clear();
    }

    /// Return the cached render for the key, or start (or join) the render
    /// producing it.
    pub async fn ensure(
        &self,
        page: u32,
        transforms: &PageTransforms,
        width: u32,
        height: u32,
    ) -> RenderResult<Arc<PageCanvas>> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let key = PreviewKey::new(page, transforms, width, height);

        loop {
            enum Plan {
                Hit(Arc<PageCanvas>),
                Join(SharedRender),
                JoinOther(SharedRender),
                Start(SharedRender),
            }

            let plan = {
                let mut state = lock(&self.state);
                if let Some(canvas) = state.entries.get(&key) {
                    Plan::Hit(Arc::clone(canvas))
                } else if let Some(pending) = state.pending.get(&page) {
                    if pending.key == key {
                        Plan::Join(pending.future.clone())
                    } else {
                        Plan::JoinOther(pending.future.clone())
                    }
                } else {
                    let version = state.version(page);
                    let future = render_future(
                        Arc::clone(&self.state),
                        Arc::clone(&self.rasterizer),
                        key.clone(),
                        transforms.clone(),
                        version,
                    )
                    .boxed()
                    .shared();
                    state.pending.insert(
                        page,
                        PendingRender {
                            key: key.clone(),
                            version,
                            future: future.clone(),
                        },
                    );
                    Plan::Start(future)
                }
            };

            match plan {
                Plan::Hit(canvas) => return Ok(canvas),
                Plan::Join(future) | Plan::Start(future) => return future.await,
                // A render for the same page but a different key is in
                // flight; wait for the slot to free up and re-check.
                Plan::JoinOther(future) => {
                    let _ = future.await;
                }
            }
        }
    }
}

/// The actual render: base rasterization, pixel-space transforms, and the
/// version-guarded write-back.
fn render_future(
    state: Arc<Mutex<CacheState>>,
    rasterizer: Arc<dyn Rasterizer>,
    key: PreviewKey,
    transforms: PageTransforms,
    version: u64,
) -> impl std::future::Future<Output = RenderResult<Arc<PageCanvas>>> {
    async move {
        let result = rasterizer
            .preview(key.page, key.width, key.height)
            .await
            .map(|base| pixel::apply_transforms(&base, &transforms));

        let mut state = lock(&state);

        // Remove our own pending entry. A newer render may already occupy
        // the slot; leave that one alone.
        let owns_slot = state
            .pending
            .get(&key.page)
            .is_some_and(|p| p.version == version && p.key == key);
        if owns_slot {
            state.pending.remove(&key.page);
        }

        match result {
            Ok(canvas) => {
                let canvas = Arc::new(canvas);
                if state.version(key.page) == version {
                    state.entries.insert(key.clone(), Arc::clone(&canvas));
                    debug!(page = key.page, version, "preview cached");
                } else {
                    debug!(
                        page = key.page,
                        started = version,
                        current = state.version(key.page),
                        "discarding stale render"
                    );
                }
                Ok(canvas)
            }
            Err(err) => {
                warn!(page = key.page, error = %err, "preview render failed");
                Err(err)
            }
        }
    }
}

fn lock(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
