//! Deterministic rasterizer fake for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use pressroom_core::PageInfo;

use crate::error::{RenderError, RenderResult};
use crate::rasterizer::{LoadedDocument, PageCanvas, Rasterizer};

/// In-memory rasterizer producing solid-color canvases. Supports gating
/// renders behind a semaphore (to hold them in flight) and injecting a
/// fixed number of failures.
pub struct FakeRasterizer {
    pages: Vec<PageInfo>,
    preview_calls: AtomicUsize,
    raw_calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
    failures_left: AtomicUsize,
}

impl FakeRasterizer {
    pub fn new(total_pages: u32) -> Self {
        Self {
            pages: (1..=total_pages)
                .map(|n| PageInfo::new(n, 612.0, 792.0))
                .collect(),
            preview_calls: AtomicUsize::new(0),
            raw_calls: AtomicUsize::new(0),
            gate: None,
            failures_left: AtomicUsize::new(0),
        }
    }

    /// A rasterizer whose renders block until the returned semaphore gets a
    /// permit. The call counter is incremented before blocking, so tests
    /// can observe that a render is in flight.
    pub fn gated(total_pages: u32) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let mut fake = Self::new(total_pages);
        fake.gate = Some(Arc::clone(&gate));
        (fake, gate)
    }

    /// A rasterizer that fails the first `failures` preview calls and
    /// succeeds afterwards.
    pub fn failing(total_pages: u32, failures: usize) -> Self {
        let fake = Self::new(total_pages);
        fake.failures_left.store(failures, Ordering::SeqCst);
        fake
    }

    pub fn preview_calls(&self) -> usize {
        self.preview_calls.load(Ordering::SeqCst)
    }

    pub fn raw_calls(&self) -> usize {
        self.raw_calls.load(Ordering::SeqCst)
    }

    fn check_page(&self, page: u32) -> RenderResult<&PageInfo> {
        self.pages
            .get(page.checked_sub(1).ok_or(RenderError::PageOutOfRange(page))? as usize)
            .ok_or(RenderError::PageOutOfRange(page))
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
    }
}

#[async_trait]
impl Rasterizer for FakeRasterizer {
    async fn load(&self, bytes: &[u8], file_name: &str) -> RenderResult<LoadedDocument> {
        let _ = bytes;
        Ok(LoadedDocument {
            document_id: file_name.to_string(),
            total_pages: self.pages.len() as u32,
            pages: self.pages.clone(),
        })
    }

    async fn preview(&self, page: u32, width: u32, height: u32) -> RenderResult<PageCanvas> {
        self.preview_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;
        if self.failures_left.load(Ordering::SeqCst) > 0 {
            self.failures_left.fetch_sub(1, Ordering::SeqCst);
            return Err(RenderError::Rasterizer("synthetic failure".to_string()));
        }
        self.check_page(page)?;
        // Encode the page number into the color so outputs are
        // distinguishable.
        Ok(PageCanvas::solid(width, height, [page as u8, 0, 0]))
    }

    async fn raw_preview(&self, page: u32, scale: f64) -> RenderResult<PageCanvas> {
        self.raw_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;
        let info = self.check_page(page)?;
        let width = ((info.width * scale).round() as u32).max(1);
        let height = ((info.height * scale).round() as u32).max(1);
        Ok(PageCanvas::solid(width, height, [page as u8, 0, 0]))
    }

    fn page_dimensions(&self, page: u32) -> Option<(f64, f64)> {
        self.check_page(page).ok().map(|info| (info.width, info.height))
    }
}
