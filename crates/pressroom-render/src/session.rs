//! Per-document session: edit state, caches, page order, and progress
//! events behind one facade.
//!
//! The session owns the sync edit engine and the async caches and keeps
//! them consistent: every applied edit invalidates the page's cached
//! renders before the caller observes the new transform state.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use pressroom_core::{
    recipe, Destination, EditCommand, EditEngine, EventBus, PageState, PrintSettings,
    ProgressEvent, Recipe, SourceFile, Subscription, ValidationReport,
};

use crate::error::{RenderResult, SessionError};
use crate::pixel;
use crate::preview::PreviewCache;
use crate::rasterizer::{LoadedDocument, PageCanvas, Rasterizer};
use crate::thumbs::{ThumbKey, ThumbnailCache, THUMB_MAX_EDGE};

pub struct DocumentSession {
    rasterizer: Arc<dyn Rasterizer>,
    engine: Mutex<EditEngine>,
    page_state: Mutex<PageState>,
    previews: PreviewCache,
    thumbnails: ThumbnailCache,
    events: EventBus,
    source: Mutex<Option<SourceFile>>,
    warmup: Mutex<Option<JoinHandle<()>>>,
}

impl DocumentSession {
    pub fn new(rasterizer: Arc<dyn Rasterizer>) -> Arc<Self> {
        Arc::new(Self {
            previews: PreviewCache::new(Arc::clone(&rasterizer)),
            rasterizer,
            engine: Mutex::new(EditEngine::new()),
            page_state: Mutex::new(PageState::new()),
            thumbnails: ThumbnailCache::default(),
            events: EventBus::new(),
            source: Mutex::new(None),
            warmup: Mutex::new(None),
        })
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&ProgressEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.events.subscribe(listener)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Parse a document, register its pages, render the first page before
    /// returning,
    /// and warm the remaining previews and thumbnails in the background.
    pub async fn load(
        self: &Arc<Self>,
        bytes: &[u8],
        file_name: &str,
        file_size: u64,
        preview_width: u32,
        preview_height: u32,
    ) -> Result<LoadedDocument, SessionError> {
        let document = match self.rasterizer.load(bytes, file_name).await {
            Ok(document) => document,
            Err(err) => {
                self.events.emit(&ProgressEvent::LoadError {
                    error: err.to_string(),
                });
                return Err(err.into());
            }
        };

        {
            let mut engine = lock(&self.engine);
            for info in &document.pages {
                engine.store_mut().register_page(info.clone());
            }
            *lock(&self.page_state) =
                PageState::from_pages(document.pages.iter().map(|p| p.page_number));
            self.previews
                .register_pages(document.pages.iter().map(|p| p.page_number));
            *lock(&self.source) = Some(SourceFile {
                file_name: file_name.to_string(),
                file_size,
                file_type: file_type_of(file_name),
                total_pages: document.total_pages,
            });
        }

        self.events.emit(&ProgressEvent::LoadStart {
            total_pages: document.total_pages,
        });

        // First page renders before load returns so the UI has something to
        // show immediately.
        if document.total_pages > 0 {
            if let Err(err) = self.ensure_preview(1, preview_width, preview_height).await {
                warn!(error = %err, "first page preview failed during load");
            }
            self.events.emit(&ProgressEvent::LoadProgress {
                progress: 1.0 / document.total_pages as f32,
                page_number: Some(1),
            });
        }

        let session = Arc::clone(self);
        let total = document.total_pages;
        let handle = tokio::spawn(async move {
            // Page 1's preview is already rendered; its thumbnail is not.
            if total > 0 {
                if let Err(err) = session.ensure_thumbnail(1, THUMB_MAX_EDGE, false).await {
                    warn!(page = 1, error = %err, "background thumbnail failed");
                }
            }
            for page in 2..=total {
                if let Err(err) = session
                    .ensure_preview(page, preview_width, preview_height)
                    .await
                {
                    warn!(page, error = %err, "background preview failed");
                }
                if let Err(err) = session.ensure_thumbnail(page, THUMB_MAX_EDGE, false).await {
                    warn!(page, error = %err, "background thumbnail failed");
                }
                session.events.emit(&ProgressEvent::LoadProgress {
                    progress: page as f32 / total as f32,
                    page_number: Some(page),
                });
            }
            session.events.emit(&ProgressEvent::LoadComplete {
                total_pages: total,
            });
        });
        *lock(&self.warmup) = Some(handle);

        Ok(document)
    }

    /// Wait for the background warm-up spawned by [`load`] to finish.
    pub async fn wait_for_warmup(&self) {
        let handle = lock(&self.warmup).take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                warn!(error = %err, "warmup task panicked");
            }
        }
    }

    /// Apply an edit to a page. Applied edits invalidate the page's cached
    /// renders before this returns.
    pub fn apply_edit(&self, page: u32, command: EditCommand) -> pressroom_core::EditOutcome {
        let outcome = lock(&self.engine).apply(page, command);
        if outcome.applied {
            self.previews.invalidate(page);
            self.thumbnails.invalidate_page(page);
        }
        outcome
    }

    /// Copy one page's transforms onto every other page, invalidating
    /// everything.
    pub fn apply_to_all(&self, source_page: u32) {
        lock(&self.engine).apply_to_all(source_page);
        self.previews.invalidate_all();
        self.thumbnails.clear();
        debug!(source_page, "applied transforms to all pages");
    }

    /// Reset every page to identity transforms.
    pub fn reset_all(&self) {
        lock(&self.engine).reset_all();
        self.previews.invalidate_all();
        self.thumbnails.clear();
    }

    /// Current transforms for a page (identity when never edited).
    pub fn transforms(&self, page: u32) -> pressroom_core::PageTransforms {
        lock(&self.engine).store().transforms(page)
    }

    /// Render (or fetch) the page's transformed preview.
    pub async fn ensure_preview(
        &self,
        page: u32,
        width: u32,
        height: u32,
    ) -> RenderResult<Arc<PageCanvas>> {
        self.events
            .emit(&ProgressEvent::RenderStart { page_number: page });
        let transforms = self.transforms(page);
        let canvas = self.previews.ensure(page, &transforms, width, height).await?;
        self.events
            .emit(&ProgressEvent::RenderComplete { page_number: page });
        Ok(canvas)
    }

    /// Render (or fetch) the page's thumbnail. `raw` skips crop and
    /// rotation for surfaces that apply transforms at display time.
    pub async fn ensure_thumbnail(
        &self,
        page: u32,
        max_edge: u32,
        raw: bool,
    ) -> RenderResult<Arc<PageCanvas>> {
        let key = ThumbKey {
            page,
            version: self.previews.version(page),
            raw,
        };
        if let Some(canvas) = self.thumbnails.get(&key) {
            return Ok(canvas);
        }

        let (width, height) = self
            .rasterizer
            .page_dimensions(page)
            .ok_or(crate::error::RenderError::PageOutOfRange(page))?;
        let longest = width.max(height).max(1.0);
        let scale = max_edge as f64 / longest;

        let base = self.rasterizer.raw_preview(page, scale).await?;
        let canvas = if raw {
            base
        } else {
            pixel::apply_transforms(&base, &self.transforms(page))
        };
        let canvas = Arc::new(pixel::resize_to_fit(&canvas, max_edge)?);

        self.thumbnails.insert(key, Arc::clone(&canvas));
        Ok(canvas)
    }

    pub fn reorder_pages(&self, from: usize, to: usize) -> bool {
        lock(&self.page_state).reorder(from, to)
    }

    pub fn exclude_page(&self, page: u32) {
        lock(&self.page_state).exclude_page(page);
    }

    pub fn include_page(&self, page: u32) {
        lock(&self.page_state).include_page(page);
    }

    /// Included pages in their current order.
    pub fn included_pages(&self) -> Vec<u32> {
        lock(&self.page_state).included()
    }

    /// Snapshot the session into a print-job recipe, with its validation
    /// report.
    pub fn generate_recipe(
        &self,
        print: &PrintSettings,
        shop_id: &str,
    ) -> Result<(Recipe, ValidationReport), SessionError> {
        let source = lock(&self.source)
            .clone()
            .ok_or(SessionError::NoDocument)?;

        self.events.emit(&ProgressEvent::ExportStart);
        let included = self.included_pages();
        let destination = Destination {
            shop_id: shop_id.to_string(),
        };
        let engine = lock(&self.engine);
        let recipe = recipe::generate(&source, print, &destination, &included, engine.store());
        drop(engine);

        let report = recipe::validate(&recipe);
        if report.valid {
            self.events.emit(&ProgressEvent::ExportComplete);
        } else {
            let error = report
                .errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            self.events.emit(&ProgressEvent::ExportError { error });
        }
        Ok((recipe, report))
    }

    /// Drop all cached renders and the loaded document.
    pub fn close(&self) {
        self.previews.clear();
        self.thumbnails.clear();
        *lock(&self.source) = None;
        *lock(&self.page_state) = PageState::new();
        *lock(&self.engine) = EditEngine::new();
    }
}

fn file_type_of(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "unknown".to_string())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeRasterizer;
    use pressroom_core::{CropBox, RotationDelta};

    async fn loaded_session(pages: u32) -> (Arc<DocumentSession>, Arc<FakeRasterizer>) {
        let fake = Arc::new(FakeRasterizer::new(pages));
        let session = DocumentSession::new(fake.clone());
        session
            .load(b"%PDF-1.7", "booklet.pdf", 1024, 80, 100)
            .await
            .unwrap();
        session.wait_for_warmup().await;
        (session, fake)
    }

    #[tokio::test]
    async fn test_load_registers_pages_and_emits_events() {
        let fake = Arc::new(FakeRasterizer::new(3));
        let session = DocumentSession::new(fake.clone());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = session.subscribe(move |event| {
            sink.lock().unwrap().push(event.clone());
        });

        let document = session
            .load(b"%PDF-1.7", "booklet.pdf", 1024, 80, 100)
            .await
            .unwrap();
        session.wait_for_warmup().await;

        assert_eq!(document.total_pages, 3);
        assert_eq!(session.included_pages(), vec![1, 2, 3]);

        let events = seen.lock().unwrap();
        assert!(matches!(
            events.first(),
            Some(ProgressEvent::LoadStart { total_pages: 3 })
        ));
        assert!(events
            .iter()
            .any(|e| matches!(e, ProgressEvent::LoadComplete { total_pages: 3 })));
    }

    #[tokio::test]
    async fn test_recipe_before_load_is_rejected() {
        let fake = Arc::new(FakeRasterizer::new(1));
        let session = DocumentSession::new(fake);

        let err = session
            .generate_recipe(&PrintSettings::default(), "shop-1")
            .unwrap_err();
        assert!(matches!(err, SessionError::NoDocument));
    }

    #[tokio::test]
    async fn test_applied_edit_invalidates_renders() {
        let (session, fake) = loaded_session(2).await;
        let calls_after_load = fake.preview_calls();

        let outcome = session.apply_edit(1, EditCommand::Rotate(RotationDelta::Clockwise));
        assert!(outcome.applied);

        // Rendering again misses the cache.
        session.ensure_preview(1, 80, 100).await.unwrap();
        assert_eq!(fake.preview_calls(), calls_after_load + 1);
    }

    #[tokio::test]
    async fn test_rejected_edit_keeps_caches() {
        let (session, fake) = loaded_session(1).await;
        let calls_after_load = fake.preview_calls();

        // Degenerate crop is rejected.
        let outcome = session.apply_edit(1, EditCommand::Crop(CropBox::new(0.5, 0.5, 0.0, 0.0)));
        assert!(!outcome.applied);

        session.ensure_preview(1, 80, 100).await.unwrap();
        assert_eq!(fake.preview_calls(), calls_after_load);
    }

    #[tokio::test]
    async fn test_apply_to_all_invalidates_every_page() {
        let (session, fake) = loaded_session(3).await;
        session.apply_edit(1, EditCommand::Rotate(RotationDelta::Half));
        let calls_before = fake.preview_calls();

        session.apply_to_all(1);
        for page in 1..=3 {
            assert_eq!(session.transforms(page).rotation, pressroom_core::Rotation::R180);
            session.ensure_preview(page, 80, 100).await.unwrap();
        }
        assert_eq!(fake.preview_calls(), calls_before + 3);
    }

    #[tokio::test]
    async fn test_preview_has_transforms_baked_in() {
        let (session, _fake) = loaded_session(1).await;
        session.apply_edit(1, EditCommand::Rotate(RotationDelta::Clockwise));

        let canvas = session.ensure_preview(1, 80, 100).await.unwrap();
        assert_eq!((canvas.width, canvas.height), (100, 80));
    }

    #[tokio::test]
    async fn test_thumbnail_cached_per_version() {
        let (session, fake) = loaded_session(1).await;
        let raw_calls = fake.raw_calls();

        // Warmed at load; repeat requests hit the cache.
        session.ensure_thumbnail(1, 160, false).await.unwrap();
        session.ensure_thumbnail(1, 160, false).await.unwrap();
        assert_eq!(fake.raw_calls(), raw_calls);

        // Editing bumps the version; the next request re-renders.
        session.apply_edit(1, EditCommand::Rotate(RotationDelta::Clockwise));
        session.ensure_thumbnail(1, 160, false).await.unwrap();
        assert_eq!(fake.raw_calls(), raw_calls + 1);
    }

    #[tokio::test]
    async fn test_warmup_covers_every_page_thumbnail() {
        let (session, fake) = loaded_session(3).await;
        // One thumbnail render per page, first page included.
        assert_eq!(fake.raw_calls(), 3);

        for page in 1..=3 {
            session.ensure_thumbnail(page, 160, false).await.unwrap();
        }
        assert_eq!(fake.raw_calls(), 3);
    }

    #[tokio::test]
    async fn test_raw_thumbnail_skips_transforms() {
        let (session, _fake) = loaded_session(1).await;
        session.apply_edit(1, EditCommand::Rotate(RotationDelta::Clockwise));

        let raw = session.ensure_thumbnail(1, 160, true).await.unwrap();
        let processed = session.ensure_thumbnail(1, 160, false).await.unwrap();

        // Natural page is portrait; the processed thumbnail is rotated to
        // landscape while the raw one keeps the natural orientation.
        assert!(raw.height > raw.width);
        assert!(processed.width > processed.height);
    }

    #[tokio::test]
    async fn test_recipe_reflects_order_and_exclusions() {
        let (session, _fake) = loaded_session(4).await;
        session.exclude_page(2);
        assert!(session.reorder_pages(3, 0));
        session.apply_edit(1, EditCommand::Rotate(RotationDelta::Clockwise));

        let (recipe, report) = session
            .generate_recipe(&PrintSettings::default(), "shop-42")
            .unwrap();

        assert!(report.valid);
        let numbers: Vec<u32> = recipe.pages.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![4, 1, 3]);
        assert_eq!(recipe.destination.shop_id, "shop-42");
        assert!(recipe.pages.iter().any(|p| p.has_edits));
        assert_eq!(recipe.source.file_type, "pdf");
    }

    #[tokio::test]
    async fn test_recipe_with_everything_excluded_is_invalid() {
        let (session, _fake) = loaded_session(2).await;
        session.exclude_page(1);
        session.exclude_page(2);

        let (recipe, report) = session
            .generate_recipe(&PrintSettings::default(), "shop-1")
            .unwrap();

        assert!(recipe.pages.is_empty());
        assert!(!report.valid);
    }

    #[tokio::test]
    async fn test_close_drops_document() {
        let (session, _fake) = loaded_session(2).await;
        session.close();

        assert!(session.included_pages().is_empty());
        let err = session
            .generate_recipe(&PrintSettings::default(), "shop-1")
            .unwrap_err();
        assert!(matches!(err, SessionError::NoDocument));
    }
}
