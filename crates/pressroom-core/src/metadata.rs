//! Per-page transform state storage.
//!
//! The store is a leaf: it validates nothing and never fails. Lookups for
//! pages it has never seen return identity defaults; the edit services in
//! [`crate::edit`] layer validation and remapping on top.

use std::collections::{BTreeMap, HashMap};

use crate::transforms::{CropBox, PageInfo, PageTransforms, Rotation, DEFAULT_SCALE};

/// Owns the transform record for every page of one document.
#[derive(Debug, Default, Clone)]
pub struct MetadataStore {
    /// Immutable page identities, registered once at load.
    pages: BTreeMap<u32, PageInfo>,
    /// Sparse transform map; absent entries read as identity.
    transforms: HashMap<u32, PageTransforms>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page's immutable identity. Re-registering the same page
    /// number replaces the info but keeps its transforms.
    pub fn register_page(&mut self, info: PageInfo) {
        self.pages.insert(info.page_number, info);
    }

    pub fn page_info(&self, page: u32) -> Option<PageInfo> {
        self.pages.get(&page).copied()
    }

    /// All registered page numbers in ascending order.
    pub fn pages(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Current transforms for a page; identity for unknown pages.
    pub fn transforms(&self, page: u32) -> PageTransforms {
        self.transforms.get(&page).cloned().unwrap_or_default()
    }

    pub fn crop(&self, page: u32) -> Option<CropBox> {
        self.transforms.get(&page).and_then(|t| t.crop)
    }

    pub fn set_crop(&mut self, page: u32, crop: Option<CropBox>) {
        self.entry(page).crop = crop;
    }

    pub fn rotation(&self, page: u32) -> Rotation {
        self.transforms
            .get(&page)
            .map(|t| t.rotation)
            .unwrap_or_default()
    }

    pub fn set_rotation(&mut self, page: u32, rotation: Rotation) {
        self.entry(page).rotation = rotation;
    }

    pub fn scale(&self, page: u32) -> f64 {
        self.transforms
            .get(&page)
            .map(|t| t.scale)
            .unwrap_or(DEFAULT_SCALE)
    }

    pub fn set_scale(&mut self, page: u32, scale: f64) {
        self.entry(page).scale = scale;
    }

    pub fn offset(&self, page: u32) -> (f64, f64) {
        self.transforms
            .get(&page)
            .map(|t| (t.offset_x, t.offset_y))
            .unwrap_or((0.0, 0.0))
    }

    pub fn set_offset(&mut self, page: u32, offset_x: f64, offset_y: f64) {
        let entry = self.entry(page);
        entry.offset_x = offset_x;
        entry.offset_y = offset_y;
    }

    pub fn add_offset(&mut self, page: u32, dx: f64, dy: f64) {
        let entry = self.entry(page);
        entry.offset_x += dx;
        entry.offset_y += dy;
    }

    pub fn set_fit_crop_to_page(&mut self, page: u32, fit: bool) {
        self.entry(page).fit_crop_to_page = fit;
    }

    /// True when the page carries any non-identity edit.
    pub fn is_edited(&self, page: u32) -> bool {
        self.transforms
            .get(&page)
            .map(|t| !t.is_identity())
            .unwrap_or(false)
    }

    /// Drop all edits for one page.
    pub fn reset_page(&mut self, page: u32) {
        self.transforms.remove(&page);
    }

    /// Drop all edits for every page. Page identities stay registered.
    pub fn reset_all(&mut self) {
        self.transforms.clear();
    }

    /// Copy `source`'s entire transform set to every other registered page,
    /// independent of any selection.
    pub fn apply_to_all(&mut self, source: u32) {
        let template = self.transforms(source);
        let targets: Vec<u32> = self.pages.keys().copied().filter(|&p| p != source).collect();
        for page in targets {
            self.transforms.insert(page, template.clone());
        }
    }

    fn entry(&mut self, page: u32) -> &mut PageTransforms {
        self.transforms.entry(page).or_default()
    }
}
