//! Page ordering, inclusion, and multi-select state.
//!
//! [`PageState`] decides which pages participate in the output and in what
//! order; excluding a page never deletes its metadata. [`SelectionState`] is
//! purely a UI convenience - ephemeral, never persisted, and never consulted
//! by the recipe path except via a page list the caller passes explicitly.

use std::collections::{BTreeSet, HashSet};

/// Output ordering and inclusion for one document.
#[derive(Debug, Default, Clone)]
pub struct PageState {
    /// Current output order of all pages, included or not.
    order: Vec<u32>,
    /// Pages toggled out of the output.
    excluded: HashSet<u32>,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pages(pages: impl IntoIterator<Item = u32>) -> Self {
        Self {
            order: pages.into_iter().collect(),
            excluded: HashSet::new(),
        }
    }

    /// Move the page at index `from` to index `to` within the ordering.
    /// Out-of-range indices are rejected.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.order.len() || to >= self.order.len() {
            return false;
        }
        let page = self.order.remove(from);
        self.order.insert(to, page);
        true
    }

    /// Toggle a page out of the output without touching its metadata.
    pub fn exclude_page(&mut self, page: u32) {
        if self.order.contains(&page) {
            self.excluded.insert(page);
        }
    }

    pub fn include_page(&mut self, page: u32) {
        self.excluded.remove(&page);
    }

    pub fn is_included(&self, page: u32) -> bool {
        self.order.contains(&page) && !self.excluded.contains(&page)
    }

    /// Included pages, in current order.
    pub fn included(&self) -> Vec<u32> {
        self.order
            .iter()
            .copied()
            .filter(|p| !self.excluded.contains(p))
            .collect()
    }

    /// The full ordering, included or not.
    pub fn order(&self) -> &[u32] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Ephemeral multi-select over page numbers.
#[derive(Debug, Default, Clone)]
pub struct SelectionState {
    selected: BTreeSet<u32>,
    /// Anchor for shift-extend.
    last: Option<u32>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with a single page.
    pub fn select_single(&mut self, page: u32) {
        self.selected.clear();
        self.selected.insert(page);
        self.last = Some(page);
    }

    /// Toggle one page in or out of the selection.
    pub fn toggle(&mut self, page: u32) {
        if !self.selected.remove(&page) {
            self.selected.insert(page);
            self.last = Some(page);
        }
    }

    /// Select every page between `a` and `b` inclusive, in either order.
    pub fn select_range(&mut self, a: u32, b: u32) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.selected.extend(lo..=hi);
        self.last = Some(b);
    }

    /// Shift-click behavior: extend from the last anchor to `page`. Without
    /// an anchor this is a single select.
    pub fn extend_from_last(&mut self, page: u32) {
        match self.last {
            Some(anchor) => self.select_range(anchor, page),
            None => self.select_single(page),
        }
    }

    pub fn select_all(&mut self, pages: &[u32]) {
        self.selected.extend(pages.iter().copied());
    }

    pub fn select_odd(&mut self, pages: &[u32]) {
        self.selected.clear();
        self.selected
            .extend(pages.iter().copied().filter(|p| p % 2 == 1));
        self.last = None;
    }

    pub fn select_even(&mut self, pages: &[u32]) {
        self.selected.clear();
        self.selected
            .extend(pages.iter().copied().filter(|p| p % 2 == 0));
        self.last = None;
    }

    /// Invert the selection relative to the given page universe.
    pub fn invert(&mut self, pages: &[u32]) {
        let inverted: BTreeSet<u32> = pages
            .iter()
            .copied()
            .filter(|p| !self.selected.contains(p))
            .collect();
        self.selected = inverted;
        self.last = None;
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.last = None;
    }

    pub fn is_selected(&self, page: u32) -> bool {
        self.selected.contains(&page)
    }

    pub fn selected(&self) -> Vec<u32> {
        self.selected.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
