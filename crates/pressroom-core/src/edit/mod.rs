//! Edit services and the single-entry-point orchestrator.
//!
//! [`EditEngine`] wraps a [`MetadataStore`] and layers the validation and
//! remapping rules on top of the raw storage: crop bounds checking, the
//! crop remap that accompanies every rotation change, and scale clamping.
//!
//! The orchestrator never reorders or reinterprets edits. Composition order
//! is enforced only at render time by the coordinate math, so issuing
//! rotate-then-scale vs scale-then-rotate produces identical final geometry.
//!
//! # Error Handling
//!
//! Validation failures are soft: out-of-range input is clamped or rejected
//! by returning `false`, never by panicking or erroring. Callers must check
//! [`EditOutcome::applied`].

mod crop;
mod rotation;
mod scale;

pub use crop::{centered_crop, full_crop};
pub use rotation::rotated_dimensions;
pub use scale::{clamp_scale, fit_scale, FitMode, ZOOM_STEP};

use crate::metadata::MetadataStore;
use crate::transforms::{CropBox, PageTransforms, Rotation, RotationDelta};

/// A single page edit, dispatched exhaustively by [`EditEngine::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Set (or replace) the crop box, in the pre-rotation content frame.
    Crop(CropBox),
    /// Remove the crop.
    ClearCrop,
    /// Rotate relative to the current rotation.
    Rotate(RotationDelta),
    /// Set an absolute rotation.
    SetRotation(Rotation),
    /// Set the scale percent (clamped).
    Scale(f64),
    /// Accumulate a normalized translation.
    Translate { dx: f64, dy: f64 },
    /// Drop every edit on the page.
    Reset,
}

/// Result of applying one edit.
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    /// False when the edit was rejected (currently only invalid crops);
    /// state is unchanged in that case.
    pub applied: bool,
    /// The page's transforms after the edit.
    pub transforms: PageTransforms,
}

/// Single entry point for all page edits.
#[derive(Debug, Default, Clone)]
pub struct EditEngine {
    store: MetadataStore,
}

impl EditEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: MetadataStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MetadataStore {
        &mut self.store
    }

    /// Dispatch one edit to the owning service and report the result.
    pub fn apply(&mut self, page: u32, command: EditCommand) -> EditOutcome {
        let applied = match command {
            EditCommand::Crop(crop) => self.set_crop(page, crop),
            EditCommand::ClearCrop => {
                self.store.set_crop(page, None);
                true
            }
            EditCommand::Rotate(delta) => {
                self.rotate(page, delta);
                true
            }
            EditCommand::SetRotation(rotation) => {
                self.set_rotation(page, rotation);
                true
            }
            EditCommand::Scale(scale) => {
                self.set_scale(page, scale);
                true
            }
            EditCommand::Translate { dx, dy } => {
                self.store.add_offset(page, dx, dy);
                true
            }
            EditCommand::Reset => {
                self.store.reset_page(page);
                true
            }
        };
        EditOutcome {
            applied,
            transforms: self.store.transforms(page),
        }
    }

    /// Copy `source`'s transforms to every other registered page.
    pub fn apply_to_all(&mut self, source: u32) {
        self.store.apply_to_all(source);
    }

    /// Drop every edit on every page.
    pub fn reset_all(&mut self) {
        self.store.reset_all();
    }
}
