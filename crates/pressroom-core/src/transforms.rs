//! Core types for per-page edit state.
//!
//! Every page of a loaded document carries a [`PageTransforms`] record
//! describing the edits the user has made so far. The record is a pure
//! description - nothing here touches pixels. At render time the transforms
//! are applied in a fixed order regardless of the order the user issued them:
//!
//! 1. Crop (selects a sub-region of the original page)
//! 2. Rotation (cardinal only: 0/90/180/270 clockwise)
//! 3. Scale (percent of the target slot)
//! 4. Translate (normalized offset)
//!
//! # Coordinate System
//!
//! - (0.0, 0.0) = top-left corner of the original, unrotated page
//! - (1.0, 1.0) = bottom-right corner
//! - Crop boxes are stored in this pre-rotation frame

use serde::{Deserialize, Serialize};

/// Minimum page scale, percent.
pub const MIN_SCALE: f64 = 10.0;
/// Maximum page scale, percent.
pub const MAX_SCALE: f64 = 500.0;
/// Identity scale, percent.
pub const DEFAULT_SCALE: f64 = 100.0;

/// Float slack allowed on crop bounds checks.
pub const CROP_EPSILON: f64 = 0.01;
/// Smallest legal crop edge, normalized.
pub const MIN_CROP_SIZE: f64 = 0.01;

/// A normalized rectangle selecting a sub-region of content space.
///
/// All four fields are fractions of the original page dimensions. Boxes
/// produced by the canvas-space geometry may legitimately fall outside
/// `[0, 1]` (overflowing content at scale > 100%); boxes stored as crops
/// must satisfy the bounds invariants checked by `within_bounds`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole page.
    pub fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the box covers the entire page (within epsilon).
    pub fn is_full_page(&self) -> bool {
        self.x.abs() <= CROP_EPSILON
            && self.y.abs() <= CROP_EPSILON
            && (self.width - 1.0).abs() <= CROP_EPSILON
            && (self.height - 1.0).abs() <= CROP_EPSILON
    }

    /// Checks the storage invariants for crops: non-degenerate size and
    /// edges inside the page, with float slack.
    pub fn within_bounds(&self) -> bool {
        self.x >= -CROP_EPSILON
            && self.y >= -CROP_EPSILON
            && self.width >= MIN_CROP_SIZE
            && self.height >= MIN_CROP_SIZE
            && self.right() <= 1.0 + CROP_EPSILON
            && self.bottom() <= 1.0 + CROP_EPSILON
    }

    /// Field-wise comparison within a tolerance.
    pub fn approx_eq(&self, other: &CropBox, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}

/// Cardinal page rotation, clockwise.
///
/// Rotation is always one of the four cardinal values - never an arbitrary
/// angle. Serialized as plain degrees so the recipe JSON reads naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u16", from = "u16")]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Normalize an arbitrary degree value and snap to the nearest cardinal.
    pub fn from_degrees(degrees: i32) -> Self {
        let normalized = degrees.rem_euclid(360);
        // Round to the nearest quarter turn; 360 wraps back to 0.
        let quarter = ((normalized as f64 / 90.0).round() as i32).rem_euclid(4);
        match quarter {
            1 => Rotation::R90,
            2 => Rotation::R180,
            3 => Rotation::R270,
            _ => Rotation::R0,
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    /// Apply a relative turn.
    pub fn rotated_by(self, delta: RotationDelta) -> Self {
        Rotation::from_degrees(self.degrees() as i32 + delta.degrees())
    }

    /// The rotation that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R0,
            Rotation::R90 => Rotation::R270,
            Rotation::R180 => Rotation::R180,
            Rotation::R270 => Rotation::R90,
        }
    }

    /// Returns true if this rotation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::R90 | Rotation::R270)
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> u16 {
        rotation.degrees()
    }
}

impl From<u16> for Rotation {
    fn from(degrees: u16) -> Rotation {
        Rotation::from_degrees(degrees as i32)
    }
}

/// Relative rotation steps the UI can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDelta {
    /// Quarter turn clockwise (+90).
    Clockwise,
    /// Quarter turn counter-clockwise (-90).
    CounterClockwise,
    /// Half turn (180).
    Half,
}

impl RotationDelta {
    pub fn degrees(self) -> i32 {
        match self {
            RotationDelta::Clockwise => 90,
            RotationDelta::CounterClockwise => -90,
            RotationDelta::Half => 180,
        }
    }
}

/// The full per-page edit description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTransforms {
    /// Crop in the pre-rotation content frame, `None` = uncropped.
    pub crop: Option<CropBox>,
    /// Cardinal rotation, clockwise.
    pub rotation: Rotation,
    /// Scale percent in `[MIN_SCALE, MAX_SCALE]`.
    pub scale: f64,
    /// Normalized horizontal translation.
    pub offset_x: f64,
    /// Normalized vertical translation.
    pub offset_y: f64,
    /// Enlarge the cropped region to fill the sheet when printing.
    /// Carried at the recipe page level, not part of the transform chain.
    #[serde(skip)]
    pub fit_crop_to_page: bool,
}

impl Default for PageTransforms {
    fn default() -> Self {
        Self {
            crop: None,
            rotation: Rotation::R0,
            scale: DEFAULT_SCALE,
            offset_x: 0.0,
            offset_y: 0.0,
            fit_crop_to_page: false,
        }
    }
}

impl PageTransforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    pub fn is_cropped(&self) -> bool {
        self.crop.is_some()
    }

    /// Stable serialized form used as a render cache key component.
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Immutable page identity created once at document load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page_number: u32,
    /// Original page width, in the rasterizer's units.
    pub width: f64,
    /// Original page height, in the rasterizer's units.
    pub height: f64,
}

impl PageInfo {
    pub fn new(page_number: u32, width: f64, height: f64) -> Self {
        Self {
            page_number,
            width,
            height,
        }
    }

    /// Width over height of the unrotated page.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Effective dimensions after a rotation is applied.
    pub fn rotated_dimensions(&self, rotation: Rotation) -> (f64, f64) {
        if rotation.swaps_dimensions() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}
