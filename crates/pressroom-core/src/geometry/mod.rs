//! Coordinate geometry between content space and canvas space.
//!
//! This module provides the pure transform math that maps page edits between
//! two coordinate frames:
//!
//! - **Content space**: normalized `[0, 1]` coordinates of the original,
//!   unrotated page.
//! - **Canvas space**: coordinates after rotation, scale, and translate are
//!   applied, possibly overflowing `[0, 1]` when content is scaled past the
//!   slot.
//!
//! # Transform Order
//!
//! The render-time composition order is fixed: crop, then rotation, then
//! scale, then translate. The functions here enforce that order; callers
//! never need to sequence edits themselves.
//!
//! All functions are stateless and aspect-ratio aware (content aspect ratio
//! and slot aspect ratio are explicit parameters).

mod bounds;
mod crop_math;

pub use bounds::{
    content_bounds, forward_transform_box, intersect_unit, inverse_transform_box, rotate_box,
    rotate_point, visible_content_window,
};
pub use crop_math::{
    adjust_crop_by_handle, clamp_box, compose_crop, decompose_crop, normalize_crop,
    remap_crop_for_rotation, CropHandle,
};
