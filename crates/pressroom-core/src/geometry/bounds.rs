//! Canvas-space bounds and the forward/inverse box mapping.
//!
//! The mapping works on axis-aligned boxes only. Because rotation is
//! restricted to cardinal angles, a rotated axis-aligned box is still
//! axis-aligned, which is what makes the forward/inverse pair exactly
//! invertible.

use crate::transforms::{CropBox, Rotation};

/// Normalized canvas-space box occupied by rotated and scaled content,
/// centered in the unit slot.
///
/// `scale_factor` is a fraction (1.0 = 100%). `content_ar` and `slot_ar`
/// are width-over-height ratios of the unrotated page and the display slot.
///
/// The result is intentionally NOT clamped to `[0, 1]`: at scale > 100%
/// content legitimately overflows the canvas and crop-handle math needs the
/// true, possibly negative-origin bounds.
pub fn content_bounds(
    rotation: Rotation,
    scale_factor: f64,
    content_ar: f64,
    slot_ar: f64,
) -> CropBox {
    let (width, height) = if rotation.swaps_dimensions() {
        // Rotated content's long axis becomes the canvas's other axis.
        (scale_factor / content_ar, scale_factor * content_ar)
    } else {
        (scale_factor, scale_factor * slot_ar / content_ar)
    };
    CropBox::new((1.0 - width) / 2.0, (1.0 - height) / 2.0, width, height)
}

/// Rotate a point of the unit square clockwise by a cardinal angle.
#[inline]
pub fn rotate_point(x: f64, y: f64, rotation: Rotation) -> (f64, f64) {
    match rotation {
        Rotation::R0 => (x, y),
        Rotation::R90 => (1.0 - y, x),
        Rotation::R180 => (1.0 - x, 1.0 - y),
        Rotation::R270 => (y, 1.0 - x),
    }
}

/// Rotate a box by rotating its four corners and taking the axis-aligned
/// bounding box of the results.
pub fn rotate_box(b: &CropBox, rotation: Rotation) -> CropBox {
    let corners = [
        rotate_point(b.x, b.y, rotation),
        rotate_point(b.right(), b.y, rotation),
        rotate_point(b.x, b.bottom(), rotation),
        rotate_point(b.right(), b.bottom(), rotation),
    ];
    let min_x = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);
    CropBox::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Map a content-space box to canvas space: rotate, fit through the content
/// bounds, then translate.
pub fn forward_transform_box(
    content_box: &CropBox,
    rotation: Rotation,
    scale_factor: f64,
    content_ar: f64,
    slot_ar: f64,
    offset: (f64, f64),
) -> CropBox {
    let rotated = rotate_box(content_box, rotation);
    let bounds = content_bounds(rotation, scale_factor, content_ar, slot_ar);
    CropBox::new(
        bounds.x + rotated.x * bounds.width + offset.0,
        bounds.y + rotated.y * bounds.height + offset.1,
        rotated.width * bounds.width,
        rotated.height * bounds.height,
    )
}

/// Algebraic inverse of [`forward_transform_box`]: unmap the offset, invert
/// the content-bounds mapping, then unrotate.
pub fn inverse_transform_box(
    canvas_box: &CropBox,
    rotation: Rotation,
    scale_factor: f64,
    content_ar: f64,
    slot_ar: f64,
    offset: (f64, f64),
) -> CropBox {
    let bounds = content_bounds(rotation, scale_factor, content_ar, slot_ar);
    let unmapped = CropBox::new(
        (canvas_box.x - offset.0 - bounds.x) / bounds.width,
        (canvas_box.y - offset.1 - bounds.y) / bounds.height,
        canvas_box.width / bounds.width,
        canvas_box.height / bounds.height,
    );
    rotate_box(&unmapped, rotation.inverse())
}

/// Intersect a box with the unit square. Degenerate intersections collapse
/// to a zero-size box clamped into `[0, 1]`.
pub fn intersect_unit(b: &CropBox) -> CropBox {
    let x0 = b.x.clamp(0.0, 1.0);
    let y0 = b.y.clamp(0.0, 1.0);
    let x1 = b.right().clamp(0.0, 1.0);
    let y1 = b.bottom().clamp(0.0, 1.0);
    CropBox::new(x0, y0, (x1 - x0).max(0.0), (y1 - y0).max(0.0))
}

/// The sub-region of the page, in content coordinates, currently visible on
/// the unit canvas.
///
/// At scale <= 100% this is the whole page; when content overflows the
/// canvas only part of the page is addressable and crop handles must be
/// constrained to this window.
pub fn visible_content_window(
    rotation: Rotation,
    scale_factor: f64,
    content_ar: f64,
    slot_ar: f64,
    offset: (f64, f64),
) -> CropBox {
    let window = inverse_transform_box(
        &CropBox::full(),
        rotation,
        scale_factor,
        content_ar,
        slot_ar,
        offset,
    );
    intersect_unit(&window)
}
