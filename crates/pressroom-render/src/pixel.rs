//! Pixel-space application of page transforms.
//!
//! The rasterizer delivers untransformed base renders; these functions
//! apply the committed crop and rotation to produce what the user actually
//! sees. Because rotation is restricted to cardinal angles the rotate is an
//! exact index remap - no interpolation, no resampling loss.
//!
//! Scale and translate are display-time concerns and are never baked into
//! cached pixels.

use pressroom_core::{CropBox, PageTransforms, Rotation};

use crate::error::{RenderError, RenderResult};
use crate::rasterizer::PageCanvas;

/// Crop a canvas using a normalized crop box.
///
/// The box is specified relative to the canvas dimensions, so the same crop
/// applies to any render size. Coordinates beyond the canvas are clamped
/// and the output is never smaller than 1x1.
pub fn crop_pixels(canvas: &PageCanvas, crop: &CropBox) -> PageCanvas {
    // Fast path: full crop returns a clone
    if crop.x <= 0.0 && crop.y <= 0.0 && crop.width >= 1.0 && crop.height >= 1.0 {
        return canvas.clone();
    }

    let src_w = canvas.width as f64;
    let src_h = canvas.height as f64;

    let px_left = (crop.x.clamp(0.0, 1.0) * src_w).round() as u32;
    let px_top = (crop.y.clamp(0.0, 1.0) * src_h).round() as u32;
    let px_width = (crop.width.clamp(0.0, 1.0) * src_w).round() as u32;
    let px_height = (crop.height.clamp(0.0, 1.0) * src_h).round() as u32;

    // Clamp to canvas bounds
    let px_left = px_left.min(canvas.width.saturating_sub(1));
    let px_top = px_top.min(canvas.height.saturating_sub(1));
    let px_right = (px_left + px_width).min(canvas.width);
    let px_bottom = (px_top + px_height).min(canvas.height);

    let out_width = px_right.saturating_sub(px_left).max(1);
    let out_height = px_bottom.saturating_sub(px_top).max(1);

    let mut output = vec![0u8; (out_width * out_height * 3) as usize];

    for y in 0..out_height {
        let src_y = px_top + y;
        let src_row_start = ((src_y * canvas.width + px_left) * 3) as usize;
        let dst_row_start = (y * out_width * 3) as usize;
        let row_len = (out_width * 3) as usize;
        output[dst_row_start..dst_row_start + row_len]
            .copy_from_slice(&canvas.pixels[src_row_start..src_row_start + row_len]);
    }

    PageCanvas::new(out_width, out_height, output)
}

/// Rotate a canvas by a cardinal angle, clockwise.
pub fn rotate_cardinal(canvas: &PageCanvas, rotation: Rotation) -> PageCanvas {
    if rotation == Rotation::R0 {
        return canvas.clone();
    }

    let (src_w, src_h) = (canvas.width, canvas.height);
    let (dst_w, dst_h) = if rotation.swaps_dimensions() {
        (src_h, src_w)
    } else {
        (src_w, src_h)
    };

    let mut output = vec![0u8; (dst_w * dst_h * 3) as usize];

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            // Inverse mapping: which source pixel lands here.
            let (src_x, src_y) = match rotation {
                Rotation::R90 => (dst_y, src_h - 1 - dst_x),
                Rotation::R180 => (src_w - 1 - dst_x, src_h - 1 - dst_y),
                Rotation::R270 => (src_w - 1 - dst_y, dst_x),
                Rotation::R0 => (dst_x, dst_y),
            };
            let src_idx = ((src_y * src_w + src_x) * 3) as usize;
            let dst_idx = ((dst_y * dst_w + dst_x) * 3) as usize;
            output[dst_idx..dst_idx + 3].copy_from_slice(&canvas.pixels[src_idx..src_idx + 3]);
        }
    }

    PageCanvas::new(dst_w, dst_h, output)
}

/// Shrink a canvas so its longest edge fits within `max_edge`, preserving
/// aspect ratio. Canvases already small enough are returned unchanged.
pub fn resize_to_fit(canvas: &PageCanvas, max_edge: u32) -> RenderResult<PageCanvas> {
    if max_edge == 0 {
        return Err(RenderError::InvalidDimensions {
            width: max_edge,
            height: max_edge,
        });
    }
    let longest = canvas.width.max(canvas.height);
    if longest <= max_edge {
        return Ok(canvas.clone());
    }

    let ratio = max_edge as f64 / longest as f64;
    let width = ((canvas.width as f64 * ratio).round() as u32).max(1);
    let height = ((canvas.height as f64 * ratio).round() as u32).max(1);

    let rgb = canvas.to_rgb_image().ok_or(RenderError::InvalidDimensions {
        width: canvas.width,
        height: canvas.height,
    })?;
    let resized = image::imageops::resize(&rgb, width, height, image::imageops::FilterType::Triangle);
    Ok(PageCanvas::from_rgb_image(resized))
}

/// Apply a page's committed transforms to a base render: crop first, then
/// rotation. Scale and translate stay display-time.
pub fn apply_transforms(canvas: &PageCanvas, transforms: &PageTransforms) -> PageCanvas {
    let cropped = match &transforms.crop {
        Some(crop) => crop_pixels(canvas, crop),
        None => canvas.clone(),
    };
    rotate_cardinal(&cropped, transforms.rotation)
}
