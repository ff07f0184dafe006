//! Crop box arithmetic: rotation remapping, handle resizing, composition.

use crate::transforms::{CropBox, Rotation, MIN_CROP_SIZE};

/// The eight resize handles of a crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropHandle {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

/// Clamp each field of a crop box into `[0, 1]`.
pub fn normalize_crop(crop: &CropBox) -> CropBox {
    CropBox::new(
        crop.x.clamp(0.0, 1.0),
        crop.y.clamp(0.0, 1.0),
        crop.width.clamp(0.0, 1.0),
        crop.height.clamp(0.0, 1.0),
    )
}

/// Guarantee `x + width <= 1` and `y + height <= 1` while enforcing a
/// minimum size: position is clamped into `[0, 1 - min_size]` first, then
/// the minimum size is enforced, then size is capped to the remaining room.
pub fn clamp_box(b: &CropBox, min_size: f64) -> CropBox {
    let x = b.x.clamp(0.0, 1.0 - min_size);
    let y = b.y.clamp(0.0, 1.0 - min_size);
    let width = b.width.max(min_size).min(1.0 - x);
    let height = b.height.max(min_size).min(1.0 - y);
    CropBox::new(x, y, width, height)
}

/// Re-express a crop stored in the `from` rotation frame so the same visual
/// region stays selected when the page rotation becomes `to`.
///
/// Exactly inverts itself with swapped arguments:
/// `remap(remap(b, a, b'), b', a) == b`.
pub fn remap_crop_for_rotation(crop: &CropBox, from: Rotation, to: Rotation) -> CropBox {
    let delta = (to.degrees() as i32 - from.degrees() as i32).rem_euclid(360);
    match delta {
        90 => CropBox::new(
            1.0 - crop.y - crop.height,
            crop.x,
            crop.height,
            crop.width,
        ),
        180 => CropBox::new(
            1.0 - crop.x - crop.width,
            1.0 - crop.y - crop.height,
            crop.width,
            crop.height,
        ),
        270 => CropBox::new(
            crop.y,
            1.0 - crop.x - crop.width,
            crop.height,
            crop.width,
        ),
        _ => *crop,
    }
}

/// Resize a crop by dragging one of its eight handles.
///
/// `dx`/`dy` are normalized deltas. The result is always re-normalized and
/// clamped to the page with the minimum crop size enforced.
pub fn adjust_crop_by_handle(crop: &CropBox, handle: CropHandle, dx: f64, dy: f64) -> CropBox {
    let mut b = *crop;
    match handle {
        CropHandle::NorthWest => {
            b.x += dx;
            b.y += dy;
            b.width -= dx;
            b.height -= dy;
        }
        CropHandle::North => {
            b.y += dy;
            b.height -= dy;
        }
        CropHandle::NorthEast => {
            b.y += dy;
            b.width += dx;
            b.height -= dy;
        }
        CropHandle::East => {
            b.width += dx;
        }
        CropHandle::SouthEast => {
            b.width += dx;
            b.height += dy;
        }
        CropHandle::South => {
            b.height += dy;
        }
        CropHandle::SouthWest => {
            b.x += dx;
            b.width -= dx;
            b.height += dy;
        }
        CropHandle::West => {
            b.x += dx;
            b.width -= dx;
        }
    }
    clamp_box(&normalize_crop(&b), MIN_CROP_SIZE)
}

/// Express a crop performed on an already-cropped view (`child`, relative to
/// `base`) in full-page coordinates.
pub fn compose_crop(base: &CropBox, child: &CropBox) -> CropBox {
    CropBox::new(
        base.x + child.x * base.width,
        base.y + child.y * base.height,
        child.width * base.width,
        child.height * base.height,
    )
}

/// Inverse of [`compose_crop`]: recover the view-relative crop from a
/// full-page one. A degenerate base yields the full view.
pub fn decompose_crop(base: &CropBox, absolute: &CropBox) -> CropBox {
    if base.width <= 0.0 || base.height <= 0.0 {
        return CropBox::full();
    }
    CropBox::new(
        (absolute.x - base.x) / base.width,
        (absolute.y - base.y) / base.height,
        absolute.width / base.width,
        absolute.height / base.height,
    )
}
