//! Crop service: validated crop writes and convenience constructors.

use crate::geometry::{normalize_crop, remap_crop_for_rotation};
use crate::transforms::{CropBox, Rotation, CROP_EPSILON, MIN_CROP_SIZE};

use super::EditEngine;

impl EditEngine {
    /// Set a page's crop.
    ///
    /// Each field is clamped into `[0, 1]` first; if the clamped box still
    /// overhangs the page (beyond the float slack) or is smaller than the
    /// minimum crop size, the edit is rejected and state is unchanged.
    pub fn set_crop(&mut self, page: u32, crop: CropBox) -> bool {
        let normalized = normalize_crop(&crop);
        if !crop_is_valid(&normalized) {
            return false;
        }
        self.store_mut().set_crop(page, Some(normalized));
        true
    }

    pub fn crop(&self, page: u32) -> Option<CropBox> {
        self.store().crop(page)
    }

    /// Re-express a crop for a rotation change. Pure pass-through to the
    /// geometry so callers outside the rotation service can preview the
    /// remap without committing it.
    pub fn remap_crop(&self, crop: &CropBox, from: Rotation, to: Rotation) -> CropBox {
        remap_crop_for_rotation(crop, from, to)
    }
}

/// A crop covering the whole page.
pub fn full_crop() -> CropBox {
    CropBox::full()
}

/// A centered crop taking the given fractions of each page axis.
pub fn centered_crop(width_frac: f64, height_frac: f64) -> CropBox {
    let width = width_frac.clamp(MIN_CROP_SIZE, 1.0);
    let height = height_frac.clamp(MIN_CROP_SIZE, 1.0);
    CropBox::new((1.0 - width) / 2.0, (1.0 - height) / 2.0, width, height)
}

fn crop_is_valid(crop: &CropBox) -> bool {
    crop.width >= MIN_CROP_SIZE
        && crop.height >= MIN_CROP_SIZE
        && crop.right() <= 1.0 + CROP_EPSILON
        && crop.bottom() <= 1.0 + CROP_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::PageInfo;

    fn engine() -> EditEngine {
        let mut engine = EditEngine::new();
        engine.store_mut().register_page(PageInfo::new(1, 612.0, 792.0));
        engine
    }

    #[test]
    fn test_set_crop_clamps_fields() {
        let mut e = engine();
        assert!(e.set_crop(1, CropBox::new(-0.2, 0.0, 0.5, 1.4)));
        let crop = e.crop(1).unwrap();
        assert_eq!(crop, CropBox::new(0.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn test_set_crop_rejects_overhang_after_clamping() {
        let mut e = engine();
        assert!(!e.set_crop(1, CropBox::new(0.7, 0.0, 0.9, 0.5)));
        assert_eq!(e.crop(1), None);
    }

    #[test]
    fn test_set_crop_rejects_degenerate_size() {
        let mut e = engine();
        assert!(!e.set_crop(1, CropBox::new(0.5, 0.5, 0.0, 0.5)));
        assert!(!e.set_crop(1, CropBox::new(0.5, 0.5, 0.005, 0.5)));
        assert_eq!(e.crop(1), None);
    }

    #[test]
    fn test_set_crop_accepts_float_slack() {
        let mut e = engine();
        // x + width = 1.008, inside the epsilon
        assert!(e.set_crop(1, CropBox::new(0.508, 0.0, 0.5, 0.5)));
    }

    #[test]
    fn test_full_crop_covers_page() {
        assert!(full_crop().is_full_page());
    }

    #[test]
    fn test_centered_crop() {
        let crop = centered_crop(0.5, 0.8);
        assert!(crop.approx_eq(&CropBox::new(0.25, 0.1, 0.5, 0.8), 1e-12));
        assert!(crop.within_bounds());
    }

    #[test]
    fn test_centered_crop_clamps_fractions() {
        let crop = centered_crop(2.0, 0.0);
        assert_eq!(crop.width, 1.0);
        assert_eq!(crop.height, MIN_CROP_SIZE);
    }
}
