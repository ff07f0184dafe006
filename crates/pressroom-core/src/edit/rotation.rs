//! Rotation service.
//!
//! Every rotation change follows the same discipline: remap any existing
//! crop to the new rotation frame first, then commit the rotation. The
//! remap keeps the user's crop selection visually anchored instead of
//! jumping when the page turns underneath it.

use crate::geometry::remap_crop_for_rotation;
use crate::transforms::{Rotation, RotationDelta};

use super::EditEngine;

impl EditEngine {
    /// Rotate a page by a relative step and return the new rotation.
    pub fn rotate(&mut self, page: u32, delta: RotationDelta) -> Rotation {
        let target = self.store().rotation(page).rotated_by(delta);
        self.commit_rotation(page, target)
    }

    /// Set an absolute rotation, with the same remap-then-commit discipline.
    pub fn set_rotation(&mut self, page: u32, rotation: Rotation) -> Rotation {
        self.commit_rotation(page, rotation)
    }

    pub fn rotation(&self, page: u32) -> Rotation {
        self.store().rotation(page)
    }

    fn commit_rotation(&mut self, page: u32, target: Rotation) -> Rotation {
        let current = self.store().rotation(page);
        if current == target {
            return current;
        }
        if let Some(crop) = self.store().crop(page) {
            let remapped = remap_crop_for_rotation(&crop, current, target);
            self.store_mut().set_crop(page, Some(remapped));
        }
        self.store_mut().set_rotation(page, target);
        target
    }
}

/// Effective page dimensions under a rotation: quarter turns swap the axes.
pub fn rotated_dimensions(width: f64, height: f64, rotation: Rotation) -> (f64, f64) {
    if rotation.swaps_dimensions() {
        (height, width)
    } else {
        (width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::{CropBox, PageInfo};

    fn engine() -> EditEngine {
        let mut engine = EditEngine::new();
        engine.store_mut().register_page(PageInfo::new(1, 612.0, 792.0));
        engine
    }

    #[test]
    fn test_rotate_steps() {
        let mut e = engine();
        assert_eq!(e.rotate(1, RotationDelta::Clockwise), Rotation::R90);
        assert_eq!(e.rotate(1, RotationDelta::Clockwise), Rotation::R180);
        assert_eq!(e.rotate(1, RotationDelta::Half), Rotation::R0);
        assert_eq!(e.rotate(1, RotationDelta::CounterClockwise), Rotation::R270);
    }

    #[test]
    fn test_rotate_remaps_existing_crop() {
        let mut e = engine();
        assert!(e.set_crop(1, CropBox::new(0.1, 0.1, 0.5, 0.5)));
        e.rotate(1, RotationDelta::Clockwise);

        let crop = e.crop(1).unwrap();
        assert!(crop.approx_eq(&CropBox::new(0.4, 0.1, 0.5, 0.5), 1e-9));
        assert_eq!(e.rotation(1), Rotation::R90);
    }

    #[test]
    fn test_full_turn_restores_crop() {
        let mut e = engine();
        let original = CropBox::new(0.2, 0.15, 0.3, 0.4);
        assert!(e.set_crop(1, original));
        for _ in 0..4 {
            e.rotate(1, RotationDelta::Clockwise);
        }
        assert_eq!(e.rotation(1), Rotation::R0);
        assert!(e.crop(1).unwrap().approx_eq(&original, 1e-9));
    }

    #[test]
    fn test_set_rotation_noop_keeps_crop() {
        let mut e = engine();
        assert!(e.set_crop(1, CropBox::new(0.1, 0.1, 0.5, 0.5)));
        e.set_rotation(1, Rotation::R0);
        assert_eq!(e.crop(1), Some(CropBox::new(0.1, 0.1, 0.5, 0.5)));
    }

    #[test]
    fn test_set_rotation_absolute_remaps() {
        let mut e = engine();
        assert!(e.set_crop(1, CropBox::new(0.1, 0.1, 0.5, 0.5)));
        e.set_rotation(1, Rotation::R180);
        let crop = e.crop(1).unwrap();
        assert!(crop.approx_eq(&CropBox::new(0.4, 0.4, 0.5, 0.5), 1e-9));
    }

    #[test]
    fn test_rotated_dimensions() {
        assert_eq!(rotated_dimensions(800.0, 600.0, Rotation::R0), (800.0, 600.0));
        assert_eq!(rotated_dimensions(800.0, 600.0, Rotation::R90), (600.0, 800.0));
        assert_eq!(rotated_dimensions(800.0, 600.0, Rotation::R180), (800.0, 600.0));
        assert_eq!(rotated_dimensions(800.0, 600.0, Rotation::R270), (600.0, 800.0));
    }
}
