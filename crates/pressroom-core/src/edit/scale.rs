//! Scale service: clamped scale writes and fit calculations.

use crate::transforms::{DEFAULT_SCALE, MAX_SCALE, MIN_SCALE};

use super::EditEngine;

/// Zoom in/out step, percent.
pub const ZOOM_STEP: f64 = 10.0;

/// How [`fit_scale`] should relate content to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    /// Largest scale at which content fits entirely inside the target.
    Contain,
    /// Smallest scale at which content covers the entire target.
    Cover,
}

/// Clamp a scale percent into the legal range. Non-finite input falls back
/// to the identity scale.
pub fn clamp_scale(scale: f64) -> f64 {
    if !scale.is_finite() {
        return DEFAULT_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Scale percent fitting (`Contain`) or filling (`Cover`) the target,
/// clamped into the legal range. Degenerate dimensions yield the identity
/// scale.
pub fn fit_scale(src_w: f64, src_h: f64, dst_w: f64, dst_h: f64, mode: FitMode) -> f64 {
    if src_w <= 0.0 || src_h <= 0.0 || dst_w <= 0.0 || dst_h <= 0.0 {
        return DEFAULT_SCALE;
    }
    let ratio_x = dst_w / src_w;
    let ratio_y = dst_h / src_h;
    let ratio = match mode {
        FitMode::Contain => ratio_x.min(ratio_y),
        FitMode::Cover => ratio_x.max(ratio_y),
    };
    clamp_scale(ratio * 100.0)
}

impl EditEngine {
    /// Set a page's scale percent; out-of-range input is clamped, and the
    /// stored value is returned.
    pub fn set_scale(&mut self, page: u32, scale: f64) -> f64 {
        let clamped = clamp_scale(scale);
        self.store_mut().set_scale(page, clamped);
        clamped
    }

    pub fn scale(&self, page: u32) -> f64 {
        self.store().scale(page)
    }

    /// Add a delta to the current scale, funneled through the clamp.
    pub fn adjust_scale(&mut self, page: u32, delta: f64) -> f64 {
        let current = self.store().scale(page);
        self.set_scale(page, current + delta)
    }

    /// Multiply the current scale, funneled through the clamp.
    pub fn multiply_scale(&mut self, page: u32, factor: f64) -> f64 {
        let current = self.store().scale(page);
        self.set_scale(page, current * factor)
    }

    pub fn zoom_in(&mut self, page: u32) -> f64 {
        self.adjust_scale(page, ZOOM_STEP)
    }

    pub fn zoom_out(&mut self, page: u32) -> f64 {
        self.adjust_scale(page, -ZOOM_STEP)
    }
}
