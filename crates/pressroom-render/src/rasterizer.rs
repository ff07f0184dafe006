//! The external rasterizer seam.
//!
//! The document parser/rasterizer that turns page bytes into pixels is an
//! external collaborator. The engine only ever talks to it through the
//! [`Rasterizer`] trait, so production backends and deterministic test
//! fakes are interchangeable.

use async_trait::async_trait;

use pressroom_core::PageInfo;

use crate::error::RenderResult;

/// A rendered page with RGB pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCanvas {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl PageCanvas {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width * height * 3) as usize,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A canvas filled with a single color.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&rgb);
        }
        Self::new(width, height, pixels)
    }

    /// Create a canvas from an `image::RgbImage`.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an `image::RgbImage` for further processing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

/// Result of loading a document into the rasterizer.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document_id: String,
    pub total_pages: u32,
    /// One immutable identity per page, 1-based.
    pub pages: Vec<PageInfo>,
}

/// Async interface to the external page rasterizer.
///
/// Failures surface as rejected futures; the cache layer is responsible for
/// clearing its pending bookkeeping so a later call can retry.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Parse a document and report its page inventory.
    async fn load(&self, bytes: &[u8], file_name: &str) -> RenderResult<LoadedDocument>;

    /// Render a page, untransformed, into a target of roughly the given
    /// size. The engine applies crop and rotation itself.
    async fn preview(&self, page: u32, width: u32, height: u32) -> RenderResult<PageCanvas>;

    /// Render a page at a fraction of its natural size, untransformed, for
    /// components that apply transforms at display time.
    async fn raw_preview(&self, page: u32, scale: f64) -> RenderResult<PageCanvas>;

    /// Natural page dimensions, if the page exists.
    fn page_dimensions(&self, page: u32) -> Option<(f64, f64)>;
}
