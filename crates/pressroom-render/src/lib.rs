//! Pressroom Render - async preview and thumbnail pipeline
//!
//! Sits on top of `pressroom-core`: talks to the external page rasterizer
//! through a trait seam, bakes committed crop/rotation into pixels, and
//! caches the results. Previews live in a versioned cache that discards
//! renders made stale by edits; thumbnails live in a bounded LRU.
//! [`session::DocumentSession`] ties the edit engine, caches, page
//! ordering, and progress events together per document.

pub mod error;
pub mod pixel;
pub mod preview;
pub mod rasterizer;
pub mod session;
pub mod thumbs;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{RenderError, RenderResult, SessionError};
pub use preview::{PreviewCache, PreviewKey};
pub use rasterizer::{LoadedDocument, PageCanvas, Rasterizer};
pub use session::DocumentSession;
pub use thumbs::{ThumbKey, ThumbnailCache, DEFAULT_THUMB_CAPACITY, THUMB_MAX_EDGE};
