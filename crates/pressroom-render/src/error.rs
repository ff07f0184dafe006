//! Error types for the render layer.

use thiserror::Error;

/// Failures from the rasterizer or the render pipeline.
///
/// `Clone` is required because concurrent callers of the preview cache
/// share one in-flight render future and each receives the outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The external rasterizer rejected or failed the request.
    #[error("rasterizer failure: {0}")]
    Rasterizer(String),

    /// The requested page does not exist in the loaded document.
    #[error("page {0} out of range")]
    PageOutOfRange(u32),

    /// Zero-sized render target.
    #[error("invalid target dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Session-level failures.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A recipe or render was requested before any document was loaded.
    #[error("no document loaded")]
    NoDocument,

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type RenderResult<T> = Result<T, RenderError>;
