//! Pressroom Core - page edit/transform engine
//!
//! This crate provides the synchronous heart of Pressroom's print
//! preparation flow: a composable, order-preserving model of per-page edits
//! (crop, rotate, scale, translate), the coordinate geometry mapping those
//! edits between content space and canvas space, page ordering/selection
//! state, and the recipe snapshot handed to the external print engine.
//!
//! Rendering and caching live in `pressroom-render`; this crate never
//! touches pixels and never suspends.

pub mod drag;
pub mod edit;
pub mod events;
pub mod geometry;
pub mod metadata;
pub mod pages;
pub mod recipe;
pub mod transforms;

pub use edit::{EditCommand, EditEngine, EditOutcome, FitMode};
pub use events::{EventBus, ProgressEvent, Subscription};
pub use metadata::MetadataStore;
pub use pages::{PageState, SelectionState};
pub use recipe::{Destination, PrintSettings, Recipe, SourceFile, ValidationReport};
pub use transforms::{
    CropBox, PageInfo, PageTransforms, Rotation, RotationDelta, DEFAULT_SCALE, MAX_SCALE,
    MIN_SCALE,
};
