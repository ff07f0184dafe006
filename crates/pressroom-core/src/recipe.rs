//! Print-job recipe: the final serialized description handed to the
//! external print/finishing engine.
//!
//! A recipe is a snapshot - produced on demand, never mutated afterward.
//! It carries the source file identity, the print settings, and one entry
//! per *included* page (in current order) with its original dimensions and
//! final transforms.
//!
//! Validation never throws: business-rule violations come back as a
//! structured error list for the caller to act on.

use serde::{Deserialize, Serialize};

use crate::metadata::MetadataStore;
use crate::transforms::{PageTransforms, MAX_SCALE, MIN_SCALE};

/// Recipe schema version.
pub const RECIPE_VERSION: u32 = 1;

/// Source file identity, captured at load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Color,
    Grayscale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintQuality {
    Draft,
    #[default]
    Normal,
    High,
}

/// Shop-facing print settings. `pages_per_sheet` > 1 requests N-up layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintSettings {
    pub paper_size: String,
    pub color_mode: ColorMode,
    pub duplex: bool,
    pub copies: u32,
    pub pages_per_sheet: u32,
    pub quality: PrintQuality,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            paper_size: "a4".to_string(),
            color_mode: ColorMode::Color,
            duplex: false,
            copies: 1,
            pages_per_sheet: 1,
            quality: PrintQuality::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// One included page, in output order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePage {
    pub page_number: u32,
    pub original_dimensions: Dimensions,
    pub transforms: PageTransforms,
    pub has_edits: bool,
    pub is_cropped: bool,
    pub fit_crop_to_page: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub shop_id: String,
}

/// The immutable print-job snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub version: u32,
    #[serde(rename = "type")]
    pub kind: String,
    /// Unix epoch milliseconds.
    pub generated_at: u64,
    pub source: SourceFile,
    pub print: PrintSettings,
    pub pages: Vec<RecipePage>,
    pub destination: Destination,
}

impl Recipe {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A single business-rule violation found by [`validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecipeIssue {
    #[error("no pages included in the print job")]
    NoPagesIncluded,
    #[error("page {page}: crop outside [0,1] bounds")]
    CropOutOfBounds { page: u32 },
    #[error("page {page}: scale {scale} outside [10, 500]")]
    ScaleOutOfRange { page: u32, scale: f64 },
}

/// Validation result. `valid` is true exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<RecipeIssue>,
}

/// Build the snapshot from the included pages (in order) and the store.
///
/// Pages the store has no identity for fall back to zero dimensions; the
/// rasterizer registers every real page at load, so this only happens for
/// synthetic page numbers.
pub fn generate(
    source: &SourceFile,
    print: &PrintSettings,
    destination: &Destination,
    included: &[u32],
    store: &MetadataStore,
) -> Recipe {
    let pages = included
        .iter()
        .map(|&page| {
            let transforms = store.transforms(page);
            let (width, height) = store
                .page_info(page)
                .map(|info| (info.width, info.height))
                .unwrap_or((0.0, 0.0));
            RecipePage {
                page_number: page,
                original_dimensions: Dimensions { width, height },
                has_edits: !transforms.is_identity(),
                is_cropped: transforms.is_cropped(),
                fit_crop_to_page: transforms.fit_crop_to_page,
                transforms,
            }
        })
        .collect();

    Recipe {
        version: RECIPE_VERSION,
        kind: "print_job".to_string(),
        generated_at: now_millis(),
        source: source.clone(),
        print: print.clone(),
        pages,
        destination: destination.clone(),
    }
}

/// Check the business rules. Never repairs anything - callers act on the
/// error list.
pub fn validate(recipe: &Recipe) -> ValidationReport {
    let mut errors = Vec::new();

    if recipe.pages.is_empty() {
        errors.push(RecipeIssue::NoPagesIncluded);
    }

    for page in &recipe.pages {
        if let Some(crop) = &page.transforms.crop {
            if !crop.within_bounds() {
                errors.push(RecipeIssue::CropOutOfBounds {
                    page: page.page_number,
                });
            }
        }
        let scale = page.transforms.scale;
        if !(MIN_SCALE..=MAX_SCALE).contains(&scale) {
            errors.push(RecipeIssue::ScaleOutOfRange {
                page: page.page_number,
                scale,
            });
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
