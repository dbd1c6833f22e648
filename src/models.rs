//! # Data Model
//!
//! Structured records produced by the schema normalizer. All records are
//! immutable once built; a refresh rebuilds them wholesale.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store label used when a recipe does not name its target stores
pub const COMMON_STORE: &str = "共通";

/// Display placeholder for absent optional fields
pub const PLACEHOLDER: &str = "-";

/// Label of the "no restriction" option in store and category pickers
pub const ALL_LABEL: &str = "すべて";

/// Separator between store labels inside a target_stores cell
pub const STORE_SEPARATOR: char = '、';

/// A recipe row after normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub title: String,
    pub category: String,
    /// Free-form preparation time, e.g. "15分"
    pub time: String,
    /// Direct-view image URL, or empty
    pub image: String,
    pub steps: String,
    /// Original ingredient block, kept for re-parsing and printing
    pub ingredients_raw: String,
    /// Distinct ingredient names from `ingredients_raw` in first-seen order
    pub ingredients: Vec<String>,
    /// Raw target_stores cell text; the store filter matches against this
    pub target_stores_raw: String,
    /// Individual store labels split out of `target_stores_raw`
    pub target_stores: Vec<String>,
    pub tableware: String,
    pub cutlery: String,
    pub caution: String,
}

impl RecipeRecord {
    /// Whether the recipe has an image that presentation can show
    pub fn has_image(&self) -> bool {
        self.image.starts_with("http")
    }
}

/// Catalogue attributes with a fixed display meaning.
///
/// Every field holds [`PLACEHOLDER`] when the column or cell is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueDetails {
    pub product_code: String,
    pub expiry: String,
    pub opened_shelf_life: String,
    pub storage_temperature: String,
    pub opened_temperature: String,
    pub manufacturer: String,
    pub specification: String,
    pub remarks: String,
}

impl Default for CatalogueDetails {
    fn default() -> Self {
        Self {
            product_code: PLACEHOLDER.to_string(),
            expiry: PLACEHOLDER.to_string(),
            opened_shelf_life: PLACEHOLDER.to_string(),
            storage_temperature: PLACEHOLDER.to_string(),
            opened_temperature: PLACEHOLDER.to_string(),
            manufacturer: PLACEHOLDER.to_string(),
            specification: PLACEHOLDER.to_string(),
            remarks: PLACEHOLDER.to_string(),
        }
    }
}

/// One catalogue row keyed by its canonical product name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientMasterRecord {
    /// Canonical name: trimmed, internal newlines removed
    pub name: String,
    pub details: CatalogueDetails,
    /// Every non-key column in source order, label to display string
    pub attributes: Vec<(String, String)>,
}

impl IngredientMasterRecord {
    /// Look up an attribute by its column label, falling back to the placeholder
    pub fn attribute(&self, label: &str) -> &str {
        self.attributes
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, value)| value.as_str())
            .unwrap_or(PLACEHOLDER)
    }
}

/// One line of a recipe's ingredient block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIngredientLine {
    pub name: String,
    pub quantity: String,
    pub note: String,
}

/// Store roster row. Only consumed by authentication, which lives outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub store_code: String,
    pub password: String,
    pub store_name: String,
}

/// Home page announcement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub title: String,
    /// Date exactly as written in the source
    pub date: String,
    /// Parsed date when the source uses `YYYY-MM-DD` or `YYYY/MM/DD`
    pub parsed_date: Option<NaiveDate>,
    pub content: String,
    pub important: bool,
}

/// Store picker selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreSelection {
    #[default]
    All,
    Label(String),
}

impl StoreSelection {
    /// Map a picker label to a selection; only [`ALL_LABEL`] and blanks mean no restriction
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label == ALL_LABEL {
            Self::All
        } else {
            Self::Label(label.to_string())
        }
    }
}

/// Category picker selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelection {
    #[default]
    All,
    Label(String),
}

impl CategorySelection {
    /// Map a picker label to a selection; only [`ALL_LABEL`] and blanks mean no restriction
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label == ALL_LABEL {
            Self::All
        } else {
            Self::Label(label.to_string())
        }
    }
}
