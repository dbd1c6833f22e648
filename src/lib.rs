//! # Recipe Viewer
//!
//! Ingestion and matching core for an internal recipe browser. Spreadsheet
//! exports (recipes, ingredient catalogue, store roster, announcements) are
//! normalized into structured records; recipe ingredients are resolved
//! against the catalogue; recipes are filtered and fuzzy-ranked per request.

pub mod cache;
pub mod config;
pub mod errors;
pub mod filter;
pub mod fuzzy;
pub mod image_link;
pub mod ingredient_parser;
pub mod master_index;
pub mod models;
pub mod observability;
pub mod observability_config;
pub mod resolver;
pub mod schema;
pub mod search;
pub mod snapshot;
pub mod sources;

// Re-export types for easier access
pub use filter::FilterContext;
pub use master_index::MasterIndex;
pub use models::{IngredientMasterRecord, ParsedIngredientLine, RecipeRecord};
pub use resolver::{resolve, Resolution};
pub use search::{SearchConfig, SearchRanker};
