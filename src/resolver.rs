//! # Ingredient Resolver
//!
//! Maps a recipe ingredient name onto at most one catalogue record:
//!
//! 1. exact key match;
//! 2. otherwise the first key, in catalogue insertion order, that contains
//!    the ingredient name as a substring.
//!
//! Substring hits are not scored. Whichever key comes first in the catalogue
//! wins, so reordering the catalogue can change what an ingredient resolves to.
//! Containment runs in one direction only: the master key must contain the
//! ingredient name, never the reverse.

use serde::Serialize;
use tracing::debug;

use crate::master_index::MasterIndex;
use crate::models::{IngredientMasterRecord, RecipeRecord};
use crate::observability;

/// Number of master keys shown as a hint when diagnostics find no match
const DIAGNOSTIC_KEY_HINTS: usize = 5;

/// Outcome of resolving one ingredient name
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    Exact(&'a IngredientMasterRecord),
    Substring(&'a IngredientMasterRecord),
    Unresolved,
}

impl<'a> Resolution<'a> {
    pub fn record(&self) -> Option<&'a IngredientMasterRecord> {
        match self {
            Resolution::Exact(record) | Resolution::Substring(record) => Some(record),
            Resolution::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Resolution::Unresolved)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Resolution::Exact(_) => "exact",
            Resolution::Substring(_) => "substring",
            Resolution::Unresolved => "unresolved",
        }
    }
}

/// Resolve an ingredient name against the catalogue. Never fails.
pub fn resolve<'a>(name: &str, index: &'a MasterIndex) -> Resolution<'a> {
    let name = name.trim();
    if name.is_empty() {
        return Resolution::Unresolved;
    }

    if let Some(record) = index.get(name) {
        return Resolution::Exact(record);
    }

    index
        .iter()
        .find(|record| record.name.contains(name))
        .map(Resolution::Substring)
        .unwrap_or(Resolution::Unresolved)
}

/// An ingredient of a recipe paired with its catalogue match, ready for display
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedIngredient<'a> {
    /// Ingredient name as written in the recipe
    pub name: String,
    /// Canonical catalogue key (`商品名`) of the matched record, else the recipe's own name.
    ///
    /// A substring hit therefore displays the catalogue product, e.g. `玉ねぎ`
    /// resolved to `国産玉ねぎ` shows `国産玉ねぎ`. The key column is not kept
    /// among the record's attributes, so it is read from `record.name`.
    pub display_name: String,
    pub match_kind: &'static str,
    pub record: Option<&'a IngredientMasterRecord>,
}

/// Resolve every ingredient of a recipe in list order
pub fn resolve_recipe<'a>(recipe: &RecipeRecord, index: &'a MasterIndex) -> Vec<ResolvedIngredient<'a>> {
    recipe
        .ingredients
        .iter()
        .map(|ingredient| {
            let name = ingredient.trim();
            let resolution = resolve(name, index);
            observability::record_resolution_metrics(resolution.kind());

            if !resolution.is_resolved() {
                debug!(recipe = %recipe.title, ingredient = %name, "Unresolved ingredient");
            }

            let display_name = resolution
                .record()
                .map(|record| record.name.clone())
                .unwrap_or_else(|| name.to_string());

            ResolvedIngredient {
                name: name.to_string(),
                display_name,
                match_kind: resolution.kind(),
                record: resolution.record(),
            }
        })
        .collect()
}

/// Result of the admin matching test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MatchDiagnosis {
    Exact { name: String },
    Substring { name: String, master_name: String },
    Miss { name: String, sample_keys: Vec<String> },
}

/// Explain how a typed ingredient name would resolve
pub fn diagnose(name: &str, index: &MasterIndex) -> MatchDiagnosis {
    let name = name.trim().to_string();
    match resolve(&name, index) {
        Resolution::Exact(_) => MatchDiagnosis::Exact { name },
        Resolution::Substring(record) => MatchDiagnosis::Substring {
            name,
            master_name: record.name.clone(),
        },
        Resolution::Unresolved => MatchDiagnosis::Miss {
            name,
            sample_keys: index
                .keys()
                .take(DIAGNOSTIC_KEY_HINTS)
                .map(str::to_string)
                .collect(),
        },
    }
}
