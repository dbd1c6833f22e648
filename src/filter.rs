//! # Recipe Filter Pipeline
//!
//! Applies the store, category and keyword predicates of one request to a
//! recipe collection. Predicates are ANDed; only the keyword predicate
//! reorders results, through the search ranker.
//!
//! The store predicate is a plain substring test against the raw
//! target_stores text. Selecting `店A` therefore also matches a recipe tagged
//! only `店AB`. Store labels that are substrings of one another over-match.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info_span};

use crate::models::{CategorySelection, RecipeRecord, StoreSelection, ALL_LABEL, STORE_SEPARATOR};
use crate::observability;
use crate::search::{ScoredRecipe, SearchRanker};

/// Everything one request asks of the pipeline.
///
/// Built fresh per request; the pipeline itself keeps no state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterContext {
    pub store: StoreSelection,
    pub category: CategorySelection,
    /// Free-text keyword, possibly empty
    pub keyword: String,
}

impl FilterContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(mut self, store: StoreSelection) -> Self {
        self.store = store;
        self
    }

    pub fn with_category(mut self, category: CategorySelection) -> Self {
        self.category = category;
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }
}

/// Store predicate: the selected label is a substring of the raw target_stores text
pub fn matches_store(recipe: &RecipeRecord, store: &StoreSelection) -> bool {
    match store {
        StoreSelection::All => true,
        StoreSelection::Label(label) => recipe.target_stores_raw.contains(label.as_str()),
    }
}

/// Category predicate: exact equality
pub fn matches_category(recipe: &RecipeRecord, category: &CategorySelection) -> bool {
    match category {
        CategorySelection::All => true,
        CategorySelection::Label(label) => recipe.category == *label,
    }
}

/// Run every predicate of `context` over `recipes`
pub fn apply<'a>(
    recipes: &'a [RecipeRecord],
    context: &FilterContext,
    ranker: &SearchRanker,
) -> Vec<ScoredRecipe<'a>> {
    let span = info_span!("filter_recipes", candidates = recipes.len());
    let _guard = span.enter();
    let start = std::time::Instant::now();

    let candidates = recipes
        .iter()
        .filter(|recipe| matches_store(recipe, &context.store))
        .filter(|recipe| matches_category(recipe, &context.category));

    let results = ranker.rank(&context.keyword, candidates);

    debug!(
        store = ?context.store,
        category = ?context.category,
        keyword = %context.keyword,
        results = results.len(),
        "Filtered recipes"
    );
    observability::record_search_metrics(
        !context.keyword.trim().is_empty(),
        results.len(),
        start.elapsed(),
    );
    results
}

/// Store picker options: the "all" label, then every distinct store label sorted
pub fn store_options(recipes: &[RecipeRecord]) -> Vec<String> {
    let labels: BTreeSet<&str> = recipes
        .iter()
        .flat_map(|recipe| recipe.target_stores_raw.split(STORE_SEPARATOR))
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .collect();

    std::iter::once(ALL_LABEL)
        .chain(labels)
        .map(str::to_string)
        .collect()
}

/// Category picker options: the "all" label, then categories in first-seen order
pub fn category_options(recipes: &[RecipeRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    std::iter::once(ALL_LABEL.to_string())
        .chain(
            recipes
                .iter()
                .filter(|recipe| seen.insert(recipe.category.as_str()))
                .map(|recipe| recipe.category.clone()),
        )
        .collect()
}
