//! # Fuzzy Search Ranker
//!
//! Scores recipes against a keyword on two channels and keeps the ones that
//! clear a threshold:
//!
//! ```text
//! title_score      = partial_ratio(query, title)
//! ingredient_score = partial_ratio(query, ingredients.join(" "))
//! combined         = max(title_score * title_weight, ingredient_score)
//! ```
//!
//! Recipes with `combined > threshold` are kept and sorted by `combined`
//! descending. The sort is stable, so equal scores keep source order.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::fuzzy::partial_ratio;
use crate::models::RecipeRecord;

/// Configuration for keyword ranking
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Recipes must score strictly above this to be kept
    pub threshold: f64,
    /// Multiplier applied to the title channel
    pub title_weight: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: 60.0,
            title_weight: 1.1,
        }
    }
}

impl SearchConfig {
    /// Validate search configuration parameters
    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..=100.0).contains(&self.threshold) {
            return Err(AppError::Config(format!(
                "search threshold {} must be between 0 and 100",
                self.threshold
            )));
        }
        if !self.title_weight.is_finite() || self.title_weight <= 0.0 {
            return Err(AppError::Config(format!(
                "title weight {} must be a positive number",
                self.title_weight
            )));
        }
        Ok(())
    }
}

/// Per-channel and combined scores for one recipe
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchScore {
    pub title_score: u8,
    pub ingredient_score: u8,
    pub combined_score: f64,
}

/// A recipe together with its score; `score` is `None` when no keyword was given
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecipe<'a> {
    pub recipe: &'a RecipeRecord,
    pub score: Option<SearchScore>,
}

/// Ranks recipes against a keyword
#[derive(Debug, Clone, Default)]
pub struct SearchRanker {
    config: SearchConfig,
}

impl SearchRanker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Score a single recipe against a non-empty query
    pub fn score(&self, query: &str, recipe: &RecipeRecord) -> SearchScore {
        let title_score = partial_ratio(query, &recipe.title);
        let ingredient_score = partial_ratio(query, &recipe.ingredients.join(" "));
        let combined_score =
            (f64::from(title_score) * self.config.title_weight).max(f64::from(ingredient_score));

        SearchScore {
            title_score,
            ingredient_score,
            combined_score,
        }
    }

    /// Keep recipes scoring above the threshold, best first.
    ///
    /// A blank query keeps every candidate unscored, in source order.
    pub fn rank<'a, I>(&self, query: &str, candidates: I) -> Vec<ScoredRecipe<'a>>
    where
        I: IntoIterator<Item = &'a RecipeRecord>,
    {
        let query = query.trim();
        if query.is_empty() {
            return candidates
                .into_iter()
                .map(|recipe| ScoredRecipe { recipe, score: None })
                .collect();
        }

        let mut scored: Vec<ScoredRecipe<'a>> = candidates
            .into_iter()
            .filter_map(|recipe| {
                let score = self.score(query, recipe);
                if score.combined_score > self.config.threshold {
                    Some(ScoredRecipe {
                        recipe,
                        score: Some(score),
                    })
                } else {
                    None
                }
            })
            .collect();

        // sort_by is stable: ties keep source order
        scored.sort_by(|a, b| {
            let a = a.score.map(|s| s.combined_score).unwrap_or_default();
            let b = b.score.map(|s| s.combined_score).unwrap_or_default();
            b.partial_cmp(&a).unwrap_or(Ordering::Equal)
        });

        debug!(query = %query, kept = scored.len(), "Ranked recipes");
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(title: &str, ingredients: &[&str]) -> RecipeRecord {
        RecipeRecord {
            title: title.to_string(),
            category: String::new(),
            time: String::new(),
            image: String::new(),
            steps: String::new(),
            ingredients_raw: ingredients.join("\n"),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            target_stores_raw: String::new(),
            target_stores: Vec::new(),
            tableware: String::new(),
            cutlery: String::new(),
            caution: String::new(),
        }
    }

    #[test]
    fn test_search_config_validation() {
        assert!(SearchConfig::default().validate().is_ok());
        let mut config = SearchConfig::default();
        config.threshold = 120.0;
        assert!(config.validate().is_err());
        config.threshold = 60.0;
        config.title_weight = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_combined_takes_weighted_maximum() {
        let ranker = SearchRanker::new();
        let score = ranker.score("chicken", &recipe("Chicken Curry", &["rice"]));
        assert_eq!(score.title_score, 100);
        assert!((score.combined_score - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_blank_query_keeps_everything_unscored() {
        let ranker = SearchRanker::new();
        let recipes = vec![recipe("A", &[]), recipe("B", &[])];
        let ranked = ranker.rank("  ", &recipes);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.score.is_none()));
    }
}
