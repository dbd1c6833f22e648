//! # Filter Pipeline Tests

mod test_helpers;

use recipe_viewer::filter::{self, matches_store};
use recipe_viewer::models::{CategorySelection, StoreSelection};
use recipe_viewer::{FilterContext, RecipeRecord, SearchRanker};
use test_helpers::{recipe, recipe_in};

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(context: &FilterContext, recipes: &[RecipeRecord]) -> Vec<String> {
        filter::apply(recipes, context, &SearchRanker::new())
            .iter()
            .map(|r| r.recipe.title.clone())
            .collect()
    }

    fn store(label: &str) -> StoreSelection {
        StoreSelection::Label(label.to_string())
    }

    fn category(label: &str) -> CategorySelection {
        CategorySelection::Label(label.to_string())
    }

    #[test]
    fn test_store_label_matches_as_substring() {
        let tagged = recipe("A", &[], "店AB");
        assert!(matches_store(&tagged, &store("店A")));
        assert!(matches_store(&tagged, &store("店AB")));
        assert!(!matches_store(&tagged, &store("店C")));
        assert!(matches_store(&tagged, &StoreSelection::All));
    }

    #[test]
    fn test_common_recipes_need_all_or_common_selection() {
        let recipes = vec![recipe("Shared", &[], "共通"), recipe("Local", &[], "渋谷店")];

        assert_eq!(titles(&FilterContext::new(), &recipes), vec!["Shared", "Local"]);
        assert_eq!(
            titles(&FilterContext::new().with_store(store("渋谷店")), &recipes),
            vec!["Local"]
        );
        assert_eq!(
            titles(&FilterContext::new().with_store(store("共通")), &recipes),
            vec!["Shared"]
        );
    }

    #[test]
    fn test_predicates_compose_with_and() {
        let recipes = vec![
            recipe_in("Chicken Curry", "メイン", "渋谷店、新宿店"),
            recipe_in("Chicken Soup", "スープ", "渋谷店"),
            recipe_in("Chicken Rice", "メイン", "新宿店"),
            recipe_in("Beef Stew", "メイン", "渋谷店"),
        ];
        let context = FilterContext::new()
            .with_store(store("渋谷店"))
            .with_category(category("メイン"))
            .with_keyword("chicken");

        assert_eq!(titles(&context, &recipes), vec!["Chicken Curry"]);
    }

    #[test]
    fn test_category_requires_exact_label() {
        let recipes = vec![recipe_in("A", "メイン料理", "共通"), recipe_in("B", "メイン", "共通")];
        assert_eq!(
            titles(&FilterContext::new().with_category(category("メイン")), &recipes),
            vec!["B"]
        );
    }

    #[test]
    fn test_without_keyword_source_order_is_kept() {
        let recipes = vec![
            recipe_in("C", "メイン", "共通"),
            recipe_in("A", "メイン", "共通"),
            recipe_in("B", "スープ", "共通"),
        ];
        let context = FilterContext::new().with_category(category("メイン")).with_keyword("   ");
        let results = filter::apply(&recipes, &context, &SearchRanker::new());

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].recipe.title, "C");
        assert_eq!(results[1].recipe.title, "A");
        assert!(results.iter().all(|r| r.score.is_none()));
    }

    #[test]
    fn test_selection_from_label() {
        assert_eq!(StoreSelection::from_label("すべて"), StoreSelection::All);
        assert_eq!(StoreSelection::from_label(""), StoreSelection::All);
        assert_eq!(StoreSelection::from_label("渋谷店"), store("渋谷店"));
        assert_eq!(CategorySelection::from_label("ALL"), category("ALL"));
    }

    #[test]
    fn test_category_named_all_filters_exactly() {
        let recipes = vec![
            recipe_in("Sampler", "All", "共通"),
            recipe_in("Curry", "メイン", "共通"),
        ];
        let context = FilterContext::new().with_category(CategorySelection::from_label("All"));
        assert_eq!(titles(&context, &recipes), vec!["Sampler"]);

        let everything = FilterContext::new().with_category(CategorySelection::from_label("すべて"));
        assert_eq!(titles(&everything, &recipes), vec!["Sampler", "Curry"]);
    }

    #[test]
    fn test_store_named_all_is_not_a_wildcard() {
        let recipes = vec![recipe("Local", &[], "渋谷店")];
        let context = FilterContext::new().with_store(StoreSelection::from_label("All"));
        assert!(titles(&context, &recipes).is_empty());
    }

    #[test]
    fn test_picker_options() {
        let recipes = vec![
            recipe_in("A", "メイン", "渋谷店、新宿店"),
            recipe_in("B", "スープ", "共通"),
            recipe_in("C", "メイン", "渋谷店"),
        ];
        assert_eq!(
            filter::store_options(&recipes),
            vec!["すべて", "共通", "新宿店", "渋谷店"]
        );
        assert_eq!(filter::category_options(&recipes), vec!["すべて", "メイン", "スープ"]);
    }
}
