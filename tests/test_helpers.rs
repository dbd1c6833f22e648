//! # Test Helper Library
//!
//! Shared fixtures for the integration tests: recipe and catalogue builders
//! plus small CSV exports shaped like the real spreadsheets.
#![allow(dead_code)]

use recipe_viewer::ingredient_parser::IngredientParser;
use recipe_viewer::master_index::MasterIndex;
use recipe_viewer::models::{CatalogueDetails, IngredientMasterRecord, RecipeRecord, PLACEHOLDER};

/// Recipe export with multi-line ingredient blocks and a target_stores column
pub const RECIPES_CSV: &str = "\
title,category,time,image,steps,ingredients,target_stores
チキンカレー,メイン,30分,https://drive.google.com/file/d/abc123/view?usp=sharing,煮込む,\"鶏肉、300g\n玉ねぎ、1個、薄切り\nカレールー、1箱\",渋谷店、新宿店
野菜スープ,スープ,15分,,煮る,\"人参、1本\n玉ねぎ、1/2個\n塩、少々\",渋谷店
ポテトサラダ,サイド,20分,https://example.com/potato.jpg,混ぜる,\"じゃがいも、3個\nマヨネーズ、大さじ3\n塩\",新宿店
";

/// Catalogue export; header labels carry the stray line breaks real exports have
pub const CATALOGUE_CSV: &str = "\
\"商品名\n\",商品コード,賞味期限,\"納品温度帯\n(保管温度帯)\",メーカー名,備考
国産玉ねぎ,1001,製造日より10日,冷蔵,青果A,
玉ねぎ,1002,製造日より7日,冷蔵,青果B,業務用
鶏もも肉,2001,製造日より5日,冷凍,精肉C,
\"  塩\n\",3001,なし,常温,調味D,
";

pub const STORES_CSV: &str = "\
store_code,password,store_name
S01,1111,渋谷店
S02,2222,新宿店
";

pub const ANNOUNCEMENTS_CSV: &str = "\
title,date,content,important
新メニュー,2024/04/01,春の新メニュー,FALSE
衛生点検,2024/03/15,点検のお知らせ,TRUE
";

/// Build a recipe with ingredients given one per line
pub fn recipe(title: &str, ingredients: &[&str], stores: &str) -> RecipeRecord {
    let ingredients_raw = ingredients.join("\n");
    RecipeRecord {
        title: title.to_string(),
        category: "メイン".to_string(),
        time: String::new(),
        image: String::new(),
        steps: String::new(),
        ingredients: IngredientParser::new().ingredient_names(&ingredients_raw),
        ingredients_raw,
        target_stores_raw: stores.to_string(),
        target_stores: stores
            .split('、')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        tableware: PLACEHOLDER.to_string(),
        cutlery: PLACEHOLDER.to_string(),
        caution: PLACEHOLDER.to_string(),
    }
}

/// Same as [`recipe`] with an explicit category
pub fn recipe_in(title: &str, category: &str, stores: &str) -> RecipeRecord {
    RecipeRecord {
        category: category.to_string(),
        ..recipe(title, &[], stores)
    }
}

/// Catalogue record tagged with a product code so tests can tell records apart
pub fn master(name: &str, code: &str) -> IngredientMasterRecord {
    IngredientMasterRecord {
        name: name.to_string(),
        details: CatalogueDetails {
            product_code: code.to_string(),
            ..CatalogueDetails::default()
        },
        attributes: vec![("商品コード".to_string(), code.to_string())],
    }
}

/// Index over `(name, code)` pairs in the given order
pub fn index_of(entries: &[(&str, &str)]) -> MasterIndex {
    MasterIndex::from_records(entries.iter().map(|(name, code)| master(name, code)))
}
