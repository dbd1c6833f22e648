//! # Schema Normalizer
//!
//! Turns raw spreadsheet exports into structured records.
//!
//! ## Header sanitizing
//!
//! Column labels lose embedded line breaks and surrounding whitespace and are
//! otherwise kept verbatim. `"商品名\n"` and `" title "` become `"商品名"` and
//! `"title"`; case is never folded.
//!
//! ## Missing data
//!
//! Absent columns and blank cells fall back to documented defaults instead of
//! failing:
//!
//! | Source     | Field                              | Default         |
//! |------------|------------------------------------|-----------------|
//! | recipes    | target_stores                      | `共通`          |
//! | recipes    | tableware, cutlery, caution        | `-`             |
//! | recipes    | everything else                    | empty string    |
//! | catalogue  | every attribute                    | `-`             |
//!
//! ## Failure
//!
//! A source that cannot be fetched or parsed becomes [`SourceLoad::Empty`]
//! carrying the reason, so callers can tell "no rows" from "unreachable"
//! without reading logs.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::errors::AppResult;
use crate::image_link::to_direct_view;
use crate::ingredient_parser::IngredientParser;
use crate::master_index::{canonical_name, MasterIndex};
use crate::models::{
    Announcement, CatalogueDetails, IngredientMasterRecord, RecipeRecord, StoreRecord,
    COMMON_STORE, PLACEHOLDER, STORE_SEPARATOR,
};

/// Canonical product name column of the catalogue
pub const CATALOGUE_KEY_COLUMN: &str = "商品名";

/// Catalogue column labels with a fixed display meaning
pub mod catalogue_columns {
    pub const PRODUCT_CODE: &str = "商品コード";
    pub const EXPIRY: &str = "賞味期限";
    pub const OPENED_SHELF_LIFE: &str = "開封後賞味期限目安";
    pub const STORAGE_TEMPERATURE: &str = "納品温度帯(保管温度帯)";
    pub const OPENED_TEMPERATURE: &str = "開封後温度帯";
    pub const MANUFACTURER: &str = "メーカー名";
    pub const SPECIFICATION: &str = "規格";
    pub const REMARKS: &str = "備考";
}

/// Why a source produced no data
#[derive(Debug, Clone, PartialEq)]
pub enum EmptyReason {
    /// The source could not be fetched or parsed
    Unavailable(String),
    /// The source loaded but held no usable rows
    NoRows,
    /// A column required to build the records is absent
    MissingKeyColumn(String),
}

/// Outcome of loading one tabular source
#[derive(Debug, Clone, PartialEq)]
pub enum SourceLoad<T> {
    Loaded(T),
    Empty(EmptyReason),
}

impl<T> SourceLoad<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, SourceLoad::Loaded(_))
    }

    pub fn empty_reason(&self) -> Option<&EmptyReason> {
        match self {
            SourceLoad::Loaded(_) => None,
            SourceLoad::Empty(reason) => Some(reason),
        }
    }
}

impl<T: Default> SourceLoad<T> {
    /// The loaded data, or an empty value
    pub fn into_data(self) -> T {
        match self {
            SourceLoad::Loaded(data) => data,
            SourceLoad::Empty(_) => T::default(),
        }
    }
}

/// Strip line breaks and surrounding whitespace from a column label
pub fn sanitize_header(raw: &str) -> String {
    raw.replace(['\r', '\n'], "").trim().to_string()
}

/// A parsed spreadsheet export with sanitized headers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Parse CSV text. Rows may be ragged; blank rows are skipped.
    pub fn from_csv(text: &str) -> AppResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.trim_start_matches('\u{feff}').as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(sanitize_header).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let values: Vec<String> = record.iter().map(str::to_string).collect();
            if values.iter().all(|value| value.trim().is_empty()) {
                continue;
            }
            rows.push(values);
        }

        Ok(Self { headers, rows })
    }

    pub fn has_column(&self, label: &str) -> bool {
        self.headers.iter().any(|header| header == label)
    }

    /// Iterate rows as label-addressable views
    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        let columns: HashMap<&str, usize> = self
            .headers
            .iter()
            .enumerate()
            .rev()
            .map(|(i, header)| (header.as_str(), i))
            .collect();
        self.rows.iter().map(move |cells| TableRow {
            columns: columns.clone(),
            cells: cells.as_slice(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One row addressed by column label.
///
/// When two columns share a label the leftmost one wins.
#[derive(Debug, Clone)]
pub struct TableRow<'a> {
    columns: HashMap<&'a str, usize>,
    cells: &'a [String],
}

impl<'a> TableRow<'a> {
    /// Trimmed cell text, `None` when the column or cell is absent or blank
    pub fn get(&self, label: &str) -> Option<&'a str> {
        self.columns
            .get(label)
            .and_then(|&i| self.cells.get(i))
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
    }

    /// Trimmed cell text or `default`
    pub fn get_or(&self, label: &str, default: &str) -> String {
        self.get(label).unwrap_or(default).to_string()
    }
}

/// Normalize the recipe source
pub fn normalize_recipes(table: &RawTable, parser: &IngredientParser) -> SourceLoad<Vec<RecipeRecord>> {
    if !table.has_column("title") {
        warn!("Recipe source has no title column");
        return SourceLoad::Empty(EmptyReason::MissingKeyColumn("title".to_string()));
    }
    if !table.has_column("target_stores") {
        debug!("Recipe source has no target_stores column, defaulting to {}", COMMON_STORE);
    }

    let recipes: Vec<RecipeRecord> = table
        .rows()
        .filter_map(|row| {
            let title = row.get("title")?.to_string();
            let ingredients_raw = row.get_or("ingredients", "");
            let target_stores_raw = row.get_or("target_stores", COMMON_STORE);
            let target_stores = target_stores_raw
                .split(STORE_SEPARATOR)
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .map(str::to_string)
                .collect();

            Some(RecipeRecord {
                title,
                category: row.get_or("category", ""),
                time: row.get_or("time", ""),
                image: to_direct_view(&row.get_or("image", "")),
                steps: row.get_or("steps", ""),
                ingredients: parser.ingredient_names(&ingredients_raw),
                ingredients_raw,
                target_stores_raw,
                target_stores,
                tableware: row.get_or("tableware", PLACEHOLDER),
                cutlery: row.get_or("cutlery", PLACEHOLDER),
                caution: row.get_or("caution", PLACEHOLDER),
            })
        })
        .collect();

    if recipes.is_empty() {
        SourceLoad::Empty(EmptyReason::NoRows)
    } else {
        SourceLoad::Loaded(recipes)
    }
}

/// Normalize the ingredient catalogue into an ordered index
pub fn normalize_catalogue(table: &RawTable) -> SourceLoad<MasterIndex> {
    use self::catalogue_columns::*;

    if !table.has_column(CATALOGUE_KEY_COLUMN) {
        warn!("Catalogue source has no {} column", CATALOGUE_KEY_COLUMN);
        return SourceLoad::Empty(EmptyReason::MissingKeyColumn(
            CATALOGUE_KEY_COLUMN.to_string(),
        ));
    }

    // One attribute per distinct label; a repeated label reads the leftmost column like `TableRow::get`
    let mut seen = HashSet::new();
    let attribute_labels: Vec<&str> = table
        .headers
        .iter()
        .map(String::as_str)
        .filter(|label| *label != CATALOGUE_KEY_COLUMN && !label.is_empty())
        .filter(|label| seen.insert(*label))
        .collect();

    let records = table.rows().filter_map(|row| {
        let name = canonical_name(row.get(CATALOGUE_KEY_COLUMN)?);
        let attributes = attribute_labels
            .iter()
            .map(|label| (label.to_string(), row.get_or(label, PLACEHOLDER)))
            .collect();

        Some(IngredientMasterRecord {
            name,
            details: CatalogueDetails {
                product_code: row.get_or(PRODUCT_CODE, PLACEHOLDER),
                expiry: row.get_or(EXPIRY, PLACEHOLDER),
                opened_shelf_life: row.get_or(OPENED_SHELF_LIFE, PLACEHOLDER),
                storage_temperature: row.get_or(STORAGE_TEMPERATURE, PLACEHOLDER),
                opened_temperature: row.get_or(OPENED_TEMPERATURE, PLACEHOLDER),
                manufacturer: row.get_or(MANUFACTURER, PLACEHOLDER),
                specification: row.get_or(SPECIFICATION, PLACEHOLDER),
                remarks: row.get_or(REMARKS, PLACEHOLDER),
            },
            attributes,
        })
    });

    let index = MasterIndex::from_records(records);
    if index.is_empty() {
        SourceLoad::Empty(EmptyReason::NoRows)
    } else {
        SourceLoad::Loaded(index)
    }
}

/// Normalize the store roster
pub fn normalize_stores(table: &RawTable) -> SourceLoad<Vec<StoreRecord>> {
    if !table.has_column("store_code") {
        return SourceLoad::Empty(EmptyReason::MissingKeyColumn("store_code".to_string()));
    }

    let stores: Vec<StoreRecord> = table
        .rows()
        .filter_map(|row| {
            Some(StoreRecord {
                store_code: row.get("store_code")?.to_string(),
                password: row.get_or("password", ""),
                store_name: row.get_or("store_name", ""),
            })
        })
        .collect();

    if stores.is_empty() {
        SourceLoad::Empty(EmptyReason::NoRows)
    } else {
        SourceLoad::Loaded(stores)
    }
}

/// Interpret a boolean-like spreadsheet cell
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "y" | "○" | "◯" | "はい" | "重要"
    )
}

/// Parse `YYYY-MM-DD` or `YYYY/MM/DD`
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .ok()
}

/// Normalize the announcement source
pub fn normalize_announcements(table: &RawTable) -> SourceLoad<Vec<Announcement>> {
    if !table.has_column("title") {
        return SourceLoad::Empty(EmptyReason::MissingKeyColumn("title".to_string()));
    }

    let announcements: Vec<Announcement> = table
        .rows()
        .filter_map(|row| {
            let date = row.get_or("date", "");
            Some(Announcement {
                title: row.get("title")?.to_string(),
                parsed_date: parse_date(&date),
                date,
                content: row.get_or("content", ""),
                important: row.get("important").map(parse_flag).unwrap_or(false),
            })
        })
        .collect();

    if announcements.is_empty() {
        SourceLoad::Empty(EmptyReason::NoRows)
    } else {
        SourceLoad::Loaded(announcements)
    }
}

/// Important announcements first, then newest first; undated entries last
pub fn sort_announcements(announcements: &mut [Announcement]) {
    announcements.sort_by(|a, b| {
        b.important
            .cmp(&a.important)
            .then_with(|| b.parsed_date.cmp(&a.parsed_date))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_header() {
        assert_eq!(sanitize_header(" title\r\n"), "title");
        assert_eq!(sanitize_header("納品温度帯\n(保管温度帯)"), "納品温度帯(保管温度帯)");
        assert_eq!(sanitize_header("Title"), "Title");
    }

    #[test]
    fn test_from_csv_skips_blank_rows_and_keeps_multiline_cells() {
        let csv = "title,ingredients\n\"カレー\",\"玉ねぎ、1個\n人参、1本\"\n,\n";
        let table = RawTable::from_csv(csv).unwrap();
        assert_eq!(table.headers, vec!["title", "ingredients"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][1], "玉ねぎ、1個\n人参、1本");
    }

    #[test]
    fn test_row_get_treats_blank_as_absent() {
        let table = RawTable::from_csv("a,b\n  ,x\n").unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("a"), None);
        assert_eq!(row.get("b"), Some("x"));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.get_or("missing", "-"), "-");
    }

    #[test]
    fn test_normalize_recipes_fills_defaults() {
        let csv = "title,category,image,ingredients,target_stores\n\
                   カレー,メイン,https://drive.google.com/file/d/img1/view,\"玉ねぎ、1個\n玉ねぎ、飾り\",\n\
                   ,メイン,,,渋谷店\n";
        let table = RawTable::from_csv(csv).unwrap();
        let load = normalize_recipes(&table, &IngredientParser::new());
        assert!(load.is_loaded());

        let recipes = load.into_data();
        assert_eq!(recipes.len(), 1);
        let curry = &recipes[0];
        assert_eq!(curry.target_stores_raw, COMMON_STORE);
        assert_eq!(curry.target_stores, vec![COMMON_STORE]);
        assert_eq!(curry.ingredients, vec!["玉ねぎ"]);
        assert_eq!(curry.caution, PLACEHOLDER);
        assert!(curry.has_image());
    }

    #[test]
    fn test_normalize_distinguishes_empty_reasons() {
        let parser = IngredientParser::new();

        let no_title = RawTable::from_csv("name\nカレー\n").unwrap();
        assert_eq!(
            normalize_recipes(&no_title, &parser).empty_reason(),
            Some(&EmptyReason::MissingKeyColumn("title".to_string()))
        );

        let header_only = RawTable::from_csv("title,category\n").unwrap();
        assert_eq!(
            normalize_recipes(&header_only, &parser).empty_reason(),
            Some(&EmptyReason::NoRows)
        );

        let no_key = RawTable::from_csv("商品コード\n1001\n").unwrap();
        assert!(matches!(
            normalize_catalogue(&no_key).empty_reason(),
            Some(EmptyReason::MissingKeyColumn(_))
        ));
    }

    #[test]
    fn test_normalize_catalogue_attributes_follow_headers() {
        let csv = "商品名,規格,\"備考\n\"\n\"玉ねぎ\n\",1kg,\n";
        let index = normalize_catalogue(&RawTable::from_csv(csv).unwrap()).into_data();

        let onion = index.get("玉ねぎ").unwrap();
        assert_eq!(
            onion.attributes,
            vec![
                ("規格".to_string(), "1kg".to_string()),
                ("備考".to_string(), PLACEHOLDER.to_string()),
            ]
        );
        assert_eq!(onion.details.specification, "1kg");
        assert_eq!(onion.details.product_code, PLACEHOLDER);
    }

    #[test]
    fn test_repeated_catalogue_header_yields_one_attribute() {
        let csv = "商品名,備考,規格,備考\n塩,a,1kg,b\n";
        let index = normalize_catalogue(&RawTable::from_csv(csv).unwrap()).into_data();

        let salt = index.get("塩").unwrap();
        assert_eq!(
            salt.attributes,
            vec![
                ("備考".to_string(), "a".to_string()),
                ("規格".to_string(), "1kg".to_string()),
            ]
        );
        assert_eq!(salt.details.remarks, "a");
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" はい "));
        assert!(!parse_flag("FALSE"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024/04/01"), NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(parse_date("2024-04-01"), NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(parse_date("4月1日"), None);
    }

    #[test]
    fn test_sort_announcements() {
        let make = |title: &str, date: &str, important: bool| Announcement {
            title: title.to_string(),
            date: date.to_string(),
            parsed_date: parse_date(date),
            content: String::new(),
            important,
        };
        let mut list = vec![
            make("old", "2024-01-01", false),
            make("undated", "", false),
            make("new", "2024-03-01", false),
            make("pinned", "2023-01-01", true),
        ];
        sort_announcements(&mut list);
        let titles: Vec<&str> = list.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["pinned", "new", "old", "undated"]);
    }
}
