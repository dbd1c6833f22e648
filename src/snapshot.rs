//! # Snapshot Loading
//!
//! A snapshot is one consistent, immutable copy of all four sources. It is
//! built completely before anyone can see it and never mutated afterwards.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, info_span, Instrument};

use crate::config::SourcesConfig;
use crate::errors::error_logging::log_source_error;
use crate::errors::AppResult;
use crate::ingredient_parser::IngredientParser;
use crate::master_index::MasterIndex;
use crate::models::{Announcement, IngredientMasterRecord, RecipeRecord, StoreRecord};
use crate::observability;
use crate::schema::{self, EmptyReason, RawTable, SourceLoad};
use crate::sources::{SourceFetcher, SourceKind};

/// Number of catalogue rows included in the diagnostics preview
const CATALOGUE_PREVIEW_ROWS: usize = 5;

/// Load status of one source, for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceStatus {
    pub source: &'static str,
    pub loaded: bool,
    pub rows: usize,
    pub reason: Option<String>,
}

/// All four datasets from one refresh
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub recipes: Vec<RecipeRecord>,
    pub master_index: MasterIndex,
    pub stores: Vec<StoreRecord>,
    pub announcements: Vec<Announcement>,
    pub statuses: Vec<SourceStatus>,
    pub loaded_at: Instant,
}

impl Snapshot {
    /// A snapshot with no data, used before the first successful refresh
    pub fn empty() -> Self {
        Self {
            recipes: Vec::new(),
            master_index: MasterIndex::new(),
            stores: Vec::new(),
            announcements: Vec::new(),
            statuses: Vec::new(),
            loaded_at: Instant::now(),
        }
    }

    /// Whether at least one source produced data
    pub fn has_any_data(&self) -> bool {
        self.statuses.iter().any(|status| status.loaded)
    }

    pub fn status(&self, kind: SourceKind) -> Option<&SourceStatus> {
        self.statuses.iter().find(|status| status.source == kind.as_str())
    }

    /// First catalogue records, for the admin diagnostics view
    pub fn catalogue_preview(&self) -> Vec<&IngredientMasterRecord> {
        self.master_index.iter().take(CATALOGUE_PREVIEW_ROWS).collect()
    }
}

fn describe(reason: &EmptyReason) -> String {
    match reason {
        EmptyReason::Unavailable(msg) => format!("unavailable: {}", msg),
        EmptyReason::NoRows => "no rows".to_string(),
        EmptyReason::MissingKeyColumn(column) => format!("missing column: {}", column),
    }
}

fn status_of<T>(kind: SourceKind, load: &SourceLoad<T>, rows: impl FnOnce(&T) -> usize) -> SourceStatus {
    match load {
        SourceLoad::Loaded(data) => SourceStatus {
            source: kind.as_str(),
            loaded: true,
            rows: rows(data),
            reason: None,
        },
        SourceLoad::Empty(reason) => SourceStatus {
            source: kind.as_str(),
            loaded: false,
            rows: 0,
            reason: Some(describe(reason)),
        },
    }
}

async fn fetch_table<F: SourceFetcher>(fetcher: &F, location: &str) -> AppResult<RawTable> {
    let text = fetcher.fetch(location).await?;
    RawTable::from_csv(&text)
}

/// Fetch and parse one source into a table; failures become `Empty`
pub async fn load_table<F: SourceFetcher>(
    fetcher: &F,
    kind: SourceKind,
    location: Option<&str>,
) -> SourceLoad<RawTable> {
    let Some(location) = location else {
        log_source_error(&"no location configured", kind.as_str(), None);
        observability::record_source_load_metrics(kind.as_str(), false);
        return SourceLoad::Empty(EmptyReason::Unavailable(
            "no location configured".to_string(),
        ));
    };

    let result = fetch_table(fetcher, location).await;
    observability::record_source_load_metrics(kind.as_str(), result.is_ok());
    match result {
        Ok(table) => SourceLoad::Loaded(table),
        Err(e) => {
            log_source_error(&e, kind.as_str(), Some(location));
            SourceLoad::Empty(EmptyReason::Unavailable(e.to_string()))
        }
    }
}

fn normalize<T>(
    table: SourceLoad<RawTable>,
    build: impl FnOnce(&RawTable) -> SourceLoad<T>,
) -> SourceLoad<T> {
    match table {
        SourceLoad::Loaded(table) => build(&table),
        SourceLoad::Empty(reason) => SourceLoad::Empty(reason),
    }
}

/// Fetch every source and assemble a snapshot. Never fails; unavailable
/// sources come back empty and are reported in `statuses`.
pub async fn load_snapshot<F: SourceFetcher>(
    fetcher: &F,
    sources: &SourcesConfig,
    parser: &IngredientParser,
) -> Snapshot {
    let span = info_span!("load_snapshot");
    async {
        let start = Instant::now();

        let recipes = normalize(
            load_table(fetcher, SourceKind::Recipes, sources.recipes_url.as_deref()).await,
            |table| schema::normalize_recipes(table, parser),
        );
        let catalogue = normalize(
            load_table(fetcher, SourceKind::Catalogue, sources.catalogue_url.as_deref()).await,
            schema::normalize_catalogue,
        );
        let stores = normalize(
            load_table(fetcher, SourceKind::Stores, sources.stores_url.as_deref()).await,
            schema::normalize_stores,
        );
        let announcements = normalize(
            load_table(
                fetcher,
                SourceKind::Announcements,
                sources.announcements_url.as_deref(),
            )
            .await,
            schema::normalize_announcements,
        );

        let statuses = vec![
            status_of(SourceKind::Recipes, &recipes, |v| v.len()),
            status_of(SourceKind::Catalogue, &catalogue, |index| index.len()),
            status_of(SourceKind::Stores, &stores, |v| v.len()),
            status_of(SourceKind::Announcements, &announcements, |v| v.len()),
        ];

        let mut announcements = announcements.into_data();
        schema::sort_announcements(&mut announcements);

        let snapshot = Snapshot {
            recipes: recipes.into_data(),
            master_index: catalogue.into_data(),
            stores: stores.into_data(),
            announcements,
            statuses,
            loaded_at: Instant::now(),
        };

        observability::record_snapshot_refresh_metrics(start.elapsed());
        info!(
            recipes = snapshot.recipes.len(),
            catalogue = snapshot.master_index.len(),
            stores = snapshot.stores.len(),
            announcements = snapshot.announcements.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Snapshot loaded"
        );
        snapshot
    }
    .instrument(span)
    .await
}
