//! # Ingredient Master Index
//!
//! Maps canonical product names to catalogue records while remembering the
//! order rows were inserted. Substring resolution walks keys in this order,
//! so iteration order is part of the matching contract and must never depend
//! on hashing.

use std::collections::HashMap;

use tracing::debug;

use crate::models::IngredientMasterRecord;

/// Insertion-ordered product name index
#[derive(Debug, Clone, Default)]
pub struct MasterIndex {
    entries: Vec<IngredientMasterRecord>,
    positions: HashMap<String, usize>,
}

/// Normalize a product name into its canonical key.
///
/// Line breaks are removed and surrounding whitespace trimmed; nothing else
/// is folded.
pub fn canonical_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .collect::<String>()
        .trim()
        .to_string()
}

impl MasterIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from records in catalogue order
    pub fn from_records(records: impl IntoIterator<Item = IngredientMasterRecord>) -> Self {
        let mut index = Self::new();
        for record in records {
            index.insert(record);
        }
        index
    }

    /// Insert a record under its canonical name.
    ///
    /// A later row with the same name replaces the earlier record but keeps
    /// the position the name was first inserted at. Records whose name is
    /// empty after trimming are ignored.
    pub fn insert(&mut self, mut record: IngredientMasterRecord) {
        record.name = canonical_name(&record.name);
        if record.name.is_empty() {
            return;
        }

        match self.positions.get(&record.name) {
            Some(&position) => {
                debug!(name = %record.name, "Duplicate catalogue name, later row wins");
                self.entries[position] = record;
            }
            None => {
                self.positions
                    .insert(record.name.clone(), self.entries.len());
                self.entries.push(record);
            }
        }
    }

    /// Exact lookup by canonical name
    pub fn get(&self, name: &str) -> Option<&IngredientMasterRecord> {
        self.positions.get(name).map(|&position| &self.entries[position])
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &IngredientMasterRecord> {
        self.entries.iter()
    }

    /// Canonical names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|record| record.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
