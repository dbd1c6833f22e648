//! # Ingredient-Line Parser
//!
//! Splits a recipe's free-text ingredient block into structured lines and a
//! flat, de-duplicated list of ingredient names.
//!
//! Each line holds up to three fields separated by a single delimiter
//! character (the full-width `、` by default):
//!
//! ```text
//! 玉ねぎ、1個、みじん切り      -> name=玉ねぎ quantity=1個 note=みじん切り
//! 塩、少々                    -> name=塩     quantity=少々 note=
//! こしょう                    -> name=こしょう quantity=     note=
//! ```
//!
//! Lines without a name are dropped. A blank block yields no lines.

use std::collections::HashSet;

use tracing::trace;

use crate::errors::{AppError, AppResult};
use crate::models::ParsedIngredientLine;

/// Default field delimiter inside an ingredient line
pub const DEFAULT_DELIMITER: char = '、';

/// Configuration options for ingredient line parsing
#[derive(Clone, Debug)]
pub struct ParserConfig {
    /// Field delimiter between name, quantity and note
    pub delimiter: char,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl ParserConfig {
    /// Validate parser configuration parameters
    pub fn validate(&self) -> AppResult<()> {
        if self.delimiter == '\n' || self.delimiter == '\r' {
            return Err(AppError::Config(
                "ingredient delimiter cannot be a line break".to_string(),
            ));
        }
        if self.delimiter.is_whitespace() {
            return Err(AppError::Config(
                "ingredient delimiter cannot be whitespace".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parses ingredient blocks using a fixed delimiter
#[derive(Clone, Debug, Default)]
pub struct IngredientParser {
    config: ParserConfig,
}

impl IngredientParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a single line into name, quantity and note.
    ///
    /// Returns `None` for lines whose name field is empty.
    pub fn parse_line(&self, line: &str) -> Option<ParsedIngredientLine> {
        let mut parts = line.splitn(3, self.config.delimiter).map(str::trim);

        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            trace!(line = %line, "Dropping ingredient line without a name");
            return None;
        }

        Some(ParsedIngredientLine {
            name: name.to_string(),
            quantity: parts.next().unwrap_or_default().to_string(),
            note: parts.next().unwrap_or_default().to_string(),
        })
    }

    /// Parse every non-blank line of an ingredient block
    pub fn parse_lines(&self, block: &str) -> Vec<ParsedIngredientLine> {
        block
            .split('\n')
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| self.parse_line(line))
            .collect()
    }

    /// Distinct ingredient names of a block in first-seen order
    pub fn ingredient_names(&self, block: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.parse_lines(block)
            .into_iter()
            .filter_map(|line| {
                if seen.insert(line.name.clone()) {
                    Some(line.name)
                } else {
                    None
                }
            })
            .collect()
    }
}
