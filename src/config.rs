//! # Unified Application Configuration
//!
//! This module consolidates every setting into one structured configuration
//! object loaded from environment variables, with per-section validation.

use std::env;
use std::time::Duration;

use crate::errors::{AppError, AppResult};
use crate::ingredient_parser::ParserConfig;
use crate::observability_config::ObservabilityConfig;
use crate::search::SearchConfig;

/// Where the four tabular sources live
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourcesConfig {
    pub recipes_url: Option<String>,
    pub catalogue_url: Option<String>,
    pub stores_url: Option<String>,
    pub announcements_url: Option<String>,
}

impl SourcesConfig {
    /// Validate source locations
    pub fn validate(&self) -> AppResult<()> {
        if self.recipes_url.as_deref().map_or(true, |url| url.trim().is_empty()) {
            return Err(AppError::Config("Recipe source URL cannot be empty".to_string()));
        }
        if self.catalogue_url.as_deref().map_or(true, |url| url.trim().is_empty()) {
            return Err(AppError::Config(
                "Catalogue source URL cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Snapshot refresh and fetch settings
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Revalidation window in seconds
    pub snapshot_ttl_secs: u64,
    /// HTTP client timeout in seconds
    pub http_timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            snapshot_ttl_secs: 60,
            http_timeout_secs: 30,
        }
    }
}

impl CacheConfig {
    /// Validate cache configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.snapshot_ttl_secs == 0 {
            return Err(AppError::Config("Snapshot TTL cannot be 0".to_string()));
        }
        if self.snapshot_ttl_secs > 86_400 {
            return Err(AppError::Config(
                "Snapshot TTL cannot be greater than 86400 seconds (1 day)".to_string(),
            ));
        }
        if self.http_timeout_secs == 0 {
            return Err(AppError::Config("HTTP timeout cannot be 0".to_string()));
        }
        if self.http_timeout_secs > 300 {
            return Err(AppError::Config(
                "HTTP timeout cannot be greater than 300 seconds".to_string(),
            ));
        }
        Ok(())
    }

    pub fn snapshot_ttl(&self) -> Duration {
        Duration::from_secs(self.snapshot_ttl_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(key: &str, default: &str) -> AppResult<T> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be a valid number", key)))
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub sources: SourcesConfig,
    pub cache: CacheConfig,
    pub search: SearchConfig,
    pub parser: ParserConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        config.sources = SourcesConfig {
            recipes_url: optional_var("RECIPE_SOURCE_URL"),
            catalogue_url: optional_var("CATALOGUE_SOURCE_URL"),
            stores_url: optional_var("STORE_SOURCE_URL"),
            announcements_url: optional_var("ANNOUNCEMENT_SOURCE_URL"),
        };

        config.cache.snapshot_ttl_secs = parsed_var("SNAPSHOT_TTL_SECS", "60")?;
        config.cache.http_timeout_secs = parsed_var("HTTP_CLIENT_TIMEOUT_SECS", "30")?;

        config.search.threshold = parsed_var("SEARCH_THRESHOLD", "60")?;
        config.search.title_weight = parsed_var("SEARCH_TITLE_WEIGHT", "1.1")?;

        if let Some(delimiter) = optional_var("INGREDIENT_DELIMITER") {
            let mut chars = delimiter.chars();
            config.parser.delimiter = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(AppError::Config(
                        "INGREDIENT_DELIMITER must be exactly one character".to_string(),
                    ))
                }
            };
        }

        config.observability = ObservabilityConfig::from_env();

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.sources.validate()?;
        self.cache.validate()?;
        self.search.validate()?;
        self.parser.validate()?;
        self.observability
            .validate()
            .map_err(AppError::Config)?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: recipes_url={}, catalogue_url={}, stores_url={}, announcements_url={}, snapshot_ttl_secs={}, search_threshold={}, title_weight={}, environment={}",
            self.sources.recipes_url.is_some(),
            self.sources.catalogue_url.is_some(),
            self.sources.stores_url.is_some(),
            self.sources.announcements_url.is_some(),
            self.cache.snapshot_ttl_secs,
            self.search.threshold,
            self.search.title_weight,
            self.observability.environment
        )
    }
}
