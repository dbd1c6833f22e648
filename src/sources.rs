//! # Tabular Source Fetching
//!
//! Fetching is the only I/O in the crate. A [`SourceFetcher`] turns a source
//! location into CSV text; everything after that is pure.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};

lazy_static! {
    static ref SHEET_EDIT_URL: Regex = Regex::new(
        r"^(?P<base>https://docs\.google\.com/spreadsheets/d/[A-Za-z0-9_-]+)/(?:edit|view)[^#]*?(?:[?&#]gid=(?P<gid>\d+))?(?:#.*)?$"
    )
    .expect("Invalid spreadsheet URL regex pattern");
}

/// The four tabular sources behind a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Recipes,
    Catalogue,
    Stores,
    Announcements,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Recipes,
        SourceKind::Catalogue,
        SourceKind::Stores,
        SourceKind::Announcements,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Recipes => "recipes",
            SourceKind::Catalogue => "catalogue",
            SourceKind::Stores => "stores",
            SourceKind::Announcements => "announcements",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rewrite a spreadsheet edit/view URL into its CSV export form.
///
/// `.../d/<id>/edit?gid=805#gid=805` becomes `.../d/<id>/export?format=csv&gid=805`.
/// Other URLs pass through unchanged.
pub fn csv_export_url(url: &str) -> String {
    let url = url.trim();
    match SHEET_EDIT_URL.captures(url) {
        Some(caps) => {
            let base = &caps["base"];
            let gid = caps.name("gid").map(|m| m.as_str()).unwrap_or("0");
            format!("{}/export?format=csv&gid={}", base, gid)
        }
        None => url.to_string(),
    }
}

/// Produces the raw CSV text of a source
#[allow(async_fn_in_trait)]
pub trait SourceFetcher {
    async fn fetch(&self, location: &str) -> AppResult<String>;
}

/// Fetches sources over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, location: &str) -> AppResult<String> {
        let url = csv_export_url(location);
        debug!(url = %url, "Fetching source");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body = response.text().await?;

        info!(url = %url, bytes = body.len(), "Fetched source");
        Ok(body)
    }
}

/// Reads sources from local files, relative to an optional base directory
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    base_dir: Option<PathBuf>,
}

impl FileFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }
}

impl SourceFetcher for FileFetcher {
    async fn fetch(&self, location: &str) -> AppResult<String> {
        let path = match &self.base_dir {
            Some(base) => base.join(location),
            None => PathBuf::from(location),
        };
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AppError::Source(format!("{}: {}", path.display(), e)))
    }
}

/// Serves fixed CSV text per location; unknown locations are unavailable
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, location: impl Into<String>, body: impl Into<String>) -> Self {
        self.bodies.insert(location.into(), body.into());
        self
    }
}

impl SourceFetcher for StaticFetcher {
    async fn fetch(&self, location: &str) -> AppResult<String> {
        self.bodies
            .get(location)
            .cloned()
            .ok_or_else(|| AppError::Source(format!("no such source: {}", location)))
    }
}
