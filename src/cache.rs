//! Snapshot caching with a fixed revalidation window.
//!
//! Readers always receive a whole `Arc<Snapshot>`. A refresh builds the new
//! snapshot off to the side and swaps the pointer in one step, so a request
//! sees either the old snapshot or the new one, never a mix.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use recipe_viewer::cache::SnapshotCache;
//! use recipe_viewer::config::SourcesConfig;
//! use recipe_viewer::ingredient_parser::IngredientParser;
//! use recipe_viewer::sources::FileFetcher;
//!
//! # async fn run() {
//! let cache = SnapshotCache::new(std::time::Duration::from_secs(60));
//! let sources = SourcesConfig::default();
//! let snapshot = cache
//!     .get_or_refresh(&FileFetcher::new(), &sources, &IngredientParser::new())
//!     .await;
//! println!("{} recipes", snapshot.recipes.len());
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::config::SourcesConfig;
use crate::ingredient_parser::IngredientParser;
use crate::snapshot::{load_snapshot, Snapshot};
use crate::sources::SourceFetcher;

/// Cached value with expiration time
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached value
    pub value: T,
    /// When this entry expires
    pub expires_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    /// An entry that is already due for refresh
    pub fn expired(value: T) -> Self {
        Self {
            value,
            expires_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    /// Reads served from a fresh snapshot
    pub hits: u64,
    /// Reads that found the snapshot stale
    pub misses: u64,
    /// Snapshots installed
    pub refreshes: u64,
    /// Refreshes that produced no data and kept the previous snapshot
    pub kept_previous: u64,
}

/// Holds the current snapshot for one revalidation window at a time
#[derive(Debug)]
pub struct SnapshotCache {
    entry: RwLock<CacheEntry<Arc<Snapshot>>>,
    stats: RwLock<CacheStats>,
    ttl: Duration,
}

impl SnapshotCache {
    /// Create a cache holding an empty, already-stale snapshot
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(CacheEntry::expired(Arc::new(Snapshot::empty()))),
            stats: RwLock::new(CacheStats::default()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The current snapshot, fresh or not
    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.entry.read().value)
    }

    pub fn is_stale(&self) -> bool {
        self.entry.read().is_expired()
    }

    /// Install a freshly loaded snapshot and start a new window.
    ///
    /// A snapshot in which every source failed does not replace one that
    /// holds data; the previous snapshot is kept for another window instead.
    pub fn install(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let mut entry = self.entry.write();
        let mut stats = self.stats.write();

        if !snapshot.has_any_data() && entry.value.has_any_data() {
            warn!("Every source failed to load, keeping previous snapshot");
            stats.kept_previous += 1;
            let previous = Arc::clone(&entry.value);
            *entry = CacheEntry::new(Arc::clone(&previous), self.ttl);
            return previous;
        }

        let snapshot = Arc::new(snapshot);
        *entry = CacheEntry::new(Arc::clone(&snapshot), self.ttl);
        stats.refreshes += 1;
        snapshot
    }

    /// Return the current snapshot, reloading all sources first if the window has passed
    pub async fn get_or_refresh<F: SourceFetcher>(
        &self,
        fetcher: &F,
        sources: &SourcesConfig,
        parser: &IngredientParser,
    ) -> Arc<Snapshot> {
        {
            let entry = self.entry.read();
            if !entry.is_expired() {
                self.stats.write().hits += 1;
                return Arc::clone(&entry.value);
            }
        }

        self.stats.write().misses += 1;
        debug!("Snapshot stale, refreshing");
        let snapshot = load_snapshot(fetcher, sources, parser).await;
        self.install(snapshot)
    }

    /// Force the next read to refresh
    pub fn invalidate(&self) {
        self.entry.write().expires_at = Instant::now();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SourceStatus;
    use std::thread;

    fn snapshot_with_data(loaded: bool) -> Snapshot {
        let mut snapshot = Snapshot::empty();
        snapshot.statuses = vec![SourceStatus {
            source: "recipes",
            loaded,
            rows: usize::from(loaded),
            reason: None,
        }];
        snapshot
    }

    #[test]
    fn test_cache_entry_expiration() {
        let entry = CacheEntry::new("value", Duration::from_millis(10));
        assert!(!entry.is_expired());
        thread::sleep(Duration::from_millis(20));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_new_cache_is_stale() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        assert!(cache.is_stale());
        assert!(cache.current().recipes.is_empty());
    }

    #[test]
    fn test_install_starts_new_window() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        cache.install(snapshot_with_data(true));
        assert!(!cache.is_stale());
        assert_eq!(cache.stats().refreshes, 1);

        cache.invalidate();
        assert!(cache.is_stale());
    }

    #[test]
    fn test_failed_refresh_keeps_previous_snapshot() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        let first = cache.install(snapshot_with_data(true));
        let second = cache.install(snapshot_with_data(false));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().kept_previous, 1);
    }

    #[test]
    fn test_readers_keep_their_snapshot_across_refresh() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        let before = cache.install(snapshot_with_data(true));
        let held = cache.current();
        let after = cache.install(snapshot_with_data(true));

        assert!(Arc::ptr_eq(&before, &held));
        assert!(!Arc::ptr_eq(&held, &after));
    }
}
