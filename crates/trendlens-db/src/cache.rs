//! Process-wide TTL cache for query snapshots.
//!
//! One map, keyed by operation + store identity + scalar parameters, shared
//! by every render task for the lifetime of the process. Entries are
//! immutable once written: a key's value is only ever replaced by a full
//! recomputation, never mutated in place, so the single mutex around the map
//! is all the locking required.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::queries::{DailyTrendRow, RecentArticleRow};

/// Identity of one cached query result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    DailyTrends { store: String, window_days: u32 },
    RecentArticles { store: String, limit: i64 },
}

/// A cached row snapshot. Rows are behind an `Arc` so a cache hit hands out
/// a pointer clone, never a copy of the rows.
#[derive(Debug, Clone)]
pub enum CachedRows {
    Trends(Arc<Vec<DailyTrendRow>>),
    Articles(Arc<Vec<RecentArticleRow>>),
}

#[derive(Debug)]
struct CacheEntry {
    inserted_at: Instant,
    rows: CachedRows,
}

/// TTL cache shared by all renders in the process.
#[derive(Debug, Clone)]
pub struct QueryCache {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<QueryKey, CacheEntry>>>,
}

impl QueryCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the cached rows for `key` when a live entry exists.
    ///
    /// An entry older than the TTL counts as a miss and is dropped on the
    /// spot, so the map never accumulates stale snapshots.
    pub async fn get(&self, key: &QueryKey) -> Option<CachedRows> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.rows.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Memoizes `rows` under `key`, replacing any previous entry.
    pub async fn insert(&self, key: QueryKey, rows: CachedRows) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key,
            CacheEntry {
                inserted_at: Instant::now(),
                rows,
            },
        );
    }

    /// Drops every entry regardless of age. This is the "Refresh Data"
    /// path: one lock, one clear, no per-key negotiation.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
