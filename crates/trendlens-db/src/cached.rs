//! Read-through cached wrappers over the dashboard queries.
//!
//! Each wrapper is lookup → miss → query → memoize. A query failure is
//! returned to the caller and never memoized, so the next render simply
//! re-attempts it; the only way to discard live entries early is
//! [`QueryCache::clear`].

use std::sync::Arc;

use chrono::Local;
use sqlx::SqlitePool;
use tracing::debug;

use crate::cache::{CachedRows, QueryCache, QueryKey};
use crate::queries::{self, DailyTrendRow, RecentArticleRow};
use crate::DbError;

/// Fetch the trend rows for the rolling `window_days` window, memoized per
/// (store, window).
///
/// The window's `today` is the local calendar date at the instant the query
/// actually runs — a cache hit serves whatever window the memoized query
/// used, which is the point of the cache.
///
/// # Errors
///
/// Returns [`DbError`] if the underlying query fails; failures are not
/// cached.
pub async fn fetch_daily_trends(
    pool: &SqlitePool,
    cache: &QueryCache,
    store: &str,
    window_days: u32,
) -> Result<Arc<Vec<DailyTrendRow>>, DbError> {
    let key = QueryKey::DailyTrends {
        store: store.to_owned(),
        window_days,
    };

    if let Some(CachedRows::Trends(rows)) = cache.get(&key).await {
        debug!(window_days, "daily trends served from cache");
        return Ok(rows);
    }

    let today = Local::now().date_naive();
    let rows = Arc::new(queries::list_daily_trends(pool, today, window_days).await?);
    cache
        .insert(key, CachedRows::Trends(Arc::clone(&rows)))
        .await;
    debug!(window_days, rows = rows.len(), "daily trends memoized");

    Ok(rows)
}

/// Fetch the most recent articles with sentiment, memoized per
/// (store, limit).
///
/// # Errors
///
/// Returns [`DbError`] if the underlying query fails; failures are not
/// cached.
pub async fn fetch_recent_articles(
    pool: &SqlitePool,
    cache: &QueryCache,
    store: &str,
    limit: i64,
) -> Result<Arc<Vec<RecentArticleRow>>, DbError> {
    let key = QueryKey::RecentArticles {
        store: store.to_owned(),
        limit,
    };

    if let Some(CachedRows::Articles(rows)) = cache.get(&key).await {
        debug!(limit, "recent articles served from cache");
        return Ok(rows);
    }

    let rows = Arc::new(queries::list_recent_articles(pool, limit).await?);
    cache
        .insert(key, CachedRows::Articles(Arc::clone(&rows)))
        .await;
    debug!(limit, rows = rows.len(), "recent articles memoized");

    Ok(rows)
}
