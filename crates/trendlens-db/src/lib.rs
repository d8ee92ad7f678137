use std::path::{Path, PathBuf};
use std::{env, time::Duration};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MIN_CONNECTIONS: u32 = 0;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_connections: read_u32("TRENDLENS_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
            min_connections: read_u32("TRENDLENS_DB_MIN_CONNECTIONS", DEFAULT_MIN_CONNECTIONS),
            acquire_timeout_secs: read_u64(
                "TRENDLENS_DB_ACQUIRE_TIMEOUT_SECS",
                DEFAULT_ACQUIRE_TIMEOUT_SECS,
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("store file '{}' does not exist", .0.display())]
    StoreMissing(PathBuf),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Open the SQLite store file for reading.
///
/// The store is owned by the external ingestion pipeline, so the file is
/// opened read-only and is never created here — an absent file is a
/// connection error, not an invitation to make one. The returned pool is
/// `Clone` and safe to share across concurrent render tasks.
///
/// # Errors
///
/// Returns [`DbError::StoreMissing`] if `path` does not exist, or
/// [`DbError::Sqlx`] if the pool cannot be established.
pub async fn connect_store(path: &Path, config: PoolConfig) -> Result<SqlitePool, DbError> {
    if !path.exists() {
        return Err(DbError::StoreMissing(path.to_path_buf()));
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Release the store connection.
///
/// Consumes the pool so a render path cannot close it twice; call exactly
/// once, at the end of the render, whether or not individual panels reported
/// errors.
pub async fn close_store(pool: SqlitePool) {
    pool.close().await;
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

/// Run a full health check: ping the pool and return a typed error on failure.
///
/// # Errors
///
/// Returns [`DbError`] if the ping fails.
pub async fn health_check(pool: &SqlitePool) -> Result<(), DbError> {
    ping(pool).await?;
    Ok(())
}

fn read_u32(var: &str, default: u32) -> u32 {
    env::var(var)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

fn read_u64(var: &str, default: u64) -> u64 {
    env::var(var)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

pub mod cache;
pub mod cached;
pub mod queries;

pub use cache::{CachedRows, QueryCache, QueryKey};
pub use cached::{fetch_daily_trends, fetch_recent_articles};
pub use queries::{list_daily_trends, list_recent_articles, DailyTrendRow, RecentArticleRow};

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures: the ingestion pipeline owns the schema in production,
    //! so tests create it themselves before seeding rows.

    use sqlx::SqlitePool;

    pub(crate) async fn create_schema(pool: &SqlitePool) {
        for statement in [
            "CREATE TABLE articles ( \
                 id INTEGER PRIMARY KEY, \
                 title TEXT NOT NULL, \
                 source_name TEXT NOT NULL, \
                 publication_date TEXT NOT NULL, \
                 source_url TEXT NOT NULL \
             )",
            "CREATE TABLE sentiments ( \
                 article_id INTEGER NOT NULL REFERENCES articles(id), \
                 sentiment_label TEXT NOT NULL, \
                 sentiment_score REAL NOT NULL \
             )",
            "CREATE TABLE daily_trends ( \
                 trend_date TEXT NOT NULL UNIQUE, \
                 average_sentiment_score REAL NOT NULL, \
                 top_keywords TEXT, \
                 emerging_keywords TEXT \
             )",
        ] {
            sqlx::query(statement)
                .execute(pool)
                .await
                .expect("create table");
        }
    }

    pub(crate) async fn insert_article(
        pool: &SqlitePool,
        id: i64,
        title: &str,
        published: &str,
    ) {
        sqlx::query(
            "INSERT INTO articles (id, title, source_name, publication_date, source_url) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(title)
        .bind("Renewables Daily")
        .bind(published)
        .bind(format!("https://news.example.com/articles/{id}"))
        .execute(pool)
        .await
        .expect("insert article");
    }

    pub(crate) async fn insert_sentiment(
        pool: &SqlitePool,
        article_id: i64,
        label: &str,
        score: f64,
    ) {
        sqlx::query(
            "INSERT INTO sentiments (article_id, sentiment_label, sentiment_score) \
             VALUES (?, ?, ?)",
        )
        .bind(article_id)
        .bind(label)
        .bind(score)
        .execute(pool)
        .await
        .expect("insert sentiment");
    }

    pub(crate) async fn insert_trend(
        pool: &SqlitePool,
        date: &str,
        score: f64,
        top_keywords: Option<&str>,
        emerging_keywords: Option<&str>,
    ) {
        sqlx::query(
            "INSERT INTO daily_trends \
             (trend_date, average_sentiment_score, top_keywords, emerging_keywords) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(date)
        .bind(score)
        .bind(top_keywords)
        .bind(emerging_keywords)
        .execute(pool)
        .await
        .expect("insert trend");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_config_has_sane_defaults() {
        let config = PoolConfig::default();

        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.min_connections, DEFAULT_MIN_CONNECTIONS);
        assert_eq!(config.acquire_timeout_secs, DEFAULT_ACQUIRE_TIMEOUT_SECS);
    }

    #[tokio::test]
    async fn connect_store_rejects_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.db");

        let result = connect_store(&path, PoolConfig::default()).await;
        assert!(
            matches!(result, Err(DbError::StoreMissing(ref p)) if p == &path),
            "expected StoreMissing, got: {result:?}"
        );
    }

    #[tokio::test]
    async fn connect_store_opens_existing_file_read_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("seeded.db");

        // Seed through a separate writable pool, the way the ingestion
        // pipeline would.
        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(&path)
                    .create_if_missing(true),
            )
            .await
            .expect("create store");
        crate::testing::create_schema(&writer).await;
        writer.close().await;

        let pool = connect_store(&path, PoolConfig::default())
            .await
            .expect("open seeded store");

        ping(&pool).await.expect("ping");

        let write_attempt = sqlx::query("INSERT INTO daily_trends (trend_date, average_sentiment_score) VALUES ('2024-01-01', 0.0)")
            .execute(&pool)
            .await;
        assert!(write_attempt.is_err(), "store must be opened read-only");

        close_store(pool).await;
    }
}
