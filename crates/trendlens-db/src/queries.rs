//! Read-model queries behind the dashboard panels.
//!
//! Both queries take every scalar they depend on as a parameter — including
//! `today` for the trends window — so the SQL is deterministic under test.

use chrono::{DateTime, Days, NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::DbError;

/// One `daily_trends` row. The keyword columns stay opaque JSON text at this
/// layer; decoding is the renderer's responsibility.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailyTrendRow {
    pub trend_date: NaiveDate,
    pub average_sentiment_score: f64,
    pub top_keywords: Option<String>,
    pub emerging_keywords: Option<String>,
}

/// An `articles` row joined with its sentiment, when one exists.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecentArticleRow {
    pub id: i64,
    pub title: String,
    pub source_name: String,
    pub publication_date: DateTime<Utc>,
    pub source_url: String,
    pub sentiment_label: Option<String>,
    pub sentiment_score: Option<f64>,
}

/// Returns the trend rows for the rolling window of `window_days` days ending
/// at `today`, ascending by date.
///
/// The window includes `today` itself, so its start is
/// `today - (window_days - 1)`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_daily_trends(
    pool: &SqlitePool,
    today: NaiveDate,
    window_days: u32,
) -> Result<Vec<DailyTrendRow>, DbError> {
    let start_date = window_start(today, window_days);

    let rows = sqlx::query_as::<_, DailyTrendRow>(
        "SELECT trend_date, average_sentiment_score, top_keywords, emerging_keywords \
         FROM daily_trends \
         WHERE trend_date >= ? \
         ORDER BY trend_date ASC",
    )
    .bind(start_date)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the most recently published articles with their sentiment, when
/// one exists.
///
/// Left join: articles without a `sentiments` row appear with `None` label
/// and score rather than being excluded. Ordered by publication timestamp
/// descending, truncated to `limit` rows (negative limits behave as zero).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_articles(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<RecentArticleRow>, DbError> {
    let rows = sqlx::query_as::<_, RecentArticleRow>(
        "SELECT \
             a.id, a.title, a.source_name, a.publication_date, a.source_url, \
             s.sentiment_label, s.sentiment_score \
         FROM articles a \
         LEFT JOIN sentiments s ON a.id = s.article_id \
         ORDER BY a.publication_date DESC \
         LIMIT ?",
    )
    .bind(limit.max(0))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

fn window_start(today: NaiveDate, window_days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(window_days.saturating_sub(1))))
        .unwrap_or(NaiveDate::MIN)
}
