//! Per-render view model assembly.
//!
//! `build_dashboard` is the whole read path of one page view: fetch both
//! snapshots through the cache, degrade failed queries to empty tables with
//! a notice, and shape the rows for the page renderer. It holds no state of
//! its own and performs no writes.

use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::error;

use trendlens_core::{
    decode_emerging_keywords, decode_top_keywords, AppConfig, KeywordDecodeError, TopKeyword,
};
use trendlens_db::{fetch_daily_trends, fetch_recent_articles, QueryCache, RecentArticleRow};

pub struct DashboardView {
    pub topic: String,
    pub trend_window_days: u32,
    /// Per-query error banners; a notice means the matching panel degraded
    /// to its empty-state placeholder.
    pub notices: Vec<String>,
    pub trend_points: Vec<TrendPoint>,
    /// `None` when the trends table is empty — the panel then shows its
    /// placeholder rather than an error.
    pub keywords: Option<KeywordInsights>,
    pub articles: Vec<ArticleView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub score: f64,
}

/// Keyword columns of the latest trend day, decoded independently so one
/// malformed column cannot take the other down.
pub struct KeywordInsights {
    pub date: NaiveDate,
    pub top: Result<Vec<TopKeyword>, KeywordDecodeError>,
    pub emerging: Result<Vec<String>, KeywordDecodeError>,
}

pub struct ArticleView {
    pub title: String,
    pub source_name: String,
    pub published: String,
    pub sentiment_label: Option<String>,
    pub sentiment_score: Option<f64>,
    pub source_url: String,
}

pub async fn build_dashboard(
    pool: &SqlitePool,
    cache: &QueryCache,
    config: &AppConfig,
) -> DashboardView {
    let store = config.store_path.display().to_string();
    let mut notices = Vec::new();

    let trends = match fetch_daily_trends(pool, cache, &store, config.trend_window_days).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "failed to fetch daily trends");
            notices.push(format!("Error fetching daily trends: {e}"));
            Arc::new(Vec::new())
        }
    };

    let articles =
        match fetch_recent_articles(pool, cache, &store, config.recent_articles_limit).await {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "failed to fetch recent articles");
                notices.push(format!("Error fetching recent articles: {e}"));
                Arc::new(Vec::new())
            }
        };

    let trend_points = trends
        .iter()
        .map(|row| TrendPoint {
            date: row.trend_date,
            score: row.average_sentiment_score,
        })
        .collect();

    // Rows arrive ascending by date, so the latest available day is the last
    // row; an empty table simply yields no keyword section.
    let keywords = trends.last().map(|latest| KeywordInsights {
        date: latest.trend_date,
        top: decode_top_keywords(latest.top_keywords.as_deref()),
        emerging: decode_emerging_keywords(latest.emerging_keywords.as_deref()),
    });

    let articles = articles.iter().map(article_view).collect();

    DashboardView {
        topic: config.topic.clone(),
        trend_window_days: config.trend_window_days,
        notices,
        trend_points,
        keywords,
        articles,
    }
}

fn article_view(row: &RecentArticleRow) -> ArticleView {
    ArticleView {
        title: row.title.clone(),
        source_name: row.source_name.clone(),
        published: row.publication_date.format("%Y-%m-%d %H:%M").to_string(),
        sentiment_label: row.sentiment_label.clone(),
        sentiment_score: row.sentiment_score,
        source_url: row.source_url.clone(),
    }
}
