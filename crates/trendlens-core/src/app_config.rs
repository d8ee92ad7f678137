use std::net::SocketAddr;
use std::path::PathBuf;

/// Runtime configuration for the dashboard.
///
/// The store is owned by the external ingestion pipeline; this side only ever
/// opens it for reading, so the only store-related setting is its location.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path of the SQLite store file populated by the ingestion pipeline.
    pub store_path: PathBuf,
    /// Display-only label naming the analysis topic.
    pub topic: String,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// How long a memoized query snapshot stays valid.
    pub cache_ttl_secs: u64,
    /// Rolling window, in days ending today, bounding the trends query.
    pub trend_window_days: u32,
    /// Row cap for the recent-articles query.
    pub recent_articles_limit: i64,
}
