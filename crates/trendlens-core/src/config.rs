use std::path::{Path, PathBuf};

use crate::app_config::AppConfig;
use crate::ConfigError;

/// File name of the store when `TRENDLENS_DB_PATH` is not set.
const STORE_FILE_NAME: &str = "trendlens.db";

/// Topic label shown in the page title and sidebar when `TRENDLENS_TOPIC`
/// is not set.
const DEFAULT_TOPIC: &str = "Advancements in Renewable Energy Technologies";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds a value that does not parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds a value that does not parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let store_path = lookup("TRENDLENS_DB_PATH")
        .map_or_else(|_| default_store_path(), PathBuf::from);
    let topic = or_default("TRENDLENS_TOPIC", DEFAULT_TOPIC);

    let bind_addr = parse_addr("TRENDLENS_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("TRENDLENS_LOG_LEVEL", "info");
    let cache_ttl_secs = parse_u64("TRENDLENS_CACHE_TTL_SECS", "600")?;
    let trend_window_days = parse_u32("TRENDLENS_TREND_WINDOW_DAYS", "30")?;
    let recent_articles_limit = parse_i64("TRENDLENS_RECENT_ARTICLES_LIMIT", "20")?;

    Ok(AppConfig {
        store_path,
        topic,
        bind_addr,
        log_level,
        cache_ttl_secs,
        trend_window_days,
        recent_articles_limit,
    })
}

/// Default store location: next to the running executable, falling back to
/// the current working directory when the executable path cannot be
/// determined.
fn default_store_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STORE_FILE_NAME)
}
