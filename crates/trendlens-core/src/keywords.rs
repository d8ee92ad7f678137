//! Keyword columns of the `daily_trends` table, decoded from their JSON text.
//!
//! The query layer carries both columns as opaque strings; decoding happens
//! here, per column, so a malformed value in one column cannot affect the
//! other.

use serde::Deserialize;
use thiserror::Error;

/// One entry of the `top_keywords` column.
///
/// `count` is optional: the upstream analysis pipeline has emitted entries
/// without it, and those display as "N/A" rather than failing the decode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TopKeyword {
    pub keyword: String,
    #[serde(default)]
    pub count: Option<i64>,
}

/// A keyword column that did not decode as the expected JSON shape.
#[derive(Debug, Error)]
#[error("malformed {column} value: {source}")]
pub struct KeywordDecodeError {
    pub column: &'static str,
    #[source]
    source: serde_json::Error,
}

/// Decode the `top_keywords` column into its ordered keyword/count entries.
///
/// A `NULL` column decodes as an empty list — the ingestion pipeline omits
/// the column on days with no keyword data.
///
/// # Errors
///
/// Returns [`KeywordDecodeError`] if the value is not a JSON array of
/// `{keyword, count}` objects.
pub fn decode_top_keywords(raw: Option<&str>) -> Result<Vec<TopKeyword>, KeywordDecodeError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    serde_json::from_str(raw).map_err(|source| KeywordDecodeError {
        column: "top_keywords",
        source,
    })
}

/// Decode the `emerging_keywords` column into its list of keyword strings.
///
/// # Errors
///
/// Returns [`KeywordDecodeError`] if the value is not a JSON array of strings.
pub fn decode_emerging_keywords(raw: Option<&str>) -> Result<Vec<String>, KeywordDecodeError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    serde_json::from_str(raw).map_err(|source| KeywordDecodeError {
        column: "emerging_keywords",
        source,
    })
}
