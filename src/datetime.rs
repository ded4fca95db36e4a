//! Timestamp helpers for accountd.
//!
//! The store keeps timestamps as `YYYY-MM-DD HH:MM:SS` TEXT in UTC so that
//! lexicographic comparison matches chronological order across backends.

use chrono::{DateTime, Duration, Utc};

/// Storage timestamp format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a datetime for storage.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Current time as a storage timestamp.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Storage timestamp for `secs` seconds from now.
///
/// Used for token expiry columns.
pub fn timestamp_after_secs(secs: u64) -> String {
    format_timestamp(Utc::now() + Duration::seconds(secs as i64))
}
