//! Data conversion utilities for dashcam telemetry
//!
//! Timestamp and coordinate formatting shared by the exporters and the CLI.

use crate::types::Coordinate;
use chrono::DateTime;

/// Format used for every human-readable trip time
pub const UTC_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Convert milliseconds since the Unix epoch to `YYYY-MM-DD HH:MM:SS UTC`
///
/// Sub-second precision is truncated. Returns `None` when the value is
/// outside the range chrono can represent.
pub fn format_utc_timestamp(timestamp_ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|time| time.format(UTC_TIME_FORMAT).to_string())
}

/// Like [`format_utc_timestamp`], falling back to the raw millisecond value
pub fn format_utc_timestamp_or_raw(timestamp_ms: i64) -> String {
    format_utc_timestamp(timestamp_ms).unwrap_or_else(|| format!("{} ms", timestamp_ms))
}

/// Format a duration in milliseconds as `H:MM:SS`
pub fn format_duration_ms(duration_ms: i64) -> String {
    let total_seconds = duration_ms.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format a coordinate as KML expects it: `lon,lat`
pub fn format_coordinate(coord: &Coordinate) -> String {
    format!("{},{}", coord.longitude, coord.latitude)
}
