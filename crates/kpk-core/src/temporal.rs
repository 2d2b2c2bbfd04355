//! # Temporal Types: UTC Millisecond Timestamps
//!
//! Defines `Timestamp`, a UTC-only instant truncated to millisecond
//! precision. Scan log entries carry one, and the scan report writes its
//! epoch-millisecond value in the `timestamp_ms` column.
//!
//! Sub-millisecond components are discarded at construction so that a
//! timestamp survives a trip through `epoch_millis()` unchanged.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A UTC-only timestamp, truncated to milliseconds.
///
/// # Construction
///
/// - [`Timestamp::now()`]: current UTC time, truncated.
/// - [`Timestamp::from_utc()`]: from a `DateTime<Utc>`, truncating.
/// - [`Timestamp::from_epoch_millis()`]: from a Unix epoch in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to milliseconds.
    pub fn now() -> Self {
        Self(truncate_to_millis(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-millisecond digits.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_millis(dt))
    }

    /// Create a timestamp from a Unix epoch value in milliseconds.
    pub fn from_epoch_millis(millis: i64) -> Result<Self, CoreError> {
        DateTime::from_timestamp_millis(millis)
            .map(Self)
            .ok_or(CoreError::TimestampOutOfRange { millis })
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Milliseconds since the Unix epoch.
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Render as ISO8601 with millisecond precision and Z suffix
    /// (e.g., `2026-01-15T12:00:00.250Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    let millis = dt.nanosecond() / 1_000_000;
    dt.with_nanosecond(millis * 1_000_000).unwrap_or(dt)
}
