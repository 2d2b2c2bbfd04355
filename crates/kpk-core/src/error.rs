//! # Core Error Type
//!
//! Construction failures for the foundational types. Higher crates define
//! their own `thiserror` enums and wrap this one where needed.

use thiserror::Error;

/// Errors raised while building core domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An identifier was empty.
    #[error("{kind} must not be empty")]
    EmptyIdentifier {
        /// Which identifier kind was rejected ("order id", "sku").
        kind: &'static str,
    },

    /// An epoch value could not be represented as a UTC instant.
    #[error("timestamp out of range: {millis} ms since epoch")]
    TimestampOutOfRange {
        /// The rejected value.
        millis: i64,
    },
}
