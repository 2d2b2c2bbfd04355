//! Codec error types.
//!
//! One variant per failure class of the decode pipeline
//! (prefix → base64 → UTF-8 → JSON → field validation).

use thiserror::Error;

use kpk_core::CoreError;

/// Errors that can occur while decoding or encoding a QR payload.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The string does not start with the scheme's prefix.
    #[error("missing {expected:?} prefix")]
    MissingPrefix {
        /// The prefix that was required.
        expected: &'static str,
    },

    /// The body is not valid URL-safe base64.
    #[error("invalid base64 body: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not UTF-8.
    #[error("payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The JSON document is malformed or lacks a required field.
    #[error("malformed payload JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An order id or SKU in the payload was empty.
    #[error("invalid identifier: {0}")]
    Identifier(#[from] CoreError),

    /// The invoice lists no items.
    #[error("invoice lists no items")]
    EmptyItems,

    /// An invoice item asks for zero or fewer units.
    #[error("sku {sku:?} requires {units} units; units must be positive")]
    NonPositiveUnits {
        /// The offending SKU.
        sku: String,
        /// The value found on the wire.
        units: i64,
    },

    /// An invoice item asks for more units than a counter can hold.
    #[error("sku {sku:?} requires {units} units; at most {max} supported", max = u32::MAX)]
    UnitsOutOfRange {
        /// The offending SKU.
        sku: String,
        /// The value found on the wire.
        units: i64,
    },

    /// A SKU appears twice in one invoice under [`DuplicateSkuPolicy::Reject`].
    ///
    /// [`DuplicateSkuPolicy::Reject`]: crate::DuplicateSkuPolicy::Reject
    #[error("sku {sku:?} listed more than once")]
    DuplicateSku {
        /// The repeated SKU.
        sku: String,
    },

    /// A duplicate-SKU policy name was not recognized.
    #[error("unknown duplicate-sku policy {0:?} (expected \"last-wins\" or \"reject\")")]
    UnknownPolicy(String),
}
