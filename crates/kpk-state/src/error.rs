use thiserror::Error;

/// A progress record that would break the reconciliation invariants.
///
/// Raised by [`PackProgress::new`](crate::PackProgress::new) and when
/// deserializing a stored record; the engine itself never fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgressError {
    /// Nothing is required.
    #[error("order {order} requires no items")]
    EmptyRequirement {
        /// The order id.
        order: String,
    },

    /// A SKU is listed with a zero requirement.
    #[error("sku {sku:?} has a zero requirement")]
    ZeroRequired {
        /// The SKU.
        sku: String,
    },

    /// A counted SKU is not part of the requirement.
    #[error("sku {sku:?} was counted but is not required")]
    UnknownScannedSku {
        /// The SKU.
        sku: String,
    },

    /// A SKU was counted past its requirement.
    #[error("sku {sku:?} counted {scanned} of {required}")]
    OverScanned {
        /// The SKU.
        sku: String,
        /// Units counted.
        scanned: u32,
        /// Units required.
        required: u32,
    },
}
