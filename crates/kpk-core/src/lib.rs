//! # kpk-core: Foundational Types for the Kitoko Packer
//!
//! Every other crate in the workspace depends on `kpk-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain identifiers.** `OrderId` and `Sku` are
//!    distinct types with validated constructors. You cannot count an order
//!    id as a SKU.
//!
//! 2. **UTC-only millisecond timestamps.** `Timestamp` carries the value that
//!    lands in the `timestamp_ms` column of the scan report.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `kpk-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod temporal;

pub use error::CoreError;
pub use identity::{OrderId, Sku};
pub use temporal::Timestamp;
