//! # kpk-state: Pack Progress Reconciliation
//!
//! Tracks one order's packing progress and folds scanned strings into it.
//!
//! ## Components
//!
//! - **Progress** (`progress.rs`): `PackProgress`, the record of what an
//!   order requires, what has been counted, and which packet labels have
//!   already been accepted.
//!
//! - **Engine** (`engine.rs`): `apply(progress, raw) -> Transition`. A pure
//!   function of its inputs apart from the event timestamp. It consumes the
//!   progress and hands back either an updated value or the same value
//!   untouched.
//!
//! - **Completion** (`completion.rs`): remaining quantities and the
//!   `is_complete` predicate, derived on demand and never stored.
//!
//! ## Invariants
//!
//! For every SKU, `scanned ≤ required` after every transition. The set of
//! seen packet labels only grows, and a label in it is never counted again.
//!
//! The engine never fails. Anything it cannot use is reported through
//! [`ScanOutcome`] and leaves the progress unchanged with no event.

pub mod completion;
pub mod engine;
pub mod error;
pub mod progress;

pub use completion::ProgressLine;
pub use engine::{apply, apply_at, ScanOutcome, Transition};
pub use error::ProgressError;
pub use progress::PackProgress;
