//! # kpk-log: Scan Log
//!
//! Accumulates one immutable [`ScanLogEntry`] per accepted scan or order
//! transition, in arrival order, and renders the log as the CSV scan
//! report on demand.
//!
//! - **Entry** (`entry.rs`): the event taxonomy and entry record.
//! - **Report** (`report.rs`): CSV rendering.

pub mod entry;
pub mod report;

pub use entry::{ScanEvent, ScanLog, ScanLogEntry};
pub use report::{render_csv, write_csv, CSV_HEADER, DEFAULT_REPORT_NAME};
