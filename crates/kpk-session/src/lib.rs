//! # kpk-session: Packing Workflow
//!
//! Wraps the pure reconciliation engine in the stateful workflow an
//! operator drives from the scanner:
//!
//! - **Session** (`session.rs`): `PackSession`, owning the signed-in
//!   operator, the active order's progress, and the scan log. Routes
//!   scans, finishes completed orders, and surfaces workflow errors.
//!
//! - **Store** (`store.rs`): the durable set of completed order ids,
//!   in memory or as a JSON file in the state directory.
//!
//! - **Services** (`services.rs`): authentication and audit-sync
//!   capabilities injected as trait objects, with offline implementations.
//!
//! - **Config** (`config.rs`): `SessionConfig` loaded from `KPK_*`
//!   environment variables.
//!
//! ## Crate Policy
//!
//! - Engine-level rejections (duplicates, foreign labels, extra SKUs) are
//!   outcomes, not errors. `SessionError` is reserved for workflow misuse
//!   and store or authentication failures.
//! - Audit-sync failures never fail a scan. They are logged at `warn`.

pub mod config;
pub mod services;
pub mod session;
pub mod store;

pub use config::{Backend, ConfigError, SessionConfig, DEFAULT_STATE_DIR};
pub use services::{
    AuditSync, AuthError, Authenticator, OfflineAuditSync, OfflineAuthenticator, Operator,
    RecordingAuditSync, RemoteServices, StaticAuthenticator, SyncError,
};
pub use session::{InvoiceAccepted, PackSession, PacketScan, Scan, SessionError};
pub use store::{
    CompletedOrderStore, FileCompletedOrderStore, MemoryCompletedOrderStore, StoreError,
    COMPLETED_ORDERS_FILE,
};
