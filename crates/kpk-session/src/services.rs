//! # Remote Service Adapters
//!
//! The packer talks to two remote capabilities: operator authentication
//! and an audit record of packed orders. Both are traits so a session can
//! run against a live backend, an offline stand-in, or a test double
//! without knowing which.
//!
//! ## Offline Mode
//!
//! With no backend configured, any non-empty email signs in and audit sync
//! succeeds without doing anything. Packing never depends on the remote
//! side being reachable: the session swallows audit-sync failures.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use kpk_core::{OrderId, Timestamp};

use crate::config::Backend;

/// A signed-in packing operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    /// The email the operator signed in with.
    pub email: String,
}

/// Errors from operator authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No email was entered.
    #[error("email is required")]
    EmptyEmail,

    /// The email is unknown or the password does not match.
    #[error("invalid credentials for {email}")]
    InvalidCredentials {
        /// The email that failed to sign in.
        email: String,
    },

    /// The authentication backend could not be reached.
    #[error("authentication unavailable: {reason}")]
    Unavailable {
        /// What went wrong.
        reason: String,
    },
}

/// Errors from the remote audit record.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The audit backend could not be reached.
    #[error("audit sync unavailable: {reason}")]
    Unavailable {
        /// What went wrong.
        reason: String,
    },

    /// The audit backend refused the record.
    #[error("audit sync rejected order {order}: {reason}")]
    Rejected {
        /// The order being recorded.
        order: OrderId,
        /// Why it was refused.
        reason: String,
    },
}

/// Signs operators in.
pub trait Authenticator: Send + Sync {
    /// Authenticate `email` with `password`. `email` is already trimmed.
    fn sign_in(&self, email: &str, password: &str) -> Result<Operator, AuthError>;

    /// Name of this implementation, for logs.
    fn name(&self) -> &str;
}

/// Records packed orders remotely.
///
/// Implementations must be idempotent per order: the session may call
/// again for an order that was already recorded.
pub trait AuditSync: Send + Sync {
    /// Record that `order` finished packing at `packed_at`.
    fn mark_order_packed(&self, order: &OrderId, packed_at: Timestamp) -> Result<(), SyncError>;

    /// Name of this implementation, for logs.
    fn name(&self) -> &str;
}

/// Accepts any non-empty email with any password.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAuthenticator;

impl Authenticator for OfflineAuthenticator {
    fn sign_in(&self, email: &str, _password: &str) -> Result<Operator, AuthError> {
        if email.is_empty() {
            return Err(AuthError::EmptyEmail);
        }
        Ok(Operator {
            email: email.to_string(),
        })
    }

    fn name(&self) -> &str {
        "offline"
    }
}

/// Checks credentials against a fixed email → password table.
#[derive(Clone, Default)]
pub struct StaticAuthenticator {
    users: BTreeMap<String, String>,
}

impl fmt::Debug for StaticAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticAuthenticator")
            .field("users", &self.users.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl StaticAuthenticator {
    /// An authenticator with no users.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user.
    pub fn with_user(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.insert(email.into(), password.into());
        self
    }
}

impl Authenticator for StaticAuthenticator {
    fn sign_in(&self, email: &str, password: &str) -> Result<Operator, AuthError> {
        if email.is_empty() {
            return Err(AuthError::EmptyEmail);
        }
        match self.users.get(email) {
            Some(expected) if expected == password => Ok(Operator {
                email: email.to_string(),
            }),
            _ => Err(AuthError::InvalidCredentials {
                email: email.to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Audit sync that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAuditSync;

impl AuditSync for OfflineAuditSync {
    fn mark_order_packed(&self, _order: &OrderId, _packed_at: Timestamp) -> Result<(), SyncError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "offline"
    }
}

/// Audit sync that keeps every call in memory.
///
/// Clones share the same record, so a test can keep one handle and give
/// the other to a session.
#[derive(Debug, Clone, Default)]
pub struct RecordingAuditSync {
    records: Arc<Mutex<Vec<(OrderId, Timestamp)>>>,
    failure: Option<String>,
}

impl RecordingAuditSync {
    /// A recorder that accepts every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder that records every call and then fails it with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            records: Arc::default(),
            failure: Some(reason.into()),
        }
    }

    /// Every call so far, oldest first.
    pub fn records(&self) -> Vec<(OrderId, Timestamp)> {
        self.records.lock().clone()
    }

    /// Orders recorded so far, oldest first.
    pub fn orders(&self) -> Vec<OrderId> {
        self.records.lock().iter().map(|(o, _)| o.clone()).collect()
    }
}

impl AuditSync for RecordingAuditSync {
    fn mark_order_packed(&self, order: &OrderId, packed_at: Timestamp) -> Result<(), SyncError> {
        self.records.lock().push((order.clone(), packed_at));
        match &self.failure {
            Some(reason) => Err(SyncError::Unavailable {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// The remote capabilities injected into a session.
pub struct RemoteServices {
    /// Operator authentication.
    pub auth: Box<dyn Authenticator>,
    /// Packed-order audit record.
    pub audit: Box<dyn AuditSync>,
}

impl fmt::Debug for RemoteServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteServices")
            .field("auth", &self.auth.name())
            .field("audit", &self.audit.name())
            .finish()
    }
}

impl RemoteServices {
    /// Bundle `auth` and `audit`.
    pub fn new(auth: impl Authenticator + 'static, audit: impl AuditSync + 'static) -> Self {
        Self {
            auth: Box::new(auth),
            audit: Box::new(audit),
        }
    }

    /// Offline authentication and no-op audit sync.
    pub fn offline() -> Self {
        Self::new(OfflineAuthenticator, OfflineAuditSync)
    }

    /// The services for a configured backend.
    pub fn for_backend(backend: Backend) -> Self {
        match backend {
            Backend::Offline => Self::offline(),
        }
    }
}
