//! # Pack Session
//!
//! The packing workflow around the pure engine. A session owns the
//! signed-in operator, at most one active order, and the scan log:
//!
//! ```text
//!            sign_in              scan_invoice
//!  Signed out ─────▶ Idle ───────────────────────▶ Packing
//!                     ▲                               │ scan_packet (incomplete)
//!                     │                               ◀─┘
//!                     │  complete: store, audit, log  │
//!                     └───────────────────────────────┘
//!                     └──────────── abandon ──────────┘
//! ```
//!
//! Every packet scan is followed by the completion check. A completed
//! order is written to the [`CompletedOrderStore`] before anything else;
//! if that write fails the order stays active and the next scan tries
//! again. The audit sync that follows is best-effort.

use std::fmt;

use kpk_codec::{CodecError, InvoicePayload};
use kpk_core::{OrderId, Timestamp};
use kpk_log::{ScanLog, ScanLogEntry};
use kpk_state::{PackProgress, ProgressError, ProgressLine, ScanOutcome, Transition};

use crate::config::SessionConfig;
use crate::services::{AuthError, Operator, RemoteServices};
use crate::store::{CompletedOrderStore, StoreError};

/// Errors surfaced by [`PackSession`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Scanning requires a signed-in operator.
    #[error("no operator is signed in")]
    NotSignedIn,

    /// An invoice was offered while another order is being packed.
    #[error("order {order} is still being packed")]
    OrderInProgress {
        /// The active order.
        order: OrderId,
    },

    /// A packet was offered with no order being packed.
    #[error("no order is being packed; scan an invoice first")]
    NoActiveOrder,

    /// The invoice label could not be decoded or violates the
    /// duplicate-SKU policy.
    #[error("invalid invoice: {0}")]
    InvalidInvoice(#[from] CodecError),

    /// The invoice decoded but cannot start a progress record.
    #[error("invalid invoice: {0}")]
    InvalidRequirement(#[from] ProgressError),

    /// The order has already been packed.
    #[error("order {order} has already been packed")]
    AlreadyPacked {
        /// The order.
        order: OrderId,
    },

    /// The completed-order store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Sign-in failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// An invoice that started a new active order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceAccepted {
    /// The order now being packed.
    pub order_id: OrderId,
    /// One row per required SKU, all at zero.
    pub lines: Vec<ProgressLine>,
}

/// The result of one packet scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketScan {
    /// The order the scan applied to.
    pub order_id: OrderId,
    /// What the engine did with the scan.
    pub outcome: ScanOutcome,
    /// Progress rows after the scan.
    pub lines: Vec<ProgressLine>,
    /// Whether this scan finished the order.
    pub completed: bool,
}

/// The result of [`PackSession::scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scan {
    /// The scan was taken as an invoice.
    Invoice(InvoiceAccepted),
    /// The scan was applied to the active order.
    Packet(PacketScan),
}

/// One operator's packing workflow.
pub struct PackSession {
    config: SessionConfig,
    store: Box<dyn CompletedOrderStore>,
    services: RemoteServices,
    operator: Option<Operator>,
    active: Option<PackProgress>,
    log: ScanLog,
}

impl fmt::Debug for PackSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackSession")
            .field("config", &self.config)
            .field("services", &self.services)
            .field("operator", &self.operator)
            .field("active", &self.active.as_ref().map(PackProgress::order_id))
            .field("log_len", &self.log.len())
            .finish()
    }
}

impl PackSession {
    /// A signed-out session with an empty log.
    pub fn new(
        config: SessionConfig,
        store: impl CompletedOrderStore + 'static,
        services: RemoteServices,
    ) -> Self {
        Self {
            config,
            store: Box::new(store),
            services,
            operator: None,
            active: None,
            log: ScanLog::new(),
        }
    }

    /// Sign an operator in. Surrounding whitespace in `email` is ignored.
    ///
    /// Signing in again replaces the operator; an active order is kept.
    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<&Operator, SessionError> {
        let operator = self.services.auth.sign_in(email.trim(), password)?;
        tracing::info!(email = %operator.email, "operator signed in");
        Ok(self.operator.insert(operator))
    }

    /// Start packing the order named by an invoice label.
    pub fn scan_invoice(&mut self, raw: &str) -> Result<InvoiceAccepted, SessionError> {
        if self.operator.is_none() {
            return Err(SessionError::NotSignedIn);
        }
        if let Some(active) = &self.active {
            return Err(SessionError::OrderInProgress {
                order: active.order_id().clone(),
            });
        }

        let invoice = InvoicePayload::decode(raw)?;
        let required = invoice.required(self.config.duplicate_skus)?;
        let (order_id, _) = invoice.into_parts();
        if self.store.contains(&order_id)? {
            return Err(SessionError::AlreadyPacked { order: order_id });
        }
        let progress = PackProgress::new(order_id.clone(), required)?;

        tracing::info!(
            order = %order_id,
            skus = progress.required().len(),
            units = progress.remaining_units(),
            "invoice accepted"
        );
        self.log.push(ScanLogEntry::invoice_scanned(
            Timestamp::now(),
            order_id.clone(),
            raw,
        ));
        let lines = progress.lines();
        self.active = Some(progress);
        Ok(InvoiceAccepted { order_id, lines })
    }

    /// Apply a scan to the active order, finishing it if it is complete.
    pub fn scan_packet(&mut self, raw: &str) -> Result<PacketScan, SessionError> {
        if self.operator.is_none() {
            return Err(SessionError::NotSignedIn);
        }
        let progress = self.active.take().ok_or(SessionError::NoActiveOrder)?;
        let Transition {
            progress,
            event,
            outcome,
        } = kpk_state::apply(progress, raw);
        self.log.extend(event);

        let order_id = progress.order_id().clone();
        let lines = progress.lines();
        let completed = progress.is_complete();
        if completed {
            if let Err(e) = self.store.mark_completed(&order_id) {
                self.active = Some(progress);
                return Err(e.into());
            }
            self.finish(&order_id);
        } else {
            self.active = Some(progress);
        }

        Ok(PacketScan {
            order_id,
            outcome,
            lines,
            completed,
        })
    }

    /// Route a scan: an invoice when idle, a packet while packing.
    pub fn scan(&mut self, raw: &str) -> Result<Scan, SessionError> {
        if self.active.is_some() {
            self.scan_packet(raw).map(Scan::Packet)
        } else {
            self.scan_invoice(raw).map(Scan::Invoice)
        }
    }

    /// Drop the active order without completing it. Nothing is logged.
    pub fn abandon(&mut self) -> Option<OrderId> {
        let progress = self.active.take()?;
        tracing::info!(
            order = %progress.order_id(),
            remaining = progress.remaining_units(),
            "order abandoned"
        );
        Some(progress.order_id().clone())
    }

    /// The signed-in operator.
    pub fn operator(&self) -> Option<&Operator> {
        self.operator.as_ref()
    }

    /// The order being packed.
    pub fn active(&self) -> Option<&PackProgress> {
        self.active.as_ref()
    }

    /// Every event logged in this session.
    pub fn log(&self) -> &ScanLog {
        &self.log
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The completed-order store.
    pub fn store(&self) -> &dyn CompletedOrderStore {
        self.store.as_ref()
    }

    /// Consume the session, keeping its log.
    pub fn into_log(self) -> ScanLog {
        self.log
    }

    /// Audit sync and the `order_packed` entry, after the store write.
    fn finish(&mut self, order_id: &OrderId) {
        let packed_at = Timestamp::now();
        if let Err(e) = self.services.audit.mark_order_packed(order_id, packed_at) {
            tracing::warn!(
                order = %order_id,
                backend = self.services.audit.name(),
                error = %e,
                "audit sync failed; order stays packed locally"
            );
        }
        self.log
            .push(ScanLogEntry::order_packed(packed_at, order_id.clone()));
        tracing::info!(order = %order_id, "order packed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{RecordingAuditSync, StaticAuthenticator};
    use crate::store::MemoryCompletedOrderStore;
    use kpk_codec::{DuplicateSkuPolicy, InvoiceItem, PacketPayload};
    use kpk_core::Sku;
    use kpk_log::ScanEvent;

    fn sku(s: &str) -> Sku {
        Sku::new(s).unwrap()
    }

    fn invoice(order: &str, items: &[(&str, u32)]) -> String {
        let items = items
            .iter()
            .map(|(s, units)| InvoiceItem {
                sku: sku(s),
                units: *units,
            })
            .collect();
        InvoicePayload::new(OrderId::new(order).unwrap(), items)
            .unwrap()
            .encode()
            .unwrap()
    }

    fn packet(s: &str) -> String {
        PacketPayload::new(sku(s)).encode().unwrap()
    }

    fn signed_in() -> PackSession {
        let mut session = PackSession::new(
            SessionConfig::default(),
            MemoryCompletedOrderStore::new(),
            RemoteServices::offline(),
        );
        session.sign_in("packer@example.com", "").unwrap();
        session
    }

    #[test]
    fn session_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<PackSession>();
    }

    #[test]
    fn scanning_requires_sign_in() {
        let mut session = PackSession::new(
            SessionConfig::default(),
            MemoryCompletedOrderStore::new(),
            RemoteServices::offline(),
        );
        assert!(matches!(
            session.scan_invoice(&invoice("O", &[("A", 1)])),
            Err(SessionError::NotSignedIn)
        ));
        assert!(matches!(
            session.scan_packet("A"),
            Err(SessionError::NotSignedIn)
        ));
    }

    #[test]
    fn sign_in_trims_email() {
        let mut session = PackSession::new(
            SessionConfig::default(),
            MemoryCompletedOrderStore::new(),
            RemoteServices::offline(),
        );
        let op = session.sign_in("  packer@example.com \n", "").unwrap();
        assert_eq!(op.email, "packer@example.com");
        assert_eq!(session.operator().unwrap().email, "packer@example.com");
    }

    #[test]
    fn sign_in_failure_leaves_session_signed_out() {
        let services = RemoteServices::new(
            StaticAuthenticator::new().with_user("a@example.com", "pw"),
            RecordingAuditSync::new(),
        );
        let mut session =
            PackSession::new(SessionConfig::default(), MemoryCompletedOrderStore::new(), services);
        assert!(matches!(
            session.sign_in("a@example.com", "nope"),
            Err(SessionError::Auth(AuthError::InvalidCredentials { .. }))
        ));
        assert!(session.operator().is_none());
        assert!(session.sign_in(" a@example.com", "pw").is_ok());
    }

    #[test]
    fn invoice_starts_order_and_is_logged() {
        let mut session = signed_in();
        let raw = invoice("ORD1", &[("A", 2), ("B", 1)]);
        let accepted = session.scan_invoice(&raw).unwrap();
        assert_eq!(accepted.order_id.as_str(), "ORD1");
        assert_eq!(accepted.lines.len(), 2);
        assert_eq!(session.active().unwrap().remaining_units(), 3);

        let entry = &session.log().entries()[0];
        assert_eq!(entry.event, ScanEvent::InvoiceScanned);
        assert_eq!(entry.raw.as_deref(), Some(raw.as_str()));
    }

    #[test]
    fn malformed_invoice_rejected() {
        let mut session = signed_in();
        assert!(matches!(
            session.scan_invoice("PKG1:%%%"),
            Err(SessionError::InvalidInvoice(_))
        ));
        assert!(matches!(
            session.scan_invoice("just-a-sku"),
            Err(SessionError::InvalidInvoice(_))
        ));
        assert!(session.active().is_none());
        assert!(session.log().is_empty());
    }

    #[test]
    fn reject_policy_refuses_repeated_skus() {
        let config = SessionConfig {
            duplicate_skus: DuplicateSkuPolicy::Reject,
            ..SessionConfig::default()
        };
        let mut session =
            PackSession::new(config, MemoryCompletedOrderStore::new(), RemoteServices::offline());
        session.sign_in("p@example.com", "").unwrap();
        let raw = invoice("O", &[("A", 1), ("A", 2)]);
        assert!(matches!(
            session.scan_invoice(&raw),
            Err(SessionError::InvalidInvoice(CodecError::DuplicateSku { .. }))
        ));
    }

    #[test]
    fn second_invoice_while_packing_rejected() {
        let mut session = signed_in();
        session.scan_invoice(&invoice("O1", &[("A", 1)])).unwrap();
        let err = session.scan_invoice(&invoice("O2", &[("A", 1)])).unwrap_err();
        assert!(matches!(err, SessionError::OrderInProgress { ref order } if order.as_str() == "O1"));
    }

    #[test]
    fn packet_without_order_rejected() {
        let mut session = signed_in();
        assert!(matches!(
            session.scan_packet(&packet("A")),
            Err(SessionError::NoActiveOrder)
        ));
    }

    #[test]
    fn completion_finishes_order() {
        let audit = RecordingAuditSync::new();
        let services = RemoteServices::new(
            crate::services::OfflineAuthenticator,
            audit.clone(),
        );
        let mut session =
            PackSession::new(SessionConfig::default(), MemoryCompletedOrderStore::new(), services);
        session.sign_in("p@example.com", "").unwrap();
        session.scan_invoice(&invoice("ORD1", &[("A", 1), ("B", 1)])).unwrap();

        let first = session.scan_packet(&packet("A")).unwrap();
        assert!(first.outcome.is_accepted());
        assert!(!first.completed);
        assert!(session.active().is_some());

        let last = session.scan_packet(&packet("B")).unwrap();
        assert!(last.completed);
        assert!(last.lines.iter().all(ProgressLine::is_done));
        assert!(session.active().is_none());

        let order = OrderId::new("ORD1").unwrap();
        assert!(session.store().contains(&order).unwrap());
        assert_eq!(audit.orders(), vec![order.clone()]);

        let events: Vec<_> = session.log().entries().iter().map(|e| e.event).collect();
        assert_eq!(
            events,
            vec![
                ScanEvent::InvoiceScanned,
                ScanEvent::PacketScanned,
                ScanEvent::PacketScanned,
                ScanEvent::OrderPacked,
            ]
        );
        let packed = session.log().entries().last().unwrap();
        assert_eq!(packed.timestamp, audit.records()[0].1);
    }

    #[test]
    fn packed_order_cannot_be_scanned_again() {
        let mut session = signed_in();
        let raw = invoice("ORD1", &[("A", 1)]);
        session.scan_invoice(&raw).unwrap();
        session.scan_packet("A").unwrap();
        assert!(matches!(
            session.scan_invoice(&raw),
            Err(SessionError::AlreadyPacked { ref order }) if order.as_str() == "ORD1"
        ));
    }

    #[test]
    fn audit_failure_does_not_block_completion() {
        let audit = RecordingAuditSync::failing("backend down");
        let services = RemoteServices::new(crate::services::OfflineAuthenticator, audit.clone());
        let mut session =
            PackSession::new(SessionConfig::default(), MemoryCompletedOrderStore::new(), services);
        session.sign_in("p@example.com", "").unwrap();
        session.scan_invoice(&invoice("ORD1", &[("A", 1)])).unwrap();

        let scan = session.scan_packet("A").unwrap();
        assert!(scan.completed);
        assert_eq!(audit.orders().len(), 1);
        assert_eq!(
            session.log().entries().last().unwrap().event,
            ScanEvent::OrderPacked
        );
    }

    #[test]
    fn ignored_scans_are_not_logged() {
        let mut session = signed_in();
        session.scan_invoice(&invoice("ORD1", &[("A", 2)])).unwrap();
        let label = packet("A");
        session.scan_packet(&label).unwrap();

        let dup = session.scan_packet(&label).unwrap();
        assert_eq!(dup.outcome, ScanOutcome::DuplicatePacket);
        let foreign = session.scan_packet("WIFI:S:net;;").unwrap();
        assert!(matches!(foreign.outcome, ScanOutcome::ForeignScheme { .. }));
        let extra = session.scan_packet("Z").unwrap();
        assert!(matches!(extra.outcome, ScanOutcome::NotRequired { .. }));

        assert_eq!(session.log().len(), 2);
        assert_eq!(session.active().unwrap().scanned("A"), 1);
    }

    #[test]
    fn scan_routes_by_state() {
        let mut session = signed_in();
        assert!(matches!(
            session.scan(&invoice("ORD1", &[("A", 1)])).unwrap(),
            Scan::Invoice(_)
        ));
        match session.scan("A").unwrap() {
            Scan::Packet(scan) => assert!(scan.completed),
            other => panic!("expected packet scan, got {other:?}"),
        }
        // Idle again, so the next scan is an invoice.
        assert!(matches!(
            session.scan("A"),
            Err(SessionError::InvalidInvoice(_))
        ));
    }

    #[test]
    fn abandon_drops_order_without_logging() {
        let mut session = signed_in();
        session.scan_invoice(&invoice("ORD1", &[("A", 2)])).unwrap();
        session.scan_packet("A").unwrap();
        assert_eq!(session.abandon().unwrap().as_str(), "ORD1");
        assert!(session.active().is_none());
        assert_eq!(session.abandon(), None);
        assert_eq!(session.log().len(), 2);

        // Not completed, so the invoice can be scanned again from scratch.
        let again = session.scan_invoice(&invoice("ORD1", &[("A", 2)])).unwrap();
        assert!(again.lines.iter().all(|l| l.have == 0));
    }
}
