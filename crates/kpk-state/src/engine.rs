//! # Scan Transition Engine
//!
//! Folds one raw scanned string into a [`PackProgress`]:
//!
//! ```text
//! raw ──▶ 1. seen packet label?        ──yes──▶ DuplicatePacket
//!     ──▶ 2. classify + decode          ──fail─▶ ForeignScheme / InvoiceScanned / Malformed
//!     ──▶ 3. SKU required?              ──no───▶ NotRequired
//!     ──▶ 4. SKU already fulfilled?     ──yes──▶ AlreadyFulfilled
//!     ──▶ 5. count +1, remember label, emit packet_scanned
//! ```
//!
//! The duplicate check runs before decoding, so a label held under the
//! camera costs one set lookup per frame. Every non-accepting branch hands
//! the input progress back untouched with no event; the outcome only says
//! why, for diagnostics.

use kpk_codec::{classify, CodecError, PacketPayload, ScanKind, Scheme};
use kpk_core::{Sku, Timestamp};
use kpk_log::ScanLogEntry;

use crate::progress::PackProgress;

/// Why a scan did or did not change the progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// One unit of `sku` was counted.
    Accepted {
        /// The SKU counted.
        sku: Sku,
    },
    /// The same packet label was already counted.
    DuplicatePacket,
    /// An invoice label was scanned while packing.
    InvoiceScanned,
    /// Another system's QR scheme.
    ForeignScheme {
        /// The scheme tag before the colon.
        tag: String,
    },
    /// A packet label or plain SKU that could not be decoded.
    Malformed {
        /// What was wrong with it.
        reason: String,
    },
    /// The SKU is not part of this order.
    NotRequired {
        /// The SKU scanned.
        sku: Sku,
    },
    /// The SKU has already reached its required count.
    AlreadyFulfilled {
        /// The SKU scanned.
        sku: Sku,
    },
}

impl ScanOutcome {
    /// Whether the scan was counted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// The result of applying one scan.
#[derive(Debug, Clone)]
pub struct Transition {
    /// The progress after the scan.
    pub progress: PackProgress,
    /// The `packet_scanned` entry, when the scan was counted.
    pub event: Option<ScanLogEntry>,
    /// Why the progress did or did not change.
    pub outcome: ScanOutcome,
}

impl Transition {
    fn ignored(progress: PackProgress, raw: &str, outcome: ScanOutcome) -> Self {
        tracing::debug!(
            order = %progress.order_id(),
            raw,
            ?outcome,
            "scan ignored"
        );
        Self {
            progress,
            event: None,
            outcome,
        }
    }

    /// Split into the new progress and the optional log event.
    pub fn into_parts(self) -> (PackProgress, Option<ScanLogEntry>) {
        (self.progress, self.event)
    }
}

/// Apply `raw` to `progress`, stamping any event with the current time.
pub fn apply(progress: PackProgress, raw: &str) -> Transition {
    apply_at(progress, raw, Timestamp::now())
}

/// Apply `raw` to `progress`, stamping any event with `at`.
///
/// Deterministic: the same inputs always give the same transition.
pub fn apply_at(progress: PackProgress, raw: &str, at: Timestamp) -> Transition {
    let is_packet_label = raw.starts_with(Scheme::Packet.prefix());
    if is_packet_label && progress.has_seen(raw) {
        return Transition::ignored(progress, raw, ScanOutcome::DuplicatePacket);
    }

    let decoded = match classify(raw) {
        ScanKind::Packet => PacketPayload::decode(raw).map(PacketPayload::into_sku),
        ScanKind::PlainSku(text) => Sku::new(text).map_err(CodecError::from),
        ScanKind::Invoice => {
            return Transition::ignored(progress, raw, ScanOutcome::InvoiceScanned);
        }
        ScanKind::ForeignScheme(tag) => {
            let outcome = ScanOutcome::ForeignScheme {
                tag: tag.to_string(),
            };
            return Transition::ignored(progress, raw, outcome);
        }
    };
    let sku = match decoded {
        Ok(sku) => sku,
        Err(e) => {
            let outcome = ScanOutcome::Malformed {
                reason: e.to_string(),
            };
            return Transition::ignored(progress, raw, outcome);
        }
    };

    let Some(&need) = progress.required().get(&sku) else {
        return Transition::ignored(progress, raw, ScanOutcome::NotRequired { sku });
    };
    if progress.scanned(sku.as_str()) >= need {
        return Transition::ignored(progress, raw, ScanOutcome::AlreadyFulfilled { sku });
    }

    let order_id = progress.order_id().clone();
    let progress = progress.count(sku.clone(), is_packet_label.then_some(raw));
    tracing::debug!(
        order = %order_id,
        sku = %sku,
        have = progress.scanned(sku.as_str()),
        need,
        "unit counted"
    );
    Transition {
        progress,
        event: Some(ScanLogEntry::packet_scanned(at, order_id, sku.clone(), raw)),
        outcome: ScanOutcome::Accepted { sku },
    }
}

impl PackProgress {
    /// Apply `raw` to this progress. See [`apply`].
    pub fn apply(self, raw: &str) -> Transition {
        apply(self, raw)
    }

    /// Apply `raw` to this progress with a fixed event time. See [`apply_at`].
    pub fn apply_at(self, raw: &str, at: Timestamp) -> Transition {
        apply_at(self, raw, at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpk_codec::Requirement;
    use kpk_core::OrderId;
    use kpk_log::ScanEvent;

    fn sku(s: &str) -> Sku {
        Sku::new(s).unwrap()
    }

    fn at() -> Timestamp {
        Timestamp::from_epoch_millis(1_767_225_600_000).unwrap()
    }

    fn pkt(s: &str) -> String {
        PacketPayload::new(sku(s)).encode().unwrap()
    }

    fn ord1() -> PackProgress {
        PackProgress::new(
            OrderId::new("ORD1").unwrap(),
            Requirement::from([(sku("A"), 2), (sku("B"), 1)]),
        )
        .unwrap()
    }

    #[test]
    fn packet_label_is_counted_and_remembered() {
        let raw = pkt("A");
        let t = ord1().apply_at(&raw, at());
        assert_eq!(t.outcome, ScanOutcome::Accepted { sku: sku("A") });
        assert_eq!(t.progress.scanned("A"), 1);
        assert!(t.progress.has_seen(&raw));

        let event = t.event.unwrap();
        assert_eq!(event.event, ScanEvent::PacketScanned);
        assert_eq!(event.order_id.as_str(), "ORD1");
        assert_eq!(event.sku, Some(sku("A")));
        assert_eq!(event.raw.as_deref(), Some(raw.as_str()));
        assert_eq!(event.timestamp, at());
    }

    #[test]
    fn same_label_twice_counts_once() {
        let raw = pkt("A");
        let (p, _) = ord1().apply_at(&raw, at()).into_parts();
        let t = p.clone().apply_at(&raw, at());
        assert_eq!(t.outcome, ScanOutcome::DuplicatePacket);
        assert!(t.event.is_none());
        assert_eq!(t.progress, p);
    }

    #[test]
    fn plain_sku_counts_without_being_remembered() {
        let (p, event) = ord1().apply_at("A", at()).into_parts();
        assert_eq!(p.scanned("A"), 1);
        assert!(p.seen_packet_qrs().is_empty());
        assert!(event.is_some());

        // A plain label has no unit identity, so scanning it again counts again.
        let (p, event) = p.apply_at("A", at()).into_parts();
        assert_eq!(p.scanned("A"), 2);
        assert!(event.is_some());
    }

    #[test]
    fn foreign_scheme_ignored() {
        let t = ord1().apply_at("https://example.com/A", at());
        assert_eq!(t.outcome, ScanOutcome::ForeignScheme { tag: "https".into() });
        assert!(t.event.is_none());
        assert_eq!(t.progress, ord1());
    }

    #[test]
    fn invoice_label_ignored_while_packing() {
        let t = ord1().apply_at("PKG1:eyJvIjoiWCJ9", at());
        assert_eq!(t.outcome, ScanOutcome::InvoiceScanned);
        assert_eq!(t.progress, ord1());
    }

    #[test]
    fn malformed_packet_ignored_and_not_remembered() {
        let t = ord1().apply_at("PKT1:not-base64!", at());
        assert!(matches!(t.outcome, ScanOutcome::Malformed { .. }));
        assert!(t.event.is_none());
        assert!(t.progress.seen_packet_qrs().is_empty());
    }

    #[test]
    fn empty_scan_is_malformed() {
        let t = ord1().apply_at("", at());
        assert!(matches!(t.outcome, ScanOutcome::Malformed { .. }));
        assert_eq!(t.progress, ord1());
    }

    #[test]
    fn unrequired_sku_ignored() {
        let t = ord1().apply_at(&pkt("Z"), at());
        assert_eq!(t.outcome, ScanOutcome::NotRequired { sku: sku("Z") });
        assert_eq!(t.progress, ord1());
        // Ignored labels are not remembered; nothing was counted from them.
        assert!(t.progress.seen_packet_qrs().is_empty());
    }

    #[test]
    fn fulfilled_sku_ignored() {
        let (p, _) = ord1().apply_at(&pkt("B"), at()).into_parts();
        let t = p.clone().apply_at("B", at());
        assert_eq!(t.outcome, ScanOutcome::AlreadyFulfilled { sku: sku("B") });
        assert!(t.event.is_none());
        assert_eq!(t.progress, p);
    }

    #[test]
    fn fulfilled_sku_label_not_remembered() {
        let (p, _) = ord1().apply_at("B", at()).into_parts();
        let label = pkt("B");
        let t = p.clone().apply_at(&label, at());
        assert_eq!(t.outcome, ScanOutcome::AlreadyFulfilled { sku: sku("B") });
        assert!(!t.progress.has_seen(&label));
    }

    #[test]
    fn reference_scenario() {
        // Invoice ORD1 requires A×2, B×1.
        let a1 = pkt("A");
        let b1 = pkt("B");
        // A second physical A label: same SKU, different label text.
        let a2 = "PKT1:eyJzIjoiQSIsIm4iOjJ9"; // {"s":"A","n":2}

        let t = ord1().apply_at(&a1, at());
        assert!(t.outcome.is_accepted());
        assert_eq!(t.progress.scanned("A"), 1);
        assert!(!t.progress.is_complete());

        let t = t.progress.apply_at(&a1, at());
        assert_eq!(t.outcome, ScanOutcome::DuplicatePacket);
        assert!(t.event.is_none());

        let t = t.progress.apply_at(&b1, at());
        assert!(t.outcome.is_accepted());
        assert_eq!(t.progress.scanned("A"), 1);
        assert_eq!(t.progress.scanned("B"), 1);
        assert!(!t.progress.is_complete());

        let t = t.progress.apply_at(a2, at());
        assert_eq!(t.outcome, ScanOutcome::Accepted { sku: sku("A") });
        assert_eq!(t.progress.scanned("A"), 2);
        assert!(t.progress.is_complete());
    }
}
