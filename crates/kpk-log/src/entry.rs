//! # Scan Log Entries
//!
//! Three events are ever recorded:
//!
//! ```text
//! invoice_scanned ──▶ packet_scanned × N ──▶ order_packed
//! ```
//!
//! `invoice_scanned` carries the raw invoice string, `packet_scanned`
//! carries the SKU and the raw scan, `order_packed` carries neither.

use serde::{Deserialize, Serialize};

use kpk_core::{OrderId, Sku, Timestamp};

/// The kind of a logged event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanEvent {
    /// An invoice QR was accepted and an order opened.
    InvoiceScanned,
    /// One unit was counted against the open order.
    PacketScanned,
    /// Every required unit was counted.
    OrderPacked,
}

impl ScanEvent {
    /// The name written to the report's `event` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvoiceScanned => "invoice_scanned",
            Self::PacketScanned => "packet_scanned",
            Self::OrderPacked => "order_packed",
        }
    }
}

impl std::fmt::Display for ScanEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanLogEntry {
    /// When the event happened.
    pub timestamp: Timestamp,
    /// The order the event belongs to.
    pub order_id: OrderId,
    /// What happened.
    pub event: ScanEvent,
    /// The SKU counted, for `packet_scanned`.
    pub sku: Option<Sku>,
    /// The raw scanned string, when one triggered the event.
    pub raw: Option<String>,
}

impl ScanLogEntry {
    /// An invoice was accepted.
    pub fn invoice_scanned(timestamp: Timestamp, order_id: OrderId, raw: impl Into<String>) -> Self {
        Self {
            timestamp,
            order_id,
            event: ScanEvent::InvoiceScanned,
            sku: None,
            raw: Some(raw.into()),
        }
    }

    /// A unit of `sku` was counted from the scan `raw`.
    pub fn packet_scanned(
        timestamp: Timestamp,
        order_id: OrderId,
        sku: Sku,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            order_id,
            event: ScanEvent::PacketScanned,
            sku: Some(sku),
            raw: Some(raw.into()),
        }
    }

    /// The order reached its required quantities.
    pub fn order_packed(timestamp: Timestamp, order_id: OrderId) -> Self {
        Self {
            timestamp,
            order_id,
            event: ScanEvent::OrderPacked,
            sku: None,
            raw: None,
        }
    }
}

/// Append-only sequence of entries in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanLog {
    entries: Vec<ScanLogEntry>,
}

impl ScanLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry.
    pub fn push(&mut self, entry: ScanLogEntry) {
        self.entries.push(entry);
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[ScanLogEntry] {
        &self.entries
    }

    /// Entries belonging to `order`, oldest first.
    pub fn entries_for<'a>(
        &'a self,
        order: &'a OrderId,
    ) -> impl Iterator<Item = &'a ScanLogEntry> + 'a {
        self.entries.iter().filter(move |e| &e.order_id == order)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the whole log as the CSV scan report.
    pub fn to_csv(&self) -> String {
        crate::report::render_csv(&self.entries)
    }

    /// Stream the CSV scan report to `out`.
    pub fn write_csv<W: std::io::Write>(&self, out: W) -> std::io::Result<()> {
        crate::report::write_csv(&self.entries, out)
    }
}

impl Extend<ScanLogEntry> for ScanLog {
    fn extend<I: IntoIterator<Item = ScanLogEntry>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}
