//! # Scan Classification
//!
//! Every string handed over by the barcode decoder is one of:
//!
//! ```text
//! "PKG1:<b64>"   ──▶ ScanKind::Invoice        (recognized scheme)
//! "PKT1:<b64>"   ──▶ ScanKind::Packet         (recognized scheme)
//! "XYZ9:..."     ──▶ ScanKind::ForeignScheme  (3..=8 chars before the first ':')
//! anything else  ──▶ ScanKind::PlainSku       (legacy label: the text is the SKU)
//! ```
//!
//! The recognized schemes are an explicit enum. The colon rule only runs
//! after both recognized prefixes fail to match, and reserves room for QR
//! schemes printed by other systems without counting them as SKUs.

use std::ops::RangeInclusive;

/// Length range, in characters, of a scheme tag before the first colon.
pub const FOREIGN_SCHEME_LEN: RangeInclusive<usize> = 3..=8;

/// The QR schemes this codec understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Invoice QR: order id plus required SKU quantities.
    Invoice,
    /// Packet QR: one physical packed unit.
    Packet,
}

impl Scheme {
    /// Every recognized scheme, in match order.
    pub const ALL: [Scheme; 2] = [Scheme::Invoice, Scheme::Packet];

    /// The wire prefix, including the trailing colon.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Invoice => "PKG1:",
            Self::Packet => "PKT1:",
        }
    }

    /// Which recognized scheme `raw` carries, if any.
    pub fn detect(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| raw.starts_with(s.prefix()))
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix().trim_end_matches(':'))
    }
}

/// The classification of a raw scanned string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind<'a> {
    /// Starts with the invoice prefix.
    Invoice,
    /// Starts with the packet prefix.
    Packet,
    /// Some other system's scheme; carries the tag before the colon.
    ForeignScheme(&'a str),
    /// No scheme marker; the whole string is the SKU.
    PlainSku(&'a str),
}

/// Classify a raw scanned string. Never fails.
pub fn classify(raw: &str) -> ScanKind<'_> {
    match Scheme::detect(raw) {
        Some(Scheme::Invoice) => return ScanKind::Invoice,
        Some(Scheme::Packet) => return ScanKind::Packet,
        None => {}
    }
    if let Some((tag, _)) = raw.split_once(':') {
        if FOREIGN_SCHEME_LEN.contains(&tag.chars().count()) {
            return ScanKind::ForeignScheme(tag);
        }
    }
    ScanKind::PlainSku(raw)
}
