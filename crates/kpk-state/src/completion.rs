//! # Completion Predicate
//!
//! Remaining quantities are derived from the progress record on demand.
//! Because counts never exceed requirements, `remaining` is always
//! `required - scanned` without saturation, and once every remaining value
//! reaches zero it stays there.

use std::collections::BTreeMap;

use serde::Serialize;

use kpk_core::Sku;

use crate::progress::PackProgress;

/// One SKU's row on the packing display: `have / need`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressLine {
    /// The SKU.
    pub sku: Sku,
    /// Units counted.
    pub have: u32,
    /// Units required.
    pub need: u32,
}

impl ProgressLine {
    /// Units still to scan.
    pub fn remaining(&self) -> u32 {
        self.need - self.have
    }

    /// Whether this SKU is fulfilled.
    pub fn is_done(&self) -> bool {
        self.have >= self.need
    }
}

impl PackProgress {
    /// Units of `sku` still to scan; `None` if `sku` is not required.
    pub fn remaining(&self, sku: &str) -> Option<u32> {
        self.required()
            .get(sku)
            .map(|need| need - self.scanned(sku))
    }

    /// Units still to scan per required SKU, fulfilled SKUs included at zero.
    pub fn remaining_by_sku(&self) -> BTreeMap<Sku, u32> {
        self.required()
            .iter()
            .map(|(sku, need)| (sku.clone(), need - self.scanned(sku.as_str())))
            .collect()
    }

    /// Units still to scan across the whole order.
    pub fn remaining_units(&self) -> u64 {
        self.required()
            .iter()
            .map(|(sku, need)| u64::from(need - self.scanned(sku.as_str())))
            .sum()
    }

    /// Whether every required SKU has reached its count.
    pub fn is_complete(&self) -> bool {
        self.required()
            .iter()
            .all(|(sku, need)| self.scanned(sku.as_str()) >= *need)
    }

    /// One display row per required SKU, in SKU order.
    pub fn lines(&self) -> Vec<ProgressLine> {
        self.required()
            .iter()
            .map(|(sku, need)| ProgressLine {
                sku: sku.clone(),
                have: self.scanned(sku.as_str()),
                need: *need,
            })
            .collect()
    }
}
