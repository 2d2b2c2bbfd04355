//! # Pack Progress Record
//!
//! One order's in-progress packing state. `order_id` and `required` are set
//! at creation and never change. The scanned counts and the seen packet set
//! only grow, one accepted scan at a time, through [`crate::engine`].
//!
//! The record is replaced, not edited: every accepted scan consumes the old
//! value and produces a new one.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use kpk_codec::Requirement;
use kpk_core::{OrderId, Sku};

use crate::error::ProgressError;

/// An order's packing progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProgressRecord", into = "ProgressRecord")]
pub struct PackProgress {
    order_id: OrderId,
    required: Requirement,
    scanned: BTreeMap<Sku, u32>,
    seen_packets: BTreeSet<String>,
}

/// Stored shape. Loading re-checks every invariant.
#[derive(Serialize, Deserialize)]
struct ProgressRecord {
    order_id: OrderId,
    required: Requirement,
    #[serde(default)]
    scanned_units_by_sku: BTreeMap<Sku, u32>,
    #[serde(default)]
    seen_packet_qrs: BTreeSet<String>,
}

impl PackProgress {
    /// Start packing `order_id` against `required`, with nothing counted yet.
    pub fn new(order_id: OrderId, required: Requirement) -> Result<Self, ProgressError> {
        check_required(&order_id, &required)?;
        Ok(Self {
            order_id,
            required,
            scanned: BTreeMap::new(),
            seen_packets: BTreeSet::new(),
        })
    }

    /// The order being packed.
    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Required units per SKU.
    pub fn required(&self) -> &Requirement {
        &self.required
    }

    /// Units counted so far per SKU. SKUs with nothing counted are absent.
    pub fn scanned_units_by_sku(&self) -> &BTreeMap<Sku, u32> {
        &self.scanned
    }

    /// Units counted so far for `sku`.
    pub fn scanned(&self, sku: &str) -> u32 {
        self.scanned.get(sku).copied().unwrap_or(0)
    }

    /// Raw packet labels already accepted.
    pub fn seen_packet_qrs(&self) -> &BTreeSet<String> {
        &self.seen_packets
    }

    /// Whether the packet label `raw` has already been accepted.
    pub fn has_seen(&self, raw: &str) -> bool {
        self.seen_packets.contains(raw)
    }

    /// Count one more unit of `sku`, remembering `packet_label` if given.
    ///
    /// Callers must have checked that `sku` is required and not yet
    /// fulfilled.
    pub(crate) fn count(mut self, sku: Sku, packet_label: Option<&str>) -> Self {
        debug_assert!(self.scanned(sku.as_str()) < self.required.get(&sku).copied().unwrap_or(0));
        *self.scanned.entry(sku).or_insert(0) += 1;
        if let Some(label) = packet_label {
            self.seen_packets.insert(label.to_string());
        }
        self
    }
}

fn check_required(order_id: &OrderId, required: &Requirement) -> Result<(), ProgressError> {
    if required.is_empty() {
        return Err(ProgressError::EmptyRequirement {
            order: order_id.to_string(),
        });
    }
    if let Some((sku, _)) = required.iter().find(|(_, units)| **units == 0) {
        return Err(ProgressError::ZeroRequired {
            sku: sku.to_string(),
        });
    }
    Ok(())
}

impl TryFrom<ProgressRecord> for PackProgress {
    type Error = ProgressError;

    fn try_from(record: ProgressRecord) -> Result<Self, Self::Error> {
        check_required(&record.order_id, &record.required)?;
        for (sku, &scanned) in &record.scanned_units_by_sku {
            let required = record
                .required
                .get(sku)
                .copied()
                .ok_or_else(|| ProgressError::UnknownScannedSku {
                    sku: sku.to_string(),
                })?;
            if scanned > required {
                return Err(ProgressError::OverScanned {
                    sku: sku.to_string(),
                    scanned,
                    required,
                });
            }
        }
        Ok(Self {
            order_id: record.order_id,
            required: record.required,
            // Zero counts are equivalent to absence.
            scanned: record
                .scanned_units_by_sku
                .into_iter()
                .filter(|(_, n)| *n > 0)
                .collect(),
            seen_packets: record.seen_packet_qrs,
        })
    }
}

impl From<PackProgress> for ProgressRecord {
    fn from(progress: PackProgress) -> Self {
        Self {
            order_id: progress.order_id,
            required: progress.required,
            scanned_units_by_sku: progress.scanned,
            seen_packet_qrs: progress.seen_packets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sku(s: &str) -> Sku {
        Sku::new(s).unwrap()
    }

    fn ord1() -> PackProgress {
        let required = Requirement::from([(sku("A"), 2), (sku("B"), 1)]);
        PackProgress::new(OrderId::new("ORD1").unwrap(), required).unwrap()
    }

    #[test]
    fn new_progress_is_empty() {
        let p = ord1();
        assert_eq!(p.order_id().as_str(), "ORD1");
        assert_eq!(p.required().len(), 2);
        assert!(p.scanned_units_by_sku().is_empty());
        assert!(p.seen_packet_qrs().is_empty());
        assert_eq!(p.scanned("A"), 0);
    }

    #[test]
    fn empty_requirement_rejected() {
        let err = PackProgress::new(OrderId::new("X").unwrap(), Requirement::new()).unwrap_err();
        assert_eq!(err, ProgressError::EmptyRequirement { order: "X".into() });
    }

    #[test]
    fn zero_requirement_rejected() {
        let required = Requirement::from([(sku("A"), 0)]);
        let err = PackProgress::new(OrderId::new("X").unwrap(), required).unwrap_err();
        assert_eq!(err, ProgressError::ZeroRequired { sku: "A".into() });
    }

    #[test]
    fn count_records_label() {
        let p = ord1().count(sku("A"), Some("PKT1:x"));
        assert_eq!(p.scanned("A"), 1);
        assert!(p.has_seen("PKT1:x"));
        let p = p.count(sku("A"), None);
        assert_eq!(p.scanned("A"), 2);
        assert_eq!(p.seen_packet_qrs().len(), 1);
    }

    #[test]
    fn serde_roundtrip() {
        let p = ord1().count(sku("B"), Some("PKT1:b"));
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(
            json,
            json!({
                "order_id": "ORD1",
                "required": {"A": 2, "B": 1},
                "scanned_units_by_sku": {"B": 1},
                "seen_packet_qrs": ["PKT1:b"],
            })
        );
        let back: PackProgress = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn deserialize_defaults_progress_fields() {
        let p: PackProgress =
            serde_json::from_value(json!({"order_id": "O", "required": {"A": 1}})).unwrap();
        assert!(p.scanned_units_by_sku().is_empty());
    }

    #[test]
    fn deserialize_rejects_over_scan() {
        let result: Result<PackProgress, _> = serde_json::from_value(json!({
            "order_id": "O",
            "required": {"A": 1},
            "scanned_units_by_sku": {"A": 2},
        }));
        assert!(result.is_err());
    }

    #[test]
    fn deserialize_rejects_unknown_scanned_sku() {
        let result: Result<PackProgress, _> = serde_json::from_value(json!({
            "order_id": "O",
            "required": {"A": 1},
            "scanned_units_by_sku": {"Z": 1},
        }));
        assert!(result.is_err());
    }

    #[test]
    fn deserialize_rejects_empty_requirement() {
        let result: Result<PackProgress, _> =
            serde_json::from_value(json!({"order_id": "O", "required": {}}));
        assert!(result.is_err());
    }

    #[test]
    fn deserialize_drops_zero_counts() {
        let p: PackProgress = serde_json::from_value(json!({
            "order_id": "O",
            "required": {"A": 1},
            "scanned_units_by_sku": {"A": 0},
        }))
        .unwrap();
        assert!(p.scanned_units_by_sku().is_empty());
    }
}
