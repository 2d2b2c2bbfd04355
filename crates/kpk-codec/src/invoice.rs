//! # Invoice Payload
//!
//! Produced by the invoicing system and scanned once per order.
//!
//! Wire document (compact field names):
//!
//! ```json
//! {"o": "ORD1", "i": [{"sku": "A", "units": 2}, {"sku": "B", "units": 1}]}
//! ```
//!
//! Decoding validates every item: non-empty SKU, `units` strictly positive
//! and within `u32`. An invoice with no items is malformed. Unknown fields
//! are ignored.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use kpk_core::{OrderId, Sku};

use crate::error::CodecError;
use crate::scheme::Scheme;
use crate::wire;

/// Required unit count per SKU for one order.
pub type Requirement = BTreeMap<Sku, u32>;

/// What to do when one invoice lists the same SKU more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateSkuPolicy {
    /// The last listing of the SKU sets its requirement.
    #[default]
    LastWins,
    /// The invoice is malformed.
    Reject,
}

impl DuplicateSkuPolicy {
    /// The configuration spelling of this policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastWins => "last-wins",
            Self::Reject => "reject",
        }
    }
}

impl std::fmt::Display for DuplicateSkuPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuplicateSkuPolicy {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last-wins" => Ok(Self::LastWins),
            "reject" => Ok(Self::Reject),
            other => Err(CodecError::UnknownPolicy(other.to_string())),
        }
    }
}

/// One line of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// The product.
    pub sku: Sku,
    /// Units to pack; always positive.
    pub units: u32,
}

/// A decoded invoice: the order and its ordered item lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicePayload {
    order_id: OrderId,
    items: Vec<InvoiceItem>,
}

#[derive(Serialize, Deserialize)]
struct InvoiceWire {
    o: String,
    i: Vec<ItemWire>,
}

#[derive(Serialize, Deserialize)]
struct ItemWire {
    sku: String,
    units: i64,
}

impl InvoicePayload {
    /// Build an invoice, rejecting an empty item list and zero-unit lines.
    pub fn new(order_id: OrderId, items: Vec<InvoiceItem>) -> Result<Self, CodecError> {
        if items.is_empty() {
            return Err(CodecError::EmptyItems);
        }
        if let Some(item) = items.iter().find(|item| item.units == 0) {
            return Err(CodecError::NonPositiveUnits {
                sku: item.sku.to_string(),
                units: 0,
            });
        }
        Ok(Self { order_id, items })
    }

    /// Decode a `PKG1:` string.
    pub fn decode(raw: &str) -> Result<Self, CodecError> {
        let wire: InvoiceWire = wire::decode(Scheme::Invoice, raw)?;
        let order_id = OrderId::new(wire.o)?;
        let items = wire
            .i
            .into_iter()
            .map(|item| {
                if item.units <= 0 {
                    return Err(CodecError::NonPositiveUnits {
                        sku: item.sku,
                        units: item.units,
                    });
                }
                let units = u32::try_from(item.units).map_err(|_| CodecError::UnitsOutOfRange {
                    sku: item.sku.clone(),
                    units: item.units,
                })?;
                Ok(InvoiceItem {
                    sku: Sku::new(item.sku)?,
                    units,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(order_id, items)
    }

    /// Encode as a `PKG1:` string.
    pub fn encode(&self) -> Result<String, CodecError> {
        let wire = InvoiceWire {
            o: self.order_id.to_string(),
            i: self
                .items
                .iter()
                .map(|item| ItemWire {
                    sku: item.sku.to_string(),
                    units: i64::from(item.units),
                })
                .collect(),
        };
        wire::encode(Scheme::Invoice, &wire)
    }

    /// The order this invoice names.
    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Item lines in wire order, duplicates included.
    pub fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    /// Collapse the item lines into a per-SKU requirement.
    pub fn required(&self, policy: DuplicateSkuPolicy) -> Result<Requirement, CodecError> {
        let mut required = Requirement::new();
        for item in &self.items {
            let previous = required.insert(item.sku.clone(), item.units);
            if previous.is_some() && policy == DuplicateSkuPolicy::Reject {
                return Err(CodecError::DuplicateSku {
                    sku: item.sku.to_string(),
                });
            }
        }
        Ok(required)
    }

    /// Consume into the order id and item lines.
    pub fn into_parts(self) -> (OrderId, Vec<InvoiceItem>) {
        (self.order_id, self.items)
    }
}

/// Encode `invoice` as a `PKG1:` string.
pub fn encode_invoice(invoice: &InvoicePayload) -> Result<String, CodecError> {
    invoice.encode()
}
