//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers that flow through the packer.
//! These prevent accidental identifier confusion: an `OrderId` cannot be
//! looked up in a SKU requirement map.
//!
//! Both identifiers are opaque strings issued by the invoicing system. The
//! only structural rule enforced here is that they are non-empty.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identifier of a customer order, as printed on the invoice QR.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderId(String);

/// Stock-keeping unit identifier: one distinct product type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sku(String);

impl OrderId {
    /// Build an order identifier, rejecting the empty string.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        if id.is_empty() {
            return Err(CoreError::EmptyIdentifier { kind: "order id" });
        }
        Ok(Self(id))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Sku {
    /// Build a SKU, rejecting the empty string.
    pub fn new(sku: impl Into<String>) -> Result<Self, CoreError> {
        let sku = sku.into();
        if sku.is_empty() {
            return Err(CoreError::EmptyIdentifier { kind: "sku" });
        }
        Ok(Self(sku))
    }

    /// Borrow the SKU text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

// Lets `BTreeMap<Sku, _>` be queried with a plain `&str`.
impl Borrow<str> for Sku {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OrderId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Sku {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrderId> for String {
    fn from(value: OrderId) -> Self {
        value.0
    }
}

impl From<Sku> for String {
    fn from(value: Sku) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn empty_order_id_rejected() {
        assert_eq!(
            OrderId::new(""),
            Err(CoreError::EmptyIdentifier { kind: "order id" })
        );
    }

    #[test]
    fn empty_sku_rejected() {
        assert!(Sku::new(String::new()).is_err());
    }

    #[test]
    fn whitespace_is_kept_verbatim() {
        let sku = Sku::new(" A ").unwrap();
        assert_eq!(sku.as_str(), " A ");
    }

    #[test]
    fn display_is_the_raw_text() {
        let id = OrderId::new("ORD1").unwrap();
        assert_eq!(id.to_string(), "ORD1");
    }

    #[test]
    fn sku_map_lookup_by_str() {
        let mut map = BTreeMap::new();
        map.insert(Sku::new("A").unwrap(), 2u32);
        assert_eq!(map.get("A"), Some(&2));
        assert_eq!(map.get("B"), None);
    }

    #[test]
    fn serde_is_a_plain_string() {
        let sku = Sku::new("SKU-9").unwrap();
        assert_eq!(serde_json::to_string(&sku).unwrap(), "\"SKU-9\"");
        let back: Sku = serde_json::from_str("\"SKU-9\"").unwrap();
        assert_eq!(back, sku);
    }

    #[test]
    fn serde_rejects_empty() {
        assert!(serde_json::from_str::<OrderId>("\"\"").is_err());
    }
}
