//! # Packet Payload
//!
//! One `PKT1:` label per physical packed unit. The wire document is
//! `{"s": sku}`; two labels for the same SKU differ only in their raw text
//! when the printer adds a serial or other field, which this codec ignores.

use serde::{Deserialize, Serialize};

use kpk_core::Sku;

use crate::error::CodecError;
use crate::scheme::Scheme;
use crate::wire;

/// A decoded packet label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketPayload {
    sku: Sku,
}

#[derive(Serialize, Deserialize)]
struct PacketWire {
    s: String,
}

impl PacketPayload {
    /// A packet label for `sku`.
    pub fn new(sku: Sku) -> Self {
        Self { sku }
    }

    /// Decode a `PKT1:` string.
    pub fn decode(raw: &str) -> Result<Self, CodecError> {
        let wire: PacketWire = wire::decode(Scheme::Packet, raw)?;
        Ok(Self {
            sku: Sku::new(wire.s)?,
        })
    }

    /// Encode as a `PKT1:` string.
    pub fn encode(&self) -> Result<String, CodecError> {
        wire::encode(
            Scheme::Packet,
            &PacketWire {
                s: self.sku.to_string(),
            },
        )
    }

    /// The SKU on the label.
    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    /// Consume into the SKU.
    pub fn into_sku(self) -> Sku {
        self.sku
    }
}

/// Encode `packet` as a `PKT1:` string.
pub fn encode_packet(packet: &PacketPayload) -> Result<String, CodecError> {
    packet.encode()
}
