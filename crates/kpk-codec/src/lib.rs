//! # kpk-codec: QR Payload Codec
//!
//! Translates between the two QR wire formats scanned on the packing floor
//! and structured records:
//!
//! - **Invoice** (`invoice.rs`): `PKG1:` followed by URL-safe unpadded
//!   base64 of `{"o": order id, "i": [{"sku": .., "units": ..}, ..]}`.
//!
//! - **Packet** (`packet.rs`): `PKT1:` followed by the same encoding of
//!   `{"s": sku}`. One per physical packed unit.
//!
//! - **Scheme** (`scheme.rs`): classification of an arbitrary scanned
//!   string into one of the recognized schemes, a foreign scheme that is
//!   ignored, or a plain legacy SKU label.
//!
//! ## Crate Policy
//!
//! - Decoding never panics; every failure is a [`CodecError`].
//! - The codec does not log. Callers decide whether a failure matters.

pub mod error;
pub mod invoice;
pub mod packet;
pub mod scheme;
mod wire;

pub use error::CodecError;
pub use invoice::{encode_invoice, DuplicateSkuPolicy, InvoiceItem, InvoicePayload, Requirement};
pub use packet::{encode_packet, PacketPayload};
pub use scheme::{classify, ScanKind, Scheme, FOREIGN_SCHEME_LEN};
