//! # Decode Subcommand
//!
//! Shows how the packer would read a scanned string.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{json, Value};

use kpk_codec::{classify, InvoicePayload, PacketPayload, ScanKind};

/// Arguments for the `kpk decode` subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// The scanned string.
    #[arg(value_name = "RAW")]
    pub raw: String,
}

/// Execute the decode subcommand.
pub fn run_decode(args: &DecodeArgs, out: &mut dyn Write) -> Result<u8> {
    let value = describe(&args.raw)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    Ok(0)
}

/// Classify `raw` and decode it if it is a recognized payload.
fn describe(raw: &str) -> Result<Value> {
    Ok(match classify(raw) {
        ScanKind::Invoice => {
            let invoice = InvoicePayload::decode(raw).context("invalid invoice payload")?;
            json!({
                "kind": "invoice",
                "order_id": invoice.order_id(),
                "items": invoice.items(),
            })
        }
        ScanKind::Packet => {
            let packet = PacketPayload::decode(raw).context("invalid packet payload")?;
            json!({
                "kind": "packet",
                "sku": packet.sku(),
            })
        }
        ScanKind::ForeignScheme(tag) => json!({
            "kind": "foreign_scheme",
            "tag": tag,
        }),
        ScanKind::PlainSku(sku) => json!({
            "kind": "plain_sku",
            "sku": sku,
        }),
    })
}
