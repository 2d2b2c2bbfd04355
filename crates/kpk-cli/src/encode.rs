//! # Encode Subcommand
//!
//! Prints QR payload strings for printing labels or building test scan
//! streams.

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use kpk_codec::{InvoiceItem, InvoicePayload, PacketPayload};
use kpk_core::{OrderId, Sku};

/// Arguments for the `kpk encode` subcommand.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(subcommand)]
    pub command: EncodeCommand,
}

/// Encode subcommands.
#[derive(Subcommand, Debug)]
pub enum EncodeCommand {
    /// Print a `PKG1:` invoice payload.
    Invoice {
        /// Order identifier.
        #[arg(long = "order", value_name = "ID")]
        order_id: String,
        /// Required units of one SKU. Repeat for each line.
        #[arg(long = "item", value_name = "SKU=UNITS", value_parser = parse_item, required = true)]
        items: Vec<InvoiceItem>,
    },

    /// Print a `PKT1:` packet payload.
    Packet {
        /// SKU of the packed unit.
        #[arg(long)]
        sku: String,
    },
}

/// Execute the encode subcommand.
pub fn run_encode(args: &EncodeArgs, out: &mut dyn Write) -> Result<u8> {
    let raw = match &args.command {
        EncodeCommand::Invoice { order_id, items } => {
            let order_id = OrderId::new(order_id.as_str()).context("invalid --order")?;
            InvoicePayload::new(order_id, items.clone())?.encode()?
        }
        EncodeCommand::Packet { sku } => {
            let sku = Sku::new(sku.as_str()).context("invalid --sku")?;
            PacketPayload::new(sku).encode()?
        }
    };
    writeln!(out, "{raw}")?;
    Ok(0)
}

/// Parse `SKU=UNITS`. The last `=` separates the count, so SKUs may
/// contain `=`.
fn parse_item(s: &str) -> Result<InvoiceItem, String> {
    let (sku, units) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected SKU=UNITS, got {s:?}"))?;
    let sku = Sku::new(sku).map_err(|e| e.to_string())?;
    let units: u32 = units
        .parse()
        .map_err(|e| format!("invalid unit count {units:?}: {e}"))?;
    if units == 0 {
        return Err(format!("unit count for {sku} must be positive"));
    }
    Ok(InvoiceItem { sku, units })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(command: EncodeCommand) -> String {
        let mut out = Vec::new();
        let code = run_encode(&EncodeArgs { command }, &mut out).unwrap();
        assert_eq!(code, 0);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parse_item_accepts_sku_and_units() {
        let item = parse_item("A=2").unwrap();
        assert_eq!(item.sku.as_str(), "A");
        assert_eq!(item.units, 2);
    }

    #[test]
    fn parse_item_splits_on_last_equals() {
        let item = parse_item("size=XL=3").unwrap();
        assert_eq!(item.sku.as_str(), "size=XL");
        assert_eq!(item.units, 3);
    }

    #[test]
    fn parse_item_rejects_bad_input() {
        assert!(parse_item("A").is_err());
        assert!(parse_item("=2").is_err());
        assert!(parse_item("A=0").is_err());
        assert!(parse_item("A=-1").is_err());
        assert!(parse_item("A=two").is_err());
    }

    #[test]
    fn invoice_output_decodes() {
        let out = encode(EncodeCommand::Invoice {
            order_id: "ORD1".into(),
            items: vec![parse_item("A=2").unwrap(), parse_item("B=1").unwrap()],
        });
        assert!(out.ends_with('\n'));
        let invoice = InvoicePayload::decode(out.trim_end()).unwrap();
        assert_eq!(invoice.order_id().as_str(), "ORD1");
        assert_eq!(invoice.items().len(), 2);
    }

    #[test]
    fn packet_output_decodes() {
        let out = encode(EncodeCommand::Packet { sku: "A".into() });
        assert_eq!(PacketPayload::decode(out.trim_end()).unwrap().sku().as_str(), "A");
    }

    #[test]
    fn empty_order_rejected() {
        let mut out = Vec::new();
        let args = EncodeArgs {
            command: EncodeCommand::Invoice {
                order_id: String::new(),
                items: vec![parse_item("A=1").unwrap()],
            },
        };
        assert!(run_encode(&args, &mut out).is_err());
        assert!(out.is_empty());
    }
}
