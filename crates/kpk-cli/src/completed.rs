//! # Completed Subcommand
//!
//! Lists the orders recorded in the state directory's completed-order file.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use kpk_session::{CompletedOrderStore, FileCompletedOrderStore, SessionConfig};

/// Arguments for the `kpk completed` subcommand.
#[derive(Args, Debug)]
pub struct CompletedArgs {
    /// Print the ids as a JSON array instead of one per line.
    #[arg(long)]
    pub json: bool,
}

/// Execute the completed subcommand.
pub fn run_completed(args: &CompletedArgs, config: &SessionConfig, out: &mut dyn Write) -> Result<u8> {
    let store = FileCompletedOrderStore::new(&config.state_dir);
    let orders = store.list()?;
    tracing::debug!(path = %store.path().display(), count = orders.len(), "completed orders loaded");

    if args.json {
        writeln!(out, "{}", serde_json::to_string(&orders)?)?;
    } else {
        for order in &orders {
            writeln!(out, "{order}")?;
        }
    }
    Ok(0)
}
