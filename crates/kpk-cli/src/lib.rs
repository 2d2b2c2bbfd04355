//! # kpk-cli: Command-Line Packer
//!
//! Provides the `kpk` command-line interface around the packing session.
//!
//! ## Subcommands
//!
//! - `kpk encode`: Print `PKG1:` invoice and `PKT1:` packet labels.
//! - `kpk decode`: Classify a scanned string and show its payload.
//! - `kpk pack`: Sign in and replay a scan stream, one scan per line.
//! - `kpk completed`: List orders that finished packing.
//!
//! ```bash
//! kpk encode invoice --order ORD1 --item A=2 --item B=1 > scans.txt
//! kpk encode packet --sku A >> scans.txt
//! kpk pack --email packer@example.com --scans scans.txt --report ORD1.csv
//! ```
//!
//! Handlers write to the `out` they are given and return the process exit
//! code. Fatal errors propagate as `anyhow::Error`.

pub mod completed;
pub mod decode;
pub mod encode;
pub mod pack;

use std::path::PathBuf;

use kpk_session::SessionConfig;

/// Apply command-line overrides to an environment-loaded configuration.
pub fn apply_overrides(mut config: SessionConfig, state_dir: Option<PathBuf>) -> SessionConfig {
    if let Some(dir) = state_dir {
        config.state_dir = dir;
    }
    config
}
