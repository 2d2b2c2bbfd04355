//! # kpk CLI entry point
//!
//! Parses command-line arguments, loads configuration, and dispatches to
//! subcommand handlers.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kpk_cli::completed::{run_completed, CompletedArgs};
use kpk_cli::decode::{run_decode, DecodeArgs};
use kpk_cli::encode::{run_encode, EncodeArgs};
use kpk_cli::pack::{run_pack, PackArgs};
use kpk_session::SessionConfig;

/// Kitoko packer: reconcile scanned packets against warehouse invoices.
#[derive(Parser, Debug)]
#[command(name = "kpk", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding packer state. Overrides KPK_STATE_DIR.
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print invoice and packet QR payloads.
    Encode(EncodeArgs),

    /// Classify a scanned string and print its decoded payload.
    Decode(DecodeArgs),

    /// Sign in and replay scans, one per line, then write the scan report.
    Pack(PackArgs),

    /// List orders that have finished packing.
    Completed(CompletedArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = SessionConfig::from_env()
        .map_err(anyhow::Error::from)
        .and_then(|config| {
            let config = kpk_cli::apply_overrides(config, cli.state_dir);
            tracing::debug!(?config, "configuration loaded");

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            let code = match &cli.command {
                Commands::Encode(args) => run_encode(args, &mut out),
                Commands::Decode(args) => run_decode(args, &mut out),
                Commands::Pack(args) => run_pack(args, &config, &mut out),
                Commands::Completed(args) => run_completed(args, &config, &mut out),
            }?;
            out.flush()?;
            Ok(code)
        });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
