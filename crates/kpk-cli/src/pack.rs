//! # Pack Subcommand
//!
//! Replays a scan stream through a packing session backed by the
//! completed-order file, printing one status line per scan, then writes
//! the CSV scan report.
//!
//! Each non-blank input line is one scan; surrounding whitespace is
//! trimmed. A rejected scan (bad invoice, order already packed, packet with
//! no order) is reported and the replay continues; the exit code is then 1.
//! Store and I/O failures abort the replay.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use kpk_log::DEFAULT_REPORT_NAME;
use kpk_session::{
    FileCompletedOrderStore, PackSession, RemoteServices, Scan, SessionConfig, SessionError,
};
use kpk_state::{ProgressLine, ScanOutcome};

/// Arguments for the `kpk pack` subcommand.
#[derive(Args, Debug)]
pub struct PackArgs {
    /// Operator email.
    #[arg(long)]
    pub email: String,

    /// Operator password. Ignored by the offline backend.
    #[arg(long, default_value = "")]
    pub password: String,

    /// File with one scan per line. Reads standard input when omitted.
    #[arg(long, value_name = "FILE")]
    pub scans: Option<PathBuf>,

    /// Where to write the CSV scan report.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_REPORT_NAME)]
    pub report: PathBuf,
}

/// Execute the pack subcommand.
pub fn run_pack(args: &PackArgs, config: &SessionConfig, out: &mut dyn Write) -> Result<u8> {
    let input: Box<dyn BufRead> = match &args.scans {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open scans: {}", path.display()))?,
        )),
        None => Box::new(std::io::stdin().lock()),
    };
    replay(args, config, input, out)
}

/// Replay `input` through a fresh session and write the report.
pub fn replay(
    args: &PackArgs,
    config: &SessionConfig,
    input: impl BufRead,
    out: &mut dyn Write,
) -> Result<u8> {
    let mut session = PackSession::new(
        config.clone(),
        FileCompletedOrderStore::new(&config.state_dir),
        RemoteServices::for_backend(config.backend),
    );
    let operator = session.sign_in(&args.email, &args.password)?;
    writeln!(out, "signed in as {}", operator.email)?;

    let mut rejected = 0usize;
    for (index, line) in input.lines().enumerate() {
        let line = line.context("failed to read scan input")?;
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }
        let line_no = index + 1;
        match session.scan(raw) {
            Ok(Scan::Invoice(accepted)) => {
                writeln!(
                    out,
                    "{}: invoice accepted [{}]",
                    accepted.order_id,
                    render_lines(&accepted.lines)
                )?;
            }
            Ok(Scan::Packet(scan)) => {
                writeln!(
                    out,
                    "{}: {} [{}]",
                    scan.order_id,
                    describe(&scan.outcome),
                    render_lines(&scan.lines)
                )?;
                if scan.completed {
                    writeln!(out, "{}: packed", scan.order_id)?;
                }
            }
            Err(SessionError::Store(e)) => {
                return Err(e).with_context(|| format!("line {line_no}: completed-order store failed"));
            }
            Err(e) => {
                rejected += 1;
                tracing::warn!(line = line_no, error = %e, "scan rejected");
                writeln!(out, "line {line_no}: rejected: {e}")?;
            }
        }
    }

    if let Some(progress) = session.active() {
        writeln!(
            out,
            "{}: incomplete, {} unit(s) remaining",
            progress.order_id(),
            progress.remaining_units()
        )?;
    }

    let file = File::create(&args.report)
        .with_context(|| format!("failed to create report: {}", args.report.display()))?;
    session
        .log()
        .write_csv(BufWriter::new(file))
        .with_context(|| format!("failed to write report: {}", args.report.display()))?;
    writeln!(
        out,
        "wrote {} event(s) to {}",
        session.log().len(),
        args.report.display()
    )?;

    Ok(if rejected == 0 { 0 } else { 1 })
}

fn render_lines(lines: &[ProgressLine]) -> String {
    lines
        .iter()
        .map(|l| format!("{} {}/{}", l.sku, l.have, l.need))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe(outcome: &ScanOutcome) -> String {
    match outcome {
        ScanOutcome::Accepted { sku } => format!("{sku} counted"),
        ScanOutcome::DuplicatePacket => "ignored duplicate packet".to_string(),
        ScanOutcome::InvoiceScanned => "ignored invoice while packing".to_string(),
        ScanOutcome::ForeignScheme { tag } => format!("ignored {tag}: label"),
        ScanOutcome::Malformed { reason } => format!("ignored malformed scan ({reason})"),
        ScanOutcome::NotRequired { sku } => format!("ignored {sku}, not in this order"),
        ScanOutcome::AlreadyFulfilled { sku } => format!("ignored {sku}, already fulfilled"),
    }
}
