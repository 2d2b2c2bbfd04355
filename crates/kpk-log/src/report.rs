//! # CSV Scan Report
//!
//! ```text
//! timestamp_ms,order_id,event,sku,raw
//! 1767225600000,"ORD1","invoice_scanned","","PKG1:eyJv..."
//! 1767225601250,"ORD1","packet_scanned","A","PKT1:eyJz..."
//! ```
//!
//! UTF-8, one line per entry, `\n` line endings. `timestamp_ms` is a bare
//! integer; every string column is wrapped in double quotes with inner
//! quotes doubled, and an absent `sku`/`raw` is written as `""`.

use std::io::{self, Write};

use crate::entry::ScanLogEntry;

/// The report's header line, without terminator.
pub const CSV_HEADER: &str = "timestamp_ms,order_id,event,sku,raw";

/// File name suggested when saving a report.
pub const DEFAULT_REPORT_NAME: &str = "scan_report.csv";

/// Render `entries` as a complete report.
pub fn render_csv(entries: &[ScanLogEntry]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + entries.len() * 96);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for entry in entries {
        push_row(&mut out, entry);
    }
    out
}

/// Stream `entries` as a complete report to `out`.
pub fn write_csv<W: Write>(entries: &[ScanLogEntry], mut out: W) -> io::Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    let mut row = String::new();
    for entry in entries {
        row.clear();
        push_row(&mut row, entry);
        out.write_all(row.as_bytes())?;
    }
    out.flush()
}

fn push_row(out: &mut String, entry: &ScanLogEntry) {
    out.push_str(&entry.timestamp.epoch_millis().to_string());
    out.push(',');
    push_quoted(out, entry.order_id.as_str());
    out.push(',');
    push_quoted(out, entry.event.as_str());
    out.push(',');
    push_quoted(out, entry.sku.as_ref().map_or("", |s| s.as_str()));
    out.push(',');
    push_quoted(out, entry.raw.as_deref().unwrap_or(""));
    out.push('\n');
}

fn push_quoted(out: &mut String, field: &str) {
    out.push('"');
    for c in field.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
}
