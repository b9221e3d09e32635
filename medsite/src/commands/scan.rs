//! `scan`: reports what sanitizing a document would remove, without writing.

use anyhow::{bail, Context, Result};
use is_terminal::IsTerminal;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{self, Write};

use medsite_core::SanitizeSummaryItem;

use super::Session;
use crate::cli::ScanCommand;
use crate::ui::tables;

#[derive(Debug, Serialize)]
struct ScanReport<'a> {
    source: String,
    total_findings: usize,
    findings: &'a [SanitizeSummaryItem],
}

pub fn run_scan(session: &Session, cmd: ScanCommand) -> Result<()> {
    let path = match &cmd.input_file {
        Some(path) => path.clone(),
        None => {
            // Scan the raw file rather than load(), which is already sanitized.
            // Loading once still seeds a missing file.
            session.store.load();
            session.store.content_path()
        }
    };
    let source = path.display().to_string();
    let text = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", source))?;
    let value: Value = serde_json::from_str(&text).with_context(|| format!("Failed to parse {} as JSON", source))?;

    let findings = session.store.engine().analyze(&value);
    let total: usize = findings.iter().map(|item| item.occurrences).sum();

    let mut stdout = io::stdout().lock();
    if cmd.json {
        let report = ScanReport {
            source,
            total_findings: total,
            findings: &findings,
        };
        writeln!(stdout, "{}", serde_json::to_string_pretty(&report)?)?;
    } else if findings.is_empty() {
        session.success(format!("{}: nothing to sanitize", source));
    } else {
        writeln!(stdout, "{}", tables::scan_summary_table(&findings, io::stdout().is_terminal()))?;
        session.info(format!("{}: {} finding(s)", source, total));
    }

    if let Some(threshold) = cmd.fail_over_threshold {
        if total > threshold {
            bail!("{} finding(s) exceed the threshold of {}", total, threshold);
        }
    }
    Ok(())
}
