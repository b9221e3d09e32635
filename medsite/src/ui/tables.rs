//! Table rendering for scan findings and backup listings.

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use medsite_core::{BackupEntry, SanitizeSummaryItem};

/// Distinct sample texts shown per rule.
const MAX_SAMPLES: usize = 3;

fn base_table(headers: &[&str], supports_color: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if !supports_color {
        table.force_no_tty();
    }
    table.set_header(headers.iter().map(|h| Cell::new(*h)));
    table
}

fn samples(texts: &[String]) -> String {
    let mut unique: Vec<&str> = Vec::new();
    for text in texts {
        if !unique.contains(&text.as_str()) {
            unique.push(text);
        }
    }
    let mut out = unique
        .iter()
        .take(MAX_SAMPLES)
        .map(|s| format!("{:?}", s))
        .collect::<Vec<_>>()
        .join(", ");
    if unique.len() > MAX_SAMPLES {
        out.push_str(&format!(" (+{} more)", unique.len() - MAX_SAMPLES));
    }
    out
}

pub fn scan_summary_table(summary: &[SanitizeSummaryItem], supports_color: bool) -> Table {
    let mut table = base_table(&["Rule", "Occurrences", "Samples"], supports_color);
    for item in summary {
        table.add_row(vec![
            Cell::new(&item.rule_name).fg(Color::Magenta),
            Cell::new(item.occurrences).fg(Color::Yellow),
            Cell::new(samples(&item.original_texts)),
        ]);
    }
    table
}

pub fn backups_table(entries: &[BackupEntry], supports_color: bool) -> Table {
    let mut table = base_table(&["Name", "Created (UTC)", "Size"], supports_color);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.name),
            Cell::new(entry.created_at.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(format!("{} B", entry.size)),
        ]);
    }
    table
}
