// medsite/src/cli.rs
//! This file defines the command-line interface (CLI) for the medsite
//! application, including all available commands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "medsite",
    version = env!("CARGO_PKG_VERSION"),
    about = "Inspect and edit the practice website's content store",
    long_about = "medsite works directly on the JSON content document that the admin panel edits and the public content API serves. Every write goes through the same sanitize and validate pipeline as the admin panel.",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Directory holding content.json and its backups.
    #[arg(long = "data-dir", value_name = "DIR", env = "MEDSITE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Store configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", env = "MEDSITE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Suppress all informational and debug messages.
    #[arg(long, short = 'q', global = true, conflicts_with = "debug")]
    pub quiet: bool,

    /// Enable debug logging for the medsite crates.
    #[arg(long, short = 'd', global = true)]
    pub debug: bool,
}

/// All available commands for the `medsite` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the current (sanitized) content document.
    Show(ShowCommand),

    /// Update fields using admin form keys, e.g. `intro_title="Welcome"`.
    Set(SetCommand),

    /// Save a JSON document, merged into the current one or replacing it.
    Import(ImportCommand),

    /// Report what the sanitizer would strip from a JSON document.
    Scan(ScanCommand),

    /// Create, list and restore content backups.
    #[command(subcommand)]
    Backup(BackupCommand),
}

/// Arguments for the `show` command.
#[derive(Parser, Debug)]
pub struct ShowCommand {
    /// Print only this section.
    #[arg(long, short = 's', value_name = "NAME")]
    pub section: Option<String>,
}

/// Arguments for the `set` command.
#[derive(Parser, Debug)]
pub struct SetCommand {
    /// Form fields as `section_field=value`.
    #[arg(value_name = "KEY=VALUE", value_parser = parse_key_val, required_unless_present = "images")]
    pub fields: Vec<(String, String)>,

    /// Stored image paths as `section_field=images/...`, applied after the fields.
    #[arg(long = "image", value_name = "KEY=PATH", value_parser = parse_key_val)]
    pub images: Vec<(String, String)>,
}

/// Arguments for the `import` command.
#[derive(Parser, Debug)]
pub struct ImportCommand {
    /// JSON file with a partial or complete content document.
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input_file: PathBuf,

    /// Replace the whole document instead of merging section by section.
    #[arg(long)]
    pub replace: bool,
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// JSON file to scan (scans the stored document if not provided).
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input_file: Option<PathBuf>,

    /// Print the findings as JSON to stdout instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Exit with a non-zero code if the number of findings exceeds this threshold.
    #[arg(long = "fail-over-threshold", value_name = "N")]
    pub fail_over_threshold: Option<usize>,
}

/// Backup subcommands.
#[derive(Subcommand, Debug)]
pub enum BackupCommand {
    /// Snapshot the current document.
    Create,
    /// List snapshots, newest first.
    List,
    /// Restore a snapshot by name (as shown by `backup list`).
    Restore {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

/// Parses `key=value`, splitting at the first `=`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}
