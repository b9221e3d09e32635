// medsite/src/commands/mod.rs
//! Subcommand implementations. Each one is an external caller of the content
//! store, doing what the corresponding admin route would do.

pub mod backup;
pub mod content;
pub mod scan;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use std::io;

use medsite_core::{ContentStore, StoreConfig};

use crate::cli::{Commands, GlobalArgs};
use crate::ui::output_format;
use crate::ui::theme::{default_theme_map, ThemeMap};

/// Shared state for one CLI invocation.
pub struct Session {
    pub store: ContentStore,
    pub theme: ThemeMap,
    pub quiet: bool,
}

impl Session {
    pub fn info(&self, message: impl AsRef<str>) {
        if !self.quiet {
            let color = io::stderr().is_terminal();
            let _ = output_format::print_info_message(&mut io::stderr(), message.as_ref(), &self.theme, color);
        }
    }

    pub fn success(&self, message: impl AsRef<str>) {
        if !self.quiet {
            let color = io::stderr().is_terminal();
            let _ = output_format::print_success_message(&mut io::stderr(), message.as_ref(), &self.theme, color);
        }
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        let color = io::stderr().is_terminal();
        let _ = output_format::print_warn_message(&mut io::stderr(), message.as_ref(), &self.theme, color);
    }
}

/// Resolves the store configuration: the config file if given, then `--data-dir`.
pub fn resolve_config(global: &GlobalArgs) -> Result<StoreConfig> {
    let mut config = match &global.config {
        Some(path) => StoreConfig::load_from_file(path)?,
        None => StoreConfig::default(),
    };
    if let Some(dir) = &global.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

/// Opens the store and dispatches to the chosen subcommand.
pub fn run(global: &GlobalArgs, command: Commands) -> Result<()> {
    let config = resolve_config(global)?;
    let store = ContentStore::new(config).context("Failed to open the content store")?;
    let session = Session {
        store,
        theme: default_theme_map(),
        quiet: global.quiet,
    };

    match command {
        Commands::Show(cmd) => content::run_show(&session, cmd),
        Commands::Set(cmd) => content::run_set(&session, cmd),
        Commands::Import(cmd) => content::run_import(&session, cmd),
        Commands::Scan(cmd) => scan::run_scan(&session, cmd),
        Commands::Backup(cmd) => backup::run_backup(&session, cmd),
    }
}
