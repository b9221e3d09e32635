//! `backup create|list|restore`.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use std::io::{self, Write};

use super::Session;
use crate::cli::BackupCommand;
use crate::ui::tables;

pub fn run_backup(session: &Session, cmd: BackupCommand) -> Result<()> {
    match cmd {
        BackupCommand::Create => {
            let entry = session.store.create_backup().context("Failed to create backup")?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", entry.name)?;
            session.success(format!("Backup written to {}", entry.path.display()));
        }
        BackupCommand::List => {
            let entries = session.store.list_backups().context("Failed to list backups")?;
            if entries.is_empty() {
                session.info(format!("No backups in {}", session.store.config().backup_dir().display()));
            } else {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", tables::backups_table(&entries, io::stdout().is_terminal()))?;
            }
        }
        BackupCommand::Restore { name } => {
            let report = session
                .store
                .restore_backup(&name)
                .with_context(|| format!("Failed to restore backup '{}'", name))?;
            for path in &report.corrected_images {
                session.warn(format!("'{}' was reset to the default image", path));
            }
            session.success(format!("Restored {}", name));
        }
    }
    Ok(())
}
