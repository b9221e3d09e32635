//! `show`, `set` and `import`: the read route and the save route.

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::io::{self, Write};

use medsite_core::{ContentError, FormSubmission, SaveReport, UploadedImage};

use super::Session;
use crate::cli::{ImportCommand, SetCommand, ShowCommand};

pub fn run_show(session: &Session, cmd: ShowCommand) -> Result<()> {
    let document = session.store.load();
    let value = match &cmd.section {
        Some(name) => match document.as_map().get(name) {
            Some(section) => section.clone(),
            None => bail!("Section '{}' does not exist", name),
        },
        None => document.into_value(),
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(&value)?)?;
    Ok(())
}

pub fn run_set(session: &Session, cmd: SetCommand) -> Result<()> {
    let mut form = FormSubmission::from_pairs(cmd.fields);
    for (field_key, stored_path) in cmd.images {
        form = form.with_image(UploadedImage { field_key, stored_path });
    }
    let update = form.into_update();
    debug!("Form translated to update: {}", update);
    if update.as_object().is_some_and(|fields| fields.is_empty()) {
        bail!("Nothing to save: every field was blank or lacked a section prefix");
    }
    let report = session.store.try_save(&update).map_err(describe)?;
    finish(session, report);
    Ok(())
}

pub fn run_import(session: &Session, cmd: ImportCommand) -> Result<()> {
    let path = &cmd.input_file;
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let document: Value =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse {} as JSON", path.display()))?;

    info!("Importing {} (replace: {}).", path.display(), cmd.replace);
    let result = if cmd.replace {
        session.store.try_replace(&document)
    } else {
        session.store.try_save(&document)
    };
    finish(session, result.map_err(describe)?);
    Ok(())
}

fn describe(e: ContentError) -> anyhow::Error {
    if e.is_rejection() {
        anyhow::Error::new(e).context("Content update rejected")
    } else {
        anyhow::Error::new(e).context("Failed to save content")
    }
}

fn finish(session: &Session, report: SaveReport) {
    for path in &report.corrected_images {
        session.warn(format!(
            "'{}' was not an images/ path or http(s) URL and was reset to '{}'",
            path,
            session.store.config().default_image
        ));
    }
    if let Some(backup) = &report.backup {
        session.info(format!("Previous content backed up as {}", backup.name));
    }
    session.success(format!("Saved {}", session.store.content_path().display()));
}
