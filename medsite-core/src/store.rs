//! store.rs - The content store: sole reader and writer of `content.json`.
//!
//! Every document handed out is sanitized, and every document written has
//! been merged, sanitized and validated first. Writes go to a temporary file
//! next to the target and are renamed over it, so a failed save never leaves
//! a partial file behind. Nothing is cached between calls; each load re-reads
//! the file.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, error, info, warn};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tempfile::NamedTempFile;

use crate::backup::{self, BackupEntry};
use crate::config::StoreConfig;
use crate::document::{default_document, ContentDocument, MergeStrategy};
use crate::engine::SanitizationEngine;
use crate::engines::regex_engine::RegexEngine;
use crate::errors::ContentError;

/// Lifecycle of the backing file as seen by this store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// No backing file exists yet.
    Uninitialized,
    /// The default document was written because no file existed.
    DefaultSeeded,
    /// A save has succeeded, or the file predates this store.
    Persisted,
}

/// What a successful save did besides writing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Dotted paths of image fields reset to the default image.
    pub corrected_images: Vec<String>,
    /// Snapshot taken of the previous document, if backups are enabled.
    pub backup: Option<BackupEntry>,
}

pub struct ContentStore {
    config: StoreConfig,
    engine: Box<dyn SanitizationEngine>,
    state: RwLock<StoreState>,
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

impl ContentStore {
    /// Builds a store with a regex engine from the configured rules.
    pub fn new(config: StoreConfig) -> Result<Self, ContentError> {
        let engine = RegexEngine::new(config.sanitizer_config()?)?;
        Ok(Self::with_engine(config, Box::new(engine)))
    }

    pub fn with_engine(config: StoreConfig, engine: Box<dyn SanitizationEngine>) -> Self {
        let initial = if config.content_path().exists() {
            StoreState::Persisted
        } else {
            StoreState::Uninitialized
        };
        Self {
            config,
            engine,
            state: RwLock::new(initial),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn engine(&self) -> &dyn SanitizationEngine {
        self.engine.as_ref()
    }

    pub fn content_path(&self) -> PathBuf {
        self.config.content_path()
    }

    pub fn state(&self) -> StoreState {
        *self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_state(&self, state: StoreState) {
        *self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
    }

    /// The current document, sanitized. Falls back to the default document on
    /// any read or parse failure.
    pub fn load(&self) -> ContentDocument {
        match self.try_load() {
            Ok(document) => document,
            Err(e) => {
                warn!(
                    "Could not load {}: {}. Serving the default document.",
                    self.content_path().display(),
                    e
                );
                default_document()
            }
        }
    }

    /// Like [`load`](Self::load), but reports failures instead of falling back.
    pub fn try_load(&self) -> Result<ContentDocument, ContentError> {
        self.ensure_seeded()?;
        let path = self.content_path();
        let text = fs::read_to_string(&path)?;
        let parsed: Value = serde_json::from_str(&text)?;
        ContentDocument::from_value(self.engine.deep_sanitize(&parsed))
    }

    /// Merges a partial (or full) document into the stored one. Returns
    /// `false` without writing when validation or the write fails.
    pub fn save(&self, update: &Value) -> bool {
        self.report(self.try_save(update))
    }

    /// Replaces the stored document wholesale, with the same checks as [`save`](Self::save).
    pub fn replace(&self, document: &Value) -> bool {
        self.report(self.try_replace(document))
    }

    pub fn try_save(&self, update: &Value) -> Result<SaveReport, ContentError> {
        self.write_with(update, MergeStrategy::SectionShallow)
    }

    pub fn try_replace(&self, document: &Value) -> Result<SaveReport, ContentError> {
        self.write_with(document, MergeStrategy::Replace)
    }

    fn report(&self, result: Result<SaveReport, ContentError>) -> bool {
        match result {
            Ok(_) => true,
            Err(e) if e.is_rejection() => {
                warn!("Content update rejected: {}", e);
                false
            }
            Err(e) => {
                error!("Failed to save {}: {}", self.content_path().display(), e);
                false
            }
        }
    }

    fn write_with(&self, incoming: &Value, strategy: MergeStrategy) -> Result<SaveReport, ContentError> {
        self.ensure_seeded()?;

        let update = ContentDocument::from_value(self.engine.deep_sanitize(incoming))?;
        let mut merged = match strategy {
            MergeStrategy::Replace => ContentDocument::default(),
            MergeStrategy::SectionShallow => self.load(),
        };
        merged.apply(update, strategy);

        let mut document = ContentDocument::from_value(self.engine.deep_sanitize(&merged.into_value()))?;
        let corrected_images = document.validate(&self.config.default_image)?;
        let missing = document.missing_sections();
        if !missing.is_empty() {
            debug!("Saving document without section(s): {}", missing.join(", "));
        }
        let body = document.to_pretty_json()?;

        let backup = self.backup_before_write();
        write_atomically(&self.content_path(), body.as_bytes())?;
        self.set_state(StoreState::Persisted);
        info!(
            "Saved {} ({} image field(s) corrected).",
            self.content_path().display(),
            corrected_images.len()
        );

        Ok(SaveReport {
            corrected_images,
            backup,
        })
    }

    /// Snapshot failures never block a save; they are logged.
    fn backup_before_write(&self) -> Option<BackupEntry> {
        if !self.config.backups.enabled {
            return None;
        }
        let dir = self.config.backup_dir();
        let entry = match backup::snapshot(&self.content_path(), &dir) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Could not back up {} before saving: {}", self.content_path().display(), e);
                return None;
            }
        };
        if let Err(e) = backup::prune(&dir, self.config.backups.keep) {
            warn!("Could not prune backups in {}: {}", dir.display(), e);
        }
        Some(entry)
    }

    /// Writes the default document if the backing file does not exist yet.
    fn ensure_seeded(&self) -> Result<(), ContentError> {
        let path = self.content_path();
        if path.exists() {
            return Ok(());
        }
        info!("No content file at {}; seeding the default document.", path.display());
        let body = default_document().to_pretty_json()?;
        write_atomically(&path, body.as_bytes())?;
        self.set_state(StoreState::DefaultSeeded);
        Ok(())
    }

    /// Takes a snapshot of the current document on demand.
    pub fn create_backup(&self) -> Result<BackupEntry, ContentError> {
        self.ensure_seeded()?;
        let dir = self.config.backup_dir();
        let entry = backup::snapshot(&self.content_path(), &dir)?;
        backup::prune(&dir, self.config.backups.keep)?;
        Ok(entry)
    }

    pub fn list_backups(&self) -> Result<Vec<BackupEntry>, ContentError> {
        backup::list(&self.config.backup_dir())
    }

    /// Replaces the document with a snapshot, through the full sanitize and
    /// validate pipeline. The document being replaced is itself backed up.
    pub fn restore_backup(&self, name: &str) -> Result<SaveReport, ContentError> {
        let path = backup::resolve(&self.config.backup_dir(), name)?;
        let text = fs::read_to_string(&path)?;
        let snapshot: Value = serde_json::from_str(&text)?;
        info!("Restoring content from backup {}.", name);
        self.try_replace(&snapshot)
    }
}

/// Writes `bytes` to a uniquely named sibling temp file and renames it over
/// `path`. Concurrent writers never share a temp file; the last rename wins.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), ContentError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    // Dropping the temp file on an early return removes it.
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ContentError::IoError(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn state_machine_follows_saves() {
        let dir = tempdir().unwrap();
        let store = ContentStore::new(StoreConfig::with_data_dir(dir.path())).unwrap();
        assert_eq!(store.state(), StoreState::Uninitialized);

        store.load();
        assert_eq!(store.state(), StoreState::DefaultSeeded);

        assert!(!store.save(&json!({ "contact": { "email": "nope" } })));
        assert_eq!(store.state(), StoreState::DefaultSeeded);

        assert!(store.save(&json!({ "intro": { "title": "Neu" } })));
        assert_eq!(store.state(), StoreState::Persisted);
    }

    #[test]
    fn non_object_update_is_rejected() {
        let dir = tempdir().unwrap();
        let store = ContentStore::new(StoreConfig::with_data_dir(dir.path())).unwrap();
        assert!(matches!(store.try_save(&json!("text")), Err(ContentError::NotAnObject(_))));
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("content.json");
        write_atomically(&path, b"{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
        let names: Vec<_> = fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["content.json"]);
    }
}
