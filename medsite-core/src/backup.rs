//! backup.rs - Timestamped snapshots of the content file.
//!
//! Snapshots are plain copies named `content-<UTC timestamp>.json`, with a
//! `-<n>` suffix when two land in the same millisecond. Listing is newest
//! first; pruning keeps the newest `keep` snapshots.
//!
//! License: MIT OR APACHE 2.0

use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, info};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ContentError;

const BACKUP_PREFIX: &str = "content-";
const BACKUP_EXTENSION: &str = ".json";
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.3fZ";
const TIMESTAMP_LEN: usize = 20;

/// One snapshot on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupEntry {
    pub name: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size: u64,
    #[serde(skip)]
    sequence: u32,
}

fn parse_name(name: &str) -> Option<(DateTime<Utc>, u32)> {
    let stem = name.strip_prefix(BACKUP_PREFIX)?.strip_suffix(BACKUP_EXTENSION)?;
    let timestamp = stem.get(..TIMESTAMP_LEN)?;
    let created_at = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?.and_utc();
    let sequence = match &stem[TIMESTAMP_LEN..] {
        "" => 0,
        rest => rest.strip_prefix('-')?.parse().ok()?,
    };
    Some((created_at, sequence))
}

fn entry_for(path: PathBuf) -> Option<BackupEntry> {
    let name = path.file_name()?.to_str()?.to_string();
    let (created_at, sequence) = parse_name(&name)?;
    let size = fs::metadata(&path).ok()?.len();
    Some(BackupEntry {
        name,
        path,
        created_at,
        size,
        sequence,
    })
}

/// Copies `content_path` into `backup_dir` under a fresh timestamped name.
pub fn snapshot(content_path: &Path, backup_dir: &Path) -> Result<BackupEntry, ContentError> {
    fs::create_dir_all(backup_dir)?;
    let timestamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();
    let same_instant = format!("{}{}", BACKUP_PREFIX, timestamp);

    // Numbering continues past the highest snapshot of this instant, even if
    // lower numbers were pruned, so names keep sorting in creation order.
    let sequence = list(backup_dir)?
        .iter()
        .filter(|entry| entry.name.starts_with(&same_instant))
        .map(|entry| entry.sequence + 1)
        .max()
        .unwrap_or(0);
    let name = match sequence {
        0 => format!("{}{}", same_instant, BACKUP_EXTENSION),
        n => format!("{}-{}{}", same_instant, n, BACKUP_EXTENSION),
    };
    let path = backup_dir.join(name);

    fs::copy(content_path, &path)?;
    let entry = entry_for(path.clone())
        .ok_or_else(|| ContentError::Fatal(format!("Backup {} was not readable after writing", path.display())))?;
    info!("Created content backup {}.", entry.name);
    Ok(entry)
}

/// All snapshots in `backup_dir`, newest first. A missing directory is empty.
pub fn list(backup_dir: &Path) -> Result<Vec<BackupEntry>, ContentError> {
    if !backup_dir.exists() {
        return Ok(Vec::new());
    }
    let mut entries: Vec<BackupEntry> = fs::read_dir(backup_dir)?
        .filter_map(|dir_entry| dir_entry.ok())
        .filter_map(|dir_entry| entry_for(dir_entry.path()))
        .collect();
    entries.sort_by(|a, b| (b.created_at, b.sequence).cmp(&(a.created_at, a.sequence)));
    Ok(entries)
}

/// Deletes all but the newest `keep` snapshots. `keep == 0` disables pruning.
pub fn prune(backup_dir: &Path, keep: usize) -> Result<usize, ContentError> {
    if keep == 0 {
        return Ok(0);
    }
    let mut removed = 0;
    for entry in list(backup_dir)?.into_iter().skip(keep) {
        fs::remove_file(&entry.path)?;
        debug!("Pruned content backup {}.", entry.name);
        removed += 1;
    }
    Ok(removed)
}

/// Resolves a snapshot name from [`list`] to its path.
pub fn resolve(backup_dir: &Path, name: &str) -> Result<PathBuf, ContentError> {
    let plain = !name.contains(['/', '\\']) && name != "." && name != "..";
    if plain && parse_name(name).is_some() {
        let path = backup_dir.join(name);
        if path.is_file() {
            return Ok(path);
        }
    }
    Err(ContentError::UnknownBackup(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn names_round_trip_through_the_parser() {
        let (at, seq) = parse_name("content-20261019T101112.345Z.json").unwrap();
        assert_eq!(at.format(TIMESTAMP_FORMAT).to_string(), "20261019T101112.345Z");
        assert_eq!(seq, 0);
        assert_eq!(parse_name("content-20261019T101112.345Z-2.json").unwrap().1, 2);
        assert!(parse_name("content.json").is_none());
        assert!(parse_name("content-20261019T101112.345Z-x.json").is_none());
    }

    #[test]
    fn snapshots_list_newest_first_and_prune() {
        let dir = tempdir().unwrap();
        let content = dir.path().join("content.json");
        let backups = dir.path().join("backups");

        for i in 0..4 {
            fs::write(&content, format!("{{\"n\":{}}}", i)).unwrap();
            snapshot(&content, &backups).unwrap();
        }
        fs::write(backups.join("notes.txt"), "ignored").unwrap();

        let entries = list(&backups).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(fs::read_to_string(&entries[0].path).unwrap(), "{\"n\":3}");

        assert_eq!(prune(&backups, 2).unwrap(), 2);
        let remaining = list(&backups).unwrap();
        assert_eq!(remaining.len(), 2);
        assert_eq!(fs::read_to_string(&remaining[1].path).unwrap(), "{\"n\":2}");
    }

    #[test]
    fn resolve_refuses_paths() {
        let dir = tempdir().unwrap();
        assert!(matches!(resolve(dir.path(), "../content.json"), Err(ContentError::UnknownBackup(_))));
        assert!(resolve(dir.path(), "content-20261019T101112.345Z.json").is_err());
    }
}
