//! Configuration management for `medsite-core`.
//!
//! This module defines the sanitize rule set and the content store settings.
//! Rules are data: the built-in set is embedded from `config/default_rules.yaml`
//! and can be extended or overridden by a user YAML file. Store settings
//! (data directory, default image, backups) load from YAML as well.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Image path substituted for any image field that fails validation.
pub const DEFAULT_IMAGE_PATH: &str = "images/placeholder.jpg";

/// A single sanitize rule. Every match of `pattern` is deleted from string values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct SanitizeRule {
    /// Unique identifier for the rule (e.g., "script_block").
    pub name: String,
    /// Human-readable description of what the rule strips.
    pub description: Option<String>,
    /// The regex pattern string.
    pub pattern: Option<String>,
    /// Match without regard to ASCII/Unicode case.
    pub case_insensitive: bool,
    /// If true, the dot character `.` in regex will match newlines.
    pub dot_matches_new_line: bool,
    /// Explicit override for enabling/disabling the rule.
    pub enabled: Option<bool>,
}

impl Default for SanitizeRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            pattern: None,
            case_insensitive: true,
            dot_matches_new_line: false,
            enabled: None,
        }
    }
}

impl SanitizeRule {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// The ordered list of sanitize rules.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct SanitizerConfig {
    pub rules: Vec<SanitizeRule>,
}

/// Per-rule tally produced when analyzing content without modifying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SanitizeSummaryItem {
    pub rule_name: String,
    pub occurrences: usize,
    pub original_texts: Vec<String>,
}

impl SanitizerConfig {
    /// Loads sanitize rules from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom sanitize rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file {}", path.display()))?;
        let config: SanitizerConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse rules file {}", path.display()))?;

        validate_rules(&config.rules)?;
        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());
        Ok(config)
    }

    /// Loads the built-in rules from the embedded configuration.
    pub fn load_default_rules() -> Result<Self> {
        debug!("Loading default sanitize rules from embedded string...");
        let default_yaml = include_str!("../config/default_rules.yaml");
        let config: SanitizerConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default rules")?;

        debug!("Loaded {} default rules.", config.rules.len());
        Ok(config)
    }

    /// Filters rules by explicit enable/disable lists. Disabling wins.
    pub fn set_active_rules(&mut self, enable_rules: &[String], disable_rules: &[String]) {
        let enable_set: HashSet<&str> = enable_rules.iter().map(String::as_str).collect();
        let disable_set: HashSet<&str> = disable_rules.iter().map(String::as_str).collect();
        let all_rule_names: HashSet<&str> = self.rules.iter().map(|r| r.name.as_str()).collect();

        for rule_name in enable_set.union(&disable_set) {
            if !all_rule_names.contains(rule_name) {
                warn!("Rule '{}' named on the command line does not exist.", rule_name);
            }
        }

        for rule in &mut self.rules {
            if disable_set.contains(rule.name.as_str()) {
                rule.enabled = Some(false);
            } else if enable_set.contains(rule.name.as_str()) {
                rule.enabled = Some(true);
            }
        }
        debug!(
            "Active rules after filtering: {}",
            self.rules.iter().filter(|r| r.is_enabled()).count()
        );
    }
}

/// Merges user rules into the defaults.
///
/// A user rule with the name of a default rule replaces it in place; new rules
/// are appended after the defaults in the order they were given.
pub fn merge_rules(default_config: SanitizerConfig, user_config: Option<SanitizerConfig>) -> SanitizerConfig {
    debug!("merge_rules called. Initial default rules count: {}", default_config.rules.len());
    let mut rules = default_config.rules;

    if let Some(user_cfg) = user_config {
        debug!("User config provided. Merging {} user rules.", user_cfg.rules.len());
        let positions: HashMap<String, usize> = rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (rule.name.clone(), i))
            .collect();

        for user_rule in user_cfg.rules {
            match positions.get(&user_rule.name) {
                Some(&i) => rules[i] = user_rule,
                None => rules.push(user_rule),
            }
        }
    }

    debug!("Final total rules after merge: {}", rules.len());
    SanitizerConfig { rules }
}

/// Validates rule integrity: names, pattern presence, length and compilation.
///
/// Patterns that match the empty string are refused, since deleting an empty
/// match never makes progress.
fn validate_rules(rules: &[SanitizeRule]) -> Result<()> {
    let mut rule_names = HashSet::new();
    let mut errors = Vec::new();

    for rule in rules {
        if rule.name.is_empty() {
            errors.push("A rule has an empty `name` field.".to_string());
        } else if !rule_names.insert(rule.name.as_str()) {
            errors.push(format!("Duplicate rule name found: '{}'.", rule.name));
        }

        let Some(pattern) = &rule.pattern else {
            errors.push(format!("Rule '{}' is missing the `pattern` field.", rule.name));
            continue;
        };

        if pattern.is_empty() {
            errors.push(format!("Rule '{}' has an empty `pattern` field.", rule.name));
            continue;
        }

        if pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(format!(
                "Rule '{}': pattern length ({}) exceeds maximum allowed ({}).",
                rule.name,
                pattern.len(),
                MAX_PATTERN_LENGTH
            ));
            continue;
        }

        match RegexBuilder::new(pattern)
            .case_insensitive(rule.case_insensitive)
            .dot_matches_new_line(rule.dot_matches_new_line)
            .build()
        {
            Ok(regex) if regex.is_match("") => {
                errors.push(format!("Rule '{}' matches the empty string.", rule.name));
            }
            Ok(_) => {}
            Err(e) => {
                errors.push(format!("Rule '{}' has an invalid regex pattern: {}", rule.name, e));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("Rule validation failed:\n{}", errors.join("\n")))
    }
}

/// Backup behaviour of the content store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Snapshot the current document before every successful save.
    pub enabled: bool,
    /// Backup directory. Relative paths resolve against the data directory.
    pub dir: Option<PathBuf>,
    /// Number of snapshots to retain; 0 keeps everything.
    pub keep: usize,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
            keep: 10,
        }
    }
}

/// Settings for a [`crate::store::ContentStore`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub content_file: String,
    pub default_image: String,
    pub backups: BackupConfig,
    /// Optional YAML file with user sanitize rules merged over the defaults.
    pub rules_file: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            content_file: "content.json".to_string(),
            default_image: DEFAULT_IMAGE_PATH.to_string(),
            backups: BackupConfig::default(),
            rules_file: None,
        }
    }
}

impl StoreConfig {
    /// Default settings rooted at `data_dir`.
    pub fn with_data_dir<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Loads store settings from a YAML file. Missing keys take their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading store configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: StoreConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn content_path(&self) -> PathBuf {
        self.data_dir.join(&self.content_file)
    }

    pub fn backup_dir(&self) -> PathBuf {
        match &self.backups.dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => self.data_dir.join(dir),
            None => self.data_dir.join("backups"),
        }
    }

    /// The default rules, merged with `rules_file` when one is configured.
    pub fn sanitizer_config(&self) -> Result<SanitizerConfig> {
        let defaults = SanitizerConfig::load_default_rules()?;
        let user = match &self.rules_file {
            Some(path) => Some(SanitizerConfig::load_from_file(path)?),
            None => None,
        };
        Ok(merge_rules(defaults, user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, pattern: &str) -> SanitizeRule {
        SanitizeRule {
            name: name.to_string(),
            pattern: Some(pattern.to_string()),
            ..SanitizeRule::default()
        }
    }

    #[test]
    fn default_rules_are_valid_and_ordered() {
        let config = SanitizerConfig::load_default_rules().unwrap();
        validate_rules(&config.rules).unwrap();
        let names: Vec<&str> = config.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "script_block",
                "javascript_uri",
                "event_handler",
                "iframe_block",
                "object_block",
                "embed_block",
                "eval_call",
                "css_expression",
            ]
        );
        assert!(config.rules.iter().all(|r| r.case_insensitive && r.is_enabled()));
    }

    #[test]
    fn merge_replaces_in_place_and_appends() {
        let defaults = SanitizerConfig {
            rules: vec![rule("a", "aaa"), rule("b", "bbb")],
        };
        let user = SanitizerConfig {
            rules: vec![rule("c", "ccc"), rule("a", "xxx")],
        };
        let merged = merge_rules(defaults, Some(user));
        let names: Vec<&str> = merged.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(merged.rules[0].pattern.as_deref(), Some("xxx"));
    }

    #[test]
    fn validation_rejects_empty_matching_and_duplicate_rules() {
        let err = validate_rules(&[rule("a", "x*"), rule("b", "y"), rule("b", "z")]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'a' matches the empty string"));
        assert!(message.contains("Duplicate rule name found: 'b'"));
    }

    #[test]
    fn validation_rejects_overlong_pattern() {
        let long = "a".repeat(MAX_PATTERN_LENGTH + 1);
        assert!(validate_rules(&[rule("long", &long)]).is_err());
    }

    #[test]
    fn set_active_rules_disables_by_name() {
        let mut config = SanitizerConfig::load_default_rules().unwrap();
        config.set_active_rules(&[], &["eval_call".to_string()]);
        let eval = config.rules.iter().find(|r| r.name == "eval_call").unwrap();
        assert!(!eval.is_enabled());
    }

    #[test]
    fn backup_dir_resolves_against_data_dir() {
        let mut config = StoreConfig::with_data_dir("/srv/site");
        assert_eq!(config.backup_dir(), PathBuf::from("/srv/site/backups"));
        config.backups.dir = Some(PathBuf::from("snapshots"));
        assert_eq!(config.backup_dir(), PathBuf::from("/srv/site/snapshots"));
        assert_eq!(config.content_path(), PathBuf::from("/srv/site/content.json"));
    }
}
