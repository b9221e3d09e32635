//! compiler.rs - Manages the compilation and caching of sanitize rules.
//!
//! This module provides a thread-safe, cached mechanism to convert a
//! `SanitizerConfig` into `CompiledRules`. Rule order is part of the cache
//! key, since rules are applied in sequence.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::config::{SanitizeRule, SanitizerConfig, MAX_PATTERN_LENGTH};
use crate::errors::ContentError;

/// A single compiled sanitize rule.
#[derive(Debug)]
pub struct CompiledRule {
    /// The compiled regular expression whose matches are deleted.
    pub regex: Regex,
    /// The unique name of the rule.
    pub name: String,
}

/// The enabled rules of a configuration, compiled and in application order.
#[derive(Debug)]
pub struct CompiledRules {
    pub rules: Vec<CompiledRule>,
}

lazy_static! {
    /// Compiled rule sets keyed by a hash of the rule list.
    static ref COMPILED_RULES_CACHE: RwLock<HashMap<u64, Arc<CompiledRules>>> = RwLock::new(HashMap::new());
}

fn hash_config(config: &SanitizerConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.rules.hash(&mut hasher);
    hasher.finish()
}

/// Compiles the enabled rules, in order. Disabled rules and rules without a
/// pattern are skipped; any compilation failure fails the whole set.
pub fn compile_rules(rules_to_compile: &[SanitizeRule]) -> Result<CompiledRules, ContentError> {
    debug!("Starting compilation of {} rules.", rules_to_compile.len());

    let mut compiled_rules = Vec::new();
    let mut compilation_errors = Vec::new();

    for rule in rules_to_compile {
        if !rule.is_enabled() {
            debug!("Skipping disabled rule '{}'.", rule.name);
            continue;
        }
        let Some(pattern) = rule.pattern.as_ref() else {
            warn!("Skipping rule '{}' because its pattern is missing.", rule.name);
            continue;
        };

        if pattern.len() > MAX_PATTERN_LENGTH {
            compilation_errors.push(ContentError::PatternLengthExceeded(
                rule.name.clone(),
                pattern.len(),
                MAX_PATTERN_LENGTH,
            ));
            continue;
        }

        let regex_result = RegexBuilder::new(pattern)
            .case_insensitive(rule.case_insensitive)
            .dot_matches_new_line(rule.dot_matches_new_line)
            .size_limit(10 * (1 << 20))
            .build();

        match regex_result {
            Ok(regex) => {
                log::debug!(
                    target: "medsite_core::sanitizer",
                    "Rule '{}' compiled successfully.",
                    rule.name
                );
                compiled_rules.push(CompiledRule {
                    regex,
                    name: rule.name.clone(),
                });
            }
            Err(e) => compilation_errors.push(ContentError::RuleCompilationError(rule.name.clone(), e)),
        }
    }

    if !compilation_errors.is_empty() {
        let error_message = compilation_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        return Err(ContentError::Fatal(format!(
            "Failed to compile {} rule(s):\n{}",
            compilation_errors.len(),
            error_message
        )));
    }

    debug!("Finished compiling rules. Total compiled: {}.", compiled_rules.len());
    Ok(CompiledRules { rules: compiled_rules })
}

/// Gets a `CompiledRules` instance from the cache or compiles it if not found.
pub fn get_or_compile_rules(config: &SanitizerConfig) -> Result<Arc<CompiledRules>, ContentError> {
    let cache_key = hash_config(config);

    {
        let cache = COMPILED_RULES_CACHE.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(rules) = cache.get(&cache_key) {
            debug!("Serving compiled rules from cache for key: {}", cache_key);
            return Ok(Arc::clone(rules));
        }
    }

    debug!("Compiled rules not found in cache. Compiling now.");
    let compiled = Arc::new(compile_rules(&config.rules)?);

    COMPILED_RULES_CACHE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .insert(cache_key, Arc::clone(&compiled));

    debug!("Successfully compiled and cached rules for key: {}", cache_key);
    Ok(compiled)
}
