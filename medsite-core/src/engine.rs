// medsite-core/src/engine.rs
//! Defines the core SanitizationEngine trait.
//!
//! An engine knows how to clean a single string. The recursive walk over
//! nested content (sequences, mappings, leaves) and the key whitelist are
//! provided here as default methods, so every engine gets the same structural
//! guarantees: the walk never fails and never changes a value's shape.
//!
//! License: MIT OR APACHE 2.0

use serde_json::{Map, Value};

use crate::config::{SanitizeSummaryItem, SanitizerConfig};
use crate::sanitizers::compiler::CompiledRules;
use crate::validators;

/// Pluggable string sanitization plus the shared structural walk.
pub trait SanitizationEngine: Send + Sync {
    /// Removes every dangerous pattern from `input`. Must be total and idempotent.
    fn sanitize_str(&self, input: &str) -> String;

    /// Reports what sanitizing `value` would remove, without modifying it.
    fn analyze(&self, value: &Value) -> Vec<SanitizeSummaryItem>;

    /// Returns a reference to the `CompiledRules` used by the engine.
    fn compiled_rules(&self) -> &CompiledRules;

    /// Returns a reference to the engine's configuration.
    fn get_rules(&self) -> &SanitizerConfig;

    /// Filters a mapping key through the `[a-zA-Z0-9_.-]` whitelist.
    fn sanitize_key(&self, key: &str) -> String {
        validators::sanitize_key(key)
    }

    /// Sanitizes a leaf. Strings are cleaned; numbers, booleans and null pass through.
    fn sanitize_value(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.sanitize_str(s)),
            other => other.clone(),
        }
    }

    /// Recursively sanitizes keys and string leaves.
    ///
    /// When two keys of one mapping collapse to the same sanitized key, the
    /// one visited last wins.
    fn deep_sanitize(&self, value: &Value) -> Value {
        match value {
            Value::Array(items) => Value::Array(items.iter().map(|item| self.deep_sanitize(item)).collect()),
            Value::Object(map) => {
                let mut cleaned = Map::with_capacity(map.len());
                for (key, item) in map {
                    cleaned.insert(self.sanitize_key(key), self.deep_sanitize(item));
                }
                Value::Object(cleaned)
            }
            leaf => self.sanitize_value(leaf),
        }
    }
}
