// medsite-core/src/engines/regex_engine.rs
//! A `SanitizationEngine` that deletes every match of an ordered list of
//! regular expressions from string values.
//!
//! A single pass over the rules can splice a new dangerous token together out
//! of the text around a deleted match (`javajavascript:script:`), so passes
//! repeat until the string stops shrinking. Every rule only deletes, hence the
//! loop terminates and the result is a fixpoint of the rule set.
//!
//! License: MIT OR APACHE 2.0

use std::sync::Arc;

use log::trace;
use serde_json::Value;

use crate::config::{SanitizeSummaryItem, SanitizerConfig};
use crate::engine::SanitizationEngine;
use crate::errors::ContentError;
use crate::sanitizers::compiler::{get_or_compile_rules, CompiledRules};

/// Summary entry used for keys that the whitelist would rewrite.
pub const INVALID_KEY_RULE: &str = "invalid_key_chars";

#[derive(Debug)]
pub struct RegexEngine {
    compiled_rules: Arc<CompiledRules>,
    config: SanitizerConfig,
}

impl RegexEngine {
    pub fn new(config: SanitizerConfig) -> Result<Self, ContentError> {
        let compiled_rules = get_or_compile_rules(&config)?;
        Ok(Self { compiled_rules, config })
    }

    fn run_passes<F>(&self, input: &str, mut on_match: F) -> String
    where
        F: FnMut(&str, &str),
    {
        let mut current = input.to_string();
        let mut pass = 0usize;
        loop {
            pass += 1;
            let mut shrunk = false;
            for rule in &self.compiled_rules.rules {
                let mut removed = false;
                for m in rule.regex.find_iter(&current).filter(|m| !m.as_str().is_empty()) {
                    on_match(&rule.name, m.as_str());
                    removed = true;
                }
                if removed {
                    current = rule.regex.replace_all(&current, "").into_owned();
                    shrunk = true;
                }
            }
            if !shrunk {
                break;
            }
            trace!("Sanitize pass {} removed content; running another pass.", pass);
        }
        current
    }

    fn analyze_into(&self, value: &Value, summary: &mut Vec<SanitizeSummaryItem>) {
        match value {
            Value::String(s) => {
                self.run_passes(s, |rule, text| record(summary, rule, text));
            }
            Value::Array(items) => {
                for item in items {
                    self.analyze_into(item, summary);
                }
            }
            Value::Object(map) => {
                for (key, item) in map {
                    if self.sanitize_key(key) != *key {
                        record(summary, INVALID_KEY_RULE, key);
                    }
                    self.analyze_into(item, summary);
                }
            }
            _ => {}
        }
    }
}

fn record(summary: &mut Vec<SanitizeSummaryItem>, rule_name: &str, text: &str) {
    match summary.iter_mut().find(|item| item.rule_name == rule_name) {
        Some(item) => {
            item.occurrences += 1;
            item.original_texts.push(text.to_string());
        }
        None => summary.push(SanitizeSummaryItem {
            rule_name: rule_name.to_string(),
            occurrences: 1,
            original_texts: vec![text.to_string()],
        }),
    }
}

impl SanitizationEngine for RegexEngine {
    fn sanitize_str(&self, input: &str) -> String {
        self.run_passes(input, |_, _| {})
    }

    fn analyze(&self, value: &Value) -> Vec<SanitizeSummaryItem> {
        let mut summary = Vec::new();
        self.analyze_into(value, &mut summary);
        summary
    }

    fn compiled_rules(&self) -> &CompiledRules {
        &self.compiled_rules
    }

    fn get_rules(&self) -> &SanitizerConfig {
        &self.config
    }
}
