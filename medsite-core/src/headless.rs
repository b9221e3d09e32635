// File: medsite-core/src/headless.rs

//! Convenience wrappers around a process-wide engine built from the built-in
//! rules. These are the free-function forms of the sanitizer for callers that
//! do not carry their own engine (e.g. a read route re-sanitizing a value).
//!
//! The engine is built on first use. If the embedded rules fail to load, the
//! error is returned and the next call tries again.

use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::config::SanitizerConfig;
use crate::engine::SanitizationEngine;
use crate::engines::regex_engine::RegexEngine;
use crate::errors::ContentError;

static DEFAULT_ENGINE: OnceCell<RegexEngine> = OnceCell::new();

/// The engine built from the embedded default rules.
pub fn default_engine() -> Result<&'static RegexEngine, ContentError> {
    DEFAULT_ENGINE.get_or_try_init(|| {
        let config = SanitizerConfig::load_default_rules()?;
        RegexEngine::new(config)
    })
}

/// Sanitizes a leaf value: strings are cleaned, everything else passes through.
pub fn sanitize_string(value: &Value) -> Result<Value, ContentError> {
    Ok(default_engine()?.sanitize_value(value))
}

/// Sanitizes a plain string slice.
pub fn sanitize_str(input: &str) -> Result<String, ContentError> {
    Ok(default_engine()?.sanitize_str(input))
}

/// Recursively sanitizes keys and string leaves of any JSON value.
pub fn deep_sanitize(value: &Value) -> Result<Value, ContentError> {
    Ok(default_engine()?.deep_sanitize(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_string_leaves_pass_through() -> Result<(), ContentError> {
        assert_eq!(sanitize_string(&json!(42))?, json!(42));
        assert_eq!(sanitize_string(&json!(false))?, json!(false));
        assert_eq!(sanitize_string(&Value::Null)?, Value::Null);
        assert_eq!(sanitize_string(&json!("a<script>b</script>c"))?, json!("ac"));
        Ok(())
    }

    #[test]
    fn sequences_keep_order_and_type() -> Result<(), ContentError> {
        let out = deep_sanitize(&json!(["z", "<iframe></iframe>y", "x"]))?;
        assert_eq!(out, json!(["z", "y", "x"]));
        Ok(())
    }

    #[test]
    fn deep_sanitize_is_idempotent_on_nasty_input() -> Result<(), ContentError> {
        let input = json!({
            "intro <b>": {
                "title": "ononclick=click=Hi <scr<script></script>ipt>x</script>",
                "items": [{ "icon": "evevalal(", "te xt": "expression(expression(" }]
            }
        });
        let once = deep_sanitize(&input)?;
        assert_eq!(deep_sanitize(&once)?, once);
        Ok(())
    }

    #[test]
    fn default_engine_is_shared() -> Result<(), ContentError> {
        let first = default_engine()?;
        let second = default_engine()?;
        assert!(std::ptr::eq(first, second));
        Ok(())
    }
}
