// File: medsite-core/src/validators.rs
//! Field-level validation for content values.
//!
//! These are the checks the store applies after sanitization: the key
//! character whitelist, the contact email shape, and the image field rule.
//!
//! License: MIT OR APACHE 2.0

use log::error;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));

const IMAGE_PATH_PREFIX: &str = "images/";
const URL_PREFIXES: [&str; 2] = ["http://", "https://"];

/// Characters permitted in object keys: `[a-zA-Z0-9_.-]`.
pub fn is_allowed_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// Strips every character outside the key whitelist.
pub fn sanitize_key(key: &str) -> String {
    key.chars().filter(|&c| is_allowed_key_char(c)).collect()
}

/// Checks the `local@domain.tld` shape. No deliverability checks.
///
/// If the pattern failed to compile every address is refused.
pub fn is_valid_email(email: &str) -> bool {
    match &*EMAIL_REGEX {
        Ok(regex) => regex.is_match(email),
        Err(e) => {
            error!("Email pattern failed to compile: {}", e);
            false
        }
    }
}

/// A field holds an image when its name contains "image", ignoring case.
pub fn is_image_field(name: &str) -> bool {
    name.to_ascii_lowercase().contains("image")
}

/// Accepts a relative path under `images/` or an absolute http(s) URL.
///
/// Relative paths may not climb out of the images directory.
pub fn is_valid_image_url(value: &str) -> bool {
    if let Some(rest) = value.strip_prefix(IMAGE_PATH_PREFIX) {
        return !rest.split(['/', '\\']).any(|segment| segment == "..");
    }
    URL_PREFIXES.iter().any(|prefix| value.starts_with(prefix))
}
