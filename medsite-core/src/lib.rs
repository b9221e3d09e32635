// medsite-core/src/lib.rs
//! # medsite Core Library
//!
//! `medsite-core` is the persistence and sanitization layer behind a practice
//! website: the admin panel saves content through it and the public content
//! API reads content through it. It owns one JSON document on disk and
//! guarantees that whatever goes in or comes out is sanitized and valid.
//!
//! ## Modules
//!
//! * `config`: `SanitizeRule`/`SanitizerConfig` (the ordered rule set) and `StoreConfig`.
//! * `sanitizers`: compiles rules into regular expressions, with a process-wide cache.
//! * `engine`: the `SanitizationEngine` trait, including the recursive walk.
//! * `engines`: concrete engines; `RegexEngine` deletes rule matches until a fixpoint.
//! * `validators`: key whitelist, email shape, image field rules.
//! * `headless`: free-function sanitizer backed by the built-in rules.
//! * `document`: `ContentDocument`, the default document and the merge strategy.
//! * `form`: flat `section_field` form submissions to nested updates.
//! * `backup`: timestamped snapshots of the content file.
//! * `store`: `ContentStore`, the load/save contract.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use medsite_core::{ContentStore, StoreConfig};
//! use serde_json::json;
//!
//! let store = ContentStore::new(StoreConfig::with_data_dir("data"))?;
//!
//! // Read path: always a sanitized document, never an error.
//! let content = store.load();
//! println!("{}", content.to_pretty_json()?);
//!
//! // Write path: partial update, merged section by section.
//! let ok = store.save(&json!({ "intro": { "title": "Hello <script>x</script>World" } }));
//! assert!(ok);
//! # Ok::<(), medsite_core::ContentError>(())
//! ```
//!
//! ## Error Handling
//!
//! `load` and `save` never fail past their boundary: `load` falls back to the
//! default document and `save` returns `false`. The `try_` variants return
//! [`ContentError`] for callers that need the reason.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod backup;
pub mod config;
pub mod document;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod form;
pub mod headless;
pub mod sanitizers;
pub mod store;
pub mod validators;

/// Re-exports the rule and store configuration types.
pub use config::{
    merge_rules, BackupConfig, SanitizeRule, SanitizeSummaryItem, SanitizerConfig, StoreConfig,
    DEFAULT_IMAGE_PATH, MAX_PATTERN_LENGTH,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::ContentError;

pub use engine::SanitizationEngine;
pub use engines::regex_engine::RegexEngine;

pub use document::{default_document, ContentDocument, MergeStrategy, REQUIRED_SECTIONS};
pub use form::{FormSubmission, UploadedImage};
pub use backup::BackupEntry;
pub use store::{ContentStore, SaveReport, StoreState};

/// Re-exports the one-shot sanitizer functions.
pub use headless::{deep_sanitize, default_engine, sanitize_str, sanitize_string};

pub use sanitizers::compiler::{compile_rules, CompiledRule, CompiledRules};
