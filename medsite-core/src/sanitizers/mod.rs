//! Rule compilation for the sanitizer.
//!
//! Turns the data-only `SanitizerConfig` into compiled regular expressions and
//! caches them process-wide so engines can be constructed cheaply, e.g. once
//! per store or per request.

pub mod compiler;
