//! Colors for the logical parts of the CLI's output.
//!
//! Every styled element maps to one of the 16 named ANSI colors through a
//! `ThemeMap`, so output code never hard-codes a color.

use owo_colors::AnsiColors;
use std::collections::HashMap;

/// Type alias for the theme map, providing a consistent type definition.
pub type ThemeMap = HashMap<ThemeEntry, AnsiColors>;

/// The different logical parts of the output that can be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeEntry {
    Success,
    Info,
    Warn,
    Error,
}

/// The built-in theme.
pub fn default_theme_map() -> ThemeMap {
    HashMap::from([
        (ThemeEntry::Success, AnsiColors::Green),
        (ThemeEntry::Info, AnsiColors::Cyan),
        (ThemeEntry::Warn, AnsiColors::Yellow),
        (ThemeEntry::Error, AnsiColors::Red),
    ])
}

/// Looks up an entry, falling back to white for entries a map leaves out.
pub fn color_for(theme: &ThemeMap, entry: ThemeEntry) -> AnsiColors {
    theme.get(&entry).copied().unwrap_or(AnsiColors::White)
}
