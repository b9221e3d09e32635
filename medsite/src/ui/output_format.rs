//! Status lines written to stderr (or any writer), colored when the target
//! is a terminal.

use owo_colors::OwoColorize;
use std::io::{self, Write};

use super::theme::{color_for, ThemeEntry, ThemeMap};

fn print_prefixed<W: Write>(
    writer: &mut W,
    prefix: &str,
    message: &str,
    entry: ThemeEntry,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{} {}", prefix.color(color_for(theme, entry)), message)
    } else {
        writeln!(writer, "{} {}", prefix, message)
    }
}

pub fn print_info_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_prefixed(writer, "info:", message, ThemeEntry::Info, theme, supports_color)
}

pub fn print_success_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_prefixed(writer, "ok:", message, ThemeEntry::Success, theme, supports_color)
}

pub fn print_warn_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_prefixed(writer, "warning:", message, ThemeEntry::Warn, theme, supports_color)
}

pub fn print_error_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_prefixed(writer, "error:", message, ThemeEntry::Error, theme, supports_color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::default_theme_map;

    #[test]
    fn plain_output_has_no_escape_codes() {
        let mut out = Vec::new();
        print_warn_message(&mut out, "image reset", &default_theme_map(), false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "warning: image reset\n");
    }

    #[test]
    fn colored_output_wraps_prefix_only() {
        let mut out = Vec::new();
        print_error_message(&mut out, "boom", &default_theme_map(), true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\u{1b}["));
        assert!(text.ends_with(" boom\n"));
    }
}
