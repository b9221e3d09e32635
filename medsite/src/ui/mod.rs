// medsite/src/ui/mod.rs
//! Terminal output helpers: colored status lines and tables.

pub mod output_format;
pub mod tables;
pub mod theme;
