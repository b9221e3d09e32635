// medsite/src/lib.rs
//! # medsite CLI
//!
//! Operator command line for the practice website's content store. The
//! commands call the same `medsite-core` load/save contract the admin panel
//! and the public content API use.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;

pub use commands::run;
