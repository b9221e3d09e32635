// medsite/src/logger.rs
//! Logger setup for the CLI, built on `env_logger`.
//!
//! `RUST_LOG` is honoured unless a level is forced by `--quiet` or `--debug`.

use env_logger::{Builder, Env};
use log::LevelFilter;

const CRATES: [&str; 2] = ["medsite", "medsite_core"];

/// Installs the global logger. Calling it twice is harmless; the first call wins.
///
/// `Some(LevelFilter::Off)` silences everything, any other forced level
/// applies to the medsite crates only.
pub fn init_logger(forced: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    match forced {
        Some(LevelFilter::Off) => {
            builder.filter_level(LevelFilter::Off);
        }
        Some(level) => {
            for krate in CRATES {
                builder.filter_module(krate, level);
            }
        }
        None => {}
    }
    builder.format_timestamp(None).format_target(false);
    let _ = builder.try_init();
}
