// medsite/src/main.rs
//! medsite entry point.

use clap::Parser;
use is_terminal::IsTerminal;
use log::LevelFilter;
use std::io;
use std::process::ExitCode;

use medsite::cli::Cli;
use medsite::logger;
use medsite::ui::output_format;
use medsite::ui::theme::default_theme_map;

fn main() -> ExitCode {
    // A missing .env file is the normal case.
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    if args.global.quiet {
        logger::init_logger(Some(LevelFilter::Off));
    } else if args.global.debug {
        logger::init_logger(Some(LevelFilter::Debug));
    } else {
        logger::init_logger(None);
    }

    match medsite::run(&args.global, args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let stderr = io::stderr();
            let color = stderr.is_terminal();
            // `{:#}` prints the whole context chain on one line.
            let _ = output_format::print_error_message(&mut stderr.lock(), &format!("{:#}", e), &default_theme_map(), color);
            ExitCode::FAILURE
        }
    }
}
