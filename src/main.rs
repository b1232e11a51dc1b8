//! Papershelf - tag PDF papers across folders and machines
//!
//! Papers are identified by file name, so every copy of `a.pdf` shares
//! the same tags wherever it was ingested.

mod cli;
mod commands;

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::Parser;

use cli::{Cli, OutputFormat};
use papershelf_core::error::{ExitCode as ShelfExitCode, ShelfError};
use papershelf_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return parse_failure(err),
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let result = commands::dispatch::run(&cli);
    tracing::debug!(elapsed = ?start.elapsed(), ok = result.is_ok(), "command finished");

    match result {
        Ok(()) => ExitCode::from(ShelfExitCode::Success as u8),
        Err(e) => {
            match cli.format {
                OutputFormat::Json => eprintln!("{}", e.to_json()),
                OutputFormat::Human if !cli.quiet => eprintln!("error: {}", e),
                OutputFormat::Human => {}
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Report an argument error, as a JSON envelope when `--format json` was given.
///
/// `Cli.format` is unknown when parsing fails, so argv is inspected directly.
fn parse_failure(err: clap::Error) -> ExitCode {
    if !argv_requests_json() || matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
    {
        err.exit();
    }

    let error = match err.kind() {
        ErrorKind::ValueValidation
        | ErrorKind::InvalidValue
        | ErrorKind::InvalidSubcommand
        | ErrorKind::UnknownArgument
        | ErrorKind::MissingRequiredArgument
        | ErrorKind::MissingSubcommand
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        | ErrorKind::ArgumentConflict => ShelfError::Usage(err.to_string()),
        _ => ShelfError::Other(err.to_string()),
    };

    eprintln!("{}", error.to_json());
    ExitCode::from(error.exit_code() as u8)
}

fn argv_requests_json() -> bool {
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--format=json" => return true,
            "--format" if args.next().as_deref() == Some("json") => return true,
            _ => {}
        }
    }
    false
}
