//! `papershelf ingest` command - register every PDF under a directory
//!
//! The scan runs on the store's ingest worker. Ctrl-C asks it to stop
//! before the next file; paths registered so far are kept, but only a
//! completed ingest is remembered as the last directory.

use std::path::Path;

use crate::cli::Cli;
use crate::output_by_format;
use papershelf_core::error::{Result, ShelfError};
use papershelf_core::scanner::IngestReport;
use papershelf_core::store::PaperStore;

/// Execute the ingest command
pub fn execute(cli: &Cli, store: &mut PaperStore, dir: &Path) -> Result<()> {
    let handle = store.ingest_directory(dir)?;

    let cancel = handle.cancel_flag();
    if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
        tracing::warn!(error = %e, "failed to install Ctrl-C handler");
    }

    let report = store.finish_ingest(handle)?;
    print_report(cli, &report)?;

    if report.cancelled {
        return Err(ShelfError::Interrupted {
            directory: report.directory,
        });
    }

    Ok(())
}

fn print_report(cli: &Cli, report: &IngestReport) -> Result<()> {
    output_by_format!(cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(report)?);
            Ok(())
        },
        human => {
            if !cli.quiet {
                println!(
                    "Ingested {}: {} found, {} new, {} skipped",
                    report.directory.display(),
                    report.discovered,
                    report.registered,
                    report.skipped
                );
            }
        }
    )
}
