//! `papershelf device` command

use crate::cli::Cli;
use crate::output_by_format;
use papershelf_core::error::Result;
use papershelf_core::store::PaperStore;

/// Print the device identifier recorded with newly ingested paths
pub fn execute(cli: &Cli, store: &PaperStore) -> Result<()> {
    output_by_format!(cli.format,
        json => {
            let output = serde_json::json!({ "device_id": store.device().as_str() });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        },
        human => {
            println!("{}", store.device());
        }
    )
}
