//! `papershelf setting` commands

use crate::cli::Cli;
use crate::output_by_format;
use papershelf_core::bail_usage;
use papershelf_core::error::Result;
use papershelf_core::store::PaperStore;

/// Print a setting; unknown keys print an empty value
pub fn execute_get(cli: &Cli, store: &PaperStore, key: &str) -> Result<()> {
    check_key(key)?;
    let value = store.get_setting(key);

    output_by_format!(cli.format,
        json => {
            let output = serde_json::json!({ "key": key, "value": value });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        },
        human => {
            println!("{}", value);
        }
    )
}

pub fn execute_set(cli: &Cli, store: &PaperStore, key: &str, value: &str) -> Result<()> {
    check_key(key)?;
    store.set_setting(key, value)?;

    output_by_format!(cli.format,
        json => {
            let output = serde_json::json!({ "status": "ok", "key": key, "value": value });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        },
        human => {
            if !cli.quiet {
                println!("{} = {}", key, value);
            }
        }
    )
}

fn check_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        bail_usage!("setting key must not be empty");
    }
    Ok(())
}
