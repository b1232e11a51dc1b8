//! Command dispatch logic for papershelf

use std::path::PathBuf;

use crate::cli::{Cli, Commands, SettingCommands};
use crate::commands;
use papershelf_core::config::default_store_root;
use papershelf_core::error::Result;
use papershelf_core::store::PaperStore;

pub fn run(cli: &Cli) -> Result<()> {
    let root = store_root(cli)?;
    tracing::debug!(root = %root.display(), "resolved store root");

    let mut store = PaperStore::open(&root)?;

    let result = match &cli.command {
        Commands::Ingest { dir } => commands::ingest::execute(cli, &mut store, dir),
        Commands::Tags { path } => commands::tags::execute_show(cli, &store, path),
        Commands::Tag { path, tags } => commands::tags::execute_add(cli, &mut store, path, tags),
        Commands::Papers => commands::papers::execute(cli, &store),
        Commands::TagStats => commands::tags::execute_stats(cli, &store),
        Commands::TagColor { tag, color } => {
            commands::tags::execute_color(cli, &store, tag, color.as_deref())
        }
        Commands::Setting { command } => match command {
            SettingCommands::Get { key } => commands::settings::execute_get(cli, &store, key),
            SettingCommands::Set { key, value } => {
                commands::settings::execute_set(cli, &store, key, value)
            }
        },
        Commands::Device => commands::device::execute(cli, &store),
    };

    // Report the command's failure over a failure to close
    match result {
        Ok(()) => store.close(),
        Err(e) => {
            if let Err(close_err) = store.close() {
                tracing::warn!(error = %close_err, "failed to close store");
            }
            Err(e)
        }
    }
}

fn store_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.store {
        Some(path) => Ok(path.clone()),
        None => default_store_root(),
    }
}
