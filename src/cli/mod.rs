//! CLI argument parsing for papershelf
//!
//! Global flags: --store, --format, --quiet, --verbose, --log-level, --log-json

pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use output::OutputFormat;

/// Papershelf - tag PDF papers across folders and machines
#[derive(Parser, Debug)]
#[command(name = "papershelf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Store directory holding config.toml and the database
    #[arg(long, global = true, env = "PAPERSHELF_HOME")]
    pub store: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level or filter directive (e.g. "debug", "papershelf_core=trace")
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register every PDF under a directory
    Ingest {
        /// Directory to scan recursively
        dir: PathBuf,
    },

    /// Show the tags of a file
    Tags {
        /// File path
        path: PathBuf,
    },

    /// Add tags to a file and every other copy of the same paper
    Tag {
        /// File path
        path: PathBuf,

        /// Tags to add
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// List papers seen on this device with their tags
    Papers,

    /// Show how many papers carry each tag
    TagStats,

    /// Set or clear the display color of a tag
    TagColor {
        /// Tag name
        tag: String,

        /// Color hint (e.g. "#ff8800"); omit to clear
        color: Option<String>,
    },

    /// Read or write application settings
    Setting {
        #[command(subcommand)]
        command: SettingCommands,
    },

    /// Print the device identifier used for new paths
    Device,
}

/// Setting subcommands
#[derive(Subcommand, Debug)]
pub enum SettingCommands {
    /// Print a setting (empty when unset)
    Get {
        /// Setting key (e.g. lastDirectory)
        key: String,
    },

    /// Store a setting
    Set {
        /// Setting key
        key: String,

        /// New value
        value: String,
    },
}
