//! Store configuration for papershelf
//!
//! Configuration is stored in `<store root>/config.toml`. Every field has a
//! default, so a missing or partial file is valid.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShelfError};

/// Version written to new config files
pub const STORE_FORMAT_VERSION: u32 = 1;

/// Configuration file name inside the store root
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the default store root
pub const STORE_HOME_ENV_VAR: &str = "PAPERSHELF_HOME";

const STORE_DIR: &str = "papershelf";

/// Contents of `config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Config format version
    #[serde(default = "default_version")]
    pub version: u32,

    /// SQLite file name, relative to the store root
    #[serde(default = "default_database")]
    pub database: String,

    /// Document extensions picked up by directory ingestion (case-insensitive)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Follow symbolic links while scanning
    #[serde(default)]
    pub follow_links: bool,

    /// Device identifier override (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

impl StoreConfig {
    /// Read and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ShelfError::io_operation("read config", path.display(), e))?;
        let config: StoreConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `config.toml` from a store root, falling back to defaults when absent
    pub fn load_or_default(store_root: &Path) -> Result<Self> {
        let path = store_root.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the config as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ShelfError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)
            .map_err(|e| ShelfError::io_operation("write config", path.display(), e))?;
        Ok(())
    }

    /// Full path of the SQLite file for a store root
    pub fn database_path(&self, store_root: &Path) -> PathBuf {
        store_root.join(&self.database)
    }

    /// Whether a file name carries one of the configured document extensions
    pub fn is_document(&self, file_name: &str) -> bool {
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        self.extensions
            .iter()
            .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }

    fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ShelfError::invalid_value("database file name", "(empty)"));
        }
        if self.extensions.iter().any(|e| e.trim_matches('.').is_empty()) {
            return Err(ShelfError::invalid_value(
                "document extension",
                self.extensions.join(","),
            ));
        }
        Ok(())
    }
}

/// Resolve the default store root: `$PAPERSHELF_HOME`, else the platform data dir
pub fn default_store_root() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(STORE_HOME_ENV_VAR) {
        return Ok(PathBuf::from(dir));
    }

    dirs::data_local_dir()
        .map(|d| d.join(STORE_DIR))
        .ok_or_else(|| ShelfError::Other("unable to determine data directory".to_string()))
}

fn default_version() -> u32 {
    STORE_FORMAT_VERSION
}

fn default_database() -> String {
    "papershelf.db".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["pdf".to_string()]
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            version: STORE_FORMAT_VERSION,
            database: default_database(),
            extensions: default_extensions(),
            follow_links: false,
            device_id: None,
        }
    }
}
