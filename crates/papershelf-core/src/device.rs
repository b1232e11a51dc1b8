//! Device identifier
//!
//! A stable per-machine string recorded with every `PaperPaths` row so a
//! store shared between machines can tell which machine saw which path. It
//! is resolved once per process and handed to the store; nothing reads it
//! from ambient state afterwards.

use std::fmt;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{Result, ShelfError};

/// Environment variable overriding the detected device identifier
pub const DEVICE_ID_ENV_VAR: &str = "PAPERSHELF_DEVICE_ID";

const MACHINE_ID_FILES: &[&str] = &["/etc/machine-id", "/var/lib/dbus/machine-id"];
const DEVICE_ID_FILE: &str = "device-id";

/// Stable identifier of the machine observing paths
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ShelfError::invalid_value("device id", "(empty)"));
        }
        Ok(DeviceId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve the identifier for this process.
    ///
    /// Order: explicit override, `PAPERSHELF_DEVICE_ID`, hashed OS machine
    /// id, then an id generated once and persisted under the user data dir.
    pub fn resolve(override_id: Option<&str>) -> Result<Self> {
        if let Some(id) = override_id {
            return Self::new(id);
        }

        if let Ok(id) = std::env::var(DEVICE_ID_ENV_VAR) {
            if !id.trim().is_empty() {
                return Self::new(id);
            }
        }

        if let Some(id) = MACHINE_ID_FILES
            .iter()
            .find_map(|f| machine_id_from(Path::new(f)))
        {
            return Ok(id);
        }

        let state_dir = dirs::data_local_dir()
            .ok_or_else(|| ShelfError::Other("unable to determine data directory".to_string()))?
            .join("papershelf");
        Self::load_or_generate(&state_dir.join(DEVICE_ID_FILE))
    }

    /// Read a persisted identifier, generating and saving one if absent
    pub fn load_or_generate(path: &Path) -> Result<Self> {
        if let Ok(existing) = fs::read_to_string(path) {
            if let Ok(id) = Self::new(existing) {
                return Ok(id);
            }
            tracing::warn!(path = %path.display(), "ignoring empty device id file");
        }

        let id = ulid::Ulid::new().to_string().to_lowercase();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ShelfError::io_operation("create directory", parent.display(), e))?;
        }
        fs::write(path, &id).map_err(|e| ShelfError::io_operation("write", path.display(), e))?;
        tracing::info!(path = %path.display(), "generated device id");

        Ok(DeviceId(id))
    }
}

/// Hash of the OS machine id, so the raw id never lands in a shared store
fn machine_id_from(path: &Path) -> Option<DeviceId> {
    let raw = fs::read_to_string(path).ok()?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(16);
    Some(DeviceId(id))
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
