//! Canonical path keys
//!
//! Every path stored in `PaperPaths` or held by the tag cache goes through
//! [`normalize`]: absolute, symlinks resolved when the file exists, forward
//! slashes only.

use std::path::{Component, Path, PathBuf};

/// Canonical string key for a filesystem path.
///
/// Existing paths are canonicalized. Paths that do not exist (yet, or on this
/// machine) are made absolute against the current directory and cleaned of
/// `.`/`..` components lexically, so lookups stay stable either way.
pub fn normalize(path: &Path) -> String {
    let resolved = match std::fs::canonicalize(path) {
        Ok(p) => p,
        Err(_) => lexical_absolute(path),
    };
    to_forward_slashes(&resolved)
}

/// File name component used as the paper's natural key
pub fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

fn lexical_absolute(path: &Path) -> PathBuf {
    let base = if path.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir().unwrap_or_default()
    };

    let mut out = base;
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn to_forward_slashes(path: &Path) -> String {
    let raw = path.to_string_lossy();
    // Verbatim prefix added by canonicalize on Windows
    let raw = raw.strip_prefix(r"\\?\").unwrap_or(&raw);
    raw.replace('\\', "/")
}
