//! Errors and process exit codes
//!
//! | code | meaning                                             |
//! |------|-----------------------------------------------------|
//! | 0    | success                                             |
//! | 1    | operation failed (I/O, database, interrupted ingest) |
//! | 2    | bad arguments or invalid values                     |
//! | 3    | missing directory or unavailable store              |

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Process exit status for each error category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Failure = 1,
    Usage = 2,
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("{0}")]
    Usage(String),

    #[error("invalid {what}: {value}")]
    InvalidValue { what: String, value: String },

    #[error("directory not found: {path:?}")]
    DirectoryNotFound { path: PathBuf },

    #[error("not a directory: {path:?}")]
    NotADirectory { path: PathBuf },

    #[error("paper store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("could not {operation}: {reason}")]
    Operation { operation: String, reason: String },

    #[error("could not {operation} {target}: {reason}")]
    OperationOn {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("ingest of {directory:?} was interrupted")]
    Interrupted { directory: PathBuf },

    #[error("{0}")]
    Other(String),
}

impl From<rusqlite::Error> for ShelfError {
    fn from(err: rusqlite::Error) -> Self {
        ShelfError::db_operation("query database", err)
    }
}

impl ShelfError {
    /// A database statement or transaction step failed
    pub fn db_operation(operation: &str, err: impl std::fmt::Display) -> Self {
        ShelfError::Operation {
            operation: operation.to_string(),
            reason: err.to_string(),
        }
    }

    /// A filesystem operation on `target` failed
    pub fn io_operation(
        operation: &str,
        target: impl std::fmt::Display,
        err: impl std::fmt::Display,
    ) -> Self {
        ShelfError::OperationOn {
            operation: operation.to_string(),
            target: target.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn invalid_value(what: &str, value: impl std::fmt::Display) -> Self {
        ShelfError::InvalidValue {
            what: what.to_string(),
            value: value.to_string(),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            ShelfError::Usage(_) | ShelfError::InvalidValue { .. } => ExitCode::Usage,

            ShelfError::DirectoryNotFound { .. }
            | ShelfError::NotADirectory { .. }
            | ShelfError::StoreUnavailable { .. } => ExitCode::Data,

            ShelfError::Json(_)
            | ShelfError::Config(_)
            | ShelfError::Operation { .. }
            | ShelfError::OperationOn { .. }
            | ShelfError::Interrupted { .. }
            | ShelfError::Other(_) => ExitCode::Failure,
        }
    }

    /// Stable machine-readable name of the variant
    fn kind(&self) -> &'static str {
        match self {
            ShelfError::Usage(_) => "usage_error",
            ShelfError::InvalidValue { .. } => "invalid_value",
            ShelfError::DirectoryNotFound { .. } => "directory_not_found",
            ShelfError::NotADirectory { .. } => "not_a_directory",
            ShelfError::StoreUnavailable { .. } => "store_unavailable",
            ShelfError::Json(_) => "json_error",
            ShelfError::Config(_) => "config_error",
            ShelfError::Operation { .. } | ShelfError::OperationOn { .. } => "operation_failed",
            ShelfError::Interrupted { .. } => "interrupted",
            ShelfError::Other(_) => "other",
        }
    }

    /// Error envelope printed to stderr with `--format json`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": i32::from(self.exit_code()),
                "type": self.kind(),
                "message": self.to_string(),
            }
        })
    }
}

pub type Result<T> = std::result::Result<T, ShelfError>;
