//! Shorthand for common error construction

/// Return early with a usage error (exit code 2)
#[macro_export]
macro_rules! bail_usage {
    ($msg:expr) => {
        return Err($crate::error::ShelfError::Usage($msg.to_string()))
    };
}

/// Wrap a database error with the operation that failed
#[macro_export]
macro_rules! map_db_err {
    ($op:expr, $error:expr) => {
        $crate::error::ShelfError::db_operation($op, $error)
    };
}
