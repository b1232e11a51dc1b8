//! Logging setup for papershelf

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log the time elapsed since `start` at trace level, with optional fields.
///
/// ```rust,ignore
/// let start = Instant::now();
/// let cache = TagCache::warm(rows);
/// trace_time!(start, "cache_warm", paths = cache.len());
/// ```
#[macro_export]
macro_rules! trace_time {
    ($start:expr, $name:expr) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $name);
    };
    ($start:expr, $name:expr $(, $field:ident = $value:expr)*) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $($field = $value),*, $name);
    };
}

/// Environment variable overriding the log filter, checked before `RUST_LOG`
pub const LOG_ENV_VAR: &str = "PAPERSHELF_LOG";

/// Initialize structured logging on stderr.
///
/// `log_level` wins over `verbose`; either is overridden by `PAPERSHELF_LOG`
/// or `RUST_LOG` when set.
pub fn init_tracing(
    verbose: bool,
    log_level: Option<&str>,
    log_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let directive = match log_level {
        Some(level) => directive_for(level),
        None if verbose => directive_for("debug"),
        None => directive_for("warn"),
    };

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(directive));

    let stderr = fmt::layer().with_writer(std::io::stderr).with_ansi(false);

    if log_json {
        let layer = stderr
            .json()
            .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);
        tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()?;
    } else {
        let layer = stderr.compact().with_target(false);
        tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()?;
    }

    Ok(())
}

/// Build the filter directive for a bare level or a full directive string
fn directive_for(level: &str) -> String {
    if level.contains('=') {
        level.to_string()
    } else {
        format!("papershelf={level},papershelf_core={level}")
    }
}

#[cfg(test)]
mod tests {
    use super::directive_for;

    #[test]
    fn test_bare_level_targets_both_crates() {
        assert_eq!(
            directive_for("info"),
            "papershelf=info,papershelf_core=info"
        );
    }

    #[test]
    fn test_full_directive_passes_through() {
        assert_eq!(directive_for("papershelf_core=trace"), "papershelf_core=trace");
    }
}
