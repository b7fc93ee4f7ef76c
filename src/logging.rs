use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

/// Environment variable holding the tracing filter directives.
pub const LOG_ENV: &str = "TASKREAP_LOG";
const DEFAULT_FILTER: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to set tracing subscriber: {0}")]
    Install(String),
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// JSON lines to `path`. Used while the TUI owns the terminal.
pub fn init_file(path: &Path) -> Result<(), LoggingError> {
    let file = File::create(path).map_err(|source| LoggingError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(env_filter())
        .with_writer(Arc::new(file))
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LoggingError::Install(e.to_string()))
}

/// Human-readable events on stderr, for the one-shot subcommands.
pub fn init_stderr() -> Result<(), LoggingError> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LoggingError::Install(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritable_log_path_is_reported() {
        let err = init_file(Path::new("/nonexistent/dir/taskreap.log")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dir/taskreap.log"));
    }
}
