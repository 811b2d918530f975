//! Error types for the core module.

use thiserror::Error;

use sassguide_lint::LintError;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that abort a whole run. Per-file problems end up in the report instead.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No such file, directory or pattern match: {0}")]
    InputNotFound(String),

    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Lint error: {0}")]
    Lint(#[from] LintError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Whether the run failed before any file was looked at because of bad settings.
    pub fn is_config(&self) -> bool {
        match self {
            CoreError::Config(_) | CoreError::Glob(_) => true,
            CoreError::Lint(e) => matches!(
                e,
                LintError::UnknownRule(_) | LintError::InvalidConfiguration { .. } | LintError::Yaml(_)
            ),
            _ => false,
        }
    }
}
