//! Error types for the lint module.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for lint operations.
pub type LintResult<T> = Result<T, LintError>;

/// Errors that can occur during lint operations.
#[derive(Error, Debug)]
pub enum LintError {
    /// A check could not evaluate part of the tree.
    #[error("unevaluable: {reason}")]
    Unevaluable { offset: u32, reason: String },

    #[error("Unknown rule in configuration: {0}")]
    UnknownRule(String),

    #[error("Invalid configuration in {path}: {message}")]
    InvalidConfiguration { path: PathBuf, message: String },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl LintError {
    pub fn unevaluable(offset: u32, reason: impl Into<String>) -> Self {
        LintError::Unevaluable {
            offset,
            reason: reason.into(),
        }
    }
}
