//! Error types for the syntax module.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::span::Location;

/// Result type alias for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Malformed input. Fatal for the file it was raised on.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{line}:{column}: {reason}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub reason: String,
}

impl ParseError {
    pub fn new(location: Location, reason: impl Into<String>) -> Self {
        Self {
            line: location.line,
            column: location.column,
            reason: reason.into(),
        }
    }

    pub fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }
}
