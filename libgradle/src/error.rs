//! Error types for Gradle script parsing.
//!
//! Structural problems in the script itself (unbalanced braces, unterminated
//! comments) are never errors: the parser returns whatever it accumulated.
//! Errors are reserved for I/O and for the resource limits in
//! [`ParseOptions`](crate::ParseOptions).

use std::io;
use thiserror::Error;

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse context carrying filename for error reporting.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    pub filename: Option<String>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }

    /// Format a location suffix for error messages.
    pub fn loc_suffix(&self, line: usize, col: usize) -> String {
        match &self.filename {
            Some(name) => format!(" at {}:{} of <{}>", line + 1, col + 1, name),
            None => format!(" at {}:{}", line + 1, col + 1),
        }
    }
}

/// Error type for Gradle script parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The script could not be read.
    #[error("Cannot read {0}: {1}")]
    Io(String, #[source] io::Error),

    /// Blocks nested deeper than the configured limit.
    #[error("Blocks nested deeper than {0} levels{1}")]
    NestingTooDeep(usize, String),

    /// Input larger than the configured budget.
    #[error("Input of {0} bytes exceeds the {1} byte budget")]
    InputTooLarge(usize, usize),
}

impl ParseError {
    /// Attach location information to errors that carry it.
    pub fn with_location(self, ctx: &ParseContext, line: usize, col: usize) -> Self {
        match self {
            ParseError::NestingTooDeep(limit, _) => {
                ParseError::NestingTooDeep(limit, ctx.loc_suffix(line, col))
            }
            other => other,
        }
    }
}
