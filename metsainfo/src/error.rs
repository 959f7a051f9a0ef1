//! Error types for the metsainfo crate

use thiserror::Error;

/// Errors that can occur while parsing a detail page
#[derive(Debug, Error)]
pub enum ParseError {
    /// The page contained no tables at all; every detail page has at least one
    #[error("malformed page: no tables found")]
    MalformedPage,

    /// A required field, token or column is missing, or a code is unknown.
    /// Indicates a parser mismatch or an upstream schema change.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A value expected to be numeric did not parse under Estonian locale rules.
    /// Recoverable: callers keep the original string instead.
    #[error("not a number: {0:?}")]
    NotNumeric(String),
}

impl ParseError {
    /// Creates a schema-mismatch error with context
    pub fn schema(context: impl Into<String>) -> Self {
        Self::SchemaMismatch(context.into())
    }
}
