//! Parse error types

use crate::position::SourcePosition;

/// Errors from source analysis
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    /// Parser backend could not be initialized with its grammar
    #[error("parser initialization failed: {0}")]
    ParserInit(String),

    /// The parser produced no tree at all
    #[error("parse failed")]
    ParseFailed,

    /// The source contains a syntax error
    ///
    /// Malformed source is refused outright rather than partially analyzed;
    /// edit positions computed against a broken tree cannot be trusted.
    #[error("syntax error at {position}")]
    Syntax {
        /// Location of the first error node
        position: SourcePosition,
    },
}
