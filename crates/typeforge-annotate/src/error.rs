//! Error type for file-level annotation failures
//!
//! Per-function problems (unusable hints, checker rejections) are handled
//! inside the loop and never surface here; this enum is for conditions that
//! abort processing of the whole file.

use std::path::PathBuf;

use thiserror::Error;

use crate::checker::CheckerError;
use crate::model::ModelError;

/// A failure that stops annotation of a file
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// No analyzer is registered for the file's extension
    #[error("no analyzer registered for '{}'", path.display())]
    UnsupportedExtension {
        /// Offending file
        path: PathBuf,
    },

    /// The file could not be parsed
    #[error(transparent)]
    Parse(#[from] typeforge_syntax::ParseError),

    /// The file could not be read, decoded, or written
    #[error(transparent)]
    SourceFile(#[from] typeforge_edit::SourceFileError),

    /// The type checker could not be invoked for the baseline run
    #[error(transparent)]
    Checker(#[from] CheckerError),

    /// The language model call failed
    #[error(transparent)]
    Model(#[from] ModelError),
}
