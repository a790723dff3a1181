//! Deterministic source editing
//!
//! Plans meet text here: [`Insertion`]s describe whole-line and in-line
//! edits against the *original* line numbering, [`merge_insertions`] folds
//! them into a line stream without ever renumbering, and [`SourceFile`]
//! owns encoding detection, concurrent-modification protection, and atomic
//! on-disk replacement.

pub mod error;
pub mod indent;
pub mod insertion;
pub mod source_file;

pub use error::SourceFileError;
pub use indent::{function_indent, line_indent, reindent};
pub use insertion::{merge_insertions, Insertion};
pub use source_file::{SourceFile, WriteMode, WriteOutcome};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
