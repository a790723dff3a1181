//! Position-accurate syntax analysis
//!
//! Parses source text into a typed tree of [`FunctionNode`]s carrying exact
//! source ranges, sufficient for verbatim text extraction and precise edit
//! placement. Parser backends are abstracted behind the [`SourceAnalyzer`]
//! strategy trait and selected by file extension.

pub mod analyzer;
pub mod ast;
pub mod error;
pub mod position;
mod python;

pub use analyzer::{analyzer_for_path, SourceAnalyzer};
pub use ast::{FunctionNode, ImportedName, ParameterNode, SignatureNode, SourceModule};
pub use error::ParseError;
pub use position::{SourcePosition, SourceRange};
pub use python::PythonAnalyzer;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
