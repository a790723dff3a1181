//! Analyzer strategy selection
//!
//! Each language is an independent [`SourceAnalyzer`] strategy selected by
//! file extension. Historically more than one parser backend has served the
//! same language; keeping the interface this narrow is what lets backends be
//! swapped without touching the planner or the merger.

use std::path::Path;

use crate::ast::SourceModule;
use crate::error::ParseError;
use crate::python::PythonAnalyzer;

/// Parses source text into a [`SourceModule`]
pub trait SourceAnalyzer: Send + Sync {
    /// Human-readable language name
    fn language_name(&self) -> &'static str;

    /// File extensions (without dot) this analyzer claims
    fn extensions(&self) -> &'static [&'static str];

    /// Parse a whole source file
    ///
    /// # Errors
    /// Returns [`ParseError`] if the source cannot be parsed; a syntactically
    /// broken file is never analyzed partially.
    fn parse(&self, source: &str) -> Result<SourceModule, ParseError>;
}

static PYTHON: PythonAnalyzer = PythonAnalyzer;

static ANALYZERS: &[&(dyn SourceAnalyzer)] = &[&PYTHON];

/// Select the analyzer for a path by its extension
#[must_use]
pub fn analyzer_for_path(path: &Path) -> Option<&'static dyn SourceAnalyzer> {
    let ext = path.extension()?.to_str()?;
    ANALYZERS
        .iter()
        .copied()
        .find(|a| a.extensions().contains(&ext))
}
