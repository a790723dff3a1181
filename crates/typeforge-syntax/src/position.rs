//! Source positions and ranges
//!
//! Lines and columns are 1-indexed; columns count characters from the start
//! of the line. Range ends are exclusive: the end column is the position
//! immediately after the node's last character, which is also the column at
//! which an in-line insertion lands directly behind the node.

use std::fmt;

/// A 1-indexed line/column position in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePosition {
    /// Line number, starting at 1
    pub line: usize,

    /// Column in characters from line start, starting at 1
    pub col: usize,
}

impl SourcePosition {
    /// Create a new position
    #[inline]
    #[must_use]
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A contiguous span of source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRange {
    /// First character of the span
    pub start: SourcePosition,

    /// Position immediately after the last character
    pub end: SourcePosition,
}

impl SourceRange {
    /// Create a new range
    #[inline]
    #[must_use]
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self { start, end }
    }

    /// Check that `inner` lies entirely within this range
    #[must_use]
    pub fn contains(&self, inner: &SourceRange) -> bool {
        (inner.start.line, inner.start.col) >= (self.start.line, self.start.col)
            && (inner.end.line, inner.end.col) <= (self.end.line, self.end.col)
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_render() {
        assert_eq!(SourcePosition::new(3, 14).to_string(), "3:14");
    }

    #[test]
    fn range_render() {
        let range = SourceRange::new(SourcePosition::new(1, 1), SourcePosition::new(2, 5));
        assert_eq!(range.to_string(), "1:1-2:5");
    }

    #[test]
    fn range_contains_inner() {
        let outer = SourceRange::new(SourcePosition::new(1, 1), SourcePosition::new(4, 1));
        let inner = SourceRange::new(SourcePosition::new(2, 3), SourcePosition::new(2, 9));
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn range_contains_same_line_ordering() {
        let outer = SourceRange::new(SourcePosition::new(1, 5), SourcePosition::new(1, 20));
        let before = SourceRange::new(SourcePosition::new(1, 2), SourcePosition::new(1, 4));
        assert!(!outer.contains(&before));
    }
}
