//! Planned insertions and the merge algorithm
//!
//! [`merge_insertions`] is a pure function of its inputs: identical inputs
//! always produce byte-identical output. Line numbers and columns in every
//! [`Insertion`] refer to the *original* text; the merge compensates for the
//! drift its own splices introduce.

use std::collections::BTreeMap;

/// A single planned edit
///
/// A full-line insertion becomes a new line placed entirely before the line
/// that currently holds its `line` number. An in-line insertion splices its
/// text into that line at `column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    /// Text to insert, without a line terminator
    pub text: String,

    /// 1-indexed line number in the original text
    pub line: usize,

    /// 1-indexed character column; present only for in-line insertions
    pub column: Option<usize>,

    /// Owning function, for diagnostics and grouping
    pub label: String,
}

impl Insertion {
    /// New full-line insertion placed before `line`
    #[inline]
    #[must_use]
    pub fn full_line(text: impl Into<String>, line: usize, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            line,
            column: None,
            label: label.into(),
        }
    }

    /// New in-line insertion spliced at `column` within `line`
    #[inline]
    #[must_use]
    pub fn inline(
        text: impl Into<String>,
        line: usize,
        column: usize,
        label: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            line,
            column: Some(column),
            label: label.into(),
        }
    }

    /// Whether this is an in-line insertion
    #[inline]
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.column.is_some()
    }
}

/// Merge insertions into a stream of original lines
///
/// Insertions are grouped by line number, preserving relative input order
/// within a group. For each group, full-line insertions are emitted first
/// (each with a trailing newline), then all in-line insertions for that line
/// are spliced into the original line. Because every splice shifts the rest
/// of the line, each in-line text lands at `column + offset` where `offset`
/// is the total length in characters of the texts already spliced into that
/// line -- the caller's columns were computed against the unmodified line.
///
/// A line number past the end of the input appends full-line text at the
/// end, and splices against an empty line.
#[must_use]
pub fn merge_insertions<I>(lines: I, insertions: &[Insertion]) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut groups: BTreeMap<usize, Vec<&Insertion>> = BTreeMap::new();
    for insertion in insertions {
        groups.entry(insertion.line).or_default().push(insertion);
    }

    let mut lines = lines.into_iter();
    let mut next_line_number = 1usize;
    let mut out = Vec::new();

    for (line_number, group) in groups {
        while next_line_number < line_number {
            match lines.next() {
                Some(line) => {
                    out.push(line);
                    next_line_number += 1;
                }
                None => break,
            }
        }

        for insertion in group.iter().filter(|i| !i.is_inline()) {
            out.push(format!("{}\n", insertion.text));
        }

        let inline: Vec<&Insertion> = group
            .iter()
            .filter(|i| i.is_inline())
            .copied()
            .collect();
        if inline.is_empty() {
            continue;
        }

        // Pull the target line out of the stream, or splice into nothing if
        // the file is shorter than the requested line number.
        let mut line = if next_line_number == line_number {
            match lines.next() {
                Some(line) => {
                    next_line_number += 1;
                    line
                }
                None => String::new(),
            }
        } else {
            String::new()
        };

        let mut offset = 0usize;
        for insertion in inline {
            let column = insertion.column.unwrap_or(1);
            line = splice_chars(&line, column.saturating_sub(1) + offset, &insertion.text);
            offset += insertion.text.chars().count();
        }
        out.push(line);
    }

    out.extend(lines);
    out
}

/// Insert `text` before the character at `index`, clamping past-end indexes
fn splice_chars(line: &str, index: usize, text: &str) -> String {
    let byte = line
        .char_indices()
        .nth(index)
        .map_or(line.len(), |(b, _)| b);
    let mut spliced = String::with_capacity(line.len() + text.len());
    spliced.push_str(&line[..byte]);
    spliced.push_str(text);
    spliced.push_str(&line[byte..]);
    spliced
}
