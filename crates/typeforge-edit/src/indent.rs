//! Indentation helpers
//!
//! Used when inserted text (a generated docstring, say) has to sit at the
//! indentation level of the function body it lands in.

/// Leading whitespace of a line
#[must_use]
pub fn line_indent(line: &str) -> &str {
    let end = line.len() - line.trim_start().len();
    &line[..end]
}

/// Indentation of a function body, read off the second line of its code
///
/// The first line is the `def` itself; the second line is the first body
/// line and carries the body's indentation. Single-line input falls back to
/// its own indent.
#[must_use]
pub fn function_indent(code: &str) -> &str {
    let second_line_start = code.find('\n').map_or(0, |i| i + 1);
    let rest = &code[second_line_start..];
    let second_line = rest.split('\n').next().unwrap_or(rest);
    line_indent(second_line)
}

/// Re-indent every line of `text` to exactly `indent`
///
/// Each line's own leading whitespace is stripped first.
#[must_use]
pub fn reindent(text: &str, indent: &str) -> String {
    text.split('\n')
        .map(|line| format!("{indent}{}", line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_indent_spaces() {
        assert_eq!(line_indent("    def foo():"), "    ");
    }

    #[test]
    fn line_indent_tabs() {
        assert_eq!(line_indent("\tdef foo():\n\t\tpass"), "\t");
    }

    #[test]
    fn function_indent_single_body_line() {
        assert_eq!(function_indent("  def foo():\n    pass"), "    ");
    }

    #[test]
    fn function_indent_multiline_body() {
        assert_eq!(function_indent("  def foo():\n    a=1\n    return a"), "    ");
    }

    #[test]
    fn reindent_replaces_existing_indent() {
        assert_eq!(reindent(" a\n b\n c", "  "), "  a\n  b\n  c");
    }

    #[test]
    fn reindent_composes_with_function_indent() {
        let code = "def foo():\n        pass";
        let indent = function_indent(code);
        let text = reindent("\"\"\"Doc.\"\"\"", indent);
        assert_eq!(text, "        \"\"\"Doc.\"\"\"");
    }
}
