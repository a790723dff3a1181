//! Candidate hint parsing
//!
//! Model answers arrive as loose `identifier: type` lines. Parsing is
//! deliberately forgiving: a line that does not fit the shape is dropped,
//! never fatal to the function being processed.

/// A proposed `(identifier, type expression)` annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    /// Parameter name, or `"return"` for the return slot
    pub identifier: String,
    /// Proposed type expression
    pub type_expression: String,
}

impl Hint {
    /// Create a hint
    #[inline]
    #[must_use]
    pub fn new(identifier: impl Into<String>, type_expression: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            type_expression: type_expression.into(),
        }
    }
}

/// Parse a model answer into usable hints
///
/// Drops hints for `self` and hints whose type is `any` in any casing (an
/// `any` answer is the model saying it does not know). Two narrow textual
/// repairs are applied: a bare `List` becomes the built-in `list`, and a
/// bare `NoReturn` becomes `None` -- a free-standing `NoReturn` on a
/// parameter or return slot is almost always a model mistake rather than an
/// intentional use. Both rewrites are token-exact and are not applied
/// inside larger expressions.
#[must_use]
pub fn parse_type_hint_answer(answer: &str) -> Vec<Hint> {
    answer
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let (identifier, type_expression) = line.split_once(':')?;
            let identifier = identifier.trim();
            let type_expression = type_expression.trim();
            if identifier.is_empty() || type_expression.is_empty() {
                tracing::debug!(line, "dropping malformed hint line");
                return None;
            }
            if identifier == "self" || type_expression.eq_ignore_ascii_case("any") {
                return None;
            }
            let type_expression = match type_expression {
                "List" => "list",
                "NoReturn" => "None",
                other => other,
            };
            Some(Hint::new(identifier, type_expression))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_pairs_and_drops_any() {
        assert_eq!(
            parse_type_hint_answer("a : int\nreturn : Any\n"),
            vec![Hint::new("a", "int")]
        );
    }

    #[test]
    fn any_filter_is_case_insensitive() {
        assert!(parse_type_hint_answer("a: any\nb: ANY\nc: aNy\n").is_empty());
    }

    #[test]
    fn self_is_dropped() {
        assert_eq!(
            parse_type_hint_answer("self: Foo\nb: str\n"),
            vec![Hint::new("b", "str")]
        );
    }

    #[test]
    fn malformed_lines_are_skipped() {
        assert_eq!(
            parse_type_hint_answer("no colon here\n: int\na:\nb: str\n"),
            vec![Hint::new("b", "str")]
        );
    }

    #[test]
    fn bare_list_is_lowercased() {
        assert_eq!(
            parse_type_hint_answer("a: List\nb: List[int]\n"),
            vec![Hint::new("a", "list"), Hint::new("b", "List[int]")]
        );
    }

    #[test]
    fn bare_noreturn_becomes_none() {
        assert_eq!(
            parse_type_hint_answer("return: NoReturn\nf: Callable[..., NoReturn]\n"),
            vec![
                Hint::new("return", "None"),
                Hint::new("f", "Callable[..., NoReturn]")
            ]
        );
    }
}
