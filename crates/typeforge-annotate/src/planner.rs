//! Turning accepted hints into planned insertions
//!
//! The planner never touches source text. It maps hints onto the positions
//! the syntax tree recorded, and plans `from typing import X` lines for
//! well-known typing names a hint references that the module does not
//! already import.

use std::collections::HashSet;

use typeforge_edit::Insertion;
use typeforge_syntax::{FunctionNode, ImportedName, SourceModule};

use crate::hints::Hint;

/// Typing-module names the planner knows how to import
const WELL_KNOWN_TYPING: &[&str] = &[
    "Any",
    "Callable",
    "Dict",
    "Iterable",
    "List",
    "NamedTuple",
    "Optional",
    "Sequence",
    "Set",
    "Tuple",
    "Type",
    "Union",
];

/// The set of `(module, symbol)` pairs a file already imports
///
/// Seeded from the parsed module and grown as the planner adds import
/// lines, so each symbol is imported at most once per file even across
/// several annotated functions.
#[derive(Debug, Clone, Default)]
pub struct ImportSet(HashSet<ImportedName>);

impl ImportSet {
    /// Seed the set from a parsed module's import statements
    #[must_use]
    pub fn from_module(module: &SourceModule) -> Self {
        Self(module.imports().iter().cloned().collect())
    }

    /// Whether `from {module} import {symbol}` is already present
    #[inline]
    #[must_use]
    pub fn contains(&self, module: &str, symbol: &str) -> bool {
        self.0.contains(&(module.to_string(), symbol.to_string()))
    }

    fn insert(&mut self, module: &str, symbol: &str) -> bool {
        self.0.insert((module.to_string(), symbol.to_string()))
    }
}

/// Identifiers in a function that still need a type
///
/// Parameters named `self` or `cls` are skipped, as are parameters that
/// already carry an annotation and `*args`/`**kwargs` splats, whose
/// annotations describe elements rather than the parameter and are not worth
/// a model round trip. `"return"` is appended when the function has no
/// return annotation, except for `__init__` where the return type is
/// implied.
#[must_use]
pub fn what_needs_typing(function: &FunctionNode) -> Vec<String> {
    let mut needs: Vec<String> = function
        .parameters()
        .iter()
        .filter(|p| p.declared_type().is_none() && !p.is_splat())
        .filter(|p| p.name() != "self" && p.name() != "cls")
        .map(|p| p.name().to_string())
        .collect();
    if function.return_type().is_none() && function.name() != "__init__" {
        needs.push("return".to_string());
    }
    needs
}

/// Plan the insertions for one function's accepted hints
///
/// Each parameter hint becomes `": T"` spliced at the end of the parameter
/// name; a `return` hint becomes `" -> T"` spliced after the closing
/// parenthesis, only when the function has no return annotation already.
/// Hints naming no known identifier are dropped. Any well-known `typing`
/// name a planned type references and `imports` does not yet contain gets a
/// `from typing import X` line planned at line 1, and is recorded in
/// `imports` so later functions do not plan it again.
pub fn plan_insertions(
    function: &FunctionNode,
    hints: &[Hint],
    imports: &mut ImportSet,
) -> Vec<Insertion> {
    let label = function.name();
    let mut insertions = Vec::new();
    for hint in hints {
        let planned = if hint.identifier == "return" {
            if function.return_type().is_some() {
                false
            } else {
                let anchor = function.signature().params_end();
                insertions.push(Insertion::inline(
                    format!(" -> {}", hint.type_expression),
                    anchor.line,
                    anchor.col,
                    label,
                ));
                true
            }
        } else {
            match function
                .parameters()
                .iter()
                .find(|p| {
                    p.name() == hint.identifier && p.declared_type().is_none() && !p.is_splat()
                })
            {
                Some(parameter) => {
                    let anchor = parameter.range().end;
                    insertions.push(Insertion::inline(
                        format!(": {}", hint.type_expression),
                        anchor.line,
                        anchor.col,
                        label,
                    ));
                    true
                }
                None => {
                    tracing::debug!(
                        function = label,
                        identifier = %hint.identifier,
                        "hint names no untyped identifier, dropping"
                    );
                    false
                }
            }
        };
        if planned {
            for symbol in typing_symbols(&hint.type_expression) {
                if imports.insert("typing", symbol) {
                    insertions.push(Insertion::full_line(
                        format!("from typing import {symbol}"),
                        1,
                        label,
                    ));
                }
            }
        }
    }
    insertions
}

/// Well-known typing names referenced by a type expression, in textual order
fn typing_symbols(type_expression: &str) -> Vec<&'static str> {
    type_expression
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            WELL_KNOWN_TYPING
                .iter()
                .find(|known| **known == token)
                .copied()
        })
        .collect()
}
