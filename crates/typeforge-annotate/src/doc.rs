//! Docstring planning
//!
//! Asks the model for a docstring for each undocumented function and plans
//! a full-line insertion at the first body line. An answer without a
//! triple-quoted block is discarded rather than inserted.

use typeforge_edit::{function_indent, reindent, Insertion};
use typeforge_syntax::SourceModule;

use crate::model::{LanguageModel, ModelError, INSTRUCTIONS};
use crate::prompts::doc_prompt;

/// Plan docstring insertions for every undocumented function in `module`
///
/// Documented functions and functions with an empty body are skipped. The
/// model's answer is trimmed to its outermost `"""…"""` block and re-indented
/// to the function body's indentation; answers with no such block are
/// dropped. Model transport failures abort the whole pass.
pub async fn plan_docstrings(
    model: &dyn LanguageModel,
    module: &SourceModule,
) -> Result<Vec<Insertion>, ModelError> {
    let mut insertions = Vec::new();
    for function in module.functions() {
        if function.has_docstring() {
            continue;
        }
        let Some(body_start) = function.body_start() else {
            continue;
        };
        let prompt = doc_prompt(function.text());
        let answer = model.respond(INSTRUCTIONS, &[], &prompt).await?;
        match extract_docstring(&answer) {
            Some(block) => {
                let text = reindent(block, function_indent(function.text()));
                insertions.push(Insertion::full_line(text, body_start.line, function.name()));
            }
            None => {
                tracing::info!(function = function.name(), "no docstring in answer, skipping");
            }
        }
    }
    Ok(insertions)
}

/// Trim an answer to its outermost `"""…"""` block
fn extract_docstring(answer: &str) -> Option<&str> {
    let end = answer.rfind("\"\"\"")? + 3;
    let start = answer.find("\"\"\"")?;
    if start + 3 >= end {
        // A single """ with no closing partner.
        return None;
    }
    Some(&answer[start..end])
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use typeforge_syntax::{analyzer_for_path, SourceAnalyzer};

    use super::*;

    struct CannedModel {
        answers: Mutex<Vec<String>>,
    }

    impl CannedModel {
        fn new(answers: &[&str]) -> Self {
            let mut answers: Vec<String> = answers.iter().map(|s| s.to_string()).collect();
            answers.reverse();
            Self {
                answers: Mutex::new(answers),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for CannedModel {
        async fn respond(
            &self,
            _instructions: &str,
            _history: &[(String, String)],
            _prompt: &str,
        ) -> Result<String, ModelError> {
            Ok(self.answers.lock().unwrap().pop().unwrap_or_default())
        }
    }

    fn parse(source: &str) -> SourceModule {
        analyzer_for_path(std::path::Path::new("x.py"))
            .unwrap()
            .parse(source)
            .unwrap()
    }

    #[test]
    fn extracts_outer_block() {
        assert_eq!(
            extract_docstring("Sure:\n\"\"\"Doc.\"\"\"\nDone"),
            Some("\"\"\"Doc.\"\"\"")
        );
        assert_eq!(extract_docstring("no quotes here"), None);
        assert_eq!(extract_docstring("one \"\"\" only"), None);
    }

    #[tokio::test]
    async fn plans_docstring_for_undocumented_function() {
        let module = parse("def foo(a):\n    return a\n");
        let model = CannedModel::new(&["\"\"\"Add one.\"\"\""]);
        let insertions = plan_docstrings(&model, &module).await.unwrap();
        assert_eq!(
            insertions,
            vec![Insertion::full_line("    \"\"\"Add one.\"\"\"", 2, "foo")]
        );
    }

    #[tokio::test]
    async fn documented_function_is_skipped() {
        let module = parse("def foo(a):\n    \"\"\"Docs.\"\"\"\n    return a\n");
        let model = CannedModel::new(&[]);
        let insertions = plan_docstrings(&model, &module).await.unwrap();
        assert!(insertions.is_empty());
    }

    #[tokio::test]
    async fn answer_without_block_is_discarded() {
        let module = parse("def foo(a):\n    return a\n");
        let model = CannedModel::new(&["Here is a comment instead."]);
        let insertions = plan_docstrings(&model, &module).await.unwrap();
        assert!(insertions.is_empty());
    }
}
