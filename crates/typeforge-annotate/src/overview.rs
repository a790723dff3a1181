//! Machine-readable function overview

use serde::Serialize;
use typeforge_syntax::SourceModule;

#[derive(Serialize)]
struct Overview {
    items: Vec<Item>,
    error: Option<String>,
}

#[derive(Serialize)]
struct Item {
    name: String,
}

/// Render a module's functions as a JSON overview
///
/// The shape is `{"items":[{"name":…}],"error":…}`. A parse failure is
/// reported in `error` with an empty item list, so callers always get valid
/// JSON to pipe onward.
#[must_use]
pub fn render_functions(result: Result<&SourceModule, &typeforge_syntax::ParseError>) -> String {
    let overview = match result {
        Ok(module) => Overview {
            items: module
                .functions()
                .iter()
                .map(|f| Item {
                    name: f.qualified_name().to_string(),
                })
                .collect(),
            error: None,
        },
        Err(error) => Overview {
            items: Vec::new(),
            error: Some(error.to_string()),
        },
    };
    // Serializing a struct of strings cannot fail.
    serde_json::to_string(&overview).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use typeforge_syntax::{analyzer_for_path, SourceAnalyzer};

    use super::*;

    #[test]
    fn renders_qualified_names() {
        let module = analyzer_for_path(std::path::Path::new("x.py"))
            .unwrap()
            .parse("class C:\n    def m(self):\n        pass\n\ndef f():\n    pass\n")
            .unwrap();
        assert_eq!(
            render_functions(Ok(&module)),
            r#"{"items":[{"name":"C.m"},{"name":"f"}],"error":null}"#
        );
    }

    #[test]
    fn renders_parse_error() {
        let analyzer = analyzer_for_path(std::path::Path::new("x.py")).unwrap();
        let error = analyzer.parse("def broken(:\n").unwrap_err();
        let rendered = render_functions(Err(&error));
        assert!(rendered.starts_with(r#"{"items":[],"error":""#));
    }
}
