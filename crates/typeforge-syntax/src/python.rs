//! Python analyzer backed by tree-sitter
//!
//! Walks module- and class-level definitions only. Functions nested inside
//! other functions are deliberately not enumerated; the per-function edit
//! protocol downstream assumes independent signatures, and inner defs ride
//! along with their enclosing function's verbatim text.

use tree_sitter::Node;

use crate::analyzer::SourceAnalyzer;
use crate::ast::{FunctionNode, ImportedName, ParameterNode, SignatureNode, SourceModule};
use crate::error::ParseError;
use crate::position::{SourcePosition, SourceRange};

/// Python strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonAnalyzer;

impl SourceAnalyzer for PythonAnalyzer {
    fn language_name(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn parse(&self, source: &str) -> Result<SourceModule, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| ParseError::ParserInit(e.to_string()))?;

        let tree = parser.parse(source, None).ok_or(ParseError::ParseFailed)?;
        let root = tree.root_node();
        if root.has_error() {
            let position = first_error_position(root, source);
            tracing::debug!(%position, "refusing to analyze malformed source");
            return Err(ParseError::Syntax { position });
        }

        let builder = ModuleBuilder::new(source);
        let mut functions = Vec::new();
        builder.collect_definitions(root, &mut Vec::new(), &mut functions);
        let imports = builder.collect_imports(root);
        Ok(SourceModule::new(functions, imports))
    }
}

/// Builds typed nodes from the raw tree, converting byte columns to
/// character columns as it goes.
struct ModuleBuilder<'a> {
    source: &'a str,
    lines: Vec<&'a str>,
}

impl<'a> ModuleBuilder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            lines: source.split('\n').collect(),
        }
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// Tree-sitter points carry byte columns; positions carry character
    /// columns, so the raw column is re-counted against the line text.
    fn position(&self, point: tree_sitter::Point) -> SourcePosition {
        let col = match self.lines.get(point.row) {
            Some(line) if point.column <= line.len() => line[..point.column].chars().count() + 1,
            _ => point.column + 1,
        };
        SourcePosition::new(point.row + 1, col)
    }

    fn range(&self, node: Node<'_>) -> SourceRange {
        SourceRange::new(
            self.position(node.start_position()),
            self.position(node.end_position()),
        )
    }

    fn collect_definitions(
        &self,
        scope: Node<'_>,
        class_stack: &mut Vec<String>,
        out: &mut Vec<FunctionNode>,
    ) {
        let mut cursor = scope.walk();
        for child in scope.named_children(&mut cursor) {
            match child.kind() {
                "function_definition" => {
                    if let Some(function) = self.build_function(child, class_stack) {
                        out.push(function);
                    }
                }
                "decorated_definition" => {
                    if let Some(definition) = child.child_by_field_name("definition") {
                        match definition.kind() {
                            "function_definition" => {
                                if let Some(function) = self.build_function(definition, class_stack)
                                {
                                    out.push(function);
                                }
                            }
                            "class_definition" => {
                                self.collect_class(definition, class_stack, out);
                            }
                            _ => {}
                        }
                    }
                }
                "class_definition" => self.collect_class(child, class_stack, out),
                _ => {}
            }
        }
    }

    fn collect_class(
        &self,
        class: Node<'_>,
        class_stack: &mut Vec<String>,
        out: &mut Vec<FunctionNode>,
    ) {
        let Some(name) = class.child_by_field_name("name") else {
            return;
        };
        class_stack.push(self.text(name).to_string());
        if let Some(body) = class.child_by_field_name("body") {
            self.collect_definitions(body, class_stack, out);
        }
        class_stack.pop();
    }

    fn build_function(&self, node: Node<'_>, class_stack: &[String]) -> Option<FunctionNode> {
        let name = self.text(node.child_by_field_name("name")?).to_string();
        let params_node = node.child_by_field_name("parameters")?;
        let return_type_node = node.child_by_field_name("return_type");

        let parameters = self.build_parameters(params_node);
        let params_end = self.position(params_node.end_position());
        let range = self.range(node);

        let (signature_end, return_type, return_text) = match return_type_node {
            Some(ret) => {
                let return_type = self.text(ret).to_string();
                let return_text = format!(" -> {return_type}");
                (self.position(ret.end_position()), Some(return_type), return_text)
            }
            None => (params_end, None, String::new()),
        };

        let qualified_name = if class_stack.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", class_stack.join("."), name)
        };

        let signature = SignatureNode {
            range: SourceRange::new(range.start, signature_end),
            params_end,
            parameters,
            text: format!("def {name}{}{return_text}", self.text(params_node)),
        };

        let body = node.child_by_field_name("body");
        let first_statement = body.and_then(|b| b.named_child(0));
        let body_start = first_statement.map(|s| self.position(s.start_position()));
        let has_docstring = first_statement.is_some_and(|s| {
            s.kind() == "expression_statement"
                && s.child(0).is_some_and(|expr| expr.kind() == "string")
        });

        Some(FunctionNode {
            name,
            qualified_name,
            range,
            signature,
            return_type,
            body_start,
            has_docstring,
            text: self.text(node).to_string(),
        })
    }

    fn build_parameters(&self, params_node: Node<'_>) -> Vec<ParameterNode> {
        let mut parameters = Vec::new();
        let mut cursor = params_node.walk();
        for child in params_node.named_children(&mut cursor) {
            let parameter = match child.kind() {
                "identifier" => self.name_only_parameter(child, false),
                "list_splat_pattern" | "dictionary_splat_pattern" => child
                    .named_child(0)
                    .and_then(|n| self.name_only_parameter(n, true)),
                "typed_parameter" => {
                    let declared_type = child
                        .child_by_field_name("type")
                        .map(|t| self.text(t).to_string());
                    let name_slot = child.named_child(0);
                    let splat = name_slot.is_some_and(is_splat_slot);
                    self.parameter_name_node(name_slot).map(|n| ParameterNode {
                        name: self.text(n).to_string(),
                        range: self.range(n),
                        declared_type,
                        default: None,
                        splat,
                    })
                }
                "default_parameter" | "typed_default_parameter" => {
                    let declared_type = child
                        .child_by_field_name("type")
                        .map(|t| self.text(t).to_string());
                    let default = child
                        .child_by_field_name("value")
                        .map(|v| self.text(v).to_string());
                    let name_slot = child.child_by_field_name("name");
                    let splat = name_slot.is_some_and(is_splat_slot);
                    self.parameter_name_node(name_slot).map(|n| ParameterNode {
                        name: self.text(n).to_string(),
                        range: self.range(n),
                        declared_type,
                        default,
                        splat,
                    })
                }
                _ => None,
            };
            if let Some(parameter) = parameter {
                parameters.push(parameter);
            }
        }
        parameters
    }

    fn name_only_parameter(&self, node: Node<'_>, splat: bool) -> Option<ParameterNode> {
        (node.kind() == "identifier").then(|| ParameterNode {
            name: self.text(node).to_string(),
            range: self.range(node),
            declared_type: None,
            default: None,
            splat,
        })
    }

    /// Resolve the identifier inside a parameter name slot, unwrapping
    /// `*args` / `**kwargs` patterns
    fn parameter_name_node<'tree>(&self, node: Option<Node<'tree>>) -> Option<Node<'tree>> {
        let node = node?;
        match node.kind() {
            "identifier" => Some(node),
            "list_splat_pattern" | "dictionary_splat_pattern" => {
                node.named_child(0).filter(|n| n.kind() == "identifier")
            }
            _ => None,
        }
    }

    fn collect_imports(&self, root: Node<'_>) -> Vec<ImportedName> {
        let mut imports = Vec::new();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "import_from_statement" => {
                    let module = child
                        .child_by_field_name("module_name")
                        .map(|m| self.text(m).to_string())
                        .unwrap_or_default();
                    let mut names = child.walk();
                    for name in child.children_by_field_name("name", &mut names) {
                        imports.push((module.clone(), self.text(name).to_string()));
                    }
                }
                "import_statement" => {
                    let mut names = child.walk();
                    for name in child.children_by_field_name("name", &mut names) {
                        imports.push((String::new(), self.text(name).to_string()));
                    }
                }
                _ => {}
            }
        }
        imports
    }
}

fn is_splat_slot(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "list_splat_pattern" | "dictionary_splat_pattern"
    )
}

fn first_error_position(root: Node<'_>, source: &str) -> SourcePosition {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let builder = ModuleBuilder::new(source);
            return builder.position(node.start_position());
        }
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }
    SourcePosition::new(1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> SourceModule {
        PythonAnalyzer.parse(source).unwrap()
    }

    #[test]
    fn enumerates_module_functions_in_order() {
        let module = parse("\ndef foo():\n    pass\n\ndef bar():\n    pass\n");
        let names: Vec<_> = module.functions().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["foo", "bar"]);
    }

    #[test]
    fn enumerates_decorated_functions() {
        let source = "\n@cli.command()\n@click.argument(\"q\")\ndef foo(q):\n    pass\n\ndef bar(q):\n    pass\n";
        let module = parse(source);
        let names: Vec<_> = module.functions().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["foo", "bar"]);
    }

    #[test]
    fn enumerates_class_methods_with_qualified_names() {
        let source = "\nclass Cls:\n    def __init__(self):\n        pass\n\n    def foo(self):\n        pass\n";
        let module = parse(source);
        let names: Vec<_> = module
            .functions()
            .iter()
            .map(|f| f.qualified_name())
            .collect();
        assert_eq!(names, vec!["Cls.__init__", "Cls.foo"]);
    }

    #[test]
    fn skips_functions_nested_in_functions() {
        let source = "def outer():\n    def inner():\n        pass\n    return inner\n";
        let module = parse(source);
        let names: Vec<_> = module.functions().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["outer"]);
    }

    #[test]
    fn refuses_malformed_source() {
        let result = PythonAnalyzer.parse("\n    def foo(a):\n        pass");
        assert!(matches!(result, Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn docstring_detection() {
        let without = parse("\ndef foo():\n    pass\n");
        assert!(!without.functions()[0].has_docstring());

        let with = parse("\ndef foo():\n    \"\"\"Doc string\"\"\"\n    pass\n");
        assert!(with.functions()[0].has_docstring());
    }

    #[test]
    fn parameter_name_range_anchors_annotation() {
        // "def foo(a):" -- the end of "a" is character column 10.
        let module = parse("def foo(a):\n    pass\n");
        let function = &module.functions()[0];
        let param = &function.parameters()[0];
        assert_eq!(param.name(), "a");
        assert_eq!(param.range().end, SourcePosition::new(1, 10));
        assert_eq!(function.signature().params_end(), SourcePosition::new(1, 11));
    }

    #[test]
    fn params_end_after_closing_paren() {
        let module = parse("\n#2345678901234\ndef foo(a, b):\n    pass\n");
        let sig = module.functions()[0].signature();
        assert_eq!(sig.range().end, SourcePosition::new(3, 14));
        assert_eq!(sig.text(), "def foo(a, b)");
    }

    #[test]
    fn typed_and_default_parameters() {
        let module = parse("def foo(i: int, j, k=1, *args, **kwargs):\n    pass\n");
        let params = module.functions()[0].parameters();
        let names: Vec<_> = params.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["i", "j", "k", "args", "kwargs"]);
        assert_eq!(params[0].declared_type(), Some("int"));
        assert_eq!(params[1].declared_type(), None);
        assert_eq!(params[2].default(), Some("1"));
        let splats: Vec<_> = params.iter().map(ParameterNode::is_splat).collect();
        assert_eq!(splats, vec![false, false, false, true, true]);
    }

    #[test]
    fn typed_splat_parameter_keeps_flag() {
        let module = parse("def foo(*args: int, **kwargs: str):\n    pass\n");
        let params = module.functions()[0].parameters();
        assert!(params.iter().all(ParameterNode::is_splat));
        assert_eq!(params[0].declared_type(), Some("int"));
    }

    #[test]
    fn return_type_extends_signature() {
        let module = parse("def foo(a) -> int:\n    return a\n");
        let function = &module.functions()[0];
        assert_eq!(function.return_type(), Some("int"));
        assert_eq!(function.signature().text(), "def foo(a) -> int");
        // Signature now ends after "int", not after the paren.
        assert_eq!(function.signature().range().end, SourcePosition::new(1, 18));
    }

    #[test]
    fn verbatim_text_round_trips() {
        let source = "def foo(a):\n    # keep me\n    return a\n";
        let module = parse(source);
        assert_eq!(module.functions()[0].text(), source.trim_end());
    }

    #[test]
    fn from_imports_in_order() {
        let source = "\nfrom typing import Foo, Bar\nfrom typing import Baz\nfrom otherlib import Quux\ndef foo(a):\n    pass\n";
        let module = parse(source);
        assert_eq!(
            module.imports(),
            &[
                ("typing".to_string(), "Foo".to_string()),
                ("typing".to_string(), "Bar".to_string()),
                ("typing".to_string(), "Baz".to_string()),
                ("otherlib".to_string(), "Quux".to_string()),
            ]
        );
    }

    #[test]
    fn plain_imports_keep_full_spelling() {
        let source = "\nimport typing\nimport typing.Foo\nimport foo.Bar as Baz\ndef foo(a):\n    pass\n";
        let module = parse(source);
        assert_eq!(
            module.imports(),
            &[
                (String::new(), "typing".to_string()),
                (String::new(), "typing.Foo".to_string()),
                (String::new(), "foo.Bar as Baz".to_string()),
            ]
        );
    }

    #[test]
    fn non_ascii_columns_count_characters() {
        // "é" is two bytes but one character; the parameter anchor must not
        // drift on lines with multibyte characters before it.
        let module = parse("def fé(a):\n    pass\n");
        let param = &module.functions()[0].parameters()[0];
        assert_eq!(param.range().end, SourcePosition::new(1, 9));
    }
}
