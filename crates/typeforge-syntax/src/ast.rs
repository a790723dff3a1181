//! Typed syntax nodes
//!
//! The parse result is a tree of explicit node types rather than a generic
//! "get child by field name" view of the parser's tree: [`SourceModule`]
//! holds [`FunctionNode`]s, each holding a [`SignatureNode`] and its
//! [`ParameterNode`]s. Every node carries the exact [`SourceRange`] it was
//! built from, and functions keep their verbatim source text so downstream
//! consumers can quote the code exactly as written.

use crate::position::{SourcePosition, SourceRange};

/// A `(module, symbol)` pair from an import statement
///
/// `from a import B` yields `("a", "B")`; a plain `import a.b as c` yields
/// an empty module and the full spelling `"a.b as c"` as the symbol.
pub type ImportedName = (String, String);

/// Parse result for one source file
#[derive(Debug, Clone)]
pub struct SourceModule {
    functions: Vec<FunctionNode>,
    imports: Vec<ImportedName>,
}

impl SourceModule {
    pub(crate) fn new(functions: Vec<FunctionNode>, imports: Vec<ImportedName>) -> Self {
        Self { functions, imports }
    }

    /// Module- and class-level functions, in source order
    ///
    /// Functions nested inside other functions are not enumerated; this is a
    /// documented limitation of the traversal, not an omission.
    #[inline]
    #[must_use]
    pub fn functions(&self) -> &[FunctionNode] {
        &self.functions
    }

    /// Imported names in source order
    #[inline]
    #[must_use]
    pub fn imports(&self) -> &[ImportedName] {
        &self.imports
    }
}

/// One function definition with exact positions
#[derive(Debug, Clone)]
pub struct FunctionNode {
    pub(crate) name: String,
    pub(crate) qualified_name: String,
    pub(crate) range: SourceRange,
    pub(crate) signature: SignatureNode,
    pub(crate) return_type: Option<String>,
    pub(crate) body_start: Option<SourcePosition>,
    pub(crate) has_docstring: bool,
    pub(crate) text: String,
}

impl FunctionNode {
    /// Unqualified function name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted name including enclosing classes, e.g. `Cls.method`
    #[inline]
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Full range of the definition (decorators excluded)
    #[inline]
    #[must_use]
    pub fn range(&self) -> SourceRange {
        self.range
    }

    /// The signature node
    #[inline]
    #[must_use]
    pub fn signature(&self) -> &SignatureNode {
        &self.signature
    }

    /// Parameter nodes in declaration order
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[ParameterNode] {
        &self.signature.parameters
    }

    /// Declared return type expression, if annotated
    #[inline]
    #[must_use]
    pub fn return_type(&self) -> Option<&str> {
        self.return_type.as_deref()
    }

    /// Position of the first body statement, if the body is non-empty
    #[inline]
    #[must_use]
    pub fn body_start(&self) -> Option<SourcePosition> {
        self.body_start
    }

    /// Whether the first body statement is a string-literal docstring
    #[inline]
    #[must_use]
    pub fn has_docstring(&self) -> bool {
        self.has_docstring
    }

    /// Verbatim source text of the definition, whitespace and comments intact
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The `def name(params) -> ret` head of a function
#[derive(Debug, Clone)]
pub struct SignatureNode {
    pub(crate) range: SourceRange,
    pub(crate) params_end: SourcePosition,
    pub(crate) parameters: Vec<ParameterNode>,
    pub(crate) text: String,
}

impl SignatureNode {
    /// Range from the start of the definition to the end of the signature
    ///
    /// Ends after the closing parenthesis when there is no return annotation,
    /// or after the return type expression when there is one.
    #[inline]
    #[must_use]
    pub fn range(&self) -> SourceRange {
        self.range
    }

    /// Position immediately after the closing parenthesis
    ///
    /// Anchor for inserting a ` -> T` return annotation.
    #[inline]
    #[must_use]
    pub fn params_end(&self) -> SourcePosition {
        self.params_end
    }

    /// Rendered signature, e.g. `def foo(a, b) -> int`
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterNode {
    pub(crate) name: String,
    pub(crate) range: SourceRange,
    pub(crate) declared_type: Option<String>,
    pub(crate) default: Option<String>,
    pub(crate) splat: bool,
}

impl ParameterNode {
    /// Parameter name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Range of the name identifier
    ///
    /// The range end is the anchor for inserting a `: T` annotation.
    #[inline]
    #[must_use]
    pub fn range(&self) -> SourceRange {
        self.range
    }

    /// Declared type expression, if annotated
    #[inline]
    #[must_use]
    pub fn declared_type(&self) -> Option<&str> {
        self.declared_type.as_deref()
    }

    /// Default value expression, if present
    #[inline]
    #[must_use]
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Whether this is a `*args` or `**kwargs` parameter
    #[inline]
    #[must_use]
    pub fn is_splat(&self) -> bool {
        self.splat
    }
}
