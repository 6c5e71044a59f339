//! Declaration structures produced by the Go parser.
//!
//! These are read-only to the extractors. Every declaration and type
//! expression keeps its byte range into the raw file text so callers can
//! slice the original source instead of re-printing it.

use std::fmt;
use std::path::PathBuf;

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
        }
    }

    /// Create a span covering `first` through the end of `last`.
    pub fn covering(first: tree_sitter::Node, last: tree_sitter::Node) -> Self {
        Self {
            end_byte: last.end_byte(),
            ..Self::from_node(first)
        }
    }

    /// The text this span covers. Out-of-range spans yield an empty string.
    pub fn text<'a>(&self, source: &'a [u8]) -> std::borrow::Cow<'a, str> {
        match source.get(self.start_byte..self.end_byte) {
            Some(bytes) => String::from_utf8_lossy(bytes),
            None => std::borrow::Cow::Borrowed(""),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// One or more names sharing a single type expression.
///
/// `a, b int` is one group with two names. Unnamed parameters and results
/// (`func() (int, error)`) are groups with no names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup {
    pub names: Vec<String>,
    /// Byte range of the type expression. For variadic parameters it starts
    /// at the `...` token.
    pub type_span: Span,
    /// Normalized rendering of the type expression.
    pub type_text: String,
    /// Set for embedded struct fields (`*Base`, `io.Reader`).
    pub embedded: bool,
}

/// A `func` declaration, with or without a receiver.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: String,
    /// Raw doc comment lines, markers included, in source order.
    pub doc: Vec<String>,
    /// From the `func` keyword through the end of the result list, or the
    /// parameter list when there are no results.
    pub signature: Span,
    pub params: Vec<FieldGroup>,
    pub results: Vec<FieldGroup>,
    pub span: Span,
}

impl FuncDecl {
    pub fn is_documented(&self) -> bool {
        !self.doc.is_empty()
    }
}

/// The underlying shape of a type spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    Struct(Vec<FieldGroup>),
    Interface,
    /// Named scalars, aliases of other types, function types, etc.
    Other,
}

/// A single `Name T` entry of a type declaration.
#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub name: String,
    pub shape: TypeShape,
    /// True for `type A = B`.
    pub alias: bool,
    pub span: Span,
}

/// A `type` declaration, possibly grouped: `type ( A struct{}; B int )`.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    /// Doc comment attached to the `type` keyword, not to individual specs.
    pub doc: Vec<String>,
    pub specs: Vec<TypeSpec>,
    pub span: Span,
}

/// A top-level declaration.
#[derive(Debug, Clone)]
pub enum Declaration {
    Function(FuncDecl),
    Type(TypeDecl),
    /// `import`, `var` and `const` declarations.
    Other { kind: String, span: Span },
}

impl Declaration {
    pub fn span(&self) -> Span {
        match self {
            Declaration::Function(f) => f.span,
            Declaration::Type(t) => t.span,
            Declaration::Other { span, .. } => *span,
        }
    }
}

/// One parsed source file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub package: String,
    /// The raw file text; all spans index into it.
    pub source: Vec<u8>,
    pub declarations: Vec<Declaration>,
}

impl ParsedFile {
    /// Iterate over function declarations in source order.
    pub fn functions(&self) -> impl Iterator<Item = &FuncDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Function(f) => Some(f),
            _ => None,
        })
    }
}
