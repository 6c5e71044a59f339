//! Go source parser using tree-sitter.
//!
//! Produces a `ParsedFile` per source file:
//! - Package name from the `package` clause
//! - Function and method declarations with parameter and result groups
//! - Type declarations with struct fields
//! - Doc comments attached the way `go/ast` attaches them

use std::path::Path;

use once_cell::sync::OnceCell;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor, Tree};

use super::facts::{Declaration, FieldGroup, FuncDecl, ParsedFile, Span, TypeDecl, TypeShape, TypeSpec};
use super::printer::render_type;
use crate::error::ExtractError;

/// Tree-sitter query for the package declaration.
const PACKAGE_QUERY: &str = r#"
(package_clause
  (package_identifier) @package_name
)
"#;

/// Shared parser instance.
static GO_PARSER: OnceCell<GoParser> = OnceCell::new();

/// Go language parser.
pub struct GoParser {
    language: Language,
}

impl GoParser {
    /// Create a new Go parser.
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    /// The process-wide parser.
    pub fn shared() -> &'static GoParser {
        GO_PARSER.get_or_init(GoParser::new)
    }

    /// Create a new tree-sitter parser for this call.
    fn create_parser(&self) -> Result<Parser, ExtractError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ExtractError::Language(e.to_string()))?;
        Ok(parser)
    }

    /// Read and parse a file from disk.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedFile, ExtractError> {
        let source = std::fs::read(path).map_err(|source| ExtractError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_source(path, source)
    }

    /// Parse source text that has already been read.
    ///
    /// Files with syntax errors are rejected rather than partially
    /// extracted.
    pub fn parse_source(&self, path: &Path, source: Vec<u8>) -> Result<ParsedFile, ExtractError> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| ExtractError::Syntax {
                path: path.to_path_buf(),
                line: 1,
                column: 1,
                message: "parser produced no tree".to_string(),
            })?;

        if tree.root_node().has_error() {
            return Err(syntax_error(path, &tree, &source));
        }

        let package = self
            .extract_package(&tree, &source)?
            .ok_or_else(|| ExtractError::MissingPackage {
                path: path.to_path_buf(),
            })?;

        let declarations = extract_declarations(tree.root_node(), &source);

        Ok(ParsedFile {
            path: path.to_path_buf(),
            package,
            source,
            declarations,
        })
    }

    /// Extract the package name from a parsed tree.
    fn extract_package(&self, tree: &Tree, source: &[u8]) -> Result<Option<String>, ExtractError> {
        let query = Query::new(&self.language, PACKAGE_QUERY)
            .map_err(|e| ExtractError::Language(e.to_string()))?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, tree.root_node(), source);

        if let Some(m) = matches.next() {
            for capture in m.captures {
                let name = query.capture_names()[capture.index as usize];
                if name == "package_name" {
                    return Ok(Some(text(capture.node, source).to_string()));
                }
            }
        }
        Ok(None)
    }
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a syntax error pointing at the first error or missing node.
fn syntax_error(path: &Path, tree: &Tree, source: &[u8]) -> ExtractError {
    let mut stack = vec![tree.root_node()];
    let mut first: Option<Node> = None;

    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            if first.map_or(true, |f| node.start_byte() < f.start_byte()) {
                first = Some(node);
            }
            continue;
        }
        if node.has_error() {
            let mut cursor = node.walk();
            stack.extend(node.children(&mut cursor));
        }
    }

    let node = first.unwrap_or_else(|| tree.root_node());
    let pos = node.start_position();
    let message = if node.is_missing() {
        format!("missing {}", node.kind())
    } else {
        let snippet: String = text(node, source).chars().take(32).collect();
        format!("unexpected {:?}", snippet.trim())
    };

    ExtractError::Syntax {
        path: path.to_path_buf(),
        line: pos.row + 1,
        column: pos.column + 1,
        message,
    }
}

/// Walk the top-level children of `source_file` in order.
fn extract_declarations(root: Node, source: &[u8]) -> Vec<Declaration> {
    let mut cursor = root.walk();
    let children: Vec<Node> = root.named_children(&mut cursor).collect();

    let mut declarations = Vec::new();
    for (idx, node) in children.iter().enumerate() {
        let decl = match node.kind() {
            "function_declaration" | "method_declaration" => {
                extract_function(*node, source, doc_comments(&children, idx, source))
                    .map(Declaration::Function)
            }
            "type_declaration" => Some(Declaration::Type(extract_type_decl(
                *node,
                source,
                doc_comments(&children, idx, source),
            ))),
            "comment" | "package_clause" => None,
            kind => Some(Declaration::Other {
                kind: kind.to_string(),
                span: Span::from_node(*node),
            }),
        };
        declarations.extend(decl);
    }
    declarations
}

/// Collect the comment group directly above `children[idx]`.
///
/// A comment group is a run of comments with no blank line between them
/// (several may share a line) that ends on the line right above the
/// declaration. Comments that trail code on its line do not belong to it.
fn doc_comments(children: &[Node], idx: usize, source: &[u8]) -> Vec<String> {
    let decl = children[idx];
    let mut next_row = decl.start_position().row;
    let mut start = idx;

    while start > 0 {
        let candidate = children[start - 1];
        if candidate.kind() != "comment" {
            break;
        }
        let end_row = candidate.end_position().row;
        let same_line = start < idx && end_row == next_row;
        if end_row + 1 != next_row && !same_line {
            break;
        }
        next_row = candidate.start_position().row;
        start -= 1;
    }

    // Comments on the last line of the preceding code trail that code.
    if start > 0 && children[start - 1].kind() != "comment" {
        let code_row = children[start - 1].end_position().row;
        while start < idx && children[start].start_position().row == code_row {
            start += 1;
        }
    }

    children[start..idx]
        .iter()
        .map(|c| text(*c, source).to_string())
        .collect()
}

fn extract_function(node: Node, source: &[u8], doc: Vec<String>) -> Option<FuncDecl> {
    let name = text(node.child_by_field_name("name")?, source).to_string();
    let parameters = node.child_by_field_name("parameters")?;
    let result = node.child_by_field_name("result");

    let signature = Span::covering(node, result.unwrap_or(parameters));
    let params = parameter_groups(parameters, source);
    let results = match result {
        Some(r) if r.kind() == "parameter_list" => parameter_groups(r, source),
        // A bare result type is a single unnamed group.
        Some(r) => vec![FieldGroup {
            names: Vec::new(),
            type_span: Span::from_node(r),
            type_text: render_type(r, source),
            embedded: false,
        }],
        None => Vec::new(),
    };

    Some(FuncDecl {
        name,
        doc,
        signature,
        params,
        results,
        span: Span::from_node(node),
    })
}

/// Split a `parameter_list` into its groups.
fn parameter_groups(list: Node, source: &[u8]) -> Vec<FieldGroup> {
    let mut cursor = list.walk();
    let params: Vec<Node> = list.named_children(&mut cursor).collect();

    params
        .into_iter()
        .filter_map(|param| match param.kind() {
            "parameter_declaration" => {
                let ty = param.child_by_field_name("type")?;
                Some(FieldGroup {
                    names: field_names(param, source),
                    type_span: Span::from_node(ty),
                    type_text: render_type(ty, source),
                    embedded: false,
                })
            }
            "variadic_parameter_declaration" => {
                let ty = param.child_by_field_name("type")?;
                let ellipsis = child_of_kind(param, "...").unwrap_or(ty);
                Some(FieldGroup {
                    names: field_names(param, source),
                    type_span: Span::covering(ellipsis, ty),
                    type_text: format!("...{}", render_type(ty, source)),
                    embedded: false,
                })
            }
            _ => None,
        })
        .collect()
}

fn extract_type_decl(node: Node, source: &[u8], doc: Vec<String>) -> TypeDecl {
    let mut cursor = node.walk();
    let specs = node
        .named_children(&mut cursor)
        .filter_map(|spec| match spec.kind() {
            "type_spec" => extract_type_spec(spec, source, false),
            "type_alias" => extract_type_spec(spec, source, true),
            _ => None,
        })
        .collect();

    TypeDecl {
        doc,
        specs,
        span: Span::from_node(node),
    }
}

fn extract_type_spec(spec: Node, source: &[u8], alias: bool) -> Option<TypeSpec> {
    let name = text(spec.child_by_field_name("name")?, source).to_string();
    let ty = spec.child_by_field_name("type")?;

    let shape = match ty.kind() {
        "struct_type" => TypeShape::Struct(struct_fields(ty, source)),
        "interface_type" => TypeShape::Interface,
        _ => TypeShape::Other,
    };

    Some(TypeSpec {
        name,
        shape,
        alias,
        span: Span::from_node(spec),
    })
}

/// Fields of a `struct_type` in declaration order.
fn struct_fields(struct_node: Node, source: &[u8]) -> Vec<FieldGroup> {
    let Some(list) = child_of_kind(struct_node, "field_declaration_list") else {
        return Vec::new();
    };

    let mut cursor = list.walk();
    let decls: Vec<Node> = list
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "field_declaration")
        .collect();

    decls
        .into_iter()
        .filter_map(|field| {
            let ty = field.child_by_field_name("type")?;
            let names = field_names(field, source);
            let embedded = names.is_empty();
            // Embedded pointers keep the `*` as an anonymous token.
            let pointer = embedded && child_of_kind(field, "*").is_some();
            let rendered = render_type(ty, source);

            Some(FieldGroup {
                names,
                type_span: Span::from_node(ty),
                type_text: if pointer {
                    format!("*{}", rendered)
                } else {
                    rendered
                },
                embedded,
            })
        })
        .collect()
}

fn field_names(node: Node, source: &[u8]) -> Vec<String> {
    let mut cursor = node.walk();
    let names = node
        .children_by_field_name("name", &mut cursor)
        .map(|n| text(n, source).to_string())
        .collect();
    names
}

fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

fn text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}
