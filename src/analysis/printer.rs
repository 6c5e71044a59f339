//! Normalized rendering of Go type expressions.
//!
//! Simple type shapes print exactly as gofmt writes them, so
//! `map[string] *Node` and `map[string]*Node` both render as the latter.
//! Struct literals use gofmt's one-line form, `struct{ A int; B string }`.
//! Function and interface literals keep their source text with whitespace
//! runs collapsed to one space.

use tree_sitter::Node;

/// Render a type node.
pub fn render_type(node: Node, source: &[u8]) -> String {
    let field = |name: &str| node.child_by_field_name(name);

    match node.kind() {
        "type_identifier" | "identifier" | "field_identifier" | "package_identifier" => {
            node_text(node, source).to_string()
        }
        "qualified_type" => match (field("package"), field("name")) {
            (Some(pkg), Some(name)) => {
                format!("{}.{}", node_text(pkg, source), node_text(name, source))
            }
            _ => collapse(node, source),
        },
        "pointer_type" => match first_named(node) {
            Some(inner) => format!("*{}", render_type(inner, source)),
            None => collapse(node, source),
        },
        "slice_type" => match field("element") {
            Some(elem) => format!("[]{}", render_type(elem, source)),
            None => collapse(node, source),
        },
        "array_type" => match (field("length"), field("element")) {
            (Some(len), Some(elem)) => format!(
                "[{}]{}",
                collapse(len, source),
                render_type(elem, source)
            ),
            _ => collapse(node, source),
        },
        "implicit_length_array_type" => match field("element") {
            Some(elem) => format!("[...]{}", render_type(elem, source)),
            None => collapse(node, source),
        },
        "map_type" => match (field("key"), field("value")) {
            (Some(key), Some(value)) => format!(
                "map[{}]{}",
                render_type(key, source),
                render_type(value, source)
            ),
            _ => collapse(node, source),
        },
        "channel_type" => render_channel(node, source),
        "struct_type" => render_struct(node, source),
        "generic_type" => match field("type") {
            Some(base) => {
                let args = field("type_arguments")
                    .map(|a| render_list(a, source))
                    .unwrap_or_default();
                format!("{}[{}]", render_type(base, source), args)
            }
            None => collapse(node, source),
        },
        "type_elem" => {
            let mut cursor = node.walk();
            node.named_children(&mut cursor)
                .map(|n| render_type(n, source))
                .collect::<Vec<_>>()
                .join(" | ")
        }
        "negated_type" => match first_named(node) {
            Some(inner) => format!("~{}", render_type(inner, source)),
            None => collapse(node, source),
        },
        "parenthesized_type" => match first_named(node) {
            Some(inner) => format!("({})", render_type(inner, source)),
            None => collapse(node, source),
        },
        _ => collapse(node, source),
    }
}

fn render_channel(node: Node, source: &[u8]) -> String {
    let value = match node.child_by_field_name("value") {
        Some(v) => render_type(v, source),
        None => return collapse(node, source),
    };

    // `<-chan T` starts with the arrow, `chan<- T` has it after `chan`.
    let mut cursor = node.walk();
    let tokens: Vec<&str> = node
        .children(&mut cursor)
        .filter(|c| !c.is_named())
        .map(|c| c.kind())
        .collect();

    match tokens.as_slice() {
        ["<-", "chan", ..] => format!("<-chan {}", value),
        ["chan", "<-", ..] => format!("chan<- {}", value),
        _ => format!("chan {}", value),
    }
}

fn render_struct(node: Node, source: &[u8]) -> String {
    let Some(list) = first_named(node) else {
        return "struct{}".to_string();
    };

    let mut cursor = list.walk();
    let fields: Vec<String> = list
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "field_declaration")
        .map(|f| render_field(f, source))
        .collect();

    if fields.is_empty() {
        "struct{}".to_string()
    } else {
        format!("struct{{ {} }}", fields.join("; "))
    }
}

/// `a, b T`, an embedded `*T`, and the tag if present.
fn render_field(field: Node, source: &[u8]) -> String {
    let Some(ty) = field.child_by_field_name("type") else {
        return collapse(field, source);
    };

    let mut cursor = field.walk();
    let names: Vec<&str> = field
        .children_by_field_name("name", &mut cursor)
        .map(|n| node_text(n, source))
        .collect();

    let mut rendered = if names.is_empty() {
        let mut cursor = field.walk();
        let pointer = field.children(&mut cursor).any(|c| c.kind() == "*");
        let star = if pointer { "*" } else { "" };
        format!("{}{}", star, render_type(ty, source))
    } else {
        format!("{} {}", names.join(", "), render_type(ty, source))
    };

    if let Some(tag) = field.child_by_field_name("tag") {
        rendered.push(' ');
        rendered.push_str(node_text(tag, source));
    }
    rendered
}

/// Render the named children of a bracketed list, comma separated.
fn render_list(node: Node, source: &[u8]) -> String {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .map(|n| render_type(n, source))
        .collect::<Vec<_>>()
        .join(", ")
}

fn first_named(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment");
    found
}

fn node_text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// Source text with every whitespace run replaced by a single space.
fn collapse(node: Node, source: &[u8]) -> String {
    node_text(node, source)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    /// Render the type of `field` in `type T struct { field <ty> }`.
    fn render(ty: &str) -> String {
        let source = format!("package p\n\ntype T struct {{\n\tf {}\n}}\n", ty);
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse(source.as_bytes(), None).unwrap();
        let root = tree.root_node();
        assert!(!root.has_error(), "fixture should parse: {}", source);

        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.kind() == "field_declaration" {
                let ty = node.child_by_field_name("type").unwrap();
                return render_type(ty, source.as_bytes());
            }
            let mut cursor = node.walk();
            stack.extend(node.named_children(&mut cursor));
        }
        panic!("no field found");
    }

    #[test]
    fn test_simple_types_match_source() {
        assert_eq!(render("string"), "string");
        assert_eq!(render("*Node"), "*Node");
        assert_eq!(render("[]int"), "[]int");
        assert_eq!(render("[4]byte"), "[4]byte");
        assert_eq!(render("time.Duration"), "time.Duration");
        assert_eq!(render("[]*http.Request"), "[]*http.Request");
    }

    #[test]
    fn test_map_normalized() {
        assert_eq!(render("map[string]  *Node"), "map[string]*Node");
    }

    #[test]
    fn test_channels() {
        assert_eq!(render("chan int"), "chan int");
        assert_eq!(render("<-chan int"), "<-chan int");
        assert_eq!(render("chan<- error"), "chan<- error");
    }

    #[test]
    fn test_generic_type() {
        assert_eq!(render("List[int,  string]"), "List[int, string]");
    }

    #[test]
    fn test_inline_struct_keeps_field_separators() {
        assert_eq!(
            render("struct {\n\t\tA int\n\t\tB, C string `json:\"b\"`\n\t}"),
            "struct{ A int; B, C string `json:\"b\"` }"
        );
        assert_eq!(
            render("struct {\n\t\t*Base\n\t\tio.Reader\n\t}"),
            "struct{ *Base; io.Reader }"
        );
        assert_eq!(render("struct{}"), "struct{}");
    }

    #[test]
    fn test_function_type_collapses_whitespace() {
        assert_eq!(render("func(a   int)  error"), "func(a int) error");
    }
}
