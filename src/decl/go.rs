//! Go-specific tree-sitter node operations.
//!
//! Builds declaration values from `function_declaration`, `method_declaration`
//! and `type_declaration` nodes of the tree-sitter-go grammar.

use super::interaction;
use super::{Callable, FunctionDecl, MethodDecl, NamedType, Position, Receiver, StructDecl};
use crate::parser::SourceFile;
use tracing::debug;
use tree_sitter::Node;

pub fn function_decl(file: &SourceFile, node: Node) -> FunctionDecl {
    FunctionDecl {
        position: position(file, node),
        callable: callable(file, node, None),
    }
}

/// Builds the method and runs the receiver interaction analysis on its body.
pub fn method_decl(file: &SourceFile, node: Node) -> MethodDecl {
    let position = position(file, node);
    let receiver_list = node.child_by_field_name("receiver");
    let receiver = receiver_list
        .map(|list| receiver(file, list))
        .unwrap_or_else(|| Receiver {
            name: None,
            type_name: None,
            type_text: String::new(),
            pointer: false,
        });
    if receiver.type_name.is_none() {
        debug!(
            method = %position.name,
            receiver = %receiver.type_text,
            "receiver type does not resolve to a name"
        );
    }

    let found = match node.child_by_field_name("body") {
        Some(body) => interaction::analyze(body, file.source(), receiver.name.as_deref()),
        None => interaction::Interactions::default(),
    };

    MethodDecl {
        position,
        callable: callable(file, node, receiver_list),
        receiver,
        fields_accessed: found.fields_accessed,
        methods_called: found.methods_called,
    }
}

/// Every struct declared by a `type_declaration`, grouped or not, including
/// aliases of struct literals (`type A = struct{...}`). Methods are attached
/// later by the scout.
pub fn struct_decls(file: &SourceFile, node: Node) -> Vec<StructDecl> {
    let specs: Vec<Node> = named_children(node)
        .into_iter()
        .filter(|n| matches!(n.kind(), "type_spec" | "type_alias"))
        .collect();
    let grouped = specs.len() != 1 || named_children(node).len() != 1;

    let mut structs = Vec::new();
    for spec in specs {
        let Some(struct_type) = spec
            .child_by_field_name("type")
            .filter(|t| t.kind() == "struct_type")
        else {
            continue;
        };

        let own = doc_comments(spec);
        let doc_nodes = if own.is_empty() { doc_comments(node) } else { own };
        let source = if grouped {
            format!("type {}", file.text(spec))
        } else {
            file.text(node).to_string()
        };
        let body = first_named_child(struct_type)
            .map(|list| file.text(list).to_string())
            .unwrap_or_else(|| "{}".to_string());

        structs.push(StructDecl {
            position: position_with_doc(file, spec, &doc_nodes),
            fields: struct_fields(file, struct_type),
            type_params: spec
                .child_by_field_name("type_parameters")
                .map(|tp| type_param_names(file, tp))
                .unwrap_or_default(),
            methods: Vec::new(),
            body,
            source,
            comments: raw_comments(file, &doc_nodes),
        });
    }
    structs
}

fn callable(file: &SourceFile, node: Node, receiver: Option<Node>) -> Callable {
    let params = node
        .child_by_field_name("parameters")
        .map(|list| parameters(file, list))
        .unwrap_or_default();
    let returns = node
        .child_by_field_name("result")
        .map(|result| results(file, result))
        .unwrap_or_default();
    let type_params = node
        .child_by_field_name("type_parameters")
        .map(|tp| type_param_names(file, tp))
        .unwrap_or_default();
    let body = node
        .child_by_field_name("body")
        .map(|b| file.text(b).to_string())
        .unwrap_or_default();

    Callable {
        params,
        returns,
        type_params,
        signature: build_signature(file, node, receiver),
        body,
        source: file.text(node).to_string(),
        comments: raw_comments(file, &doc_comments(node)),
    }
}

/// `func (r *T) Name[T any](params) results`
fn build_signature(file: &SourceFile, node: Node, receiver: Option<Node>) -> String {
    let mut sig = String::from("func ");
    if let Some(recv) = receiver {
        sig.push_str(file.text(recv));
        sig.push(' ');
    }
    if let Some(name) = node.child_by_field_name("name") {
        sig.push_str(file.text(name));
    }
    if let Some(tp) = node.child_by_field_name("type_parameters") {
        sig.push_str(file.text(tp));
    }
    if let Some(params) = node.child_by_field_name("parameters") {
        sig.push_str(file.text(params));
    }
    if let Some(result) = node.child_by_field_name("result") {
        sig.push(' ');
        sig.push_str(file.text(result));
    }
    sig
}

/// One entry per declared name; unnamed parameters get an empty name.
fn parameters(file: &SourceFile, list: Node) -> Vec<NamedType> {
    let mut params = Vec::new();
    for decl in named_children(list) {
        let variadic = match decl.kind() {
            "parameter_declaration" => false,
            "variadic_parameter_declaration" => true,
            _ => continue,
        };
        let mut type_name = decl
            .child_by_field_name("type")
            .map(|t| type_text(file, t))
            .unwrap_or_default();
        if variadic {
            type_name.insert_str(0, "...");
        }

        let mut cursor = decl.walk();
        let names: Vec<Node> = decl.children_by_field_name("name", &mut cursor).collect();
        if names.is_empty() {
            params.push(NamedType::new("", type_name));
        } else {
            for name in names {
                params.push(NamedType::new(file.text(name), type_name.clone()));
            }
        }
    }
    params
}

/// One type per returned value, so `(a, b int)` yields two `int`s.
fn results(file: &SourceFile, result: Node) -> Vec<String> {
    if result.kind() == "parameter_list" {
        parameters(file, result)
            .into_iter()
            .map(|p| p.type_name)
            .collect()
    } else {
        vec![type_text(file, result)]
    }
}

fn type_param_names(file: &SourceFile, list: Node) -> Vec<String> {
    let mut names = Vec::new();
    for decl in named_children(list) {
        if decl.kind() != "type_parameter_declaration" {
            continue;
        }
        let mut cursor = decl.walk();
        for name in decl.children_by_field_name("name", &mut cursor) {
            names.push(file.text(name).to_string());
        }
    }
    names
}

/// Named fields yield one entry per name; embedded fields are named after
/// their type, as Go does.
fn struct_fields(file: &SourceFile, struct_type: Node) -> Vec<NamedType> {
    let Some(list) = first_named_child(struct_type) else {
        return Vec::new();
    };

    let mut fields = Vec::new();
    for decl in named_children(list) {
        if decl.kind() != "field_declaration" {
            continue;
        }
        let Some(ty) = decl.child_by_field_name("type") else {
            continue;
        };

        let mut cursor = decl.walk();
        let names: Vec<Node> = decl.children_by_field_name("name", &mut cursor).collect();
        if names.is_empty() {
            let embedded = collapse_whitespace(&file.source()[decl.start_byte()..ty.end_byte()]);
            let name = base_type_name(file, ty)
                .map(|n| n.rsplit('.').next().unwrap_or_default().to_string())
                .unwrap_or_default();
            fields.push(NamedType::new(name, embedded));
        } else {
            let type_name = type_text(file, ty);
            for name in names {
                fields.push(NamedType::new(file.text(name), type_name.clone()));
            }
        }
    }
    fields
}

fn receiver(file: &SourceFile, list: Node) -> Receiver {
    let Some(decl) = named_children(list)
        .into_iter()
        .find(|n| n.kind() == "parameter_declaration")
    else {
        return Receiver {
            name: None,
            type_name: None,
            type_text: file.text(list).to_string(),
            pointer: false,
        };
    };

    let name = decl
        .child_by_field_name("name")
        .map(|n| file.text(n).to_string());
    let ty = decl.child_by_field_name("type");
    let (type_name, pointer) = match ty {
        Some(t) if t.kind() == "pointer_type" => {
            (first_named_child(t).and_then(|inner| base_type_name(file, inner)), true)
        }
        Some(t) => (base_type_name(file, t), false),
        None => (None, false),
    };

    Receiver {
        name,
        type_name,
        type_text: ty.map(|t| type_text(file, t)).unwrap_or_default(),
        pointer,
    }
}

/// `T`, `pkg.T` and the generic forms `T[K]`, `pkg.T[K]`; nothing else has a name.
fn base_type_name(file: &SourceFile, ty: Node) -> Option<String> {
    match ty.kind() {
        "type_identifier" => Some(file.text(ty).to_string()),
        "qualified_type" => {
            let package = ty.child_by_field_name("package")?;
            let name = ty.child_by_field_name("name")?;
            Some(format!("{}.{}", file.text(package), file.text(name)))
        }
        "generic_type" => base_type_name(file, ty.child_by_field_name("type")?),
        _ => None,
    }
}

fn position(file: &SourceFile, decl: Node) -> Position {
    position_with_doc(file, decl, &doc_comments(decl))
}

fn position_with_doc(file: &SourceFile, decl: Node, docs: &[Node]) -> Position {
    let name = decl
        .child_by_field_name("name")
        .map(|n| file.text(n).to_string())
        .unwrap_or_default();
    let start = decl.start_position();
    let doc = doc_text(file, docs);
    Position {
        exported: Position::is_exported_name(&name),
        name,
        path: file.path().to_string(),
        line: start.row + 1,
        column: start.column + 1,
        doc: if doc.is_empty() { None } else { Some(doc) },
    }
}

/// The contiguous comment lines ending directly above `node`.
fn doc_comments(node: Node) -> Vec<Node> {
    let mut comments = Vec::new();
    let mut next_row = node.start_position().row;
    let mut current = node.prev_sibling();
    while let Some(prev) = current {
        if prev.kind() != "comment" || prev.end_position().row + 1 != next_row {
            break;
        }
        // trailing comment of the previous statement
        if prev
            .prev_named_sibling()
            .is_some_and(|p| p.end_position().row == prev.start_position().row)
        {
            break;
        }
        comments.push(prev);
        next_row = prev.start_position().row;
        current = prev.prev_sibling();
    }
    comments.reverse();
    comments
}

fn raw_comments(file: &SourceFile, comments: &[Node]) -> String {
    comments
        .iter()
        .map(|c| file.text(*c))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Comment text with markers removed, directives dropped, and outer blank
/// space trimmed.
fn doc_text(file: &SourceFile, comments: &[Node]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for comment in comments {
        let raw = file.text(*comment);
        if let Some(line) = raw.strip_prefix("//") {
            if line.starts_with("go:") || line.starts_with("line ") {
                continue;
            }
            lines.push(line.strip_prefix(' ').unwrap_or(line).to_string());
        } else {
            let inner = raw
                .strip_prefix("/*")
                .and_then(|r| r.strip_suffix("*/"))
                .unwrap_or(raw);
            lines.extend(inner.lines().map(str::to_string));
        }
    }
    lines.join("\n").trim().to_string()
}

fn type_text(file: &SourceFile, node: Node) -> String {
    collapse_whitespace(file.text(node))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn first_named_child(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let first = node.named_children(&mut cursor).next();
    first
}


#[cfg(test)]
mod tests {
    use super::*;

    fn file(source: &str) -> SourceFile {
        SourceFile::from_source("test.go", source).unwrap()
    }

    fn top_level<'a>(file: &'a SourceFile, kind: &str) -> Vec<Node<'a>> {
        named_children(file.root())
            .into_iter()
            .filter(|n| n.kind() == kind)
            .collect()
    }

    #[test]
    fn function_params_and_returns() {
        let f = file("package p\n\nfunc Split(s, sep string, n int) ([]string, error) {\n\treturn nil, nil\n}\n");
        let node = top_level(&f, "function_declaration")[0];
        let decl = function_decl(&f, node);
        assert_eq!(decl.position.name, "Split");
        assert_eq!(decl.position.line, 3);
        assert_eq!(decl.position.column, 1);
        assert!(decl.position.exported);
        assert_eq!(
            decl.callable.params,
            vec![
                NamedType::new("s", "string"),
                NamedType::new("sep", "string"),
                NamedType::new("n", "int"),
            ]
        );
        assert_eq!(decl.callable.returns, vec!["[]string", "error"]);
        assert_eq!(decl.callable.signature, "func Split(s, sep string, n int) ([]string, error)");
    }

    #[test]
    fn unnamed_variadic_and_named_results() {
        let f = file("package p\n\nfunc f(int, ...string) (a, b int) { return }\n");
        let decl = function_decl(&f, top_level(&f, "function_declaration")[0]);
        assert_eq!(
            decl.callable.params,
            vec![NamedType::new("", "int"), NamedType::new("", "...string")]
        );
        assert_eq!(decl.callable.returns, vec!["int", "int"]);
        assert!(!decl.position.exported);
    }

    #[test]
    fn single_simple_result() {
        let f = file("package p\n\nfunc Get() map[string]int { return nil }\n");
        let decl = function_decl(&f, top_level(&f, "function_declaration")[0]);
        assert_eq!(decl.callable.returns, vec!["map[string]int"]);
        assert!(decl.callable.params.is_empty());
        assert_eq!(decl.callable.body, "{ return nil }");
    }

    #[test]
    fn doc_comment_is_collected_and_cleaned() {
        let f = file(
            "package p\n\n// Unrelated\n\n// Above above function\n// Above function\n// Function\nfunc Greet() {}\n",
        );
        let decl = function_decl(&f, top_level(&f, "function_declaration")[0]);
        assert_eq!(
            decl.position.doc.as_deref(),
            Some("Above above function\nAbove function\nFunction")
        );
        assert_eq!(
            decl.callable.comments,
            "// Above above function\n// Above function\n// Function"
        );
        assert!(decl.callable.definition().starts_with("// Above above function\n"));
        assert!(decl.callable.definition().ends_with("func Greet() {}"));
    }

    #[test]
    fn no_doc_comment_when_separated_by_blank_line() {
        let f = file("package p\n\n// Below function\n\nfunc F() {}\n");
        let decl = function_decl(&f, top_level(&f, "function_declaration")[0]);
        assert_eq!(decl.position.doc, None);
        assert_eq!(decl.callable.definition(), "func F() {}");
    }

    #[test]
    fn method_receiver_forms() {
        let f = file(
            r#"package p

func (p *Person) A() {}
func (p Person) B() {}
func (p *geo.Point) C() {}
func (l *List[T]) D() {}
func (Person) E() {}
"#,
        );
        let methods: Vec<MethodDecl> = top_level(&f, "method_declaration")
            .into_iter()
            .map(|n| method_decl(&f, n))
            .collect();
        let summary: Vec<(Option<&str>, Option<&str>, bool)> = methods
            .iter()
            .map(|m| (m.receiver.name.as_deref(), m.receiver.type_name.as_deref(), m.receiver.pointer))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Some("p"), Some("Person"), true),
                (Some("p"), Some("Person"), false),
                (Some("p"), Some("geo.Point"), true),
                (Some("l"), Some("List"), true),
                (None, Some("Person"), false),
            ]
        );
        assert_eq!(methods[0].callable.signature, "func (p *Person) A()");
    }

    #[test]
    fn method_collects_interactions() {
        let f = file("package p\n\nfunc (c *Car) Describe() string {\n\treturn c.format(c.Make, c.Model)\n}\n");
        let method = method_decl(&f, top_level(&f, "method_declaration")[0]);
        assert_eq!(method.fields_accessed.as_slice(), ["Make", "Model"]);
        assert_eq!(method.methods_called.as_slice(), ["format"]);
        assert_eq!(method.callable.returns, vec!["string"]);
    }

    #[test]
    fn struct_fields_and_embedding() {
        let f = file(
            r#"package p

// Person is a person.
type Person struct {
	Name, Nick string
	Age        int
	*log.Logger
	sync.Mutex
	Base
}
"#,
        );
        let structs = struct_decls(&f, top_level(&f, "type_declaration")[0]);
        assert_eq!(structs.len(), 1);
        let s = &structs[0];
        assert_eq!(s.position.name, "Person");
        assert_eq!(s.position.line, 4);
        assert_eq!(s.position.column, 6);
        assert_eq!(s.position.doc.as_deref(), Some("Person is a person."));
        assert_eq!(
            s.fields,
            vec![
                NamedType::new("Name", "string"),
                NamedType::new("Nick", "string"),
                NamedType::new("Age", "int"),
                NamedType::new("Logger", "*log.Logger"),
                NamedType::new("Mutex", "sync.Mutex"),
                NamedType::new("Base", "Base"),
            ]
        );
        assert!(s.source.starts_with("type Person struct {"));
        assert!(s.body.starts_with('{') && s.body.ends_with('}'));
    }

    #[test]
    fn grouped_type_declaration_yields_each_struct() {
        let f = file(
            r#"package p

type (
	// A is first.
	A struct{ X int }
	Alias = int
	B[K comparable, V any] struct {
		m map[K]V
	}
	ID string
)
"#,
        );
        let structs = struct_decls(&f, top_level(&f, "type_declaration")[0]);
        let names: Vec<&str> = structs.iter().map(|s| s.position.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(structs[0].position.doc.as_deref(), Some("A is first."));
        assert_eq!(structs[0].source, "type A struct{ X int }");
        assert_eq!(structs[1].type_params, vec!["K", "V"]);
        assert_eq!(structs[1].signature(), "B[K, V]");
        assert_eq!(structs[1].fields, vec![NamedType::new("m", "map[K]V")]);
    }

    #[test]
    fn struct_literal_alias_is_a_struct() {
        let f = file("package p\n\n// Point is an alias.\ntype Point = struct {\n\tX, Y int\n}\n");
        let structs = struct_decls(&f, top_level(&f, "type_declaration")[0]);
        assert_eq!(structs.len(), 1);
        assert_eq!(structs[0].position.name, "Point");
        assert_eq!(structs[0].position.doc.as_deref(), Some("Point is an alias."));
        assert_eq!(
            structs[0].fields,
            vec![NamedType::new("X", "int"), NamedType::new("Y", "int")]
        );
        assert!(structs[0].source.starts_with("type Point = struct {"));
    }

    #[test]
    fn non_struct_types_are_skipped() {
        let f = file("package p\n\ntype Reader interface { Read() }\n");
        assert!(struct_decls(&f, top_level(&f, "type_declaration")[0]).is_empty());
    }
}
