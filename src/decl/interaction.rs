//! Receiver interaction analysis.
//!
//! Walks a method body and sorts every `recv.member` expression into fields
//! read and methods called. A selector counts as a call only when it is the
//! callee of its immediate parent `call_expression`, so the walk keeps an
//! explicit ancestor stack.

use serde::Serialize;
use tracing::trace;
use tree_sitter::Node;

/// Insertion-ordered set of names. Append-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameSet(Vec<String>);

impl NameSet {
    /// Returns `false` when the name was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.0.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// What a method body does with its receiver.
#[derive(Debug, Default, PartialEq)]
pub struct Interactions {
    pub fields_accessed: NameSet,
    pub methods_called: NameSet,
}

/// Classify receiver member accesses in `body`. An anonymous receiver yields
/// two empty sets.
pub fn analyze(body: Node, source: &str, receiver: Option<&str>) -> Interactions {
    let mut found = Interactions::default();
    let receiver = match receiver {
        Some(name) if !name.is_empty() && name != "_" => name,
        _ => return found,
    };

    let mut ancestors: Vec<Node> = Vec::new();
    let mut cursor = body.walk();
    loop {
        let node = cursor.node();
        if node.kind() == "selector_expression" {
            classify(node, ancestors.last().copied(), source, receiver, &mut found);
        }

        if cursor.goto_first_child() {
            ancestors.push(node);
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return found;
            }
            ancestors.pop();
        }
    }
}

fn classify(
    selector: Node,
    parent: Option<Node>,
    source: &str,
    receiver: &str,
    found: &mut Interactions,
) {
    let (Some(operand), Some(field)) = (
        selector.child_by_field_name("operand"),
        selector.child_by_field_name("field"),
    ) else {
        return;
    };
    if operand.kind() != "identifier" || &source[operand.byte_range()] != receiver {
        return;
    }

    let member = &source[field.byte_range()];
    let is_callee = parent.is_some_and(|p| {
        p.kind() == "call_expression" && p.child_by_field_name("function") == Some(selector)
    });

    if is_callee {
        trace!(receiver = %receiver, member = %member, "receiver method call");
        found.methods_called.insert(member);
    } else {
        trace!(receiver = %receiver, member = %member, "receiver field access");
        found.fields_accessed.insert(member);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::Language;
    use crate::parser::parse;

    fn analyze_method(source: &str) -> Interactions {
        let tree = parse(source, Language::Go).unwrap();
        let root = tree.root_node();
        let mut cursor = root.walk();
        let method = root
            .named_children(&mut cursor)
            .find(|n| n.kind() == "method_declaration")
            .expect("fixture has a method");
        let body = method.child_by_field_name("body").unwrap();
        let receiver = method
            .child_by_field_name("receiver")
            .and_then(|list| {
                let mut c = list.walk();
                let decl = list.named_children(&mut c).next()?;
                decl.child_by_field_name("name")
            })
            .map(|n| source[n.byte_range()].to_string());
        analyze(body, source, receiver.as_deref())
    }

    #[test]
    fn separates_fields_from_calls() {
        let found = analyze_method(
            r#"package p

func (s *Server) Start() error {
	s.mu.Lock()
	if s.running {
		return s.fail("already running")
	}
	s.running = true
	return s.listen(s.addr)
}
"#,
        );
        assert_eq!(found.fields_accessed.as_slice(), ["mu", "running", "addr"]);
        assert_eq!(found.methods_called.as_slice(), ["fail", "listen"]);
        assert!(!found.fields_accessed.contains("listen"));
    }

    #[test]
    fn method_value_is_not_a_call() {
        let found = analyze_method(
            r#"package p

func (s *Server) Handler() func() {
	return s.serve
}
"#,
        );
        assert_eq!(found.fields_accessed.as_slice(), ["serve"]);
        assert!(found.methods_called.is_empty());
    }

    #[test]
    fn selector_used_as_argument_is_a_field() {
        let found = analyze_method(
            r#"package p

func (c *Counter) Report() {
	fmt.Println(c.total)
	c.inc()
}
"#,
        );
        assert_eq!(found.fields_accessed.as_slice(), ["total"]);
        assert_eq!(found.methods_called.as_slice(), ["inc"]);
    }

    #[test]
    fn ignores_other_identifiers() {
        let found = analyze_method(
            r#"package p

func (c *Counter) Merge(other *Counter) {
	c.total += other.total
	other.reset()
}
"#,
        );
        assert_eq!(found.fields_accessed.as_slice(), ["total"]);
        assert!(found.methods_called.is_empty());
    }

    #[test]
    fn anonymous_receiver_yields_empty_sets() {
        let found = analyze_method(
            r#"package p

func (*Counter) Kind() string {
	return "counter"
}
"#,
        );
        assert_eq!(found, Interactions::default());
    }

    #[test]
    fn duplicates_recorded_once() {
        let found = analyze_method(
            r#"package p

func (p *Person) Birthday() {
	p.Age++
	p.Age = p.Age + 0
	p.save()
	p.save()
}
"#,
        );
        assert_eq!(found.fields_accessed.len(), 1);
        assert_eq!(found.methods_called.len(), 1);
    }

    #[test]
    fn name_set_keeps_first_discovery_order() {
        let mut set = NameSet::default();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b", "a"]);
    }
}
