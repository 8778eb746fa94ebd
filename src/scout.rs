//! Declaration traversal.
//!
//! [`Declarations`] walks the top-level declarations of one file in source
//! order and builds each [`Decl`] only when it is pulled, so taking the first
//! match stops the walk early and taking all matches runs it to the end.

use crate::decl::go;
use crate::decl::{Decl, DeclKind, Declaration, FunctionDecl, MethodDecl, StructDecl};
use crate::error::ScoutError;
use crate::matcher::matches;
use crate::parser::SourceFile;
use crate::query::{FunctionQuery, MethodQuery, Query, StructQuery};
use std::collections::VecDeque;
use tracing::{debug, trace};
use tree_sitter::Node;

/// How many matches a traversal should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    First,
    All,
}

/// Lazy iterator over the declarations of one file.
pub struct Declarations<'f> {
    file: &'f SourceFile,
    nodes: std::vec::IntoIter<Node<'f>>,
    /// Structs from a grouped `type (...)` declaration not yet yielded.
    pending: VecDeque<StructDecl>,
    kind: Option<DeclKind>,
}

impl<'f> Declarations<'f> {
    /// Every function, method and struct.
    pub fn new(file: &'f SourceFile) -> Self {
        let root = file.root();
        let mut cursor = root.walk();
        let nodes: Vec<Node<'f>> = root.named_children(&mut cursor).collect();
        Declarations {
            file,
            nodes: nodes.into_iter(),
            pending: VecDeque::new(),
            kind: None,
        }
    }

    /// Only declarations of `kind`; other kinds are skipped without being built.
    pub fn of_kind(file: &'f SourceFile, kind: DeclKind) -> Self {
        Declarations {
            kind: Some(kind),
            ..Declarations::new(file)
        }
    }

    fn wants(&self, kind: DeclKind) -> bool {
        self.kind.is_none_or(|k| k == kind)
    }
}

impl Iterator for Declarations<'_> {
    type Item = Decl;

    fn next(&mut self) -> Option<Decl> {
        loop {
            if let Some(decl) = self.pending.pop_front() {
                return Some(decl.into());
            }
            let node = self.nodes.next()?;
            match node.kind() {
                "function_declaration" if self.wants(DeclKind::Function) => {
                    return Some(go::function_decl(self.file, node).into());
                }
                "method_declaration" if self.wants(DeclKind::Method) => {
                    return Some(go::method_decl(self.file, node).into());
                }
                "type_declaration" if self.wants(DeclKind::Struct) => {
                    self.pending.extend(go::struct_decls(self.file, node));
                }
                _ => {}
            }
        }
    }
}

fn name_matches(wanted: Option<&str>, actual: &str) -> bool {
    wanted.is_none_or(|w| w.is_empty() || w == actual)
}

/// `exact` only constrains lists the query names.
fn exact_for<T>(exact: bool, expected: &[T]) -> bool {
    exact && !expected.is_empty()
}

pub fn function_matches(query: &FunctionQuery, decl: &FunctionDecl) -> bool {
    let c = &decl.callable;
    name_matches(query.name.as_deref(), decl.name())
        && matches(&query.params, &c.params, exact_for(query.exact, &query.params), query.no_params)
        && matches(&query.returns, &c.returns, exact_for(query.exact, &query.returns), query.no_returns)
}

/// Name, parameters, returns, receiver interactions, then receiver type and
/// pointer-ness. A method whose receiver type has no name never passes a
/// receiver or pointer filter.
pub fn method_matches(query: &MethodQuery, decl: &MethodDecl) -> bool {
    let c = &decl.callable;
    let callable_ok = name_matches(query.name.as_deref(), decl.name())
        && matches(&query.params, &c.params, exact_for(query.exact, &query.params), query.no_params)
        && matches(&query.returns, &c.returns, exact_for(query.exact, &query.returns), query.no_returns)
        && matches(&query.fields, decl.fields_accessed.as_slice(), false, query.no_fields)
        && matches(&query.methods, decl.methods_called.as_slice(), false, query.no_methods);
    if !callable_ok {
        return false;
    }
    if !query.filters_receiver() {
        return true;
    }

    match decl.receiver_type() {
        Ok(receiver) => {
            name_matches(query.receiver.as_deref(), receiver)
                && query
                    .pointer_receiver
                    .is_none_or(|p| p == decl.has_pointer_receiver())
        }
        Err(e) => {
            trace!(error = %e, "receiver filter skipped");
            false
        }
    }
}

pub fn struct_matches(query: &StructQuery, decl: &StructDecl) -> bool {
    name_matches(query.name.as_deref(), decl.name())
        && matches(&query.fields, &decl.fields, exact_for(query.exact, &query.fields), query.no_fields)
}

fn logged<D: Declaration>(decl: &D, matched: bool) -> bool {
    let position = decl.position();
    if matched {
        debug!(
            kind = %decl.kind(),
            name = %position.name,
            line = position.line,
            "declaration matched"
        );
    } else {
        trace!(kind = %decl.kind(), name = %position.name, "candidate rejected");
    }
    matched
}

/// Matching functions in source order.
pub fn functions<'f>(
    file: &'f SourceFile,
    query: &'f FunctionQuery,
) -> impl Iterator<Item = FunctionDecl> + 'f {
    Declarations::of_kind(file, DeclKind::Function)
        .filter_map(|decl| match decl {
            Decl::Function(f) => Some(f),
            _ => None,
        })
        .filter(move |f| logged(f, function_matches(query, f)))
}

/// Matching methods in source order.
pub fn methods<'f>(
    file: &'f SourceFile,
    query: &'f MethodQuery,
) -> impl Iterator<Item = MethodDecl> + 'f {
    Declarations::of_kind(file, DeclKind::Method)
        .filter_map(|decl| match decl {
            Decl::Method(m) => Some(m),
            _ => None,
        })
        .filter(move |m| logged(m, method_matches(query, m)))
}

/// Matching structs in source order, each carrying the methods declared on it.
///
/// All methods of the file are collected up front, unfiltered, and attached
/// by receiver type name.
pub fn structs<'f>(
    file: &'f SourceFile,
    query: &'f StructQuery,
) -> impl Iterator<Item = StructDecl> + 'f {
    let all_methods: Vec<MethodDecl> = Declarations::of_kind(file, DeclKind::Method)
        .filter_map(|decl| match decl {
            Decl::Method(m) => Some(m),
            _ => None,
        })
        .collect();

    Declarations::of_kind(file, DeclKind::Struct)
        .filter_map(|decl| match decl {
            Decl::Struct(s) => Some(s),
            _ => None,
        })
        .filter(move |s| logged(s, struct_matches(query, s)))
        .map(move |mut s| {
            s.methods = all_methods
                .iter()
                .filter(|m| m.receiver.type_name.as_deref() == Some(s.position.name.as_str()))
                .cloned()
                .collect();
            s
        })
}

/// Run any query over `file`. Zero matches is `NotFound` in both modes.
pub fn run(file: &SourceFile, query: &Query, mode: Mode) -> Result<Vec<Decl>, ScoutError> {
    match query {
        Query::Function(q) => collect(functions(file, q).map(Decl::from), mode, DeclKind::Function),
        Query::Method(q) => collect(methods(file, q).map(Decl::from), mode, DeclKind::Method),
        Query::Struct(q) => collect(structs(file, q).map(Decl::from), mode, DeclKind::Struct),
    }
}

/// Take one or all items, reporting an empty result as `NotFound`.
pub fn collect<T>(
    iter: impl Iterator<Item = T>,
    mode: Mode,
    kind: DeclKind,
) -> Result<Vec<T>, ScoutError> {
    let found: Vec<T> = match mode {
        Mode::First => iter.take(1).collect(),
        Mode::All => iter.collect(),
    };
    if found.is_empty() {
        debug!(kind = %kind, "no declaration matched");
        return Err(ScoutError::NotFound { kind });
    }
    Ok(found)
}
