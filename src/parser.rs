use crate::error::ScoutError;
use crate::languages::{self, Language};
use std::fs;
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// A parsed Go file: the path it came from, its text, and its syntax tree.
pub struct SourceFile {
    path: String,
    source: String,
    tree: Tree,
}

impl SourceFile {
    /// Read and parse a file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScoutError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScoutError::PathNotFound(path.display().to_string()));
        }
        let language = languages::detect_language(path)?;

        let source = fs::read_to_string(path).map_err(|e| ScoutError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        let tree = parse(&source, language)?;
        Ok(SourceFile {
            path: path.display().to_string(),
            source,
            tree,
        })
    }

    /// Parse in-memory Go source. `label` is reported as the path of every declaration.
    pub fn from_source(label: &str, source: impl Into<String>) -> Result<Self, ScoutError> {
        let source = source.into();
        let tree = parse(&source, Language::Go)?;
        Ok(SourceFile {
            path: label.to_string(),
            source,
            tree,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by `node`.
    pub fn text(&self, node: Node) -> &str {
        &self.source[node.byte_range()]
    }
}

/// Parse source code into a Tree-sitter AST, rejecting trees with syntax errors.
pub fn parse(source: &str, language: Language) -> Result<Tree, ScoutError> {
    let mut parser = Parser::new();

    let ts_language = languages::ts_language(language);
    parser
        .set_language(&ts_language)
        .map_err(|e| ScoutError::ParseError(format!("Failed to set language: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ScoutError::ParseError("Failed to parse source code".to_string()))?;

    if let Some(bad) = first_error(tree.root_node()) {
        let pos = bad.start_position();
        return Err(ScoutError::ParseError(format!(
            "syntax error at line {}, column {}",
            pos.row + 1,
            pos.column + 1
        )));
    }

    Ok(tree)
}

fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    Some(node)
}
