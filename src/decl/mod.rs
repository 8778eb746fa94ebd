pub mod go;
pub mod interaction;

use crate::error::ScoutError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use interaction::NameSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Function,
    Method,
    Struct,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeclKind::Function => "function",
            DeclKind::Method => "method",
            DeclKind::Struct => "struct",
        };
        f.write_str(name)
    }
}

/// Identity and location shared by every declaration kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub name: String,
    pub path: String,
    /// 1-based
    pub line: usize,
    /// 1-based byte column
    pub column: usize,
    pub exported: bool,
    pub doc: Option<String>,
}

impl Position {
    /// Go exports an identifier when it starts with an uppercase letter.
    pub fn is_exported_name(name: &str) -> bool {
        name.chars().next().is_some_and(char::is_uppercase)
    }
}

/// A `(name, type)` pair. An empty name means "any binding, match by type";
/// an empty type means "any type bound to this name".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct NamedType {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl NamedType {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        NamedType {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// Both halves empty carries no constraint at all and is rejected by validation.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.type_name.is_empty()
    }
}

impl FromStr for NamedType {
    type Err = ScoutError;

    /// Parse `name:type`, `name:` or `:type`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.matches(':').count() != 1 {
            return Err(ScoutError::InvalidQuery(format!(
                "`{}`: there must be exactly one colon separating the name and type",
                s
            )));
        }
        let (name, type_name) = s.split_once(':').unwrap_or((s, ""));
        let named = NamedType::new(name.trim(), type_name.trim());
        if named.is_blank() {
            return Err(ScoutError::InvalidQuery(
                "at least one of the type or name must be defined".to_string(),
            ));
        }
        Ok(named)
    }
}

impl TryFrom<String> for NamedType {
    type Error = ScoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.type_name)
    }
}

/// Text spans and type lists shared by functions and methods.
#[derive(Debug, Clone, Serialize)]
pub struct Callable {
    pub params: Vec<NamedType>,
    pub returns: Vec<String>,
    pub type_params: Vec<String>,
    pub signature: String,
    pub body: String,
    /// Declaration text without its doc comment.
    pub source: String,
    /// Raw doc comment lines, markers included.
    pub comments: String,
}

impl Callable {
    /// The declaration preceded by its doc comment, if any.
    pub fn definition(&self) -> String {
        if self.comments.is_empty() {
            self.source.clone()
        } else {
            format!("{}\n{}", self.comments, self.source)
        }
    }

    /// `T`, `(A, B)`, or empty when nothing is returned.
    pub fn return_type(&self) -> String {
        match self.returns.len() {
            0 => String::new(),
            1 => self.returns[0].clone(),
            _ => format!("({})", self.returns.join(", ")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDecl {
    pub position: Position,
    #[serde(flatten)]
    pub callable: Callable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receiver {
    /// Binding name; `None` for `func (T) M()`.
    pub name: Option<String>,
    /// Resolved type name such as `Point` or `geo.Point`.
    pub type_name: Option<String>,
    /// Receiver type exactly as written.
    pub type_text: String,
    pub pointer: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodDecl {
    pub position: Position,
    #[serde(flatten)]
    pub callable: Callable,
    pub receiver: Receiver,
    pub fields_accessed: NameSet,
    pub methods_called: NameSet,
}

impl MethodDecl {
    /// Resolved receiver type name, or `AmbiguousReceiver` when the receiver
    /// type expression has no name.
    pub fn receiver_type(&self) -> Result<&str, ScoutError> {
        self.receiver
            .type_name
            .as_deref()
            .ok_or_else(|| ScoutError::AmbiguousReceiver {
                method: self.position.name.clone(),
                receiver: self.receiver.type_text.clone(),
            })
    }

    pub fn has_pointer_receiver(&self) -> bool {
        self.receiver.pointer
    }

    pub fn receiver_name(&self) -> Option<&str> {
        self.receiver.name.as_deref()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StructDecl {
    pub position: Position,
    pub fields: Vec<NamedType>,
    pub type_params: Vec<String>,
    /// Methods whose receiver type names this struct, in source order.
    pub methods: Vec<MethodDecl>,
    pub body: String,
    pub source: String,
    pub comments: String,
}

impl StructDecl {
    /// `Name` or `Name[K, V]` for generic structs.
    pub fn signature(&self) -> String {
        if self.type_params.is_empty() {
            self.position.name.clone()
        } else {
            format!("{}[{}]", self.position.name, self.type_params.join(", "))
        }
    }

    pub fn definition(&self) -> String {
        if self.comments.is_empty() {
            self.source.clone()
        } else {
            format!("{}\n{}", self.comments, self.source)
        }
    }
}

/// Any declaration a scout can return.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Decl {
    Function(FunctionDecl),
    Method(MethodDecl),
    Struct(StructDecl),
}

/// Identity accessors common to all declaration kinds.
pub trait Declaration {
    fn position(&self) -> &Position;
    fn kind(&self) -> DeclKind;

    fn name(&self) -> &str {
        &self.position().name
    }

    fn is_exported(&self) -> bool {
        self.position().exported
    }
}

impl Declaration for FunctionDecl {
    fn position(&self) -> &Position {
        &self.position
    }

    fn kind(&self) -> DeclKind {
        DeclKind::Function
    }
}

impl Declaration for MethodDecl {
    fn position(&self) -> &Position {
        &self.position
    }

    fn kind(&self) -> DeclKind {
        DeclKind::Method
    }
}

impl Declaration for StructDecl {
    fn position(&self) -> &Position {
        &self.position
    }

    fn kind(&self) -> DeclKind {
        DeclKind::Struct
    }
}

impl Declaration for Decl {
    fn position(&self) -> &Position {
        match self {
            Decl::Function(f) => &f.position,
            Decl::Method(m) => &m.position,
            Decl::Struct(s) => &s.position,
        }
    }

    fn kind(&self) -> DeclKind {
        match self {
            Decl::Function(_) => DeclKind::Function,
            Decl::Method(_) => DeclKind::Method,
            Decl::Struct(_) => DeclKind::Struct,
        }
    }
}

impl From<FunctionDecl> for Decl {
    fn from(value: FunctionDecl) -> Self {
        Decl::Function(value)
    }
}

impl From<MethodDecl> for Decl {
    fn from(value: MethodDecl) -> Self {
        Decl::Method(value)
    }
}

impl From<StructDecl> for Decl {
    fn from(value: StructDecl) -> Self {
        Decl::Struct(value)
    }
}
