//! Query configuration for each declaration kind, and the pre-flight checks
//! every query passes before a file is traversed.

use crate::decl::{DeclKind, NamedType};
use crate::error::ScoutError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Filters for plain functions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FunctionQuery {
    /// Exact name; `None` or empty accepts any name.
    pub name: Option<String>,
    pub params: Vec<NamedType>,
    pub returns: Vec<String>,
    pub no_params: Option<bool>,
    pub no_returns: Option<bool>,
    pub exact: bool,
}

/// Filters for methods. Shares the callable filters of [`FunctionQuery`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MethodQuery {
    pub name: Option<String>,
    pub params: Vec<NamedType>,
    pub returns: Vec<String>,
    pub no_params: Option<bool>,
    pub no_returns: Option<bool>,
    /// Resolved receiver type name, e.g. `Person` or `geo.Point`.
    pub receiver: Option<String>,
    pub pointer_receiver: Option<bool>,
    /// Receiver fields the body must read.
    pub fields: Vec<String>,
    /// Receiver methods the body must call.
    pub methods: Vec<String>,
    pub no_fields: Option<bool>,
    pub no_methods: Option<bool>,
    pub exact: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StructQuery {
    pub name: Option<String>,
    pub fields: Vec<NamedType>,
    pub no_fields: Option<bool>,
    pub exact: bool,
}

/// A query for any declaration kind, as written in a query file:
///
/// ```toml
/// kind = "method"
/// receiver = "Person"
/// fields = ["Age"]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Query {
    Function(FunctionQuery),
    Method(MethodQuery),
    Struct(StructQuery),
}

/// A list filter and the presence flag that may contradict it.
struct FlagPair {
    list: &'static str,
    len: usize,
    flag: &'static str,
    value: Option<bool>,
}

impl FlagPair {
    fn new(list: &'static str, len: usize, flag: &'static str, value: Option<bool>) -> Self {
        FlagPair { list, len, flag, value }
    }

    fn check(&self) -> Result<(), ScoutError> {
        match self.value {
            Some(true) if self.len > 0 => Err(ScoutError::InvalidQuery(format!(
                "{} cannot be specified if {} is set to true",
                self.list, self.flag
            ))),
            Some(false) if self.len > 0 => Err(ScoutError::InvalidQuery(format!(
                "no need to specify {} if {} is set to false",
                self.list, self.flag
            ))),
            _ => Ok(()),
        }
    }

    fn is_used(&self) -> bool {
        self.len > 0 || self.value.is_some()
    }
}

fn check_pairs(pairs: &[FlagPair], exact: bool) -> Result<(), ScoutError> {
    for pair in pairs {
        pair.check()?;
    }
    if exact && !pairs.iter().any(FlagPair::is_used) {
        return Err(ScoutError::InvalidQuery(
            "exact should not be true if no lists or flags are passed".to_string(),
        ));
    }
    Ok(())
}

fn check_named(list: &str, items: &[NamedType]) -> Result<(), ScoutError> {
    if items.iter().any(NamedType::is_blank) {
        return Err(ScoutError::InvalidQuery(format!(
            "{}: at least one of the type or name must be defined",
            list
        )));
    }
    Ok(())
}

impl FunctionQuery {
    pub fn validate(&self) -> Result<(), ScoutError> {
        check_named("params", &self.params)?;
        check_pairs(
            &[
                FlagPair::new("params", self.params.len(), "no_params", self.no_params),
                FlagPair::new("returns", self.returns.len(), "no_returns", self.no_returns),
            ],
            self.exact,
        )
    }

    /// True when no filter at all is set.
    pub fn is_empty(&self) -> bool {
        *self == FunctionQuery::default()
    }
}

impl MethodQuery {
    pub fn validate(&self) -> Result<(), ScoutError> {
        check_named("params", &self.params)?;
        check_pairs(
            &[
                FlagPair::new("params", self.params.len(), "no_params", self.no_params),
                FlagPair::new("returns", self.returns.len(), "no_returns", self.no_returns),
                FlagPair::new("fields", self.fields.len(), "no_fields", self.no_fields),
                FlagPair::new("methods", self.methods.len(), "no_methods", self.no_methods),
            ],
            self.exact,
        )
    }

    pub fn is_empty(&self) -> bool {
        *self == MethodQuery::default()
    }

    /// Whether the query constrains the receiver at all. Methods whose
    /// receiver type cannot be resolved never satisfy such a query.
    pub fn filters_receiver(&self) -> bool {
        self.receiver.as_deref().is_some_and(|r| !r.is_empty()) || self.pointer_receiver.is_some()
    }
}

impl StructQuery {
    pub fn validate(&self) -> Result<(), ScoutError> {
        check_named("fields", &self.fields)?;
        check_pairs(
            &[FlagPair::new("fields", self.fields.len(), "no_fields", self.no_fields)],
            self.exact,
        )
    }
}

impl Query {
    pub fn kind(&self) -> DeclKind {
        match self {
            Query::Function(_) => DeclKind::Function,
            Query::Method(_) => DeclKind::Method,
            Query::Struct(_) => DeclKind::Struct,
        }
    }

    pub fn validate(&self) -> Result<(), ScoutError> {
        match self {
            Query::Function(q) => q.validate(),
            Query::Method(q) => q.validate(),
            Query::Struct(q) => q.validate(),
        }
    }

    /// Parse a TOML query. `origin` names the source in error messages.
    pub fn from_toml_str(origin: &str, text: &str) -> Result<Self, ScoutError> {
        toml::from_str(text).map_err(|e| ScoutError::QueryFile {
            path: origin.to_string(),
            source: e,
        })
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ScoutError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScoutError::PathNotFound(path.display().to_string()));
        }
        let text = fs::read_to_string(path).map_err(|e| ScoutError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Query::from_toml_str(&path.display().to_string(), &text)
    }
}

impl From<FunctionQuery> for Query {
    fn from(value: FunctionQuery) -> Self {
        Query::Function(value)
    }
}

impl From<MethodQuery> for Query {
    fn from(value: MethodQuery) -> Self {
        Query::Method(value)
    }
}

impl From<StructQuery> for Query {
    fn from(value: StructQuery) -> Self {
        Query::Struct(value)
    }
}
