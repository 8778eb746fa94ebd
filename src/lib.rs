mod error;
mod languages;
mod matcher;
mod output;
mod parser;
pub mod decl;
pub mod query;
pub mod scout;

use std::path::Path;

pub use decl::{Decl, DeclKind, Declaration, FunctionDecl, MethodDecl, NamedType, Position, StructDecl};
pub use error::ScoutError;
pub use languages::Language;
pub use matcher::{matches, TypeItem};
pub use output::{render, OutputFormat, Part};
pub use parser::SourceFile;
pub use query::{FunctionQuery, MethodQuery, Query, StructQuery};
pub use scout::{Declarations, Mode};

/// First function in the file at `path` matching `query`.
pub fn scout_function(path: impl AsRef<Path>, query: &FunctionQuery) -> Result<FunctionDecl, ScoutError> {
    query.validate()?;
    let file = SourceFile::open(path)?;
    first(scout::functions(&file, query), DeclKind::Function)
}

/// Every function in the file at `path` matching `query`, in source order.
pub fn scout_functions(path: impl AsRef<Path>, query: &FunctionQuery) -> Result<Vec<FunctionDecl>, ScoutError> {
    query.validate()?;
    let file = SourceFile::open(path)?;
    scout::collect(scout::functions(&file, query), Mode::All, DeclKind::Function)
}

pub fn scout_method(path: impl AsRef<Path>, query: &MethodQuery) -> Result<MethodDecl, ScoutError> {
    query.validate()?;
    let file = SourceFile::open(path)?;
    first(scout::methods(&file, query), DeclKind::Method)
}

pub fn scout_methods(path: impl AsRef<Path>, query: &MethodQuery) -> Result<Vec<MethodDecl>, ScoutError> {
    query.validate()?;
    let file = SourceFile::open(path)?;
    scout::collect(scout::methods(&file, query), Mode::All, DeclKind::Method)
}

/// First struct matching `query`, with its methods attached.
pub fn scout_struct(path: impl AsRef<Path>, query: &StructQuery) -> Result<StructDecl, ScoutError> {
    query.validate()?;
    let file = SourceFile::open(path)?;
    first(scout::structs(&file, query), DeclKind::Struct)
}

pub fn scout_structs(path: impl AsRef<Path>, query: &StructQuery) -> Result<Vec<StructDecl>, ScoutError> {
    query.validate()?;
    let file = SourceFile::open(path)?;
    scout::collect(scout::structs(&file, query), Mode::All, DeclKind::Struct)
}

/// Run any query against an already parsed file.
pub fn scout(file: &SourceFile, query: &Query, mode: Mode) -> Result<Vec<Decl>, ScoutError> {
    query.validate()?;
    scout::run(file, query, mode)
}

fn first<T>(mut iter: impl Iterator<Item = T>, kind: DeclKind) -> Result<T, ScoutError> {
    iter.next().ok_or(ScoutError::NotFound { kind })
}
