pub mod json;
pub mod plain;

use crate::decl::{Decl, DeclKind};
use crate::error::ScoutError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// One view of a matched declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Definition,
    Body,
    Signature,
    Comment,
    Return,
    Receiver,
    ReceiverFields,
    ReceiverMethods,
    Fields,
    Methods,
}

impl Part {
    const ALL: [Part; 10] = [
        Part::Definition,
        Part::Body,
        Part::Signature,
        Part::Comment,
        Part::Return,
        Part::Receiver,
        Part::ReceiverFields,
        Part::ReceiverMethods,
        Part::Fields,
        Part::Methods,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Part::Definition => "definition",
            Part::Body => "body",
            Part::Signature => "signature",
            Part::Comment => "comment",
            Part::Return => "return",
            Part::Receiver => "receiver",
            Part::ReceiverFields => "receiver-fields",
            Part::ReceiverMethods => "receiver-methods",
            Part::Fields => "fields",
            Part::Methods => "methods",
        }
    }

    pub fn applies_to(self, kind: DeclKind) -> bool {
        match self {
            Part::Definition | Part::Body | Part::Signature | Part::Comment => true,
            Part::Return => kind != DeclKind::Struct,
            Part::Receiver | Part::ReceiverFields | Part::ReceiverMethods => kind == DeclKind::Method,
            Part::Fields | Part::Methods => kind == DeclKind::Struct,
        }
    }

    /// `InvalidQuery` when this part has no meaning for `kind`.
    pub fn check(self, kind: DeclKind) -> Result<(), ScoutError> {
        if self.applies_to(kind) {
            return Ok(());
        }
        Err(ScoutError::InvalidQuery(format!(
            "output part `{}` does not apply to a {}; expected one of: {}",
            self,
            kind,
            Part::options_for(kind)
        )))
    }

    /// Comma-separated names of the parts valid for `kind`.
    pub fn options_for(kind: DeclKind) -> String {
        Part::ALL
            .iter()
            .filter(|p| p.applies_to(kind))
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Part {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Part::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown output part `{}`", s))
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render matched declarations in the requested format.
pub fn render(decls: &[Decl], part: Part, format: OutputFormat) -> Result<String, ScoutError> {
    match format {
        OutputFormat::Plain => plain::format_output(decls, part),
        OutputFormat::Json => json::format_output(decls),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_names_roundtrip() {
        for part in Part::ALL {
            assert_eq!(part.as_str().parse::<Part>().unwrap(), part);
        }
        assert_eq!(Part::ReceiverFields.to_string(), "receiver-fields");
        assert!("everything".parse::<Part>().is_err());
    }

    #[test]
    fn parts_per_kind() {
        assert_eq!(
            Part::options_for(DeclKind::Function),
            "definition, body, signature, comment, return"
        );
        assert_eq!(
            Part::options_for(DeclKind::Method),
            "definition, body, signature, comment, return, receiver, receiver-fields, receiver-methods"
        );
        assert_eq!(
            Part::options_for(DeclKind::Struct),
            "definition, body, signature, comment, fields, methods"
        );
    }
}
