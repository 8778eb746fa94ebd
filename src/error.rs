use crate::decl::DeclKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("No file extension found for path: {0}")]
    NoExtension(String),

    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid query file {path}: {source}")]
    QueryFile {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("no {kind} was found based on configuration")]
    NotFound { kind: DeclKind },

    #[error("receiver type `{receiver}` of method {method} cannot be resolved to a name")]
    AmbiguousReceiver { method: String, receiver: String },

    #[error("Serialization error")]
    SerializationError(#[from] serde_json::Error),
}

impl ScoutError {
    /// Bad query or unreadable/unparseable source, detected before traversal.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ScoutError::PathNotFound(_)
                | ScoutError::UnsupportedExtension(_)
                | ScoutError::NoExtension(_)
                | ScoutError::ReadError { .. }
                | ScoutError::ParseError(_)
                | ScoutError::InvalidQuery(_)
                | ScoutError::QueryFile { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ScoutError::NotFound { .. })
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        if self.is_input_error() {
            2
        } else if self.is_not_found() {
            3
        } else {
            1
        }
    }
}
