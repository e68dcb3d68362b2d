//! Error types shared by the processors, the walker and the detection rules.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by partscope operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The supplied source does not parse.
    #[error("syntax error in {path} at line {line}, column {column}")]
    Syntax {
        path: String,
        line: usize,
        column: usize,
    },

    /// The source handed to a find or replace does not parse.
    #[error("cannot search for {kind} {name:?}: {source}")]
    SourceSyntax {
        kind: String,
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// The source parsed, but splicing the replacement in broke it.
    #[error("replacement of {kind} {name:?} produced invalid source: {source}")]
    InvalidReplacement {
        kind: String,
        name: String,
        #[source]
        source: Box<Error>,
    },

    #[error("{kind} {name:?} not found")]
    PartNotFound { kind: String, name: String },

    #[error("invalid {kind} content: {message} (content: {preview:?})")]
    ContentShape {
        kind: String,
        message: String,
        preview: String,
    },

    #[error("language not supported: {language} (supported: {})", supported.join(", "))]
    UnsupportedLanguage {
        language: String,
        supported: Vec<String>,
    },

    #[error("part type {kind} not supported for {language} (supported: {})", supported.join(", "))]
    UnsupportedPartType {
        kind: String,
        language: String,
        supported: Vec<String>,
    },

    #[error("{0} not initialized")]
    NotInitialized(&'static str),

    #[error("invalid exception type: {kind} cannot be group-level")]
    InvalidExceptionType { kind: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("parser setup failed: {0}")]
    Parser(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn not_found(kind: impl ToString, name: impl Into<String>) -> Self {
        Self::PartNotFound {
            kind: kind.to_string(),
            name: name.into(),
        }
    }

    /// Whether this error came from the original source rather than from an edit.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax { .. } | Error::SourceSyntax { .. })
    }

    pub fn is_invalid_replacement(&self) -> bool {
        matches!(self, Error::InvalidReplacement { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
