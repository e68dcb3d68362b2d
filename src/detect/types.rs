//! Core types for documentation-compliance results.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::analysis::FileError;
use crate::error::{Error, Result};

/// Base kind of a documentation violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionKind {
    Readme,
    FileComment,
    FunctionComment,
    TypeComment,
    ConstComment,
    VarComment,
}

impl ExceptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExceptionKind::Readme => "readme",
            ExceptionKind::FileComment => "file_comment",
            ExceptionKind::FunctionComment => "function_comment",
            ExceptionKind::TypeComment => "type_comment",
            ExceptionKind::ConstComment => "const_comment",
            ExceptionKind::VarComment => "var_comment",
        }
    }

    /// Whether a group-level violation exists for this kind.
    pub fn allows_group(&self) -> bool {
        matches!(self, ExceptionKind::ConstComment | ExceptionKind::VarComment)
    }
}

impl std::fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Violation type: a base kind plus the group-level modifier.
///
/// Only const and var kinds can be group-level; `new` rejects anything else,
/// so every value renders to a known label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExceptionType {
    kind: ExceptionKind,
    group: bool,
}

impl ExceptionType {
    pub fn new(kind: ExceptionKind, group: bool) -> Result<Self> {
        if group && !kind.allows_group() {
            error!(kind = %kind, "group-level violation requested for a kind without groups");
            return Err(Error::InvalidExceptionType {
                kind: kind.to_string(),
            });
        }
        Ok(Self { kind, group })
    }

    /// A per-element violation; always valid.
    pub fn single(kind: ExceptionKind) -> Self {
        Self { kind, group: false }
    }

    pub fn kind(&self) -> ExceptionKind {
        self.kind
    }

    pub fn is_group(&self) -> bool {
        self.group
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match (self.kind, self.group) {
            (ExceptionKind::Readme, _) => "Missing README",
            (ExceptionKind::FileComment, _) => "Missing file comment",
            (ExceptionKind::FunctionComment, _) => "Missing function comment",
            (ExceptionKind::TypeComment, _) => "Missing type comment",
            (ExceptionKind::ConstComment, false) => "Missing constant comment",
            (ExceptionKind::ConstComment, true) => "Missing constant group comment",
            (ExceptionKind::VarComment, false) => "Missing variable comment",
            (ExceptionKind::VarComment, true) => "Missing variable group comment",
        }
    }

    /// Machine-readable code.
    pub fn code(&self) -> &'static str {
        match (self.kind, self.group) {
            (ExceptionKind::ConstComment, true) => "const_group_comment",
            (ExceptionKind::VarComment, true) => "var_group_comment",
            (kind, _) => kind.as_str(),
        }
    }
}

impl std::fmt::Display for ExceptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single documentation violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocException {
    pub file: String,
    pub kind: ExceptionType,
    /// 1-based line; 0 for directory-level violations.
    pub line: usize,
    pub end_line: Option<usize>,
    /// The offending specification binds more than one name.
    pub multi_name: bool,
    /// Offending element name; empty when not name-addressable.
    pub element: String,
}

impl DocException {
    pub fn new(file: impl Into<String>, kind: ExceptionType, line: usize) -> Self {
        Self {
            file: file.into(),
            kind,
            line,
            end_line: None,
            multi_name: false,
            element: String::new(),
        }
    }

    pub fn element(mut self, element: impl Into<String>) -> Self {
        self.element = element.into();
        self
    }

    pub fn end_line(mut self, end_line: usize) -> Self {
        self.end_line = Some(end_line);
        self
    }

    pub fn multi_name(mut self, multi_name: bool) -> Self {
        self.multi_name = multi_name;
        self
    }
}

/// Results of a compliance run.
#[derive(Debug, Default)]
pub struct ExceptionReport {
    pub exceptions: Vec<DocException>,
    /// Files skipped because they could not be read or parsed.
    pub parse_errors: Vec<FileError>,
    /// Number of files analysed.
    pub files_scanned: usize,
}

impl ExceptionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when some files were skipped, so fewer violations may be reported
    /// than a fully parseable tree would produce.
    pub fn is_partial(&self) -> bool {
        !self.parse_errors.is_empty()
    }

    pub fn has_exceptions(&self) -> bool {
        !self.exceptions.is_empty()
    }

    /// Violation counts per label, in first-seen order.
    pub fn counts_by_label(&self) -> Vec<(&'static str, usize)> {
        let mut counts: Vec<(&'static str, usize)> = Vec::new();
        for exc in &self.exceptions {
            let label = exc.kind.label();
            match counts.iter_mut().find(|(l, _)| *l == label) {
                Some((_, n)) => *n += 1,
                None => counts.push((label, 1)),
            }
        }
        counts
    }
}
