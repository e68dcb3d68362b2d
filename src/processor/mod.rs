//! Language processors for locating and replacing named source constructs.
//!
//! This module provides:
//! - `Processor` trait: per-language find/replace/validate operations
//! - `Registry`: explicit processor lookup by language identifier
//! - `shape`: cheap textual pre-checks for replacement content
//!
//! Every operation receives the complete source text and returns a result
//! synchronously; nothing is cached between calls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::{LanguageAnalyzer, Span};
use crate::error::{Error, Result};

pub mod languages;
mod registry;
pub mod shape;

pub use languages::GoProcessor;
pub use registry::Registry;

/// Kind of construct a processor can locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartType {
    /// Function or method declaration.
    Func,
    /// Type declaration block.
    Type,
    /// Constant declaration block.
    Const,
    /// Variable declaration block.
    Var,
    /// Single import specification.
    Import,
    /// Package clause.
    Package,
}

impl PartType {
    /// All part types, in display order.
    pub const ALL: &'static [PartType] = &[
        PartType::Func,
        PartType::Type,
        PartType::Const,
        PartType::Var,
        PartType::Import,
        PartType::Package,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartType::Func => "func",
            PartType::Type => "type",
            PartType::Const => "const",
            PartType::Var => "var",
            PartType::Import => "import",
            PartType::Package => "package",
        }
    }
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PartType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "func" | "function" | "method" => Ok(PartType::Func),
            "type" => Ok(PartType::Type),
            "const" | "constant" => Ok(PartType::Const),
            "var" | "variable" => Ok(PartType::Var),
            "import" => Ok(PartType::Import),
            "package" => Ok(PartType::Package),
            _ => Err(format!("unknown part type: {}", s)),
        }
    }
}

/// Input to locate, replace and validate operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartArgs {
    /// Language identifier (e.g., "go").
    pub language: String,
    /// Complete source text. Must be an independently parseable unit.
    pub content: String,
    /// Kind of construct to locate.
    pub part_type: Option<PartType>,
    /// Name of the construct. Methods may be receiver-qualified (`*Config.Validate`).
    pub part_name: String,
    /// Replacement text for `replace_part` and `validate_content`.
    #[serde(default)]
    pub new_content: Option<String>,
    /// Path used only in diagnostics.
    #[serde(default)]
    pub file_path: Option<String>,
}

impl PartArgs {
    pub fn new(language: &str, content: impl Into<String>, part_type: PartType, name: &str) -> Self {
        Self {
            language: language.to_string(),
            content: content.into(),
            part_type: Some(part_type),
            part_name: name.to_string(),
            new_content: None,
            file_path: None,
        }
    }

    pub fn with_new_content(mut self, new_content: impl Into<String>) -> Self {
        self.new_content = Some(new_content.into());
        self
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Path for diagnostics, or `<input>` when none was given.
    pub fn display_path(&self) -> &str {
        self.file_path.as_deref().unwrap_or("<input>")
    }

    /// The requested part type; a missing part type is a configuration error.
    pub fn require_part_type(&self) -> Result<PartType> {
        self.part_type
            .ok_or_else(|| Error::Config("part type is required".to_string()))
    }
}

/// Location of a construct within a source buffer.
///
/// When `found` is false every other field is zero-valued and must be ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartInfo {
    /// Start line (1-indexed).
    pub start_line: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// Start byte offset (0-indexed, inclusive).
    pub start_offset: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_offset: usize,
    /// Exact text of the construct.
    pub content: String,
    pub found: bool,
}

impl PartInfo {
    pub fn not_found() -> Self {
        Self::default()
    }

    /// Build a found result for a span, slicing its text out of `source`.
    pub fn from_span(span: Span, source: &str) -> Self {
        Self {
            start_line: span.start_line,
            end_line: span.end_line,
            start_offset: span.start_byte,
            end_offset: span.end_byte,
            content: source
                .get(span.start_byte..span.end_byte)
                .unwrap_or("")
                .to_string(),
            found: true,
        }
    }
}

/// Per-language construct processor.
pub trait Processor: Send + Sync {
    /// Language identifier (e.g., "go").
    fn language(&self) -> &'static str;

    /// Part types this processor can locate.
    fn supported_part_types(&self) -> &'static [PartType];

    /// Locate a construct. Not-found is `Ok` with `found == false`;
    /// unparseable input is always an error.
    fn find_part(&self, args: &PartArgs) -> Result<PartInfo>;

    /// Replace a construct and return the complete modified source.
    ///
    /// The result is re-parsed; a replacement that breaks the source yields
    /// `Error::InvalidReplacement` and no text.
    fn replace_part(&self, args: &PartArgs) -> Result<String>;

    /// Cheap shape check of `args.new_content` against the target part type.
    fn validate_content(&self, args: &PartArgs) -> Result<()>;

    /// Full syntax check of a source buffer.
    fn validate_syntax(&self, source: &str) -> Result<()>;

    /// Analyzer used for documentation checks, when the language has one.
    fn analyzer(&self) -> Option<&dyn LanguageAnalyzer> {
        None
    }

    /// Reject part types this processor does not advertise.
    fn ensure_supported(&self, part_type: PartType) -> Result<()> {
        if self.supported_part_types().contains(&part_type) {
            return Ok(());
        }
        Err(Error::UnsupportedPartType {
            kind: part_type.to_string(),
            language: self.language().to_string(),
            supported: self
                .supported_part_types()
                .iter()
                .map(|p| p.to_string())
                .collect(),
        })
    }
}
