//! Core traits for language analysis.

use std::path::Path;

use super::SourceFile;
use crate::detect::{DocException, RuleSet};
use crate::error::Result;

/// Holds a parsed tree-sitter tree and associated metadata.
///
/// This is kept separate from the directory tree so processors can parse a
/// bare buffer without touching the filesystem.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The language the tree was parsed with (used to build queries).
    pub language: tree_sitter::Language,
    /// The original source code (kept for node text extraction).
    pub source: Vec<u8>,
    /// The file path (for error reporting).
    pub path: String,
}

impl ParsedFile {
    /// Get the source code as a string slice.
    pub fn source_str(&self) -> &str {
        std::str::from_utf8(&self.source).unwrap_or("")
    }

    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// Language-specific analyzer trait.
///
/// Each language implements this trait to provide parsing and
/// documentation-compliance analysis.
///
/// # Thread Safety
///
/// Note: tree_sitter::Parser is not Sync, so implementations should
/// create parsers as needed.
pub trait LanguageAnalyzer: Send + Sync {
    /// Returns the language identifier (e.g., "go").
    fn language_id(&self) -> &'static str;

    /// Returns file extensions this analyzer handles (without dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// Parse a source buffer into a tree-sitter tree.
    ///
    /// Returns `Error::Syntax` when the tree contains errors: callers never
    /// see a partially valid tree.
    fn parse(&self, path: &Path, source: &[u8]) -> Result<ParsedFile>;

    /// Evaluate documentation rules for every declaration in a file.
    fn doc_exceptions(&self, file: &SourceFile, rules: &RuleSet) -> Vec<DocException>;

    /// Check if this analyzer handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}
