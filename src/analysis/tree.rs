//! In-memory tree of walked directories and parsed source files.

use std::path::{Path, PathBuf};

use super::{Declaration, ParsedFile};

/// A directory node produced by a walk.
pub struct SourceDirectory {
    /// Absolute path of the directory.
    pub path: PathBuf,
    /// Whether a companion `README.md` (any case) sits in this directory.
    pub has_readme: bool,
    /// Parsed source files, in name order.
    pub files: Vec<SourceFile>,
    /// Child directories, in name order.
    pub children: Vec<SourceDirectory>,
}

impl SourceDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            has_readme: false,
            files: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Total number of files in this subtree.
    pub fn file_count(&self) -> usize {
        self.files.len() + self.children.iter().map(|c| c.file_count()).sum::<usize>()
    }

    /// Find a direct child directory by name.
    pub fn child(&self, name: &str) -> Option<&SourceDirectory> {
        self.children
            .iter()
            .find(|c| c.path.file_name().map(|n| n == name).unwrap_or(false))
    }
}

/// A successfully parsed source file.
pub struct SourceFile {
    /// Path of the file.
    pub path: PathBuf,
    /// Parse tree and source text.
    pub parsed: ParsedFile,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, parsed: ParsedFile) -> Self {
        Self {
            path: path.into(),
            parsed,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path rendered for reports.
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    /// Top-level declarations, in source order.
    ///
    /// Built on demand from the parse tree; the views borrow this file.
    pub fn declarations(&self) -> Vec<Declaration<'_>> {
        let root = self.parsed.tree.root_node();
        let mut cursor = root.walk();
        let declarations = root
            .named_children(&mut cursor)
            .filter_map(|node| Declaration::new(node, self))
            .collect();
        declarations
    }
}
