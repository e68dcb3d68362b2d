//! Directory walking and tree construction.
//!
//! The walk is depth-first and pre-order (walkdir with entries sorted by
//! name), so each directory node is complete before its parent continues.
//! A file that fails to parse is recorded and skipped; the walk goes on.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{ExcludeMode, ExclusionSet, LanguageAnalyzer, SourceDirectory, SourceFile};
use crate::error::{Error, Result};

/// Companion readme file name, matched case-insensitively.
pub const README_NAME: &str = "readme.md";

/// Whether a walk descends into sub-directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recursion {
    /// Let the caller's defaults decide.
    #[default]
    Unspecified,
    NoRecurse,
    Recurse,
}

/// Traversal directive: recursion plus exclusions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraverseArgs {
    #[serde(default)]
    pub recursion: Recursion,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub exclude_mode: ExcludeMode,
}

impl TraverseArgs {
    pub fn exclusions(&self) -> ExclusionSet {
        ExclusionSet::new(&self.exclude, self.exclude_mode)
    }
}

/// Cooperative cancellation flag shared with a running walk.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A file that could not be read or parsed during a walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    pub path: String,
    pub message: String,
}

/// Result of a walk: the tree plus any per-file failures.
pub struct WalkOutcome {
    pub root: SourceDirectory,
    pub errors: Vec<FileError>,
}

impl WalkOutcome {
    /// True when at least one file was skipped because it failed to parse.
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Builds a `SourceDirectory` tree for one language.
pub struct Walker<'a> {
    analyzer: &'a dyn LanguageAnalyzer,
    exclusions: ExclusionSet,
    recursive: bool,
    cancel: Option<Cancellation>,
}

impl<'a> Walker<'a> {
    /// Create a recursive walker with the default exclusions.
    pub fn new(analyzer: &'a dyn LanguageAnalyzer) -> Self {
        Self {
            analyzer,
            exclusions: ExclusionSet::default(),
            recursive: true,
            cancel: None,
        }
    }

    pub fn exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn cancellation(mut self, cancel: Option<Cancellation>) -> Self {
        self.cancel = cancel;
        self
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(c) if c.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }

    /// Walk a directory and build its tree.
    pub fn walk(&self, root: &Path) -> Result<WalkOutcome> {
        let recursive = self.recursive;
        let max_depth = if recursive { usize::MAX } else { 1 };
        let exclusions = &self.exclusions;
        let entries = WalkDir::new(root)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| {
                if e.depth() == 0 {
                    return true;
                }
                if !recursive && e.file_type().is_dir() {
                    return false;
                }
                !exclusions.is_excluded(&e.file_name().to_string_lossy())
            });

        let mut stack: Vec<SourceDirectory> = Vec::new();
        let mut errors = Vec::new();

        for entry in entries {
            self.check_cancelled()?;
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                    errors.push(FileError {
                        path: path.to_string_lossy().to_string(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };
            let depth = entry.depth();
            fold_to(&mut stack, depth);

            if entry.file_type().is_dir() {
                debug!(path = %entry.path().display(), "entering directory");
                stack.push(SourceDirectory::new(entry.path()));
                continue;
            }

            let Some(dir) = stack.last_mut() else {
                continue;
            };
            let name = entry.file_name().to_string_lossy();
            if name.eq_ignore_ascii_case(README_NAME) {
                dir.has_readme = true;
                continue;
            }
            if !entry.file_type().is_file() || !self.is_source(entry.path()) {
                continue;
            }

            match self.parse_file(entry.path()) {
                Ok(file) => dir.files.push(file),
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "skipping unparseable file");
                    errors.push(FileError {
                        path: entry.path().to_string_lossy().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        fold_to(&mut stack, 1);
        let root = stack.pop().ok_or_else(|| {
            Error::io(
                root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "walk produced no root"),
            )
        })?;
        Ok(WalkOutcome { root, errors })
    }

    /// Build a single-directory tree holding one file.
    pub fn walk_file(&self, file: &Path) -> Result<WalkOutcome> {
        self.check_cancelled()?;
        let dir: PathBuf = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let mut root = SourceDirectory::new(&dir);
        root.has_readme = has_readme(&dir);

        let mut errors = Vec::new();
        if !self.is_source(file) {
            errors.push(FileError {
                path: file.to_string_lossy().to_string(),
                message: format!("not a {} source file", self.analyzer.language_id()),
            });
            return Ok(WalkOutcome { root, errors });
        }

        match self.parse_file(file) {
            Ok(parsed) => root.files.push(parsed),
            Err(e) => {
                warn!(path = %file.display(), error = %e, "skipping unparseable file");
                errors.push(FileError {
                    path: file.to_string_lossy().to_string(),
                    message: e.to_string(),
                });
            }
        }
        Ok(WalkOutcome { root, errors })
    }

    fn is_source(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.analyzer.handles_extension(ext))
            .unwrap_or(false)
    }

    fn parse_file(&self, path: &Path) -> Result<SourceFile> {
        let source = fs::read(path).map_err(|e| Error::io(path, e))?;
        let parsed = self.analyzer.parse(path, &source)?;
        debug!(path = %path.display(), "parsed file");
        Ok(SourceFile::new(path, parsed))
    }
}

/// Pop finished directories until `len` remain, attaching each to its parent.
fn fold_to(stack: &mut Vec<SourceDirectory>, len: usize) {
    while stack.len() > len.max(1) {
        if let Some(child) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.children.push(child);
            }
        }
    }
}

fn has_readme(dir: &Path) -> bool {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .any(|e| {
            e.file_type().is_file()
                && e.file_name().to_string_lossy().eq_ignore_ascii_case(README_NAME)
        })
}
