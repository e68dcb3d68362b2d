//! Compliance runner: resolves the target path, walks it, and aggregates
//! violations over the resulting tree.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use super::{DocException, ExceptionKind, ExceptionReport, ExceptionType, RuleSet};
use crate::analysis::{
    Cancellation, LanguageAnalyzer, Recursion, SourceDirectory, TraverseArgs, Walker,
};
use crate::error::{Error, Result};

/// Suffix that forces a recursive walk, as in `./...`.
pub const RECURSIVE_SUFFIX: &str = "...";

/// A target path after suffix handling and stat checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: PathBuf,
    pub recursive: bool,
    pub single_file: bool,
}

/// Resolve a user-supplied path and recursion directive.
///
/// A trailing `/...` forces recursion and is stripped. Otherwise an
/// unspecified directive means recursive. A file path always means a
/// non-recursive single-file run; a directory is canonicalized.
pub fn resolve_path(path: &str, recursion: Recursion) -> Result<ResolvedPath> {
    let (trimmed, forced) = strip_recursive_suffix(path);
    let recursive = forced || recursion != Recursion::NoRecurse;

    let target = PathBuf::from(trimmed);
    let meta = fs::metadata(&target).map_err(|e| Error::io(&target, e))?;
    if meta.is_file() {
        return Ok(ResolvedPath {
            path: target,
            recursive: false,
            single_file: true,
        });
    }

    let canonical = target.canonicalize().map_err(|e| Error::io(&target, e))?;
    Ok(ResolvedPath {
        path: canonical,
        recursive,
        single_file: false,
    })
}

fn strip_recursive_suffix(path: &str) -> (&str, bool) {
    if path == RECURSIVE_SUFFIX {
        return (".", true);
    }
    match path.strip_suffix(RECURSIVE_SUFFIX) {
        Some(rest) if rest.ends_with('/') => {
            let rest = rest.trim_end_matches('/');
            (if rest.is_empty() { "/" } else { rest }, true)
        }
        _ => (path, false),
    }
}

/// Runs the documentation rules over a directory tree.
pub struct Runner<'a> {
    analyzer: &'a dyn LanguageAnalyzer,
    rules: RuleSet,
    cancel: Option<Cancellation>,
}

impl<'a> Runner<'a> {
    pub fn new(analyzer: &'a dyn LanguageAnalyzer) -> Self {
        Self {
            analyzer,
            rules: RuleSet::default(),
            cancel: None,
        }
    }

    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Resolve `path`, walk it, and collect every violation.
    pub fn run(&self, path: &str, args: &TraverseArgs) -> Result<ExceptionReport> {
        let target = resolve_path(path, args.recursion)?;
        info!(
            path = %target.path.display(),
            recursive = target.recursive,
            single_file = target.single_file,
            "checking documentation"
        );

        let walker = Walker::new(self.analyzer)
            .exclusions(args.exclusions())
            .recursive(target.recursive)
            .cancellation(self.cancel.clone());
        let outcome = if target.single_file {
            walker.walk_file(&target.path)?
        } else {
            walker.walk(&target.path)?
        };

        let mut report = ExceptionReport::new();
        report.parse_errors = outcome.errors;
        self.aggregate(&outcome.root, target.recursive, &mut report)?;
        Ok(report)
    }

    /// Flatten violations from an already-built tree. `root` is exempt from
    /// the readme rule.
    pub fn aggregate(
        &self,
        root: &SourceDirectory,
        recursive: bool,
        report: &mut ExceptionReport,
    ) -> Result<()> {
        self.aggregate_dir(root, true, recursive, report)
    }

    fn aggregate_dir(
        &self,
        dir: &SourceDirectory,
        is_root: bool,
        recursive: bool,
        report: &mut ExceptionReport,
    ) -> Result<()> {
        if !is_root && !dir.has_readme && self.rules.readme {
            report.exceptions.push(DocException::new(
                dir.path.to_string_lossy(),
                ExceptionType::single(ExceptionKind::Readme),
                0,
            ));
        }

        for file in &dir.files {
            self.check_cancelled()?;
            let found = self.analyzer.doc_exceptions(file, &self.rules);
            debug!(path = %file.path().display(), violations = found.len(), "analysed file");
            report.exceptions.extend(found);
            report.files_scanned += 1;
        }

        if recursive {
            for child in &dir.children {
                self.aggregate_dir(child, false, recursive, report)?;
            }
        }
        Ok(())
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(c) if c.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}
