//! Name-based exclusion rules for directory walks.

use std::fmt;
use std::str::FromStr;

use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Built-in exclusions: version control, dependencies, build output,
/// editor settings and caches.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".bzr",
    "vendor",
    "node_modules",
    "bin",
    "build",
    "dist",
    "out",
    "target",
    ".idea",
    ".vscode",
    ".cache",
    "__pycache__",
];

/// How a caller-supplied exclude list combines with the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExcludeMode {
    /// Use the built-in defaults only.
    #[default]
    Defaults,
    /// Add the caller's entries to the defaults.
    Append,
    /// Use the caller's entries instead of the defaults.
    Replace,
}

impl ExcludeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExcludeMode::Defaults => "defaults",
            ExcludeMode::Append => "append",
            ExcludeMode::Replace => "replace",
        }
    }
}

impl fmt::Display for ExcludeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExcludeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "defaults" | "default" | "" => Ok(ExcludeMode::Defaults),
            "append" | "add" => Ok(ExcludeMode::Append),
            "replace" | "override" => Ok(ExcludeMode::Replace),
            _ => Err(format!("unknown exclude mode: {}", s)),
        }
    }
}

/// Effective exclusion list.
///
/// Plain entries match a file or directory name case-insensitively. Entries
/// containing glob metacharacters are compiled with globset and matched
/// against the name, also case-insensitively.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    names: Vec<String>,
    globs: Vec<GlobMatcher>,
}

impl ExclusionSet {
    /// Combine `custom` with the defaults according to `mode`.
    pub fn new(custom: &[String], mode: ExcludeMode) -> Self {
        let entries: Vec<String> = match mode {
            ExcludeMode::Defaults => DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            ExcludeMode::Append => DEFAULT_EXCLUDES
                .iter()
                .map(|s| s.to_string())
                .chain(custom.iter().cloned())
                .collect(),
            ExcludeMode::Replace => custom.to_vec(),
        };

        let mut names = Vec::new();
        let mut globs = Vec::new();
        for entry in entries {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            if entry.contains(&['*', '?', '[', '{'][..]) {
                match GlobBuilder::new(entry).case_insensitive(true).build() {
                    Ok(glob) => globs.push(glob.compile_matcher()),
                    Err(e) => warn!(pattern = entry, error = %e, "ignoring invalid exclude pattern"),
                }
            } else {
                names.push(entry.to_lowercase());
            }
        }
        Self { names, globs }
    }

    /// Whether a file or directory with this name is excluded.
    pub fn is_excluded(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.names.iter().any(|n| *n == lower) || self.globs.iter().any(|g| g.is_match(name))
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::new(&[], ExcludeMode::Defaults)
    }
}
