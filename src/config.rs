//! YAML configuration for documentation checks.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{ExcludeMode, Recursion, TraverseArgs};
use crate::detect::RuleSet;
use crate::error::{Error, Result};

/// Config file names searched for, in order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["partscope.yaml", ".partscope.yaml"];

/// Settings for `partscope check`. Command-line flags override these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Extra directory or file names to skip.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// How `exclude` combines with the built-in list.
    #[serde(default)]
    pub exclude_mode: ExcludeMode,
    /// Walk sub-directories; unset means recursive.
    #[serde(default)]
    pub recursive: Option<bool>,
    /// Rule toggles.
    #[serde(default)]
    pub rules: RuleSet,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn parse_str(content: &str) -> Result<Self> {
        Self::from_yaml(content).map_err(|e| Error::Config(e.to_string()))
    }

    fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Find a config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load `explicit` if given, else a discovered file in `dir`, else defaults.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match Self::discover(dir) {
                Some(p) => p,
                None => {
                    debug!(dir = %dir.display(), "no config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        debug!(path = %path.display(), "loading config");
        Self::parse_file(&path)
    }

    /// Traversal directive built from this config.
    pub fn traverse_args(&self) -> TraverseArgs {
        let recursion = match self.recursive {
            Some(true) => Recursion::Recurse,
            Some(false) => Recursion::NoRecurse,
            None => Recursion::Unspecified,
        };
        TraverseArgs {
            recursion,
            exclude: self.exclude.clone(),
            exclude_mode: self.exclude_mode,
        }
    }
}
