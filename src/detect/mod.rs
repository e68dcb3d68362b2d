//! Documentation-compliance detection.

pub(crate) mod rules;
mod runner;
mod types;

pub use rules::{check_file, RuleSet};
pub use runner::{resolve_path, ResolvedPath, Runner, RECURSIVE_SUFFIX};
pub use types::{DocException, ExceptionKind, ExceptionReport, ExceptionType};
