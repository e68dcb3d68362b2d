//! Partscope - structural analysis and editing for Go source.
//!
//! Partscope parses Go with tree-sitter and offers two independent services:
//!
//! - Construct editing: locate a named function, method, type, constant,
//!   variable, import or package clause with exact byte and line positions,
//!   splice in a replacement, and re-parse so broken edits never escape.
//! - Documentation compliance: walk a directory tree and report missing
//!   package, function, type, constant and variable comments, plus
//!   directories without a README.
//!
//! # Architecture
//!
//! - `processor`: per-language `Processor` implementations and the `Registry`
//! - `analysis`: parsing, declaration views and the directory walker
//! - `detect`: documentation rules and the aggregating `Runner`
//! - `config`: YAML configuration for checks
//! - `report`: output formatting (pretty, JSON)
//!
//! # Example
//!
//! ```no_run
//! use partscope::{PartArgs, PartType, Registry};
//!
//! let registry = Registry::with_defaults();
//! let go = registry.lookup("go")?;
//! let source = "package demo\n\nfunc Foo() {}\n";
//! let info = go.find_part(&PartArgs::new("go", source, PartType::Func, "Foo"))?;
//! assert_eq!(info.start_line, 3);
//! # Ok::<(), partscope::Error>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod logging;
pub mod processor;
pub mod report;

pub use analysis::{
    Cancellation, ExcludeMode, GoAnalyzer, LanguageAnalyzer, Recursion, SourceDirectory,
    SourceFile, TraverseArgs, Walker,
};
pub use config::Config;
pub use detect::{DocException, ExceptionKind, ExceptionReport, ExceptionType, RuleSet, Runner};
pub use error::{Error, Result};
pub use processor::{GoProcessor, PartArgs, PartInfo, PartType, Processor, Registry};
