//! AST-backed source analysis.
//!
//! This module parses source files with tree-sitter, walks directory trees
//! into an in-memory model, and exposes views over top-level declarations
//! so the detection rules can inspect names, positions and comments.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌─────────────────┐
//! │ Directory walk  │────▶│ Analyzer     │────▶│ SourceDirectory │
//! │ (exclusions)    │     │ (parse, Go)  │     │ / SourceFile    │
//! └─────────────────┘     └──────────────┘     └─────────────────┘
//!                                                      │
//!                                                      ▼
//!                         ┌──────────────┐     ┌─────────────────┐
//!                         │ Detection    │◀────│ Declaration     │
//!                         │ rules        │     │ views (lazy)    │
//!                         └──────────────┘     └─────────────────┘
//! ```
//!
//! # Adding a New Language
//!
//! 1. Create a new module in `src/analysis/languages/`
//! 2. Implement the `LanguageAnalyzer` trait
//! 3. Wrap it in a `Processor` and register it in the language registry
//!
//! See `languages/go.rs` for a reference implementation.

mod declaration;
mod exclude;
mod facts;
mod languages;
mod traits;
mod tree;
mod walk;

pub use declaration::{Declaration, Spec, TrailingComments};
pub use exclude::{ExcludeMode, ExclusionSet, DEFAULT_EXCLUDES};
pub use facts::{CommentGroup, DeclarationKind, Name, Span};
pub use languages::GoAnalyzer;
pub use traits::{LanguageAnalyzer, ParsedFile};
pub use tree::{SourceDirectory, SourceFile};
pub use walk::{
    Cancellation, FileError, Recursion, TraverseArgs, WalkOutcome, Walker, README_NAME,
};
