//! Language-specific analyzer implementations.

mod go;

pub use go::GoAnalyzer;
