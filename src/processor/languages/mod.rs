//! Per-language processor implementations.

mod go;

pub use go::GoProcessor;
