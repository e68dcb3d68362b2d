//! Explicit language registry.
//!
//! The registry is an ordinary value: the composing application builds one at
//! startup, registers the processors it wants, and passes it by reference.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::{GoProcessor, Processor};
use crate::error::{Error, Result};

/// Processor lookup keyed by lower-cased language identifier.
#[derive(Default)]
pub struct Registry {
    processors: RwLock<HashMap<String, Arc<dyn Processor>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in processor.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(GoProcessor::new()));
        registry
    }

    /// Register a processor, replacing any prior entry for its language.
    pub fn register(&self, processor: Arc<dyn Processor>) {
        let key = processor.language().to_lowercase();
        debug!(language = %key, "registering processor");
        let mut processors = self.processors.write().unwrap_or_else(|e| e.into_inner());
        processors.insert(key, processor);
    }

    /// Case-insensitive lookup.
    pub fn lookup(&self, language: &str) -> Result<Arc<dyn Processor>> {
        let processors = self.processors.read().unwrap_or_else(|e| e.into_inner());
        if processors.is_empty() {
            return Err(Error::NotInitialized("language registry"));
        }
        if let Some(processor) = processors.get(&language.to_lowercase()) {
            return Ok(Arc::clone(processor));
        }

        let mut supported: Vec<String> = processors.keys().cloned().collect();
        supported.sort();
        Err(Error::UnsupportedLanguage {
            language: language.to_string(),
            supported,
        })
    }

    /// Registered language identifiers, sorted. The caller owns the vector.
    pub fn list_languages(&self) -> Vec<String> {
        let processors = self.processors.read().unwrap_or_else(|e| e.into_inner());
        let mut languages: Vec<String> = processors.keys().cloned().collect();
        languages.sort();
        languages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::{PartArgs, PartInfo, PartType};

    struct MockProcessor {
        name: &'static str,
    }

    impl Processor for MockProcessor {
        fn language(&self) -> &'static str {
            self.name
        }

        fn supported_part_types(&self) -> &'static [PartType] {
            &[PartType::Func]
        }

        fn find_part(&self, _args: &PartArgs) -> Result<PartInfo> {
            Ok(PartInfo::not_found())
        }

        fn replace_part(&self, args: &PartArgs) -> Result<String> {
            Ok(args.content.clone())
        }

        fn validate_content(&self, _args: &PartArgs) -> Result<()> {
            Ok(())
        }

        fn validate_syntax(&self, _source: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = Registry::new();
        registry.register(Arc::new(MockProcessor { name: "Mock" }));

        let processor = registry.lookup("MOCK").unwrap();
        assert_eq!(processor.language(), "Mock");
    }

    #[test]
    fn test_register_overwrites_existing_entry() {
        let registry = Registry::new();
        registry.register(Arc::new(MockProcessor { name: "mock" }));
        registry.register(Arc::new(MockProcessor { name: "MOCK" }));

        assert_eq!(registry.list_languages(), vec!["mock".to_string()]);
        assert_eq!(registry.lookup("mock").unwrap().language(), "MOCK");
    }

    #[test]
    fn test_unsupported_language_lists_registered() {
        let registry = Registry::new();
        registry.register(Arc::new(MockProcessor { name: "beta" }));
        registry.register(Arc::new(MockProcessor { name: "alpha" }));

        let err = registry.lookup("gamma").err().unwrap();
        match err {
            Error::UnsupportedLanguage { supported, .. } => {
                assert_eq!(supported, vec!["alpha".to_string(), "beta".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_registry_is_not_initialized() {
        let registry = Registry::new();
        let err = registry.lookup("go").err().unwrap();
        assert!(matches!(err, Error::NotInitialized(_)));
    }

    #[test]
    fn test_list_languages_returns_owned_copy() {
        let registry = Registry::with_defaults();
        let mut languages = registry.list_languages();
        languages.push("extra".to_string());
        assert_eq!(registry.list_languages(), vec!["go".to_string()]);
    }

    #[test]
    fn test_unsupported_part_type() {
        let processor = MockProcessor { name: "mock" };
        let err = processor.ensure_supported(PartType::Import).unwrap_err();
        assert!(err.to_string().contains("supported: func"));
    }
}
