//! Go construct processor.
//!
//! Locates constructs in a single Go buffer, splices replacements, and
//! re-parses the result so a broken edit never reaches the caller.

use std::path::Path;

use tracing::debug;

use crate::analysis::{
    Declaration, DeclarationKind, GoAnalyzer, LanguageAnalyzer, SourceFile, Span,
};
use crate::error::{Error, Result};
use crate::processor::{shape, PartArgs, PartInfo, PartType, Processor};

/// Go processor backed by the tree-sitter Go analyzer.
#[derive(Clone, Default)]
pub struct GoProcessor {
    analyzer: GoAnalyzer,
}

impl GoProcessor {
    pub fn new() -> Self {
        Self {
            analyzer: GoAnalyzer::new(),
        }
    }

    fn parse(&self, path: &str, source: &str) -> Result<SourceFile> {
        let parsed = self.analyzer.parse(Path::new(path), source.as_bytes())?;
        Ok(SourceFile::new(path, parsed))
    }
}

impl Processor for GoProcessor {
    fn language(&self) -> &'static str {
        "go"
    }

    fn supported_part_types(&self) -> &'static [PartType] {
        PartType::ALL
    }

    fn find_part(&self, args: &PartArgs) -> Result<PartInfo> {
        let part_type = args.require_part_type()?;
        self.ensure_supported(part_type)?;

        let name = args.part_name.as_str();
        let file = self
            .parse(args.display_path(), &args.content)
            .map_err(|e| match e {
                Error::Syntax { .. } => Error::SourceSyntax {
                    kind: part_type.to_string(),
                    name: name.to_string(),
                    source: Box::new(e),
                },
                other => other,
            })?;
        let found = file
            .declarations()
            .into_iter()
            .find_map(|decl| match_part(&decl, part_type, name));

        match found {
            Some(span) => {
                debug!(kind = %part_type, name, line = span.start_line, "found part");
                Ok(PartInfo::from_span(span, &args.content))
            }
            None => {
                debug!(kind = %part_type, name, "part not found");
                Ok(PartInfo::not_found())
            }
        }
    }

    fn replace_part(&self, args: &PartArgs) -> Result<String> {
        let part_type = args.require_part_type()?;
        let new_content = args
            .new_content
            .as_deref()
            .ok_or_else(|| Error::Config("new content is required for replace".to_string()))?;

        let info = self.find_part(args)?;
        if !info.found {
            return Err(Error::not_found(part_type, &args.part_name));
        }

        let content = &args.content;
        let mut result = String::with_capacity(
            content.len() - (info.end_offset - info.start_offset) + new_content.len(),
        );
        result.push_str(&content[..info.start_offset]);
        result.push_str(new_content);
        result.push_str(&content[info.end_offset..]);

        self.parse(args.display_path(), &result)
            .map_err(|e| Error::InvalidReplacement {
                kind: part_type.to_string(),
                name: args.part_name.clone(),
                source: Box::new(e),
            })?;

        debug!(kind = %part_type, name = %args.part_name, "replaced part");
        Ok(result)
    }

    fn validate_content(&self, args: &PartArgs) -> Result<()> {
        let part_type = args.require_part_type()?;
        self.ensure_supported(part_type)?;
        let new_content = args.new_content.as_deref().unwrap_or("");
        shape::validate(part_type, new_content)
    }

    fn validate_syntax(&self, source: &str) -> Result<()> {
        self.parse("<input>", source).map(|_| ())
    }

    fn analyzer(&self) -> Option<&dyn LanguageAnalyzer> {
        Some(&self.analyzer)
    }
}

/// Span to report when `decl` holds the named construct.
///
/// Const, var and type hits cover the whole declaration block so grouped
/// syntax survives a replacement. Imports cover one specification and
/// packages only the name.
fn match_part(decl: &Declaration, part_type: PartType, name: &str) -> Option<Span> {
    match (part_type, decl.kind()) {
        (PartType::Package, DeclarationKind::Package) => {
            let ident = decl.name()?;
            (ident.text == name).then_some(ident.span)
        }
        (PartType::Import, DeclarationKind::Import) => decl
            .specs()
            .into_iter()
            .find(|spec| {
                spec.import_path()
                    .map(|path| import_matches(&path, name))
                    .unwrap_or(false)
            })
            .map(|spec| spec.span()),
        (PartType::Const, DeclarationKind::Const)
        | (PartType::Var, DeclarationKind::Var)
        | (PartType::Type, DeclarationKind::Type) => {
            let bound = decl
                .specs()
                .iter()
                .any(|spec| spec.names().iter().any(|n| n.text == name));
            bound.then(|| decl.span())
        }
        (PartType::Func, DeclarationKind::Function) | (PartType::Func, DeclarationKind::Method) => {
            (decl.qualified_name()? == name).then(|| decl.span())
        }
        _ => None,
    }
}

/// Import paths match verbatim or wrapped in either kind of Go string quote.
fn import_matches(literal: &str, name: &str) -> bool {
    literal == name
        || literal == format!("\"{}\"", name)
        || literal == format!("`{}`", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"// Package demo is a demo.
package demo

import (
	"fmt"
	str "strings"
	`os`
)

// Limits for retries.
const (
	MaxRetries = 3
	MinDelay   = 1
)

var debug = false

// Config holds settings.
type Config struct {
	label string
}

// Name returns the name.
func (c Config) Name() string { return c.label }

// Name returns the name through a pointer.
func (c *Config) Name() string { return c.label }

// Run prints.
func Run() {
	fmt.Println(str.ToUpper("x"), os.Args)
}
"#;

    fn find(part_type: PartType, name: &str) -> PartInfo {
        GoProcessor::new()
            .find_part(&PartArgs::new("go", SOURCE, part_type, name))
            .unwrap()
    }

    #[test]
    fn test_find_function() {
        let info = find(PartType::Func, "Run");
        assert!(info.found);
        assert!(info.content.starts_with("func Run() {"));
        assert!(info.content.ends_with('}'));
        assert_eq!(&SOURCE[info.start_offset..info.end_offset], info.content);
        assert_eq!(info.start_line, 30);
        assert_eq!(info.end_line, 32);
    }

    #[test]
    fn test_methods_are_receiver_qualified() {
        let value = find(PartType::Func, "Config.Name");
        let pointer = find(PartType::Func, "*Config.Name");
        assert!(value.found && pointer.found);
        assert_ne!(value.start_offset, pointer.start_offset);
        assert!(value.content.starts_with("func (c Config)"));
        assert!(pointer.content.starts_with("func (c *Config)"));

        assert!(!find(PartType::Func, "Name").found);
    }

    #[test]
    fn test_missing_function_is_not_an_error() {
        let info = find(PartType::Func, "Bar");
        assert_eq!(info, PartInfo::not_found());
    }

    #[test]
    fn test_const_returns_whole_block() {
        let info = find(PartType::Const, "MinDelay");
        assert!(info.content.starts_with("const ("));
        assert!(info.content.ends_with(')'));
        assert_eq!(info.start_line, 11);
        assert_eq!(info.end_line, 14);
    }

    #[test]
    fn test_type_and_var() {
        assert!(find(PartType::Type, "Config").content.starts_with("type Config struct"));
        assert_eq!(find(PartType::Var, "debug").content, "var debug = false");
        assert!(!find(PartType::Var, "MaxRetries").found);
    }

    #[test]
    fn test_import_paths() {
        assert_eq!(find(PartType::Import, "fmt").content, "\"fmt\"");
        assert_eq!(find(PartType::Import, "\"fmt\"").content, "\"fmt\"");
        assert_eq!(find(PartType::Import, "strings").content, "str \"strings\"");
        assert_eq!(find(PartType::Import, "os").content, "`os`");
        assert!(!find(PartType::Import, "io").found);
    }

    #[test]
    fn test_package_span_is_name_only() {
        let info = find(PartType::Package, "demo");
        assert_eq!(info.content, "demo");
        assert_eq!(info.start_line, 2);
        assert!(!find(PartType::Package, "other").found);
    }

    #[test]
    fn test_replace_round_trip() {
        let processor = GoProcessor::new();
        for (part_type, name) in [
            (PartType::Func, "Run"),
            (PartType::Func, "*Config.Name"),
            (PartType::Const, "MaxRetries"),
            (PartType::Type, "Config"),
            (PartType::Import, "strings"),
            (PartType::Package, "demo"),
        ] {
            let args = PartArgs::new("go", SOURCE, part_type, name);
            let info = processor.find_part(&args).unwrap();
            let result = processor
                .replace_part(&args.with_new_content(info.content))
                .unwrap();
            assert_eq!(result, SOURCE, "round trip changed {part_type} {name}");
        }
    }

    #[test]
    fn test_replace_returns_whole_buffer() {
        let source = "package demo\n\nfunc Foo() {}\n\nfunc Bar() {}\n";
        let args = PartArgs::new("go", source, PartType::Func, "Foo")
            .with_new_content("func Foo() int { return 1 }");
        let result = GoProcessor::new().replace_part(&args).unwrap();
        assert_eq!(
            result,
            "package demo\n\nfunc Foo() int { return 1 }\n\nfunc Bar() {}\n"
        );
    }

    #[test]
    fn test_broken_replacement_is_distinguished() {
        let source = "package demo\n\nfunc Foo() {}\n";
        let args = PartArgs::new("go", source, PartType::Func, "Foo")
            .with_new_content("func Foo() {");
        let err = GoProcessor::new().replace_part(&args).unwrap_err();
        assert!(err.is_invalid_replacement(), "unexpected error: {err}");
        assert!(!err.is_syntax());
    }

    #[test]
    fn test_broken_source_is_syntax_error() {
        let args = PartArgs::new("go", "package demo\n\nfunc Foo() {\n", PartType::Func, "Foo");
        let err = GoProcessor::new().find_part(&args).unwrap_err();
        assert!(err.is_syntax());
        match &err {
            Error::SourceSyntax { kind, name, source } => {
                assert_eq!(kind, "func");
                assert_eq!(name, "Foo");
                assert!(matches!(**source, Error::Syntax { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = GoProcessor::new()
            .replace_part(&args.with_new_content("func Foo() {}"))
            .unwrap_err();
        assert!(err.is_syntax());
        assert!(!err.is_invalid_replacement());
    }

    #[test]
    fn test_replace_missing_part() {
        let args = PartArgs::new("go", "package demo\n", PartType::Func, "Foo")
            .with_new_content("func Foo() {}");
        let err = GoProcessor::new().replace_part(&args).unwrap_err();
        assert!(matches!(err, Error::PartNotFound { .. }));
        assert_eq!(err.to_string(), "func \"Foo\" not found");
    }

    #[test]
    fn test_validate_content_and_syntax() {
        let processor = GoProcessor::new();
        let args = PartArgs::new("go", SOURCE, PartType::Func, "Run").with_new_content("var x = 1");
        assert!(matches!(
            processor.validate_content(&args),
            Err(Error::ContentShape { .. })
        ));
        let args = args.with_new_content("func Run() {}");
        assert!(processor.validate_content(&args).is_ok());

        assert!(processor.validate_syntax(SOURCE).is_ok());
        assert!(processor.validate_syntax("package demo\nfunc {").is_err());
    }
}
