//! Go language analyzer using tree-sitter.
//!
//! Parses Go source, rejects trees with syntax errors, and runs the Go
//! documentation rules over a parsed file.

use std::path::Path;

use tracing::trace;
use tree_sitter::{Language, Node, Parser};

use crate::analysis::{LanguageAnalyzer, ParsedFile, SourceFile};
use crate::detect::{rules, DocException, RuleSet};
use crate::error::{Error, Result};

/// Node kinds allowed directly under `source_file`.
const TOP_LEVEL_KINDS: &[&str] = &[
    "package_clause",
    "import_declaration",
    "function_declaration",
    "method_declaration",
    "type_declaration",
    "const_declaration",
    "var_declaration",
    "comment",
];

/// Go language analyzer.
#[derive(Clone)]
pub struct GoAnalyzer {
    language: Language,
}

impl GoAnalyzer {
    /// Create a new Go analyzer.
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    /// Create a new parser for this thread.
    fn create_parser(&self) -> Result<Parser> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| Error::Parser(e.to_string()))?;
        Ok(parser)
    }

    /// Check a parsed tree for Go syntax errors.
    ///
    /// Tree-sitter always produces a tree, so errors are detected from ERROR
    /// and MISSING nodes. The grammar also accepts a few things the Go
    /// compiler does not (top-level statements, a missing package clause);
    /// those are rejected here too.
    pub fn check_syntax(&self, parsed: &ParsedFile) -> Result<()> {
        let root = parsed.tree.root_node();
        if let Some(node) = first_error(root) {
            return Err(syntax_error(&parsed.path, node));
        }

        let mut cursor = root.walk();
        let children: Vec<Node> = root.named_children(&mut cursor).collect();
        if let Some(stray) = children
            .iter()
            .find(|n| !TOP_LEVEL_KINDS.contains(&n.kind()))
        {
            return Err(syntax_error(&parsed.path, *stray));
        }
        match children.iter().find(|n| n.kind() != "comment") {
            Some(first) if first.kind() == "package_clause" => Ok(()),
            Some(first) => Err(syntax_error(&parsed.path, *first)),
            None => Err(Error::Syntax {
                path: parsed.path.clone(),
                line: 1,
                column: 1,
            }),
        }
    }

    /// Parse without validating.
    fn parse_tree(&self, path: &Path, source: &[u8]) -> Result<ParsedFile> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| Error::Parser(format!("failed to parse {}", path.display())))?;
        Ok(ParsedFile {
            tree,
            language: self.language.clone(),
            source: source.to_vec(),
            path: path.to_string_lossy().to_string(),
        })
    }
}

impl Default for GoAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for GoAnalyzer {
    fn language_id(&self) -> &'static str {
        "go"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["go"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> Result<ParsedFile> {
        let parsed = self.parse_tree(path, source)?;
        self.check_syntax(&parsed)?;
        trace!(path = %parsed.path, "parsed go source");
        Ok(parsed)
    }

    fn doc_exceptions(&self, file: &SourceFile, rules: &RuleSet) -> Vec<DocException> {
        rules::check_file(file, rules)
    }
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn syntax_error(path: &str, node: Node) -> Error {
    let pos = node.start_position();
    Error::Syntax {
        path: path.to_string(),
        line: pos.row + 1,
        column: pos.column + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<ParsedFile> {
        GoAnalyzer::new().parse(Path::new("test.go"), source.as_bytes())
    }

    #[test]
    fn test_parse_valid_source() {
        let parsed = parse("package demo\n\nfunc Foo() {}\n").unwrap();
        assert_eq!(parsed.tree.root_node().kind(), "source_file");
        assert_eq!(parsed.source_str(), "package demo\n\nfunc Foo() {}\n");
    }

    #[test]
    fn test_unmatched_brace_is_syntax_error() {
        let err = parse("package demo\n\nfunc Foo() {\n").err().unwrap();
        assert!(err.is_syntax(), "unexpected error: {err}");
    }

    #[test]
    fn test_missing_package_clause_is_syntax_error() {
        let err = parse("func Foo() {}\n").err().unwrap();
        match err {
            Error::Syntax { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_top_level_statement_is_syntax_error() {
        let err = parse("package demo\n\nx := 1\n").err().unwrap();
        match err {
            Error::Syntax { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_comments_before_package_are_allowed() {
        assert!(parse("// Package demo is a demo.\npackage demo\n").is_ok());
    }

    #[test]
    fn test_handles_extension() {
        let analyzer = GoAnalyzer::new();
        assert!(analyzer.handles_extension("go"));
        assert!(analyzer.handles_extension("GO"));
        assert!(!analyzer.handles_extension("rs"));
    }
}
