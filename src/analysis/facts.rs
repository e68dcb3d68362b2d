//! Fact structures extracted from AST analysis.

use std::fmt;

use serde::Serialize;

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// Kind of top-level declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Package,
    Import,
    Function,
    Method,
    Type,
    Const,
    Var,
}

impl DeclarationKind {
    /// Map a tree-sitter node kind to a declaration kind.
    pub fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "package_clause" => Some(DeclarationKind::Package),
            "import_declaration" => Some(DeclarationKind::Import),
            "function_declaration" => Some(DeclarationKind::Function),
            "method_declaration" => Some(DeclarationKind::Method),
            "type_declaration" => Some(DeclarationKind::Type),
            "const_declaration" => Some(DeclarationKind::Const),
            "var_declaration" => Some(DeclarationKind::Var),
            _ => None,
        }
    }

    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Package => "package",
            DeclarationKind::Import => "import",
            DeclarationKind::Function => "function",
            DeclarationKind::Method => "method",
            DeclarationKind::Type => "type",
            DeclarationKind::Const => "const",
            DeclarationKind::Var => "var",
        }
    }

    /// Node kind of the specifications held by this declaration.
    pub(crate) fn spec_kinds(&self) -> &'static [&'static str] {
        match self {
            DeclarationKind::Import => &["import_spec"],
            DeclarationKind::Type => &["type_spec", "type_alias"],
            DeclarationKind::Const => &["const_spec"],
            DeclarationKind::Var => &["var_spec"],
            _ => &[],
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bound identifier and where it sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub text: String,
    pub span: Span,
}

/// A run of adjacent comments, with comment markers removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    /// Comment text without `//`, `/*`, `*/` markers or tool directives.
    pub text: String,
    /// Span from the first comment to the last.
    pub span: Span,
}

impl CommentGroup {
    /// Build a group from raw comment texts.
    pub fn from_raw<'a>(raw: impl IntoIterator<Item = &'a str>, span: Span) -> Self {
        let mut lines = Vec::new();
        for comment in raw {
            if let Some(body) = comment.strip_prefix("//") {
                if is_directive(body) {
                    continue;
                }
                lines.push(body.strip_prefix(' ').unwrap_or(body).to_string());
            } else if let Some(body) = comment.strip_prefix("/*") {
                let body = body.strip_suffix("*/").unwrap_or(body);
                lines.extend(body.lines().map(|l| l.to_string()));
            } else {
                lines.push(comment.to_string());
            }
        }
        Self {
            text: lines.join("\n"),
            span,
        }
    }

    /// True when the group has no visible text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// First line after trimming surrounding whitespace.
    pub fn first_line(&self) -> &str {
        self.text.trim().lines().next().unwrap_or("")
    }

    /// Whether the first line starts with `name` followed by a space, tab or `(`.
    pub fn starts_with_name(&self, name: &str) -> bool {
        match self.first_line().strip_prefix(name) {
            Some(rest) => rest.starts_with(&[' ', '\t', '('][..]),
            None => false,
        }
    }
}

/// `//go:generate`, `//lint:ignore` and friends: no space, `word:` prefix.
fn is_directive(body: &str) -> bool {
    let Some((word, _)) = body.split_once(':') else {
        return false;
    };
    !word.is_empty() && word.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}
