//! Views over top-level declaration nodes.
//!
//! A `Declaration` pairs one top-level node with the file that owns it, so
//! names, positions and attached comments can be resolved on demand.

use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor};
use tracing::debug;

use super::{CommentGroup, DeclarationKind, Name, ParsedFile, SourceFile, Span};

/// Tree-sitter query for every comment under a declaration.
const COMMENT_QUERY: &str = "(comment) @comment";

/// Anonymous statement terminators that sit between declarations.
const TERMINATORS: &[&str] = &["\n", ";", "\0"];

/// A top-level declaration plus a back-reference to its file.
#[derive(Clone, Copy)]
pub struct Declaration<'a> {
    node: Node<'a>,
    kind: DeclarationKind,
    file: &'a SourceFile,
}

impl<'a> Declaration<'a> {
    /// Wrap a node; returns None for nodes that are not declarations.
    pub fn new(node: Node<'a>, file: &'a SourceFile) -> Option<Self> {
        let kind = DeclarationKind::from_node_kind(node.kind())?;
        Some(Self { node, kind, file })
    }

    pub fn kind(&self) -> DeclarationKind {
        self.kind
    }

    /// Span of the whole declaration.
    pub fn span(&self) -> Span {
        Span::from_node(self.node)
    }

    fn parsed(&self) -> &'a ParsedFile {
        &self.file.parsed
    }

    fn name_of(&self, node: Node<'a>) -> Name {
        Name {
            text: self.parsed().node_text(node).to_string(),
            span: Span::from_node(node),
        }
    }

    /// Name of a package clause, function or method. Blocks have no single name.
    pub fn name(&self) -> Option<Name> {
        let node = match self.kind {
            DeclarationKind::Package => {
                let mut cursor = self.node.walk();
                let ident = self
                    .node
                    .named_children(&mut cursor)
                    .find(|n| n.kind() == "package_identifier");
                ident?
            }
            DeclarationKind::Function | DeclarationKind::Method => {
                self.node.child_by_field_name("name")?
            }
            _ => return None,
        };
        Some(self.name_of(node))
    }

    /// Receiver type of a method, prefixed with `*` for pointer receivers.
    pub fn receiver(&self) -> Option<String> {
        if self.kind != DeclarationKind::Method {
            return None;
        }
        let params = self.node.child_by_field_name("receiver")?;
        let mut cursor = params.walk();
        let param = params
            .named_children(&mut cursor)
            .find(|n| n.kind() == "parameter_declaration");
        let ty = param?.child_by_field_name("type")?;
        self.receiver_type_name(ty)
    }

    fn receiver_type_name(&self, ty: Node<'a>) -> Option<String> {
        match ty.kind() {
            "pointer_type" => {
                let inner = self.receiver_type_name(ty.named_child(0)?)?;
                Some(format!("*{}", inner))
            }
            "generic_type" => self.receiver_type_name(ty.child_by_field_name("type")?),
            "parenthesized_type" => self.receiver_type_name(ty.named_child(0)?),
            "type_identifier" => Some(self.parsed().node_text(ty).to_string()),
            _ => None,
        }
    }

    /// Name used to address the declaration: `Recv.Name` for methods.
    pub fn qualified_name(&self) -> Option<String> {
        let name = self.name()?.text;
        match self.receiver() {
            Some(recv) => Some(format!("{}.{}", recv, name)),
            None => Some(name),
        }
    }

    /// Leading documentation comment of the declaration.
    pub fn doc(&self) -> Option<CommentGroup> {
        leading_comments(self.node, self.parsed())
    }

    /// Whether the declaration uses a parenthesized block.
    pub fn is_grouped(&self) -> bool {
        let mut cursor = self.node.walk();
        let grouped = self
            .node
            .children(&mut cursor)
            .any(|c| c.kind() == "(" || c.kind().ends_with("_spec_list"));
        grouped
    }

    /// Specifications held by an import, type, const or var declaration.
    pub fn specs(&self) -> Vec<Spec<'a>> {
        let mut nodes = Vec::new();
        collect_specs(self.node, self.kind.spec_kinds(), &mut nodes);
        nodes
            .into_iter()
            .map(|node| Spec { node, decl: *self })
            .collect()
    }

    /// Comments inside the declaration, for same-line lookups by name.
    pub fn trailing_comments(&self) -> TrailingComments<'a> {
        let parsed = self.parsed();
        let query = match Query::new(&parsed.language, COMMENT_QUERY) {
            Ok(q) => q,
            Err(e) => {
                debug!(error = %e, "comment query failed to compile");
                return TrailingComments {
                    comments: Vec::new(),
                    parsed,
                };
            }
        };
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, self.node, &parsed.source[..]);

        let mut comments = Vec::new();
        while let Some(m) = matches.next() {
            for capture in m.captures {
                comments.push(capture.node);
            }
        }
        TrailingComments { comments, parsed }
    }
}

/// Comment nodes of one declaration, collected once.
pub struct TrailingComments<'a> {
    comments: Vec<Node<'a>>,
    parsed: &'a ParsedFile,
}

impl<'a> TrailingComments<'a> {
    /// Comment on the same line as `name`, starting to its right.
    pub fn for_name(&self, name: &Name) -> Option<CommentGroup> {
        let row = name.span.start_line;
        let comment = self
            .comments
            .iter()
            .find(|c| c.start_position().row + 1 == row && c.start_byte() >= name.span.end_byte)?;
        Some(CommentGroup::from_raw(
            [self.parsed.node_text(*comment)],
            Span::from_node(*comment),
        ))
    }
}

/// One specification inside a declaration block.
#[derive(Clone, Copy)]
pub struct Spec<'a> {
    node: Node<'a>,
    decl: Declaration<'a>,
}

impl<'a> Spec<'a> {
    pub fn span(&self) -> Span {
        Span::from_node(self.node)
    }

    /// Names bound by the specification (import aliases for imports).
    ///
    /// The `name` field of a const spec also covers the `,` separators,
    /// so only named nodes count.
    pub fn names(&self) -> Vec<Name> {
        let mut cursor = self.node.walk();
        let nodes: Vec<Node<'a>> = self
            .node
            .children_by_field_name("name", &mut cursor)
            .filter(|n| n.is_named())
            .collect();
        nodes.into_iter().map(|n| self.decl.name_of(n)).collect()
    }

    /// Raw path literal of an import specification, quotes included.
    pub fn import_path(&self) -> Option<String> {
        let path = self.node.child_by_field_name("path")?;
        Some(self.decl.parsed().node_text(path).to_string())
    }

    /// Leading documentation comment of the specification itself.
    pub fn doc(&self) -> Option<CommentGroup> {
        leading_comments(self.node, self.decl.parsed())
    }
}

fn collect_specs<'a>(node: Node<'a>, kinds: &[&str], out: &mut Vec<Node<'a>>) {
    let mut cursor = node.walk();
    let children: Vec<Node<'a>> = node.named_children(&mut cursor).collect();
    for child in children {
        if kinds.contains(&child.kind()) {
            out.push(child);
        } else if child.kind().ends_with("_spec_list") {
            collect_specs(child, kinds, out);
        }
    }
}

/// Previous sibling, skipping statement terminators.
fn prev_token(node: Node) -> Option<Node> {
    let mut current = node.prev_sibling();
    while let Some(n) = current {
        if !n.is_named() && TERMINATORS.contains(&n.kind()) {
            current = n.prev_sibling();
            continue;
        }
        return Some(n);
    }
    None
}

/// Comment group ending on the line right above `node`.
///
/// A comment that shares its line with a preceding token belongs to that
/// token and ends the group.
fn leading_comments(node: Node, parsed: &ParsedFile) -> Option<CommentGroup> {
    let mut comments = Vec::new();
    let mut next_row = node.start_position().row;
    let mut current = prev_token(node);

    while let Some(prev) = current {
        if prev.kind() != "comment" {
            break;
        }
        if next_row.saturating_sub(prev.end_position().row) > 1 {
            break;
        }
        let before = prev_token(prev);
        if let Some(b) = before {
            if b.kind() != "comment" && b.end_position().row == prev.start_position().row {
                break;
            }
        }
        comments.push(prev);
        next_row = prev.start_position().row;
        current = before;
    }

    let first = *comments.last()?;
    let last = *comments.first()?;
    comments.reverse();

    let start = Span::from_node(first);
    let end = Span::from_node(last);
    let span = Span {
        start_byte: start.start_byte,
        end_byte: end.end_byte,
        start_line: start.start_line,
        start_col: start.start_col,
        end_line: end.end_line,
        end_col: end.end_col,
    };
    Some(CommentGroup::from_raw(
        comments.iter().map(|c| parsed.node_text(*c)),
        span,
    ))
}
