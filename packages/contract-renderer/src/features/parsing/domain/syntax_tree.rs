//! Arena-backed syntax tree for one module

use super::syntax_node::{SyntaxKind, SyntaxNode};
use crate::errors::SourceLocation;
use crate::shared::models::NodeId;
use std::path::{Path, PathBuf};

/// Parsed module: source text plus the node arena
///
/// Nodes are never mutated after parsing. All rewriting happens through side tables keyed
/// by [`NodeId`].
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    path: PathBuf,
    source: String,
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Empty tree; the first node pushed becomes the root
    pub fn new(path: impl Into<PathBuf>, source: String) -> Self {
        Self {
            path: path.into(),
            source,
            nodes: Vec::new(),
        }
    }

    pub fn push(&mut self, node: SyntaxNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        if let Some(parent) = node.parent {
            self.nodes[parent.index()].children.push(id);
        }
        self.nodes.push(node);
        id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.node(id).kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn field(&self, id: NodeId) -> Option<&'static str> {
        self.node(id).field
    }

    /// Source text covered by `id`
    pub fn text(&self, id: NodeId) -> &str {
        self.source.get(self.node(id).range.clone()).unwrap_or("")
    }

    /// Top-level statements of the module
    pub fn statements(&self) -> &[NodeId] {
        if self.nodes.is_empty() {
            return &[];
        }
        &self.node(self.root()).children
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// First child stored under grammar field `field`
    pub fn child(&self, id: NodeId, field: &str) -> Option<NodeId> {
        self.children_by_field(id, field).next()
    }

    pub fn children_by_field<'a>(
        &'a self,
        id: NodeId,
        field: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(id)
            .iter()
            .copied()
            .filter(move |child| self.node(*child).field == Some(field))
    }

    /// Children that do not occupy a grammar field
    pub fn unnamed_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |child| self.node(*child).field.is_none())
    }

    /// Pre-order traversal of `id` and everything below it
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// Strip any number of redundant parentheses
    pub fn unwrap_parens(&self, mut id: NodeId) -> NodeId {
        while self.kind(id) == SyntaxKind::ParenthesizedExpression {
            match self.children(id) {
                [inner] => id = *inner,
                _ => break,
            }
        }
        id
    }

    /// For a decorated definition, the wrapped `def`/`class`; otherwise `id` itself
    pub fn undecorated(&self, id: NodeId) -> NodeId {
        if self.kind(id) == SyntaxKind::DecoratedDef {
            self.child(id, "definition").unwrap_or(id)
        } else {
            id
        }
    }

    /// Error location for a node (1-based column)
    pub fn location(&self, id: NodeId) -> SourceLocation {
        let span = self.node(id).span;
        SourceLocation::new(self.path.clone(), span.start_line, span.start_col + 1)
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
