//! Tree-sitter parser implementation
//!
//! This is where the tree-sitter dependency lives.

use tree_sitter::{Tree, TreeCursor};

use crate::errors::{RenderError, Result, SourceLocation};
use crate::features::parsing::domain::{SyntaxKind, SyntaxNode, SyntaxTree};
use crate::features::parsing::ports::SourceParser;
use crate::shared::models::NodeId;
use crate::shared::utils::tree_sitter::{find_first_error, node_to_span, python_parser};
use std::path::Path;

/// Tree-sitter based parser for the Python grammar
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeSitterParser;

impl TreeSitterParser {
    pub fn python() -> Self {
        Self
    }

    /// Lower the concrete tree into the arena, keeping named non-extra nodes only
    fn convert_tree(&self, tree: &Tree, path: &Path, source: String) -> SyntaxTree {
        let mut arena = SyntaxTree::new(path, source);
        let mut cursor = tree.walk();
        let root = cursor.node();
        let root_id = arena.push(SyntaxNode::new(
            SyntaxKind::from_raw(root.kind()),
            root.byte_range(),
            node_to_span(&root),
        ));
        self.convert_children(&mut cursor, &mut arena, root_id);
        arena
    }

    fn convert_children(&self, cursor: &mut TreeCursor, arena: &mut SyntaxTree, parent: NodeId) {
        if !cursor.goto_first_child() {
            return;
        }
        loop {
            let node = cursor.node();
            if node.is_named() && !node.is_extra() {
                let id = arena.push(
                    SyntaxNode::new(
                        SyntaxKind::from_raw(node.kind()),
                        node.byte_range(),
                        node_to_span(&node),
                    )
                    .with_field(cursor.field_name())
                    .with_parent(Some(parent)),
                );
                self.convert_children(cursor, arena, id);
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }
}

impl SourceParser for TreeSitterParser {
    fn parse(&self, path: &Path, source: String) -> Result<SyntaxTree> {
        let mut parser = python_parser().map_err(|e| RenderError::ParserUnavailable {
            reason: e.to_string(),
        })?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| RenderError::ParserUnavailable {
                reason: "parser returned no tree".to_string(),
            })?;

        if let Some(error) = find_first_error(&tree.root_node()) {
            let span = node_to_span(&error);
            return Err(RenderError::Parse {
                location: SourceLocation::new(path, span.start_line, span.start_col + 1),
            });
        }

        Ok(self.convert_tree(&tree, path, source))
    }
}
