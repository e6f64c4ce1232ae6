//! Source printer
//!
//! Prints a node by copying its source text and splicing in replacement text wherever the
//! rewrite table has an entry. An entry on a node hides every rewrite below it.

use crate::features::parsing::domain::{Rewrites, SyntaxTree};
use crate::shared::models::NodeId;

pub struct SourcePrinter<'t, R> {
    tree: &'t SyntaxTree,
    rewrites: R,
}

impl<'t, R: Rewrites> SourcePrinter<'t, R> {
    pub fn new(tree: &'t SyntaxTree, rewrites: R) -> Self {
        Self { tree, rewrites }
    }

    pub fn print(&self, id: NodeId) -> String {
        let mut out = String::with_capacity(self.tree.node(id).range.len());
        self.write(id, &mut out);
        out
    }

    fn write(&self, id: NodeId, out: &mut String) {
        if let Some(text) = self.rewrites.replacement(id) {
            out.push_str(text);
            return;
        }
        let source = self.tree.source();
        let node = self.tree.node(id);
        let mut cursor = node.range.start;
        for &child in &node.children {
            let range = &self.tree.node(child).range;
            out.push_str(&source[cursor..range.start]);
            self.write(child, out);
            cursor = range.end;
        }
        out.push_str(&source[cursor..node.range.end]);
    }
}
