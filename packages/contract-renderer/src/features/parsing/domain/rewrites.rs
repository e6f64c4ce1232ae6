//! Rewrite side table
//!
//! Replacement text for nodes, keyed by (module, node). The printer consults it instead of
//! the nodes carrying mutable state.

use crate::shared::models::{ModuleId, NodeId, NodeKey};
use std::collections::HashMap;

/// Lookup used by the printer
pub trait Rewrites {
    fn replacement(&self, node: NodeId) -> Option<&str>;
}

/// Print source exactly as parsed
pub struct NoRewrites;

impl Rewrites for NoRewrites {
    fn replacement(&self, _node: NodeId) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct RewriteTable {
    entries: HashMap<NodeKey, String>,
}

impl RewriteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set replacement text, returning the previous one
    pub fn insert(&mut self, key: NodeKey, text: impl Into<String>) -> Option<String> {
        self.entries.insert(key, text.into())
    }

    pub fn get(&self, key: NodeKey) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrites of a single module, in the shape the printer wants
    pub fn for_module(&self, module: ModuleId) -> ModuleRewrites<'_> {
        ModuleRewrites {
            table: self,
            module,
        }
    }
}

pub struct ModuleRewrites<'a> {
    table: &'a RewriteTable,
    module: ModuleId,
}

impl Rewrites for ModuleRewrites<'_> {
    fn replacement(&self, node: NodeId) -> Option<&str> {
        self.table.get(NodeKey::new(self.module, node))
    }
}

impl Rewrites for HashMap<NodeId, String> {
    fn replacement(&self, node: NodeId) -> Option<&str> {
        self.get(&node).map(String::as_str)
    }
}
