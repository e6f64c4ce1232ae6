//! Back-references from rewritten nodes to the definitions they denote
//!
//! Names are not unique before namespacing and could collide by accident after it, so dead
//! code elimination reads this table instead of re-deriving targets from strings.

use crate::features::module_graph::DefinitionTable;
use crate::shared::models::{DefinitionId, ModuleId, NodeKey};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolRef {
    /// Exact definition
    Definition(DefinitionId),
    /// `module.name` whose definition was not known when the node was rewritten
    Hint { name: String, module: ModuleId },
}

impl SymbolRef {
    /// Resolve a hint against the final definition table
    pub fn resolve(&self, definitions: &DefinitionTable) -> Option<DefinitionId> {
        match self {
            SymbolRef::Definition(id) => Some(*id),
            SymbolRef::Hint { name, module } => definitions.lookup(*module, name),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct SymbolRefTable {
    refs: HashMap<NodeKey, SymbolRef>,
    /// Reference nodes grouped by the top-level statement containing them
    by_statement: HashMap<NodeKey, Vec<NodeKey>>,
}

impl SymbolRefTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, statement: NodeKey, node: NodeKey, symbol: SymbolRef) {
        if self.refs.insert(node, symbol).is_none() {
            self.by_statement.entry(statement).or_default().push(node);
        }
    }

    pub fn get(&self, node: NodeKey) -> Option<&SymbolRef> {
        self.refs.get(&node)
    }

    /// References made from inside `statement`
    pub fn in_statement(&self, statement: NodeKey) -> impl Iterator<Item = &SymbolRef> {
        self.by_statement
            .get(&statement)
            .into_iter()
            .flatten()
            .filter_map(|node| self.refs.get(node))
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}
