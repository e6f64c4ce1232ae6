//! Arena identifiers
//!
//! Every cross-structure link in a render goes through one of these indices instead of a
//! pointer, so side tables (rewrites, back-references) can be keyed on them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node inside one module's [`SyntaxTree`](crate::features::parsing::domain::SyntaxTree)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a module inside the render's module table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(pub u32);

impl ModuleId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module#{}", self.0)
    }
}

/// Index of a definition inside the render's definition table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefinitionId(pub u32);

impl DefinitionId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Globally unique node address: (module, node)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey {
    pub module: ModuleId,
    pub node: NodeId,
}

impl NodeKey {
    pub fn new(module: ModuleId, node: NodeId) -> Self {
        Self { module, node }
    }
}
