//! Top-level definitions of feature modules

use crate::shared::models::{DefinitionId, ModuleId, NodeId};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DefinitionKind {
    Function,
    Class,
    Assignment,
    AnnotatedAssignment,
}

#[derive(Debug, Clone)]
pub struct Definition {
    pub id: DefinitionId,
    pub module: ModuleId,
    pub local_name: String,
    /// Set by the namespacer
    pub namespaced_name: Option<String>,
    /// Top-level statement that introduces the name
    pub statement: NodeId,
    /// Identifier node holding the name at the definition site
    pub binding: NodeId,
    pub kind: DefinitionKind,
}

impl Definition {
    /// Name as it appears in the rendered output
    pub fn output_name(&self) -> &str {
        self.namespaced_name.as_deref().unwrap_or(&self.local_name)
    }
}

#[derive(Debug, Default)]
pub struct DefinitionTable {
    definitions: Vec<Definition>,
    by_module: HashMap<ModuleId, Vec<DefinitionId>>,
    by_name: HashMap<(ModuleId, String), DefinitionId>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a definition. Returns `None` when the module already defines `local_name`.
    pub fn add(
        &mut self,
        module: ModuleId,
        local_name: impl Into<String>,
        statement: NodeId,
        binding: NodeId,
        kind: DefinitionKind,
    ) -> Option<DefinitionId> {
        let local_name = local_name.into();
        let key = (module, local_name.clone());
        if self.by_name.contains_key(&key) {
            return None;
        }
        let id = DefinitionId(self.definitions.len() as u32);
        self.definitions.push(Definition {
            id,
            module,
            local_name,
            namespaced_name: None,
            statement,
            binding,
            kind,
        });
        self.by_name.insert(key, id);
        self.by_module.entry(module).or_default().push(id);
        Some(id)
    }

    #[inline]
    pub fn get(&self, id: DefinitionId) -> &Definition {
        &self.definitions[id.index()]
    }

    pub fn lookup(&self, module: ModuleId, local_name: &str) -> Option<DefinitionId> {
        self.by_name.get(&(module, local_name.to_string())).copied()
    }

    /// Definitions of `module` in source order
    pub fn in_module(&self, module: ModuleId) -> &[DefinitionId] {
        self.by_module
            .get(&module)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Distinct statements introducing definitions of `module`, in source order
    pub fn statements(&self, module: ModuleId) -> Vec<NodeId> {
        let mut statements: Vec<NodeId> = self
            .in_module(module)
            .iter()
            .map(|id| self.get(*id).statement)
            .collect();
        statements.dedup();
        statements
    }

    pub fn set_namespaced_name(&mut self, id: DefinitionId, name: String) {
        self.definitions[id.index()].namespaced_name = Some(name);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
