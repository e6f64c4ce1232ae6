//! Symbol namespacer
//!
//! Two passes over the linked statements of every module, reference rewriting first and
//! definition renaming second. Nodes are never mutated: new text goes into the rewrite table
//! and the definition each rewritten node denotes goes into the [`SymbolRefTable`].

use super::naming::ModulePrefixes;
use super::scope::ScopeAnalysis;
use super::symbol_ref::{SymbolRef, SymbolRefTable};
use crate::errors::{RenderError, Result};
use crate::features::module_graph::{
    linked_statements, CapabilityImport, CapabilitySet, DefinitionTable, ImportGraph, ModuleTable,
};
use crate::features::parsing::{RewriteTable, Statement, SyntaxKind, SyntaxTree};
use crate::shared::models::{ModuleId, NodeId, NodeKey};
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub struct Namespacer<'a> {
    modules: &'a ModuleTable,
    imports: &'a ImportGraph,
}

impl<'a> Namespacer<'a> {
    pub fn new(modules: &'a ModuleTable, imports: &'a ImportGraph) -> Self {
        Self { modules, imports }
    }

    /// Assign namespaced names and rewrite every reference to them
    pub fn run(
        &self,
        definitions: &mut DefinitionTable,
        capabilities: &CapabilitySet,
        rewrites: &mut RewriteTable,
    ) -> Result<SymbolRefTable> {
        let prefixes = ModulePrefixes::assign(self.modules, definitions);
        self.assign_names(&prefixes, definitions, capabilities)?;

        let mut refs = SymbolRefTable::new();
        let mut rewritten = 0;
        for module in self.modules.ids() {
            let statements = linked_statements(self.modules, definitions, module);
            let tree = &self.modules.get(module).tree;
            let scopes = ScopeAnalysis::new(tree);

            let covered = self.rewrite_references(
                &prefixes,
                module,
                &statements,
                &scopes,
                definitions,
                rewrites,
                &mut refs,
            )?;
            rewritten += covered.len();
            if !self.modules.get(module).is_root {
                self.rename_definitions(
                    module,
                    &statements,
                    &scopes,
                    &covered,
                    definitions,
                    rewrites,
                    &mut refs,
                );
            }
            debug!(
                module = %self.modules.get(module).name,
                statements = statements.len(),
                "namespaced module"
            );
        }
        debug!(references = refs.len(), module_references = rewritten, "namespacing finished");
        Ok(refs)
    }

    fn assign_names(
        &self,
        prefixes: &ModulePrefixes,
        definitions: &mut DefinitionTable,
        capabilities: &CapabilitySet,
    ) -> Result<()> {
        let mut owners: HashMap<String, ModuleId> = HashMap::new();
        let root = self.modules.root();
        if let Some(root) = root {
            for name in top_level_names(&root.tree) {
                owners.insert(name.to_string(), root.id);
            }
            for name in capabilities.iter().flat_map(bound_names) {
                owners.insert(name, root.id);
            }
        }

        let assigned: Vec<_> = definitions
            .iter()
            .map(|d| (d.id, d.module, prefixes.flat_name(d.module, &d.local_name)))
            .collect();
        for (id, module, name) in assigned {
            if let Some(other) = owners.get(&name) {
                return Err(RenderError::NamespaceCollision {
                    name,
                    module: self.modules.get(module).name.clone(),
                    other: self.modules.get(*other).name.clone(),
                });
            }
            owners.insert(name.clone(), module);
            definitions.set_namespaced_name(id, name);
        }
        Ok(())
    }

    /// Pass 1: `alias.member[.member...]` becomes one flat identifier.
    ///
    /// Returns the attribute nodes that were replaced.
    fn rewrite_references(
        &self,
        prefixes: &ModulePrefixes,
        module: ModuleId,
        statements: &[NodeId],
        scopes: &ScopeAnalysis<'_>,
        definitions: &DefinitionTable,
        rewrites: &mut RewriteTable,
        refs: &mut SymbolRefTable,
    ) -> Result<HashSet<NodeId>> {
        let tree = &self.modules.get(module).tree;
        let mut covered = HashSet::new();

        for &stmt in statements {
            for node in tree.descendants(stmt) {
                if tree.kind(node) != SyntaxKind::Attribute {
                    continue;
                }
                let Some(object) = tree.child(node, "object") else {
                    continue;
                };
                if tree.kind(object) != SyntaxKind::Identifier
                    || !self.imports.is_alias(module, tree.text(object))
                    || !scopes.is_module_reference(object)
                {
                    continue;
                }
                let (target, replaced, member) =
                    self.follow_chain(module, tree, node, object, definitions)?;

                let symbol = match definitions.lookup(target, member) {
                    Some(id) => SymbolRef::Definition(id),
                    None => SymbolRef::Hint {
                        name: member.to_string(),
                        module: target,
                    },
                };
                let name = match &symbol {
                    SymbolRef::Definition(id) => definitions.get(*id).output_name().to_string(),
                    SymbolRef::Hint { .. } => prefixes.flat_name(target, member),
                };
                rewrites.insert(NodeKey::new(module, replaced), name);
                refs.record(NodeKey::new(module, stmt), NodeKey::new(module, replaced), symbol);
                covered.insert(replaced);
            }
        }
        Ok(covered)
    }

    /// Walk `alias.b.c...` through modules that re-export feature imports.
    ///
    /// Returns the owning module, the attribute node to replace and the member name.
    fn follow_chain<'t>(
        &self,
        module: ModuleId,
        tree: &'t SyntaxTree,
        attribute: NodeId,
        object: NodeId,
        definitions: &DefinitionTable,
    ) -> Result<(ModuleId, NodeId, &'t str)> {
        let mut target = self.resolve_alias(module, tree, object, tree.text(object))?;
        let mut node = attribute;
        let mut member = self.member(tree, node);

        loop {
            let Some(parent) = tree.parent(node) else { break };
            let continues = tree.kind(parent) == SyntaxKind::Attribute
                && tree.field(node) == Some("object")
                && definitions.lookup(target, member).is_none()
                && self.imports.is_alias(target, member);
            if !continues {
                break;
            }
            target = self.resolve_alias(target, tree, parent, member)?;
            node = parent;
            member = self.member(tree, node);
        }
        Ok((target, node, member))
    }

    fn member<'t>(&self, tree: &'t SyntaxTree, attribute: NodeId) -> &'t str {
        tree.child(attribute, "attribute")
            .map(|id| tree.text(id))
            .unwrap_or_default()
    }

    fn resolve_alias(
        &self,
        module: ModuleId,
        tree: &SyntaxTree,
        at: NodeId,
        alias: &str,
    ) -> Result<ModuleId> {
        match self.imports.resolve_alias(module, alias).as_slice() {
            [edge] => Ok(edge.target),
            edges => Err(RenderError::AmbiguousAlias {
                location: tree.location(at),
                alias: alias.to_string(),
                candidates: edges
                    .iter()
                    .map(|e| self.modules.get(e.target).name.clone())
                    .collect(),
            }),
        }
    }

    /// Pass 2: a feature module's own names get their namespaced form
    fn rename_definitions(
        &self,
        module: ModuleId,
        statements: &[NodeId],
        scopes: &ScopeAnalysis<'_>,
        covered: &HashSet<NodeId>,
        definitions: &DefinitionTable,
        rewrites: &mut RewriteTable,
        refs: &mut SymbolRefTable,
    ) {
        let tree = &self.modules.get(module).tree;
        let mut bindings = HashSet::new();
        for &id in definitions.in_module(module) {
            let definition = definitions.get(id);
            bindings.insert(definition.binding);
            rewrites.insert(
                NodeKey::new(module, definition.binding),
                definition.output_name(),
            );
        }

        for &stmt in statements {
            for node in tree.descendants(stmt) {
                if bindings.contains(&node) || self.inside(tree, node, stmt, covered) {
                    continue;
                }
                if !scopes.is_module_reference(node) {
                    continue;
                }
                let Some(id) = definitions.lookup(module, tree.text(node)) else {
                    continue;
                };
                rewrites.insert(NodeKey::new(module, node), definitions.get(id).output_name());
                refs.record(
                    NodeKey::new(module, stmt),
                    NodeKey::new(module, node),
                    SymbolRef::Definition(id),
                );
            }
        }
    }

    /// Whether `node` sits under one of the `covered` attributes
    fn inside(
        &self,
        tree: &SyntaxTree,
        node: NodeId,
        stmt: NodeId,
        covered: &HashSet<NodeId>,
    ) -> bool {
        let mut current = tree.parent(node);
        while let Some(id) = current {
            if covered.contains(&id) {
                return true;
            }
            if id == stmt {
                break;
            }
            current = tree.parent(id);
        }
        false
    }
}

/// Names the root binds at module level
fn top_level_names(tree: &SyntaxTree) -> Vec<&str> {
    let mut names = Vec::new();
    for &stmt in tree.statements() {
        match tree.statement(stmt) {
            Statement::Function { name, .. } | Statement::Class { name, .. } => {
                names.push(tree.text(name))
            }
            statement => names.extend(
                statement
                    .targets()
                    .into_iter()
                    .filter(|t| tree.kind(*t) == SyntaxKind::Identifier)
                    .map(|t| tree.text(t)),
            ),
        }
    }
    names
}

/// Names a capability import binds in the output
fn bound_names(import: &CapabilityImport) -> Vec<String> {
    match import {
        CapabilityImport::Module { module, alias } => vec![alias
            .clone()
            .unwrap_or_else(|| module.split('.').next().unwrap_or_default().to_string())],
        CapabilityImport::Symbols { names, .. } => names
            .iter()
            .map(|n| n.alias.clone().unwrap_or_else(|| n.name.clone()))
            .collect(),
    }
}
