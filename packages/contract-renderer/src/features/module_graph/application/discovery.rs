//! Import graph discovery
//!
//! Depth-first walk from the template. Each import statement is classified as a capability
//! import (checked against the whitelist, merged into the capability set) or a feature
//! import (aliased, first-party, parsed and walked once per module key).

use crate::config::{ImportStyle, RenderConfig};
use crate::errors::{ImportViolation, RenderError, Result};
use crate::features::module_graph::domain::{
    CapabilitySet, DefinitionTable, ImportEdge, ImportGraph, ModuleKey, ModuleTable,
};
use crate::features::module_graph::infrastructure::statements::{
    read_definitions, read_import, FromNames, ImportStatement, PlainImport,
};
use crate::features::module_graph::infrastructure::type_hints::substitute_marker_types;
use crate::features::module_graph::ports::ModuleResolver;
use crate::features::parsing::{RewriteTable, SourceParser, Statement, SyntaxTree};
use crate::shared::models::{ModuleId, NodeId};
use std::path::Path;
use tracing::{debug, warn};

/// Everything discovery learns about the program
#[derive(Debug, Default)]
pub struct ModuleGraph {
    pub modules: ModuleTable,
    pub imports: ImportGraph,
    pub definitions: DefinitionTable,
    pub capabilities: CapabilitySet,
    pub root: Option<ModuleId>,
    /// Number of annotation sites where a marker type was replaced
    pub marker_substitutions: usize,
}

impl ModuleGraph {
    /// Root module id; discovery always sets it before returning
    pub fn root_id(&self) -> ModuleId {
        self.root.unwrap_or(ModuleId(0))
    }

    pub fn linked_statements(&self, module: ModuleId) -> Vec<NodeId> {
        linked_statements(&self.modules, &self.definitions, module)
    }
}

/// Top-level statements of `module` that take part in linking
///
/// For the root that is every statement except imports. For a feature module it is the
/// statements that introduce definitions; anything else there is never emitted.
pub fn linked_statements(
    modules: &ModuleTable,
    definitions: &DefinitionTable,
    module: ModuleId,
) -> Vec<NodeId> {
    let source = modules.get(module);
    if !source.is_root {
        return definitions.statements(module);
    }
    source
        .tree
        .statements()
        .iter()
        .copied()
        .filter(|stmt| {
            !matches!(
                source.tree.statement(*stmt),
                Statement::Import | Statement::ImportFrom
            )
        })
        .collect()
}

pub struct ImportDiscovery<'a, P, R> {
    config: &'a RenderConfig,
    parser: &'a P,
    resolver: &'a R,
}

impl<'a, P: SourceParser, R: ModuleResolver> ImportDiscovery<'a, P, R> {
    pub fn new(config: &'a RenderConfig, parser: &'a P, resolver: &'a R) -> Self {
        Self {
            config,
            parser,
            resolver,
        }
    }

    /// Walk the program rooted at `root_path`
    pub fn discover(&self, root_path: &Path, rewrites: &mut RewriteTable) -> Result<ModuleGraph> {
        let mut graph = ModuleGraph::default();
        let key = ModuleKey::from_path(root_path)?;
        let tree = self.load(root_path)?;
        let name = root_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let root = graph.modules.insert(name, key, tree, true);
        graph.root = Some(root);

        self.visit(&mut graph, root, rewrites)?;

        if graph.marker_substitutions > 0 {
            graph.capabilities.ensure_symbol(
                self.config.placeholder_module(),
                self.config.placeholder_type(),
            );
        }
        debug!(
            modules = graph.modules.len(),
            definitions = graph.definitions.len(),
            capabilities = graph.capabilities.len(),
            "import discovery finished"
        );
        Ok(graph)
    }

    fn load(&self, path: &Path) -> Result<SyntaxTree> {
        let source = std::fs::read_to_string(path).map_err(|e| RenderError::io(path, e))?;
        self.parser.parse(path, source)
    }

    fn visit(&self, graph: &mut ModuleGraph, module: ModuleId, rewrites: &mut RewriteTable) -> Result<()> {
        let statements: Vec<NodeId> = graph.modules.get(module).tree.statements().to_vec();
        let is_root = graph.modules.get(module).is_root;
        debug!(module = %graph.modules.get(module).name, "visiting module");

        for stmt in statements {
            let import = read_import(&graph.modules.get(module).tree, stmt);
            match import {
                Some(ImportStatement::Plain(entries)) => {
                    for entry in entries {
                        self.handle_import(graph, module, stmt, entry, rewrites)?;
                    }
                }
                Some(ImportStatement::From { module: from, names }) => {
                    self.handle_from_import(graph, module, stmt, &from, names)?;
                }
                None if !is_root => self.record_definitions(graph, module, stmt)?,
                None => {}
            }
        }

        let source = graph.modules.get(module);
        graph.marker_substitutions +=
            substitute_marker_types(&source.tree, module, self.config, rewrites);
        Ok(())
    }

    fn disallowed(
        &self,
        graph: &ModuleGraph,
        module: ModuleId,
        stmt: NodeId,
        violation: ImportViolation,
    ) -> RenderError {
        let tree = &graph.modules.get(module).tree;
        RenderError::DisallowedImport {
            location: tree.location(stmt),
            statement: tree.text(stmt).to_string(),
            violation,
        }
    }

    fn handle_import(
        &self,
        graph: &mut ModuleGraph,
        module: ModuleId,
        stmt: NodeId,
        entry: PlainImport,
        rewrites: &mut RewriteTable,
    ) -> Result<()> {
        let PlainImport { dotted_name, alias } = entry;

        if let Some(rule) = self.config.whitelist().get(&dotted_name) {
            return match rule.style {
                ImportStyle::FromOnly => Err(self.disallowed(
                    graph,
                    module,
                    stmt,
                    ImportViolation::ReservedCapability {
                        module: dotted_name,
                    },
                )),
                ImportStyle::DirectUnaliased if alias.is_some() => Err(self.disallowed(
                    graph,
                    module,
                    stmt,
                    ImportViolation::AliasedDirectImport {
                        module: dotted_name,
                    },
                )),
                _ => {
                    graph.capabilities.record_module(&dotted_name, alias);
                    Ok(())
                }
            };
        }

        let Some(alias) = alias else {
            return Err(RenderError::MissingAlias {
                location: graph.modules.get(module).tree.location(stmt),
                module: dotted_name,
            });
        };

        let Some(path) = self.resolver.resolve(&dotted_name) else {
            return Err(RenderError::UnresolvableModule {
                location: graph.modules.get(module).tree.location(stmt),
                module: dotted_name,
            });
        };
        if self.config.is_third_party_path(&path) {
            return Err(self.disallowed(graph, module, stmt, ImportViolation::ThirdParty { path }));
        }

        let key = ModuleKey::from_path(&path)?;
        let target = match graph.modules.lookup(&key) {
            Some(existing) => existing,
            None => {
                let tree = self.load(&path)?;
                let target = graph.modules.insert(dotted_name.clone(), key, tree, false);
                self.visit(graph, target, rewrites)?;
                target
            }
        };
        graph.imports.add(
            module,
            ImportEdge {
                name: dotted_name,
                alias,
                target,
            },
        );
        Ok(())
    }

    fn handle_from_import(
        &self,
        graph: &mut ModuleGraph,
        module: ModuleId,
        stmt: NodeId,
        from: &str,
        names: FromNames,
    ) -> Result<()> {
        if self.config.is_extension_module(from) {
            debug!(module = from, "dropping extension import");
            return Ok(());
        }
        let names = match names {
            FromNames::Wildcard => {
                return Err(self.disallowed(
                    graph,
                    module,
                    stmt,
                    ImportViolation::Wildcard {
                        module: from.to_string(),
                    },
                ))
            }
            FromNames::Names(names) => names,
        };
        let Some(rule) = self.config.whitelist().get(from) else {
            return Err(self.disallowed(
                graph,
                module,
                stmt,
                ImportViolation::NotWhitelisted {
                    module: from.to_string(),
                },
            ));
        };
        if let Some(rejected) = names.iter().find(|n| !rule.allows_from_import(&n.name)) {
            return Err(self.disallowed(
                graph,
                module,
                stmt,
                ImportViolation::SymbolNotAllowed {
                    module: from.to_string(),
                    symbol: rejected.name.clone(),
                },
            ));
        }
        graph.capabilities.record_symbols(from, names);
        Ok(())
    }

    fn record_definitions(&self, graph: &mut ModuleGraph, module: ModuleId, stmt: NodeId) -> Result<()> {
        let source = graph.modules.get(module);
        let sites = read_definitions(&source.tree, stmt)?;
        for site in sites {
            let added = graph
                .definitions
                .add(module, site.name.clone(), stmt, site.binding, site.kind);
            if added.is_none() {
                let source = graph.modules.get(module);
                warn!(
                    module = %source.name,
                    name = %site.name,
                    line = source.tree.node(site.binding).span.start_line,
                    "duplicate definition, keeping the first one"
                );
            }
        }
        Ok(())
    }
}
