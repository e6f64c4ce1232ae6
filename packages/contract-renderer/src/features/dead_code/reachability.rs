//! Reference reachability
//!
//! Vertex 0 stands for the template; vertex `i + 1` is `DefinitionId(i)`. An edge means
//! "references". A definition is live exactly when the template reaches it.

use crate::features::module_graph::{linked_statements, DefinitionTable, ModuleTable};
use crate::features::namespacing::{SymbolRef, SymbolRefTable};
use crate::shared::models::{DefinitionId, ModuleId, NodeId, NodeKey};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

fn template() -> NodeIndex {
    NodeIndex::new(0)
}

fn vertex(id: DefinitionId) -> NodeIndex {
    NodeIndex::new(id.index() + 1)
}

/// Result of elimination
#[derive(Debug, Default, Clone)]
pub struct Liveness {
    live: HashSet<DefinitionId>,
    statements: HashSet<NodeKey>,
    dropped: HashMap<ModuleId, usize>,
}

impl Liveness {
    pub fn is_live(&self, id: DefinitionId) -> bool {
        self.live.contains(&id)
    }

    /// A statement is emitted when any definition it introduces is live
    pub fn is_statement_live(&self, module: ModuleId, statement: NodeId) -> bool {
        self.statements.contains(&NodeKey::new(module, statement))
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Dropped definition statements of `module`
    pub fn dropped_in(&self, module: ModuleId) -> usize {
        self.dropped.get(&module).copied().unwrap_or(0)
    }
}

pub struct DeadCodeEliminator<'a> {
    modules: &'a ModuleTable,
    definitions: &'a DefinitionTable,
    refs: &'a SymbolRefTable,
}

impl<'a> DeadCodeEliminator<'a> {
    pub fn new(
        modules: &'a ModuleTable,
        definitions: &'a DefinitionTable,
        refs: &'a SymbolRefTable,
    ) -> Self {
        Self {
            modules,
            definitions,
            refs,
        }
    }

    pub fn analyse(&self) -> Liveness {
        let graph = self.reference_graph();

        let mut live = HashSet::new();
        let mut dfs = Dfs::new(&graph, template());
        while let Some(node) = dfs.next(&graph) {
            if node != template() {
                live.insert(DefinitionId(node.index() as u32 - 1));
            }
        }

        let mut statements = HashSet::new();
        let mut dropped: HashMap<ModuleId, usize> = HashMap::new();
        for module in self.modules.iter().filter(|m| !m.is_root) {
            for stmt in self.definitions.statements(module.id) {
                let kept = self.definitions_of(module.id, stmt).any(|id| live.contains(&id));
                if kept {
                    statements.insert(NodeKey::new(module.id, stmt));
                } else {
                    *dropped.entry(module.id).or_default() += 1;
                    debug!(
                        module = %module.name,
                        name = module.tree.statement_name(stmt).unwrap_or("?"),
                        "dropping unreferenced definition"
                    );
                }
            }
        }
        debug!(
            live = live.len(),
            total = self.definitions.len(),
            "dead code elimination finished"
        );
        Liveness {
            live,
            statements,
            dropped,
        }
    }

    fn definitions_of(
        &self,
        module: ModuleId,
        stmt: NodeId,
    ) -> impl Iterator<Item = DefinitionId> + '_ {
        self.definitions
            .in_module(module)
            .iter()
            .copied()
            .filter(move |id| self.definitions.get(*id).statement == stmt)
    }

    fn reference_graph(&self) -> DiGraph<(), ()> {
        let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(self.definitions.len() + 1, 0);
        for _ in 0..=self.definitions.len() {
            graph.add_node(());
        }

        for module in self.modules.iter() {
            for stmt in linked_statements(self.modules, self.definitions, module.id) {
                let sources: Vec<NodeIndex> = if module.is_root {
                    vec![template()]
                } else {
                    self.definitions_of(module.id, stmt).map(vertex).collect()
                };
                for symbol in self.refs.in_statement(NodeKey::new(module.id, stmt)) {
                    let Some(target) = symbol.resolve(self.definitions) else {
                        if let SymbolRef::Hint { name, module: owner } = symbol {
                            warn!(
                                module = %module.name,
                                name = %name,
                                owner = %self.modules.get(*owner).name,
                                "reference to a name the imported module does not define"
                            );
                        }
                        continue;
                    };
                    for source in &sources {
                        graph.update_edge(*source, vertex(target), ());
                    }
                }
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::features::module_graph::ModuleGraph;
    use crate::features::namespacing::Namespacer;
    use crate::shared::test_support::Project;

    fn analyse(project: &Project) -> (ModuleGraph, Liveness) {
        let (mut graph, mut rewrites) = project.discover(&RenderConfig::default()).unwrap();
        let refs = Namespacer::new(&graph.modules, &graph.imports)
            .run(&mut graph.definitions, &graph.capabilities, &mut rewrites)
            .unwrap();
        let liveness = DeadCodeEliminator::new(&graph.modules, &graph.definitions, &refs).analyse();
        (graph, liveness)
    }

    fn live_names(graph: &ModuleGraph, liveness: &Liveness) -> Vec<String> {
        let mut names: Vec<String> = graph
            .definitions
            .iter()
            .filter(|d| liveness.is_live(d.id))
            .map(|d| d.local_name.clone())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_transitive_references_kept() {
        let project = Project::new()
            .file("template.py", "import lib.f as f\n\nx = f.helper()\n")
            .file(
                "lib/f.py",
                "RATE = 2\n\ndef inner():\n    return RATE\n\ndef helper():\n    return inner()\n\ndef unused():\n    return inner()\n",
            );
        let (graph, liveness) = analyse(&project);
        assert_eq!(live_names(&graph, &liveness), vec!["RATE", "helper", "inner"]);
        let module = graph.imports.edges(graph.root_id())[0].target;
        assert_eq!(liveness.dropped_in(module), 1);
    }

    #[test]
    fn test_isolated_cluster_dropped() {
        let project = Project::new()
            .file("template.py", "import lib.f as f\n\nx = f.used\n")
            .file(
                "lib/f.py",
                "used = 1\n\ndef ping():\n    return pong()\n\ndef pong():\n    return ping()\n",
            );
        let (graph, liveness) = analyse(&project);
        assert_eq!(live_names(&graph, &liveness), vec!["used"]);
    }

    #[test]
    fn test_cycle_reached_from_root_kept() {
        let project = Project::new()
            .file("template.py", "import lib.f as f\n\nx = f.ping()\n")
            .file(
                "lib/f.py",
                "def ping():\n    return pong()\n\ndef pong():\n    return ping()\n",
            );
        let (graph, liveness) = analyse(&project);
        assert_eq!(live_names(&graph, &liveness), vec!["ping", "pong"]);
    }

    #[test]
    fn test_cross_module_reference_keeps_dependency() {
        let project = Project::new()
            .file("template.py", "import lib.a as a\n\nx = a.run()\n")
            .file("lib/a.py", "import lib.b as b\n\ndef run():\n    return b.step()\n")
            .file("lib/b.py", "def step():\n    return 1\n\ndef other():\n    return 2\n");
        let (graph, liveness) = analyse(&project);
        assert_eq!(live_names(&graph, &liveness), vec!["run", "step"]);
    }

    #[test]
    fn test_chained_assignment_shares_liveness() {
        let project = Project::new()
            .file("template.py", "import lib.a as a\n\nx = a.second\n")
            .file("lib/a.py", "first = second = 3\n");
        let (graph, liveness) = analyse(&project);
        let module = graph.imports.edges(graph.root_id())[0].target;
        let stmt = graph.definitions.statements(module)[0];
        assert!(liveness.is_statement_live(module, stmt));
        assert_eq!(live_names(&graph, &liveness), vec!["second"]);
    }
}
