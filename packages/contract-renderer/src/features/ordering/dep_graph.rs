//! Module dependency graph with petgraph
//!
//! Node `i` is `ModuleId(i)`. An edge A → B means A imports B.

use crate::errors::{RenderError, Result};
use crate::features::module_graph::{ImportGraph, ModuleTable};
use crate::shared::models::ModuleId;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

pub struct ModuleDependencyGraph {
    /// Node weights are module names, the tie-break key for ordering
    graph: DiGraph<String, ()>,
    root: NodeIndex,
}

impl ModuleDependencyGraph {
    pub fn build(modules: &ModuleTable, imports: &ImportGraph, root: ModuleId) -> Self {
        let names = modules.iter().map(|m| m.name.clone());
        let edges = modules.ids().flat_map(|from| {
            imports
                .dependencies(from)
                .into_iter()
                .map(move |to| (from, to))
        });
        Self::from_parts(names, edges, root)
    }

    /// Graph over `names` (indexed by position) and `(importer, imported)` pairs
    pub fn from_parts(
        names: impl IntoIterator<Item = String>,
        edges: impl IntoIterator<Item = (ModuleId, ModuleId)>,
        root: ModuleId,
    ) -> Self {
        let mut graph = DiGraph::new();
        for name in names {
            graph.add_node(name);
        }
        for (from, to) in edges {
            let (from, to) = (NodeIndex::new(from.index()), NodeIndex::new(to.index()));
            if graph.find_edge(from, to).is_none() {
                graph.add_edge(from, to, ());
            }
        }
        Self {
            graph,
            root: NodeIndex::new(root.index()),
        }
    }

    pub fn module_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Fail with `ImportCycle` if any module reaches itself
    pub fn check_acyclic(&self) -> Result<()> {
        let mut cycles: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1 || scc.iter().any(|n| self.graph.find_edge(*n, *n).is_some())
            })
            .collect();
        if cycles.is_empty() {
            return Ok(());
        }
        // Report the cycle through the earliest discovered module
        cycles.sort_by_key(|scc| scc.iter().min().copied());
        let modules = self
            .cycle_path(&cycles[0])
            .into_iter()
            .map(|n| self.graph[n].clone())
            .collect();
        Err(RenderError::ImportCycle { modules })
    }

    /// Simple cycle inside `scc` starting and ending at its smallest node
    fn cycle_path(&self, scc: &[NodeIndex]) -> Vec<NodeIndex> {
        let members: HashSet<NodeIndex> = scc.iter().copied().collect();
        let Some(start) = scc.iter().min().copied() else {
            return Vec::new();
        };
        if self.graph.find_edge(start, start).is_some() {
            return vec![start, start];
        }

        let mut parents: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            let mut successors: Vec<NodeIndex> = self.graph.neighbors(node).collect();
            successors.sort();
            for next in successors {
                if next == start {
                    let mut path = vec![node];
                    let mut current = node;
                    while let Some(parent) = parents.get(&current) {
                        path.push(*parent);
                        current = *parent;
                    }
                    path.reverse();
                    path.push(start);
                    return path;
                }
                if members.contains(&next) && !parents.contains_key(&next) {
                    parents.insert(next, node);
                    queue.push_back(next);
                }
            }
        }
        scc.to_vec()
    }

    /// Non-root modules, dependencies first
    ///
    /// Depth-first post-order from the root; siblings are visited by module name so the
    /// result does not depend on the order imports were written in.
    pub fn order(&self) -> Result<Vec<ModuleId>> {
        self.check_acyclic()?;
        let mut visited = HashSet::new();
        let mut order = Vec::with_capacity(self.graph.node_count());
        self.visit(self.root, &mut visited, &mut order);
        order.retain(|n| *n != self.root);
        debug!(modules = order.len(), "module order computed");
        Ok(order.into_iter().map(|n| ModuleId(n.index() as u32)).collect())
    }

    fn visit(&self, node: NodeIndex, visited: &mut HashSet<NodeIndex>, order: &mut Vec<NodeIndex>) {
        if !visited.insert(node) {
            return;
        }
        let mut dependencies: Vec<NodeIndex> = self.graph.neighbors(node).collect();
        dependencies.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]).then(a.cmp(b)));
        for dependency in dependencies {
            self.visit(dependency, visited, order);
        }
        order.push(node);
    }
}
