//! Import edges between feature modules

use crate::shared::models::ModuleId;

/// `import <name> as <alias>` resolved to `target`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportEdge {
    pub name: String,
    pub alias: String,
    pub target: ModuleId,
}

/// Outgoing feature imports per module
#[derive(Debug, Default, Clone)]
pub struct ImportGraph {
    edges: Vec<Vec<ImportEdge>>,
}

impl ImportGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge; repeated (name, alias, target) triples are ignored
    pub fn add(&mut self, from: ModuleId, edge: ImportEdge) -> bool {
        if self.edges.len() <= from.index() {
            self.edges.resize_with(from.index() + 1, Vec::new);
        }
        let edges = &mut self.edges[from.index()];
        if edges.contains(&edge) {
            return false;
        }
        edges.push(edge);
        true
    }

    pub fn edges(&self, from: ModuleId) -> &[ImportEdge] {
        self.edges
            .get(from.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Distinct targets imported by `from`
    pub fn dependencies(&self, from: ModuleId) -> Vec<ModuleId> {
        let mut targets: Vec<ModuleId> = self.edges(from).iter().map(|e| e.target).collect();
        targets.sort();
        targets.dedup();
        targets
    }

    /// Edges of `from` whose alias is `alias`, one per distinct target
    pub fn resolve_alias(&self, from: ModuleId, alias: &str) -> Vec<&ImportEdge> {
        let mut found: Vec<&ImportEdge> = Vec::new();
        for edge in self.edges(from).iter().filter(|e| e.alias == alias) {
            if !found.iter().any(|e| e.target == edge.target) {
                found.push(edge);
            }
        }
        found
    }

    pub fn is_alias(&self, from: ModuleId, alias: &str) -> bool {
        self.edges(from).iter().any(|e| e.alias == alias)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }
}
