//! Per-render state threaded through the stages

use crate::config::RenderConfig;
use crate::features::dead_code::Liveness;
use crate::features::module_graph::ModuleGraph;
use crate::features::namespacing::SymbolRefTable;
use crate::features::parsing::RewriteTable;
use crate::features::version::ApiVersion;
use crate::shared::models::ModuleId;

/// Everything one render builds up, owned by that render alone
///
/// ```text
/// LinkContext
/// ├── graph     discovery: modules, import edges, definitions, capabilities
/// ├── rewrites  namespacing, marker substitution, folding
/// ├── refs      namespacing: reference -> definition
/// ├── order     dependency order of feature modules
/// └── liveness  dead code elimination
/// ```
#[derive(Debug)]
pub struct LinkContext<'a> {
    pub config: &'a RenderConfig,
    pub graph: ModuleGraph,
    pub rewrites: RewriteTable,
    pub refs: SymbolRefTable,
    pub api_version: Option<ApiVersion>,
    pub order: Vec<ModuleId>,
    pub liveness: Liveness,
}

impl<'a> LinkContext<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            graph: ModuleGraph::default(),
            rewrites: RewriteTable::new(),
            refs: SymbolRefTable::new(),
            api_version: None,
            order: Vec::new(),
            liveness: Liveness::default(),
        }
    }
}
