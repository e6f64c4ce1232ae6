//! Tree assembly
//!
//! Feature modules in dependency order (header, then live statements), then the merged
//! capability imports, then the template's header and body.

use super::header::HeaderBuilder;
use super::output::{OutputItem, OutputProgram, ProgramView};
use super::reorder::hoist_metadata;
use crate::config::RenderConfig;
use crate::errors::Result;
use crate::features::dead_code::Liveness;
use crate::features::module_graph::ModuleGraph;
use crate::features::parsing::RewriteTable;
use crate::features::vcs::RevisionLookup;
use crate::shared::models::{ModuleId, NodeKey};
use tracing::debug;

pub struct Assembler<'a> {
    graph: &'a ModuleGraph,
    liveness: &'a Liveness,
    config: &'a RenderConfig,
    vcs: Option<&'a dyn RevisionLookup>,
}

impl<'a> Assembler<'a> {
    pub fn new(graph: &'a ModuleGraph, liveness: &'a Liveness, config: &'a RenderConfig) -> Self {
        Self {
            graph,
            liveness,
            config,
            vcs: None,
        }
    }

    /// Stamp headers with revisions from `vcs`
    pub fn with_revisions(mut self, vcs: &'a dyn RevisionLookup) -> Self {
        self.vcs = Some(vcs);
        self
    }

    pub fn assemble(&self, order: &[ModuleId], rewrites: &RewriteTable) -> Result<OutputProgram> {
        let view = ProgramView::new(&self.graph.modules, rewrites, self.config.header_marker());
        let mut headers = HeaderBuilder::new(self.config, self.vcs);
        let mut program = OutputProgram::new();

        for &module in order {
            let live: Vec<_> = self
                .graph
                .linked_statements(module)
                .into_iter()
                .filter(|stmt| self.liveness.is_statement_live(module, *stmt))
                .collect();
            if live.is_empty() {
                debug!(module = %self.graph.modules.get(module).name, "no live statements");
                continue;
            }
            self.push_header(&mut program, &view, &mut headers, module)?;
            for stmt in live {
                program.push(&view, OutputItem::Source(NodeKey::new(module, stmt)));
            }
        }

        for import in self.graph.capabilities.iter() {
            program.push(&view, OutputItem::Import(import.clone()));
        }

        let root = self.graph.root_id();
        self.push_header(&mut program, &view, &mut headers, root)?;
        for stmt in self.graph.linked_statements(root) {
            program.push(&view, OutputItem::Source(NodeKey::new(root, stmt)));
        }

        if self.config.render_metadata_at_top_of_file() {
            hoist_metadata(&mut program, &view, self.config.metadata_order(), root);
        }
        debug!(items = program.len(), "assembled output program");
        Ok(program)
    }

    fn push_header(
        &self,
        program: &mut OutputProgram,
        view: &ProgramView<'_>,
        headers: &mut HeaderBuilder<'_>,
        module: ModuleId,
    ) -> Result<()> {
        for line in headers.lines(self.graph.modules.get(module))? {
            program.push(view, OutputItem::Header { module, line });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::dead_code::DeadCodeEliminator;
    use crate::features::namespacing::Namespacer;
    use crate::features::ordering::ModuleDependencyGraph;
    use crate::shared::test_support::Project;
    use pretty_assertions::assert_eq;

    fn assemble(project: &Project, config: &RenderConfig) -> Vec<String> {
        let (mut graph, mut rewrites) = project.discover(config).unwrap();
        let refs = Namespacer::new(&graph.modules, &graph.imports)
            .run(&mut graph.definitions, &graph.capabilities, &mut rewrites)
            .unwrap();
        let liveness = DeadCodeEliminator::new(&graph.modules, &graph.definitions, &refs).analyse();
        let order = ModuleDependencyGraph::build(&graph.modules, &graph.imports, graph.root_id())
            .order()
            .unwrap();
        let program = Assembler::new(&graph, &liveness, config)
            .assemble(&order, &rewrites)
            .unwrap();
        let view = ProgramView::new(&graph.modules, &rewrites, config.header_marker());
        program.items().iter().map(|item| view.render(item)).collect()
    }

    fn no_reorder() -> RenderConfig {
        RenderConfig::builder()
            .render_metadata_at_top_of_file(false)
            .header_marker("@H@")
            .build()
            .unwrap()
    }

    fn without_checksums(items: Vec<String>) -> Vec<String> {
        items
            .into_iter()
            .filter(|item| !item.contains("sha256:") && !item.contains("imported from"))
            .collect()
    }

    #[test]
    fn test_feature_definitions_precede_template_body() {
        let project = Project::new()
            .file(
                "template.py",
                "from typing import Any\nimport lib.f as f\n\nresult = f.helper()\n",
            )
            .file("lib/f.py", "from typing import Optional\n\ndef helper():\n    return 1\n\ndef unused():\n    return 2\n");
        let items = without_checksums(assemble(&project, &no_reorder()));
        assert_eq!(
            items,
            vec![
                "\"@H@#    f.py\"",
                "def f_helper():\n    return 1",
                "from typing import Any, Optional",
                "\"@H@#    template.py\"",
                "result = f_helper()",
            ]
        );
    }

    #[test]
    fn test_diamond_dependency_gets_one_header() {
        let project = Project::new()
            .file(
                "template.py",
                "import lib.a as a\nimport lib.b as b\n\nx = a.A + b.B\n",
            )
            .file("lib/a.py", "import lib.base as base\n\nA = base.ONE\n")
            .file("lib/b.py", "import lib.base as base\n\nB = base.ONE\n")
            .file("lib/base.py", "ONE = 1\n");
        let items = assemble(&project, &no_reorder());
        let base_headers = items.iter().filter(|item| item.contains("#    base.py")).count();
        assert_eq!(base_headers, 1);
        let one = items.iter().position(|i| i == "base_ONE = 1").unwrap();
        let a = items.iter().position(|i| i == "a_A = base_ONE").unwrap();
        assert!(one < a);
    }

    #[test]
    fn test_repeated_template_statements_kept() {
        let project = Project::new().file(
            "template.py",
            "log = []\nlog.append(1)\nlog.append(1)\n",
        );
        let items = without_checksums(assemble(&project, &no_reorder()));
        assert_eq!(
            items,
            vec![
                "\"@H@#    template.py\"",
                "log = []",
                "log.append(1)",
                "log.append(1)",
            ]
        );
    }

    #[test]
    fn test_module_without_live_statements_has_no_header() {
        let project = Project::new()
            .file("template.py", "import lib.f as f\n\nx = 1\n")
            .file("lib/f.py", "def unused():\n    return 2\n");
        let items = assemble(&project, &no_reorder());
        assert!(!items.iter().any(|item| item.contains("f.py")));
    }

    #[test]
    fn test_metadata_hoisted_with_docstring_group() {
        let project = Project::new().file(
            "template.py",
            concat!(
                "from contracts_api import Tside\n",
                "RATE = 1\n",
                "summary = \"short\"\n",
                "explanation = \"long\"\n",
                "\"\"\"continues the explanation\"\"\"\n",
                "api = \"4.0.0\"\n",
                "def pre_posting_hook(vault, hook_arguments):\n    return None\n",
            ),
        );
        let config = RenderConfig::builder().header_marker("@H@").build().unwrap();
        let items = without_checksums(assemble(&project, &config));
        assert_eq!(
            items,
            vec![
                "\"@H@#    template.py\"",
                "from contracts_api import Tside",
                "api = \"4.0.0\"",
                "summary = \"short\"",
                "explanation = \"long\"",
                "\"\"\"continues the explanation\"\"\"",
                "def pre_posting_hook(vault, hook_arguments):\n    return None",
                "\"@H@#    template.py\"",
                "RATE = 1",
            ]
        );
    }

    #[test]
    fn test_trailing_header_stripped_after_hoist() {
        let project = Project::new().file(
            "template.py",
            "from contracts_api import Tside\napi = \"4.0.0\"\nversion = \"1.0.0\"\n",
        );
        let config = RenderConfig::builder().header_marker("@H@").build().unwrap();
        let items = assemble(&project, &config);
        assert!(!items.last().unwrap().starts_with("\"@H@"));
        assert_eq!(items.last().unwrap(), "version = \"1.0.0\"");
        assert!(items[0].contains("imported from"));
    }
}
