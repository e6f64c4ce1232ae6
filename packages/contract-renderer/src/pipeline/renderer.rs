//! Render orchestration
//!
//! One call to [`Renderer::render`] runs every stage in order against a fresh
//! [`LinkContext`]. Any stage failure aborts the render; there is no partial output.
//!
//! ```text
//! discovery → version → namespacing → ordering → elimination
//!           → assembly → folding → printing → post-processing
//! ```

use super::context::LinkContext;
use super::result::{ModuleReport, RenderOutput, RenderReport};
use crate::config::RenderConfig;
use crate::errors::Result;
use crate::features::assembly::{Assembler, OutputProgram, ProgramView};
use crate::features::constant_folding::ConstantFolder;
use crate::features::dead_code::DeadCodeEliminator;
use crate::features::module_graph::{FileSystemModuleResolver, ImportDiscovery};
use crate::features::namespacing::Namespacer;
use crate::features::ordering::ModuleDependencyGraph;
use crate::features::parsing::TreeSitterParser;
use crate::features::postprocess::PostProcessor;
use crate::features::vcs::RevisionLookup;
use crate::features::version::check_api_version;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `template` and everything it imports into one source text
    pub fn render(&self, template: &Path) -> Result<RenderOutput> {
        let total = Instant::now();
        let mut report = RenderReport {
            template: template.to_path_buf(),
            ..Default::default()
        };
        let mut ctx = LinkContext::new(&self.config);

        timed(&mut report, "discovery", || self.discover(&mut ctx, template))?;
        timed(&mut report, "version", || self.check_version(&mut ctx))?;
        timed(&mut report, "namespacing", || self.namespace(&mut ctx))?;
        timed(&mut report, "ordering", || self.order(&mut ctx))?;
        timed(&mut report, "elimination", || {
            self.eliminate(&mut ctx);
            Ok(())
        })?;

        let vcs = self.revision_lookup(template)?;
        let program = timed(&mut report, "assembly", || {
            let mut assembler = Assembler::new(&ctx.graph, &ctx.liveness, &self.config);
            if let Some(vcs) = vcs.as_deref() {
                assembler = assembler.with_revisions(vcs);
            }
            assembler.assemble(&ctx.order, &ctx.rewrites)
        })?;
        info!(items = program.len(), "assembled program");

        let folded = timed(&mut report, "folding", || {
            ConstantFolder::new(&self.config).fold(&program, &ctx.graph.modules, &mut ctx.rewrites)
        })?;
        report.folded_arguments = folded;
        info!(folded, "folded directive arguments");

        let printed = timed(&mut report, "printing", || Ok(self.print(&ctx, &program)))?;
        let source = timed(&mut report, "post-processing", || {
            PostProcessor::new(&self.config).process(&printed)
        })?;

        self.summarise(&ctx, &mut report);
        info!(
            template = %template.display(),
            modules = report.modules.len(),
            bytes = source.len(),
            elapsed_ms = total.elapsed().as_millis() as u64,
            "render complete"
        );
        Ok(RenderOutput { source, report })
    }

    fn discover(&self, ctx: &mut LinkContext<'_>, template: &Path) -> Result<()> {
        let parser = TreeSitterParser::python();
        let resolver = self.resolver(template);
        ctx.graph = ImportDiscovery::new(&self.config, &parser, &resolver)
            .discover(template, &mut ctx.rewrites)?;
        info!(
            modules = ctx.graph.modules.len(),
            definitions = ctx.graph.definitions.len(),
            capabilities = ctx.graph.capabilities.len(),
            "import discovery"
        );
        Ok(())
    }

    /// Configured search roots, then the template's directory, then the working directory
    fn resolver(&self, template: &Path) -> FileSystemModuleResolver {
        let mut resolver =
            FileSystemModuleResolver::new(self.config.search_paths().iter().cloned());
        resolver.add_root(template_dir(template));
        if let Ok(cwd) = std::env::current_dir() {
            resolver.add_root(cwd);
        }
        resolver
    }

    fn check_version(&self, ctx: &mut LinkContext<'_>) -> Result<()> {
        let root = ctx.graph.modules.get(ctx.graph.root_id());
        let version = check_api_version(&root.tree, self.config.supported_api_major())?;
        info!(api = %version, "api version");
        ctx.api_version = Some(version);
        Ok(())
    }

    fn namespace(&self, ctx: &mut LinkContext<'_>) -> Result<()> {
        let graph = &mut ctx.graph;
        ctx.refs = Namespacer::new(&graph.modules, &graph.imports).run(
            &mut graph.definitions,
            &graph.capabilities,
            &mut ctx.rewrites,
        )?;
        info!(
            references = ctx.refs.len(),
            rewrites = ctx.rewrites.len(),
            "namespacing"
        );
        Ok(())
    }

    fn order(&self, ctx: &mut LinkContext<'_>) -> Result<()> {
        let graph = ModuleDependencyGraph::build(
            &ctx.graph.modules,
            &ctx.graph.imports,
            ctx.graph.root_id(),
        );
        ctx.order = graph.order()?;
        info!(
            modules = graph.module_count(),
            ordered = ctx.order.len(),
            "dependency order"
        );
        Ok(())
    }

    fn eliminate(&self, ctx: &mut LinkContext<'_>) {
        let graph = &ctx.graph;
        ctx.liveness =
            DeadCodeEliminator::new(&graph.modules, &graph.definitions, &ctx.refs).analyse();
        info!(
            live = ctx.liveness.live_count(),
            total = ctx.graph.definitions.len(),
            "dead code elimination"
        );
    }

    #[cfg(feature = "git")]
    fn revision_lookup(&self, template: &Path) -> Result<Option<Box<dyn RevisionLookup>>> {
        use crate::features::vcs::GitRevisionLookup;

        if !self.config.use_git() {
            return Ok(None);
        }
        let start = template_dir(template);
        let lookup = GitRevisionLookup::open(self.config.git_repo_root(), &start)?;
        Ok(Some(Box::new(lookup)))
    }

    #[cfg(not(feature = "git"))]
    fn revision_lookup(&self, _template: &Path) -> Result<Option<Box<dyn RevisionLookup>>> {
        if self.config.use_git() {
            tracing::warn!("built without the `git` feature, headers carry no revision");
        }
        Ok(None)
    }

    fn print(&self, ctx: &LinkContext<'_>, program: &OutputProgram) -> String {
        let marker = self.config.header_marker();
        let view = ProgramView::new(&ctx.graph.modules, &ctx.rewrites, marker);
        program
            .items()
            .iter()
            .map(|item| view.render(item))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn summarise(&self, ctx: &LinkContext<'_>, report: &mut RenderReport) {
        let graph = &ctx.graph;
        for &module in &ctx.order {
            let source = graph.modules.get(module);
            let kept = graph
                .linked_statements(module)
                .into_iter()
                .filter(|stmt| ctx.liveness.is_statement_live(module, *stmt))
                .count();
            report.modules.push(ModuleReport {
                name: source.name.clone(),
                path: source.path().to_path_buf(),
                kept,
                dropped: ctx.liveness.dropped_in(module),
            });
        }
        let root = graph.modules.get(graph.root_id());
        report.modules.push(ModuleReport {
            name: root.name.clone(),
            path: root.path().to_path_buf(),
            kept: graph.linked_statements(root.id).len(),
            dropped: 0,
        });
        report.capability_imports = graph.capabilities.iter().map(ToString::to_string).collect();
        report.markers_substituted = graph.marker_substitutions > 0;
        report.api_version = ctx.api_version.as_ref().map(ToString::to_string);
    }
}

fn template_dir(template: &Path) -> PathBuf {
    match template.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn timed<T>(
    report: &mut RenderReport,
    stage: &'static str,
    run: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let start = Instant::now();
    let value = run()?;
    report.record_stage(stage, start.elapsed());
    Ok(value)
}
