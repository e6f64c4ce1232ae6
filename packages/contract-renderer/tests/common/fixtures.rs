//! Test project builders
//!
//! A `ContractProject` is a temp directory holding `template.py` plus any feature modules,
//! with the directory itself as the module search root.

use contract_renderer::{RenderConfig, RenderConfigBuilder, RenderOutput, Renderer, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TEMPLATE: &str = "template.py";

pub struct ContractProject {
    dir: TempDir,
}

impl ContractProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Write `content` to `relative`, creating parent directories
    pub fn file(self, relative: &str, content: &str) -> Self {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().expect("file has a parent")).expect("create dirs");
        fs::write(path, content).expect("write fixture");
        self
    }

    pub fn template(self, content: &str) -> Self {
        self.file(TEMPLATE, content)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn template_path(&self) -> PathBuf {
        self.path(TEMPLATE)
    }

    /// Defaults, no auto-generated warning, project dir as search root
    pub fn config(&self) -> RenderConfigBuilder {
        RenderConfig::builder()
            .include_autogen_warning(false)
            .search_path(self.root())
    }

    pub fn render(&self) -> Result<RenderOutput> {
        self.render_with(self.config().build()?)
    }

    pub fn render_with(&self, config: RenderConfig) -> Result<RenderOutput> {
        Renderer::new(config).render(&self.template_path())
    }
}

/// Template preamble every renderable template needs
pub fn api_declaration() -> &'static str {
    "api = \"4.0.0\"\n"
}

/// `import lib.<name> as <name>` lines followed by the api declaration and `body`
pub fn template_importing(features: &[&str], body: &str) -> String {
    let imports: String = features
        .iter()
        .map(|name| format!("import lib.{name} as {name}\n"))
        .collect();
    format!("{imports}{}{body}", api_declaration())
}
