//! Temp-dir projects for unit tests

use crate::config::RenderConfig;
use crate::errors::Result;
use crate::features::module_graph::{FileSystemModuleResolver, ImportDiscovery, ModuleGraph};
use crate::features::parsing::{RewriteTable, TreeSitterParser};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub(crate) struct Project {
    dir: TempDir,
}

impl Project {
    pub(crate) fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub(crate) fn file(self, relative: &str, content: &str) -> Self {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    pub(crate) fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub(crate) fn template(&self) -> PathBuf {
        self.path("template.py")
    }

    /// Discovery with the project directory as the only search root
    pub(crate) fn discover(&self, config: &RenderConfig) -> Result<(ModuleGraph, RewriteTable)> {
        let parser = TreeSitterParser::python();
        let resolver = FileSystemModuleResolver::new([self.dir.path().to_path_buf()]);
        let mut rewrites = RewriteTable::new();
        let graph = ImportDiscovery::new(config, &parser, &resolver)
            .discover(&self.template(), &mut rewrites)?;
        Ok((graph, rewrites))
    }
}
