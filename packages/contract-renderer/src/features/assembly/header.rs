//! Provenance headers
//!
//! ```text
//! # Objects below have been imported from:
//! #    fees.py
//! # sha256:9f86d0...[ git:4b825d...]
//! ```

use crate::config::RenderConfig;
use crate::errors::Result;
use crate::features::module_graph::SourceModule;
use crate::features::vcs::RevisionLookup;
use crate::shared::models::ModuleId;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

pub struct HeaderBuilder<'a> {
    config: &'a RenderConfig,
    vcs: Option<&'a dyn RevisionLookup>,
    cache: HashMap<ModuleId, Vec<String>>,
}

impl<'a> HeaderBuilder<'a> {
    pub fn new(config: &'a RenderConfig, vcs: Option<&'a dyn RevisionLookup>) -> Self {
        Self {
            config,
            vcs,
            cache: HashMap::new(),
        }
    }

    /// Header lines for `module`, computed once per module
    pub fn lines(&mut self, module: &SourceModule) -> Result<Vec<String>> {
        if let Some(lines) = self.cache.get(&module.id) {
            return Ok(lines.clone());
        }
        let lines = vec![
            format!("# {}:", self.config.header_prefix()),
            format!("#    {}", self.origin(module.path())),
            self.checksum_line(module)?,
        ];
        self.cache.insert(module.id, lines.clone());
        Ok(lines)
    }

    fn origin(&self, path: &Path) -> String {
        if !self.config.use_full_filepath_in_headers() {
            return path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
        }
        let relative = match self.vcs {
            Some(vcs) => vcs.relative_path(path),
            None => relative_to_cwd(path),
        };
        relative
            .unwrap_or_else(|| path.to_path_buf())
            .to_string_lossy()
            .replace('\\', "/")
    }

    fn checksum_line(&self, module: &SourceModule) -> Result<String> {
        let algorithm = self.config.hashing_algorithm();
        let checksum = algorithm.digest(module.source().as_bytes());
        let mut line = format!("# {}:{}", algorithm.as_str(), checksum);
        if let Some(vcs) = self.vcs {
            let revision = vcs.validated_revision(module.path(), &checksum, algorithm)?;
            line.push_str(" git:");
            line.push_str(&revision);
        }
        Ok(line)
    }
}

fn relative_to_cwd(path: &Path) -> Option<PathBuf> {
    let cwd = env::current_dir().ok()?.canonicalize().ok()?;
    path.strip_prefix(&cwd).ok().map(Path::to_path_buf)
}
