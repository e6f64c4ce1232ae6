//! Render result types
//!
//! # Output Structure
//!
//! ```text
//! RenderOutput
//! ├── source: String               rendered file contents
//! └── report: RenderReport
//!     ├── api_version
//!     ├── modules: Vec<ModuleReport>   dependency order, template last
//!     ├── capability_imports
//!     ├── markers_substituted
//!     ├── folded_arguments
//!     └── stages: Vec<StageTiming>
//! ```

use crate::errors::{RenderError, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub source: String,
    pub report: RenderReport,
}

impl RenderOutput {
    /// Write the rendered source to `path`. An existing file is only replaced with `force`.
    pub fn render_to_file(&self, path: &Path, force: bool) -> Result<PathBuf> {
        if path.exists() && !force {
            return Err(RenderError::OutputExists {
                path: path.to_path_buf(),
            });
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RenderError::io(parent, e))?;
        }
        fs::write(path, &self.source).map_err(|e| RenderError::io(path, e))?;
        info!(path = %path.display(), bytes = self.source.len(), "wrote rendered contract");
        Ok(path.to_path_buf())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderReport {
    pub template: PathBuf,
    pub api_version: Option<String>,
    pub modules: Vec<ModuleReport>,
    pub capability_imports: Vec<String>,
    /// Whether any marker type annotation was replaced by the placeholder type
    pub markers_substituted: bool,
    pub folded_arguments: usize,
    pub stages: Vec<StageTiming>,
}

impl RenderReport {
    pub fn record_stage(&mut self, name: &'static str, duration: Duration) {
        self.stages.push(StageTiming {
            stage: name,
            micros: duration.as_micros() as u64,
        });
    }

    pub fn module(&self, name: &str) -> Option<&ModuleReport> {
        self.modules.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleReport {
    pub name: String,
    pub path: PathBuf,
    /// Definition statements emitted
    pub kept: usize,
    /// Definition statements removed as unreachable
    pub dropped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageTiming {
    pub stage: &'static str,
    pub micros: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn output() -> RenderOutput {
        RenderOutput {
            source: "x = 1\n".to_string(),
            report: RenderReport::default(),
        }
    }

    #[test]
    fn test_render_to_file_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("contract_rendered.py");

        output().render_to_file(&path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x = 1\n");

        let err = output().render_to_file(&path, false).unwrap_err();
        assert!(matches!(err, RenderError::OutputExists { .. }));
        assert!(output().render_to_file(&path, true).is_ok());
    }

    #[test]
    fn test_report_serializes() {
        let mut report = RenderReport::default();
        report.modules.push(ModuleReport {
            name: "lib.fees".to_string(),
            path: PathBuf::from("lib/fees.py"),
            kept: 2,
            dropped: 1,
        });
        report.record_stage("discovery", Duration::from_micros(42));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["modules"][0]["dropped"], 1);
        assert_eq!(json["stages"][0]["stage"], "discovery");
        assert_eq!(json["stages"][0]["micros"], 42);
    }
}
