//! Filesystem module resolver
//!
//! `a.b.c` resolves to `<root>/a/b/c.py`, then `<root>/a/b/c/__init__.py`, for each search
//! root in order.

use crate::features::module_graph::ports::ModuleResolver;
use std::path::{Path, PathBuf};
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct FileSystemModuleResolver {
    roots: Vec<PathBuf>,
}

impl FileSystemModuleResolver {
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut resolver = Self::default();
        for root in roots {
            resolver.add_root(root);
        }
        resolver
    }

    /// Append a search root unless already present
    pub fn add_root(&mut self, root: PathBuf) {
        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn candidates(root: &Path, dotted_name: &str) -> [PathBuf; 2] {
        let mut base = root.to_path_buf();
        for segment in dotted_name.split('.') {
            base.push(segment);
        }
        [base.with_extension("py"), base.join("__init__.py")]
    }
}

impl ModuleResolver for FileSystemModuleResolver {
    fn resolve(&self, dotted_name: &str) -> Option<PathBuf> {
        if dotted_name.is_empty() || dotted_name.split('.').any(str::is_empty) {
            return None;
        }
        self.roots
            .iter()
            .flat_map(|root| Self::candidates(root, dotted_name))
            .inspect(|candidate| trace!(candidate = %candidate.display(), "module candidate"))
            .find(|candidate| candidate.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolves_module_file_and_package() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("lib/common")).unwrap();
        fs::write(dir.path().join("lib/common/utils.py"), "x = 1\n").unwrap();
        fs::create_dir_all(dir.path().join("lib/pkg")).unwrap();
        fs::write(dir.path().join("lib/pkg/__init__.py"), "").unwrap();

        let resolver = FileSystemModuleResolver::new([dir.path().to_path_buf()]);
        assert_eq!(
            resolver.resolve("lib.common.utils"),
            Some(dir.path().join("lib/common/utils.py"))
        );
        assert_eq!(
            resolver.resolve("lib.pkg"),
            Some(dir.path().join("lib/pkg/__init__.py"))
        );
        assert_eq!(resolver.resolve("lib.missing"), None);
        assert_eq!(resolver.resolve("lib..utils"), None);
    }

    #[test]
    fn test_earlier_roots_take_precedence() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("shared.py"), "").unwrap();
        fs::write(second.path().join("shared.py"), "").unwrap();

        let resolver = FileSystemModuleResolver::new([
            first.path().to_path_buf(),
            second.path().to_path_buf(),
            first.path().to_path_buf(),
        ]);
        assert_eq!(resolver.roots().len(), 2);
        assert_eq!(resolver.resolve("shared"), Some(first.path().join("shared.py")));
    }
}
