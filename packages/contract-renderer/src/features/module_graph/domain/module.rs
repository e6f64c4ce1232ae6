//! Module identity and storage

use crate::errors::{RenderError, Result};
use crate::features::parsing::SyntaxTree;
use crate::shared::models::ModuleId;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Canonical absolute path of a module file
///
/// Two import statements denote the same module exactly when their keys are equal, no
/// matter which dotted name or alias they used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleKey(PathBuf);

impl ModuleKey {
    pub fn from_path(path: &Path) -> Result<Self> {
        let canonical = path
            .canonicalize()
            .map_err(|e| RenderError::io(path, e))?;
        Ok(Self(canonical))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[derive(Debug)]
pub struct SourceModule {
    pub id: ModuleId,
    /// Dotted name used by the first import that reached this module; file stem for the root
    pub name: String,
    pub key: ModuleKey,
    pub tree: SyntaxTree,
    pub is_root: bool,
}

impl SourceModule {
    pub fn path(&self) -> &Path {
        self.key.path()
    }

    pub fn source(&self) -> &str {
        self.tree.source()
    }
}

/// All modules of one render, in discovery order (root first)
#[derive(Debug, Default)]
pub struct ModuleTable {
    modules: Vec<SourceModule>,
    by_key: HashMap<ModuleKey, ModuleId>,
}

impl ModuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        key: ModuleKey,
        tree: SyntaxTree,
        is_root: bool,
    ) -> ModuleId {
        let id = ModuleId(self.modules.len() as u32);
        self.by_key.insert(key.clone(), id);
        self.modules.push(SourceModule {
            id,
            name: name.into(),
            key,
            tree,
            is_root,
        });
        id
    }

    pub fn lookup(&self, key: &ModuleKey) -> Option<ModuleId> {
        self.by_key.get(key).copied()
    }

    #[inline]
    pub fn get(&self, id: ModuleId) -> &SourceModule {
        &self.modules[id.index()]
    }

    pub fn root(&self) -> Option<&SourceModule> {
        self.modules.iter().find(|m| m.is_root)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceModule> {
        self.modules.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.modules.iter().map(|m| m.id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
