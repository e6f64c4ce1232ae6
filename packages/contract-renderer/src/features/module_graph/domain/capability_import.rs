//! Whitelisted capability imports collected across all modules
//!
//! Every module's capability imports are pulled out of its body and re-emitted once, merged,
//! ahead of the template body.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedName {
    pub name: String,
    pub alias: Option<String>,
}

impl ImportedName {
    pub fn new(name: impl Into<String>, alias: Option<String>) -> Self {
        Self {
            name: name.into(),
            alias,
        }
    }
}

impl fmt::Display for ImportedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} as {}", self.name, alias),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum CapabilityImport {
    /// `import m` / `import m as a`
    Module { module: String, alias: Option<String> },
    /// `from m import x, y as z`
    Symbols {
        module: String,
        names: Vec<ImportedName>,
    },
}

impl CapabilityImport {
    pub fn module(&self) -> &str {
        match self {
            CapabilityImport::Module { module, .. } | CapabilityImport::Symbols { module, .. } => {
                module
            }
        }
    }
}

impl fmt::Display for CapabilityImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityImport::Module { module, alias } => {
                write!(f, "import {}", ImportedName::new(module.clone(), alias.clone()))
            }
            CapabilityImport::Symbols { module, names } => {
                let names: Vec<String> = names.iter().map(ToString::to_string).collect();
                write!(f, "from {} import {}", module, names.join(", "))
            }
        }
    }
}

/// Capability imports in first-seen order
#[derive(Debug, Default, Clone, Serialize)]
pub struct CapabilitySet {
    imports: Vec<CapabilityImport>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_module(&mut self, module: &str, alias: Option<String>) {
        let exists = self.imports.iter().any(|import| {
            matches!(import, CapabilityImport::Module { module: m, alias: a } if m == module && *a == alias)
        });
        if !exists {
            self.imports.push(CapabilityImport::Module {
                module: module.to_string(),
                alias,
            });
        }
    }

    /// Merge names into the `from module import ...` statement, creating it if needed
    pub fn record_symbols(&mut self, module: &str, names: impl IntoIterator<Item = ImportedName>) {
        let index = match self.symbols_index(module) {
            Some(index) => index,
            None => {
                self.imports.push(CapabilityImport::Symbols {
                    module: module.to_string(),
                    names: Vec::new(),
                });
                self.imports.len() - 1
            }
        };
        if let CapabilityImport::Symbols { names: existing, .. } = &mut self.imports[index] {
            for name in names {
                if !existing.contains(&name) {
                    existing.push(name);
                }
            }
        }
    }

    pub fn ensure_symbol(&mut self, module: &str, name: &str) {
        self.record_symbols(module, [ImportedName::new(name, None)]);
    }

    fn symbols_index(&self, module: &str) -> Option<usize> {
        self.imports.iter().position(
            |import| matches!(import, CapabilityImport::Symbols { module: m, .. } if m == module),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapabilityImport> {
        self.imports.iter()
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_symbols_merge_idempotently() {
        let mut set = CapabilitySet::new();
        set.record_symbols(
            "typing",
            [ImportedName::new("Optional", None), ImportedName::new("Union", None)],
        );
        set.record_symbols(
            "typing",
            [ImportedName::new("Union", None), ImportedName::new("Any", None)],
        );
        set.record_module("math", None);
        set.record_module("math", None);

        let rendered: Vec<String> = set.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["from typing import Optional, Union, Any", "import math"]
        );
    }

    #[test]
    fn test_module_and_symbol_forms_are_separate() {
        let mut set = CapabilitySet::new();
        set.record_module("datetime", None);
        set.record_symbols("datetime", [ImportedName::new("datetime", None)]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_ensure_symbol_creates_statement() {
        let mut set = CapabilitySet::new();
        set.ensure_symbol("typing", "Any");
        set.ensure_symbol("typing", "Any");
        assert_eq!(set.iter().next().unwrap().to_string(), "from typing import Any");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_alias_rendering() {
        let import = CapabilityImport::Symbols {
            module: "decimal".to_string(),
            names: vec![ImportedName::new("Decimal", Some("D".to_string()))],
        };
        assert_eq!(import.to_string(), "from decimal import Decimal as D");
    }
}
