//! Flat name derivation
//!
//! `lib.common.utils` + `helper` becomes `utils_helper`. When two modules share a last
//! segment, or when their flat names would coincide (`lib.fee` defining `s_rate` against
//! `lib.fee_s` defining `rate`), the later one in discovery order takes more segments:
//! `common_utils_helper`.

use crate::features::module_graph::{DefinitionTable, ModuleTable};
use crate::shared::models::ModuleId;
use std::collections::{HashMap, HashSet};

/// Flat name for `object_name` defined in a module whose prefix is `module_name`
///
/// Only the last dotted segment of `module_name` is used.
pub fn combine_module_and_object_name(module_name: &str, object_name: &str) -> String {
    let last = module_name.rsplit('.').next().unwrap_or("");
    format!("{last}_{object_name}")
}

/// Unique dotted-suffix prefix per feature module
#[derive(Debug, Default, Clone)]
pub struct ModulePrefixes {
    prefixes: HashMap<ModuleId, String>,
}

impl ModulePrefixes {
    /// Choose a prefix per feature module, in discovery order.
    ///
    /// A candidate is rejected when another module already holds it, or when any flat name it
    /// would produce for the module's definitions is already produced by an earlier module.
    pub fn assign(modules: &ModuleTable, definitions: &DefinitionTable) -> Self {
        let mut taken: HashSet<String> = HashSet::new();
        let mut flat_taken: HashSet<String> = HashSet::new();
        let mut prefixes = HashMap::new();

        for module in modules.iter().filter(|m| !m.is_root) {
            let locals: Vec<&str> = definitions
                .in_module(module.id)
                .iter()
                .map(|id| definitions.get(*id).local_name.as_str())
                .collect();
            let fits = |candidate: &str| {
                !taken.contains(candidate)
                    && locals.iter().all(|local| {
                        !flat_taken.contains(&combine_module_and_object_name(candidate, local))
                    })
            };

            let segments: Vec<&str> = module.name.split('.').collect();
            let widened = (1..=segments.len())
                .map(|take| segments[segments.len() - take..].join("_"))
                .find(|candidate| fits(candidate));
            // Same dotted name under different search roots, or flat names still clashing
            let prefix = widened.unwrap_or_else(|| {
                let full = segments.join("_");
                (2..)
                    .map(|n| format!("{full}{n}"))
                    .find(|candidate| fits(candidate))
                    .unwrap_or(full)
            });

            for local in &locals {
                flat_taken.insert(combine_module_and_object_name(&prefix, local));
            }
            taken.insert(prefix.clone());
            prefixes.insert(module.id, prefix);
        }
        Self { prefixes }
    }

    pub fn get(&self, module: ModuleId) -> Option<&str> {
        self.prefixes.get(&module).map(String::as_str)
    }

    /// Flat name for `object_name` owned by `module`
    pub fn flat_name(&self, module: ModuleId, object_name: &str) -> String {
        combine_module_and_object_name(self.get(module).unwrap_or(""), object_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_combine_uses_last_segment() {
        assert_eq!(
            combine_module_and_object_name("library.features.common.utils", "helper"),
            "utils_helper"
        );
        assert_eq!(combine_module_and_object_name("F", "helper"), "F_helper");
        assert_eq!(combine_module_and_object_name("", "helper"), "_helper");
    }

    proptest! {
        #[test]
        fn prop_combined_name_is_identifier(
            segments in proptest::collection::vec("[a-z_][a-z0-9_]{0,8}", 1..4),
            object in "[a-zA-Z_][a-zA-Z0-9_]{0,12}",
        ) {
            let name = combine_module_and_object_name(&segments.join("."), &object);
            prop_assert!(name.ends_with(&object));
            prop_assert!(name.starts_with(segments.last().unwrap().as_str()));
            prop_assert!(name.chars().all(|c| c == '_' || c.is_ascii_alphanumeric()));
        }
    }
}
