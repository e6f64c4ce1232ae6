//! Marker type substitution
//!
//! Framework marker types only exist at authoring time. In parameter and return annotations
//! they are replaced by the placeholder type (`Any`) wherever they appear, including inside
//! subscripts and unions.

use crate::config::RenderConfig;
use crate::features::parsing::{RewriteTable, SyntaxKind, SyntaxTree};
use crate::shared::models::{ModuleId, NodeId, NodeKey};

/// Annotation subtrees of every function in the module
fn annotations(tree: &SyntaxTree) -> Vec<NodeId> {
    let mut found = Vec::new();
    for id in tree.descendants(tree.root()) {
        match tree.kind(id) {
            SyntaxKind::FunctionDef => found.extend(tree.child(id, "return_type")),
            SyntaxKind::TypedParameter | SyntaxKind::TypedDefaultParameter
                if tree
                    .parent(id)
                    .is_some_and(|p| tree.kind(p) == SyntaxKind::Parameters) =>
            {
                found.extend(tree.child(id, "type"))
            }
            _ => {}
        }
    }
    found
}

/// `x.<id>`: the grammar may model this as an attribute or a member type
fn is_member_access(tree: &SyntaxTree, id: NodeId) -> bool {
    let start = tree.node(id).range.start;
    tree.source()[..start]
        .trim_end_matches([' ', '\t'])
        .ends_with('.')
}

/// Rewrite marker types to the placeholder; returns how many sites changed
pub fn substitute_marker_types(
    tree: &SyntaxTree,
    module: ModuleId,
    config: &RenderConfig,
    rewrites: &mut RewriteTable,
) -> usize {
    let mut replaced = 0;
    for annotation in annotations(tree) {
        for id in tree.descendants(annotation) {
            let is_plain_name =
                tree.kind(id) == SyntaxKind::Identifier && !is_member_access(tree, id);
            if is_plain_name && config.is_marker_type(tree.text(id)) {
                rewrites.insert(NodeKey::new(module, id), config.placeholder_type());
                replaced += 1;
            }
        }
    }
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::{SourceParser, SourcePrinter, TreeSitterParser};
    use std::path::Path;

    #[test]
    fn test_markers_replaced_in_nested_annotations() {
        let source = "def hook(vault: SmartContractVault, others: dict[str, Optional[SuperviseeContractVault]] = None) -> SupervisorContractVault | None:\n    x: SmartContractVault = vault\n    return x\n";
        let tree = TreeSitterParser::python()
            .parse(Path::new("m.py"), source.to_string())
            .unwrap();
        let mut rewrites = RewriteTable::new();
        let count = substitute_marker_types(
            &tree,
            ModuleId(0),
            &RenderConfig::default(),
            &mut rewrites,
        );
        assert_eq!(count, 3);

        let printed = SourcePrinter::new(&tree, rewrites.for_module(ModuleId(0)))
            .print(tree.statements()[0]);
        assert!(printed.starts_with(
            "def hook(vault: Any, others: dict[str, Optional[Any]] = None) -> Any | None:"
        ));
        // local variable annotations are left alone
        assert!(printed.contains("x: SmartContractVault = vault"));
    }

    #[test]
    fn test_attribute_members_are_not_markers() {
        let source = "def hook(vault: types.SmartContractVault) -> None:\n    pass\n";
        let tree = TreeSitterParser::python()
            .parse(Path::new("m.py"), source.to_string())
            .unwrap();
        let mut rewrites = RewriteTable::new();
        let count = substitute_marker_types(
            &tree,
            ModuleId(0),
            &RenderConfig::default(),
            &mut rewrites,
        );
        assert_eq!(count, 0);
        assert!(rewrites.is_empty());
    }
}
