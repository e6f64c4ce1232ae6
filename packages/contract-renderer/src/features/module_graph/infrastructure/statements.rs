//! Readers that turn import and definition statements into owned records

use crate::errors::{RenderError, Result};
use crate::features::module_graph::domain::{DefinitionKind, ImportedName};
use crate::features::parsing::{Statement, SyntaxKind, SyntaxTree};
use crate::shared::models::NodeId;

/// One `name [as alias]` clause of a plain `import`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainImport {
    pub dotted_name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FromNames {
    Wildcard,
    Names(Vec<ImportedName>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatement {
    Plain(Vec<PlainImport>),
    From { module: String, names: FromNames },
}

/// Dotted names may contain line continuations; keep only the name characters
fn dotted_text(tree: &SyntaxTree, id: NodeId) -> String {
    tree.text(id).split_whitespace().collect()
}

fn imported_name(tree: &SyntaxTree, id: NodeId) -> Option<(String, Option<String>)> {
    match tree.kind(id) {
        SyntaxKind::AliasedImport => {
            let name = tree.child(id, "name")?;
            let alias = tree.child(id, "alias")?;
            Some((dotted_text(tree, name), Some(tree.text(alias).to_string())))
        }
        _ => Some((dotted_text(tree, id), None)),
    }
}

/// Read a top-level import statement; `None` for anything else
pub fn read_import(tree: &SyntaxTree, stmt: NodeId) -> Option<ImportStatement> {
    match tree.kind(stmt) {
        SyntaxKind::Import => {
            let entries = tree
                .children_by_field(stmt, "name")
                .filter_map(|id| imported_name(tree, id))
                .map(|(dotted_name, alias)| PlainImport { dotted_name, alias })
                .collect();
            Some(ImportStatement::Plain(entries))
        }
        SyntaxKind::ImportFrom | SyntaxKind::FutureImport => {
            let module = match tree.child(stmt, "module_name") {
                Some(id) => dotted_text(tree, id),
                None => "__future__".to_string(),
            };
            let wildcard = tree
                .children(stmt)
                .iter()
                .any(|c| tree.kind(*c) == SyntaxKind::WildcardImport);
            let names = if wildcard {
                FromNames::Wildcard
            } else {
                FromNames::Names(
                    tree.children_by_field(stmt, "name")
                        .filter_map(|id| imported_name(tree, id))
                        .map(|(name, alias)| ImportedName::new(name, alias))
                        .collect(),
                )
            };
            Some(ImportStatement::From { module, names })
        }
        _ => None,
    }
}

/// A name introduced by a top-level statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionSite {
    pub name: String,
    pub binding: NodeId,
    pub kind: DefinitionKind,
}

/// Names a feature-module statement defines
///
/// Statements that define nothing (docstrings, bare calls, `if` blocks) yield an empty list.
/// Assignment targets other than plain names cannot be namespaced and are rejected.
pub fn read_definitions(tree: &SyntaxTree, stmt: NodeId) -> Result<Vec<DefinitionSite>> {
    let unsupported = |target: NodeId, shape: &str| RenderError::UnsupportedTargetShape {
        location: tree.location(target),
        shape: shape.to_string(),
    };
    let site = |binding: NodeId, kind: DefinitionKind| DefinitionSite {
        name: tree.text(binding).to_string(),
        binding,
        kind,
    };

    match tree.statement(stmt) {
        Statement::Function { name, .. } => Ok(vec![site(name, DefinitionKind::Function)]),
        Statement::Class { name, .. } => Ok(vec![site(name, DefinitionKind::Class)]),
        Statement::Assign { targets, .. } => targets
            .into_iter()
            .map(|target| match tree.kind(target) {
                SyntaxKind::Identifier => Ok(site(target, DefinitionKind::Assignment)),
                kind => Err(unsupported(target, kind.describe())),
            })
            .collect(),
        Statement::AnnAssign { target, .. } => match tree.kind(target) {
            SyntaxKind::Identifier => Ok(vec![site(target, DefinitionKind::AnnotatedAssignment)]),
            kind => Err(unsupported(target, kind.describe())),
        },
        Statement::AugAssign { target } => Err(unsupported(target, "AugAssign")),
        Statement::Import | Statement::ImportFrom | Statement::Expr { .. } | Statement::Other => {
            Ok(Vec::new())
        }
    }
}
