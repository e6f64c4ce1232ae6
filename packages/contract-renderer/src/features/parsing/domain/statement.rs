//! Closed view over top-level statement shapes
//!
//! The linker only cares about a handful of statement forms; everything else is `Other`
//! and flows through untouched.

use super::syntax_node::SyntaxKind;
use super::syntax_tree::SyntaxTree;
use crate::shared::models::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Import,
    ImportFrom,
    /// `def`, possibly decorated; `node` is the undecorated definition
    Function { node: NodeId, name: NodeId },
    /// `class`, possibly decorated
    Class { node: NodeId, name: NodeId },
    /// `a = b = value`, targets left to right
    Assign { targets: Vec<NodeId>, value: NodeId },
    /// `target: annotation [= value]`
    AnnAssign {
        target: NodeId,
        annotation: NodeId,
        value: Option<NodeId>,
    },
    /// `target op= value`
    AugAssign { target: NodeId },
    /// Bare expression such as a docstring or a call
    Expr { value: NodeId },
    Other,
}

impl Statement {
    /// Name-bearing target nodes of an assignment form
    pub fn targets(&self) -> Vec<NodeId> {
        match self {
            Statement::Assign { targets, .. } => targets.clone(),
            Statement::AnnAssign { target, .. } | Statement::AugAssign { target } => {
                vec![*target]
            }
            _ => Vec::new(),
        }
    }
}

impl SyntaxTree {
    /// Classify statement `id`
    pub fn statement(&self, id: NodeId) -> Statement {
        match self.kind(id) {
            SyntaxKind::Import => Statement::Import,
            SyntaxKind::ImportFrom | SyntaxKind::FutureImport => Statement::ImportFrom,
            SyntaxKind::FunctionDef | SyntaxKind::ClassDef | SyntaxKind::DecoratedDef => {
                let node = self.undecorated(id);
                match (self.kind(node), self.child(node, "name")) {
                    (SyntaxKind::FunctionDef, Some(name)) => Statement::Function { node, name },
                    (SyntaxKind::ClassDef, Some(name)) => Statement::Class { node, name },
                    _ => Statement::Other,
                }
            }
            SyntaxKind::ExpressionStatement => match self.children(id) {
                [inner] => self.expression_statement(*inner),
                _ => Statement::Other,
            },
            _ => Statement::Other,
        }
    }

    fn expression_statement(&self, inner: NodeId) -> Statement {
        match self.kind(inner) {
            SyntaxKind::Assignment => {
                let Some(left) = self.child(inner, "left") else {
                    return Statement::Other;
                };
                if let Some(annotation) = self.child(inner, "type") {
                    return Statement::AnnAssign {
                        target: left,
                        annotation,
                        value: self.child(inner, "right"),
                    };
                }
                let mut targets = vec![left];
                let mut right = self.child(inner, "right");
                while let Some(node) = right {
                    if self.kind(node) != SyntaxKind::Assignment {
                        break;
                    }
                    match self.child(node, "left") {
                        Some(left) => targets.push(left),
                        None => return Statement::Other,
                    }
                    right = self.child(node, "right");
                }
                match right {
                    Some(value) => Statement::Assign { targets, value },
                    None => Statement::Other,
                }
            }
            SyntaxKind::AugmentedAssignment => match self.child(inner, "left") {
                Some(target) => Statement::AugAssign { target },
                None => Statement::Other,
            },
            _ => Statement::Expr { value: inner },
        }
    }

    /// Name the statement binds at module level, used for metadata ordering
    pub fn statement_name(&self, id: NodeId) -> Option<&str> {
        match self.statement(id) {
            Statement::Function { name, .. } | Statement::Class { name, .. } => {
                Some(self.text(name))
            }
            Statement::Assign { targets, .. } => targets.first().map(|t| self.text(*t)),
            Statement::AnnAssign { target, .. } => Some(self.text(target)),
            Statement::Import => {
                let first = self.child(id, "name")?;
                let dotted = if self.kind(first) == SyntaxKind::AliasedImport {
                    self.child(first, "name")?
                } else {
                    first
                };
                Some(self.text(dotted))
            }
            Statement::ImportFrom => {
                let module = self.child(id, "module_name")?;
                Some(self.text(module))
            }
            _ => None,
        }
    }

    /// Literal without free names: string (not f-string), number, bool or None
    pub fn is_scalar_literal(&self, id: NodeId) -> bool {
        let id = self.unwrap_parens(id);
        match self.kind(id) {
            SyntaxKind::String => !self.has_interpolation(id),
            SyntaxKind::ConcatenatedString => self
                .children(id)
                .iter()
                .all(|part| self.kind(*part) == SyntaxKind::String && !self.has_interpolation(*part)),
            kind => kind.is_scalar_literal(),
        }
    }

    fn has_interpolation(&self, string: NodeId) -> bool {
        self.children(string)
            .iter()
            .any(|c| self.kind(*c) == SyntaxKind::Interpolation)
    }

    /// Value of a plain string literal, without quotes or prefixes
    pub fn string_value(&self, id: NodeId) -> Option<String> {
        let id = self.unwrap_parens(id);
        match self.kind(id) {
            SyntaxKind::String if !self.has_interpolation(id) => {
                Some(strip_string_quotes(self.text(id)).to_string())
            }
            SyntaxKind::ConcatenatedString if self.is_scalar_literal(id) => Some(
                self.children(id)
                    .iter()
                    .map(|part| strip_string_quotes(self.text(*part)))
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// Drop the prefix and quotes of a single string literal token
fn strip_string_quotes(text: &str) -> &str {
    let body = text.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if body.len() >= 2 * quote.len() && body.starts_with(quote) && body.ends_with(quote) {
            return &body[quote.len()..body.len() - quote.len()];
        }
    }
    body
}
