//! Directive argument folding
//!
//! Contract directives such as `@requires(...)` only accept literal keyword arguments. Names
//! bound to literals at top level are substituted in place, list spreads are expanded, and
//! whatever is left must be a literal.

use super::constants::{plain_name, ConstantTable, ListElement};
use crate::config::RenderConfig;
use crate::errors::{RenderError, Result};
use crate::features::assembly::{OutputItem, OutputProgram, ProgramView};
use crate::features::module_graph::ModuleTable;
use crate::features::parsing::{RewriteTable, SyntaxKind, SyntaxTree};
use crate::shared::models::{ModuleId, NodeId, NodeKey};
use std::collections::HashSet;
use tracing::debug;

/// Keyword argument of a directive decorator
struct DirectiveArgument {
    directive: String,
    decorator: NodeId,
    keyword: String,
    value: NodeId,
}

pub struct ConstantFolder<'a> {
    config: &'a RenderConfig,
}

impl<'a> ConstantFolder<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config }
    }

    /// Fold directive arguments of every statement in `program`. Returns the number of
    /// folded nodes.
    pub fn fold(
        &self,
        program: &OutputProgram,
        modules: &ModuleTable,
        rewrites: &mut RewriteTable,
    ) -> Result<usize> {
        let replacements = {
            let view = ProgramView::new(modules, rewrites, self.config.header_marker());
            self.plan(program, &view)?
        };
        let folded = replacements.len();
        for (key, text) in replacements {
            rewrites.insert(key, text);
        }
        Ok(folded)
    }

    fn plan(
        &self,
        program: &OutputProgram,
        view: &ProgramView<'_>,
    ) -> Result<Vec<(NodeKey, String)>> {
        let constants =
            ConstantTable::collect(program, view, |name| self.config.is_protected_name(name));
        debug!(constants = constants.len(), "collected foldable constants");

        let mut arguments = Vec::new();
        for item in program.items() {
            if let OutputItem::Source(key) = item {
                let tree = &view.modules.get(key.module).tree;
                for argument in self.directive_arguments(tree, view, key.module, key.node) {
                    arguments.push((key.module, argument));
                }
            }
        }

        let mut pass = FoldPass {
            view,
            constants: &constants,
            replacements: Vec::new(),
            literal_nodes: HashSet::new(),
        };
        for (module, argument) in &arguments {
            pass.fold_value(*module, argument.value);
        }

        for (module, argument) in &arguments {
            let tree = &view.modules.get(*module).tree;
            if !is_literal(tree, *module, argument.value, &pass.literal_nodes) {
                return Err(RenderError::NonLiteralDirectiveArgument {
                    location: tree.location(argument.value),
                    directive: argument.directive.clone(),
                    function: decorated_name(tree, view, *module, argument.decorator),
                    keyword: argument.keyword.clone(),
                });
            }
        }
        debug!(
            arguments = arguments.len(),
            folded = pass.replacements.len(),
            "folded directive arguments"
        );
        Ok(pass.replacements)
    }

    /// Keyword arguments of directive decorators anywhere under `statement`
    fn directive_arguments(
        &self,
        tree: &SyntaxTree,
        view: &ProgramView<'_>,
        module: ModuleId,
        statement: NodeId,
    ) -> Vec<DirectiveArgument> {
        let mut found = Vec::new();
        for decorator in tree.descendants(statement) {
            if tree.kind(decorator) != SyntaxKind::Decorator {
                continue;
            }
            let Some(&call) = tree.children(decorator).first() else {
                continue;
            };
            if tree.kind(call) != SyntaxKind::Call {
                continue;
            }
            let Some(directive) = tree
                .child(call, "function")
                .and_then(|function| plain_name(view, module, function))
                .filter(|name| self.config.is_directive(name))
            else {
                continue;
            };
            let Some(arguments) = tree.child(call, "arguments") else {
                continue;
            };
            for &argument in tree.children(arguments) {
                if tree.kind(argument) != SyntaxKind::KeywordArgument {
                    continue;
                }
                let (Some(name), Some(value)) =
                    (tree.child(argument, "name"), tree.child(argument, "value"))
                else {
                    continue;
                };
                found.push(DirectiveArgument {
                    directive: directive.clone(),
                    decorator,
                    keyword: tree.text(name).to_string(),
                    value,
                });
            }
        }
        found
    }
}

struct FoldPass<'v, 'c> {
    view: &'v ProgramView<'v>,
    constants: &'c ConstantTable,
    replacements: Vec<(NodeKey, String)>,
    /// Nodes whose replacement text is a literal
    literal_nodes: HashSet<NodeKey>,
}

impl<'v> FoldPass<'v, '_> {
    fn tree(&self, module: ModuleId) -> &'v SyntaxTree {
        &self.view.modules.get(module).tree
    }

    fn fold_value(&mut self, module: ModuleId, value: NodeId) {
        let value = self.tree(module).unwrap_parens(value);
        match self.tree(module).kind(value) {
            SyntaxKind::Identifier | SyntaxKind::Attribute => {
                self.fold_name(module, value);
            }
            SyntaxKind::List => self.fold_list(module, value),
            SyntaxKind::Dictionary => {
                let pairs: Vec<NodeId> = self.tree(module).children(value).to_vec();
                for pair in pairs {
                    let tree = self.tree(module);
                    if tree.kind(pair) != SyntaxKind::Pair {
                        continue;
                    }
                    let (key, item) = (tree.child(pair, "key"), tree.child(pair, "value"));
                    if let Some(key) = key {
                        let key = tree.unwrap_parens(key);
                        let kind = tree.kind(key);
                        if matches!(kind, SyntaxKind::Identifier | SyntaxKind::Attribute) {
                            self.fold_name(module, key);
                        }
                    }
                    if let Some(item) = item {
                        let item = self.tree(module).unwrap_parens(item);
                        if self.tree(module).kind(item) == SyntaxKind::List {
                            self.fold_list(module, item);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn fold_name(&mut self, module: ModuleId, node: NodeId) {
        let Some(name) = plain_name(self.view, module, node) else {
            return;
        };
        if let Some(literal) = self.constants.literal(&name) {
            let key = NodeKey::new(module, node);
            self.replacements.push((key, literal.to_string()));
            self.literal_nodes.insert(key);
        }
    }

    /// Rewrite a list whose elements include foldable names or spreads
    fn fold_list(&mut self, module: ModuleId, list: NodeId) {
        let elements: Vec<NodeId> = self.tree(module).children(list).to_vec();
        let mut texts = Vec::with_capacity(elements.len());
        let mut all_literal = true;
        let mut changed = false;

        for element in elements {
            let tree = self.tree(module);
            let element = tree.unwrap_parens(element);
            if tree.kind(element) == SyntaxKind::ListSplat {
                let spread = tree
                    .children(element)
                    .first()
                    .and_then(|inner| plain_name(self.view, module, *inner))
                    .and_then(|name| self.constants.list(&name));
                if let Some(spread) = spread {
                    for item in spread {
                        let (text, literal) = self.resolve_element(item);
                        all_literal &= literal;
                        texts.push(text);
                    }
                    changed = true;
                    continue;
                }
            }
            let resolved = plain_name(self.view, module, element)
                .and_then(|name| self.constants.literal(&name).map(str::to_string));
            match resolved {
                Some(literal) => {
                    texts.push(literal);
                    changed = true;
                }
                None => {
                    let empty = HashSet::new();
                    all_literal &= is_literal(tree, module, element, &empty);
                    texts.push(self.view.print_node(module, element));
                }
            }
        }

        if changed {
            let key = NodeKey::new(module, list);
            self.replacements.push((key, format!("[{}]", texts.join(", "))));
            if all_literal {
                self.literal_nodes.insert(key);
            }
        }
    }

    fn resolve_element(&self, element: &ListElement) -> (String, bool) {
        match element {
            ListElement::Name(name) => match self.constants.literal(name) {
                Some(literal) => (literal.to_string(), true),
                None => (name.clone(), false),
            },
            ListElement::Text(text) => (text.clone(), looks_literal(text)),
        }
    }
}

/// Literal check on the source tree, trusting nodes already folded to literals
fn is_literal(
    tree: &SyntaxTree,
    module: ModuleId,
    node: NodeId,
    folded: &HashSet<NodeKey>,
) -> bool {
    if folded.contains(&NodeKey::new(module, node)) {
        return true;
    }
    let node = tree.unwrap_parens(node);
    if folded.contains(&NodeKey::new(module, node)) {
        return true;
    }
    match tree.kind(node) {
        SyntaxKind::UnaryOperator => {
            tree.text(node).trim_start().starts_with('-')
                && tree
                    .child(node, "argument")
                    .is_some_and(|arg| matches!(tree.kind(arg), SyntaxKind::Integer | SyntaxKind::Float))
        }
        SyntaxKind::List | SyntaxKind::Tuple | SyntaxKind::Set => tree
            .children(node)
            .iter()
            .all(|element| is_literal(tree, module, *element, folded)),
        SyntaxKind::Dictionary => tree.children(node).iter().all(|pair| {
            tree.kind(*pair) == SyntaxKind::Pair
                && tree
                    .child(*pair, "key")
                    .is_some_and(|key| is_literal(tree, module, key, folded))
                && tree
                    .child(*pair, "value")
                    .is_some_and(|value| is_literal(tree, module, value, folded))
        }),
        _ => tree.is_scalar_literal(node),
    }
}

/// Spread elements come from other statements as printed text
fn looks_literal(text: &str) -> bool {
    let text = text.trim();
    let body = text.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let prefix = &text[..text.len() - body.len()];
    let quoted = (body.starts_with('"') || body.starts_with('\''))
        && !prefix.to_ascii_lowercase().contains('f');
    quoted
        || matches!(text, "True" | "False" | "None")
        || text.trim_start_matches('-').parse::<f64>().is_ok()
}

/// Printed name of the function a decorator is attached to
fn decorated_name(
    tree: &SyntaxTree,
    view: &ProgramView<'_>,
    module: ModuleId,
    decorator: NodeId,
) -> String {
    tree.parent(decorator)
        .and_then(|decorated| tree.child(decorated, "definition"))
        .and_then(|definition| tree.child(definition, "name"))
        .map(|name| view.print_node(module, name))
        .unwrap_or_default()
}
