//! Foldable constants of the assembled program

use crate::features::assembly::{OutputItem, OutputProgram, ProgramView};
use crate::features::parsing::{Statement, SyntaxKind};
use crate::shared::models::{ModuleId, NodeId};
use std::collections::HashMap;

/// Element of a list constant kept for `*spread` expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListElement {
    /// Plain name, resolved against the constants when expanded
    Name(String),
    /// Anything else, printed as is
    Text(String),
}

/// Name to literal text, plus list assignments
#[derive(Debug, Default)]
pub struct ConstantTable {
    literals: HashMap<String, String>,
    lists: HashMap<String, Vec<ListElement>>,
}

impl ConstantTable {
    /// Collect top-level assignments in output order.
    ///
    /// `is_protected` names are skipped. A name assigned another name takes the value that name
    /// holds at that point. Rebinding a name to anything that is not foldable forgets it.
    pub fn collect(
        program: &OutputProgram,
        view: &ProgramView<'_>,
        is_protected: impl Fn(&str) -> bool,
    ) -> Self {
        let mut table = Self::default();

        for item in program.items() {
            let OutputItem::Source(key) = item else {
                continue;
            };
            let tree = &view.modules.get(key.module).tree;
            let statement = tree.statement(key.node);
            let names: Vec<String> = statement
                .targets()
                .into_iter()
                .filter_map(|target| plain_name(view, key.module, target))
                .filter(|name| !is_protected(name))
                .collect();
            if names.is_empty() {
                continue;
            }
            let Statement::Assign { value, .. } = statement else {
                table.forget(&names);
                continue;
            };

            if tree.is_scalar_literal(value) {
                let text = view.print_node(key.module, value);
                table.bind(names, Some(text), None);
            } else if let Some(source) = plain_name(view, key.module, value) {
                let text = table.literals.get(&source).cloned();
                let list = table.lists.get(&source).cloned();
                table.bind(names, text, list);
            } else if tree.kind(value) == SyntaxKind::List {
                let elements: Vec<ListElement> = tree
                    .children(value)
                    .iter()
                    .map(|element| match plain_name(view, key.module, *element) {
                        Some(name) => ListElement::Name(name),
                        None => ListElement::Text(view.print_node(key.module, *element)),
                    })
                    .collect();
                table.bind(names, None, Some(elements));
            } else {
                table.forget(&names);
            }
        }
        table
    }

    fn bind(&mut self, names: Vec<String>, text: Option<String>, list: Option<Vec<ListElement>>) {
        self.forget(&names);
        for name in names {
            if let Some(text) = &text {
                self.literals.insert(name.clone(), text.clone());
            }
            if let Some(list) = &list {
                self.lists.insert(name, list.clone());
            }
        }
    }

    fn forget(&mut self, names: &[String]) {
        for name in names {
            self.literals.remove(name);
            self.lists.remove(name);
        }
    }

    pub fn literal(&self, name: &str) -> Option<&str> {
        self.literals.get(name).map(String::as_str)
    }

    pub fn list(&self, name: &str) -> Option<&[ListElement]> {
        self.lists.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

/// Printed text of a name reference, including references the namespacer flattened
pub(crate) fn plain_name(view: &ProgramView<'_>, module: ModuleId, node: NodeId) -> Option<String> {
    let tree = &view.modules.get(module).tree;
    let node = tree.unwrap_parens(node);
    if !matches!(tree.kind(node), SyntaxKind::Identifier | SyntaxKind::Attribute) {
        return None;
    }
    let text = view.print_node(module, node);
    is_identifier(&text).then_some(text)
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}
