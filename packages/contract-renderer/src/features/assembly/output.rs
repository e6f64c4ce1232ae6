//! Output program model
//!
//! The merged file is a flat list of items. Source items point back into their module's tree
//! so later stages (folding, printing) still see rewrites made after assembly.

use crate::features::module_graph::{CapabilityImport, ModuleTable};
use crate::features::parsing::{RewriteTable, SourcePrinter, Statement};
use crate::shared::models::{ModuleId, NodeId, NodeKey};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputItem {
    /// Top-level statement of a module
    Source(NodeKey),
    /// One provenance header line, emitted as a marker-prefixed string statement
    Header { module: ModuleId, line: String },
    /// Merged capability import
    Import(CapabilityImport),
}

impl OutputItem {
    pub fn is_header(&self) -> bool {
        matches!(self, OutputItem::Header { .. })
    }
}

/// Ordered output items with structural deduplication
#[derive(Debug, Default, Clone)]
pub struct OutputProgram {
    items: Vec<OutputItem>,
    seen: HashSet<String>,
}

impl OutputProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` unless an item printing to the same text was already added.
    /// Headers are never deduplicated; a module's header block is emitted once by construction.
    /// Root statements are never deduplicated.
    pub fn push(&mut self, view: &ProgramView<'_>, item: OutputItem) -> bool {
        let dedup = match &item {
            OutputItem::Header { .. } => false,
            OutputItem::Source(key) => !view.modules.get(key.module).is_root,
            OutputItem::Import(_) => true,
        };
        if dedup && !self.seen.insert(view.render(&item)) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn items(&self) -> &[OutputItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn replace_items(&mut self, items: Vec<OutputItem>) {
        self.items = items;
    }
}

/// Read-only view used to print and inspect items
#[derive(Clone, Copy)]
pub struct ProgramView<'a> {
    pub modules: &'a ModuleTable,
    pub rewrites: &'a RewriteTable,
    pub marker: &'a str,
}

impl<'a> ProgramView<'a> {
    pub fn new(modules: &'a ModuleTable, rewrites: &'a RewriteTable, marker: &'a str) -> Self {
        Self {
            modules,
            rewrites,
            marker,
        }
    }

    /// Print a node of `module` with every rewrite applied
    pub fn print_node(&self, module: ModuleId, node: NodeId) -> String {
        let tree = &self.modules.get(module).tree;
        SourcePrinter::new(tree, self.rewrites.for_module(module)).print(node)
    }

    pub fn render(&self, item: &OutputItem) -> String {
        match item {
            OutputItem::Source(key) => self.print_node(key.module, key.node),
            OutputItem::Header { line, .. } => header_literal(self.marker, line),
            OutputItem::Import(import) => import.to_string(),
        }
    }

    /// Name used for metadata ordering, as it reads in the output
    pub fn name(&self, item: &OutputItem) -> Option<String> {
        match item {
            OutputItem::Source(key) => {
                let tree = &self.modules.get(key.module).tree;
                match tree.statement(key.node) {
                    Statement::Function { name, .. } | Statement::Class { name, .. } => {
                        Some(self.print_node(key.module, name))
                    }
                    Statement::Assign { targets, .. } => targets
                        .first()
                        .map(|target| self.print_node(key.module, *target)),
                    Statement::AnnAssign { target, .. } => Some(self.print_node(key.module, target)),
                    Statement::Import | Statement::ImportFrom => {
                        tree.statement_name(key.node).map(str::to_string)
                    }
                    _ => None,
                }
            }
            OutputItem::Import(import) => Some(import.module().to_string()),
            OutputItem::Header { .. } => None,
        }
    }

    /// `name = <scalar literal>`
    pub fn is_literal_assignment(&self, item: &OutputItem) -> bool {
        let OutputItem::Source(key) = item else {
            return false;
        };
        let tree = &self.modules.get(key.module).tree;
        matches!(tree.statement(key.node), Statement::Assign { value, .. } if tree.is_scalar_literal(value))
    }

    /// Bare string literal statement
    pub fn is_string_expression(&self, item: &OutputItem) -> bool {
        let OutputItem::Source(key) = item else {
            return false;
        };
        let tree = &self.modules.get(key.module).tree;
        matches!(tree.statement(key.node), Statement::Expr { value } if tree.string_value(value).is_some())
    }
}

/// Double-quoted literal holding `marker` followed by `line`
pub fn header_literal(marker: &str, line: &str) -> String {
    let mut literal = String::with_capacity(marker.len() + line.len() + 2);
    literal.push('"');
    for c in marker.chars().chain(line.chars()) {
        match c {
            '\\' => literal.push_str("\\\\"),
            '"' => literal.push_str("\\\""),
            _ => literal.push(c),
        }
    }
    literal.push('"');
    literal
}

/// Undo the escaping done by [`header_literal`] on a literal body
pub fn unescape_header(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
