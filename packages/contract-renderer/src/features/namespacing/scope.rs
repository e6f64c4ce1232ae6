//! Name resolution scopes
//!
//! Decides, for an identifier node, whether it is a reference at all (as opposed to an
//! attribute member, keyword name, parameter or import name) and whether it resolves to a
//! module-level name or to a local binding of an enclosing function, lambda, class body or
//! comprehension.

use crate::features::parsing::{SyntaxKind, SyntaxTree};
use crate::shared::models::NodeId;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Per-tree scope analysis with memoised local-binding sets
pub struct ScopeAnalysis<'t> {
    tree: &'t SyntaxTree,
    locals: RefCell<HashMap<NodeId, HashSet<String>>>,
}

impl<'t> ScopeAnalysis<'t> {
    pub fn new(tree: &'t SyntaxTree) -> Self {
        Self {
            tree,
            locals: RefCell::new(HashMap::new()),
        }
    }

    /// Identifier used as a value (load or store), not as a member/keyword/parameter name
    pub fn is_reference(&self, id: NodeId) -> bool {
        let tree = self.tree;
        if tree.kind(id) != SyntaxKind::Identifier || self.is_member_access(id) {
            return false;
        }
        let Some(parent) = tree.parent(id) else {
            return true;
        };
        let field = tree.field(id);
        match tree.kind(parent) {
            SyntaxKind::Attribute => field != Some("attribute"),
            SyntaxKind::KeywordArgument => field != Some("name"),
            SyntaxKind::FunctionDef | SyntaxKind::ClassDef => field != Some("name"),
            SyntaxKind::DottedName
            | SyntaxKind::AliasedImport
            | SyntaxKind::Import
            | SyntaxKind::ImportFrom
            | SyntaxKind::FutureImport => false,
            SyntaxKind::Parameters | SyntaxKind::LambdaParameters => false,
            SyntaxKind::TypedParameter => field == Some("type"),
            SyntaxKind::DefaultParameter | SyntaxKind::TypedDefaultParameter => {
                field != Some("name")
            }
            SyntaxKind::ListSplatPattern | SyntaxKind::DictionarySplatPattern => !tree
                .parent(parent)
                .is_some_and(|gp| self.is_parameter_list(gp)),
            _ => true,
        }
    }

    /// Reference that resolves to the module namespace
    pub fn is_module_reference(&self, id: NodeId) -> bool {
        self.is_reference(id) && !self.is_local(id)
    }

    fn is_parameter_list(&self, id: NodeId) -> bool {
        matches!(
            self.tree.kind(id),
            SyntaxKind::Parameters | SyntaxKind::LambdaParameters | SyntaxKind::TypedParameter
        )
    }

    /// `x.<id>` modelled as a member type rather than an attribute
    fn is_member_access(&self, id: NodeId) -> bool {
        let tree = self.tree;
        let in_attribute = tree
            .parent(id)
            .is_some_and(|p| tree.kind(p) == SyntaxKind::Attribute);
        let start = tree.node(id).range.start;
        let before = tree.source()[..start].trim_end_matches([' ', '\t']);
        !in_attribute && before.ends_with('.')
    }

    /// Whether `id` is bound by an enclosing non-module scope
    pub fn is_local(&self, id: NodeId) -> bool {
        let tree = self.tree;
        let name = tree.text(id);
        let mut child = id;
        let mut crossed_function = false;

        while let Some(parent) = tree.parent(child) {
            let kind = tree.kind(parent);
            if kind.is_scope() {
                let inside = match kind {
                    SyntaxKind::Comprehension => true,
                    _ => tree.field(child) == Some("body"),
                };
                // Class bodies are not visible from methods
                let visible = !(kind == SyntaxKind::ClassDef && crossed_function);
                if inside && visible && self.with_locals(parent, |locals| locals.contains(name)) {
                    return true;
                }
                if inside && matches!(kind, SyntaxKind::FunctionDef | SyntaxKind::Lambda) {
                    crossed_function = true;
                }
            }
            child = parent;
        }
        false
    }

    fn with_locals<T>(&self, scope: NodeId, f: impl FnOnce(&HashSet<String>) -> T) -> T {
        if let Some(locals) = self.locals.borrow().get(&scope) {
            return f(locals);
        }
        let locals = self.collect_locals(scope);
        let result = f(&locals);
        self.locals.borrow_mut().insert(scope, locals);
        result
    }

    fn collect_locals(&self, scope: NodeId) -> HashSet<String> {
        let tree = self.tree;
        let mut bound = HashSet::new();
        let mut globals = HashSet::new();

        match tree.kind(scope) {
            SyntaxKind::FunctionDef | SyntaxKind::Lambda => {
                if let Some(params) = tree.child(scope, "parameters") {
                    self.parameter_names(params, &mut bound);
                }
            }
            SyntaxKind::Comprehension => {
                for clause in tree.children(scope) {
                    if tree.kind(*clause) == SyntaxKind::ForInClause {
                        if let Some(left) = tree.child(*clause, "left") {
                            self.pattern_names(left, &mut bound);
                        }
                    }
                }
            }
            _ => {}
        }

        let body = match tree.kind(scope) {
            SyntaxKind::Comprehension => None,
            _ => tree.child(scope, "body"),
        };
        let mut stack: Vec<NodeId> = body.into_iter().collect();
        while let Some(id) = stack.pop() {
            let kind = tree.kind(id);
            match kind {
                SyntaxKind::FunctionDef | SyntaxKind::ClassDef => {
                    if let Some(name) = tree.child(id, "name") {
                        bound.insert(tree.text(name).to_string());
                    }
                    // decorators and defaults still belong to this scope
                    for child in tree.children(id) {
                        if tree.field(*child) != Some("body") {
                            stack.push(*child);
                        }
                    }
                    continue;
                }
                SyntaxKind::Lambda | SyntaxKind::Comprehension => continue,
                SyntaxKind::Assignment | SyntaxKind::AugmentedAssignment => {
                    if let Some(left) = tree.child(id, "left") {
                        self.pattern_names(left, &mut bound);
                    }
                }
                SyntaxKind::ForStatement => {
                    if let Some(left) = tree.child(id, "left") {
                        self.pattern_names(left, &mut bound);
                    }
                }
                SyntaxKind::AsPatternTarget => self.pattern_names(id, &mut bound),
                SyntaxKind::NamedExpression => {
                    if let Some(name) = tree.child(id, "name") {
                        bound.insert(tree.text(name).to_string());
                    }
                }
                SyntaxKind::ExceptClause => {
                    for child in tree.children(id) {
                        if tree.kind(*child) == SyntaxKind::Identifier
                            && tree.source()[..tree.node(*child).range.start]
                                .trim_end()
                                .ends_with(" as")
                        {
                            bound.insert(tree.text(*child).to_string());
                        }
                    }
                }
                SyntaxKind::Import | SyntaxKind::ImportFrom => {
                    self.import_names(id, &mut bound);
                    continue;
                }
                SyntaxKind::GlobalStatement => {
                    for child in tree.children(id) {
                        globals.insert(tree.text(*child).to_string());
                    }
                    continue;
                }
                SyntaxKind::NonlocalStatement => {
                    for child in tree.children(id) {
                        bound.insert(tree.text(*child).to_string());
                    }
                    continue;
                }
                _ => {}
            }
            stack.extend(tree.children(id).iter().copied());
        }

        bound.retain(|name| !globals.contains(name));
        bound
    }

    fn parameter_names(&self, params: NodeId, out: &mut HashSet<String>) {
        let tree = self.tree;
        for param in tree.children(params) {
            match tree.kind(*param) {
                SyntaxKind::Identifier => {
                    out.insert(tree.text(*param).to_string());
                }
                SyntaxKind::DefaultParameter | SyntaxKind::TypedDefaultParameter => {
                    if let Some(name) = tree.child(*param, "name") {
                        self.pattern_names(name, out);
                    }
                }
                SyntaxKind::TypedParameter => {
                    for child in tree.unnamed_children(*param) {
                        self.pattern_names(child, out);
                    }
                }
                SyntaxKind::ListSplatPattern | SyntaxKind::DictionarySplatPattern => {
                    self.pattern_names(*param, out)
                }
                _ => {}
            }
        }
    }

    /// Identifiers bound by an assignment/for/with target
    fn pattern_names(&self, target: NodeId, out: &mut HashSet<String>) {
        let tree = self.tree;
        match tree.kind(target) {
            SyntaxKind::Identifier => {
                out.insert(tree.text(target).to_string());
            }
            SyntaxKind::PatternList
            | SyntaxKind::TuplePattern
            | SyntaxKind::ListPattern
            | SyntaxKind::ListSplatPattern
            | SyntaxKind::DictionarySplatPattern
            | SyntaxKind::AsPatternTarget
            | SyntaxKind::Tuple
            | SyntaxKind::List
            | SyntaxKind::ExpressionList
            | SyntaxKind::ListSplat
            | SyntaxKind::ParenthesizedExpression => {
                for child in tree.children(target) {
                    self.pattern_names(*child, out);
                }
            }
            // attribute and subscript targets bind nothing
            _ => {}
        }
    }

    fn import_names(&self, stmt: NodeId, out: &mut HashSet<String>) {
        let tree = self.tree;
        for name in tree.children_by_field(stmt, "name") {
            match tree.kind(name) {
                SyntaxKind::AliasedImport => {
                    if let Some(alias) = tree.child(name, "alias") {
                        out.insert(tree.text(alias).to_string());
                    }
                }
                SyntaxKind::DottedName => {
                    if let Some(first) = tree.children(name).first() {
                        out.insert(tree.text(*first).to_string());
                    }
                }
                _ => {}
            }
        }
    }
}
