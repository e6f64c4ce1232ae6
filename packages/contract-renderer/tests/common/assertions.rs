//! Assertions over rendered source
//!
//! These parse the output with tree-sitter directly instead of going through the crate, so a
//! printer bug cannot hide itself.

use std::collections::HashSet;
use tree_sitter::{Node, Parser, Tree};

pub fn parse(source: &str) -> Tree {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::language())
        .expect("python grammar");
    parser.parse(source, None).expect("parse rendered source")
}

/// Assert the rendered source parses without ERROR or MISSING nodes
pub fn assert_parses(source: &str) {
    let tree = parse(source);
    assert!(
        !tree.root_node().has_error(),
        "rendered source does not parse:\n{source}"
    );
}

/// Names bound by top-level `def`, `class` and plain assignments, in order
pub fn top_level_names(source: &str) -> Vec<String> {
    let tree = parse(source);
    let root = tree.root_node();
    let mut cursor = root.walk();
    let mut names = Vec::new();
    for statement in root.named_children(&mut cursor) {
        let definition = if statement.kind() == "decorated_definition" {
            statement.child_by_field_name("definition")
        } else {
            Some(statement)
        };
        let Some(definition) = definition else {
            continue;
        };
        match definition.kind() {
            "function_definition" | "class_definition" => {
                if let Some(name) = definition.child_by_field_name("name") {
                    names.push(text(&name, source).to_string());
                }
            }
            "expression_statement" => {
                if let Some(assignment) = definition.named_child(0) {
                    if assignment.kind() == "assignment" {
                        if let Some(left) = assignment.child_by_field_name("left") {
                            if left.kind() == "identifier" {
                                names.push(text(&left, source).to_string());
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }
    names
}

pub fn assert_unique_top_level_names(source: &str) {
    let names = top_level_names(source);
    let mut seen = HashSet::new();
    for name in &names {
        assert!(seen.insert(name), "`{name}` is defined twice in:\n{source}");
    }
}

/// Assert `first` occurs in `source` before `second`
pub fn assert_before(source: &str, first: &str, second: &str) {
    let a = source
        .find(first)
        .unwrap_or_else(|| panic!("`{first}` not found in:\n{source}"));
    let b = source
        .find(second)
        .unwrap_or_else(|| panic!("`{second}` not found in:\n{source}"));
    assert!(a < b, "expected `{first}` before `{second}` in:\n{source}");
}

pub fn assert_absent(source: &str, needle: &str) {
    assert!(
        !source.contains(needle),
        "`{needle}` should not appear in:\n{source}"
    );
}

fn text<'a>(node: &Node, source: &'a str) -> &'a str {
    &source[node.byte_range()]
}
