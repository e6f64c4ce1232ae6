//! Layout normalisation of the rendered file
//!
//! - no trailing whitespace (outside multi-line strings)
//! - two blank lines around top-level `def`/`class`, unless a comment is attached directly above
//! - at most two consecutive blank lines elsewhere
//! - exactly one trailing newline

use super::parse_rendered;
use crate::errors::Result;
use crate::shared::utils::tree_sitter::children;
use std::collections::HashSet;
use tree_sitter::Node;

const MAX_BLANK_LINES: usize = 2;

/// Top-level item: inclusive row range and shape
#[derive(Debug, Clone, Copy)]
struct Item {
    start: usize,
    end: usize,
    is_block: bool,
    is_comment: bool,
}

pub fn format_source(text: &str) -> Result<String> {
    let tree = parse_rendered(text)?;
    let root = tree.root_node();
    let lines: Vec<&str> = text.lines().collect();
    let verbatim = multiline_string_rows(&root);

    let mut items: Vec<Item> = Vec::new();
    for node in children(&root) {
        let start = node.start_position().row;
        let end = last_row(&node);
        // Several statements on one row print together
        if let Some(last) = items.last_mut() {
            if start <= last.end {
                last.end = last.end.max(end);
                continue;
            }
        }
        items.push(Item {
            start,
            end,
            is_block: matches!(
                node.kind(),
                "function_definition" | "class_definition" | "decorated_definition"
            ),
            is_comment: node.kind() == "comment",
        });
    }

    let mut out = String::with_capacity(text.len());
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            let previous = items[i - 1];
            let existing = item.start.saturating_sub(previous.end + 1);
            for _ in 0..blank_lines_before(&items, i, existing) {
                out.push('\n');
            }
        }
        for row in item.start..=item.end {
            let Some(line) = lines.get(row) else {
                break;
            };
            if verbatim.contains(&row) {
                out.push_str(line);
            } else {
                out.push_str(line.trim_end());
            }
            out.push('\n');
        }
    }

    if out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}

fn blank_lines_before(items: &[Item], i: usize, existing: usize) -> usize {
    let previous = items[i - 1];
    if previous.is_comment && existing == 0 {
        return 0;
    }
    if previous.is_block || leads_block(items, i) {
        return MAX_BLANK_LINES;
    }
    existing.min(MAX_BLANK_LINES)
}

/// A block, or a comment run sitting directly on top of one
fn leads_block(items: &[Item], i: usize) -> bool {
    let mut j = i;
    loop {
        let item = items[j];
        if item.is_block {
            return true;
        }
        if !item.is_comment {
            return false;
        }
        match items.get(j + 1) {
            Some(next) if next.start == item.end + 1 => j += 1,
            _ => return false,
        }
    }
}

fn last_row(node: &Node) -> usize {
    let end = node.end_position();
    if end.column == 0 && end.row > node.start_position().row {
        end.row - 1
    } else {
        end.row
    }
}

/// Rows whose line end falls inside a string literal
fn multiline_string_rows(root: &Node) -> HashSet<usize> {
    let mut rows = HashSet::new();
    let mut stack = vec![*root];
    while let Some(node) = stack.pop() {
        if node.kind() == "string" {
            let (start, end) = (node.start_position().row, node.end_position().row);
            rows.extend(start..end);
            continue;
        }
        for child in children(&node) {
            if child.end_position().row > child.start_position().row {
                stack.push(child);
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blocks_get_two_blank_lines() {
        let text = "import math\nx = 1\ndef f():\n    return x\ny = f()\n";
        assert_eq!(
            format_source(text).unwrap(),
            "import math\nx = 1\n\n\ndef f():\n    return x\n\n\ny = f()\n"
        );
    }

    #[test]
    fn test_attached_comment_moves_with_block() {
        let text = "x = 1\n# explains f\ndef f():\n    return x\n";
        assert_eq!(
            format_source(text).unwrap(),
            "x = 1\n\n\n# explains f\ndef f():\n    return x\n"
        );
    }

    #[test]
    fn test_blank_runs_capped_and_trailing_whitespace_stripped() {
        let text = "a = 1   \n\n\n\n\nb = 2\n\n\n";
        assert_eq!(format_source(text).unwrap(), "a = 1\n\n\nb = 2\n");
    }

    #[test]
    fn test_multiline_string_kept_verbatim() {
        let text = "doc = \"\"\"first   \nsecond  \n\"\"\"   \nz = 1\n";
        assert_eq!(
            format_source(text).unwrap(),
            "doc = \"\"\"first   \nsecond  \n\"\"\"\nz = 1\n"
        );
    }

    #[test]
    fn test_header_comment_block_before_definitions() {
        let text = "# Objects below have been imported from:\n#    fees.py\n\ndef f():\n    return 1\n";
        assert_eq!(
            format_source(text).unwrap(),
            "# Objects below have been imported from:\n#    fees.py\n\n\ndef f():\n    return 1\n"
        );
    }
}
