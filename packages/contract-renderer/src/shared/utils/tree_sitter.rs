//! Tree-sitter Utility Functions
//!
//! Helpers shared by the parser adapter and the text post-processors, which both need to
//! look at raw tree-sitter output.

use crate::shared::models::Span;
use tree_sitter::{LanguageError, Node, Parser, Tree};

// ═══════════════════════════════════════════════════════════════════════════
// Parser construction
// ═══════════════════════════════════════════════════════════════════════════

/// Create a parser configured for the Python grammar
pub fn python_parser() -> Result<Parser, LanguageError> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_python::language())?;
    Ok(parser)
}

/// Parse `source` with a fresh Python parser
///
/// Returns `None` only when the parser could not be configured or parsing was cancelled.
pub fn parse_python(source: &str) -> Option<Tree> {
    python_parser().ok()?.parse(source, None)
}

// ═══════════════════════════════════════════════════════════════════════════
// Node Utilities
// ═══════════════════════════════════════════════════════════════════════════

/// Get node text from source
#[inline]
pub fn extract_node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or("")
}

/// Convert tree-sitter node to Span
#[inline]
pub fn node_to_span(node: &Node) -> Span {
    let start_pos = node.start_position();
    let end_pos = node.end_position();

    Span::new(
        start_pos.row as u32 + 1, // 1-indexed
        start_pos.column as u32,
        end_pos.row as u32 + 1, // 1-indexed
        end_pos.column as u32,
    )
}

/// First ERROR or MISSING node in document order, if any
pub fn find_first_error<'a>(node: &Node<'a>) -> Option<Node<'a>> {
    if !node.has_error() {
        return None;
    }
    let mut stack = vec![*node];
    while let Some(current) = stack.pop() {
        if current.is_error() || current.is_missing() {
            return Some(current);
        }
        for i in (0..current.child_count()).rev() {
            if let Some(child) = current.child(i) {
                if child.has_error() || child.is_missing() {
                    stack.push(child);
                }
            }
        }
    }
    // has_error() was set but no explicit node found; report the root
    Some(*node)
}

/// Direct children of `node`, including extras such as comments
pub fn children<'a>(node: &Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}
