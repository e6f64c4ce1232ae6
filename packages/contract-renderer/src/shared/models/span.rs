//! Source spans
//!
//! Lines are 1-based, columns 0-based byte offsets, as tree-sitter reports them after the
//! row shift in `node_to_span`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Span {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Whether the span covers more than one source line
    pub fn is_multiline(&self) -> bool {
        self.end_line > self.start_line
    }
}
