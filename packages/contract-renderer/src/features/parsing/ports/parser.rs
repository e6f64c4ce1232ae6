//! Parser port
//!
//! The linker only needs "source in, syntax tree out"; the grammar crate stays behind this
//! trait.

use crate::errors::Result;
use crate::features::parsing::domain::SyntaxTree;
use std::path::Path;

pub trait SourceParser {
    /// Parse a whole module. Sources with syntax errors are rejected.
    fn parse(&self, path: &Path, source: String) -> Result<SyntaxTree>;
}
