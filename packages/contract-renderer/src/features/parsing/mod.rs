//! Parsing Feature
//!
//! Turns module source into an arena-backed syntax tree and prints statements back out.
//!
//! ## Structure
//! - `domain/` - SyntaxKind, SyntaxNode, SyntaxTree, RewriteTable
//! - `ports/` - SourceParser trait
//! - `infrastructure/` - TreeSitterParser
//! - `application/` - SourcePrinter

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::SourcePrinter;
pub use domain::{
    NoRewrites, RewriteTable, Rewrites, Statement, SyntaxKind, SyntaxNode, SyntaxTree,
};
pub use infrastructure::TreeSitterParser;
pub use ports::SourceParser;
