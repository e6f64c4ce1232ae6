mod rewrites;
mod statement;
mod syntax_node;
mod syntax_tree;

pub use rewrites::{ModuleRewrites, NoRewrites, RewriteTable, Rewrites};
pub use statement::Statement;
pub use syntax_node::{SyntaxKind, SyntaxNode};
pub use syntax_tree::{Descendants, SyntaxTree};
