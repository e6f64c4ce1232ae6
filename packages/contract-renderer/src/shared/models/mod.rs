//! Shared models
//!
//! Plain value types with no behaviour beyond construction and display.

pub mod ids;
pub mod span;

pub use ids::{DefinitionId, ModuleId, NodeId, NodeKey};
pub use span::Span;
