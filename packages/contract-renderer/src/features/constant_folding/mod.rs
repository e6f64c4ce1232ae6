//! Constant Folding Feature
//!
//! Substitutes literal values for constant references inside directive decorators, which
//! only accept literal keyword arguments.

pub mod constants;
pub mod folder;

pub use constants::{ConstantTable, ListElement};
pub use folder::ConstantFolder;
