//! Symbol Namespacer Feature
//!
//! Gives every feature-module definition a flat, program-wide unique name and rewrites
//! every reference to it, recording which definition each rewritten node denotes.

pub mod naming;
pub mod namespacer;
pub mod scope;
pub mod symbol_ref;

pub use naming::{combine_module_and_object_name, ModulePrefixes};
pub use namespacer::Namespacer;
pub use scope::ScopeAnalysis;
pub use symbol_ref::{SymbolRef, SymbolRefTable};
