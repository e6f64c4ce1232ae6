//! Dead Code Eliminator Feature
//!
//! Keeps the feature definitions reachable from the template's own statements through the
//! back-references recorded by the namespacer.

pub mod reachability;

pub use reachability::{DeadCodeEliminator, Liveness};
