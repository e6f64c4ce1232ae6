//! Dependency Orderer Feature
//!
//! Linear order of feature modules such that every module comes after the modules it
//! imports. The module graph is checked for cycles first.

pub mod dep_graph;

pub use dep_graph::ModuleDependencyGraph;
