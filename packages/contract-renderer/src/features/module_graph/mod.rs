//! Module Graph Feature
//!
//! Discovers every module reachable from the template through static imports, checks each
//! import against the capability whitelist and records per-module definitions.
//!
//! ## Structure
//! - `domain/` - SourceModule, ImportGraph, Definition, CapabilityImport
//! - `ports/` - ModuleResolver trait
//! - `infrastructure/` - filesystem resolver, statement readers, marker type substitution
//! - `application/` - ImportDiscovery

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{linked_statements, ImportDiscovery, ModuleGraph};
pub use domain::{
    CapabilityImport, CapabilitySet, Definition, DefinitionKind, DefinitionTable, ImportEdge,
    ImportGraph, ImportedName, ModuleKey, ModuleTable, SourceModule,
};
pub use infrastructure::FileSystemModuleResolver;
pub use ports::ModuleResolver;
