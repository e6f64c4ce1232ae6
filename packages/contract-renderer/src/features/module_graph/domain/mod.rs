mod capability_import;
mod definition;
mod import_graph;
mod module;

pub use capability_import::{CapabilityImport, CapabilitySet, ImportedName};
pub use definition::{Definition, DefinitionKind, DefinitionTable};
pub use import_graph::{ImportEdge, ImportGraph};
pub use module::{ModuleKey, ModuleTable, SourceModule};
