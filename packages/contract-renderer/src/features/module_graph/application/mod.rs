mod discovery;

pub use discovery::{linked_statements, ImportDiscovery, ModuleGraph};
