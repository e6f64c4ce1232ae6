mod fs_resolver;
pub mod statements;
pub mod type_hints;

pub use fs_resolver::FileSystemModuleResolver;
