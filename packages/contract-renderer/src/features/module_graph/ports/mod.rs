mod resolver;

pub use resolver::ModuleResolver;
