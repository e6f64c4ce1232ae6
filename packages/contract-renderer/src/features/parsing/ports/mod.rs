mod parser;

pub use parser::SourceParser;
