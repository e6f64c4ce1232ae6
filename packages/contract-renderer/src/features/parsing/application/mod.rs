mod printer;

pub use printer::SourcePrinter;
