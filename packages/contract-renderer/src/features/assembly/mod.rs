//! Assembly Feature
//!
//! Builds the merged statement sequence: live feature definitions in dependency order with
//! provenance headers, merged capability imports, then the template body. Optionally hoists
//! contract metadata to the top of the file.

pub mod assembler;
pub mod header;
pub mod output;
pub mod reorder;

pub use assembler::Assembler;
pub use header::HeaderBuilder;
pub use output::{header_literal, unescape_header, OutputItem, OutputProgram, ProgramView};
pub use reorder::hoist_metadata;
