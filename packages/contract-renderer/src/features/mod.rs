//! Feature modules - one per render stage
//!
//! Larger features use a hexagonal split:
//! - domain/     - Pure data structures
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases
//! - infrastructure/ - tree-sitter, filesystem and git adapters

pub mod parsing;

// Stage 1: import discovery and capability checks
pub mod module_graph;

// Stage 2: root `api` declaration
pub mod version;

// Stage 3: flat names and reference rewriting
pub mod namespacing;

// Stage 4: cycle check and dependency order
pub mod ordering;

// Stage 5: reachability from the template
pub mod dead_code;

// Stage 6: merged statement list with provenance headers
pub mod assembly;

// Stage 7: literal directive arguments
pub mod constant_folding;

// Stage 8: header comments and layout
pub mod postprocess;

// Header revisions (git2 behind the `git` feature)
pub mod vcs;
