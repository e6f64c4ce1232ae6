//! Module resolver port

use std::path::PathBuf;

/// Maps a dotted module name to the file that implements it
pub trait ModuleResolver {
    /// `None` when no candidate file exists
    fn resolve(&self, dotted_name: &str) -> Option<PathBuf>;
}
