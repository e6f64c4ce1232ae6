use super::error::VcsResult;
use crate::config::HashAlgorithm;
use std::path::{Path, PathBuf};

/// Revision metadata for module files
pub trait RevisionLookup {
    /// Last commit touching `path`, provided its committed content hashes to `checksum`
    fn validated_revision(
        &self,
        path: &Path,
        checksum: &str,
        algorithm: HashAlgorithm,
    ) -> VcsResult<String>;

    /// `path` relative to the repository working directory
    fn relative_path(&self, path: &Path) -> Option<PathBuf>;
}
