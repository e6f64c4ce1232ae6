use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("no git repository found for {}: {reason}", .path.display())]
    RepositoryNotFound { path: PathBuf, reason: String },

    #[error("git repository has no working directory")]
    BareRepository,

    #[error("{} is outside the git working directory", .path.display())]
    OutsideRepository { path: PathBuf },

    #[error("{} has never been committed", .path.display())]
    NotCommitted { path: PathBuf },

    #[error(
        "the checksum of {} does not match the latest checksum in the Git repo. Ensure that all changes are committed.",
        .path.display()
    )]
    UncommittedChanges { path: PathBuf },

    #[error("git operation failed: {0}")]
    Git(String),
}

#[cfg(feature = "git")]
impl From<git2::Error> for VcsError {
    fn from(err: git2::Error) -> Self {
        VcsError::Git(err.message().to_string())
    }
}

pub type VcsResult<T> = std::result::Result<T, VcsError>;
