#[cfg(feature = "git")]
mod git;

#[cfg(feature = "git")]
pub use git::GitRevisionLookup;
