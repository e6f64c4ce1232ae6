//! VCS Provenance Feature
//!
//! Stamps module headers with the commit that last touched each module, after checking that
//! the working copy matches it.

pub mod error;
pub mod infrastructure;
pub mod ports;

pub use error::{VcsError, VcsResult};
#[cfg(feature = "git")]
pub use infrastructure::GitRevisionLookup;
pub use ports::RevisionLookup;
