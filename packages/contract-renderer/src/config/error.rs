//! Renderer configuration errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("renderer config has no `version` field, start the file with `version: 1`")]
    MissingVersion,

    #[error("renderer config version {found} is not supported (known: {})", .supported.iter().map(u32::to_string).collect::<Vec<_>>().join(", "))]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    /// A field holds a value the renderer cannot use
    #[error("`{field}`: {reason}")]
    Invalid { field: String, reason: String },

    #[error("`{field}` lists '{value}' more than once")]
    Duplicate { field: String, value: String },

    #[error("cannot read renderer config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed renderer config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
