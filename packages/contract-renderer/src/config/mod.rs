//! Renderer configuration
//!
//! `RenderConfig` is an immutable value object: built once through [`RenderConfig::builder`]
//! (or loaded from YAML), validated, then shared by reference with every pipeline stage.
//!
//! # Example
//! ```rust,ignore
//! let config = RenderConfig::builder()
//!     .use_git(false)
//!     .search_path("library")
//!     .build()?;
//! ```

pub mod capability;
pub mod error;
pub mod io;
pub mod render_config;
pub mod validation;

pub use capability::{CapabilityRule, CapabilityWhitelist, ImportStyle, SymbolPolicy};
pub use error::{ConfigError, ConfigResult};
pub use render_config::{
    HashAlgorithm, RenderConfig, RenderConfigBuilder, CONTRACT_METADATA_FIELDS, HOOKS,
    TOP_LEVEL_METADATA_FIELDS,
};
pub use validation::Validatable;
