//! API Version Check Feature
//!
//! The template declares the contract API it targets with `api = "X.Y.Z"`; only one major
//! version can be rendered.

pub mod api_version;

pub use api_version::{check_api_version, ApiVersion};
