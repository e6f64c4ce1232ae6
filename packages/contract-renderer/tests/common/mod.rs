//! Common test utilities for contract-renderer
//!
//! Temp-dir contract projects and assertions over rendered source, shared by the
//! integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
