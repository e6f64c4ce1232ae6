//! Shared building blocks used across every feature.

pub mod models;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;
