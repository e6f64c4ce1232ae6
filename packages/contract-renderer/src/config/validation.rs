//! Configuration validation

use super::error::{ConfigError, ConfigResult};
use super::render_config::RenderConfig;
use std::collections::HashSet;

/// Trait for validatable configuration objects
pub trait Validatable {
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Get the configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}

fn check_unique<'a>(field: &str, values: impl IntoIterator<Item = &'a str>) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(ConfigError::Duplicate {
                field: field.to_string(),
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => chars.all(|c| c == '_' || c.is_alphanumeric()),
        _ => false,
    }
}

impl Validatable for RenderConfig {
    fn validate(&self) -> ConfigResult<()> {
        let marker = &self.header_marker;
        if marker.is_empty() {
            return Err(ConfigError::invalid("header.marker", "must not be empty"));
        }
        if marker.contains(['\n', '\r', '"', '\'', '\\']) {
            return Err(ConfigError::invalid(
                "header.marker",
                "must be a single line without quotes or backslashes",
            ));
        }
        if self.header_prefix.contains(['\n', '\r']) {
            return Err(ConfigError::invalid("header.prefix", "must be a single line"));
        }

        for rule in self.whitelist.rules() {
            if rule.module.is_empty() || !rule.module.split('.').all(is_identifier) {
                return Err(ConfigError::invalid(
                    "whitelist.module",
                    format!("'{}' is not a dotted module name", rule.module),
                ));
            }
        }
        check_unique("whitelist", self.whitelist.module_names())?;
        check_unique("metadata_order", self.metadata_order.iter().map(String::as_str))?;

        for name in self.directives.iter().chain(&self.marker_types) {
            if !is_identifier(name) {
                return Err(ConfigError::invalid(
                    "directives",
                    format!("'{name}' is not an identifier"),
                ));
            }
        }
        if !is_identifier(&self.placeholder_type) {
            return Err(ConfigError::invalid("placeholder_type", "must be an identifier"));
        }
        if self.autogen_warning.contains('\n') && !self.autogen_warning.ends_with('\n') {
            return Err(ConfigError::invalid("autogen_warning", "must be a single line"));
        }
        if !self.autogen_warning.trim_start().starts_with('#') {
            return Err(ConfigError::invalid("autogen_warning", "must be a comment line"));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "RenderConfig"
    }
}
