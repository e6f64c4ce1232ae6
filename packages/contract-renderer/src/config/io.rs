//! Configuration I/O (YAML loading)
//!
//! The file format is a partial override of [`RenderConfig::default`]: every field except
//! `version` is optional.

use super::capability::{CapabilityRule, CapabilityWhitelist, ImportStyle, SymbolPolicy};
use super::error::{ConfigError, ConfigResult};
use super::render_config::{HashAlgorithm, RenderConfig, RenderConfigBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<Vec<CapabilityEntry>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_order: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected_names: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub directives: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_types: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_modules: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_party_segments: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_paths: Vec<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderSection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashing_algorithm: Option<HashAlgorithm>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_git: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_repo_root: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_full_filepath_in_headers: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_metadata_at_top_of_file: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_formatting: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_autogen_warning: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub autogen_warning: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_filepath: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_api_major: Option<u32>,
}

/// One whitelist row. `symbols` is ignored when `all_symbols` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapabilityEntry {
    pub module: String,
    #[serde(default)]
    pub symbols: Vec<String>,
    #[serde(default)]
    pub all_symbols: bool,
    #[serde(default)]
    pub style: ImportStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl From<CapabilityEntry> for CapabilityRule {
    fn from(entry: CapabilityEntry) -> Self {
        let symbols = if entry.all_symbols {
            SymbolPolicy::All
        } else {
            SymbolPolicy::Only(entry.symbols)
        };
        CapabilityRule::new(entry.module, symbols, entry.style)
    }
}

impl From<&CapabilityRule> for CapabilityEntry {
    fn from(rule: &CapabilityRule) -> Self {
        let (symbols, all_symbols) = match &rule.symbols {
            SymbolPolicy::All => (Vec::new(), true),
            SymbolPolicy::Only(symbols) => (symbols.clone(), false),
        };
        CapabilityEntry {
            module: rule.module.clone(),
            symbols,
            all_symbols,
            style: rule.style,
        }
    }
}

impl RenderConfig {
    /// Load a configuration file. Relative search paths are resolved against the file's
    /// directory.
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<RenderConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_yaml_str_with_base(&content, base)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<RenderConfig> {
        Self::from_yaml_str_with_base(content, Path::new("."))
    }

    fn from_yaml_str_with_base(content: &str, base: &Path) -> ConfigResult<RenderConfig> {
        let file: RenderConfigFileV1 = serde_yaml::from_str(content)?;

        // Version check
        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        file.apply(RenderConfigBuilder::new(), base).build()
    }

    /// Serialize the full configuration as a v1 file
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = RenderConfigFileV1 {
            version: Some(1),
            whitelist: Some(self.whitelist.rules().iter().map(Into::into).collect()),
            metadata_order: Some(self.metadata_order.clone()),
            protected_names: Some(self.protected_names.clone()),
            directives: Some(self.directives.clone()),
            marker_types: Some(self.marker_types.clone()),
            extension_modules: Some(self.extension_fragments.clone()),
            third_party_segments: Some(self.third_party_segments.clone()),
            search_paths: self.search_paths.clone(),
            header: Some(HeaderSection {
                marker: Some(self.header_marker.clone()),
                prefix: Some(self.header_prefix.clone()),
            }),
            hashing_algorithm: Some(self.hashing_algorithm),
            use_git: Some(self.use_git),
            git_repo_root: self.git_repo_root.clone(),
            use_full_filepath_in_headers: Some(self.use_full_filepath_in_headers),
            render_metadata_at_top_of_file: Some(self.render_metadata_at_top_of_file),
            apply_formatting: Some(self.apply_formatting),
            include_autogen_warning: Some(self.include_autogen_warning),
            autogen_warning: Some(self.autogen_warning.clone()),
            output_filepath: self.output_filepath.clone(),
            supported_api_major: Some(self.supported_api_major),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

impl RenderConfigFileV1 {
    fn apply(self, mut builder: RenderConfigBuilder, base: &Path) -> RenderConfigBuilder {
        if let Some(entries) = self.whitelist {
            let rules = entries.into_iter().map(CapabilityRule::from).collect();
            builder = builder.whitelist(CapabilityWhitelist::new(rules));
        }
        if let Some(order) = self.metadata_order {
            builder = builder.metadata_order(order);
        }
        if let Some(names) = self.protected_names {
            builder = builder.protected_names(names);
        }
        if let Some(names) = self.directives {
            builder = builder.directives(names);
        }
        if let Some(names) = self.marker_types {
            builder = builder.marker_types(names);
        }
        if let Some(fragments) = self.extension_modules {
            builder = builder.extension_fragments(fragments);
        }
        if let Some(segments) = self.third_party_segments {
            builder = builder.third_party_segments(segments);
        }
        for path in self.search_paths {
            let resolved = if path.is_relative() { base.join(path) } else { path };
            builder = builder.search_path(resolved);
        }
        if let Some(header) = self.header {
            if let Some(marker) = header.marker {
                builder = builder.header_marker(marker);
            }
            if let Some(prefix) = header.prefix {
                builder = builder.header_prefix(prefix);
            }
        }
        if let Some(algorithm) = self.hashing_algorithm {
            builder = builder.hashing_algorithm(algorithm);
        }
        if let Some(enabled) = self.use_git {
            builder = builder.use_git(enabled);
        }
        if let Some(root) = self.git_repo_root {
            builder = builder.git_repo_root(root);
        }
        if let Some(enabled) = self.use_full_filepath_in_headers {
            builder = builder.use_full_filepath_in_headers(enabled);
        }
        if let Some(enabled) = self.render_metadata_at_top_of_file {
            builder = builder.render_metadata_at_top_of_file(enabled);
        }
        if let Some(enabled) = self.apply_formatting {
            builder = builder.apply_formatting(enabled);
        }
        if let Some(enabled) = self.include_autogen_warning {
            builder = builder.include_autogen_warning(enabled);
        }
        if let Some(warning) = self.autogen_warning {
            builder = builder.autogen_warning(warning);
        }
        if let Some(path) = self.output_filepath {
            builder = builder.output_filepath(path);
        }
        if let Some(major) = self.supported_api_major {
            builder = builder.supported_api_major(major);
        }
        builder
    }
}
