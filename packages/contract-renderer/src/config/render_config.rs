//! Render configuration value object and builder

use super::capability::CapabilityWhitelist;
use super::error::ConfigResult;
use super::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Metadata fields hoisted to the top of the rendered file, in this order.
///
/// Fields such as `event_types` are left out: they are usually built from feature-level
/// assignments that must be emitted first.
pub const TOP_LEVEL_METADATA_FIELDS: &[&str] = &[
    "api",
    "version",
    "display_name",
    "summary",
    "explanation",
    "tside",
    "supervised_smart_contracts",
    "supported_denominations",
    "events_timezone",
    "contract_module_imports",
    "global_parameters",
];

/// Every contract metadata field; none of these is ever folded into a directive
pub const CONTRACT_METADATA_FIELDS: &[&str] = &[
    "api",
    "version",
    "display_name",
    "summary",
    "explanation",
    "tside",
    "supervised_smart_contracts",
    "supported_denominations",
    "events_timezone",
    "contract_module_imports",
    "global_parameters",
    "data_fetchers",
    "event_types_groups",
    "event_types",
    "notification_types",
    "parameters",
];

pub const HOOKS: &[&str] = &[
    "activation_hook",
    "conversion_hook",
    "deactivation_hook",
    "derived_parameter_hook",
    "post_parameter_change_hook",
    "post_posting_hook",
    "pre_parameter_change_hook",
    "pre_posting_hook",
    "scheduled_event_hook",
];

const DEFAULT_DIRECTIVES: &[&str] = &["requires", "fetch_account_data"];
const DEFAULT_MARKER_TYPES: &[&str] = &[
    "SmartContractVault",
    "SuperviseeContractVault",
    "SupervisorContractVault",
];
const DEFAULT_EXTENSION_FRAGMENTS: &[&str] = &["contracts_api_extensions"];
const DEFAULT_THIRD_PARTY_SEGMENTS: &[&str] = &["site-packages", "third_party"];

pub const DEFAULT_HEADER_MARKER: &str = "<IMPORTED_MODULE_HEADER>";
pub const DEFAULT_HEADER_PREFIX: &str = "Objects below have been imported from";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Checksum used in provenance headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Blake3,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake3 => "blake3",
        }
    }

    /// Hex digest of `content`
    pub fn digest(&self, content: &[u8]) -> String {
        match self {
            HashAlgorithm::Sha256 => {
                use sha2::{Digest, Sha256};
                let mut hasher = Sha256::new();
                hasher.update(content);
                format!("{:x}", hasher.finalize())
            }
            HashAlgorithm::Blake3 => blake3::hash(content).to_hex().to_string(),
        }
    }
}

/// Immutable configuration for one or more renders
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub(crate) whitelist: CapabilityWhitelist,
    pub(crate) metadata_order: Vec<String>,
    pub(crate) protected_names: Vec<String>,
    pub(crate) directives: Vec<String>,
    pub(crate) marker_types: Vec<String>,
    pub(crate) placeholder_type: String,
    pub(crate) placeholder_module: String,
    pub(crate) extension_fragments: Vec<String>,
    pub(crate) third_party_segments: Vec<String>,
    pub(crate) search_paths: Vec<PathBuf>,
    pub(crate) header_marker: String,
    pub(crate) header_prefix: String,
    pub(crate) hashing_algorithm: HashAlgorithm,
    pub(crate) use_git: bool,
    pub(crate) git_repo_root: Option<PathBuf>,
    pub(crate) use_full_filepath_in_headers: bool,
    pub(crate) render_metadata_at_top_of_file: bool,
    pub(crate) apply_formatting: bool,
    pub(crate) include_autogen_warning: bool,
    pub(crate) autogen_warning: String,
    pub(crate) output_filepath: Option<PathBuf>,
    pub(crate) supported_api_major: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let whitelist = CapabilityWhitelist::default();
        let metadata_order = default_metadata_order(&whitelist);
        Self {
            whitelist,
            metadata_order,
            protected_names: strings(CONTRACT_METADATA_FIELDS),
            directives: strings(DEFAULT_DIRECTIVES),
            marker_types: strings(DEFAULT_MARKER_TYPES),
            placeholder_type: "Any".to_string(),
            placeholder_module: "typing".to_string(),
            extension_fragments: strings(DEFAULT_EXTENSION_FRAGMENTS),
            third_party_segments: strings(DEFAULT_THIRD_PARTY_SEGMENTS),
            search_paths: Vec::new(),
            header_marker: DEFAULT_HEADER_MARKER.to_string(),
            header_prefix: DEFAULT_HEADER_PREFIX.to_string(),
            hashing_algorithm: HashAlgorithm::default(),
            use_git: false,
            git_repo_root: None,
            use_full_filepath_in_headers: false,
            render_metadata_at_top_of_file: true,
            apply_formatting: true,
            include_autogen_warning: true,
            autogen_warning: format!(
                "# Code auto-generated using Contract Renderer Version {}",
                env!("CARGO_PKG_VERSION")
            ),
            output_filepath: None,
            supported_api_major: 4,
        }
    }
}

/// Whitelist module names, then metadata fields, then hooks
fn default_metadata_order(whitelist: &CapabilityWhitelist) -> Vec<String> {
    whitelist
        .module_names()
        .map(str::to_string)
        .chain(strings(TOP_LEVEL_METADATA_FIELDS))
        .chain(strings(HOOKS))
        .collect()
}

impl RenderConfig {
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::new()
    }

    pub fn whitelist(&self) -> &CapabilityWhitelist {
        &self.whitelist
    }

    pub fn metadata_order(&self) -> &[String] {
        &self.metadata_order
    }

    pub fn is_protected_name(&self, name: &str) -> bool {
        self.protected_names.iter().any(|n| n == name)
    }

    pub fn is_directive(&self, name: &str) -> bool {
        self.directives.iter().any(|n| n == name)
    }

    pub fn is_marker_type(&self, name: &str) -> bool {
        self.marker_types.iter().any(|n| n == name)
    }

    pub fn placeholder_type(&self) -> &str {
        &self.placeholder_type
    }

    pub fn placeholder_module(&self) -> &str {
        &self.placeholder_module
    }

    /// `from <module> import ...` statements that are dropped without checks
    pub fn is_extension_module(&self, module: &str) -> bool {
        self.extension_fragments
            .iter()
            .any(|fragment| module.contains(fragment.as_str()))
    }

    pub fn is_third_party_path(&self, path: &Path) -> bool {
        path.components().any(|component| {
            let component = component.as_os_str().to_string_lossy();
            self.third_party_segments.iter().any(|s| s == &component)
        })
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    pub fn header_marker(&self) -> &str {
        &self.header_marker
    }

    pub fn header_prefix(&self) -> &str {
        &self.header_prefix
    }

    pub fn hashing_algorithm(&self) -> HashAlgorithm {
        self.hashing_algorithm
    }

    pub fn use_git(&self) -> bool {
        self.use_git
    }

    pub fn git_repo_root(&self) -> Option<&Path> {
        self.git_repo_root.as_deref()
    }

    pub fn use_full_filepath_in_headers(&self) -> bool {
        self.use_full_filepath_in_headers
    }

    pub fn render_metadata_at_top_of_file(&self) -> bool {
        self.render_metadata_at_top_of_file
    }

    pub fn apply_formatting(&self) -> bool {
        self.apply_formatting
    }

    /// Warning line to prepend, when enabled
    pub fn autogen_warning(&self) -> Option<&str> {
        self.include_autogen_warning
            .then_some(self.autogen_warning.as_str())
    }

    pub fn output_filepath(&self) -> Option<&Path> {
        self.output_filepath.as_deref()
    }

    pub fn supported_api_major(&self) -> u32 {
        self.supported_api_major
    }

    /// Default output path: `<stem>_rendered.py` next to the template
    pub fn output_path_for(&self, template: &Path) -> PathBuf {
        if let Some(path) = &self.output_filepath {
            return path.clone();
        }
        let stem = template
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "contract".to_string());
        template.with_file_name(format!("{stem}_rendered.py"))
    }
}

/// Builder for [`RenderConfig`], starting from the defaults
#[derive(Debug, Clone)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
    metadata_order_overridden: bool,
}

impl Default for RenderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RenderConfig::default(),
            metadata_order_overridden: false,
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: RenderConfig) -> Self {
        Self {
            config,
            metadata_order_overridden: true,
        }
    }

    /// Replace the capability table. Unless the metadata order is set explicitly it is
    /// re-derived from the new table.
    pub fn whitelist(mut self, whitelist: CapabilityWhitelist) -> Self {
        self.config.whitelist = whitelist;
        if !self.metadata_order_overridden {
            self.config.metadata_order = default_metadata_order(&self.config.whitelist);
        }
        self
    }

    pub fn metadata_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.metadata_order = order.into_iter().map(Into::into).collect();
        self.metadata_order_overridden = true;
        self
    }

    pub fn protected_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.protected_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn directives<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.directives = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn marker_types<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.marker_types = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn extension_fragments<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.extension_fragments = fragments.into_iter().map(Into::into).collect();
        self
    }

    pub fn third_party_segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.third_party_segments = segments.into_iter().map(Into::into).collect();
        self
    }

    pub fn search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.search_paths.push(path.into());
        self
    }

    pub fn header_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.header_marker = marker.into();
        self
    }

    pub fn header_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.header_prefix = prefix.into();
        self
    }

    pub fn hashing_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.config.hashing_algorithm = algorithm;
        self
    }

    pub fn use_git(mut self, enabled: bool) -> Self {
        self.config.use_git = enabled;
        self
    }

    pub fn git_repo_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.git_repo_root = Some(root.into());
        self
    }

    pub fn use_full_filepath_in_headers(mut self, enabled: bool) -> Self {
        self.config.use_full_filepath_in_headers = enabled;
        self
    }

    pub fn render_metadata_at_top_of_file(mut self, enabled: bool) -> Self {
        self.config.render_metadata_at_top_of_file = enabled;
        self
    }

    pub fn apply_formatting(mut self, enabled: bool) -> Self {
        self.config.apply_formatting = enabled;
        self
    }

    pub fn include_autogen_warning(mut self, enabled: bool) -> Self {
        self.config.include_autogen_warning = enabled;
        self
    }

    pub fn autogen_warning(mut self, warning: impl Into<String>) -> Self {
        self.config.autogen_warning = warning.into();
        self
    }

    pub fn output_filepath(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_filepath = Some(path.into());
        self
    }

    pub fn supported_api_major(mut self, major: u32) -> Self {
        self.config.supported_api_major = major;
        self
    }

    /// Validate and freeze
    pub fn build(self) -> ConfigResult<RenderConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::capability::{CapabilityRule, ImportStyle, SymbolPolicy};

    #[test]
    fn test_default_metadata_order_is_whitelist_then_fields_then_hooks() {
        let config = RenderConfig::default();
        let order = config.metadata_order();
        assert_eq!(order[0], "contracts_api");
        let api_pos = order.iter().position(|n| n == "api").unwrap();
        let zoneinfo_pos = order.iter().position(|n| n == "zoneinfo").unwrap();
        let hook_pos = order.iter().position(|n| n == "activation_hook").unwrap();
        assert!(zoneinfo_pos < api_pos);
        assert!(api_pos < hook_pos);
        assert_eq!(order.last().map(String::as_str), Some("scheduled_event_hook"));
    }

    #[test]
    fn test_whitelist_override_rederives_order() {
        let config = RenderConfig::builder()
            .whitelist(CapabilityWhitelist::new(vec![CapabilityRule::new(
                "decimal",
                SymbolPolicy::All,
                ImportStyle::Any,
            )]))
            .build()
            .unwrap();
        assert_eq!(config.metadata_order()[0], "decimal");
        assert_eq!(config.metadata_order()[1], "api");
    }

    #[test]
    fn test_explicit_order_survives_whitelist_override() {
        let config = RenderConfig::builder()
            .metadata_order(["version", "api"])
            .whitelist(CapabilityWhitelist::default())
            .build()
            .unwrap();
        assert_eq!(config.metadata_order(), ["version", "api"]);
    }

    #[test]
    fn test_output_path_defaults_next_to_template() {
        let config = RenderConfig::default();
        assert_eq!(
            config.output_path_for(Path::new("library/loan/loan.py")),
            PathBuf::from("library/loan/loan_rendered.py")
        );
    }

    #[test]
    fn test_third_party_detection_matches_whole_segments() {
        let config = RenderConfig::default();
        assert!(config.is_third_party_path(Path::new("/venv/lib/site-packages/pkg/mod.py")));
        assert!(!config.is_third_party_path(Path::new("/src/my_site-packages_notes/mod.py")));
    }

    #[test]
    fn test_digests() {
        assert_eq!(
            HashAlgorithm::Sha256.digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(HashAlgorithm::Blake3.digest(b"abc").len(), 64);
    }
}
