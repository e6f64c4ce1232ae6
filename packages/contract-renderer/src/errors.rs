//! Error types for contract-renderer
//!
//! Every failure aborts the render. Nothing is retried and no partial output is produced, so
//! one enum covers the whole pipeline and each variant carries enough context (module path,
//! position, rule) to point the author at the offending line.

use crate::config::ConfigError;
use crate::features::vcs::VcsError;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Position of an offending construct: module file plus 1-based line and column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub path: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(path: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            path: path.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.column)
    }
}

/// Which import rule a statement broke
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportViolation {
    #[error("`{module}` cannot be imported directly, use `from {module} import ...`")]
    ReservedCapability { module: String },

    #[error("`{module}` must be imported directly and must not be aliased")]
    AliasedDirectImport { module: String },

    #[error("importing '*' from module '{module}' is not allowed")]
    Wildcard { module: String },

    #[error("importing '{symbol}' from module '{module}' is not allowed")]
    SymbolNotAllowed { module: String, symbol: String },

    #[error("`from {module} import ...` is only available for whitelisted capability modules")]
    NotWhitelisted { module: String },

    #[error("module at '{}' is a third-party module, feature modules must be first-party", .path.display())]
    ThirdParty { path: PathBuf },
}

/// Problems with the root module's `api` declaration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionIssue {
    #[error("could not find an `api` assignment in the root module")]
    MissingApi,

    #[error("`api` value must be a string literal")]
    NonLiteralApi,

    #[error("could not parse `api` value {value:?}")]
    Unparseable { value: String },

    #[error("api version {found} is not supported, expected major version {supported}")]
    UnsupportedMajor { found: String, supported: u32 },
}

/// Coarse grouping of errors, mirrors how callers report them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCategory {
    /// Input breaks the capability whitelist
    Configuration,
    /// Input uses a construct the linker cannot rewrite
    Structural,
    /// Root module targets an unsupported interpreter version
    Version,
    /// Filesystem, VCS or renderer configuration problems
    Environment,
}

/// Main error type for render operations
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{location}: disallowed import: {violation}\n    {statement}")]
    DisallowedImport {
        location: SourceLocation,
        statement: String,
        violation: ImportViolation,
    },

    #[error("{location}: import of feature module `{module}` must include an `as` alias")]
    MissingAlias {
        location: SourceLocation,
        module: String,
    },

    #[error("{location}: alias `{alias}` is ambiguous, it refers to {}", .candidates.join(", "))]
    AmbiguousAlias {
        location: SourceLocation,
        alias: String,
        candidates: Vec<String>,
    },

    #[error("{location}: unable to assign to target of type {shape}")]
    UnsupportedTargetShape {
        location: SourceLocation,
        shape: String,
    },

    #[error("{location}: cannot resolve module `{module}`")]
    UnresolvableModule {
        location: SourceLocation,
        module: String,
    },

    #[error("{}: {issue}", .path.display())]
    UnsupportedVersion { path: PathBuf, issue: VersionIssue },

    #[error(
        "{location}: argument `{keyword}` of `@{directive}` on `{function}` must be a literal"
    )]
    NonLiteralDirectiveArgument {
        location: SourceLocation,
        directive: String,
        function: String,
        keyword: String,
    },

    #[error("namespaced name `{name}` from `{module}` collides with a name defined in `{other}`")]
    NamespaceCollision {
        name: String,
        module: String,
        other: String,
    },

    #[error("import cycle between modules: {}", .modules.join(" -> "))]
    ImportCycle { modules: Vec<String> },

    #[error("{location}: syntax error")]
    Parse { location: SourceLocation },

    #[error("parser unavailable: {reason}")]
    ParserUnavailable { reason: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("refusing to overwrite {}, pass force to replace it", .path.display())]
    OutputExists { path: PathBuf },

    #[error(transparent)]
    Vcs(#[from] VcsError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RenderError {
    /// Create an I/O error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RenderError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            RenderError::DisallowedImport { .. } => ErrorCategory::Configuration,
            RenderError::MissingAlias { .. }
            | RenderError::AmbiguousAlias { .. }
            | RenderError::UnsupportedTargetShape { .. }
            | RenderError::UnresolvableModule { .. }
            | RenderError::NonLiteralDirectiveArgument { .. }
            | RenderError::NamespaceCollision { .. }
            | RenderError::ImportCycle { .. }
            | RenderError::Parse { .. } => ErrorCategory::Structural,
            RenderError::UnsupportedVersion { .. } => ErrorCategory::Version,
            RenderError::Io { .. }
            | RenderError::ParserUnavailable { .. }
            | RenderError::OutputExists { .. }
            | RenderError::Vcs(_)
            | RenderError::Config(_) => ErrorCategory::Environment,
        }
    }

    /// The import rule broken, for configuration violations
    pub fn violation(&self) -> Option<&ImportViolation> {
        match self {
            RenderError::DisallowedImport { violation, .. } => Some(violation),
            _ => None,
        }
    }
}

/// Result type alias for render operations
pub type Result<T> = std::result::Result<T, RenderError>;
