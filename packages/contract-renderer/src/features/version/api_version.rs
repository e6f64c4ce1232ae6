use crate::errors::{RenderError, Result, VersionIssue};
use crate::features::parsing::{Statement, SyntaxKind, SyntaxTree};
use crate::shared::models::NodeId;
use serde::Serialize;
use std::fmt;

const API_FIELD: &str = "api";

/// Dotted integer version, as declared
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiVersion {
    parts: Vec<u32>,
}

impl ApiVersion {
    pub fn parse(value: &str) -> Option<Self> {
        let parts = value
            .trim()
            .split('.')
            .map(|part| part.parse::<u32>().ok())
            .collect::<Option<Vec<u32>>>()?;
        Some(Self { parts })
    }

    pub fn major(&self) -> u32 {
        self.parts.first().copied().unwrap_or(0)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.parts.iter().map(u32::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Read and check the template's `api` declaration
pub fn check_api_version(tree: &SyntaxTree, supported_major: u32) -> Result<ApiVersion> {
    let issue = |issue| RenderError::UnsupportedVersion {
        path: tree.path().to_path_buf(),
        issue,
    };

    let value = find_api_value(tree).ok_or_else(|| issue(VersionIssue::MissingApi))?;
    let text = tree
        .string_value(value)
        .ok_or_else(|| issue(VersionIssue::NonLiteralApi))?;
    let version = ApiVersion::parse(&text).ok_or_else(|| {
        issue(VersionIssue::Unparseable {
            value: text.clone(),
        })
    })?;
    if version.major() != supported_major {
        return Err(issue(VersionIssue::UnsupportedMajor {
            found: version.to_string(),
            supported: supported_major,
        }));
    }
    Ok(version)
}

fn find_api_value(tree: &SyntaxTree) -> Option<NodeId> {
    tree.statements().iter().find_map(|stmt| {
        let (targets, value) = match tree.statement(*stmt) {
            Statement::Assign { targets, value } => (targets, value),
            Statement::AnnAssign {
                target,
                value: Some(value),
                ..
            } => (vec![target], value),
            _ => return None,
        };
        targets
            .iter()
            .any(|t| tree.kind(*t) == SyntaxKind::Identifier && tree.text(*t) == API_FIELD)
            .then_some(value)
    })
}
