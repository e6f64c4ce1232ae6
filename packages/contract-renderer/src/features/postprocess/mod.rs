//! Post-processing Feature
//!
//! Text-level passes over the printed program: header markers become comments, the
//! auto-generated warning is prepended, and layout is normalised.

pub mod formatter;
pub mod header_tokens;

pub use formatter::format_source;
pub use header_tokens::strip_header_tokens;

use crate::config::RenderConfig;
use crate::errors::{RenderError, Result, SourceLocation};
use crate::shared::utils::tree_sitter::{find_first_error, parse_python};
use tracing::debug;
use tree_sitter::Tree;

/// Pseudo path used in errors about the rendered text
const RENDERED: &str = "<rendered>";

pub struct PostProcessor<'a> {
    config: &'a RenderConfig,
}

impl<'a> PostProcessor<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config }
    }

    pub fn process(&self, text: &str) -> Result<String> {
        let mut output = strip_header_tokens(text, self.config.header_marker())?;
        if let Some(warning) = self.config.autogen_warning() {
            output = format!("{warning}\n\n\n{output}");
        }
        if self.config.apply_formatting() {
            output = format_source(&output)?;
        }
        debug!(bytes = output.len(), "post-processed rendered output");
        Ok(output)
    }
}

/// Parse rendered text, failing on the first syntax error
pub(crate) fn parse_rendered(text: &str) -> Result<Tree> {
    let tree = parse_python(text).ok_or_else(|| RenderError::ParserUnavailable {
        reason: "tree-sitter-python could not parse the rendered output".to_string(),
    })?;
    if let Some(error) = find_first_error(&tree.root_node()) {
        let position = error.start_position();
        return Err(RenderError::Parse {
            location: SourceLocation::new(
                RENDERED,
                position.row as u32 + 1,
                position.column as u32 + 1,
            ),
        });
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::assembly::header_literal;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_warning_and_headers() {
        let config = RenderConfig::builder()
            .autogen_warning("# generated")
            .build()
            .unwrap();
        let marker = config.header_marker();
        let text = [
            header_literal(marker, "# Objects below have been imported from:"),
            header_literal(marker, "#    fees.py"),
            "def fees_charge():\n    return 1".to_string(),
            header_literal(marker, "# Objects below have been imported from:"),
            header_literal(marker, "#    template.py"),
            "x = fees_charge()".to_string(),
        ]
        .join("\n");

        let expected = concat!(
            "# generated\n",
            "\n",
            "\n",
            "# Objects below have been imported from:\n",
            "#    fees.py\n",
            "\n",
            "\n",
            "def fees_charge():\n",
            "    return 1\n",
            "\n",
            "\n",
            "# Objects below have been imported from:\n",
            "#    template.py\n",
            "\n",
            "x = fees_charge()\n",
        );
        assert_eq!(PostProcessor::new(&config).process(&text).unwrap(), expected);
    }

    #[test]
    fn test_unformatted_output_keeps_layout() {
        let config = RenderConfig::builder()
            .include_autogen_warning(false)
            .apply_formatting(false)
            .build()
            .unwrap();
        let output = PostProcessor::new(&config).process("x = 1   \ny = 2").unwrap();
        assert_eq!(output, "x = 1   \ny = 2\n");
    }

    #[test]
    fn test_syntax_error_reported_with_position() {
        let err = parse_rendered("x = 1\ndef (:\n").unwrap_err();
        match err {
            RenderError::Parse { location } => assert_eq!(location.line, 2),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
