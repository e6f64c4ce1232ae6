//! Header token pass
//!
//! Provenance headers travel through assembly as marker-prefixed string statements. Here they
//! become plain comment lines, with one blank line before a header block that follows code
//! and exactly one after it (none at end of file).

use super::parse_rendered;
use crate::errors::Result;
use crate::features::assembly::unescape_header;
use crate::shared::utils::tree_sitter::{children, extract_node_text, node_to_span};
use std::collections::HashMap;

/// Replace header string statements carrying `marker` with the comment text they hold
pub fn strip_header_tokens(text: &str, marker: &str) -> Result<String> {
    let tree = parse_rendered(text)?;
    let root = tree.root_node();

    let mut headers: HashMap<usize, String> = HashMap::new();
    for statement in children(&root) {
        if statement.kind() != "expression_statement" || statement.named_child_count() != 1 {
            continue;
        }
        let Some(string) = statement.named_child(0) else {
            continue;
        };
        if string.kind() != "string" || node_to_span(&string).is_multiline() {
            continue;
        }
        let literal = extract_node_text(&string, text);
        let Some(body) = literal
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        else {
            continue;
        };
        let line = unescape_header(body);
        if let Some(comment) = line.strip_prefix(marker) {
            headers.insert(statement.start_position().row, comment.to_string());
        }
    }

    let lines: Vec<&str> = text.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len() + headers.len());
    let mut row = 0;
    while row < lines.len() {
        let Some(comment) = headers.get(&row) else {
            out.push(lines[row].to_string());
            row += 1;
            continue;
        };

        if out.last().is_some_and(|last| !last.trim().is_empty()) {
            out.push(String::new());
        }
        out.push(comment.clone());
        row += 1;
        while let Some(comment) = headers.get(&row) {
            out.push(comment.clone());
            row += 1;
        }

        while row < lines.len() && lines[row].trim().is_empty() {
            row += 1;
        }
        if row < lines.len() {
            out.push(String::new());
        }
    }

    let mut result = out.join("\n");
    result.push('\n');
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::assembly::header_literal;
    use pretty_assertions::assert_eq;

    const MARKER: &str = "<HDR>";

    fn header(line: &str) -> String {
        header_literal(MARKER, line)
    }

    #[test]
    fn test_headers_become_comments_with_spacing() {
        let text = [
            header("# Objects below have been imported from:"),
            header("#    fees.py"),
            header("# sha256:abc"),
            "fees_RATE = 1".to_string(),
            header("# Objects below have been imported from:"),
            header("#    template.py"),
            "x = fees_RATE".to_string(),
        ]
        .join("\n");

        let expected = concat!(
            "# Objects below have been imported from:\n",
            "#    fees.py\n",
            "# sha256:abc\n",
            "\n",
            "fees_RATE = 1\n",
            "\n",
            "# Objects below have been imported from:\n",
            "#    template.py\n",
            "\n",
            "x = fees_RATE\n",
        );
        assert_eq!(strip_header_tokens(&text, MARKER).unwrap(), expected);
    }

    #[test]
    fn test_trailing_header_block_has_no_blank_after() {
        let text = format!("x = 1\n\n\n{}\n\n", header("#    tail.py"));
        assert_eq!(
            strip_header_tokens(&text, MARKER).unwrap(),
            "x = 1\n\n\n#    tail.py\n"
        );
    }

    #[test]
    fn test_plain_strings_untouched() {
        let text = "\"\"\"docstring\"\"\"\n\"<other># not a header\"\n";
        assert_eq!(strip_header_tokens(text, MARKER).unwrap(), text);
    }

    #[test]
    fn test_header_with_escaped_path() {
        let text = header(r#"#    C:\lib\fees.py"#);
        assert_eq!(
            strip_header_tokens(&text, MARKER).unwrap(),
            "#    C:\\lib\\fees.py\n"
        );
    }
}
