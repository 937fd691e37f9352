//! Plain-text projection
//!
//! Flattens a forest into indented plain text, the `text/plain` companion of a clipboard
//! payload. One line per node, styling dropped. Dividers are skipped, presentation notes are
//! written as their text, and code blocks as their source lines. Serialization only.
//!
//! # Parameters
//!
//! - `indent`: string written once per nesting level (default a tab)

use crate::common::code_block;
use crate::common::entities::html_to_plain_text;
use crate::common::indent::strip_heading_marker;
use crate::error::FormatError;
use crate::format::Format;
use crate::formats::common::reject_unknown_options;
use crate::tree::{NodeKind, RichNode};
use std::collections::HashMap;

/// Options for the plain-text projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOptions {
    pub indent_string: String,
}

impl Default for TextOptions {
    fn default() -> Self {
        TextOptions {
            indent_string: "\t".to_string(),
        }
    }
}

/// Project a forest to plain text.
pub fn serialize_to_text(forest: &[RichNode], options: &TextOptions) -> String {
    let mut lines = Vec::new();
    for node in forest {
        write_node(node, 0, options, &mut lines);
    }
    lines.join("\n")
}

fn write_node(node: &RichNode, depth: usize, options: &TextOptions, lines: &mut Vec<String>) {
    let indent = options.indent_string.repeat(depth);
    match node.kind() {
        NodeKind::Divider => return,
        NodeKind::Presentation => {
            let text = html_to_plain_text(node.notes.as_deref().unwrap_or_default());
            lines.extend(text.lines().map(|line| format!("{indent}{line}")));
            return;
        }
        NodeKind::CodeBlock { .. } => {
            let decoded = code_block::decode(node.notes.as_deref().unwrap_or_default());
            lines.extend(decoded.lines.iter().map(|line| format!("{indent}{line}")));
            return;
        }
        NodeKind::Header { .. } => {
            let title = node.title.plain_text();
            lines.push(format!("{indent}{}", strip_heading_marker(title.trim())));
        }
        NodeKind::Image if node.title.is_empty() => {
            let alt = node.image_alt().unwrap_or_default();
            lines.extend(
                node.images
                    .iter()
                    .map(|image| format!("{indent}![{alt}]({})", image.url)),
            );
        }
        NodeKind::Image | NodeKind::PlainText => {
            lines.push(format!("{indent}{}", node.title.plain_text()));
        }
    }

    for child in &node.children {
        write_node(child, depth + 1, options, lines);
    }
}

/// Format implementation for the plain-text projection
#[derive(Default)]
pub struct TextFormat {
    options: TextOptions,
}

impl TextFormat {
    pub fn new(options: TextOptions) -> Self {
        Self { options }
    }
}

impl Format for TextFormat {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Indented plain text (clipboard text/plain)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, forest: &[RichNode]) -> Result<String, FormatError> {
        Ok(serialize_to_text(forest, &self.options))
    }

    fn serialize_with_options(
        &self,
        forest: &[RichNode],
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        reject_unknown_options(self.name(), options, &["indent"])?;
        let text_options = match options.get("indent") {
            Some(indent) => TextOptions {
                indent_string: indent.clone(),
            },
            None => self.options.clone(),
        };
        Ok(serialize_to_text(forest, &text_options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::nodes::{StyleAttributes, StyleRun, Title};

    fn sample() -> Vec<RichNode> {
        let bold = StyleAttributes {
            bold: Some(true),
            ..Default::default()
        };
        vec![RichNode::header(1, "Title").with_children(vec![
            RichNode::new(Title::from_runs(vec![
                StyleRun::styled("bold", bold),
                StyleRun::plain(" text"),
            ]))
            .with_children(vec![RichNode::new("child")]),
            RichNode::divider(),
            RichNode::presentation("<p>note one</p><p>note two</p>"),
            RichNode::new("```sh").with_notes(code_block::encode(&["ls -la".to_string()], "sh")),
            RichNode::image("a.png", "An A"),
        ])]
    }

    #[test]
    fn projects_one_line_per_node() {
        assert_eq!(
            serialize_to_text(&sample(), &TextOptions::default()),
            "Title\n\tbold text\n\t\tchild\n\tnote one\n\tnote two\n\tls -la\n\t![An A](a.png)"
        );
    }

    #[test]
    fn custom_indent_string() {
        let options = TextOptions {
            indent_string: "  ".to_string(),
        };
        let forest = vec![RichNode::new("a").with_children(vec![RichNode::new("b")])];
        assert_eq!(serialize_to_text(&forest, &options), "a\n  b");
    }

    #[test]
    fn dividers_are_skipped() {
        let forest = vec![RichNode::divider(), RichNode::new("kept")];
        assert_eq!(serialize_to_text(&forest, &TextOptions::default()), "kept");
    }

    #[test]
    fn parsing_is_not_supported() {
        assert!(matches!(
            TextFormat::default().parse("x"),
            Err(FormatError::NotSupported(_))
        ));
    }
}
