//! Treeviz formatter for outline forests
//!
//! Treeviz is a visual representation of a parsed forest, meant for debugging the Markdown
//! parser: it shows where each line attached without the noise of the JSON form.
//!
//! So the format is :
//! <prefix><connector> <icon><space><label> (truncated to 30 characters)
//!
//! Example:
//!
//! ⧉ Forest (1 roots)
//! └─ § Title
//!   ├─ ¶ Intro paragraph
//!   ├─ • - first item
//!   │ └─ • - nested item
//!   └─ 𝒱 ```rust (3 lines)
//!
//! Icons are shared with the CLI inspect views, see [`super::icons`].
//!
//! # Parameters
//!
//! - `show-indent`: append `[indent N]` to nodes that remember their source indent

use super::icons::get_icon;
use crate::common::code_block;
use crate::common::entities::html_to_plain_text;
use crate::common::indent::{starts_with_list_marker, strip_heading_marker};
use crate::error::FormatError;
use crate::format::Format;
use crate::formats::common::{parse_bool_flag, reject_unknown_options};
use crate::tree::{NodeKind, RichNode};
use std::collections::HashMap;

const MAX_LABEL_CHARS: usize = 30;

fn format_node(
    node: &RichNode,
    prefix: &str,
    child_index: usize,
    child_count: usize,
    show_indent: bool,
) -> String {
    let is_last = child_index == child_count - 1;
    let connector = if is_last { "└─" } else { "├─" };
    let (icon_name, label) = describe(node);

    let mut output = format!(
        "{}{} {} {}",
        prefix,
        connector,
        get_icon(icon_name),
        truncate_label(&label)
    );
    if show_indent {
        if let Some(indent) = node.original_indent {
            output.push_str(&format!(" [indent {indent}]"));
        }
    }
    output.push('\n');

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    output + &format_children(&node.children, &child_prefix, show_indent)
}

fn format_children(children: &[RichNode], prefix: &str, show_indent: bool) -> String {
    children
        .iter()
        .enumerate()
        .map(|(i, child)| format_node(child, prefix, i, children.len(), show_indent))
        .collect()
}

/// Icon name and label for a node.
fn describe(node: &RichNode) -> (&'static str, String) {
    match node.kind() {
        NodeKind::Header { .. } => {
            let title = node.title.plain_text();
            ("Header", strip_heading_marker(title.trim()).to_string())
        }
        NodeKind::CodeBlock { language } => {
            let decoded = code_block::decode(node.notes.as_deref().unwrap_or_default());
            let language = if language.is_empty() {
                decoded.language
            } else {
                language
            };
            (
                "CodeBlock",
                format!("```{} ({} lines)", language, decoded.lines.len()),
            )
        }
        NodeKind::Divider => ("Divider", "---".to_string()),
        NodeKind::Image => {
            let label = node
                .images
                .first()
                .map(|image| image.url.clone())
                .unwrap_or_else(|| node.title.plain_text());
            ("Image", label)
        }
        NodeKind::Presentation => {
            let text = html_to_plain_text(node.notes.as_deref().unwrap_or_default());
            let first = text.lines().next().unwrap_or_default().to_string();
            ("Presentation", first)
        }
        NodeKind::PlainText => {
            let title = node.title.plain_text();
            if starts_with_list_marker(title.trim_start()) {
                ("ListItem", title.trim().to_string())
            } else {
                ("PlainText", title.trim().to_string())
            }
        }
    }
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        return label.to_string();
    }
    let kept: String = label.chars().take(MAX_LABEL_CHARS).collect();
    format!("{kept}…")
}

pub fn to_treeviz_str(forest: &[RichNode]) -> String {
    render(forest, false)
}

/// Convert a forest to a treeviz string with optional parameters
///
/// # Parameters
///
/// - `"show-indent"`: when `"true"`, list nodes carry their source indent level
pub fn to_treeviz_str_with_params(
    forest: &[RichNode],
    params: &HashMap<String, String>,
) -> Result<String, FormatError> {
    reject_unknown_options("treeviz", params, &["show-indent"])?;
    let show_indent = parse_bool_flag(params, "show-indent", false)?;
    Ok(render(forest, show_indent))
}

fn render(forest: &[RichNode], show_indent: bool) -> String {
    let header = format!("{} Forest ({} roots)\n", get_icon("Forest"), forest.len());
    header + &format_children(forest, "", show_indent)
}

/// Format implementation for treeviz format
pub struct TreevizFormat;

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Visual tree representation with box connectors and Unicode icons"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tree", "treeviz"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, forest: &[RichNode]) -> Result<String, FormatError> {
        Ok(to_treeviz_str(forest))
    }

    fn serialize_with_options(
        &self,
        forest: &[RichNode],
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        to_treeviz_str_with_params(forest, options)
    }
}
