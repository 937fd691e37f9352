//! Markdown serialization (tree → Markdown export)
//!
//! Depth-first walk over the forest. Every node is dispatched on its kind and emits whole lines;
//! the render context carries the heading depth, the list indentation and whether children of a
//! plain node are being written as list items.

use crate::common::code_block::to_fenced_markdown;
use crate::common::entities::html_to_plain_text;
use crate::common::indent::{
    heading_level, render_indent, starts_with_list_marker, strip_heading_marker, toggles_fence,
    FENCE,
};
use crate::common::line_format;
use crate::common::style::render_runs;
use crate::error::FormatError;
use crate::tree::nodes::{NodeKind, RichNode, StyleRun, Title};
use tracing::{debug, trace};

const MAX_HEADING_LEVEL: usize = 6;
const DEFAULT_IMAGE_ALT: &str = "image";

/// Options for Markdown export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Heading level used for root headers (1..=6).
    pub start_header_level: usize,
    /// Re-insert the original document's blank lines when an original is supplied.
    pub preserve_line_format: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        MarkdownOptions {
            start_header_level: 1,
            preserve_line_format: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RenderContext {
    depth: usize,
    indent: usize,
    list_item: bool,
}

/// Serialize a forest to Markdown.
///
/// `original` is the Markdown the forest was parsed from, if known. With
/// [`MarkdownOptions::preserve_line_format`] set, its blank-line layout is carried over.
pub fn serialize_to_markdown(
    forest: &[RichNode],
    original: Option<&str>,
    options: &MarkdownOptions,
) -> Result<String, FormatError> {
    if !(1..=MAX_HEADING_LEVEL).contains(&options.start_header_level) {
        return Err(FormatError::SerializationError(format!(
            "start header level must be between 1 and {MAX_HEADING_LEVEL}, got {}",
            options.start_header_level
        )));
    }

    debug!(roots = forest.len(), "serializing forest to markdown");

    let mut writer = MarkdownWriter::default();
    let context = RenderContext {
        depth: options.start_header_level,
        indent: 0,
        list_item: false,
    };
    for node in forest {
        writer.write_node(node, context);
    }
    let fresh = writer.finish();

    let markdown = match original {
        Some(original) if options.preserve_line_format && !original.trim().is_empty() => {
            trace!("reconciling blank lines against original markdown");
            line_format::reconcile(original, &fresh)
        }
        _ => fresh,
    };

    debug!(bytes = markdown.len(), "markdown serialization finished");
    Ok(markdown)
}

#[derive(Default)]
struct MarkdownWriter {
    lines: Vec<String>,
}

impl MarkdownWriter {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn write_node(&mut self, node: &RichNode, context: RenderContext) {
        match node.kind() {
            NodeKind::Presentation => self.write_presentation(node),
            NodeKind::Header { .. } => self.write_header(node, context),
            NodeKind::CodeBlock { language } => self.write_code_block(node, &language),
            NodeKind::Divider => {
                self.blank();
                self.push("---");
                self.blank();
            }
            NodeKind::Image => self.write_image(node, context),
            NodeKind::PlainText => self.write_plain(node, context),
        }
    }

    fn write_presentation(&mut self, node: &RichNode) {
        self.push("<!--");
        let text = html_to_plain_text(node.notes.as_deref().unwrap_or_default());
        for line in text.lines() {
            self.push(line);
        }
        self.push("-->");
    }

    fn write_header(&mut self, node: &RichNode, context: RenderContext) {
        let level = context.depth.min(MAX_HEADING_LEVEL);
        let title = render_runs(&heading_runs(&node.title));
        self.push(format!("{} {}", "#".repeat(level), title.trim()));

        let child_context = RenderContext {
            depth: context.depth + 1,
            indent: 0,
            list_item: false,
        };
        for child in &node.children {
            self.write_node(child, child_context);
        }
    }

    fn write_code_block(&mut self, node: &RichNode, language: &str) {
        let payload = node.notes.as_deref().unwrap_or_default();
        let language = language.trim_start_matches(FENCE).trim();
        self.blank();
        for line in to_fenced_markdown(payload, language).lines() {
            self.push(line);
        }
        self.blank();
    }

    fn write_image(&mut self, node: &RichNode, context: RenderContext) {
        let indent = render_indent(context.indent);
        if !node.title.is_empty() {
            self.push(format!("{indent}{}", render_runs(&node.title.runs())));
        }

        let alt = node
            .image_alt()
            .filter(|alt| !alt.is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_ALT.to_string());
        for image in &node.images {
            self.push(format!("{indent}![{alt}]({})", image.url));
        }

        self.write_list_children(node, context.depth, context.indent);
    }

    fn write_plain(&mut self, node: &RichNode, context: RenderContext) {
        let plain = node.title.plain_text();
        let has_marker = starts_with_list_marker(&plain);
        let is_list = context.list_item || has_marker;

        let indent = if is_list {
            node.original_indent.unwrap_or(context.indent)
        } else {
            context.indent
        };
        let prefix = if context.list_item && !has_marker {
            "- "
        } else {
            ""
        };

        trace!(indent, is_list, "plain node");
        self.push(format!(
            "{}{prefix}{}",
            render_indent(indent),
            render_runs(&node.title.runs())
        ));

        self.write_list_children(node, context.depth, indent);
    }

    fn write_list_children(&mut self, node: &RichNode, depth: usize, indent: usize) {
        let child_context = RenderContext {
            depth: depth + 1,
            indent: indent + 1,
            list_item: true,
        };
        for child in &node.children {
            self.write_node(child, child_context);
        }
    }

    /// Join the lines, dropping repeated blank lines outside code fences and trimming the ends.
    fn finish(self) -> String {
        let mut out: Vec<String> = Vec::with_capacity(self.lines.len());
        let mut in_fence = false;
        for line in self.lines {
            if toggles_fence(&line, in_fence) {
                in_fence = !in_fence;
            }
            let blank = line.trim().is_empty();
            if blank && !in_fence && out.last().map_or(true, |last| last.trim().is_empty()) {
                continue;
            }
            out.push(line);
        }
        while out.last().is_some_and(|last| last.trim().is_empty()) {
            out.pop();
        }
        out.join("\n")
    }
}

/// Title runs with any leading `#` marker removed.
fn heading_runs(title: &Title) -> Vec<StyleRun> {
    let mut runs = title.runs();
    if let Some(first) = runs.first_mut() {
        let trimmed = first.text.trim_start();
        if heading_level(trimmed).is_some() {
            first.text = strip_heading_marker(trimmed).to_string();
        }
    }
    runs.retain(|run| !run.text.is_empty());
    runs
}
