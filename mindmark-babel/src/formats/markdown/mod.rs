//! Markdown format implementation
//!
//! This module implements bidirectional conversion between outline forests and Markdown.
//!
//! # Library Choice
//!
//! Block structure is handled line by line here: the outline is defined by heading levels and
//! list indentation, which a CommonMark block parser would normalize away. Inline content goes
//! through `comrak` (see `common::inline`), so emphasis, strikethrough, code spans and raw HTML
//! follow CommonMark rules.
//!
//! # Element Mapping Table
//!
//! | Node kind     | Markdown                     | Export Notes                          | Import Notes                             |
//! |---------------|------------------------------|---------------------------------------|------------------------------------------|
//! | Header        | `#` … `######`               | Level from tree depth, clamped at 6   | Nests under shallower headings           |
//! | PlainText     | Paragraph or list item       | `- ` added for children of plain nodes| List marker kept as a leading plain run  |
//! | CodeBlock     | Fenced block (```` ```lang ````) | Blank-padded, column 0            | Attaches to the enclosing header         |
//! | Divider       | `---`                        | Blank-padded                          | Never a parent                           |
//! | Image         | `![alt](url)`                | Alt from `Image Alt:` note marker     | Only a line holding a single image       |
//! | Presentation  | `<!-- … -->`                 | One line per note paragraph           | Attaches to the current frame            |
//! | Inline styles | `**` `*` `~~` `==` `<u>` `<span>` | Fixed nesting order              | Style stack over comrak inline tokens    |
//!
//! # Lossy Conversions
//!
//! - Blank lines are not stored in the tree. Pass the original Markdown to the serializer to
//!   restore them (see `common::line_format`).
//! - Root headings take the configured start level, not their source level.
//! - Plain children of plain nodes become `- ` list items.
//! - Inline code spans are kept as literal text with their backticks.
//!
//! # Parameters
//!
//! - `start-header-level`: level of root headings, 1 to 6 (default 1)
//! - `preserve-line-format`: restore blank lines from `original` (default true)
//! - `original`: the Markdown the forest was parsed from

pub mod parser;
pub mod serializer;

pub use parser::parse_from_markdown;
pub use serializer::{serialize_to_markdown, MarkdownOptions};

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::common::{parse_bool_flag, parse_usize_option, reject_unknown_options};
use crate::tree::RichNode;
use std::collections::HashMap;

/// Format implementation for Markdown
#[derive(Default)]
pub struct MarkdownFormat {
    options: MarkdownOptions,
}

impl MarkdownFormat {
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "Markdown outline (headings, lists, code blocks)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Vec<RichNode>, FormatError> {
        parser::parse_from_markdown(source)
    }

    fn serialize(&self, forest: &[RichNode]) -> Result<String, FormatError> {
        serializer::serialize_to_markdown(forest, None, &self.options)
    }

    fn serialize_with_options(
        &self,
        forest: &[RichNode],
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        reject_unknown_options(
            self.name(),
            options,
            &["start-header-level", "preserve-line-format", "original"],
        )?;

        let markdown_options = MarkdownOptions {
            start_header_level: parse_usize_option(
                options,
                "start-header-level",
                self.options.start_header_level,
            )?,
            preserve_line_format: parse_bool_flag(
                options,
                "preserve-line-format",
                self.options.preserve_line_format,
            )?,
        };
        let original = options.get("original").map(String::as_str);

        serializer::serialize_to_markdown(forest, original, &markdown_options)
    }
}
