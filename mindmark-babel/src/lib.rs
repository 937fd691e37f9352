//! Conversion between mind-map outline trees and Markdown
//!
//!     This crate converts a mind map's rich tree (a forest of styled outline nodes) to and from
//!     Markdown, and carries the tree across the clipboard and JSON boundaries around it.
//!
//! Architecture
//!
//!     Everything goes through the forest (./tree/nodes.rs). Formats read into it and write out
//!     of it, and the logic shared by several formats lives in ./common. The Markdown format is
//!     the only one with real structure work; JSON, clipboard HTML, plain text and treeviz are
//!     thin views over the same forest.
//!
//!     This is a pure lib, that is, it powers mindmark-cli but is shell agnostic: no code here
//!     prints, reads env vars or touches the filesystem. It emits `tracing` events and never
//!     installs a subscriber.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── tree                    # RichNode forest and its JSON boundary
//!     ├── formats
//!     │   ├── markdown
//!     │   │   ├── parser.rs       # Markdown → forest
//!     │   │   ├── serializer.rs   # forest → Markdown
//!     │   │   └── mod.rs
//!     │   ├── json, clipboard, text, treeviz
//!     │   └── common              # Option parsing shared by formats
//!     ├── common                  # Indent model, style and code-block codecs, line format
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     └── <area>
//!         ├── <testname>.rs
//!         └── fixtures
//!
//!     Rust does not discover tests in subdirectories by default, so tests/lib.rs includes them.
//!
//! Core Algorithms
//!
//!     Markdown → tree is a line scanner with a parent-search stack: headings nest by level, lists
//!     and paragraphs nest by indent, code blocks attach to the enclosing heading. Inline styling
//!     goes through comrak's inline parser and a style stack (./common/style.rs).
//!
//!     Tree → Markdown walks the forest with a small render context (depth, indent, list item),
//!     and can restore the blank lines of the Markdown the forest came from
//!     (./common/line_format.rs).
//!
//!     Neither direction is lossless. Blank lines are not stored, heading levels follow tree
//!     depth, and inline code is kept as literal text.
//!
//! Library Choices
//!
//!     comrak tokenizes inline Markdown, html5ever parses and writes clipboard HTML, serde_json
//!     handles the tree JSON. Block structure is ours, since the outline is exactly what a
//!     CommonMark block parser would normalize away.
//!
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;

pub mod common;
pub mod tree;

pub use error::FormatError;
pub use format::Format;
pub use formats::{MarkdownOptions, TextOptions};
pub use registry::FormatRegistry;
pub use tree::{ImageDescriptor, NodeKind, RichNode, StyleAttributes, StyleRun, StyledText, Title};

/// Parses Markdown into a forest.
///
/// Never fails on content: any text yields some forest.
pub fn markdown_to_tree(markdown: &str) -> Result<Vec<RichNode>, FormatError> {
    formats::markdown::parse_from_markdown(markdown)
}

/// Renders a forest as Markdown.
///
/// When `original` holds the Markdown the forest was parsed from and
/// `options.preserve_line_format` is set, its blank-line layout is restored.
pub fn tree_to_markdown(
    forest: &[RichNode],
    original: Option<&str>,
    options: &MarkdownOptions,
) -> Result<String, FormatError> {
    formats::markdown::serialize_to_markdown(forest, original, options)
}

/// Projects a forest to indented plain text.
pub fn tree_to_plain_text(forest: &[RichNode], options: &TextOptions) -> String {
    formats::text::serialize_to_text(forest, options)
}

/// Reads the forest carried by clipboard HTML.
pub fn clipboard_html_to_tree(html: &str) -> Result<Vec<RichNode>, FormatError> {
    formats::clipboard::forest_from_clipboard_html(html)
}

/// Wraps a forest in clipboard HTML.
pub fn tree_to_clipboard_html(forest: &[RichNode]) -> Result<String, FormatError> {
    formats::clipboard::forest_to_clipboard_html(forest)
}
