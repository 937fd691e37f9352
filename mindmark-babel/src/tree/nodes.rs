//! Core data structures for the mind-map outline tree.
//!
//! A document is a forest: an ordered list of root [`RichNode`]s. Every node owns its children,
//! so the structure can never contain cycles.

use crate::common::code_block;
use crate::common::entities::{escape_html, html_to_plain_text};
use crate::common::indent;
use serde::{Deserialize, Serialize};

/// Placeholder dimension used for image descriptors created from Markdown.
pub const DEFAULT_IMAGE_SIZE: u32 = 100;

/// Marker used inside a node's notes to carry an image's alt text.
pub const IMAGE_ALT_MARKER: &str = "Image Alt:";

/// One outline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichNode {
    #[serde(alias = "text", default)]
    pub title: Title,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    #[serde(default)]
    pub children: Vec<RichNode>,
    #[serde(alias = "note", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_indent: Option<usize>,
}

/// The structural role of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    Header { level: u8 },
    Divider,
    CodeBlock { language: String },
    Image,
    Presentation,
    PlainText,
}

/// A node title: plain text or a sequence of styled runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Title {
    Plain(String),
    Styled(StyledText),
}

/// Ordered style runs making up a title.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyledText {
    pub runs: Vec<StyleRun>,
}

/// A contiguous span of text sharing one style combination.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleRun {
    pub text: String,
    #[serde(flatten)]
    pub style: StyleAttributes,
}

/// Inline style flags of a run.
///
/// Every field is optional so that attribute sets can be layered: [`StyleAttributes::merge`]
/// lets set fields of the overlay win while unset fields inherit from the base.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monospace: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// An image attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub url: String,
    #[serde(default = "default_image_size")]
    pub width: u32,
    #[serde(default = "default_image_size")]
    pub height: u32,
}

fn default_image_size() -> u32 {
    DEFAULT_IMAGE_SIZE
}

impl ImageDescriptor {
    pub fn new(url: impl Into<String>) -> Self {
        ImageDescriptor {
            url: url.into(),
            width: DEFAULT_IMAGE_SIZE,
            height: DEFAULT_IMAGE_SIZE,
        }
    }
}

impl StyleAttributes {
    /// Layer `overlay` on top of `self`. Fields set in the overlay win.
    pub fn merge(&self, overlay: &StyleAttributes) -> StyleAttributes {
        StyleAttributes {
            bold: overlay.bold.or(self.bold),
            italic: overlay.italic.or(self.italic),
            strike: overlay.strike.or(self.strike),
            highlight: overlay.highlight.or(self.highlight),
            underline: overlay.underline.or(self.underline),
            monospace: overlay.monospace.or(self.monospace),
            color: overlay.color.clone().or_else(|| self.color.clone()),
        }
    }

    pub fn is_bold(&self) -> bool {
        self.bold.unwrap_or(false)
    }

    pub fn is_italic(&self) -> bool {
        self.italic.unwrap_or(false)
    }

    pub fn is_strike(&self) -> bool {
        self.strike.unwrap_or(false)
    }

    pub fn is_highlight(&self) -> bool {
        self.highlight.unwrap_or(false)
    }

    pub fn is_underline(&self) -> bool {
        self.underline.unwrap_or(false)
    }

    pub fn is_monospace(&self) -> bool {
        self.monospace.unwrap_or(false)
    }

    /// True when no attribute changes the rendering of the text.
    pub fn is_plain(&self) -> bool {
        !self.is_bold()
            && !self.is_italic()
            && !self.is_strike()
            && !self.is_highlight()
            && !self.is_underline()
            && !self.is_monospace()
            && self.color.is_none()
    }

    /// Compare by effective rendering (unset and `false` are equal).
    pub fn renders_like(&self, other: &StyleAttributes) -> bool {
        self.is_bold() == other.is_bold()
            && self.is_italic() == other.is_italic()
            && self.is_strike() == other.is_strike()
            && self.is_highlight() == other.is_highlight()
            && self.is_underline() == other.is_underline()
            && self.is_monospace() == other.is_monospace()
            && self.color == other.color
    }
}

impl StyleRun {
    pub fn plain(text: impl Into<String>) -> Self {
        StyleRun {
            text: text.into(),
            style: StyleAttributes::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: StyleAttributes) -> Self {
        StyleRun {
            text: text.into(),
            style,
        }
    }
}

impl Default for Title {
    fn default() -> Self {
        Title::Plain(String::new())
    }
}

impl From<&str> for Title {
    fn from(text: &str) -> Self {
        Title::Plain(text.to_string())
    }
}

impl From<String> for Title {
    fn from(text: String) -> Self {
        Title::Plain(text)
    }
}

impl Title {
    /// Build a title from runs, collapsing to plain text when nothing is styled.
    pub fn from_runs(runs: Vec<StyleRun>) -> Self {
        if runs.iter().all(|run| run.style.is_plain()) {
            Title::Plain(runs.into_iter().map(|run| run.text).collect())
        } else {
            Title::Styled(StyledText { runs })
        }
    }

    /// The title's text with all styling removed.
    pub fn plain_text(&self) -> String {
        match self {
            Title::Plain(text) => text.clone(),
            Title::Styled(styled) => styled.runs.iter().map(|run| run.text.as_str()).collect(),
        }
    }

    /// The title as runs; a plain title is a single unstyled run.
    pub fn runs(&self) -> Vec<StyleRun> {
        match self {
            Title::Plain(text) => vec![StyleRun::plain(text.clone())],
            Title::Styled(styled) => styled.runs.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.plain_text().is_empty()
    }
}

impl RichNode {
    pub fn new(title: impl Into<Title>) -> Self {
        RichNode {
            title: title.into(),
            kind: None,
            children: Vec::new(),
            notes: None,
            images: Vec::new(),
            original_indent: None,
        }
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_children(mut self, children: Vec<RichNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_original_indent(mut self, indent: usize) -> Self {
        self.original_indent = Some(indent);
        self
    }

    pub fn header(level: u8, title: impl Into<Title>) -> Self {
        RichNode::new(title).with_kind(NodeKind::Header { level })
    }

    pub fn divider() -> Self {
        RichNode::new("---").with_kind(NodeKind::Divider)
    }

    pub fn presentation(notes: impl Into<String>) -> Self {
        RichNode::new("")
            .with_kind(NodeKind::Presentation)
            .with_notes(notes)
    }

    pub fn image(url: impl Into<String>, alt: &str) -> Self {
        let mut node = RichNode::new("")
            .with_kind(NodeKind::Image)
            .with_notes(format!("<p>{IMAGE_ALT_MARKER} {}</p>", escape_html(alt)));
        node.images.push(ImageDescriptor::new(url));
        node
    }

    /// The stored kind, or the kind derived from the node's content.
    pub fn kind(&self) -> NodeKind {
        if let Some(kind) = &self.kind {
            return kind.clone();
        }

        let text = self.title.plain_text();
        let trimmed = text.trim();
        if let Some(level) = indent::heading_level(trimmed) {
            return NodeKind::Header { level };
        }
        if indent::is_thematic_break(trimmed) {
            return NodeKind::Divider;
        }
        if let Some(language) = trimmed.strip_prefix("```") {
            return NodeKind::CodeBlock {
                language: language.trim().to_string(),
            };
        }
        if let Some(language) = self.notes.as_deref().and_then(code_block::payload_language) {
            return NodeKind::CodeBlock { language };
        }
        if !self.images.is_empty() {
            return NodeKind::Image;
        }
        NodeKind::PlainText
    }

    /// Alt text carried in the notes, if any.
    pub fn image_alt(&self) -> Option<String> {
        let notes = self.notes.as_deref()?;
        let plain = html_to_plain_text(notes);
        plain.lines().find_map(|line| {
            line.trim()
                .strip_prefix(IMAGE_ALT_MARKER)
                .map(|alt| alt.trim().to_string())
        })
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(RichNode::count).sum::<usize>()
    }
}
