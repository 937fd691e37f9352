//! Indentation and line classification.
//!
//! Markdown lines are measured in indent levels: tabs expand to [`TAB_WIDTH`] columns and the
//! total width is floor-divided by the same width. Output always uses one tab per level.

use once_cell::sync::Lazy;
use regex::Regex;

pub const TAB_WIDTH: usize = 4;

static HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+").unwrap());
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([-*+]|\d+\.)\s+").unwrap());
static THEMATIC_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:-{3,}|\*{3,}|_{3,})$").unwrap());
static FENCE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```([\w+#.-]*)$").unwrap());

/// Code fence delimiter.
pub const FENCE: &str = "```";

/// Dash-like glyphs that disqualify a line from being a list item.
///
/// Prose such as `3. Explore — details` would otherwise read as an ordered list item. This is a
/// narrow patch for that pattern, not a general punctuation rule.
const LIST_EXCLUDED_GLYPHS: [char; 3] = ['\u{2014}', '\u{2013}', '\u{2015}'];

/// A classified Markdown line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClass {
    /// The line without surrounding whitespace.
    pub content: String,
    pub level: usize,
    pub is_header: bool,
    pub is_list: bool,
}

/// Indent level of a run of leading whitespace.
pub fn indent_level_of(raw_indent: &str) -> usize {
    let width: usize = raw_indent
        .chars()
        .map(|ch| match ch {
            '\t' => TAB_WIDTH,
            ' ' => 1,
            _ => 0,
        })
        .sum();
    width / TAB_WIDTH
}

/// Render an indent level as tabs.
pub fn render_indent(level: usize) -> String {
    "\t".repeat(level)
}

/// The leading whitespace of a line.
pub fn leading_whitespace(line: &str) -> &str {
    let end = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..end]
}

pub fn classify_line(raw_line: &str) -> LineClass {
    let content = raw_line.trim().to_string();
    let level = indent_level_of(leading_whitespace(raw_line));
    let is_header = HEADER.is_match(&content);
    let is_list = !is_header
        && LIST_ITEM.is_match(raw_line)
        && !raw_line.contains(LIST_EXCLUDED_GLYPHS);

    LineClass {
        content,
        level,
        is_header,
        is_list,
    }
}

/// Heading level of a trimmed line, if it is an ATX heading.
pub fn heading_level(content: &str) -> Option<u8> {
    HEADER
        .captures(content)
        .map(|caps| caps[1].len() as u8)
}

/// Text of a heading line without its `#` marker.
pub fn strip_heading_marker(content: &str) -> &str {
    match HEADER.find(content) {
        Some(found) => &content[found.end()..],
        None => content,
    }
}

/// Split a trimmed list line into its marker (`-`, `*`, `+`, `N.`) and the remaining text.
pub fn split_list_marker(content: &str) -> Option<(&str, &str)> {
    let caps = LIST_ITEM.captures(content)?;
    let marker = caps.get(1)?.as_str();
    let rest = &content[caps.get(0)?.end()..];
    Some((marker, rest))
}

/// Whether a title or line starts with a list marker.
pub fn starts_with_list_marker(content: &str) -> bool {
    LIST_ITEM.is_match(content)
}

pub fn is_thematic_break(content: &str) -> bool {
    THEMATIC_BREAK.is_match(content)
}

/// Language of an opening code fence (possibly empty), or `None` if the trimmed line does not open
/// one. A fence followed by anything but a language tag, such as ```` ```js run ````, is prose.
pub fn fence_language(content: &str) -> Option<&str> {
    FENCE_OPEN
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|language| language.as_str())
}

/// Whether `line` opens (outside code) or closes (inside code) a fence.
pub fn toggles_fence(line: &str, in_fence: bool) -> bool {
    let trimmed = line.trim();
    if in_fence {
        trimmed == FENCE
    } else {
        fence_language(trimmed).is_some()
    }
}
