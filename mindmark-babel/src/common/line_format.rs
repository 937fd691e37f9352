//! Line-format preserver
//!
//! The tree does not store blank lines, so a serialized document loses the spacing of the
//! Markdown it was parsed from. [`reconcile`] walks the original document and re-inserts the
//! blank lines that carry meaning next to the freshly serialized lines:
//!
//! - a blank next to a heading;
//! - a blank between two list items;
//! - a blank between two paragraphs.
//!
//! This is a heuristic alignment, not a diff. It assumes both documents list their non-blank
//! lines in the same order; when they do not, the remaining fresh lines are appended unchanged.

use super::indent::{classify_line, toggles_fence};

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineShape {
    Heading,
    List,
    Paragraph,
}

fn shape_of(line: &str) -> LineShape {
    let class = classify_line(line);
    if class.is_header {
        LineShape::Heading
    } else if class.is_list {
        LineShape::List
    } else {
        LineShape::Paragraph
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Whether `line` opens an HTML comment, and if so whether the comment stays open after it.
fn comment_opening(line: &str) -> Option<bool> {
    let after_open = line.trim_start().strip_prefix(COMMENT_OPEN)?;
    Some(!after_open.contains(COMMENT_CLOSE))
}

/// Whether the blank original line at `index` should survive into the output.
fn is_preservable(lines: &[&str], index: usize) -> bool {
    let before = lines[..index].iter().rev().find(|line| !is_blank(line));
    let after = lines[index + 1..].iter().find(|line| !is_blank(line));
    let (Some(before), Some(after)) = (before, after) else {
        return false;
    };

    match (shape_of(before), shape_of(after)) {
        (LineShape::Heading, _) | (_, LineShape::Heading) => true,
        (LineShape::List, LineShape::List) => true,
        (LineShape::Paragraph, LineShape::Paragraph) => true,
        _ => false,
    }
}

/// Output buffer that tracks code fences and comments so their contents pass through untouched.
#[derive(Default)]
struct Output {
    lines: Vec<String>,
    in_fence: bool,
    in_comment: bool,
}

impl Output {
    fn ends_blank(&self) -> bool {
        self.lines.last().map_or(true, |line| line.is_empty())
    }

    /// Restore a blank line from the original document.
    fn push_blank(&mut self) {
        if !self.in_fence && !self.in_comment && !self.ends_blank() {
            self.lines.push(String::new());
        }
    }

    fn push_line(&mut self, line: &str) {
        if self.in_comment {
            self.in_comment = !line.contains(COMMENT_CLOSE);
        } else if toggles_fence(line, self.in_fence) {
            self.in_fence = !self.in_fence;
        } else if !self.in_fence {
            self.in_comment = comment_opening(line).unwrap_or(false);
        }
        self.lines.push(line.to_string());
    }

    fn push_fresh(&mut self, line: &str) {
        if !is_blank(line) {
            self.push_line(line);
        } else if self.in_fence || self.in_comment || !self.ends_blank() {
            self.lines.push(String::new());
        }
    }

    fn finish(mut self) -> String {
        while self.lines.last().is_some_and(|line| line.is_empty()) {
            self.lines.pop();
        }
        self.lines.join("\n")
    }
}

/// Re-insert the original document's meaningful blank lines into freshly serialized Markdown.
///
/// A comment is matched as a whole: the serializer always spreads it over several lines, while
/// the original may hold it on one.
pub fn reconcile(original: &str, fresh: &str) -> String {
    let original_lines: Vec<&str> = original.lines().collect();
    let fresh_lines: Vec<&str> = fresh.lines().collect();

    let mut output = Output::default();
    let mut cursor = 0;
    let mut original_in_fence = false;
    let mut original_in_comment = false;

    for (index, line) in original_lines.iter().enumerate() {
        if original_in_comment {
            original_in_comment = !line.contains(COMMENT_CLOSE);
            continue;
        }

        if is_blank(line) {
            // Blank lines inside code come through with the fresh code block.
            if !original_in_fence && is_preservable(&original_lines, index) {
                output.push_blank();
            }
            continue;
        }

        if toggles_fence(line, original_in_fence) {
            original_in_fence = !original_in_fence;
        } else if !original_in_fence {
            original_in_comment = comment_opening(line).unwrap_or(false);
        }

        // Take fresh lines up to and including the next non-blank one, then the rest of its
        // comment if it opens one.
        while let Some(fresh_line) = fresh_lines.get(cursor) {
            cursor += 1;
            output.push_fresh(fresh_line);
            if !is_blank(fresh_line) && !output.in_comment {
                break;
            }
        }
    }

    for fresh_line in &fresh_lines[cursor.min(fresh_lines.len())..] {
        output.push_fresh(fresh_line);
    }

    output.finish()
}
