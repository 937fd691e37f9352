//! Markdown parsing (Markdown → tree import)
//!
//! Line-oriented state machine. Outside of fenced code and multi-line comments every non-blank
//! line becomes one node, and a stack of open frames decides where it attaches:
//!
//! - a header nests under the closest header of a lower level;
//! - an indented line nests under the closest frame with a smaller indent;
//! - an unindented line nests under a header at the same indent;
//! - a list item nests under a paragraph at the same indent.
//!
//! Frames that match none of these are popped; an empty stack means the node is a root. Two
//! paragraphs at the same indent are siblings.
//!
//! Parsing never fails on content. Heading jumps and indentation mismatches attach to the nearest
//! valid ancestor or to the forest root.

use crate::common::code_block;
use crate::common::entities::escape_html;
use crate::common::indent::{
    classify_line, fence_language, heading_level, is_thematic_break, split_list_marker,
    strip_heading_marker, LineClass, FENCE,
};
use crate::common::style::parse_inline;
use crate::error::FormatError;
use crate::tree::nodes::{NodeKind, RichNode, StyleRun, Title};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

static IMAGE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^!\[([^\]]*)\]\(\s*([^)\s]+)(?:\s+"[^"]*")?\s*\)$"#).unwrap()
});

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Parse Markdown into a forest.
pub fn parse_from_markdown(source: &str) -> Result<Vec<RichNode>, FormatError> {
    debug!(lines = source.lines().count(), "parsing markdown");

    let mut builder = TreeBuilder::default();
    let mut state = LineState::Normal;

    for raw_line in source.lines() {
        state = match state {
            LineState::Normal => builder.normal_line(raw_line),
            LineState::InCodeBlock {
                language,
                mut lines,
            } => {
                if raw_line.trim() == FENCE {
                    trace!(%language, lines = lines.len(), "closing code block");
                    builder.attach_code_block(&language, &lines);
                    LineState::Normal
                } else {
                    lines.push(raw_line.to_string());
                    LineState::InCodeBlock { language, lines }
                }
            }
            LineState::InCommentBlock { mut lines } => match raw_line.find(COMMENT_CLOSE) {
                Some(end) => {
                    let before = raw_line[..end].trim();
                    if !before.is_empty() {
                        lines.push(before.to_string());
                    }
                    builder.attach_presentation(&lines);
                    LineState::Normal
                }
                None => {
                    lines.push(raw_line.trim().to_string());
                    LineState::InCommentBlock { lines }
                }
            },
        };
    }

    // Unterminated blocks are kept rather than dropped.
    match state {
        LineState::Normal => {}
        LineState::InCodeBlock { language, lines } => {
            debug!("code block not closed at end of input");
            builder.attach_code_block(&language, &lines);
        }
        LineState::InCommentBlock { lines } => {
            debug!("comment not closed at end of input");
            builder.attach_presentation(&lines);
        }
    }

    let forest = builder.forest;
    debug!(
        roots = forest.len(),
        nodes = forest.iter().map(RichNode::count).sum::<usize>(),
        "markdown parsed"
    );
    Ok(forest)
}

enum LineState {
    Normal,
    InCodeBlock { language: String, lines: Vec<String> },
    InCommentBlock { lines: Vec<String> },
}

/// An open node that later lines may attach under.
#[derive(Debug, Clone)]
struct ParseStackFrame {
    /// Child indexes from the forest root down to the node.
    path: Vec<usize>,
    indent_level: usize,
    /// Heading level, 0 for non-header nodes.
    header_level: u8,
    /// A plain paragraph (not a list item).
    is_text: bool,
}

#[derive(Default)]
struct TreeBuilder {
    forest: Vec<RichNode>,
    stack: Vec<ParseStackFrame>,
}

impl TreeBuilder {
    fn normal_line(&mut self, raw_line: &str) -> LineState {
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            return LineState::Normal;
        }

        if let Some(language) = fence_language(trimmed) {
            let language = language.to_string();
            trace!(%language, "opening code block");
            return LineState::InCodeBlock {
                language,
                lines: Vec::new(),
            };
        }

        if let Some(after_open) = trimmed.strip_prefix(COMMENT_OPEN) {
            return match after_open.find(COMMENT_CLOSE) {
                Some(end) => {
                    let text = after_open[..end].trim();
                    let lines: Vec<String> = if text.is_empty() {
                        Vec::new()
                    } else {
                        vec![text.to_string()]
                    };
                    self.attach_presentation(&lines);
                    LineState::Normal
                }
                None => {
                    trace!("opening comment block");
                    let text = after_open.trim();
                    let lines = if text.is_empty() {
                        Vec::new()
                    } else {
                        vec![text.to_string()]
                    };
                    LineState::InCommentBlock { lines }
                }
            };
        }

        self.content_line(raw_line);
        LineState::Normal
    }

    fn content_line(&mut self, raw_line: &str) {
        let line = classify_line(raw_line);
        let header = if line.is_header {
            heading_level(&line.content)
        } else {
            None
        };

        let parent = self.find_parent(&line, header);

        if let Some(level) = header {
            let title = Title::from_runs(parse_inline(strip_heading_marker(&line.content)));
            let node = RichNode::header(level, title);
            let path = self.attach(parent.as_deref(), node);
            self.stack.push(ParseStackFrame {
                path,
                indent_level: line.level,
                header_level: level,
                is_text: false,
            });
            return;
        }

        if is_thematic_break(&line.content) {
            // Dividers attach but never become parents.
            self.attach(parent.as_deref(), RichNode::divider());
            return;
        }

        let node = match IMAGE_LINE.captures(&line.content) {
            Some(caps) => RichNode::image(&caps[2], &caps[1]),
            None => plain_node(&line),
        };
        let is_text = !line.is_list && node.kind() == NodeKind::PlainText;
        let path = self.attach(parent.as_deref(), node);
        self.stack.push(ParseStackFrame {
            path,
            indent_level: line.level,
            header_level: 0,
            is_text,
        });
    }

    /// Pop frames until the top one can parent `line`.
    fn find_parent(&mut self, line: &LineClass, header: Option<u8>) -> Option<Vec<usize>> {
        while let Some(top) = self.stack.last() {
            let top_is_header = top.header_level > 0;
            let stop = match header {
                Some(level) => top_is_header && top.header_level < level,
                None => {
                    top.indent_level < line.level
                        || (top.indent_level == line.level && top_is_header)
                        || (line.is_list && top.indent_level == line.level && top.is_text)
                }
            };
            if stop {
                trace!(path = ?top.path, "parent found");
                return Some(top.path.clone());
            }
            self.stack.pop();
        }
        trace!("no parent, attaching at root");
        None
    }

    /// Attach a node under `parent` (or at the root) and return its path.
    fn attach(&mut self, parent: Option<&[usize]>, node: RichNode) -> Vec<usize> {
        if let Some(path) = parent {
            if let Some(parent_node) = node_at_mut(&mut self.forest, path) {
                parent_node.children.push(node);
                let mut child_path = path.to_vec();
                child_path.push(parent_node.children.len() - 1);
                return child_path;
            }
        }
        self.forest.push(node);
        vec![self.forest.len() - 1]
    }

    /// Code blocks belong to the enclosing section, not to the list item before them.
    fn attach_code_block(&mut self, language: &str, lines: &[String]) {
        let node = RichNode::new(format!("{FENCE}{language}"))
            .with_kind(NodeKind::CodeBlock {
                language: language.to_string(),
            })
            .with_notes(code_block::encode(lines, language));

        match self.stack.iter().rposition(|frame| frame.header_level > 0) {
            Some(index) => {
                self.stack.truncate(index + 1);
                let path = self.stack[index].path.clone();
                self.attach(Some(&path), node);
            }
            None => {
                self.stack.clear();
                self.attach(None, node);
            }
        }
    }

    fn attach_presentation(&mut self, lines: &[String]) {
        let notes = lines
            .iter()
            .map(|line| format!("<p>{}</p>", escape_html(line)))
            .collect::<Vec<_>>()
            .join("\n");
        let parent = self.stack.last().map(|frame| frame.path.clone());
        self.attach(parent.as_deref(), RichNode::presentation(notes));
    }
}

fn node_at_mut<'a>(forest: &'a mut [RichNode], path: &[usize]) -> Option<&'a mut RichNode> {
    let (first, rest) = path.split_first()?;
    let mut node = forest.get_mut(*first)?;
    for index in rest {
        node = node.children.get_mut(*index)?;
    }
    Some(node)
}

/// A paragraph or list item. List markers are kept as a leading plain run.
fn plain_node(line: &LineClass) -> RichNode {
    let runs = match split_list_marker(&line.content).filter(|_| line.is_list) {
        Some((marker, rest)) => {
            let mut runs = vec![StyleRun::plain(format!("{marker} "))];
            runs.extend(parse_inline(rest));
            runs
        }
        None => parse_inline(&line.content),
    };

    let mut node = RichNode::new(Title::from_runs(runs)).with_original_indent(line.level);
    // Text that merely looks like another kind (e.g. "```js run") stays plain.
    if node.kind() != NodeKind::PlainText {
        node.kind = Some(NodeKind::PlainText);
    }
    node
}
