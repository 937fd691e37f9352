//! Inline tokenizer adapter (Markdown inline → flat token stream)
//!
//! comrak parses a single line of inline Markdown into an AST. The style codec does not walk that
//! AST directly; it consumes the flat open/close token stream produced here, which keeps the
//! style stack logic independent of comrak's node types.
//!
//! comrak has no highlight syntax, so `==` pairs are recognised inside text nodes. A trailing
//! unmatched `==` is turned back into literal text.
//!
//! Backslash escapes and character references are kept as written. comrak would decode them,
//! and the decoded text no longer reads the same when it is written back out.

use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const HIGHLIGHT_MARKER: &str = "==";

static ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\([!-/:-@\[-`{-~])").unwrap());
static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]{1,7};|#[xX][0-9a-fA-F]{1,6};|[A-Za-z][A-Za-z0-9]{1,31};)").unwrap()
});

/// Private-use stand-ins: `\X` becomes `ESCAPE_BASE + X`, a reference's `&` becomes `ENTITY_MARK`.
const ESCAPE_BASE: u32 = 0xE000;
const ENTITY_MARK: char = '\u{E100}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Text,
    StrongOpen,
    StrongClose,
    EmOpen,
    EmClose,
    StrikeOpen,
    StrikeClose,
    HighlightOpen,
    HighlightClose,
    /// `content` carries the link target.
    LinkOpen,
    LinkClose,
    /// `content` carries the code span including its backticks.
    CodeInline,
    HtmlInline,
    /// A node with no dedicated token; its children are in `children`.
    Container,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineToken {
    pub kind: TokenKind,
    pub content: String,
    pub children: Vec<InlineToken>,
}

impl InlineToken {
    pub fn new(kind: TokenKind, content: impl Into<String>) -> Self {
        InlineToken {
            kind,
            content: content.into(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        InlineToken::new(TokenKind::Text, content)
    }

    fn marker(kind: TokenKind) -> Self {
        InlineToken::new(kind, "")
    }
}

fn inline_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.strikethrough = true;
    options
}

/// Tokenize one line of inline Markdown.
///
/// If the line does not read as a paragraph (comrak sees a block construct such as a list, a
/// quote or raw HTML block), the whole line is returned as a single text token.
pub fn tokenize_inline(line: &str) -> Vec<InlineToken> {
    if line.is_empty() {
        return Vec::new();
    }

    let protected = protect(line);
    let source = protected.as_deref().unwrap_or(line);

    let arena = Arena::new();
    let options = inline_comrak_options();
    let root = parse_document(&arena, source, &options);

    let paragraph = match root.first_child() {
        Some(first) if matches!(first.data.borrow().value, NodeValue::Paragraph) => first,
        _ => return vec![InlineToken::text(line)],
    };

    let mut tokenizer = Tokenizer::default();
    for child in paragraph.children() {
        tokenizer.visit(child);
    }
    let mut tokens = tokenizer.finish();
    if protected.is_some() {
        restore_tokens(&mut tokens);
    }
    tokens
}

fn is_placeholder(c: char) -> bool {
    ('\u{E000}'..=ENTITY_MARK).contains(&c)
}

/// Hide escapes and character references from comrak. `None` when the line already holds
/// placeholder characters and could not be restored unambiguously.
fn protect(line: &str) -> Option<String> {
    if line.chars().any(is_placeholder) {
        return None;
    }
    let escaped = ESCAPE.replace_all(line, |caps: &Captures| {
        caps[1]
            .chars()
            .filter_map(|c| char::from_u32(ESCAPE_BASE + c as u32))
            .collect::<String>()
    });
    let marked = ENTITY.replace_all(&escaped, format!("{ENTITY_MARK}${{1}}").as_str());
    Some(marked.into_owned())
}

fn restore(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ENTITY_MARK => output.push('&'),
            c if is_placeholder(c) => {
                output.push('\\');
                output.extend(char::from_u32(c as u32 - ESCAPE_BASE));
            }
            c => output.push(c),
        }
    }
    output
}

fn restore_tokens(tokens: &mut [InlineToken]) {
    for token in tokens {
        token.content = restore(&token.content);
        restore_tokens(&mut token.children);
    }
}

#[derive(Default)]
struct Tokenizer {
    tokens: Vec<InlineToken>,
    highlight_open: bool,
}

impl Tokenizer {
    fn visit<'a>(&mut self, node: &'a AstNode<'a>) {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::Text(text) => self.push_text(&text),
            NodeValue::Code(code) => {
                let fence = "`".repeat(code.num_backticks.max(1));
                self.tokens.push(InlineToken::new(
                    TokenKind::CodeInline,
                    format!("{fence}{}{fence}", code.literal),
                ));
            }
            NodeValue::HtmlInline(html) => {
                self.tokens
                    .push(InlineToken::new(TokenKind::HtmlInline, html));
            }
            NodeValue::SoftBreak | NodeValue::LineBreak => self.push_text(" "),
            NodeValue::Strong => {
                self.wrap(node, TokenKind::StrongOpen, TokenKind::StrongClose)
            }
            NodeValue::Emph => self.wrap(node, TokenKind::EmOpen, TokenKind::EmClose),
            NodeValue::Strikethrough => {
                self.wrap(node, TokenKind::StrikeOpen, TokenKind::StrikeClose)
            }
            NodeValue::Link(link) => {
                self.tokens
                    .push(InlineToken::new(TokenKind::LinkOpen, link.url.clone()));
                for child in node.children() {
                    self.visit(child);
                }
                self.tokens
                    .push(InlineToken::new(TokenKind::LinkClose, link.url));
            }
            NodeValue::Image(link) => {
                let mut alt = String::new();
                collect_text(node, &mut alt);
                self.push_text(&format!("![{alt}]({})", link.url));
            }
            _ => {
                // Anything else keeps its inline children in a container token.
                let mut nested = Tokenizer {
                    tokens: Vec::new(),
                    highlight_open: self.highlight_open,
                };
                for child in node.children() {
                    nested.visit(child);
                }
                self.highlight_open = nested.highlight_open;
                let mut container = InlineToken::marker(TokenKind::Container);
                container.children = nested.tokens;
                self.tokens.push(container);
            }
        }
    }

    fn wrap<'a>(&mut self, node: &'a AstNode<'a>, open: TokenKind, close: TokenKind) {
        self.tokens.push(InlineToken::marker(open));
        for child in node.children() {
            self.visit(child);
        }
        self.tokens.push(InlineToken::marker(close));
    }

    /// Push text, splitting out `==` highlight toggles.
    fn push_text(&mut self, text: &str) {
        let mut pieces = text.split(HIGHLIGHT_MARKER).peekable();
        while let Some(piece) = pieces.next() {
            if !piece.is_empty() {
                self.tokens.push(InlineToken::text(piece));
            }
            if pieces.peek().is_some() {
                let kind = if self.highlight_open {
                    TokenKind::HighlightClose
                } else {
                    TokenKind::HighlightOpen
                };
                self.highlight_open = !self.highlight_open;
                self.tokens.push(InlineToken::marker(kind));
            }
        }
    }

    fn finish(mut self) -> Vec<InlineToken> {
        if self.highlight_open {
            unmatch_last_highlight(&mut self.tokens);
        }
        self.tokens
    }
}

/// Turn the last highlight-open token back into literal text. Returns whether one was found.
fn unmatch_last_highlight(tokens: &mut [InlineToken]) -> bool {
    for token in tokens.iter_mut().rev() {
        if token.kind == TokenKind::HighlightOpen {
            *token = InlineToken::text(HIGHLIGHT_MARKER);
            return true;
        }
        if token.kind == TokenKind::Container && unmatch_last_highlight(&mut token.children) {
            return true;
        }
    }
    false
}

fn collect_text<'a>(node: &'a AstNode<'a>, output: &mut String) {
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Text(text) => output.push_str(text),
            NodeValue::Code(code) => output.push_str(&code.literal),
            _ => collect_text(child, output),
        }
    }
}
