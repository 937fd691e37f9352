//! Style codec: style runs ⇄ inline Markdown.
//!
//! Rendering applies wrappers in a fixed nesting order, innermost first:
//!
//! | attribute | wrapper                          |
//! |-----------|----------------------------------|
//! | italic    | `*x*`                            |
//! | monospace | `` `x` ``                        |
//! | highlight | `==x==`                          |
//! | strike    | `~~x~~`                          |
//! | bold      | `**x**`                          |
//! | underline | `<u>x</u>`                       |
//! | color     | `<span style="color:C">x</span>` |
//!
//! so bold + italic + monospace always renders as `` **`*text*`** ``.
//!
//! Decoding runs the inline token stream through a stack of attribute snapshots. Unbalanced
//! markers leave their attribute applied to the rest of the line.

use super::inline::{tokenize_inline, InlineToken, TokenKind};
use crate::tree::nodes::{StyleAttributes, StyleRun};
use once_cell::sync::Lazy;
use regex::Regex;

static COLOR_SPAN_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^<span\s+style\s*=\s*["']\s*color\s*:\s*([^;"']+?)\s*;?\s*["']\s*>$"#)
        .unwrap()
});

/// Render a single run to inline Markdown.
pub fn render_run(run: &StyleRun) -> String {
    let style = &run.style;
    let core = run.text.trim();
    if style.is_plain() || core.is_empty() {
        return run.text.clone();
    }

    // Whitespace stays outside the markers, `** x**` is not bold in Markdown.
    let leading = &run.text[..run.text.len() - run.text.trim_start().len()];
    let trailing = &run.text[run.text.trim_end().len()..];

    let mut out = core.to_string();
    if style.is_italic() {
        out = format!("*{out}*");
    }
    if style.is_monospace() {
        out = format!("`{out}`");
    }
    if style.is_highlight() {
        out = format!("=={out}==");
    }
    if style.is_strike() {
        out = format!("~~{out}~~");
    }
    if style.is_bold() {
        out = format!("**{out}**");
    }
    if style.is_underline() {
        out = format!("<u>{out}</u>");
    }
    if let Some(color) = &style.color {
        out = format!("<span style=\"color:{color}\">{out}</span>");
    }

    format!("{leading}{out}{trailing}")
}

/// Render runs, separating markers that would otherwise merge.
pub fn render_runs(runs: &[StyleRun]) -> String {
    let mut out = String::new();
    for run in runs {
        let rendered = render_run(run);
        if needs_separator(&out, &rendered) {
            out.push(' ');
        }
        out.push_str(&rendered);
    }
    out
}

fn needs_separator(before: &str, after: &str) -> bool {
    (before.ends_with("**") && after.starts_with('`'))
        || (before.ends_with('`') && after.starts_with("**"))
        || (before.ends_with('`') && after.starts_with('`'))
}

/// Parse one line of inline Markdown into style runs.
pub fn parse_inline(line: &str) -> Vec<StyleRun> {
    runs_from_tokens(&tokenize_inline(line))
}

/// Build style runs from an inline token stream.
pub fn runs_from_tokens(tokens: &[InlineToken]) -> Vec<StyleRun> {
    let mut builder = RunBuilder::default();
    builder.consume(tokens);
    builder.runs
}

#[derive(Default)]
struct RunBuilder {
    current: StyleAttributes,
    saved: Vec<StyleAttributes>,
    runs: Vec<StyleRun>,
}

impl RunBuilder {
    fn consume(&mut self, tokens: &[InlineToken]) {
        for token in tokens {
            match token.kind {
                TokenKind::Text | TokenKind::CodeInline => self.push_text(&token.content),
                TokenKind::StrongOpen => self.open(StyleAttributes {
                    bold: Some(true),
                    ..Default::default()
                }),
                TokenKind::EmOpen => self.open(StyleAttributes {
                    italic: Some(true),
                    ..Default::default()
                }),
                TokenKind::StrikeOpen => self.open(StyleAttributes {
                    strike: Some(true),
                    ..Default::default()
                }),
                TokenKind::HighlightOpen => self.open(StyleAttributes {
                    highlight: Some(true),
                    ..Default::default()
                }),
                TokenKind::StrongClose
                | TokenKind::EmClose
                | TokenKind::StrikeClose
                | TokenKind::HighlightClose => self.close(),
                TokenKind::LinkOpen => self.push_text("["),
                TokenKind::LinkClose => self.push_text(&format!("]({})", token.content)),
                TokenKind::HtmlInline => self.html(&token.content),
                TokenKind::Container => {
                    let snapshot = self.current.clone();
                    let depth = self.saved.len();
                    self.consume(&token.children);
                    self.saved.truncate(depth);
                    self.current = snapshot;
                }
            }
        }
    }

    fn html(&mut self, tag: &str) {
        let normalized = tag.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "<u>" => self.open(StyleAttributes {
                underline: Some(true),
                ..Default::default()
            }),
            "</u>" | "</span>" => self.close(),
            _ => match COLOR_SPAN_OPEN.captures(tag.trim()) {
                Some(caps) => self.open(StyleAttributes {
                    color: Some(caps[1].to_string()),
                    ..Default::default()
                }),
                None => self.push_text(tag),
            },
        }
    }

    fn open(&mut self, overlay: StyleAttributes) {
        let merged = self.current.merge(&overlay);
        self.saved.push(std::mem::replace(&mut self.current, merged));
    }

    fn close(&mut self) {
        // A close without an open leaves the style untouched.
        if let Some(previous) = self.saved.pop() {
            self.current = previous;
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.runs.last_mut() {
            if last.style.renders_like(&self.current) {
                last.text.push_str(text);
                return;
            }
        }
        self.runs
            .push(StyleRun::styled(text, self.current.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn attrs(apply: impl FnOnce(&mut StyleAttributes)) -> StyleAttributes {
        let mut style = StyleAttributes::default();
        apply(&mut style);
        style
    }

    #[test]
    fn nesting_order_is_fixed() {
        let run = StyleRun::styled(
            "text",
            attrs(|s| {
                s.monospace = Some(true);
                s.bold = Some(true);
                s.italic = Some(true);
            }),
        );
        assert_eq!(render_run(&run), "**`*text*`**");

        let reordered = StyleRun::styled(
            "text",
            attrs(|s| {
                s.italic = Some(true);
                s.monospace = Some(true);
                s.bold = Some(true);
            }),
        );
        assert_eq!(render_run(&reordered), render_run(&run));
    }

    #[test]
    fn every_wrapper_in_order() {
        let run = StyleRun::styled(
            "x",
            StyleAttributes {
                bold: Some(true),
                italic: Some(true),
                strike: Some(true),
                highlight: Some(true),
                underline: Some(true),
                monospace: Some(true),
                color: Some("#ff0000".to_string()),
            },
        );
        assert_snapshot!(
            render_run(&run),
            @r#"<span style="color:#ff0000"><u>**~~==`*x*`==~~**</u></span>"#
        );
    }

    #[test]
    fn whitespace_is_hoisted_outside_markers() {
        let run = StyleRun::styled(" bold ", attrs(|s| s.bold = Some(true)));
        assert_eq!(render_run(&run), " **bold** ");
    }

    #[test]
    fn false_flags_render_plain() {
        let run = StyleRun::styled("x", attrs(|s| s.bold = Some(false)));
        assert_eq!(render_run(&run), "x");
    }

    #[test]
    fn adjacent_markers_get_a_separating_space() {
        let runs = vec![
            StyleRun::styled("bold", attrs(|s| s.bold = Some(true))),
            StyleRun::styled("code", attrs(|s| s.monospace = Some(true))),
            StyleRun::styled("more", attrs(|s| s.monospace = Some(true))),
        ];
        // Runs are rendered as given, equal neighbours are not merged.
        assert_eq!(render_runs(&runs), "**bold** `code` `more`");
    }

    #[test]
    fn decodes_nested_styles() {
        let runs = parse_inline("**bold *both*** plain");
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].text, "bold ");
        assert!(runs[0].style.is_bold());
        assert_eq!(runs[1].text, "both");
        assert!(runs[1].style.is_bold() && runs[1].style.is_italic());
        assert_eq!(runs[2], StyleRun::plain(" plain"));
    }

    #[test]
    fn code_spans_stay_literal() {
        let runs = parse_inline("use `x` here");
        assert_eq!(runs, vec![StyleRun::plain("use `x` here")]);
    }

    #[test]
    fn underline_and_color_from_html() {
        let runs = parse_inline(r#"<u>under</u> <span style="color:#00ff00">green</span>"#);
        assert_eq!(runs[0].text, "under");
        assert!(runs[0].style.is_underline());
        assert_eq!(runs[1], StyleRun::plain(" "));
        assert_eq!(runs[2].text, "green");
        assert_eq!(runs[2].style.color.as_deref(), Some("#00ff00"));
    }

    #[test]
    fn unknown_html_is_literal() {
        let runs = parse_inline("a <kbd>b</kbd>");
        assert_eq!(runs, vec![StyleRun::plain("a <kbd>b</kbd>")]);
    }

    #[test]
    fn links_keep_their_syntax() {
        let runs = parse_inline("see [**docs**](https://d.io)");
        assert_eq!(runs[0], StyleRun::plain("see ["));
        assert_eq!(runs[1].text, "docs");
        assert!(runs[1].style.is_bold());
        assert_eq!(runs[2], StyleRun::plain("](https://d.io)"));
    }

    #[test]
    fn stray_closes_are_tolerated() {
        let tokens = vec![
            InlineToken::new(TokenKind::StrongOpen, ""),
            InlineToken::text("a"),
            InlineToken::new(TokenKind::EmClose, ""),
            InlineToken::text("b"),
            InlineToken::new(TokenKind::EmClose, ""),
            InlineToken::text("c"),
        ];
        let runs = runs_from_tokens(&tokens);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "a");
        assert_eq!(runs[1], StyleRun::plain("bc"));
    }

    #[test]
    fn styled_round_trip() {
        let source = "**bold** `code` ==mark== ~~old~~ <u>u</u>";
        let rendered = render_runs(&parse_inline(source));
        assert_eq!(rendered, source);
    }
}
