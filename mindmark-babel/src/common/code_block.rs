//! Code block payload codec.
//!
//! Code-block nodes keep their source in the note payload as one paragraph per line. The format
//! is fixed by the application that consumes the tree:
//!
//! ```text
//! <p>```py<br>print(&quot;hi&quot;)<br></p><p><br></p><p>&amp;nbsp;&amp;nbsp;x = 1<br></p><p>```</p>
//! ```
//!
//! - the first paragraph starts with the fence marker and a `<br>`;
//! - every non-empty line is a paragraph ending in `<br>`, every empty line is `<p><br></p>`;
//! - tabs and newlines inside a line are written as the two-character sequences `\t` and `\n`;
//! - `& < > " '` are entity-encoded;
//! - each leading space is written as `&amp;nbsp;` (double-escaped);
//! - a final `<p>```</p>` closes the block.
//!
//! The double escaping of leading spaces and the backslash sequences are part of the wire
//! contract and are reproduced as is. Decoding restores `\t` to a tab; `\n` is left alone since
//! source lines never contain newlines and C-style escapes are common in code. A line containing
//! a literal backslash-t, or starting with a literal `&nbsp;`, does not survive a round trip.

use super::entities::{decode_entities, escape_html, strip_tags};
use once_cell::sync::Lazy;
use regex::Regex;

const FENCE: &str = "```";
const ESCAPED_SPACE: &str = "&amp;nbsp;";
const BREAK: &str = "<br>";

static PARAGRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<p(?:\s[^>]*)?>(.*?)</p>").unwrap());
static BREAK_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static FENCE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```([\w+#.-]*)\s*$").unwrap());

/// Encode source lines into the paragraph payload.
pub fn encode(lines: &[String], language: &str) -> String {
    let mut payload = String::new();

    if lines.is_empty() {
        payload.push_str(&format!("<p>{FENCE}{language}{BREAK}</p>"));
    }

    for (index, line) in lines.iter().enumerate() {
        payload.push_str("<p>");
        if index == 0 {
            payload.push_str(FENCE);
            payload.push_str(language);
            payload.push_str(BREAK);
        }
        if line.is_empty() {
            payload.push_str(BREAK);
        } else {
            payload.push_str(&encode_line(line));
            payload.push_str(BREAK);
        }
        payload.push_str("</p>");
    }

    payload.push_str(&format!("<p>{FENCE}</p>"));
    payload
}

fn encode_line(line: &str) -> String {
    let escaped = line.replace('\t', "\\t").replace('\n', "\\n");
    let escaped = escape_html(&escaped);
    let body = escaped.trim_start_matches(' ');
    let leading = escaped.len() - body.len();
    format!("{}{}", ESCAPED_SPACE.repeat(leading), body)
}

/// Decoded contents of a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCode {
    pub language: String,
    pub lines: Vec<String>,
}

/// Decode a payload back into source lines.
///
/// Payloads written by hand or by older versions may lack paragraphs or carry a fence twice;
/// both are tolerated.
pub fn decode(payload: &str) -> DecodedCode {
    let mut lines: Vec<String> = payload_lines(payload)
        .into_iter()
        .map(|line| decode_line(&line))
        .collect();

    let language = strip_fence_pair(&mut lines, false).unwrap_or_default();
    // A fence stored inside the code as well as around it.
    if let Some(inner) = strip_fence_pair(&mut lines, true) {
        if language.is_empty() {
            return DecodedCode {
                language: inner,
                lines,
            };
        }
    }

    DecodedCode { language, lines }
}

/// The language of a payload, if it looks like a code-block payload at all.
pub fn payload_language(payload: &str) -> Option<String> {
    let first = payload_lines(payload).into_iter().next()?;
    FENCE_OPEN
        .captures(decode_line(&first).trim())
        .map(|caps| caps[1].to_string())
}

/// Render a payload as a fenced Markdown block.
pub fn to_fenced_markdown(payload: &str, language_hint: &str) -> String {
    let decoded = decode(payload);
    let language = if decoded.language.is_empty() {
        language_hint
    } else {
        decoded.language.as_str()
    };

    let mut out = format!("{FENCE}{language}\n");
    for line in &decoded.lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(FENCE);
    out
}

/// Split a payload into raw (still encoded) lines, one per paragraph segment.
fn payload_lines(payload: &str) -> Vec<String> {
    if payload.trim().is_empty() {
        return Vec::new();
    }

    let paragraphs: Vec<&str> = PARAGRAPH
        .captures_iter(payload)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    let paragraphs = if paragraphs.is_empty() {
        vec![payload]
    } else {
        paragraphs
    };

    let mut lines = Vec::new();
    for paragraph in paragraphs {
        let mut segments: Vec<&str> = BREAK_TAG.split(paragraph).collect();
        if segments.len() > 1 && segments.last().is_some_and(|s| s.is_empty()) {
            segments.pop();
        }
        lines.extend(segments.into_iter().map(|segment| strip_tags(segment)));
    }
    lines
}

fn decode_line(raw: &str) -> String {
    let mut rest = raw;
    let mut leading = 0;
    loop {
        if let Some(stripped) = rest.strip_prefix(ESCAPED_SPACE) {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("&nbsp;") {
            rest = stripped;
        } else {
            break;
        }
        leading += 1;
    }

    let decoded = decode_entities(rest).replace("\\t", "\t");
    format!("{}{}", " ".repeat(leading), decoded)
}

/// Remove a leading fence line and a trailing closing fence, returning the language.
///
/// Unless `require_close` is set, an opening fence without a closing one is removed too.
fn strip_fence_pair(lines: &mut Vec<String>, require_close: bool) -> Option<String> {
    let language = FENCE_OPEN
        .captures(lines.first()?.trim())
        .map(|caps| caps[1].to_string())?;
    let closes = lines.len() > 1 && lines.last().is_some_and(|last| last.trim() == FENCE);
    if !closes {
        if require_close {
            return None;
        }
        lines.remove(0);
        return Some(language);
    }
    lines.remove(0);
    lines.pop();
    Some(language)
}
