//! HTML entity helpers for the note payloads the tree format stores.
//!
//! These are deliberately narrow: the tree stores notes as paragraph HTML, and we only need to
//! escape text going in and recover plain text coming out. Sanitizing arbitrary HTML is not a
//! concern of this crate.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</p>\s*|<br\s*/?>").unwrap());
static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap());

/// Escape `& < > " '` for inclusion in HTML text.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Decode numeric and the common named entities in a single pass.
///
/// Unknown entities are left untouched. `&nbsp;` decodes to a regular space since the payloads
/// this is used for are code and plain text.
pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &regex::Captures| {
            let body = &caps[1];
            decode_entity(body).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(body: &str) -> Option<String> {
    if let Some(hex) = body
        .strip_prefix("#x")
        .or_else(|| body.strip_prefix("#X"))
    {
        return u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }
    if let Some(decimal) = body.strip_prefix('#') {
        return decimal
            .parse::<u32>()
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }
    let decoded = match body {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "ndash" => "–",
        "mdash" => "—",
        "hellip" => "…",
        "copy" => "©",
        _ => return None,
    };
    Some(decoded.to_string())
}

/// Strip every tag, leaving the raw (still entity-encoded) text.
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, "").into_owned()
}

/// Recover plain text from paragraph HTML: paragraphs and `<br>` become line breaks, other tags
/// are dropped, entities decoded.
pub fn html_to_plain_text(html: &str) -> String {
    let with_breaks = PARAGRAPH_BREAK.replace_all(html, "\n");
    let text = decode_entities(&strip_tags(&with_breaks));
    text.trim_matches('\n').to_string()
}
