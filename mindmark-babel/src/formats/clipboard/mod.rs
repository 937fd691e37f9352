//! Clipboard HTML format implementation
//!
//! Mind-map applications put the tree on the clipboard as HTML: a wrapper element whose
//! `data-mind-map` attribute holds the tree JSON. Parsing finds the first element carrying the
//! attribute and reads its JSON; serialization builds the wrapper element.
//!
//! # Library Choice
//!
//! `html5ever` + `markup5ever_rcdom` parse the clipboard payload the way a browser would (the
//! payload usually carries a `<meta charset>` prefix and is not a well-formed document), and
//! html5ever's serializer handles attribute escaping on the way out.
//!
//! Sanitizing the wrapper for insertion into a page is left to the caller.

use crate::error::FormatError;
use crate::format::Format;
use crate::tree::json::{forest_from_json, forest_to_json};
use crate::tree::RichNode;
use html5ever::serialize::{SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{ns, parse_document, serialize, Attribute, LocalName, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::debug;

/// Attribute holding the tree JSON.
pub const MIND_MAP_ATTRIBUTE: &str = "data-mind-map";

/// Extract the raw tree JSON from clipboard HTML.
pub fn extract_tree_json(html: &str) -> Result<String, FormatError> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| FormatError::ParseError(format!("HTML parsing failed: {e}")))?;

    find_attribute(&dom.document, MIND_MAP_ATTRIBUTE).ok_or_else(|| {
        FormatError::MissingData(format!(
            "no element with a '{MIND_MAP_ATTRIBUTE}' attribute in clipboard HTML"
        ))
    })
}

/// Parse clipboard HTML into a forest.
pub fn forest_from_clipboard_html(html: &str) -> Result<Vec<RichNode>, FormatError> {
    let json = extract_tree_json(html)?;
    debug!(bytes = json.len(), "found mind-map data in clipboard html");
    forest_from_json(&json)
}

/// Wrap a forest in clipboard HTML.
pub fn forest_to_clipboard_html(forest: &[RichNode]) -> Result<String, FormatError> {
    let json = forest_to_json(forest, false)?;
    let wrapper = create_element("div", vec![(MIND_MAP_ATTRIBUTE, &json)]);

    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    serialize(&mut output, &SerializableHandle::from(wrapper), opts)
        .map_err(|e| FormatError::SerializationError(format!("HTML serialization failed: {e}")))?;

    String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {e}")))
}

/// Depth-first search for the first element carrying `attribute`.
fn find_attribute(handle: &Handle, attribute: &str) -> Option<String> {
    if let NodeData::Element { attrs, .. } = &handle.data {
        let found = attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attribute)
            .map(|attr| attr.value.to_string());
        if found.is_some() {
            return found;
        }
    }

    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_attribute(child, attribute))
}

fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Format implementation for clipboard HTML
pub struct ClipboardFormat;

impl Format for ClipboardFormat {
    fn name(&self) -> &str {
        "clipboard"
    }

    fn description(&self) -> &str {
        "Clipboard HTML carrying the tree in a data-mind-map attribute"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Vec<RichNode>, FormatError> {
        forest_from_clipboard_html(source)
    }

    fn serialize(&self, forest: &[RichNode]) -> Result<String, FormatError> {
        forest_to_clipboard_html(forest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_then_extract_returns_the_same_forest() {
        let forest = vec![RichNode::header(1, "Quotes \"&\" <tags>")
            .with_children(vec![RichNode::new("it's")])];
        let html = forest_to_clipboard_html(&forest).unwrap();
        assert!(html.starts_with("<div data-mind-map=\""));
        assert_eq!(forest_from_clipboard_html(&html).unwrap(), forest);
    }

    #[test]
    fn finds_attribute_anywhere_in_the_payload() {
        let html = r#"<meta charset="utf-8"><span><div data-mind-map='{"data":{"text":"Root"}}'></div></span>"#;
        let forest = forest_from_clipboard_html(html).unwrap();
        assert_eq!(forest[0].title.plain_text(), "Root");
    }

    #[test]
    fn missing_attribute_is_an_error() {
        let err = forest_from_clipboard_html("<p>just text</p>").unwrap_err();
        assert!(matches!(err, FormatError::MissingData(_)));
    }

    #[test]
    fn invalid_json_in_attribute_is_a_parse_error() {
        let err = forest_from_clipboard_html(r#"<div data-mind-map="{oops"></div>"#).unwrap_err();
        assert!(matches!(err, FormatError::ParseError(_)));
    }
}
