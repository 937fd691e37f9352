//! JSON boundary for the outline tree.
//!
//! Trees arrive in a few historical shapes. They are collapsed into the canonical [`RichNode`]
//! shape here so nothing past this module has to care:
//!
//! - a list of nodes, a single node, or an object wrapping the root as `{"root": node}`;
//! - nodes either flat (`{"title": …, "children": […]}`) or wrapped
//!   (`{"data": {"text": …}, "children": […]}`).

use super::nodes::RichNode;
use crate::error::FormatError;
use serde_json::{Map, Value};

/// Parse a forest from any accepted JSON shape.
pub fn forest_from_json(source: &str) -> Result<Vec<RichNode>, FormatError> {
    let value: Value = serde_json::from_str(source)
        .map_err(|e| FormatError::ParseError(format!("Invalid tree JSON: {e}")))?;
    forest_from_value(value)
}

/// Canonicalize an already parsed JSON value into a forest.
pub fn forest_from_value(value: Value) -> Result<Vec<RichNode>, FormatError> {
    let roots = match value {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("root") {
            Some(root) if !is_node_object(&object) => vec![root],
            Some(root) => {
                object.insert("root".to_string(), root);
                vec![Value::Object(object)]
            }
            None => vec![Value::Object(object)],
        },
        other => {
            return Err(FormatError::ParseError(format!(
                "Expected a node or a list of nodes, found {}",
                describe(&other)
            )))
        }
    };

    roots
        .into_iter()
        .map(|root| {
            let canonical = canonicalize_node(root)?;
            serde_json::from_value(canonical)
                .map_err(|e| FormatError::ParseError(format!("Invalid tree node: {e}")))
        })
        .collect()
}

/// Serialize a forest to canonical JSON.
pub fn forest_to_json(forest: &[RichNode], pretty: bool) -> Result<String, FormatError> {
    let result = if pretty {
        serde_json::to_string_pretty(forest)
    } else {
        serde_json::to_string(forest)
    };
    result.map_err(|e| FormatError::SerializationError(format!("JSON serialization failed: {e}")))
}

fn is_node_object(object: &Map<String, Value>) -> bool {
    ["title", "text", "data", "children"]
        .iter()
        .any(|key| object.contains_key(*key))
}

/// Unwrap `{data, children}` into the flat shape, recursively.
fn canonicalize_node(value: Value) -> Result<Value, FormatError> {
    let Value::Object(mut object) = value else {
        return Err(FormatError::ParseError(format!(
            "Expected a node object, found {}",
            describe(&value)
        )));
    };

    let children = match object.remove("children") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(children)) => children,
        Some(other) => {
            return Err(FormatError::ParseError(format!(
                "Node children must be a list, found {}",
                describe(&other)
            )))
        }
    };

    let mut flat = match object.remove("data") {
        Some(Value::Object(data)) => {
            let mut merged = data;
            for (key, value) in object {
                merged.entry(key).or_insert(value);
            }
            merged
        }
        Some(other) => {
            object.insert("data".to_string(), other);
            object
        }
        None => object,
    };

    let children = children
        .into_iter()
        .map(canonicalize_node)
        .collect::<Result<Vec<_>, _>>()?;
    flat.insert("children".to_string(), Value::Array(children));

    Ok(Value::Object(flat))
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::nodes::{NodeKind, Title};

    #[test]
    fn wrapped_and_flat_shapes_parse_identically() {
        let wrapped = r#"{"data": {"text": "Root"}, "children": [{"data": {"text": "Child"}}]}"#;
        let flat = r#"{"title": "Root", "children": [{"title": "Child"}]}"#;

        let a = forest_from_json(wrapped).unwrap();
        let b = forest_from_json(flat).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].children[0].title, Title::Plain("Child".to_string()));
    }

    #[test]
    fn accepts_root_wrapper_and_lists() {
        let forest = forest_from_json(r#"{"root": {"title": "A"}}"#).unwrap();
        assert_eq!(forest.len(), 1);

        let forest = forest_from_json(r#"[{"title": "A"}, {"title": "B"}]"#).unwrap();
        assert_eq!(forest.len(), 2);
    }

    #[test]
    fn styled_titles_and_kinds_parse() {
        let source = r#"[{
            "title": [{"text": "bold", "bold": true}, {"text": " rest"}],
            "kind": {"type": "header", "level": 2},
            "originalIndent": 1
        }]"#;
        let forest = forest_from_json(source).unwrap();
        let node = &forest[0];

        assert_eq!(node.kind(), NodeKind::Header { level: 2 });
        assert_eq!(node.title.plain_text(), "bold rest");
        assert_eq!(node.original_indent, Some(1));
    }

    #[test]
    fn rejects_scalars() {
        let err = forest_from_json("42").unwrap_err();
        assert!(matches!(err, FormatError::ParseError(_)));
    }

    #[test]
    fn serializes_back_to_canonical_shape() {
        let forest = forest_from_json(r#"[{"data": {"text": "A", "note": "<p>n</p>"}}]"#).unwrap();
        let json = forest_to_json(&forest, false).unwrap();
        assert_eq!(json, r#"[{"title":"A","children":[],"notes":"<p>n</p>"}]"#);
    }
}
