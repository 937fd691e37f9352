//! Tree boundary tests: JSON shapes and the plain-text projection.

use mindmark_babel::tree::json::forest_from_json;
use mindmark_babel::{markdown_to_tree, tree_to_plain_text, FormatRegistry, TextOptions};

#[test]
fn test_wrapped_and_flat_shapes_are_identical() {
    let wrapped = r###"{"root": {"data": {"text": "Map", "note": "<p>n</p>"}, "children": [
        {"data": {"text": "## Branch"}, "children": [{"data": {"text": "leaf"}}]}
    ]}}"###;
    let flat = r###"[{"title": "Map", "notes": "<p>n</p>", "children": [
        {"title": "## Branch", "children": [{"title": "leaf"}]}
    ]}]"###;

    assert_eq!(
        forest_from_json(wrapped).unwrap(),
        forest_from_json(flat).unwrap()
    );
}

#[test]
fn test_json_tree_renders_as_markdown() {
    let registry = FormatRegistry::default();
    let forest = registry
        .parse(
            r###"{"data": {"text": "Map"}, "children": [{"data": {"text": "## Branch"}, "children": [{"data": {"text": "leaf"}}]}]}"###,
            "json",
        )
        .unwrap();

    assert_eq!(
        registry.serialize(&forest, "markdown").unwrap(),
        "Map\n## Branch\nleaf"
    );
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    let registry = FormatRegistry::default();
    assert!(registry.parse("{not json", "json").is_err());
    assert!(registry.parse("\"just a string\"", "json").is_err());
}

#[test]
fn test_plain_text_projection() {
    let forest = markdown_to_tree("# Plan\n- **first**\n\t- nested\n\n---\n\n<!-- aside -->").unwrap();
    let options = TextOptions {
        indent_string: "  ".to_string(),
    };

    insta::assert_snapshot!(tree_to_plain_text(&forest, &options), @r"
    Plan
      - first
        - nested
      aside
    ");
}
