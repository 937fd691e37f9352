//! Round-trip tests (Markdown → tree → Markdown)

use super::read_fixture;
use mindmark_babel::tree::json::{forest_from_json, forest_to_json};
use mindmark_babel::tree::NodeKind;
use mindmark_babel::{markdown_to_tree, tree_to_markdown, MarkdownOptions};

/// One pass of Markdown → tree → Markdown without the original text.
fn normalize(md: &str) -> String {
    let forest = markdown_to_tree(md).expect("Should parse markdown");
    tree_to_markdown(&forest, None, &MarkdownOptions::default()).expect("Should serialize")
}

fn round_trip_with_original(md: &str) -> String {
    let forest = markdown_to_tree(md).expect("Should parse markdown");
    tree_to_markdown(&forest, Some(md), &MarkdownOptions::default()).expect("Should serialize")
}

#[test]
fn test_end_to_end_fixture_round_trips() {
    let md = read_fixture("end_to_end.md");
    assert_eq!(round_trip_with_original(&md), md.trim_end());
    assert_eq!(normalize(&md), md.trim_end());
}

#[test]
fn test_outline_fixture_round_trips_with_original() {
    let md = read_fixture("outline.md");
    assert_eq!(round_trip_with_original(&md), md.trim_end());
}

#[test]
fn test_outline_fixture_without_original_drops_spacing() {
    let md = read_fixture("outline.md");
    let expected = [
        "# Project Plan",
        "Intro paragraph with *emphasis* and `code`.",
        "## Goals",
        "- Ship the **importer**",
        "\t- parse headings",
        "\t- parse ~~tables~~ lists",
        "- Write ==docs==",
        "## Notes",
        "First note.",
        "Second note.",
        "",
        "---",
        "",
        "![Diagram](diagram.png)",
        "<!--",
        "remember the demo",
        "-->",
    ];
    assert_eq!(normalize(&md), expected.join("\n"));
}

#[test]
fn test_plain_structure_is_idempotent() {
    let inputs = [
        "## H\n\nline one\nline two\nline three",
        "# A\n### C\n## B\n# D",
        "- a\n\t- b\n\t\t- c\n- d",
        "intro\n- a\n- b\n\tnested para",
        "Root\n\tchild text",
        "* star\n+ plus\n1. one",
        "# Title\nPara\n\tindented under para\n## Sub\n- x",
    ];

    for input in inputs {
        let once = normalize(input);
        let twice = normalize(&once);
        assert_eq!(twice, once, "not idempotent for {input:?}");
    }
}

#[test]
fn test_headings_renumber_from_depth() {
    assert_eq!(normalize("## Only\n#### Deeper"), "# Only\n## Deeper");
}

#[test]
fn test_forest_survives_json() {
    let forest = markdown_to_tree(&read_fixture("outline.md")).unwrap();
    let json = forest_to_json(&forest, true).unwrap();
    assert_eq!(forest_from_json(&json).unwrap(), forest);
}

#[test]
fn test_escaped_heading_marker_stays_plain_text() {
    let md = r"\# not a heading";
    assert_eq!(normalize(md), md);

    let forest = markdown_to_tree(md).unwrap();
    assert_eq!(forest[0].kind(), NodeKind::PlainText);
}

#[test]
fn test_escaped_emphasis_markers_stay_literal() {
    let md = r"use \*stars\* literally";
    assert_eq!(normalize(md), md);

    let forest = markdown_to_tree(md).unwrap();
    assert!(forest[0].title.runs().iter().all(|run| run.style.is_plain()));
}

#[test]
fn test_character_references_are_kept() {
    let md = "AT&amp;T &lt;tag&gt;";
    assert_eq!(normalize(md), md);
    assert_eq!(normalize(&normalize(md)), md);
}
