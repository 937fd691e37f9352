//! Export tests for Markdown format (tree → Markdown)
//!
//! These tests build forests by hand and check the Markdown they render to.

use mindmark_babel::common::code_block;
use mindmark_babel::common::style::render_run;
use mindmark_babel::format::Format;
use mindmark_babel::formats::markdown::MarkdownFormat;
use mindmark_babel::{tree_to_markdown, MarkdownOptions, NodeKind, RichNode};
use mindmark_babel::{StyleAttributes, StyleRun, Title};
use std::collections::HashMap;

fn tree_to_md(forest: &[RichNode]) -> String {
    tree_to_markdown(forest, None, &MarkdownOptions::default()).expect("Should serialize")
}

fn flag(set: fn(&mut StyleAttributes)) -> StyleAttributes {
    let mut attributes = StyleAttributes::default();
    set(&mut attributes);
    attributes
}

#[test]
fn test_style_nesting_order_is_fixed() {
    let layers = [
        flag(|a| a.bold = Some(true)),
        flag(|a| a.italic = Some(true)),
        flag(|a| a.monospace = Some(true)),
    ];
    let orders = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    for order in orders {
        let style = order
            .iter()
            .fold(StyleAttributes::default(), |acc, &i| acc.merge(&layers[i]));
        let run = StyleRun::styled("text", style);
        assert_eq!(render_run(&run), "**`*text*`**", "order {order:?}");
    }
}

#[test]
fn test_heading_depth_is_monotonic() {
    let mut node = RichNode::header(1, "leaf");
    for level in (1..=8).rev() {
        node = RichNode::header(level, format!("level {level}")).with_children(vec![node]);
    }
    let markdown = tree_to_md(&[node]);

    let levels: Vec<usize> = markdown
        .lines()
        .map(|line| line.chars().take_while(|&c| c == '#').count())
        .collect();
    assert_eq!(levels, vec![1, 2, 3, 4, 5, 6, 6, 6, 6]);
}

#[test]
fn test_child_headers_render_deeper_than_parent() {
    let forest = vec![RichNode::header(2, "Parent")
        .with_children(vec![RichNode::header(2, "Child")])];
    let options = MarkdownOptions {
        start_header_level: 2,
        ..Default::default()
    };
    assert_eq!(
        tree_to_markdown(&forest, None, &options).unwrap(),
        "## Parent\n### Child"
    );
}

#[test]
fn test_mixed_document() {
    let bold = flag(|a| a.bold = Some(true));
    let code = RichNode::new("```sh")
        .with_kind(NodeKind::CodeBlock {
            language: "sh".to_string(),
        })
        .with_notes(code_block::encode(
            &["cargo test".to_string(), "\techo done".to_string()],
            "sh",
        ));

    let forest = vec![RichNode::header(1, "Guide").with_children(vec![
        RichNode::new(Title::from_runs(vec![
            StyleRun::plain("Read "),
            StyleRun::styled("this", bold),
            StyleRun::plain(" first."),
        ]))
        .with_children(vec![RichNode::new("a point"), RichNode::new("1. numbered")]),
        code,
        RichNode::presentation("<p>say hello</p>"),
        RichNode::divider(),
        RichNode::image("shot.png", ""),
    ])];

    let expected = [
        "# Guide",
        "Read **this** first.",
        "\t- a point",
        "\t1. numbered",
        "",
        "```sh",
        "cargo test",
        "\techo done",
        "```",
        "",
        "<!--",
        "say hello",
        "-->",
        "",
        "---",
        "",
        "![image](shot.png)",
    ];
    assert_eq!(tree_to_md(&forest), expected.join("\n"));
}

#[test]
fn test_empty_forest_is_empty_markdown() {
    assert_eq!(tree_to_md(&[]), "");
}

#[test]
fn test_format_serialize_with_start_level() {
    let forest = vec![RichNode::header(1, "A")];
    let mut options = HashMap::new();
    options.insert("start-header-level".to_string(), "4".to_string());
    let markdown = MarkdownFormat::default()
        .serialize_with_options(&forest, &options)
        .unwrap();
    assert_eq!(markdown, "#### A");
}

#[test]
fn test_invalid_option_value_is_an_error() {
    let mut options = HashMap::new();
    options.insert("preserve-line-format".to_string(), "maybe".to_string());
    assert!(MarkdownFormat::default()
        .serialize_with_options(&[], &options)
        .is_err());
}
