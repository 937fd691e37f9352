//! Line-format preservation tests
//!
//! Blank lines of the original Markdown are restored only where they separate headings, list
//! items from list items, or paragraphs from paragraphs.

use mindmark_babel::common::line_format::reconcile;
use mindmark_babel::{markdown_to_tree, tree_to_markdown, MarkdownOptions};

fn with_original(md: &str) -> String {
    let forest = markdown_to_tree(md).unwrap();
    tree_to_markdown(&forest, Some(md), &MarkdownOptions::default()).unwrap()
}

#[test]
fn test_blank_between_list_and_paragraph_is_dropped() {
    let original = "# H\n\n- a\n- b\n\npara";
    let fresh = "# H\n- a\n- b\npara";
    assert_eq!(reconcile(original, fresh), "# H\n\n- a\n- b\npara");
}

#[test]
fn test_loose_list_keeps_its_spacing() {
    assert_eq!(reconcile("- a\n\n- b", "- a\n- b"), "- a\n\n- b");
}

#[test]
fn test_code_blank_lines_are_not_doubled() {
    assert_eq!(
        with_original("# H\n```\nx\n\ny\n```"),
        "# H\n\n```\nx\n\ny\n```"
    );
}

#[test]
fn test_unmatched_fresh_lines_are_appended() {
    assert_eq!(reconcile("a", "a\nb\nc"), "a\nb\nc");
}

#[test]
fn test_trailing_blank_lines_are_dropped() {
    assert_eq!(reconcile("a\n\n\n", "a"), "a");
}

#[test]
fn test_paragraph_spacing_survives_round_trip() {
    let md = "# Notes\n\nfirst thought\n\nsecond thought";
    assert_eq!(with_original(md), md);
}

#[test]
fn test_single_line_comment_keeps_following_spacing() {
    assert_eq!(
        with_original("# A\n<!-- note -->\n\n## B\n\ntext"),
        "# A\n<!--\nnote\n-->\n\n## B\n\ntext"
    );
}
