//! Import tests for Markdown format (Markdown → tree)
//!
//! These tests verify that Markdown documents are correctly converted to forests by checking the
//! resulting node structure.

use super::read_fixture;
use mindmark_babel::common::code_block;
use mindmark_babel::common::indent::classify_line;
use mindmark_babel::format::Format;
use mindmark_babel::formats::markdown::MarkdownFormat;
use mindmark_babel::formats::treeviz::to_treeviz_str;
use mindmark_babel::{markdown_to_tree, NodeKind, RichNode, StyleRun};

fn md_to_tree(md: &str) -> Vec<RichNode> {
    markdown_to_tree(md).expect("Should parse markdown")
}

fn titles(nodes: &[RichNode]) -> Vec<String> {
    nodes.iter().map(|node| node.title.plain_text()).collect()
}

#[test]
fn test_end_to_end_fixture_structure() {
    let forest = md_to_tree(&read_fixture("end_to_end.md"));

    assert_eq!(forest.len(), 1);
    let title = &forest[0];
    assert_eq!(title.kind(), NodeKind::Header { level: 1 });
    assert_eq!(title.title.plain_text(), "Title");
    assert_eq!(title.children.len(), 1);

    let section = &title.children[0];
    assert_eq!(section.kind(), NodeKind::Header { level: 2 });
    assert_eq!(section.title.plain_text(), "Section");
    assert_eq!(section.children.len(), 3);

    let bold_item = section.children[0].title.runs();
    assert_eq!(bold_item[0], StyleRun::plain("- "));
    assert_eq!(bold_item[1].text, "bold");
    assert!(bold_item[1].style.is_bold());
    assert_eq!(bold_item[2], StyleRun::plain(" item"));

    assert_eq!(section.children[1].title.plain_text(), "- plain item");
    assert_eq!(section.children[1].kind(), NodeKind::PlainText);

    let code = &section.children[2];
    assert_eq!(
        code.kind(),
        NodeKind::CodeBlock {
            language: "py".to_string()
        }
    );
    let decoded = code_block::decode(code.notes.as_deref().unwrap());
    assert_eq!(decoded.language, "py");
    assert_eq!(decoded.lines, vec![r#"print("hi")"#.to_string()]);
}

#[test]
fn test_same_level_text_is_siblings() {
    let forest = md_to_tree("## H\n\nline one\nline two\nline three");

    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].children.len(), 3);
    assert!(forest[0]
        .children
        .iter()
        .all(|child| child.children.is_empty() && child.kind() == NodeKind::PlainText));
}

#[test]
fn test_code_block_reattaches_to_section() {
    let forest = md_to_tree("## Section\n- item\n\n```js\ncode\n```");
    let section = &forest[0];

    assert_eq!(titles(&section.children), vec!["- item", "```js"]);
    assert!(section.children[0].children.is_empty());
}

#[test]
fn test_list_vs_prose_classification() {
    assert!(classify_line("* **0-50cm** → *warm colors*").is_list);
    assert!(!classify_line("**A sensor name** (Etherophone)").is_list);
    assert!(!classify_line("3. Explore — details").is_list);
}

#[test]
fn test_prose_with_bold_lead_is_not_a_list_item() {
    let forest = md_to_tree("**A sensor name** (Etherophone)");
    let runs = forest[0].title.runs();
    assert_eq!(runs[0].text, "A sensor name");
    assert!(runs[0].style.is_bold());
    assert_eq!(forest[0].original_indent, Some(0));
}

#[test]
fn test_styled_heading_title() {
    let forest = md_to_tree("# *Styled* heading");
    let runs = forest[0].title.runs();
    assert_eq!(runs[0].text, "Styled");
    assert!(runs[0].style.is_italic());
    assert_eq!(runs[1], StyleRun::plain(" heading"));
}

#[test]
fn test_underline_and_color_html() {
    let forest = md_to_tree(r#"<span style="color:#00ff00"><u>green</u></span> tail"#);
    let runs = forest[0].title.runs();
    assert_eq!(runs[0].text, "green");
    assert!(runs[0].style.is_underline());
    assert_eq!(runs[0].style.color.as_deref(), Some("#00ff00"));
    assert_eq!(runs[1], StyleRun::plain(" tail"));
}

#[test]
fn test_heading_jump_attaches_to_nearest_header() {
    let forest = md_to_tree("# A\n#### D\ntext");
    assert_eq!(titles(&forest), vec!["A"]);
    assert_eq!(titles(&forest[0].children), vec!["D"]);
    assert_eq!(titles(&forest[0].children[0].children), vec!["text"]);
}

#[test]
fn test_outline_fixture_treeviz() {
    let forest = md_to_tree(&read_fixture("outline.md"));

    insta::assert_snapshot!(to_treeviz_str(&forest), @r#"
    ⧉ Forest (1 roots)
    └─ § Project Plan
      ├─ ¶ Intro paragraph with emphasis …
      ├─ § Goals
      │ ├─ • - Ship the importer
      │ │ ├─ • - parse headings
      │ │ └─ • - parse tables lists
      │ └─ • - Write docs
      └─ § Notes
        ├─ ¶ First note.
        ├─ ¶ Second note.
        ├─ ⎯ ---
        └─ ▣ diagram.png
          └─ " remember the demo
    "#);
}

#[test]
fn test_format_trait_parse() {
    let forest = MarkdownFormat::default().parse("# A\n- b").unwrap();
    assert_eq!(forest[0].children.len(), 1);
}

#[test]
fn test_empty_document() {
    assert!(md_to_tree("").is_empty());
    assert!(md_to_tree("\n\n  \n").is_empty());
}
