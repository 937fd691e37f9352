//! Clipboard HTML tests
//!
//! The clipboard carries the tree as JSON inside a `data-mind-map` attribute.

use mindmark_babel::{
    clipboard_html_to_tree, markdown_to_tree, tree_to_clipboard_html, tree_to_markdown,
    FormatError, FormatRegistry, MarkdownOptions,
};

#[test]
fn test_markdown_through_clipboard_and_back() {
    let md = "# Title\n- **bold** item\n- <u>under</u> & \"quoted\"";
    let forest = markdown_to_tree(md).unwrap();

    let html = tree_to_clipboard_html(&forest).unwrap();
    let restored = clipboard_html_to_tree(&html).unwrap();

    assert_eq!(restored, forest);
    assert_eq!(
        tree_to_markdown(&restored, None, &MarkdownOptions::default()).unwrap(),
        md
    );
}

#[test]
fn test_pasted_payload_with_wrapped_shape() {
    let html = concat!(
        r#"<meta charset="utf-8">"#,
        r#"<div data-mind-map="{&quot;data&quot;:{&quot;text&quot;:&quot;Root&quot;},"#,
        r#"&quot;children&quot;:[{&quot;data&quot;:{&quot;text&quot;:&quot;child&quot;}}]}">"#,
        r#"<span>Root</span></div>"#
    );
    let forest = clipboard_html_to_tree(html).unwrap();

    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].title.plain_text(), "Root");
    assert_eq!(forest[0].children[0].title.plain_text(), "child");
}

#[test]
fn test_missing_tree_is_reported() {
    let registry = FormatRegistry::default();
    let result = registry.parse("<html><body><p>copied text</p></body></html>", "clipboard");
    assert!(matches!(result, Err(FormatError::MissingData(_))));
}
