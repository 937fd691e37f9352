//! Shared icon mapping for tree visualization
//!
//! Kept in one place so every view of a forest (treeviz, the CLI inspect output) uses the same
//! glyph for the same node kind.

/// Get the Unicode icon for a node kind name
///
/// Returns a single Unicode character that visually represents the node kind.
pub fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "Forest" => "⧉",
        "Header" => "§",
        "PlainText" => "¶",
        "ListItem" => "•",
        "CodeBlock" => "𝒱",
        "Divider" => "⎯",
        "Image" => "▣",
        "Presentation" => "\"",
        _ => "○",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_mappings() {
        assert_eq!(get_icon("Forest"), "⧉");
        assert_eq!(get_icon("Header"), "§");
        assert_eq!(get_icon("PlainText"), "¶");
        assert_eq!(get_icon("ListItem"), "•");
        assert_eq!(get_icon("CodeBlock"), "𝒱");
        assert_eq!(get_icon("Divider"), "⎯");
        assert_eq!(get_icon("Image"), "▣");
        assert_eq!(get_icon("Presentation"), "\"");
    }

    #[test]
    fn test_unknown_node_type() {
        assert_eq!(get_icon("UnknownType"), "○");
    }
}
