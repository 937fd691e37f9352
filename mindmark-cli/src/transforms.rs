//! CLI-specific transforms
//!
//! Debugging views of a Markdown file, used by `mindmark inspect`. Each transform names the stage
//! it looks at and the output form:
//!
//! - `tree-treeviz`: the parsed forest as a box-drawing tree (default)
//! - `tree-json`: the parsed forest as pretty JSON
//! - `line-classes`: how every source line is classified before parent search
//!
//! ## Extra Parameters
//!
//! - `show-indent`: `tree-treeviz` only, appends the source indent of list nodes
//!
//! Example: `mindmark inspect notes.md tree-treeviz --extra-show-indent`

use mindmark_babel::common::indent::{classify_line, heading_level};
use mindmark_babel::formats::treeviz::to_treeviz_str_with_params;
use mindmark_babel::markdown_to_tree;
use mindmark_babel::tree::json::forest_to_json;
use std::collections::HashMap;

/// All available CLI transforms (stage + format combinations)
pub const AVAILABLE_TRANSFORMS: &[&str] = &["tree-treeviz", "tree-json", "line-classes"];

/// Execute a named transform on Markdown source with optional extra parameters
///
/// # Examples
///
/// ```ignore
/// let output = execute_transform("# A\n- b", "tree-treeviz", &HashMap::new())?;
/// ```
pub fn execute_transform(
    source: &str,
    transform_name: &str,
    extra_params: &HashMap<String, String>,
) -> Result<String, String> {
    match transform_name {
        "tree-treeviz" => {
            let forest = markdown_to_tree(source).map_err(|e| format!("Transform failed: {e}"))?;
            to_treeviz_str_with_params(&forest, extra_params).map_err(|e| e.to_string())
        }
        "tree-json" => {
            reject_params(transform_name, extra_params)?;
            let forest = markdown_to_tree(source).map_err(|e| format!("Transform failed: {e}"))?;
            forest_to_json(&forest, true).map_err(|e| e.to_string())
        }
        "line-classes" => {
            reject_params(transform_name, extra_params)?;
            Ok(line_classes(source))
        }
        _ => Err(format!(
            "Unknown transform '{transform_name}'. Available: {}",
            AVAILABLE_TRANSFORMS.join(", ")
        )),
    }
}

fn reject_params(transform_name: &str, params: &HashMap<String, String>) -> Result<(), String> {
    if params.is_empty() {
        return Ok(());
    }
    let mut keys: Vec<_> = params.keys().map(String::as_str).collect();
    keys.sort();
    Err(format!(
        "Transform '{transform_name}' takes no extra parameters (got: {})",
        keys.join(", ")
    ))
}

/// One line per source line: line number, class, indent level and trimmed content.
///
/// Fenced code is reported as `code` without classifying its contents, the same way the parser
/// skips it.
fn line_classes(source: &str) -> String {
    let mut output = String::new();
    let mut in_fence = false;

    for (index, raw_line) in source.lines().enumerate() {
        let class = classify_line(raw_line);
        let is_fence = class.content.starts_with("```");

        let label = if is_fence {
            in_fence = !in_fence;
            "fence".to_string()
        } else if in_fence {
            "code".to_string()
        } else if class.content.is_empty() {
            "blank".to_string()
        } else if let Some(level) = heading_level(&class.content).filter(|_| class.is_header) {
            format!("h{level}")
        } else if class.is_list {
            "list".to_string()
        } else {
            "text".to_string()
        };

        output.push_str(&format!(
            "{:02} {:<5} L{} {}\n",
            index + 1,
            label,
            class.level,
            class.content
        ));
    }

    output
}
