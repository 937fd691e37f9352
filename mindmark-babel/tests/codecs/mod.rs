//! Codec laws
//!
//! Property tests for the code-block payload codec and the indent model.

use mindmark_babel::common::code_block::{decode, encode};
use mindmark_babel::common::indent::{indent_level_of, render_indent};
use proptest::prelude::*;

proptest! {
    #[test]
    fn code_payload_round_trips(
        lines in prop::collection::vec("[ a-z<>&\"'\t]{0,12}", 0..6),
        language in "[a-z]{0,4}",
    ) {
        let decoded = decode(&encode(&lines, &language));
        prop_assert_eq!(decoded.language, language);
        prop_assert_eq!(decoded.lines, lines);
    }

    #[test]
    fn rendered_indent_measures_back(level in 0usize..32) {
        prop_assert_eq!(indent_level_of(&render_indent(level)), level);
    }

    #[test]
    fn spaces_measure_in_groups_of_four(spaces in 0usize..64) {
        prop_assert_eq!(indent_level_of(&" ".repeat(spaces)), spaces / 4);
    }
}

#[test]
fn test_code_payload_with_tricky_line() {
    let lines = vec![
        "    if a < b && c {".to_string(),
        "".to_string(),
        "\treturn 'x';".to_string(),
    ];
    let decoded = decode(&encode(&lines, "rust"));
    assert_eq!(decoded.lines, lines);
}
