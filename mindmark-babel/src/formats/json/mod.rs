//! JSON format implementation
//!
//! The canonical tree JSON. Parsing accepts every historical shape handled by
//! [`crate::tree::json`]; serialization always writes the canonical one.
//!
//! # Parameters
//!
//! - `pretty`: indent the output (default false)

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::common::{parse_bool_flag, reject_unknown_options};
use crate::tree::json::{forest_from_json, forest_to_json};
use crate::tree::RichNode;
use std::collections::HashMap;

/// Format implementation for tree JSON
#[derive(Default)]
pub struct JsonFormat {
    pretty: bool,
}

impl JsonFormat {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Mind-map tree as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Vec<RichNode>, FormatError> {
        forest_from_json(source)
    }

    fn serialize(&self, forest: &[RichNode]) -> Result<String, FormatError> {
        forest_to_json(forest, self.pretty)
    }

    fn serialize_with_options(
        &self,
        forest: &[RichNode],
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        reject_unknown_options(self.name(), options, &["pretty"])?;
        let pretty = parse_bool_flag(options, "pretty", self.pretty)?;
        forest_to_json(forest, pretty)
    }
}
