//! Format registry for format discovery and selection
//!
//! Formats register under their name; the CLI resolves `--from`/`--to` values and file
//! extensions through here and never touches format types directly.

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::{ClipboardFormat, JsonFormat, MarkdownFormat, TextFormat, TreevizFormat};
use crate::tree::RichNode;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Registry of outline formats, keyed by format name.
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::default();
/// let markdown = registry.convert(tree_json, "json", "markdown", &HashMap::new())?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format, replacing any format of the same name.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Names of all registered formats, sorted.
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Names of the formats that can read a forest, sorted.
    pub fn parsers(&self) -> Vec<String> {
        self.filtered(|format| format.supports_parsing())
    }

    /// Names of the formats that can write a forest, sorted.
    pub fn serializers(&self) -> Vec<String> {
        self.filtered(|format| format.supports_serialization())
    }

    fn filtered(&self, keep: impl Fn(&dyn Format) -> bool) -> Vec<String> {
        self.list_formats()
            .into_iter()
            .filter(|name| self.formats.get(name).is_some_and(|f| keep(f.as_ref())))
            .collect()
    }

    /// Format name for a file, from its extension (case-insensitive).
    ///
    /// Formats are checked in name order, so an extension shared by two formats always resolves
    /// to the same one.
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_lowercase();

        self.list_formats().into_iter().find(|name| {
            self.formats
                .get(name)
                .is_some_and(|format| format.file_extensions().contains(&extension.as_str()))
        })
    }

    pub fn parse(&self, source: &str, format: &str) -> Result<Vec<RichNode>, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support parsing"
            )));
        }
        fmt.parse(source)
    }

    pub fn serialize(&self, forest: &[RichNode], format: &str) -> Result<String, FormatError> {
        self.serialize_with_options(forest, format, &HashMap::new())
    }

    pub fn serialize_with_options(
        &self,
        forest: &[RichNode],
        format: &str,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support serialization"
            )));
        }
        fmt.serialize_with_options(forest, options)
    }

    /// Parse `source` as `from` and write the forest as `to`.
    ///
    /// Both format names are resolved before any parsing happens.
    pub fn convert(
        &self,
        source: &str,
        from: &str,
        to: &str,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        self.get(to)?;
        let forest = self.parse(source, from)?;
        debug!(roots = forest.len(), from, to, "converting forest");
        self.serialize_with_options(&forest, to, options)
    }

    /// Registry holding every built-in format.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(MarkdownFormat::default());
        registry.register(JsonFormat::default());
        registry.register(ClipboardFormat);
        registry.register(TextFormat::default());
        registry.register(TreevizFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
