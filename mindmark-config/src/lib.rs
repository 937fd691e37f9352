//! Shared configuration loader for the mindmark toolchain.
//!
//! `defaults/mindmark.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MindmarkConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/mindmark.default.toml");

/// Top-level configuration consumed by mindmark applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MindmarkConfig {
    pub markdown: MarkdownConfig,
    pub json: JsonConfig,
    pub text: TextConfig,
    pub inspect: InspectConfig,
}

/// Mirrors the knobs exposed by the Markdown serializer.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownConfig {
    pub start_header_level: usize,
    pub preserve_line_format: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonConfig {
    pub pretty: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextConfig {
    pub indent_string: String,
}

/// Controls inspect output.
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub treeviz: TreevizConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreevizConfig {
    pub show_indent: bool,
}

impl MindmarkConfig {
    /// Format parameters implied by the configuration, keyed the way
    /// `Format::serialize_with_options` expects them.
    ///
    /// Formats without a section get an empty map.
    pub fn format_options(&self, format: &str) -> HashMap<String, String> {
        let mut options = HashMap::new();
        match format {
            "markdown" => {
                options.insert(
                    "start-header-level".to_string(),
                    self.markdown.start_header_level.to_string(),
                );
                options.insert(
                    "preserve-line-format".to_string(),
                    self.markdown.preserve_line_format.to_string(),
                );
            }
            "json" => {
                options.insert("pretty".to_string(), self.json.pretty.to_string());
            }
            "text" => {
                options.insert("indent".to_string(), self.text.indent_string.clone());
            }
            "treeviz" => {
                options.insert(
                    "show-indent".to_string(),
                    self.inspect.treeviz.show_indent.to_string(),
                );
            }
            _ => {}
        }
        options
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MindmarkConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MindmarkConfig, ConfigError> {
    Loader::new().build()
}
