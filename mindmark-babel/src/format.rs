//! The seam between outline text and the mind-map forest
//!
//! Markdown, the clipboard payload, JSON and the plain-text dumps each implement [`Format`]. The
//! registry dispatches on format names, so a new outline encoding only has to implement this
//! trait and be registered.

use crate::error::FormatError;
use crate::tree::RichNode;
use std::collections::HashMap;

/// An encoding of a mind-map forest.
///
/// A format reads a document into root [`RichNode`]s, writes roots back out, or does both. The
/// treeviz dump only writes; the clipboard payload does both.
///
/// # Examples
///
/// ```ignore
/// /// Root titles, one per line.
/// struct TitlesFormat;
///
/// impl Format for TitlesFormat {
///     fn name(&self) -> &str {
///         "titles"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, forest: &[RichNode]) -> Result<String, FormatError> {
///         let titles: Vec<String> = forest.iter().map(|root| root.title.plain_text()).collect();
///         Ok(titles.join("\n"))
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// Registry key, also the value of `--from`/`--to`.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Extensions, without the dot, that select this format when `--from` is omitted.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn supports_parsing(&self) -> bool {
        false
    }

    fn supports_serialization(&self) -> bool {
        false
    }

    /// Read a document into its root nodes.
    fn parse(&self, _source: &str) -> Result<Vec<RichNode>, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Write root nodes out as a document.
    fn serialize(&self, _forest: &[RichNode]) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }

    /// Write root nodes with `--extra-*` parameters, such as Markdown's `start-header-level`.
    ///
    /// The default accepts no parameters and falls back to [`Format::serialize`].
    fn serialize_with_options(
        &self,
        forest: &[RichNode],
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        if options.is_empty() {
            self.serialize(forest)
        } else {
            Err(FormatError::NotSupported(format!(
                "Format '{}' does not support extra parameters",
                self.name()
            )))
        }
    }
}
