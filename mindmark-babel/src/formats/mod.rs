//! Format implementations
//!
//! This module contains all format implementations that convert between
//! outline forests and various text representations.

pub mod clipboard;
pub mod common;
pub mod icons;
pub mod json;
pub mod markdown;
pub mod text;
pub mod treeviz;

pub use clipboard::ClipboardFormat;
pub use json::JsonFormat;
pub use markdown::{MarkdownFormat, MarkdownOptions};
pub use text::{TextFormat, TextOptions};
pub use treeviz::TreevizFormat;
