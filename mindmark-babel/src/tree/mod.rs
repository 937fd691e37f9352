//! The mind-map outline tree.
//!
//! `nodes` holds the canonical in-memory shape; `json` is the only place that knows about the
//! wire shapes trees arrive in.

pub mod json;
pub mod nodes;

pub use nodes::{
    ImageDescriptor, NodeKind, RichNode, StyleAttributes, StyleRun, StyledText, Title,
};
