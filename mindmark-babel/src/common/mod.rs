//! Building blocks shared by the formats: indentation, inline styles, code payloads and
//! entity handling.

pub mod code_block;
pub mod entities;
pub mod indent;
pub mod inline;
pub mod line_format;
pub mod style;
