//! Foundation types for the Ballerina front end.
//!
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`Position`], [`Span`] - Line/column ranges for diagnostics
//!
//! This module has NO dependencies on other balsyn modules.

mod line_index;
mod position;

pub use line_index::{LineCol, LineIndex};
pub use position::{Position, Span};

pub use text_size::{TextRange, TextSize};

/// Extension of Ballerina source files
pub const SOURCE_EXTENSION: &str = "bal";
