//! # ballerina-syntax
//!
//! Error-tolerant syntactic front end for Ballerina: a logos lexer, a
//! rule-dispatching parser with bounded speculative lookahead and
//! precedence climbing, and a lossless rowan CST with a typed AST on top.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → source tree loading, parallel batch parsing
//!   ↓
//! parser    → lexer, rule dispatcher, lookahead, precedence, recovery, CST/AST
//!   ↓
//! base      → Position/Span, LineIndex, TextRange
//! ```
//!
//! ## Example
//!
//! ```
//! let parse = balsyn::parse("function main() { int x = 1 + 2 * 3; }");
//! assert!(parse.ok());
//! let unit = parse.tree().unwrap();
//! assert_eq!(unit.functions().count(), 1);
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → project)
// ============================================================================

/// Foundation types: Position/Span, LineIndex, TextRange
pub mod base;

/// Parser: logos lexer, rule dispatcher, rowan CST, typed AST
pub mod parser;

/// Source tree loading and parallel parsing
pub mod project;

pub use base::{LineCol, LineIndex, Position, Span, TextRange, TextSize};
pub use parser::{
    ErrorCode, Parse, ParseOptions, SyntaxError, SyntaxKind, SyntaxNode, parse, parse_with,
};
