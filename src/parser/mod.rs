//! Error-tolerant parser for Ballerina
//!
//! This module provides a lossless parser using:
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! We build a lossless CST that preserves all whitespace and comments, then
//! extract an AST layer on top.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Rule dispatcher → grammar productions, lookahead, precedence climbing, recovery
//!     ↓
//! GreenNode tree (immutable, cheap to clone) + SyntaxError list
//!     ↓
//! SyntaxNode (rowan) → CST with parent pointers
//!     ↓
//! AST layer → Typed wrappers over SyntaxNode
//! ```
//!
//! ## Ambiguity
//!
//! Most decisions are made from one token of lookahead. Where the grammar
//! needs more (type versus expression at statement start, the parenthesized
//! forms, invocation versus plain reference) the [`lookahead`] module parses
//! each candidate speculatively, with a bounded token budget, and commits to
//! the first one that parses cleanly.

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
pub mod cursor;
pub mod errors;
pub mod grammar;
pub mod lexer;
pub mod lookahead;
pub mod precedence;
pub mod predicates;
pub mod recovery;
pub mod rule_parser;
pub mod rules;
mod syntax_kind;
pub mod token_set;

pub use errors::{ErrorCode, ParseContext, SyntaxError};
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{Checkpoint, Parse, ParseOptions, Parser, parse, parse_with};
pub use syntax_kind::{
    BallerinaLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxNodeChildren, SyntaxToken,
};
pub use token_set::TokenSet;

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};
