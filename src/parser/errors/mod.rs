//! Parser error handling module
//!
//! - Categorized error codes for filtering and documentation
//! - Context-aware error messages derived from the active rule frame
//! - Expected/found token information on every diagnostic
//! - Related span tracking (e.g., "opened here" for unclosed braces)

mod codes;
mod context;
mod error;

pub use codes::ErrorCode;
pub use context::ParseContext;
pub use error::{
    RelatedInfo, SyntaxError, SyntaxErrorBuilder, expectation_message,
    unexpected_message,
};
