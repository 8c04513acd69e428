//! The diagnostic record produced by the parser
//!
//! Each error pins a source range, the tokens the active rule would have
//! accepted there and the token it saw instead.

use rowan::{TextRange, TextSize};

use super::codes::ErrorCode;
use super::context::ParseContext;
use crate::parser::SyntaxKind;
use crate::parser::token_set::TokenSet;

/// A secondary location attached to a diagnostic, such as the `{` an
/// unclosed block started at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub message: String,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
    pub code: ErrorCode,
    /// Kinds that would have let the parse continue here
    pub expected: TokenSet,
    /// `None` for diagnostics not tied to a single token
    pub found: Option<SyntaxKind>,
    pub hint: Option<String>,
    pub related: Vec<RelatedInfo>,
}

impl SyntaxError {
    /// Zero-width error at `offset` carrying only a message
    pub fn at_offset(message: impl Into<String>, offset: TextSize, code: ErrorCode) -> Self {
        Self::builder(code)
            .message(message)
            .range(TextRange::empty(offset))
            .build()
    }

    pub fn builder(code: ErrorCode) -> SyntaxErrorBuilder {
        SyntaxErrorBuilder {
            code,
            message: None,
            range: None,
            expected: TokenSet::EMPTY,
            found: None,
            hint: None,
            related: Vec::new(),
        }
    }

    /// `E0201: message`, followed by an indented hint line when there is one
    pub fn format(&self) -> String {
        match &self.hint {
            Some(hint) => format!("{}: {}\n  hint: {}", self.code, self.message, hint),
            None => format!("{}: {}", self.code, self.message),
        }
    }
}

pub struct SyntaxErrorBuilder {
    code: ErrorCode,
    message: Option<String>,
    range: Option<TextRange>,
    expected: TokenSet,
    found: Option<SyntaxKind>,
    hint: Option<String>,
    related: Vec<RelatedInfo>,
}

impl SyntaxErrorBuilder {
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn range(mut self, range: TextRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn expected(mut self, expected: TokenSet) -> Self {
        self.expected = expected;
        self
    }

    pub fn found(mut self, found: SyntaxKind) -> Self {
        self.found = Some(found);
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn related(mut self, message: impl Into<String>, range: TextRange) -> Self {
        self.related.push(RelatedInfo {
            message: message.into(),
            range,
        });
        self
    }

    /// Unset message falls back to [`ErrorCode::default_message`], unset
    /// range to the start of input
    pub fn build(self) -> SyntaxError {
        let message = self
            .message
            .unwrap_or_else(|| self.code.default_message().to_string());
        SyntaxError {
            message,
            range: self.range.unwrap_or_else(|| TextRange::empty(TextSize::new(0))),
            code: self.code,
            expected: self.expected,
            found: self.found,
            hint: self.hint,
            related: self.related,
        }
    }
}

/// `expected X <context>, found Y`
pub fn expectation_message(expected: &str, context: ParseContext, found: &str) -> String {
    format!("expected {} {}, found {}", expected, context.description(), found)
}

/// `unexpected Y <context>: expected <what the context accepts>`
pub fn unexpected_message(found: &str, context: ParseContext) -> String {
    format!(
        "unexpected {} {}: expected {}",
        found,
        context.description(),
        context.expected_description()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_offset_is_zero_width() {
        let err = SyntaxError::at_offset("stray token", TextSize::new(7), ErrorCode::E0901);
        assert_eq!(err.range, TextRange::empty(TextSize::new(7)));
        assert!(err.expected.is_empty());
        assert_eq!(err.found, None);
        assert!(err.related.is_empty());
    }

    #[test]
    fn test_builder_records_expectation() {
        let err = SyntaxError::builder(ErrorCode::E0204)
            .message("expected ']' in type descriptor, found ';'")
            .range(TextRange::new(TextSize::new(4), TextSize::new(5)))
            .expected(TokenSet::single(SyntaxKind::R_BRACKET))
            .found(SyntaxKind::SEMICOLON)
            .build();
        assert!(err.expected.contains(SyntaxKind::R_BRACKET));
        assert_eq!(err.found, Some(SyntaxKind::SEMICOLON));
        assert_eq!(err.code.category_description(), "delimiter error");
        assert_eq!(err.hint, None);
    }

    #[test]
    fn test_builder_falls_back_to_default_message() {
        let err = SyntaxError::builder(ErrorCode::E0406).build();
        assert_eq!(err.message, "expected expression");
        assert_eq!(err.range.start(), TextSize::new(0));
    }

    #[test]
    fn test_format_without_hint() {
        let err = SyntaxError::at_offset("expected ';'", TextSize::new(3), ErrorCode::E0201);
        assert_eq!(err.format(), "E0201: expected ';'");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            expectation_message("';'", ParseContext::Block, "'}'"),
            "expected ';' in block, found '}'"
        );
        assert!(unexpected_message("'}'", ParseContext::TopLevel).contains("at top level"));
    }
}
