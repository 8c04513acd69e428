//! Rule-based parser for testing individual grammar rules
//!
//! Parses one grammar construct in isolation, without a surrounding
//! compilation unit. The result is rooted at a `FRAGMENT` node.
//!
//! # Example
//!
//! ```
//! use balsyn::parser::rule_parser::{Rule, parse_rule};
//!
//! let result = parse_rule(Rule::Expression, "a + b * c");
//! assert!(result.is_ok());
//! ```

use super::errors::{ErrorCode, SyntaxError};
use super::lexer::tokenize;
use super::parser::{Parse, ParseOptions, Parser, with_stack_for};
use super::rules;
use super::syntax_kind::SyntaxKind;

pub use super::rules::Rule;

/// Result of parsing a single rule
#[derive(Debug, Clone)]
pub struct RuleParseResult {
    /// The parse result with green tree and errors
    pub parse: Parse,
    /// The rule that was parsed
    pub rule: Rule,
    /// The original input
    pub input: String,
}

impl RuleParseResult {
    /// Check if parsing succeeded without errors
    pub fn is_ok(&self) -> bool {
        self.parse.ok()
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.parse.errors
    }

    pub fn syntax(&self) -> super::SyntaxNode {
        self.parse.syntax()
    }

    /// True when the rule itself accepted every significant token
    pub fn fully_consumed(&self) -> bool {
        !self
            .syntax()
            .children()
            .any(|n| n.kind() == SyntaxKind::ERROR && n.next_sibling().is_none())
    }
}

/// Parse `input` as a single `rule`
pub fn parse_rule(rule: Rule, input: &str) -> RuleParseResult {
    parse_rule_with(rule, input, &ParseOptions::default())
}

pub fn parse_rule_with(rule: Rule, input: &str, options: &ParseOptions) -> RuleParseResult {
    let tokens = tokenize(input);
    let parse = with_stack_for(&tokens, options, |options| {
        let mut p = Parser::new(&tokens, input, options);
        p.start_root(SyntaxKind::FRAGMENT);
        rules::parse_rule(&mut p, rule);
        if !p.at_eof() {
            let error = SyntaxError::builder(ErrorCode::E0901)
                .message(format!("unexpected trailing input after {rule:?}"))
                .range(p.current_range())
                .found(p.current_kind())
                .build();
            p.push_error(error);
        }
        p.dump_remaining();
        p.flush_trailing();
        p.finish_node();
        p.finish()
    });
    RuleParseResult {
        parse,
        rule,
        input: input.to_string(),
    }
}
