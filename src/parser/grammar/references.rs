//! Variable reference chains
//!
//! ```text
//! Ref     = Ref '[' Expr ']'                INDEX_EXPR          bp 4
//!         | Ref ('.' | '!') (name | '*')    FIELD_EXPR          bp 3
//!         | Ref '@' ('[' Expr ']')?         XML_ATTRIBUTE_EXPR  bp 2
//!         | Ref ('.' | '!') name Args       CALL_EXPR           bp 1
//!         | Primary
//! Primary = name_ref Args                   FUNCTION_CALL
//!         | name_ref
//! ```
//!
//! Every operator is postfix, so a chain folds strictly left to right:
//! `a[0].b()` is `CALL(FIELD(INDEX(a, 0), b), ())`.

use super::expressions::EXPRESSION_START;
use super::{expression, name_ref};
use crate::parser::errors::ErrorCode;
use crate::parser::lookahead::{self, Alternative, Guard};
use crate::parser::parser::{Checkpoint, Parser};
use crate::parser::precedence::{Climbing, Fixity, OperatorDescriptor, climb, lookup};
use crate::parser::predicates;
use crate::parser::recovery;
use crate::parser::rules::{Rule, parse_rule};
use crate::parser::syntax_kind::SyntaxKind;
use crate::parser::token_set::TokenSet;

/// Tokens that can start a variable reference
pub(crate) const REFERENCE_START: TokenSet =
    TokenSet::new(&[SyntaxKind::IDENT, SyntaxKind::ERROR_KW]);

const ARGUMENT_START: TokenSet = TokenSet::single(SyntaxKind::ELLIPSIS).union(EXPRESSION_START);

pub struct ReferenceClimbing;

impl Climbing for ReferenceClimbing {
    const NAME: &'static str = "variable reference";
    const RULE: Rule = Rule::VariableReference;
    const FIRST: TokenSet = REFERENCE_START;
    const OPERATORS: &'static [OperatorDescriptor] = &[
        OperatorDescriptor::new(SyntaxKind::L_BRACKET, 4, Fixity::Postfix, SyntaxKind::INDEX_EXPR),
        OperatorDescriptor::new(SyntaxKind::DOT, 3, Fixity::Postfix, SyntaxKind::FIELD_EXPR),
        OperatorDescriptor::new(SyntaxKind::BANG, 3, Fixity::Postfix, SyntaxKind::FIELD_EXPR),
        OperatorDescriptor::new(
            SyntaxKind::AT,
            2,
            Fixity::Postfix,
            SyntaxKind::XML_ATTRIBUTE_EXPR,
        ),
        OperatorDescriptor::new(SyntaxKind::DOT, 1, Fixity::Postfix, SyntaxKind::CALL_EXPR),
        OperatorDescriptor::new(SyntaxKind::BANG, 1, Fixity::Postfix, SyntaxKind::CALL_EXPR),
    ];

    fn primary(p: &mut Parser<'_>) -> bool {
        lookahead::dispatch(p, REFERENCE_PRIMARIES)
    }

    fn peek_operator(p: &mut Parser<'_>) -> Option<OperatorDescriptor> {
        let kind = p.current_kind();
        match kind {
            SyntaxKind::DOT | SyntaxKind::BANG
                if p.nth(1) == SyntaxKind::IDENT && p.nth(2) == SyntaxKind::L_PAREN =>
            {
                Self::OPERATORS
                    .iter()
                    .find(|op| op.kind == kind && op.node == SyntaxKind::CALL_EXPR)
                    .copied()
            }
            SyntaxKind::BANG if p.nth(1) != SyntaxKind::IDENT => None,
            // x@ reads attributes only when attached to the reference
            SyntaxKind::AT if !p.is_adjacent(0) => None,
            _ => lookup(Self::OPERATORS, kind),
        }
    }

    fn apply(p: &mut Parser<'_>, lhs: Checkpoint, op: &OperatorDescriptor) {
        match op.node {
            SyntaxKind::INDEX_EXPR => {
                p.bump(); // [
                expression(p);
                p.expect(SyntaxKind::R_BRACKET);
            }
            SyntaxKind::FIELD_EXPR => {
                p.bump(); // . or !
                if !p.eat(SyntaxKind::STAR) {
                    field_name(p);
                }
            }
            SyntaxKind::XML_ATTRIBUTE_EXPR => {
                p.bump(); // @
                if p.eat(SyntaxKind::L_BRACKET) {
                    expression(p);
                    p.expect(SyntaxKind::R_BRACKET);
                }
            }
            _ => {
                p.bump(); // . or !
                field_name(p);
                p.wrap(lhs, SyntaxKind::FIELD_EXPR);
                parse_rule(p, Rule::ArgumentList);
            }
        }
        p.wrap(lhs, op.node);
    }
}

static REFERENCE_PRIMARIES: &[Alternative] = &[
    Alternative::new(
        "function invocation",
        Guard::Custom(at_function_invocation),
        function_invocation,
    ),
    Alternative::new(
        "name reference",
        Guard::Custom(at_name_reference),
        name_ref,
    ),
];

// Disjoint from the invocation guard: `f(` always commits to the call
fn at_name_reference(p: &Parser<'_>) -> bool {
    p.at(SyntaxKind::IDENT) && !at_function_invocation(p)
}

fn at_function_invocation(p: &Parser<'_>) -> bool {
    match p.current_kind() {
        SyntaxKind::ERROR_KW => p.nth(1) == SyntaxKind::L_PAREN,
        SyntaxKind::IDENT => {
            p.nth(1) == SyntaxKind::L_PAREN
                || (predicates::qualified_colon(p, 1) && p.nth(3) == SyntaxKind::L_PAREN)
        }
        _ => false,
    }
}

/// `foo(args)`, `io:println(args)`, `error(reason)`
fn function_invocation(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::FUNCTION_CALL);
    if p.at(SyntaxKind::ERROR_KW) {
        p.start_node(SyntaxKind::NAME_REF);
        p.bump();
        p.finish_node();
    } else {
        name_ref(p);
    }
    parse_rule(p, Rule::ArgumentList);
    p.finish_node();
}

fn field_name(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::NAME_REF);
    p.expect(SyntaxKind::IDENT);
    p.finish_node();
}

pub(crate) fn variable_reference(p: &mut Parser<'_>) {
    let min_bp = p.frame_min_bp();
    if !climb::<ReferenceClimbing>(p, min_bp) {
        recovery::recover_unexpected(p, REFERENCE_START, ErrorCode::E0301);
    }
}

/// `(a, name = b, ...rest)`
pub(crate) fn argument_list(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::ARG_LIST);
    p.expect(SyntaxKind::L_PAREN);
    while !p.at(SyntaxKind::R_PAREN) && !p.at_eof() {
        let before = p.bumped();
        argument(p);
        if p.at(SyntaxKind::R_PAREN) || p.bumped() == before {
            break;
        }
        p.expect(SyntaxKind::COMMA);
    }
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

fn argument(p: &mut Parser<'_>) {
    if p.at(SyntaxKind::IDENT) && p.nth(1) == SyntaxKind::EQ {
        p.start_node(SyntaxKind::NAMED_ARG);
        super::name(p);
        p.bump(); // =
        expression(p);
        p.finish_node();
    } else if p.at(SyntaxKind::ELLIPSIS) {
        p.start_node(SyntaxKind::REST_ARG);
        p.bump();
        expression(p);
        p.finish_node();
    } else if p.at_set(EXPRESSION_START) {
        expression(p);
    } else {
        recovery::recover_unexpected(p, ARGUMENT_START, ErrorCode::E0405);
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::rule_parser::parse_rule;
    use crate::parser::rules::Rule;
    use crate::parser::{SyntaxKind, SyntaxNode};

    fn reference(source: &str) -> SyntaxNode {
        let result = parse_rule(Rule::VariableReference, source);
        assert!(result.is_ok(), "{source}: {:?}", result.errors());
        let root = result.syntax();
        root.first_child().unwrap_or(root)
    }

    fn shape(node: &SyntaxNode) -> String {
        let children: Vec<String> = node.children().map(|c| shape(&c)).collect();
        if children.is_empty() {
            format!("{:?}", node.kind())
        } else {
            format!("{:?}({})", node.kind(), children.join(" "))
        }
    }

    #[test]
    fn test_chain_folds_left_to_right() {
        let node = reference("a[0].b()");
        assert_eq!(
            shape(&node),
            "CALL_EXPR(FIELD_EXPR(INDEX_EXPR(NAME_REF LITERAL) NAME_REF) ARG_LIST)"
        );
    }

    #[test]
    fn test_invocation_wins_over_name_reference() {
        assert_eq!(reference("foo(1)").kind(), SyntaxKind::FUNCTION_CALL);
        assert_eq!(reference("io:println(\"hi\")").kind(), SyntaxKind::FUNCTION_CALL);
        assert_eq!(reference("foo").kind(), SyntaxKind::NAME_REF);
    }

    #[test]
    fn test_field_and_attribute_access() {
        assert_eq!(reference("person.name").kind(), SyntaxKind::FIELD_EXPR);
        assert_eq!(reference("j!name").kind(), SyntaxKind::FIELD_EXPR);
        assert_eq!(reference("x@[\"id\"]").kind(), SyntaxKind::XML_ATTRIBUTE_EXPR);
    }

    #[test]
    fn test_named_and_rest_arguments() {
        let node = reference("f(1, name = \"x\", ...rest)");
        let args: Vec<_> = node
            .descendants()
            .filter(|n| matches!(n.kind(), SyntaxKind::NAMED_ARG | SyntaxKind::REST_ARG))
            .map(|n| n.kind())
            .collect();
        assert_eq!(args, vec![SyntaxKind::NAMED_ARG, SyntaxKind::REST_ARG]);
    }

    #[test]
    fn test_missing_argument_separator() {
        let result = parse_rule(Rule::VariableReference, "f(a b)");
        assert_eq!(result.errors().len(), 1);
    }
}
