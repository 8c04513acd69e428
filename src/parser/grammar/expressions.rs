//! Expressions
//!
//! Binding powers, loosest first:
//!
//! | bp | operators                       | node           | assoc |
//! |----|---------------------------------|----------------|-------|
//! |  2 | `but { ... }`                   | MATCH_EXPR     | postfix |
//! |  3 | `?:`                            | ELVIS_EXPR     | right |
//! |  5 | `? :`                           | TERNARY_EXPR   | right |
//! |  6 | `..` `..<` `...`                | RANGE_EXPR     | left  |
//! |  7 | `\|\|`                          | BINARY_EXPR    | left  |
//! |  8 | `&&`                            | BINARY_EXPR    | left  |
//! |  9 | `&` `^` `\|`                    | BINARY_EXPR    | left  |
//! | 10 | `==` `!=` `===` `!==`           | BINARY_EXPR    | left  |
//! | 11 | `<` `>` `<=` `>=`               | BINARY_EXPR    | left  |
//! | 12 | `<<` `>>` `>>>` (adjacent only) | BINARY_EXPR    | left  |
//! | 13 | `+` `-`                         | BINARY_EXPR    | left  |
//! | 14 | `*` `/` `%`                     | BINARY_EXPR    | left  |
//!
//! Prefix operators (`+ - ! ~ lengthof untaint check trap typeof wait`) take
//! their operand at 17 and type conversion `<T>` at 18, so both bind tighter
//! than every infix operator.

use super::{at_contextual, delimited, name, name_ref};
use crate::parser::errors::ErrorCode;
use crate::parser::lookahead::{self, Alternative, Guard};
use crate::parser::parser::{Checkpoint, Parser};
use crate::parser::precedence::{
    Climbing, Fixity, OperatorDescriptor, climb, fold, lookup, operand,
};
use crate::parser::predicates;
use crate::parser::recovery;
use crate::parser::rules::{Rule, parse_rule};
use crate::parser::syntax_kind::SyntaxKind;
use crate::parser::token_set::TokenSet;

const LITERALS: TokenSet = TokenSet::new(&[
    SyntaxKind::INTEGER_LITERAL,
    SyntaxKind::FLOAT_LITERAL,
    SyntaxKind::STRING_LITERAL,
    SyntaxKind::TRUE_KW,
    SyntaxKind::FALSE_KW,
    SyntaxKind::NULL_KW,
]);

const PREFIX_OPERATORS: TokenSet = TokenSet::new(&[
    SyntaxKind::PLUS,
    SyntaxKind::MINUS,
    SyntaxKind::BANG,
    SyntaxKind::TILDE,
    SyntaxKind::LENGTHOF_KW,
    SyntaxKind::UNTAINT_KW,
]);

/// Non-literal tokens that start a primary expression
const PRIMARY_START: TokenSet = TokenSet::new(&[
    SyntaxKind::IDENT,
    SyntaxKind::ERROR_KW,
    SyntaxKind::L_PAREN,
    SyntaxKind::L_BRACKET,
    SyntaxKind::L_BRACE,
    SyntaxKind::TABLE_KW,
    SyntaxKind::STRING_KW,
    SyntaxKind::XML_KW,
    SyntaxKind::FROM_KW,
    SyntaxKind::FUNCTION_KW,
    SyntaxKind::NEW_KW,
    SyntaxKind::START_KW,
    SyntaxKind::LARROW,
    SyntaxKind::WAIT_KW,
    SyntaxKind::CHECK_KW,
    SyntaxKind::TRAP_KW,
    SyntaxKind::TYPEOF_KW,
    SyntaxKind::LT,
]);

/// Tokens that can start an expression
pub(crate) const EXPRESSION_START: TokenSet = LITERALS.union(PREFIX_OPERATORS).union(PRIMARY_START);

const PREFIX_BP: u8 = 17;
const CONVERSION_BP: u8 = 18;

pub struct ExpressionClimbing;

impl Climbing for ExpressionClimbing {
    const NAME: &'static str = "expression";
    const RULE: Rule = Rule::Expression;
    const FIRST: TokenSet = EXPRESSION_START;
    const OPERATORS: &'static [OperatorDescriptor] = &[
        binary(SyntaxKind::STAR, 14),
        binary(SyntaxKind::SLASH, 14),
        binary(SyntaxKind::PERCENT, 14),
        binary(SyntaxKind::PLUS, 13),
        binary(SyntaxKind::MINUS, 13),
        binary(SyntaxKind::SHL, 12),
        binary(SyntaxKind::SHR, 12),
        binary(SyntaxKind::USHR, 12),
        binary(SyntaxKind::LT, 11),
        binary(SyntaxKind::GT, 11),
        binary(SyntaxKind::LT_EQ, 11),
        binary(SyntaxKind::GT_EQ, 11),
        binary(SyntaxKind::EQ_EQ, 10),
        binary(SyntaxKind::BANG_EQ, 10),
        binary(SyntaxKind::EQ_EQ_EQ, 10),
        binary(SyntaxKind::BANG_EQ_EQ, 10),
        binary(SyntaxKind::AMP, 9),
        binary(SyntaxKind::CARET, 9),
        binary(SyntaxKind::PIPE, 9),
        binary(SyntaxKind::AMP_AMP, 8),
        binary(SyntaxKind::PIPE_PIPE, 7),
        OperatorDescriptor::new(SyntaxKind::DOT_DOT, 6, Fixity::BinaryLeft, SyntaxKind::RANGE_EXPR),
        OperatorDescriptor::new(
            SyntaxKind::DOT_DOT_LT,
            6,
            Fixity::BinaryLeft,
            SyntaxKind::RANGE_EXPR,
        ),
        OperatorDescriptor::new(
            SyntaxKind::ELLIPSIS,
            6,
            Fixity::BinaryLeft,
            SyntaxKind::RANGE_EXPR,
        ),
        OperatorDescriptor::new(SyntaxKind::QUESTION, 5, Fixity::Ternary, SyntaxKind::TERNARY_EXPR),
        OperatorDescriptor::new(SyntaxKind::ELVIS, 3, Fixity::BinaryRight, SyntaxKind::ELVIS_EXPR),
        OperatorDescriptor::new(SyntaxKind::BUT_KW, 2, Fixity::Postfix, SyntaxKind::MATCH_EXPR),
    ];

    fn primary(p: &mut Parser<'_>) -> bool {
        match p.current_kind() {
            kind if LITERALS.contains(kind) => {
                p.start_node(SyntaxKind::LITERAL);
                p.bump();
                p.finish_node();
            }
            SyntaxKind::IDENT if p.nth(1) == SyntaxKind::FAT_ARROW && arrow_allowed(p) => {
                arrow_function(p)
            }
            SyntaxKind::IDENT => reference_or_action(p),
            SyntaxKind::ERROR_KW if p.nth(1) == SyntaxKind::L_PAREN => reference_or_action(p),
            SyntaxKind::L_PAREN => return lookahead::dispatch(p, PAREN_EXPRESSIONS),
            SyntaxKind::L_BRACKET => array_literal(p),
            SyntaxKind::L_BRACE => record_literal(p),
            SyntaxKind::TABLE_KW if p.nth(1) == SyntaxKind::L_BRACE => table_literal(p),
            SyntaxKind::STRING_KW if p.nth(1) == SyntaxKind::BACKTICK => {
                parse_rule(p, Rule::StringTemplate);
            }
            SyntaxKind::XML_KW if p.nth(1) == SyntaxKind::BACKTICK => {
                parse_rule(p, Rule::XmlLiteral);
            }
            SyntaxKind::FROM_KW => {
                parse_rule(p, Rule::TableQuery);
            }
            SyntaxKind::FUNCTION_KW => lambda(p),
            SyntaxKind::NEW_KW => type_init(p),
            SyntaxKind::START_KW => {
                p.start_node(SyntaxKind::START_EXPR);
                p.bump();
                reference_or_action(p);
                p.finish_node();
            }
            SyntaxKind::LARROW => {
                p.start_node(SyntaxKind::WORKER_RECEIVE_EXPR);
                p.bump();
                name_ref(p);
                p.finish_node();
            }
            SyntaxKind::WAIT_KW => {
                p.start_node(SyntaxKind::WAIT_EXPR);
                p.bump();
                if p.at(SyntaxKind::L_BRACE) {
                    record_literal(p);
                } else {
                    operand::<Self>(p, PREFIX_BP);
                }
                p.finish_node();
            }
            SyntaxKind::LT => type_conversion(p),
            SyntaxKind::CHECK_KW => unary(p, SyntaxKind::CHECK_EXPR),
            SyntaxKind::TRAP_KW => unary(p, SyntaxKind::TRAP_EXPR),
            SyntaxKind::TYPEOF_KW => unary(p, SyntaxKind::TYPEOF_EXPR),
            kind if PREFIX_OPERATORS.contains(kind) => unary(p, SyntaxKind::PREFIX_EXPR),
            _ => return false,
        }
        true
    }

    fn peek_operator(p: &mut Parser<'_>) -> Option<OperatorDescriptor> {
        if p.at(SyntaxKind::LT) || p.at(SyntaxKind::GT) {
            if let Some(shift) = predicates::shift_operator(p) {
                // a >>= b is an assignment, which ends the expression
                if shift.is_assignment() {
                    return None;
                }
                return lookup(Self::OPERATORS, shift.kind);
            }
        }
        lookup(Self::OPERATORS, p.current_kind())
    }

    fn consume_operator(p: &mut Parser<'_>, op: &OperatorDescriptor) {
        match op.kind {
            SyntaxKind::SHL | SyntaxKind::SHR | SyntaxKind::USHR => {
                let width = predicates::shift_operator(p).map_or(1, |s| s.width);
                p.bump_joined(op.kind, width);
            }
            _ => p.bump(),
        }
    }

    fn apply(p: &mut Parser<'_>, lhs: Checkpoint, op: &OperatorDescriptor) {
        if op.node == SyntaxKind::MATCH_EXPR {
            p.bump(); // but
            match_arms(p);
            p.wrap(lhs, SyntaxKind::MATCH_EXPR);
        } else {
            fold::<Self>(p, lhs, op);
        }
    }
}

const fn binary(kind: SyntaxKind, bp: u8) -> OperatorDescriptor {
    OperatorDescriptor::new(kind, bp, Fixity::BinaryLeft, SyntaxKind::BINARY_EXPR)
}

pub(crate) fn expression(p: &mut Parser<'_>) {
    let min_bp = p.frame_min_bp();
    if !climb::<ExpressionClimbing>(p, min_bp) {
        recovery::recover_unexpected(p, EXPRESSION_START, ErrorCode::E0406);
    }
}

fn unary(p: &mut Parser<'_>, kind: SyntaxKind) {
    p.start_node(kind);
    p.bump();
    operand::<ExpressionClimbing>(p, PREFIX_BP);
    p.finish_node();
}

/// A reference chain, optionally followed by a remote action `ep->call(args)`
fn reference_or_action(p: &mut Parser<'_>) {
    let cp = p.checkpoint();
    parse_rule(p, Rule::VariableReference);
    if p.at(SyntaxKind::ARROW)
        && p.nth(1) == SyntaxKind::IDENT
        && p.nth(2) == SyntaxKind::L_PAREN
    {
        p.bump(); // ->
        name_ref(p);
        parse_rule(p, Rule::ArgumentList);
        p.wrap(cp, SyntaxKind::ACTION_INVOCATION);
    }
}

/// `<T> expr` or `<T, converter()> expr`
fn type_conversion(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::TYPE_CONVERSION_EXPR);
    p.bump(); // <
    parse_rule(p, Rule::TypeDescriptor);
    if p.eat(SyntaxKind::COMMA) {
        parse_rule(p, Rule::VariableReference);
    }
    p.expect(SyntaxKind::GT);
    operand::<ExpressionClimbing>(p, CONVERSION_BP);
    p.finish_node();
}

fn array_literal(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::ARRAY_LITERAL);
    p.bump(); // [
    delimited(p, SyntaxKind::R_BRACKET, super::expression);
    p.expect(SyntaxKind::R_BRACKET);
    p.finish_node();
}

/// `{ key: value, "key": value, [computed]: value }`
pub(crate) fn record_literal(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::RECORD_LITERAL);
    p.expect(SyntaxKind::L_BRACE);
    delimited(p, SyntaxKind::R_BRACE, record_field);
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();
}

fn record_field(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::RECORD_FIELD);
    match p.current_kind() {
        SyntaxKind::IDENT | SyntaxKind::STRING_LITERAL if p.nth(1) == SyntaxKind::COLON => {
            p.bump();
        }
        SyntaxKind::L_BRACKET => {
            p.bump();
            super::expression(p);
            p.expect(SyntaxKind::R_BRACKET);
        }
        _ => super::expression(p),
    }
    p.expect(SyntaxKind::COLON);
    super::expression(p);
    p.finish_node();
}

/// `table { { key id, name }, [ { 1, "a" }, { 2, "b" } ] }`
fn table_literal(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::TABLE_LITERAL);
    p.bump(); // table
    p.expect(SyntaxKind::L_BRACE);
    if p.at(SyntaxKind::L_BRACE) {
        p.start_node(SyntaxKind::TABLE_COLUMNS);
        p.bump();
        delimited(p, SyntaxKind::R_BRACE, |p| {
            if at_contextual(p, "key") && p.nth(1) == SyntaxKind::IDENT {
                p.bump();
            }
            name(p);
        });
        p.expect(SyntaxKind::R_BRACE);
        p.finish_node();
        p.eat(SyntaxKind::COMMA);
    }
    if p.eat(SyntaxKind::L_BRACKET) {
        delimited(p, SyntaxKind::R_BRACKET, |p| {
            p.start_node(SyntaxKind::TABLE_ROW);
            p.expect(SyntaxKind::L_BRACE);
            delimited(p, SyntaxKind::R_BRACE, super::expression);
            p.expect(SyntaxKind::R_BRACE);
            p.finish_node();
        });
        p.expect(SyntaxKind::R_BRACKET);
    }
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();
}

fn lambda(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::LAMBDA_EXPR);
    p.bump(); // function
    parse_rule(p, Rule::ParameterList);
    if p.at(SyntaxKind::RETURNS_KW) {
        super::module::return_type(p);
    }
    super::block(p);
    p.finish_node();
}

/// `new`, `new(args)`, `new Type(args)`
fn type_init(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::TYPE_INIT_EXPR);
    p.bump(); // new
    if p.at(SyntaxKind::IDENT) {
        super::types::type_reference(p);
    }
    if p.at(SyntaxKind::L_PAREN) {
        parse_rule(p, Rule::ArgumentList);
    }
    p.finish_node();
}

static PAREN_EXPRESSIONS: &[Alternative] = &[
    Alternative::new("arrow function", Guard::Custom(at_arrow_params), arrow_function),
    Alternative::new(
        "nil literal",
        Guard::Sequence(&[SyntaxKind::L_PAREN, SyntaxKind::R_PAREN]),
        nil_literal,
    ),
    Alternative::new(
        "parenthesized expression",
        Guard::Set(TokenSet::single(SyntaxKind::L_PAREN)),
        paren_expression,
    ),
    Alternative::new(
        "tuple literal",
        Guard::Set(TokenSet::single(SyntaxKind::L_PAREN)),
        tuple_expression,
    ),
];

fn at_arrow_params(p: &Parser<'_>) -> bool {
    p.at(SyntaxKind::L_PAREN)
        && matches!(p.nth(1), SyntaxKind::IDENT | SyntaxKind::R_PAREN)
        && arrow_allowed(p)
}

// In `var x if a > b => {}` the `=>` belongs to the match clause
fn arrow_allowed(p: &Parser<'_>) -> bool {
    p.frames()
        .iter()
        .rev()
        .find(|f| f.rule != Rule::Expression)
        .is_none_or(|f| f.rule != Rule::MatchClause)
}

/// `x => body` or `(x, y) => body`
fn arrow_function(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::ARROW_FUNCTION);
    p.start_node(SyntaxKind::ARROW_PARAMS);
    if p.eat(SyntaxKind::L_PAREN) {
        delimited(p, SyntaxKind::R_PAREN, name);
        p.expect(SyntaxKind::R_PAREN);
    } else {
        name(p);
    }
    p.finish_node();
    p.expect(SyntaxKind::FAT_ARROW);
    super::expression(p);
    p.finish_node();
}

fn nil_literal(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::NIL_LITERAL);
    p.expect(SyntaxKind::L_PAREN);
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

fn paren_expression(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::PAREN_EXPR);
    p.expect(SyntaxKind::L_PAREN);
    super::expression(p);
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

fn tuple_expression(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::TUPLE_EXPR);
    p.expect(SyntaxKind::L_PAREN);
    super::expression(p);
    p.expect(SyntaxKind::COMMA);
    delimited(p, SyntaxKind::R_PAREN, super::expression);
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

/// `but { T name? => expr, ... }`
fn match_arms(p: &mut Parser<'_>) {
    p.expect(SyntaxKind::L_BRACE);
    delimited(p, SyntaxKind::R_BRACE, |p| {
        p.start_node(SyntaxKind::MATCH_EXPR_ARM);
        parse_rule(p, Rule::TypeDescriptor);
        if p.at(SyntaxKind::IDENT) {
            name(p);
        }
        p.expect(SyntaxKind::FAT_ARROW);
        super::expression(p);
        p.finish_node();
    });
    p.expect(SyntaxKind::R_BRACE);
}
