//! Embedded sub-languages: string templates, XML literals, table and
//! streaming queries
//!
//! Template and XML text arrives from the lexer as single TEXT tokens between
//! interpolations, so these productions only have to nest the interpolated
//! expressions.

use super::{at_contextual, delimited, expression, name};
use crate::parser::errors::ErrorCode;
use crate::parser::parser::Parser;
use crate::parser::recovery;
use crate::parser::rules::{self, Rule, parse_rule};
use crate::parser::syntax_kind::SyntaxKind;
use crate::parser::token_set::TokenSet;

/// `string \`text ${expr} text\``
pub(crate) fn string_template(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::STRING_TEMPLATE);
    p.expect(SyntaxKind::STRING_KW);
    p.expect(SyntaxKind::BACKTICK);
    loop {
        match p.current_kind() {
            SyntaxKind::TEMPLATE_TEXT => p.bump(),
            SyntaxKind::TEMPLATE_INTERP_START => {
                p.start_node(SyntaxKind::TEMPLATE_INTERPOLATION);
                p.bump(); // ${
                expression(p);
                p.expect(SyntaxKind::R_BRACE);
                p.finish_node();
            }
            _ => break,
        }
    }
    p.expect(SyntaxKind::BACKTICK);
    p.finish_node();
}

/// `xml \`<a>{{expr}}</a>\``
pub(crate) fn xml_literal(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::XML_LITERAL);
    p.expect(SyntaxKind::XML_KW);
    p.expect(SyntaxKind::BACKTICK);
    loop {
        match p.current_kind() {
            SyntaxKind::XML_TEXT => p.bump(),
            SyntaxKind::XML_INTERP_START => {
                p.start_node(SyntaxKind::XML_INTERPOLATION);
                p.bump(); // {{
                expression(p);
                p.expect(SyntaxKind::XML_INTERP_END);
                p.finish_node();
            }
            _ => break,
        }
    }
    p.expect(SyntaxKind::BACKTICK);
    p.finish_node();
}

pub(crate) fn table_query(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::TABLE_QUERY);
    query(p);
    p.finish_node();
}

/// A query followed by `=> (params) { }`
pub(crate) fn streaming_query(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::STREAMING_QUERY);
    query(p);
    p.start_node(SyntaxKind::STREAMING_ACTION);
    p.expect(SyntaxKind::FAT_ARROW);
    parse_rule(p, Rule::ParameterList);
    super::block(p);
    p.finish_node();
    p.finish_node();
}

const QUERY_CLAUSE_START: TokenSet = TokenSet::new(&[
    SyntaxKind::JOIN_KW,
    SyntaxKind::SELECT_KW,
    SyntaxKind::GROUP_KW,
    SyntaxKind::HAVING_KW,
    SyntaxKind::ORDER_KW,
]);

/// Position of a clause kind in the required clause order
fn clause_rank(kind: SyntaxKind) -> u8 {
    match kind {
        SyntaxKind::JOIN_CLAUSE => 1,
        SyntaxKind::SELECT_CLAUSE => 2,
        SyntaxKind::GROUP_BY_CLAUSE => 3,
        SyntaxKind::HAVING_CLAUSE => 4,
        SyntaxKind::ORDER_BY_CLAUSE => 5,
        _ => 6,
    }
}

/// `from input (join input on expr)* select? (group by)? having? (order by)? limit?`
///
/// A clause out of order is reported and still parsed.
fn query(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::FROM_CLAUSE);
    p.expect(SyntaxKind::FROM_KW);
    input_source(p);
    p.finish_node();

    let mut last = 0;
    loop {
        let clause = match p.current_kind() {
            SyntaxKind::JOIN_KW => SyntaxKind::JOIN_CLAUSE,
            SyntaxKind::SELECT_KW => SyntaxKind::SELECT_CLAUSE,
            SyntaxKind::GROUP_KW => SyntaxKind::GROUP_BY_CLAUSE,
            SyntaxKind::HAVING_KW => SyntaxKind::HAVING_CLAUSE,
            SyntaxKind::ORDER_KW => SyntaxKind::ORDER_BY_CLAUSE,
            SyntaxKind::IDENT if at_contextual(p, "limit") => SyntaxKind::LIMIT_CLAUSE,
            _ => break,
        };
        let rank = clause_rank(clause);
        if rank < last || (rank == last && clause != SyntaxKind::JOIN_CLAUSE) {
            let error = rules::unexpected_here(p, ErrorCode::E0803, QUERY_CLAUSE_START);
            recovery::report(p, error);
        }
        last = rank;
        query_clause(p, clause);
    }
}

fn query_clause(p: &mut Parser<'_>, clause: SyntaxKind) {
    p.start_node(clause);
    p.bump(); // clause keyword
    match clause {
        SyntaxKind::JOIN_CLAUSE => {
            input_source(p);
            p.expect(SyntaxKind::ON_KW);
            expression(p);
        }
        SyntaxKind::SELECT_CLAUSE => {
            if !p.eat(SyntaxKind::STAR) {
                delimited(p, SyntaxKind::SEMICOLON, select_item);
            }
        }
        SyntaxKind::GROUP_BY_CLAUSE => {
            recovery::expect_with(p, SyntaxKind::BY_KW, ErrorCode::E0803);
            delimited(p, SyntaxKind::SEMICOLON, |p| {
                parse_rule(p, Rule::VariableReference);
            });
        }
        SyntaxKind::HAVING_CLAUSE => expression(p),
        SyntaxKind::ORDER_BY_CLAUSE => {
            recovery::expect_with(p, SyntaxKind::BY_KW, ErrorCode::E0803);
            delimited(p, SyntaxKind::SEMICOLON, |p| {
                parse_rule(p, Rule::VariableReference);
                if at_contextual(p, "ascending") || at_contextual(p, "descending") {
                    p.bump();
                }
            });
        }
        _ => {
            // limit
            p.expect(SyntaxKind::INTEGER_LITERAL);
        }
    }
    p.finish_node();
}

/// `ref (as alias)? (where expr)? (window fn(args))? (as alias)?`
fn input_source(p: &mut Parser<'_>) {
    parse_rule(p, Rule::VariableReference);
    let aliased = alias(p);
    if p.at(SyntaxKind::WHERE_KW) {
        p.start_node(SyntaxKind::WHERE_CLAUSE);
        p.bump();
        expression(p);
        p.finish_node();
    }
    if at_contextual(p, "window") {
        p.start_node(SyntaxKind::WINDOW_CLAUSE);
        p.bump();
        parse_rule(p, Rule::VariableReference);
        p.finish_node();
    }
    if !aliased {
        alias(p);
    }
}

fn alias(p: &mut Parser<'_>) -> bool {
    if p.eat(SyntaxKind::AS_KW) {
        name(p);
        true
    } else {
        false
    }
}

fn select_item(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::SELECT_ITEM);
    expression(p);
    if p.eat(SyntaxKind::AS_KW) {
        name(p);
    }
    p.finish_node();
}
