//! Grammar productions for Ballerina
//!
//! - `module` - compilation unit, imports, definitions, parameters, annotations
//! - `types` - type descriptors (precedence climbing) and record/object bodies
//! - `references` - variable reference chains (precedence climbing), argument lists
//! - `expressions` - the expression grammar (precedence climbing)
//! - `statements` - blocks, statements, match clauses
//! - `embedded` - string templates, XML literals, table and streaming queries
//!
//! Every production is a plain `fn(&mut Parser)` so it can be named by a
//! [`Rule`](crate::parser::rules::Rule) or an
//! [`Alternative`](crate::parser::lookahead::Alternative).

pub mod embedded;
pub mod expressions;
pub mod module;
pub mod references;
pub mod statements;
pub mod types;

use crate::parser::parser::Parser;
use crate::parser::predicates;
use crate::parser::rules::{Rule, parse_rule};
use crate::parser::syntax_kind::SyntaxKind;

/// `NAME`: an identifier being declared
pub(crate) fn name(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::NAME);
    p.expect(SyntaxKind::IDENT);
    p.finish_node();
}

/// `NAME_REF`: `name` or `pkg:name`
pub(crate) fn name_ref(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::NAME_REF);
    p.expect(SyntaxKind::IDENT);
    if predicates::qualified_colon(p, 0) {
        p.bump();
        p.bump();
    }
    p.finish_node();
}

/// Significant tokens a (possibly qualified) name starting at lookahead `k` spans
pub(crate) fn name_ref_len(p: &Parser<'_>, k: usize) -> Option<usize> {
    if p.nth(k) != SyntaxKind::IDENT {
        return None;
    }
    if predicates::qualified_colon(p, k + 1) {
        Some(3)
    } else {
        Some(1)
    }
}

/// Contextual keyword: an identifier with this exact text
pub(crate) fn at_contextual(p: &Parser<'_>, text: &str) -> bool {
    p.at(SyntaxKind::IDENT) && p.current_text() == text
}

pub(crate) fn type_descriptor(p: &mut Parser<'_>) {
    parse_rule(p, Rule::TypeDescriptor);
}

pub(crate) fn expression(p: &mut Parser<'_>) {
    parse_rule(p, Rule::Expression);
}

pub(crate) fn block(p: &mut Parser<'_>) {
    parse_rule(p, Rule::Block);
}

/// Comma-separated items up to `close`; `item` must consume at least one token
/// or the loop stops.
pub(crate) fn delimited(
    p: &mut Parser<'_>,
    close: SyntaxKind,
    mut item: impl FnMut(&mut Parser<'_>),
) {
    while !p.at(close) && !p.at_eof() {
        let before = p.bumped();
        item(p);
        if p.bumped() == before || !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
}
