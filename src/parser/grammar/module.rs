//! Module-level grammar
//!
//! ```text
//! CompilationUnit = (ImportDecl | NamespaceDecl | Definition)* EOF
//! ImportDecl      = 'import' (org '/')? pkg ('.' pkg)* ('version' ver)? ('as' alias)? ';'
//! Definition      = Prefix (FunctionDef | ServiceDef | TypeDef | ConstDef
//!                          | AnnotationDef | GlobalVarDef)
//! Prefix          = (DocLine | AnnotationAttachment)* ('public' | 'private')?
//! ```
//!
//! Every definition owns its prefix: the documentation and annotation nodes are
//! children of the definition node they describe.

use super::types::{self, TYPE_START};
use super::{block, expression, name, name_ref, name_ref_len, type_descriptor};
use super::expressions;
use crate::parser::errors::ErrorCode;
use crate::parser::parser::Parser;
use crate::parser::recovery;
use crate::parser::rules::{self, Rule, parse_rule};
use crate::parser::syntax_kind::SyntaxKind;
use crate::parser::token_set::TokenSet;

const VISIBILITY: TokenSet = TokenSet::new(&[SyntaxKind::PUBLIC_KW, SyntaxKind::PRIVATE_KW]);

const FUNCTION_MODIFIERS: TokenSet = TokenSet::new(&[
    SyntaxKind::REMOTE_KW,
    SyntaxKind::RESOURCE_KW,
    SyntaxKind::EXTERN_KW,
]);

/// Tokens that can start something at the top level
pub(crate) const TOP_LEVEL_START: TokenSet = TokenSet::new(&[
    SyntaxKind::IMPORT_KW,
    SyntaxKind::XMLNS_KW,
    SyntaxKind::PUBLIC_KW,
    SyntaxKind::PRIVATE_KW,
    SyntaxKind::EXTERN_KW,
    SyntaxKind::REMOTE_KW,
    SyntaxKind::RESOURCE_KW,
    SyntaxKind::FUNCTION_KW,
    SyntaxKind::SERVICE_KW,
    SyntaxKind::TYPE_KW,
    SyntaxKind::CONST_KW,
    SyntaxKind::LISTENER_KW,
    SyntaxKind::FINAL_KW,
    SyntaxKind::ANNOTATION_KW,
    SyntaxKind::AT,
    SyntaxKind::DOC_LINE,
])
.union(TYPE_START);

/// Tokens that can start a member of an object, record or service body
pub(crate) const MEMBER_START: TokenSet = TokenSet::new(&[
    SyntaxKind::PUBLIC_KW,
    SyntaxKind::PRIVATE_KW,
    SyntaxKind::REMOTE_KW,
    SyntaxKind::RESOURCE_KW,
    SyntaxKind::EXTERN_KW,
    SyntaxKind::FUNCTION_KW,
    SyntaxKind::STAR,
    SyntaxKind::AT,
    SyntaxKind::DOC_LINE,
])
.union(TYPE_START);

/// What may follow a declared name: an initializer or the end of the declaration
pub(crate) const INITIALIZER_FOLLOW: TokenSet =
    TokenSet::new(&[SyntaxKind::EQ, SyntaxKind::SEMICOLON]);

const BODY_START: TokenSet = TokenSet::new(&[SyntaxKind::L_BRACE, SyntaxKind::SEMICOLON]);

const PARAM_START: TokenSet = TokenSet::single(SyntaxKind::AT).union(TYPE_START);

pub(crate) fn compilation_unit(p: &mut Parser<'_>) {
    p.start_root(SyntaxKind::COMPILATION_UNIT);
    while !p.at_eof() {
        let before = p.bumped();
        match p.current_kind() {
            SyntaxKind::IMPORT_KW => {
                parse_rule(p, Rule::ImportDeclaration);
            }
            SyntaxKind::XMLNS_KW => {
                parse_rule(p, Rule::NamespaceDeclaration);
            }
            kind if TOP_LEVEL_START.contains(kind) => {
                parse_rule(p, Rule::Definition);
            }
            _ => recovery::recover_unexpected(p, TOP_LEVEL_START, ErrorCode::E0302),
        }
        recovery::ensure_progress(p, before);
    }
    if p.halted() {
        p.dump_remaining();
    }
    p.flush_trailing();
    p.finish_node();
}

pub(crate) fn import_declaration(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::IMPORT_DECL);
    p.expect(SyntaxKind::IMPORT_KW);

    if !p.at(SyntaxKind::SLASH) {
        recovery::delete_stray(p, TokenSet::single(SyntaxKind::IDENT), ErrorCode::E0501);
    }
    if p.at(SyntaxKind::IDENT) && p.nth(1) == SyntaxKind::SLASH {
        p.start_node(SyntaxKind::ORG_NAME);
        p.bump();
        p.bump(); // /
        p.finish_node();
    } else if p.at(SyntaxKind::SLASH) {
        let error = rules::unexpected_here(
            p,
            ErrorCode::E0501,
            TokenSet::single(SyntaxKind::IDENT),
        );
        recovery::report(p, error);
        recovery::delete_current(p);
    }

    p.start_node(SyntaxKind::PACKAGE_NAME);
    recovery::expect_with(p, SyntaxKind::IDENT, ErrorCode::E0502);
    while p.at(SyntaxKind::DOT) && p.nth(1) == SyntaxKind::IDENT {
        p.bump();
        p.bump();
    }
    p.finish_node();

    if super::at_contextual(p, "version") {
        p.start_node(SyntaxKind::VERSION_CLAUSE);
        p.bump();
        let mut parts = 0;
        while p.at_set(TokenSet::new(&[
            SyntaxKind::INTEGER_LITERAL,
            SyntaxKind::FLOAT_LITERAL,
            SyntaxKind::DOT,
            SyntaxKind::IDENT,
        ])) {
            p.bump();
            parts += 1;
        }
        if parts == 0 {
            recovery::recover_unexpected(
                p,
                TokenSet::new(&[SyntaxKind::INTEGER_LITERAL, SyntaxKind::FLOAT_LITERAL]),
                ErrorCode::E0501,
            );
        }
        p.finish_node();
    }

    if p.at(SyntaxKind::AS_KW) {
        p.start_node(SyntaxKind::IMPORT_ALIAS);
        p.bump();
        p.start_node(SyntaxKind::NAME);
        recovery::expect_with(p, SyntaxKind::IDENT, ErrorCode::E0503);
        p.finish_node();
        p.finish_node();
    }

    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// `xmlns "uri" (as prefix)? ;` at module level or as a statement
pub(crate) fn namespace_declaration(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::NAMESPACE_DECL);
    p.expect(SyntaxKind::XMLNS_KW);
    p.expect(SyntaxKind::STRING_LITERAL);
    if p.eat(SyntaxKind::AS_KW) {
        name(p);
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// Number of lookahead tokens covered by documentation, annotations and a
/// visibility qualifier at the current position
pub(crate) fn prefix_len(p: &Parser<'_>) -> usize {
    let mut k = 0;
    loop {
        match p.nth(k) {
            SyntaxKind::DOC_LINE | SyntaxKind::PUBLIC_KW | SyntaxKind::PRIVATE_KW => k += 1,
            SyntaxKind::AT => {
                k += 1;
                k += name_ref_len(p, k).unwrap_or(0);
                if p.nth(k) == SyntaxKind::L_BRACE {
                    k = skip_braces(p, k);
                }
            }
            _ => return k,
        }
    }
}

/// Lookahead index just past the brace group opening at `k`
fn skip_braces(p: &Parser<'_>, mut k: usize) -> usize {
    let mut depth = 0usize;
    loop {
        match p.nth(k) {
            SyntaxKind::EOF => return k,
            SyntaxKind::L_BRACE | SyntaxKind::L_BRACE_PIPE => depth += 1,
            SyntaxKind::R_BRACE | SyntaxKind::PIPE_R_BRACE => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return k + 1;
                }
            }
            _ => {}
        }
        k += 1;
    }
}

/// Documentation, annotations and visibility, emitted into the enclosing node
pub(crate) fn prefix(p: &mut Parser<'_>) {
    loop {
        match p.current_kind() {
            SyntaxKind::DOC_LINE => {
                parse_rule(p, Rule::Documentation);
            }
            SyntaxKind::AT => {
                parse_rule(p, Rule::AnnotationAttachment);
            }
            _ => break,
        }
    }
    p.eat_set(VISIBILITY);
}

pub(crate) fn definition(p: &mut Parser<'_>) {
    let k = prefix_len(p);
    let rule = match p.nth(k) {
        SyntaxKind::FUNCTION_KW if p.nth(k + 1) == SyntaxKind::L_PAREN => {
            Some(Rule::GlobalVariableDefinition)
        }
        SyntaxKind::FUNCTION_KW
        | SyntaxKind::EXTERN_KW
        | SyntaxKind::REMOTE_KW
        | SyntaxKind::RESOURCE_KW => Some(Rule::FunctionDefinition),
        SyntaxKind::SERVICE_KW => Some(Rule::ServiceDefinition),
        SyntaxKind::TYPE_KW => Some(Rule::TypeDefinition),
        SyntaxKind::CONST_KW => Some(Rule::ConstantDefinition),
        SyntaxKind::ANNOTATION_KW => Some(Rule::AnnotationDefinition),
        SyntaxKind::LISTENER_KW | SyntaxKind::FINAL_KW => Some(Rule::GlobalVariableDefinition),
        kind if TYPE_START.contains(kind) => Some(Rule::GlobalVariableDefinition),
        _ => None,
    };
    match rule {
        Some(rule) => {
            tracing::trace!(?rule, prefix = k, "definition");
            parse_rule(p, rule);
        }
        None => {
            // A prefix with nothing to attach to
            prefix(p);
            recovery::recover_unexpected(p, TOP_LEVEL_START, ErrorCode::E0302);
        }
    }
}

pub(crate) fn function_definition(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::FUNCTION_DEF);
    prefix(p);
    while p.eat_set(FUNCTION_MODIFIERS) {}
    p.expect(SyntaxKind::FUNCTION_KW);

    if p.at(SyntaxKind::IDENT) && p.nth(1) == SyntaxKind::DOT {
        // Person.getName: a method defined outside its object
        p.start_node(SyntaxKind::ATTACHED_NAME);
        name_ref(p);
        p.bump(); // .
        name(p);
        p.finish_node();
    } else {
        name(p);
    }

    parse_rule(p, Rule::ParameterList);
    if p.at(SyntaxKind::RETURNS_KW) {
        return_type(p);
    }
    function_body(p);
    p.finish_node();
}

fn function_body(p: &mut Parser<'_>) {
    if p.eat(SyntaxKind::SEMICOLON) {
        return;
    }
    if !p.at(SyntaxKind::L_BRACE) {
        recovery::recover_unexpected(p, BODY_START, ErrorCode::E0307);
    }
    if p.at(SyntaxKind::L_BRACE) {
        block(p);
    } else {
        p.eat(SyntaxKind::SEMICOLON);
    }
}

/// `returns @annot* T`
pub(crate) fn return_type(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::RETURN_TYPE);
    p.expect(SyntaxKind::RETURNS_KW);
    while p.at(SyntaxKind::AT) {
        parse_rule(p, Rule::AnnotationAttachment);
    }
    type_descriptor(p);
    p.finish_node();
}

pub(crate) fn parameter_list(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::PARAM_LIST);
    p.expect(SyntaxKind::L_PAREN);
    while !p.at(SyntaxKind::R_PAREN) && !p.at_eof() {
        let before = p.bumped();
        if p.at_set(PARAM_START) {
            parse_rule(p, Rule::Parameter);
        } else {
            recovery::recover_unexpected(p, PARAM_START, ErrorCode::E0305);
        }
        if p.at(SyntaxKind::R_PAREN) || p.bumped() == before {
            break;
        }
        p.expect(SyntaxKind::COMMA);
    }
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

/// `@annot* T name (= default)?` or `T... name`
pub(crate) fn parameter(p: &mut Parser<'_>) {
    let cp = p.checkpoint();
    while p.at(SyntaxKind::AT) {
        parse_rule(p, Rule::AnnotationAttachment);
    }
    p.eat(SyntaxKind::PUBLIC_KW);
    type_descriptor(p);
    let kind = if p.eat(SyntaxKind::ELLIPSIS) {
        SyntaxKind::REST_PARAM
    } else {
        SyntaxKind::PARAM
    };
    name(p);
    if kind == SyntaxKind::PARAM && p.eat(SyntaxKind::EQ) {
        expression(p);
    }
    p.wrap(cp, kind);
}

pub(crate) fn service_definition(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::SERVICE_DEF);
    prefix(p);
    p.expect(SyntaxKind::SERVICE_KW);
    if p.at(SyntaxKind::IDENT) {
        name(p);
    }
    if p.eat(SyntaxKind::ON_KW) {
        expression(p);
        while p.eat(SyntaxKind::COMMA) {
            expression(p);
        }
    }

    p.start_node(SyntaxKind::SERVICE_BODY);
    p.expect(SyntaxKind::L_BRACE);
    members(p, SyntaxKind::R_BRACE);
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();

    p.finish_node();
}

/// Members of a service or object body up to `close`
pub(crate) fn members(p: &mut Parser<'_>, close: SyntaxKind) {
    while !p.at(close) && !p.at_eof() {
        let before = p.bumped();
        member(p);
        recovery::ensure_progress(p, before);
    }
}

fn member(p: &mut Parser<'_>) {
    if p.at(SyntaxKind::STAR) {
        types::type_inclusion(p);
        return;
    }
    let k = prefix_len(p);
    match p.nth(k) {
        SyntaxKind::FUNCTION_KW if p.nth(k + 1) == SyntaxKind::L_PAREN => field_definition(p),
        SyntaxKind::FUNCTION_KW
        | SyntaxKind::REMOTE_KW
        | SyntaxKind::RESOURCE_KW
        | SyntaxKind::EXTERN_KW => {
            parse_rule(p, Rule::FunctionDefinition);
        }
        kind if TYPE_START.contains(kind) => field_definition(p),
        _ => {
            prefix(p);
            recovery::recover_unexpected(p, MEMBER_START, ErrorCode::E0304);
        }
    }
}

/// `@annot* (public|private)? T name (= init)? ;` in an object or service body
fn field_definition(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::FIELD_DEF);
    prefix(p);
    type_descriptor(p);
    name(p);
    recovery::delete_stray(p, INITIALIZER_FOLLOW, ErrorCode::E0901);
    if p.eat(SyntaxKind::EQ) {
        expression(p);
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

pub(crate) fn type_definition(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::TYPE_DEF);
    prefix(p);
    p.expect(SyntaxKind::TYPE_KW);
    name(p);
    type_descriptor(p);
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

pub(crate) fn global_variable_definition(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::GLOBAL_VAR_DEF);
    prefix(p);
    p.eat(SyntaxKind::LISTENER_KW);
    p.eat(SyntaxKind::FINAL_KW);
    if !p.eat(SyntaxKind::VAR_KW) {
        type_descriptor(p);
    }
    name(p);
    recovery::delete_stray(p, INITIALIZER_FOLLOW, ErrorCode::E0901);
    if p.eat(SyntaxKind::EQ) {
        expression(p);
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

pub(crate) fn constant_definition(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::CONST_DEF);
    prefix(p);
    p.expect(SyntaxKind::CONST_KW);
    // The type is optional: `const PI = 3.14;`
    if !(p.at(SyntaxKind::IDENT) && p.nth(1) == SyntaxKind::EQ) {
        type_descriptor(p);
    }
    name(p);
    p.expect(SyntaxKind::EQ);
    expression(p);
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// `annotation <service, resource> Name Type;`
pub(crate) fn annotation_definition(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::ANNOTATION_DEF);
    prefix(p);
    p.expect(SyntaxKind::ANNOTATION_KW);
    if p.at(SyntaxKind::LT) {
        p.start_node(SyntaxKind::ATTACH_POINTS);
        p.bump();
        while p.at(SyntaxKind::IDENT) || p.current_kind().is_keyword() {
            p.bump();
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        p.expect(SyntaxKind::GT);
        p.finish_node();
    }
    name(p);
    if p.at(SyntaxKind::IDENT) {
        types::type_reference(p);
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// `@name` or `@pkg:name { record literal }`
pub(crate) fn annotation_attachment(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::ANNOTATION_ATTACHMENT);
    p.expect(SyntaxKind::AT);
    name_ref(p);
    if p.at(SyntaxKind::L_BRACE) {
        expressions::record_literal(p);
    }
    p.finish_node();
}

pub(crate) fn documentation(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::DOCUMENTATION);
    p.expect(SyntaxKind::DOC_LINE);
    while p.eat(SyntaxKind::DOC_LINE) {}
    p.finish_node();
}
