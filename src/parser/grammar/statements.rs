//! Blocks and statements
//!
//! Keyword-led statements are decided by their first token. Everything else
//! (variable definitions, assignments, worker sends, expression statements)
//! starts with a type, a reference or an expression, and those overlap: `a.b
//! = c;`, `a b = c;` and `a.b();` share their first token. Those forms go
//! through one choice point and are disambiguated by speculation.

use super::expressions::EXPRESSION_START;
use super::module::INITIALIZER_FOLLOW;
use super::references::REFERENCE_START;
use super::types::TYPE_START;
use super::{delimited, expression, name, name_ref, type_descriptor};
use crate::parser::errors::ErrorCode;
use crate::parser::lookahead::{self, Alternative, Guard};
use crate::parser::parser::Parser;
use crate::parser::predicates;
use crate::parser::recovery;
use crate::parser::rules::{self, Rule, parse_rule};
use crate::parser::syntax_kind::SyntaxKind;
use crate::parser::token_set::TokenSet;

/// Keywords that only make sense at the top level; a block missing its `}`
/// ends when it reaches one
const BLOCK_EXIT: TokenSet = TokenSet::new(&[
    SyntaxKind::IMPORT_KW,
    SyntaxKind::PUBLIC_KW,
    SyntaxKind::SERVICE_KW,
    SyntaxKind::TYPE_KW,
    SyntaxKind::CONST_KW,
    SyntaxKind::ANNOTATION_KW,
    SyntaxKind::LISTENER_KW,
    SyntaxKind::EXTERN_KW,
]);

/// Closing delimiters with no opener in the enclosing block
const STRAY_CLOSERS: TokenSet = TokenSet::new(&[
    SyntaxKind::R_PAREN,
    SyntaxKind::R_BRACKET,
    SyntaxKind::PIPE_R_BRACE,
]);

const STATEMENT_KEYWORDS: TokenSet = TokenSet::new(&[
    SyntaxKind::IF_KW,
    SyntaxKind::WHILE_KW,
    SyntaxKind::FOREACH_KW,
    SyntaxKind::MATCH_KW,
    SyntaxKind::BREAK_KW,
    SyntaxKind::CONTINUE_KW,
    SyntaxKind::RETURN_KW,
    SyntaxKind::PANIC_KW,
    SyntaxKind::LOCK_KW,
    SyntaxKind::TRANSACTION_KW,
    SyntaxKind::RETRY_KW,
    SyntaxKind::ABORT_KW,
    SyntaxKind::FORK_KW,
    SyntaxKind::WORKER_KW,
    SyntaxKind::FOREVER_KW,
    SyntaxKind::XMLNS_KW,
]);

const VAR_DEF_START: TokenSet =
    TokenSet::new(&[SyntaxKind::VAR_KW, SyntaxKind::FINAL_KW]).union(TYPE_START);

const STATEMENT_FIRST: TokenSet = STATEMENT_KEYWORDS
    .union(VAR_DEF_START)
    .union(EXPRESSION_START);

const COMPOUND_OPERATORS: TokenSet = TokenSet::new(&[
    SyntaxKind::PLUS_EQ,
    SyntaxKind::MINUS_EQ,
    SyntaxKind::STAR_EQ,
    SyntaxKind::SLASH_EQ,
    SyntaxKind::AMP_EQ,
    SyntaxKind::PIPE_EQ,
    SyntaxKind::CARET_EQ,
]);

const MATCH_PATTERN_START: TokenSet = TokenSet::single(SyntaxKind::VAR_KW).union(EXPRESSION_START);

/// `{ statement* }`
pub(crate) fn block(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::BLOCK);
    let opened = p.current_range();
    p.expect(SyntaxKind::L_BRACE);
    while !p.at(SyntaxKind::R_BRACE) && !p.at_eof() && !p.at_set(BLOCK_EXIT) {
        let before = p.bumped();
        parse_rule(p, Rule::Statement);
        recovery::ensure_progress(p, before);
    }
    recovery::expect_closing(p, SyntaxKind::R_BRACE, opened);
    p.finish_node();
}

pub(crate) fn statement(p: &mut Parser<'_>) {
    match p.current_kind() {
        SyntaxKind::IF_KW => if_statement(p),
        SyntaxKind::WHILE_KW => {
            p.start_node(SyntaxKind::WHILE_STMT);
            p.bump();
            expression(p);
            super::block(p);
            p.finish_node();
        }
        SyntaxKind::FOREACH_KW => foreach_statement(p),
        SyntaxKind::MATCH_KW => match_statement(p),
        SyntaxKind::BREAK_KW => keyword_statement(p, SyntaxKind::BREAK_STMT),
        SyntaxKind::CONTINUE_KW => keyword_statement(p, SyntaxKind::CONTINUE_STMT),
        SyntaxKind::RETRY_KW => keyword_statement(p, SyntaxKind::RETRY_STMT),
        SyntaxKind::ABORT_KW => keyword_statement(p, SyntaxKind::ABORT_STMT),
        SyntaxKind::RETURN_KW => {
            p.start_node(SyntaxKind::RETURN_STMT);
            p.bump();
            if !p.at(SyntaxKind::SEMICOLON) {
                expression(p);
            }
            p.expect(SyntaxKind::SEMICOLON);
            p.finish_node();
        }
        SyntaxKind::PANIC_KW => {
            p.start_node(SyntaxKind::PANIC_STMT);
            p.bump();
            expression(p);
            p.expect(SyntaxKind::SEMICOLON);
            p.finish_node();
        }
        SyntaxKind::LOCK_KW => {
            p.start_node(SyntaxKind::LOCK_STMT);
            p.bump();
            super::block(p);
            p.finish_node();
        }
        SyntaxKind::TRANSACTION_KW => transaction_statement(p),
        SyntaxKind::FORK_KW => fork_statement(p),
        SyntaxKind::WORKER_KW => worker_declaration(p),
        SyntaxKind::FOREVER_KW => forever_statement(p),
        SyntaxKind::XMLNS_KW => {
            parse_rule(p, Rule::NamespaceDeclaration);
        }
        _ => {
            if !lookahead::dispatch(p, SIMPLE_STATEMENTS) {
                let code = if p.at_set(STRAY_CLOSERS) {
                    ErrorCode::E0205
                } else {
                    ErrorCode::E0701
                };
                recovery::recover_unexpected(p, STATEMENT_FIRST, code);
                // the broken statement owns its terminator
                p.eat(SyntaxKind::SEMICOLON);
            }
        }
    }
}

fn keyword_statement(p: &mut Parser<'_>, kind: SyntaxKind) {
    p.start_node(kind);
    p.bump();
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// `if cond { } else if cond { } else { }`
fn if_statement(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::IF_STMT);
    p.bump(); // if
    expression(p);
    super::block(p);
    recovery::delete_stray(p, TokenSet::single(SyntaxKind::ELSE_KW), ErrorCode::E0901);
    if p.at(SyntaxKind::ELSE_KW) {
        p.start_node(SyntaxKind::ELSE_CLAUSE);
        p.bump();
        if p.at(SyntaxKind::IF_KW) {
            if_statement(p);
        } else {
            super::block(p);
        }
        p.finish_node();
    }
    p.finish_node();
}

/// `foreach (var | T)? binding in expr { }`
fn foreach_statement(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::FOREACH_STMT);
    p.bump(); // foreach
    if !p.eat(SyntaxKind::VAR_KW) && at_foreach_type(p) {
        type_descriptor(p);
    }
    binding_pattern(p);
    p.expect(SyntaxKind::IN_KW);
    expression(p);
    super::block(p);
    p.finish_node();
}

fn at_foreach_type(p: &Parser<'_>) -> bool {
    p.at_set(TYPE_START)
        && !p.at(SyntaxKind::L_PAREN)
        && !(p.at(SyntaxKind::IDENT) && p.nth(1) == SyntaxKind::IN_KW)
}

/// `name` or `(a, (b, c))`
fn binding_pattern(p: &mut Parser<'_>) {
    if p.at(SyntaxKind::L_PAREN) {
        p.start_node(SyntaxKind::BINDING_PATTERN);
        p.bump();
        delimited(p, SyntaxKind::R_PAREN, binding_pattern);
        p.expect(SyntaxKind::R_PAREN);
        p.finish_node();
    } else {
        name(p);
    }
}

fn match_statement(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::MATCH_STMT);
    p.bump(); // match
    expression(p);
    p.expect(SyntaxKind::L_BRACE);
    while !p.at(SyntaxKind::R_BRACE) && !p.at_eof() {
        let before = p.bumped();
        parse_rule(p, Rule::MatchClause);
        p.eat(SyntaxKind::COMMA);
        recovery::ensure_progress(p, before);
    }
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();
}

/// `pattern => body`
///
/// A pattern is a static value (`0`, `"a" | "b"`, `(1, x)`, `()`) or a
/// binding (`var (a, b) if a > b`). The body is a block or one statement.
pub(crate) fn match_clause(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::MATCH_CLAUSE);
    p.start_node(SyntaxKind::MATCH_PATTERN);
    if p.eat(SyntaxKind::VAR_KW) {
        binding_pattern(p);
        if p.eat(SyntaxKind::IF_KW) {
            expression(p);
        }
    } else if p.at_set(EXPRESSION_START) {
        expression(p);
    } else {
        recovery::recover_unexpected(p, MATCH_PATTERN_START, ErrorCode::E0702);
    }
    p.finish_node();
    p.expect(SyntaxKind::FAT_ARROW);
    if p.at(SyntaxKind::L_BRACE) {
        super::block(p);
    } else {
        parse_rule(p, Rule::Statement);
    }
    p.finish_node();
}

/// `transaction (with retries = 3, oncommit = f)? { } onretry { } committed { } aborted { }`
fn transaction_statement(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::TRANSACTION_STMT);
    p.bump(); // transaction
    if p.at(SyntaxKind::WITH_KW) {
        p.start_node(SyntaxKind::TRANSACTION_PROPS);
        p.bump();
        loop {
            if !p.eat(SyntaxKind::RETRIES_KW) {
                name(p);
            }
            p.expect(SyntaxKind::EQ);
            expression(p);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        p.finish_node();
    }
    super::block(p);
    loop {
        let clause = match p.current_kind() {
            SyntaxKind::ONRETRY_KW => SyntaxKind::ONRETRY_CLAUSE,
            SyntaxKind::COMMITTED_KW => SyntaxKind::COMMITTED_CLAUSE,
            SyntaxKind::ABORTED_KW => SyntaxKind::ABORTED_CLAUSE,
            _ => break,
        };
        p.start_node(clause);
        p.bump();
        super::block(p);
        p.finish_node();
    }
    p.finish_node();
}

fn fork_statement(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::FORK_STMT);
    p.bump(); // fork
    p.expect(SyntaxKind::L_BRACE);
    while p.at(SyntaxKind::WORKER_KW) {
        worker_declaration(p);
    }
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();
}

/// `worker name (returns T)? { }`
fn worker_declaration(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::WORKER_DECL);
    p.bump(); // worker
    name(p);
    if p.at(SyntaxKind::RETURNS_KW) {
        super::module::return_type(p);
    }
    super::block(p);
    p.finish_node();
}

fn forever_statement(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::FOREVER_STMT);
    p.bump(); // forever
    p.expect(SyntaxKind::L_BRACE);
    while p.at(SyntaxKind::FROM_KW) {
        parse_rule(p, Rule::StreamingQuery);
    }
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();
}

static SIMPLE_STATEMENTS: &[Alternative] = &[
    Alternative::new(
        "variable definition",
        Guard::Set(VAR_DEF_START),
        variable_definition,
    ),
    Alternative::new("assignment", Guard::Set(REFERENCE_START), assignment),
    Alternative::new(
        "compound assignment",
        Guard::Set(REFERENCE_START),
        compound_assignment,
    ),
    Alternative::new(
        "tuple destructuring",
        Guard::Set(TokenSet::single(SyntaxKind::L_PAREN)),
        tuple_destructure,
    ),
    Alternative::new("worker send", Guard::Set(EXPRESSION_START), worker_send),
    Alternative::new(
        "expression statement",
        Guard::Set(EXPRESSION_START),
        expression_statement,
    ),
];

/// `final? (var binding | T name) (= expr)? ;`
fn variable_definition(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::VAR_DEF_STMT);
    p.eat(SyntaxKind::FINAL_KW);
    if p.eat(SyntaxKind::VAR_KW) {
        binding_pattern(p);
    } else {
        type_descriptor(p);
        name(p);
        recovery::delete_stray(p, INITIALIZER_FOLLOW, ErrorCode::E0901);
    }
    if p.eat(SyntaxKind::EQ) {
        expression(p);
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

fn assignment(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::ASSIGN_STMT);
    parse_rule(p, Rule::VariableReference);
    p.expect(SyntaxKind::EQ);
    expression(p);
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// `x += 1;`, `x >>= 2;`
fn compound_assignment(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::COMPOUND_ASSIGN_STMT);
    parse_rule(p, Rule::VariableReference);
    if !p.eat_set(COMPOUND_OPERATORS) {
        match predicates::shift_operator(p).filter(|s| s.is_assignment()) {
            Some(shift) => p.bump_joined(shift.kind, shift.width),
            None => {
                let error = rules::unexpected_here(p, ErrorCode::E0902, COMPOUND_OPERATORS);
                recovery::report(p, error);
                p.missing();
            }
        }
    }
    expression(p);
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// `(a, b) = expr;`
fn tuple_destructure(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::TUPLE_DESTRUCTURE_STMT);
    p.start_node(SyntaxKind::TUPLE_REF);
    p.bump(); // (
    delimited(p, SyntaxKind::R_PAREN, |p| {
        parse_rule(p, Rule::VariableReference);
    });
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
    p.expect(SyntaxKind::EQ);
    expression(p);
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// `expr -> worker;`
fn worker_send(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::WORKER_SEND_STMT);
    expression(p);
    p.expect(SyntaxKind::ARROW);
    name_ref(p);
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

fn expression_statement(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::EXPR_STMT);
    expression(p);
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

#[cfg(test)]
mod tests {
    use crate::parser::errors::ErrorCode;
    use crate::parser::rule_parser::parse_rule;
    use crate::parser::rules::Rule;
    use crate::parser::{SyntaxKind, SyntaxNode};
    use rstest::rstest;

    fn statement(source: &str) -> SyntaxNode {
        let result = parse_rule(Rule::Statement, source);
        assert!(result.is_ok(), "{source}: {:?}", result.errors());
        let root = result.syntax();
        root.first_child().unwrap_or(root)
    }

    #[rstest]
    #[case("int x = 1;", SyntaxKind::VAR_DEF_STMT)]
    #[case("final var (a, b) = t;", SyntaxKind::VAR_DEF_STMT)]
    #[case("http:Client c = new(url);", SyntaxKind::VAR_DEF_STMT)]
    #[case("string s = string `hi`;", SyntaxKind::VAR_DEF_STMT)]
    #[case("x = 1;", SyntaxKind::ASSIGN_STMT)]
    #[case("p.name = \"a\";", SyntaxKind::ASSIGN_STMT)]
    #[case("m[k] = v;", SyntaxKind::ASSIGN_STMT)]
    #[case("x += 1;", SyntaxKind::COMPOUND_ASSIGN_STMT)]
    #[case("x >>= 2;", SyntaxKind::COMPOUND_ASSIGN_STMT)]
    #[case("(a, b) = t;", SyntaxKind::TUPLE_DESTRUCTURE_STMT)]
    #[case("a -> w1;", SyntaxKind::WORKER_SEND_STMT)]
    #[case("foo();", SyntaxKind::EXPR_STMT)]
    #[case("io:println(\"hi\");", SyntaxKind::EXPR_STMT)]
    #[case("_ = ep->respond(res);", SyntaxKind::ASSIGN_STMT)]
    #[case("return;", SyntaxKind::RETURN_STMT)]
    #[case("return a + b;", SyntaxKind::RETURN_STMT)]
    #[case("panic err;", SyntaxKind::PANIC_STMT)]
    #[case("break;", SyntaxKind::BREAK_STMT)]
    #[case("lock { count += 1; }", SyntaxKind::LOCK_STMT)]
    #[case("while i < 10 { i += 1; }", SyntaxKind::WHILE_STMT)]
    #[case("foreach var x in xs { }", SyntaxKind::FOREACH_STMT)]
    #[case("foreach int x in xs { }", SyntaxKind::FOREACH_STMT)]
    #[case("foreach (k, v) in m { }", SyntaxKind::FOREACH_STMT)]
    #[case("worker w1 returns int { return 1; }", SyntaxKind::WORKER_DECL)]
    #[case("fork { worker a { } worker b { } }", SyntaxKind::FORK_STMT)]
    #[case("xmlns \"http://x.org\" as x;", SyntaxKind::NAMESPACE_DECL)]
    fn test_statement_kinds(#[case] source: &str, #[case] kind: SyntaxKind) {
        assert_eq!(statement(source).kind(), kind);
    }

    #[test]
    fn test_else_if_chain_nests() {
        let node = statement("if a { } else if b { } else { }");
        assert_eq!(node.kind(), SyntaxKind::IF_STMT);
        let nested = node
            .children()
            .find(|n| n.kind() == SyntaxKind::ELSE_CLAUSE)
            .and_then(|c| c.first_child())
            .map(|n| n.kind());
        assert_eq!(nested, Some(SyntaxKind::IF_STMT));
    }

    #[test]
    fn test_match_clauses() {
        let node = statement(
            "match v { 0 => { } \"a\" | \"b\" => { } var (a, b) if a > b => { } x => io:println(x); }",
        );
        assert_eq!(node.kind(), SyntaxKind::MATCH_STMT);
        let clauses = node
            .children()
            .filter(|n| n.kind() == SyntaxKind::MATCH_CLAUSE)
            .count();
        assert_eq!(clauses, 4);
        assert!(
            node.descendants()
                .all(|n| n.kind() != SyntaxKind::ARROW_FUNCTION)
        );
    }

    #[test]
    fn test_transaction_clauses() {
        let node = statement(
            "transaction with retries = 2, oncommit = done { } onretry { } committed { } aborted { }",
        );
        let kinds: Vec<_> = node.children().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::TRANSACTION_PROPS,
                SyntaxKind::BLOCK,
                SyntaxKind::ONRETRY_CLAUSE,
                SyntaxKind::COMMITTED_CLAUSE,
                SyntaxKind::ABORTED_CLAUSE,
            ]
        );
    }

    #[test]
    fn test_stray_token_before_semicolon_is_one_error() {
        let result = parse_rule(Rule::Statement, "int x = 1 2;");
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].code, ErrorCode::E0201);
    }

    #[test]
    fn test_block_stops_at_top_level_keyword() {
        let result = parse_rule(Rule::Block, "{ int x = 1; public");
        assert_eq!(result.errors()[0].code, ErrorCode::E0202);
    }

    #[rstest]
    #[case("{ ? ; x = 1; }", ErrorCode::E0701)]
    #[case("{ ) ; x = 1; }", ErrorCode::E0205)]
    #[case("{ ] ; x = 1; }", ErrorCode::E0205)]
    fn test_unknown_statement_start(#[case] source: &str, #[case] code: ErrorCode) {
        let result = parse_rule(Rule::Block, source);
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].code, code);
        let block = result.syntax().first_child();
        let assigned = block.is_some_and(|b| {
            b.children().any(|n| n.kind() == SyntaxKind::ASSIGN_STMT)
        });
        assert!(assigned);
    }
}
