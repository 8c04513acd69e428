//! How diagnostics read once rendered for a user

use crate::helpers::diagnostic_helpers::render;
use balsyn::parser::{ParseContext, TokenSet};
use balsyn::{ErrorCode, SyntaxError, SyntaxKind, TextRange, TextSize, parse};

#[test]
fn test_rendered_location_is_one_based() {
    let source = "} function f() { }";
    let parse = parse(source);
    assert_eq!(
        render(source, &parse.errors),
        "  1:1 E0302: unexpected '}' at top level: expected an import, a definition, or an annotation"
    );
}

#[test]
fn test_rendered_location_on_later_line() {
    let source = "function main() {\n    int x = 1\n}\n";
    let parse = parse(source);
    assert_eq!(
        render(source, &parse.errors),
        "  3:1 E0201: expected ';' in statement, found '}'"
    );
}

#[test]
fn test_unterminated_string_is_one_lexical_error_with_a_hint() {
    let source = "function f() {\n    int x = 1 \"abc\n}\n";
    let parse = parse(source);
    assert_eq!(parse.errors.len(), 1);
    let error = &parse.errors[0];
    assert_eq!(error.code, ErrorCode::E0102);
    assert_eq!(error.found, Some(SyntaxKind::ERROR));
    assert_eq!(&source[error.range], "\"abc");
    assert_eq!(
        error.hint.as_deref(),
        Some("add a closing '\"' before the end of the line")
    );
    assert!(
        error
            .format()
            .starts_with("E0102: unterminated string literal '\"abc' in "),
        "{}",
        error.format()
    );
}

#[test]
fn test_expected_set_is_recorded() {
    let parse = parse("import ballerina/io\nfunction f() { }");
    let error = parse
        .errors
        .iter()
        .find(|e| e.code == ErrorCode::E0201)
        .unwrap();
    assert!(error.expected.contains(SyntaxKind::SEMICOLON));
    assert_eq!(error.expected.describe(), "';'");
    assert_eq!(error.found, Some(SyntaxKind::FUNCTION_KW));
}

#[test]
fn test_builder_output() {
    let error = SyntaxError::builder(ErrorCode::E0203)
        .message("expected ')' in argument list, found ';'")
        .range(TextRange::new(TextSize::new(4), TextSize::new(5)))
        .hint("close the argument list")
        .build();
    assert_eq!(
        error.format(),
        "E0203: expected ')' in argument list, found ';'\n  hint: close the argument list"
    );
    assert_eq!(error.code.to_string(), "E0203");
}

#[test]
fn test_context_phrases() {
    assert_eq!(ParseContext::TopLevel.description(), "at top level");
    assert_eq!(ParseContext::MatchClause.description(), "in match clause");
    assert_eq!(ParseContext::XmlLiteral.description(), "in XML literal");
}

#[test]
fn test_token_set_descriptions() {
    assert_eq!(TokenSet::EMPTY.describe(), "nothing");
    assert_eq!(TokenSet::single(SyntaxKind::IMPORT_KW).describe(), "'import'");
    assert_eq!(SyntaxKind::ERROR.display_name(), "invalid token");
    assert_eq!(SyntaxKind::EOF.display_name(), "end of input");
}
