//! Error recovery: one diagnostic per fault, and the parse carries on

use crate::helpers::diagnostic_helpers::error_codes;
use crate::helpers::tree_render::count_kind;
use balsyn::{ErrorCode, ParseOptions, SyntaxKind, parse, parse_with};
use rstest::rstest;

#[test]
fn test_missing_semicolon_is_inserted() {
    let parse = parse("function main() { int x = 1 }");
    assert_eq!(error_codes(&parse), vec![ErrorCode::E0201]);
    assert_eq!(
        parse.errors[0].message,
        "expected ';' in statement, found '}'"
    );
    assert_eq!(parse.errors[0].found, Some(SyntaxKind::R_BRACE));
    assert_eq!(count_kind(&parse.syntax(), SyntaxKind::VAR_DEF_STMT), 1);
    assert_eq!(count_kind(&parse.syntax(), SyntaxKind::MISSING), 1);
}

#[rstest]
#[case("function f() { int x = 1; }", "function f() { int x = 1 7; }")]
#[case("function f() returns int { return x; }", "function f() returns int { return x 7; }")]
#[case("function f() { while true { break; } }", "function f() { while true { break 7; } }")]
fn test_stray_token_is_deleted(#[case] clean: &str, #[case] broken: &str) {
    let before = parse(clean);
    assert!(before.ok(), "{:?}", before.errors);

    let after = parse(broken);
    assert_eq!(error_codes(&after), vec![ErrorCode::E0201]);
    assert_eq!(after.syntax().text().to_string(), broken);

    let nodes = |p: &balsyn::Parse| p.syntax().descendants().count();
    assert!(nodes(&after) - nodes(&before) <= 2);
    assert_eq!(count_kind(&after.syntax(), SyntaxKind::ERROR), 1);
}

#[test]
fn test_unclosed_block_ends_at_next_definition() {
    let source = "function f() {\n    int x = 1;\n\npublic function g() {\n}\n";
    let parse = parse(source);
    assert_eq!(error_codes(&parse), vec![ErrorCode::E0202]);
    assert_eq!(
        parse.errors[0].message,
        "expected '}' in block, found keyword 'public'"
    );
    let related = &parse.errors[0].related;
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].message, "block opened here");
    assert_eq!(&source[related[0].range], "{");
    assert_eq!(u32::from(related[0].range.start()), 13);
    assert_eq!(count_kind(&parse.syntax(), SyntaxKind::FUNCTION_DEF), 2);
}

#[test]
fn test_stray_token_at_top_level() {
    let parse = parse("} function f() { }");
    assert_eq!(error_codes(&parse), vec![ErrorCode::E0302]);
    assert_eq!(
        parse.errors[0].message,
        "unexpected '}' at top level: expected an import, a definition, or an annotation"
    );
    assert_eq!(count_kind(&parse.syntax(), SyntaxKind::FUNCTION_DEF), 1);
}

#[test]
fn test_unknown_statement_start_skips_to_next_statement() {
    let parse = parse("function f() { ? ; int y = 2; }");
    assert_eq!(error_codes(&parse), vec![ErrorCode::E0701]);
    assert_eq!(count_kind(&parse.syntax(), SyntaxKind::VAR_DEF_STMT), 1);
}

#[test]
fn test_halt_on_first_error() {
    let source = "function f() { int x = 1 }\nfunction g() { int y = 2 }\n";
    assert_eq!(parse(source).errors.len(), 2);

    let options = ParseOptions::default().halt_on_first_error(true);
    let halted = parse_with(source, &options);
    assert_eq!(halted.errors.len(), 1);
    assert_eq!(halted.syntax().text().to_string(), source);
}

#[test]
fn test_skip_budget_abandons_the_rest_losslessly() {
    let source = "function f() { ) ) ) ; x = 1; }\nfunction g() { }\n";
    let options = ParseOptions::default().max_skipped_tokens(1);
    let parse = parse_with(source, &options);
    assert!(!parse.ok());
    assert_eq!(parse.syntax().text().to_string(), source);
}

#[test]
fn test_unterminated_string() {
    let source = "function f() returns string {\n    return \"abc;\n}\n";
    let parse = parse(source);
    assert!(!parse.ok());
    assert!(
        parse
            .errors
            .iter()
            .any(|e| e.found == Some(SyntaxKind::ERROR))
    );
    assert_eq!(parse.syntax().text().to_string(), source);
}

#[test]
fn test_query_clauses_out_of_order() {
    let parse = parse("function f() { var r = from t order by a select *; }");
    assert_eq!(error_codes(&parse), vec![ErrorCode::E0803]);
    assert_eq!(count_kind(&parse.syntax(), SyntaxKind::TABLE_QUERY), 1);
}

#[rstest]
#[case("type P record { int age 7 = 0; };", ErrorCode::E0901)]
#[case("function f() { int age 7 = 0; }", ErrorCode::E0901)]
#[case("service hello on $ ep { resource function hi() { } }", ErrorCode::E0101)]
#[case("service hello on 7 ep { resource function hi() { } }", ErrorCode::E0902)]
#[case("import 7 ballerina/io;", ErrorCode::E0501)]
#[case("function f() { if c { } 7 else { } }", ErrorCode::E0901)]
fn test_one_stray_token_is_one_diagnostic(#[case] source: &str, #[case] code: ErrorCode) {
    let parse = parse(source);
    assert_eq!(error_codes(&parse), vec![code]);
    assert_eq!(parse.syntax().text().to_string(), source);
}

#[test]
fn test_stray_token_keeps_the_surrounding_structure() {
    let record = parse("type P record { int age 7 = 0; };");
    assert_eq!(count_kind(&record.syntax(), SyntaxKind::FIELD_DEF), 1);
    assert_eq!(count_kind(&record.syntax(), SyntaxKind::ERROR), 1);

    let service = parse("service hello on $ ep { resource function hi() { } }");
    assert_eq!(count_kind(&service.syntax(), SyntaxKind::SERVICE_BODY), 1);
    assert_eq!(count_kind(&service.syntax(), SyntaxKind::FUNCTION_DEF), 1);

    let import = parse("import 7 ballerina/io;");
    assert_eq!(count_kind(&import.syntax(), SyntaxKind::ORG_NAME), 1);

    let branch = parse("function f() { if c { } 7 else { } }");
    assert_eq!(count_kind(&branch.syntax(), SyntaxKind::ELSE_CLAUSE), 1);
    assert_eq!(count_kind(&branch.syntax(), SyntaxKind::IF_STMT), 1);
}

#[test]
fn test_cascade_after_a_fault_is_not_reported() {
    // the missing operand and the missing ';' are one fault
    let first = parse("function f() { int x = $ }");
    assert_eq!(error_codes(&first), vec![ErrorCode::E0101]);

    let second = parse("function f() { int x = ; int y = ; }");
    assert_eq!(error_codes(&second), vec![ErrorCode::E0406, ErrorCode::E0406]);
}
