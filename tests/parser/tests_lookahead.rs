//! Choice points decided by bounded speculation

use crate::helpers::tree_render::{body_statement_kinds, count_kind};
use balsyn::parser::rule_parser::{Rule, parse_rule};
use balsyn::{ParseOptions, SyntaxKind, parse, parse_with};
use rstest::rstest;

fn in_function(body: &str) -> String {
    format!("function f() {{ {body} }}")
}

#[rstest]
#[case("http:Client c = new(url);", SyntaxKind::VAR_DEF_STMT)]
#[case("Person p = x;", SyntaxKind::VAR_DEF_STMT)]
#[case("foo:bar(1);", SyntaxKind::EXPR_STMT)]
#[case("a.b = c;", SyntaxKind::ASSIGN_STMT)]
#[case("a.b();", SyntaxKind::EXPR_STMT)]
#[case("a[i] += 2;", SyntaxKind::COMPOUND_ASSIGN_STMT)]
#[case("(a, b) = t;", SyntaxKind::TUPLE_DESTRUCTURE_STMT)]
#[case("(a + b);", SyntaxKind::EXPR_STMT)]
#[case("x -> w2;", SyntaxKind::WORKER_SEND_STMT)]
#[case("string `a${b}`;", SyntaxKind::EXPR_STMT)]
#[case("string s = string `a${b}`;", SyntaxKind::VAR_DEF_STMT)]
fn test_statement_choice(#[case] statement: &str, #[case] kind: SyntaxKind) {
    let parse = parse(&in_function(statement));
    assert!(parse.ok(), "{statement}: {:?}", parse.errors);
    assert_eq!(body_statement_kinds(&parse.syntax()), vec![kind]);
}

#[test]
fn test_qualified_name_needs_adjacent_colon() {
    assert!(parse(&in_function("foo:bar(1);")).ok());
    assert!(!parse(&in_function("foo : bar(1);")).ok());
}

#[test]
fn test_tuple_longer_than_the_lookahead_bound() {
    let elements: Vec<String> = (0..600).map(|i| i.to_string()).collect();
    let source = in_function(&format!("var t = ({});", elements.join(", ")));
    let parse = parse(&source);
    assert!(parse.ok(), "{:?}", parse.errors);

    let root = parse.syntax();
    let tuple = root
        .descendants()
        .find(|n| n.kind() == SyntaxKind::TUPLE_EXPR)
        .unwrap();
    assert_eq!(tuple.children().count(), 600);
}

#[test]
fn test_group_longer_than_the_lookahead_bound() {
    let terms: Vec<String> = (0..600).map(|i| i.to_string()).collect();
    let source = in_function(&format!("int s = ({});", terms.join(" + ")));
    let parse = parse(&source);
    assert!(parse.ok(), "{:?}", parse.errors);
    assert_eq!(count_kind(&parse.syntax(), SyntaxKind::PAREN_EXPR), 1);
}

#[test]
fn test_bound_exhaustion_takes_the_first_declared_alternative() {
    let source = in_function("var t = (a, b, c, d, e);");

    let full = parse(&source);
    assert!(full.ok(), "{:?}", full.errors);
    assert_eq!(count_kind(&full.syntax(), SyntaxKind::TUPLE_EXPR), 1);

    // Four tokens of lookahead cannot see that no `=>` follows the names
    let options = ParseOptions::default().max_lookahead_tokens(4);
    let bounded = parse_with(&source, &options);
    assert!(!bounded.ok());
    assert_eq!(count_kind(&bounded.syntax(), SyntaxKind::ARROW_FUNCTION), 1);
    assert_eq!(bounded.syntax().text().to_string(), source);
}

#[test]
fn test_nested_parentheses() {
    let source = format!("{}a{}", "(".repeat(20), ")".repeat(20));
    let result = parse_rule(Rule::Expression, &source);
    assert!(result.is_ok(), "{:?}", result.errors());
    assert_eq!(count_kind(&result.syntax(), SyntaxKind::PAREN_EXPR), 20);
}

#[test]
fn test_nesting_limit_is_a_diagnostic() {
    let source = format!("{}a{}", "(".repeat(20), ")".repeat(20));
    let options = ParseOptions::default().max_nesting(16);
    let result = balsyn::parser::rule_parser::parse_rule_with(Rule::Expression, &source, &options);
    assert!(
        result
            .errors()
            .iter()
            .any(|e| e.code == balsyn::ErrorCode::E0903)
    );
    assert_eq!(result.syntax().text().to_string(), source);
}

#[test]
fn test_deep_nesting_parses_on_a_sized_stack() {
    let source = format!("{}a{}", "(".repeat(300), ")".repeat(300));
    let result = parse_rule(Rule::Expression, &source);
    assert!(result.is_ok(), "{:?}", result.errors());
    assert_eq!(count_kind(&result.syntax(), SyntaxKind::PAREN_EXPR), 300);

    let program = in_function(&format!("int x = {}1;", "- ".repeat(200)));
    let parse = parse(&program);
    assert!(parse.ok(), "{:?}", parse.errors);
    assert_eq!(count_kind(&parse.syntax(), SyntaxKind::PREFIX_EXPR), 200);
}

#[test]
fn test_choice_is_deterministic() {
    let source = in_function("(a, b) = (c, (d, e)); x = (y) => y; var z = ((p), q);");
    let first = parse(&source);
    for _ in 0..5 {
        let again = parse(&source);
        assert_eq!(again.green, first.green);
        assert_eq!(again.errors, first.errors);
    }
}

#[test]
fn test_parenthesized_types() {
    for (source, kind) in [
        ("(int|string)[] xs = [];", SyntaxKind::GROUP_TYPE),
        ("(int, string) pair = (1, \"a\");", SyntaxKind::TUPLE_TYPE),
        ("() nothing = ();", SyntaxKind::NIL_TYPE),
    ] {
        let parse = parse(&in_function(source));
        assert!(parse.ok(), "{source}: {:?}", parse.errors);
        assert_eq!(count_kind(&parse.syntax(), kind), 1, "{source}");
    }
}
