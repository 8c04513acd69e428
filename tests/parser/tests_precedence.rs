//! Precedence climbing over expressions, reference chains and types

use crate::helpers::tree_render::{expr_sexpr, has_token, sexpr};
use balsyn::SyntaxKind;
use balsyn::parser::rule_parser::{Rule, parse_rule};
use rstest::rstest;

#[rstest]
#[case("a + b * c", "(+ a (* b c))")]
#[case("a * b + c", "(+ (* a b) c)")]
#[case("a - b - c", "(- (- a b) c)")]
#[case("a / b % c", "(% (/ a b) c)")]
#[case("a || b && c", "(|| a (&& b c))")]
#[case("a && b || c && d", "(|| (&& a b) (&& c d))")]
#[case("a == b < c", "(== a (< b c))")]
#[case("a & b == c", "(& a (== b c))")]
#[case("a << 1 + 2", "(<< a (+ 1 2))")]
#[case("a >> b", "(>> a b)")]
#[case("a >>> b << c", "(<< (>>> a b) c)")]
#[case("-a * b", "(* (- a) b)")]
#[case("!a && b", "(&& (! a) b)")]
#[case("(a + b) * c", "(* (PAREN_EXPR (+ a b)) c)")]
#[case("1 ... 10", "(... 1 10)")]
#[case("0 ..< n - 1", "(..< 0 (- n 1))")]
fn test_binary_and_prefix_operators(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(expr_sexpr(source), expected);
}

#[rstest]
#[case("a ? b : c ? d : e", "(? a b (? c d e))")]
#[case("a ? b + 1 : c", "(? a (+ b 1) c)")]
#[case("a > b ? a : b", "(? (> a b) a b)")]
#[case("a ?: b ?: c", "(?: a (?: b c))")]
#[case("a ?: b ? c : d", "(?: a (? b c d))")]
fn test_conditional_operators(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(expr_sexpr(source), expected);
}

#[rstest]
#[case("a[0].b()", "(CALL_EXPR (FIELD_EXPR (INDEX_EXPR a 0) b) (ARG_LIST))")]
#[case("f(x).y", "(FIELD_EXPR (FUNCTION_CALL f (ARG_LIST x)) y)")]
#[case("a.b.c", "(FIELD_EXPR (FIELD_EXPR a b) c)")]
#[case("m[k][0]", "(INDEX_EXPR (INDEX_EXPR m k) 0)")]
fn test_reference_chains(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(expr_sexpr(source), expected);
}

#[test]
fn test_reference_chain_is_an_operand() {
    assert_eq!(
        expr_sexpr("a.b + c[1] * d()"),
        "(+ (FIELD_EXPR a b) (* (INDEX_EXPR c 1) (FUNCTION_CALL d (ARG_LIST))))"
    );
}

#[test]
fn test_conversion_binds_tighter_than_binary() {
    assert_eq!(
        expr_sexpr("<float> a / b"),
        "(/ (TYPE_CONVERSION_EXPR (BUILTIN_TYPE) a) b)"
    );
}

#[rstest]
#[case("int|string[]", "(UNION_TYPE (BUILTIN_TYPE) (ARRAY_TYPE (BUILTIN_TYPE) (ARRAY_DIMENSION)))")]
#[case("int|string?", "(OPTIONAL_TYPE (UNION_TYPE (BUILTIN_TYPE) (BUILTIN_TYPE)))")]
#[case("int[]?", "(OPTIONAL_TYPE (ARRAY_TYPE (BUILTIN_TYPE) (ARRAY_DIMENSION)))")]
#[case("(int|string)[]", "(ARRAY_TYPE (GROUP_TYPE (UNION_TYPE (BUILTIN_TYPE) (BUILTIN_TYPE))) (ARRAY_DIMENSION))")]
fn test_type_operators(#[case] source: &str, #[case] expected: &str) {
    let result = parse_rule(Rule::TypeDescriptor, source);
    assert!(result.is_ok(), "{source}: {:?}", result.errors());
    let root = result.syntax();
    let node = root.first_child().unwrap_or(root);
    assert_eq!(sexpr(&node), expected);
}

#[test]
fn test_spaced_chevrons_close_type_parameters() {
    let result = parse_rule(Rule::TypeDescriptor, "map<map<int> >");
    assert!(result.is_ok(), "{:?}", result.errors());
    assert!(!has_token(&result.syntax(), SyntaxKind::SHR));

    let result = parse_rule(Rule::Expression, "a > > b");
    assert!(!result.is_ok());
    assert!(!has_token(&result.syntax(), SyntaxKind::SHR));
}
