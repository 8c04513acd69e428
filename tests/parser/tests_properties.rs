//! Property-based tests: the parser never loses input, never panics, and
//! decides the same way every time

use crate::helpers::source_fixtures::{ORDER_PROCESSING, SHIFTS_AND_GENERICS};
use crate::helpers::tree_render::expr_sexpr;
use balsyn::parser::rule_parser::{Rule, parse_rule};
use balsyn::parser::tokenize;
use balsyn::{ErrorCode, Parse, SyntaxKind, SyntaxNode, TextSize, parse};
use proptest::prelude::*;

const FRAGMENTS: &[&str] = &[
    "function", "main", "(", ")", "{", "}", "[", "]", ";", ",", "int", "string", "var", "x", "y",
    "=", "+", "*", "<", ">", ">>", "<<", "?", ":", "?:", "=>", "->", "<-", "1", "2.5", "\"s\"",
    "if", "else", "while", "return", "match", "worker", "fork", "from", "select", "where",
    "type", "record", "{|", "|}", "import", "ballerina/io", "io:println", "`", "${", "xml",
    "map<int>", "...", "@", "#", "// note\n", "\n",
];

fn token_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..60).prop_map(|parts| parts.join(" "))
}

/// Every node's children tile it exactly: no gaps, no overlaps
fn assert_tiled(node: &SyntaxNode) {
    let mut at = node.text_range().start();
    for child in node.children_with_tokens() {
        let range = child.text_range();
        assert_eq!(range.start(), at, "gap before {:?}", child.kind());
        at = range.end();
        if let Some(child) = child.into_node() {
            assert_tiled(&child);
        }
    }
    assert_eq!(at, node.text_range().end());
}

/// Programs that parse without diagnostics and contain no template or XML text
const CLEAN_PROGRAMS: &[&str] = &[ORDER_PROCESSING, SHIFTS_AND_GENERICS];

/// Start offsets of significant tokens that already have trivia before them
///
/// A character inserted there leaves the adjacency of every token unchanged.
fn spaced_token_starts(source: &str) -> Vec<usize> {
    tokenize(source)
        .windows(2)
        .filter(|pair| {
            pair[0].kind.is_trivia()
                && !pair[1].kind.is_trivia()
                && pair[1].kind != SyntaxKind::EOF
        })
        .map(|pair| usize::from(pair[1].offset))
        .collect()
}

/// Operator pairs `(tighter, looser)` from adjacent precedence tiers
const TIERS: &[(&str, &str)] = &[
    ("*", "+"),
    ("%", "-"),
    ("+", "<<"),
    ("-", ">>"),
    ("<<", "<"),
    (">>", ">="),
    ("<", "=="),
    ("<=", "!="),
    ("==", "&"),
    ("!=", "|"),
    ("===", "^"),
    ("&", "&&"),
    ("|", "&&"),
    ("&&", "||"),
];

proptest! {
    #[test]
    fn prop_arbitrary_text_is_lossless(source in "\\PC{0,200}") {
        let parse = parse(&source);
        prop_assert_eq!(parse.syntax().text().to_string(), source);
    }

    #[test]
    fn prop_token_soup_is_lossless(source in token_soup()) {
        let parse = parse(&source);
        prop_assert_eq!(parse.syntax().text().to_string(), source.clone());
        assert_tiled(&parse.syntax());
    }

    #[test]
    fn prop_parse_is_deterministic(source in token_soup()) {
        let first = parse(&source);
        let second = parse(&source);
        prop_assert_eq!(first.green, second.green);
        prop_assert_eq!(first.errors, second.errors);
    }

    #[test]
    fn prop_error_ranges_lie_within_input(source in token_soup()) {
        let parse = parse(&source);
        let end = TextSize::of(source.as_str());
        for error in &parse.errors {
            prop_assert!(error.range.end() <= end, "{:?} past {:?}", error.range, end);
        }
    }

    #[test]
    fn prop_rule_parses_are_lossless(source in token_soup()) {
        for rule in [
            Rule::Expression,
            Rule::TypeDescriptor,
            Rule::VariableReference,
            Rule::Statement,
            Rule::Block,
        ] {
            let result = parse_rule(rule, &source);
            prop_assert_eq!(result.syntax().text().to_string(), source.clone(), "{:?}", rule);
        }
    }

    #[test]
    fn prop_tighter_operator_groups_first(
        (hi, lo) in prop::sample::select(TIERS),
        x in "v_[a-z0-9]{0,4}",
        y in "v_[a-z0-9]{0,4}",
        z in "v_[a-z0-9]{0,4}",
    ) {
        prop_assert_eq!(
            expr_sexpr(&format!("{x} {lo} {y} {hi} {z}")),
            format!("({lo} {x} ({hi} {y} {z}))")
        );
        prop_assert_eq!(
            expr_sexpr(&format!("{x} {hi} {y} {lo} {z}")),
            format!("({lo} ({hi} {x} {y}) {z})")
        );
    }

    #[test]
    fn prop_one_stray_character_is_one_diagnostic(
        source in prop::sample::select(CLEAN_PROGRAMS),
        pick in any::<prop::sample::Index>(),
    ) {
        let starts = spaced_token_starts(source);
        let at = starts[pick.index(starts.len())];
        let broken = format!("{}$ {}", &source[..at], &source[at..]);

        let clean = parse(source);
        prop_assert!(clean.ok(), "{:?}", clean.errors);
        let after = parse(&broken);
        prop_assert_eq!(after.errors.len(), 1, "{:?}", after.errors);
        prop_assert_eq!(after.errors[0].code, ErrorCode::E0101);
        prop_assert_eq!(after.syntax().text().to_string(), broken.clone());

        let nodes = |p: &Parse| p.syntax().descendants().count();
        prop_assert!(nodes(&after).abs_diff(nodes(&clean)) <= 2);
    }
}
