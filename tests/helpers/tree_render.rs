//! Compact renderings of CST shapes for assertions.

use balsyn::parser::rule_parser::{Rule, parse_rule};
use balsyn::{SyntaxKind, SyntaxNode};

/// Operator nodes render as `(op operands...)`, names and literals as their
/// text, everything else as `(KIND children...)`.
pub fn sexpr(node: &SyntaxNode) -> String {
    match node.kind() {
        SyntaxKind::NAME_REF | SyntaxKind::LITERAL => node.text().to_string().trim().to_string(),
        kind => {
            let head = if is_operator_node(kind) {
                operator_text(node).unwrap_or_else(|| format!("{kind:?}"))
            } else {
                format!("{kind:?}")
            };
            let mut parts = vec![head];
            parts.extend(node.children().map(|child| sexpr(&child)));
            format!("({})", parts.join(" "))
        }
    }
}

fn is_operator_node(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::BINARY_EXPR
            | SyntaxKind::PREFIX_EXPR
            | SyntaxKind::TERNARY_EXPR
            | SyntaxKind::ELVIS_EXPR
            | SyntaxKind::RANGE_EXPR
    )
}

/// First significant token directly under `node`
pub fn operator_text(node: &SyntaxNode) -> Option<String> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| !t.kind().is_trivia())
        .map(|t| t.text().to_string())
}

/// Parse `source` as a single expression that must parse cleanly and render it
pub fn expr_sexpr(source: &str) -> String {
    let result = parse_rule(Rule::Expression, source);
    assert!(result.is_ok(), "{source}: {:?}", result.errors());
    let root = result.syntax();
    let node = root.first_child().unwrap_or(root);
    sexpr(&node)
}

/// Kinds of the statements directly inside the first function body
pub fn body_statement_kinds(root: &SyntaxNode) -> Vec<SyntaxKind> {
    root.descendants()
        .find(|n| n.kind() == SyntaxKind::BLOCK)
        .map(|block| block.children().map(|n| n.kind()).collect())
        .unwrap_or_default()
}

pub fn count_kind(root: &SyntaxNode, kind: SyntaxKind) -> usize {
    root.descendants().filter(|n| n.kind() == kind).count()
}

pub fn has_token(root: &SyntaxNode, kind: SyntaxKind) -> bool {
    root.descendants_with_tokens().any(|e| e.kind() == kind)
}
