//! Precedence climbing
//!
//! One loop serves the three left-recursive grammars (types, variable
//! reference chains, expressions):
//!
//! ```text
//! climb(min_bp):
//!     primary
//!     while next operator binds tighter than min_bp:
//!         fold operator onto everything parsed since the primary
//! ```
//!
//! Left-associative operators parse their right operand at their own binding
//! power, so an equal operator ends the operand and is folded by the outer
//! loop. Right-associative and ternary operators recurse one step lower, so an
//! equal operator is absorbed by the operand instead.
//!
//! Each instance supplies its primaries and operator table through
//! [`Climbing`]; instances with grouped repetitions (array dimensions, union
//! members) override [`Climbing::apply`].

use super::errors::{ErrorCode, SyntaxError, expectation_message};
use super::parser::{Checkpoint, Parser};
use super::recovery;
use super::rules::{self, Rule};
use super::syntax_kind::SyntaxKind;
use super::token_set::TokenSet;

/// How an operator combines with its operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    BinaryLeft,
    /// Assignment-like: `a ?: b ?: c` is `a ?: (b ?: c)`
    BinaryRight,
    /// No operand after the operator
    Postfix,
    /// `cond ? then : else`, right-associative
    Ternary,
}

/// One row of an operator table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorDescriptor {
    pub kind: SyntaxKind,
    pub bp: u8,
    pub fixity: Fixity,
    /// Node kind the fold produces
    pub node: SyntaxKind,
}

impl OperatorDescriptor {
    pub const fn new(kind: SyntaxKind, bp: u8, fixity: Fixity, node: SyntaxKind) -> Self {
        Self {
            kind,
            bp,
            fixity,
            node,
        }
    }
}

/// One instantiation of the climbing engine
pub trait Climbing: Sized {
    /// Used in diagnostics (`expected type after '|'`)
    const NAME: &'static str;
    /// Rule invoked for operands, so each operand gets its own frame and threshold
    const RULE: Rule;
    /// Tokens that can start a primary
    const FIRST: TokenSet;
    /// Operators in descending binding power
    const OPERATORS: &'static [OperatorDescriptor];

    /// Parse one primary; false (with nothing consumed or reported) when none starts here
    fn primary(p: &mut Parser<'_>) -> bool;

    fn peek_operator(p: &mut Parser<'_>) -> Option<OperatorDescriptor> {
        lookup(Self::OPERATORS, p.current_kind())
    }

    fn consume_operator(p: &mut Parser<'_>, _op: &OperatorDescriptor) {
        p.bump();
    }

    fn apply(p: &mut Parser<'_>, lhs: Checkpoint, op: &OperatorDescriptor) {
        fold::<Self>(p, lhs, op);
    }
}

/// First table row for `kind`
pub fn lookup(table: &[OperatorDescriptor], kind: SyntaxKind) -> Option<OperatorDescriptor> {
    table.iter().find(|op| op.kind == kind).copied()
}

/// Parse a primary and every operator binding tighter than `min_bp`
///
/// Returns false when no primary starts here; nothing is consumed then.
pub fn climb<C: Climbing>(p: &mut Parser<'_>, min_bp: u8) -> bool {
    let lhs = p.checkpoint();
    if !C::primary(p) {
        return false;
    }
    while let Some(op) = C::peek_operator(p) {
        if op.bp <= min_bp {
            break;
        }
        let before = p.bumped();
        C::apply(p, lhs, &op);
        if p.bumped() == before {
            break;
        }
    }
    true
}

/// The standard fold: consume the operator, parse what its fixity requires,
/// wrap everything since `lhs` into `op.node`
pub fn fold<C: Climbing>(p: &mut Parser<'_>, lhs: Checkpoint, op: &OperatorDescriptor) {
    C::consume_operator(p, op);
    match op.fixity {
        Fixity::BinaryLeft => operand::<C>(p, op.bp),
        Fixity::BinaryRight => operand::<C>(p, op.bp.saturating_sub(1)),
        Fixity::Ternary => {
            operand::<C>(p, 0);
            p.expect(SyntaxKind::COLON);
            operand::<C>(p, op.bp.saturating_sub(1));
        }
        Fixity::Postfix => {}
    }
    p.wrap(lhs, op.node);
}

/// Parse an operand at threshold `min_bp`, or report it missing
pub fn operand<C: Climbing>(p: &mut Parser<'_>, min_bp: u8) {
    if !p.at_set(C::FIRST) {
        missing_operand::<C>(p);
        return;
    }
    rules::parse_rule_bp(p, C::RULE, min_bp);
}

fn missing_operand<C: Climbing>(p: &mut Parser<'_>) {
    let context = p
        .innermost_frame()
        .map(|f| f.rule.context())
        .unwrap_or_default();
    let found = recovery::describe_found(p);
    let error = SyntaxError::builder(ErrorCode::E0402)
        .message(expectation_message(C::NAME, context, &found))
        .range(p.current_range())
        .expected(C::FIRST)
        .found(p.current_kind())
        .build();
    recovery::report(p, error);
    p.missing();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::grammar::expressions::ExpressionClimbing;
    use crate::parser::grammar::references::ReferenceClimbing;
    use crate::parser::grammar::types::TypeClimbing;

    fn assert_descending(table: &[OperatorDescriptor]) {
        for pair in table.windows(2) {
            assert!(
                pair[0].bp >= pair[1].bp,
                "{:?} listed before {:?}",
                pair[0].kind,
                pair[1].kind
            );
        }
    }

    #[test]
    fn test_tables_are_ordered_by_binding_power() {
        assert_descending(TypeClimbing::OPERATORS);
        assert_descending(ReferenceClimbing::OPERATORS);
        assert_descending(ExpressionClimbing::OPERATORS);
    }

    #[test]
    fn test_reference_chain_binding_powers() {
        let bp = |kind| lookup(ReferenceClimbing::OPERATORS, kind).map(|op| op.bp);
        assert_eq!(bp(SyntaxKind::L_BRACKET), Some(4));
        assert_eq!(bp(SyntaxKind::DOT), Some(3));
        assert_eq!(bp(SyntaxKind::AT), Some(2));
    }

    #[test]
    fn test_type_binding_powers() {
        let bp = |kind| lookup(TypeClimbing::OPERATORS, kind).map(|op| op.bp);
        assert_eq!(bp(SyntaxKind::L_BRACKET), Some(7));
        assert_eq!(bp(SyntaxKind::PIPE), Some(6));
        assert_eq!(bp(SyntaxKind::QUESTION), Some(5));
    }

    #[test]
    fn test_lookup_takes_first_row() {
        let table = [
            OperatorDescriptor::new(
                SyntaxKind::PLUS,
                5,
                Fixity::BinaryLeft,
                SyntaxKind::BINARY_EXPR,
            ),
            OperatorDescriptor::new(SyntaxKind::PLUS, 1, Fixity::Postfix, SyntaxKind::ERROR),
        ];
        assert_eq!(lookup(&table, SyntaxKind::PLUS).map(|op| op.bp), Some(5));
        assert_eq!(lookup(&table, SyntaxKind::MINUS), None);
    }
}
