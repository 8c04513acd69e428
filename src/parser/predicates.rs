//! Semantic predicates
//!
//! Boolean queries over the raw token stream (trivia included) that gate
//! grammar alternatives the token kinds alone cannot decide. The lexer never
//! merges chevrons, so `>>` reaches the parser as two `GT` tokens; whether they
//! form a shift operator depends only on whether anything separates them.

use super::parser::Parser;
use super::syntax_kind::SyntaxKind;

/// A shift operator assembled from adjacent chevrons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftOperator {
    /// One of `SHL`, `SHR`, `USHR` or their compound-assignment forms
    pub kind: SyntaxKind,
    /// Number of raw tokens the operator spans
    pub width: usize,
}

impl ShiftOperator {
    /// `<<=`, `>>=` and `>>>=` end an expression; statements treat them as compound assignment
    pub fn is_assignment(&self) -> bool {
        matches!(
            self.kind,
            SyntaxKind::SHL_EQ | SyntaxKind::SHR_EQ | SyntaxKind::USHR_EQ
        )
    }
}

/// The shift operator starting at the current token, if its chevrons are adjacent
///
/// The answer for a position is cached on the session, so the several
/// candidates of one choice point ask the token stream only once.
pub fn shift_operator(p: &mut Parser<'_>) -> Option<ShiftOperator> {
    let at = p.current_raw_index()?;
    if let Some((cached_at, cached)) = p.shift_cache {
        if cached_at == at {
            return cached;
        }
    }
    let found = scan_shift(p, at);
    p.shift_cache = Some((at, found));
    found
}

fn scan_shift(p: &Parser<'_>, at: usize) -> Option<ShiftOperator> {
    let kind_at = |i: usize| p.raw_token(i).map(|t| t.kind);
    let (kind, width) = match (kind_at(at)?, kind_at(at + 1), kind_at(at + 2)) {
        (SyntaxKind::LT, Some(SyntaxKind::LT), _) => (SyntaxKind::SHL, 2),
        (SyntaxKind::LT, Some(SyntaxKind::LT_EQ), _) => (SyntaxKind::SHL_EQ, 2),
        (SyntaxKind::GT, Some(SyntaxKind::GT), Some(SyntaxKind::GT)) => (SyntaxKind::USHR, 3),
        (SyntaxKind::GT, Some(SyntaxKind::GT), Some(SyntaxKind::GT_EQ)) => {
            (SyntaxKind::USHR_EQ, 3)
        }
        (SyntaxKind::GT, Some(SyntaxKind::GT), _) => (SyntaxKind::SHR, 2),
        (SyntaxKind::GT, Some(SyntaxKind::GT_EQ), _) => (SyntaxKind::SHR_EQ, 2),
        _ => return None,
    };
    Some(ShiftOperator { kind, width })
}

/// `T...` in a record body: the ellipsis touches the type before it
pub fn rest_descriptor(p: &Parser<'_>) -> bool {
    p.at(SyntaxKind::ELLIPSIS) && p.is_adjacent(0)
}

/// `!...` sealing a record body or an array dimension
pub fn sealed_marker(p: &Parser<'_>) -> bool {
    p.at(SyntaxKind::BANG) && p.nth(1) == SyntaxKind::ELLIPSIS && p.is_adjacent(1)
}

/// `pkg:name` with the colon at lookahead `k`: no trivia on either side of it
pub fn qualified_colon(p: &Parser<'_>, k: usize) -> bool {
    p.nth(k) == SyntaxKind::COLON
        && p.nth(k + 1) == SyntaxKind::IDENT
        && p.is_adjacent(k)
        && p.is_adjacent(k + 1)
}
