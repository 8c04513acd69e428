//! Lookahead disambiguation
//!
//! A choice point lists its [`Alternative`]s in declaration order. Guards are
//! cheap token tests; when more than one guard holds, each surviving candidate
//! is run speculatively on the live session (tree sink switched off,
//! diagnostics counted privately, everything rolled back afterwards) and the
//! first one that parses without a diagnostic wins. When none does, the one
//! whose first diagnostic comes latest is taken, and among those the one with
//! the fewest diagnostics.
//!
//! Speculation is bounded two ways. Nested probes share one token budget
//! (`ParseOptions::max_lookahead_tokens`); past it the input reads as `EOF` and
//! nothing more is counted against the candidate, so several candidates that
//! agree up to the bound are all viable and the earliest-declared one wins.
//! Nesting depth is capped by `ParseOptions::max_speculation_depth`; a choice
//! point reached at the cap takes its first candidate without probing.
//!
//! Probe results are memoized per (production, position), which keeps nested
//! ambiguous constructs such as parenthesized types linear. A result cut short
//! by the token budget is reused only while the remaining budget is no larger
//! than the one it was computed with. A result that contains a choice taken at
//! the depth cap is reused freely: the cap only decides which candidate is
//! taken first, and the memo keeps that decision stable for the position.

use super::parser::Parser;
use super::rules::RuleFn;
use super::syntax_kind::SyntaxKind;
use super::token_set::TokenSet;

/// Cheap test deciding whether an alternative can start at the current token
#[derive(Clone, Copy)]
pub enum Guard {
    Always,
    /// The current token is in the set
    Set(TokenSet),
    /// The next significant tokens are exactly these kinds
    Sequence(&'static [SyntaxKind]),
    /// Arbitrary read-only test (typically a semantic predicate)
    Custom(fn(&Parser<'_>) -> bool),
}

impl Guard {
    pub fn holds(&self, p: &Parser<'_>) -> bool {
        match self {
            Guard::Always => true,
            Guard::Set(set) => p.at_set(*set),
            Guard::Sequence(kinds) => kinds.iter().enumerate().all(|(i, k)| p.nth(i) == *k),
            Guard::Custom(test) => test(p),
        }
    }
}

impl std::fmt::Debug for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Guard::Always => write!(f, "Always"),
            Guard::Set(set) => f.debug_tuple("Set").field(set).finish(),
            Guard::Sequence(kinds) => f.debug_tuple("Sequence").field(kinds).finish(),
            Guard::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// One grammar choice: a guard and the production to run when chosen
#[derive(Debug, Clone, Copy)]
pub struct Alternative {
    pub name: &'static str,
    pub guard: Guard,
    pub parse: RuleFn,
}

impl Alternative {
    pub const fn new(name: &'static str, guard: Guard, parse: RuleFn) -> Self {
        Self { name, guard, parse }
    }
}

/// Result of probing one alternative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    /// The probe recorded no diagnostic
    pub viable: bool,
    /// Raw token index of the first diagnostic, or where the probe stopped
    pub progress: usize,
    /// Diagnostics the probe recorded
    pub errors: usize,
}

impl ProbeResult {
    /// Ranks failed probes: later first diagnostic, then fewer diagnostics
    fn beats(&self, other: &ProbeResult) -> bool {
        (self.progress, std::cmp::Reverse(self.errors))
            > (other.progress, std::cmp::Reverse(other.errors))
    }
}

/// A memoized probe together with the bound it was computed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MemoEntry {
    pub result: ProbeResult,
    /// Cut short by the token budget
    pub tainted: bool,
    pub depth_capped: bool,
    pub budget: usize,
}

impl MemoEntry {
    fn reusable(&self, budget: usize) -> bool {
        !self.tainted || budget <= self.budget
    }
}

/// Pick one alternative at the current position, or `None` when no guard holds
pub fn choose<'a>(p: &mut Parser<'_>, alts: &'a [Alternative]) -> Option<&'a Alternative> {
    let candidates: Vec<&Alternative> = alts.iter().filter(|a| a.guard.holds(p)).collect();
    let first = match candidates.as_slice() {
        [] => return None,
        [only] => return Some(*only),
        [first, ..] => *first,
    };

    if p.halted() {
        return Some(first);
    }
    if p.speculation_depth() >= p.options().max_speculation_depth {
        p.mark_depth_capped();
        tracing::debug!(
            alternative = first.name,
            depth = p.speculation_depth(),
            "speculation depth exhausted, taking first candidate"
        );
        return Some(first);
    }

    let mut best: Option<(&Alternative, ProbeResult)> = None;
    for alt in candidates {
        let result = probe(p, alt);
        if result.viable {
            if !p.is_speculating() {
                tracing::debug!(alternative = alt.name, "chose viable alternative");
            }
            return Some(alt);
        }
        if best.is_none_or(|(_, held)| result.beats(&held)) {
            best = Some((alt, result));
        }
    }

    let (alt, result) = best?;
    if !p.is_speculating() {
        tracing::debug!(
            alternative = alt.name,
            progress = result.progress,
            errors = result.errors,
            "no viable alternative, taking the one that got furthest"
        );
    }
    Some(alt)
}

/// Choose and run an alternative; false when no guard holds
pub fn dispatch(p: &mut Parser<'_>, alts: &[Alternative]) -> bool {
    match choose(p, alts) {
        Some(alt) => {
            (alt.parse)(p);
            true
        }
        None => false,
    }
}

/// Run `alt` speculatively and roll everything back
pub fn probe(p: &mut Parser<'_>, alt: &Alternative) -> ProbeResult {
    let at = p.current_raw_index().unwrap_or_else(|| p.raw_pos());
    let key = (alt.parse as usize, at);
    let budget = p.lookahead_remaining();
    if let Some(hit) = p.probe_memo.get(&key).copied() {
        if hit.reusable(budget) {
            if hit.tainted {
                p.taint_speculation();
            }
            if hit.depth_capped {
                p.mark_depth_capped();
            }
            return hit.result;
        }
    }

    p.probes_run += 1;
    let snapshot = p.begin_speculation();
    (alt.parse)(p);
    let outcome = p.end_speculation(snapshot);

    let result = ProbeResult {
        viable: outcome.viable,
        progress: outcome.progress,
        errors: outcome.errors,
    };
    p.probe_memo.insert(
        key,
        MemoEntry {
            result,
            tainted: outcome.tainted,
            depth_capped: outcome.depth_capped,
            budget,
        },
    );
    result
}
