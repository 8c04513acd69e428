//! Error recovery
//!
//! The controller moves through three states. In `Sync` the parser is matching
//! normally. A mismatch moves it to `Reporting`, which records exactly one
//! diagnostic, then to `Skipping`, which discards tokens (balanced over
//! brackets) until a token in the union of the active rules' synchronization
//! sets appears. The rule that failed resumes there and its node is partial.
//!
//! Three repairs are tried for a missing token, cheapest first:
//! - insertion: the current token can already resume an enclosing rule, so a
//!   zero-width `MISSING` node stands in for the expected token
//! - deletion: the token after the current one is the expected token, so the
//!   current token is wrapped in `ERROR` and the expected one consumed
//! - resynchronization: skip to the sync set (or the expected token)
//!
//! After a diagnostic the controller waits for a real token match. Reports
//! made before one arrives are cascades of the first fault and are dropped.
//! Lexer `ERROR` tokens never reach the grammar: the cursor passes over them
//! and each is reported here once, wrapped in its own `ERROR` node.

use rowan::TextRange;

use super::errors::{ErrorCode, ParseContext, SyntaxError, expectation_message};
use super::lexer::Token;
use super::parser::Parser;
use super::syntax_kind::SyntaxKind;
use super::token_set::TokenSet;

/// Where the recovery state machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryState {
    #[default]
    Sync,
    Reporting,
    Skipping,
}

/// Per-session recovery bookkeeping
///
/// Copied into speculation snapshots, so a probe can never leave the real
/// parse in a different recovery state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecoveryController {
    state: RecoveryState,
    /// Raw index of the token the last diagnostic was reported at
    last_report: Option<usize>,
    /// A diagnostic was recorded and no token has been matched since
    awaiting_match: bool,
}

impl RecoveryController {
    pub fn state(&self) -> RecoveryState {
        self.state
    }

    pub fn awaiting_match(&self) -> bool {
        self.awaiting_match
    }

    /// A token was consumed; outside of skipping that ends a cascade
    pub(crate) fn on_bump(&mut self) {
        if self.state != RecoveryState::Skipping {
            self.awaiting_match = false;
        }
    }

    fn transition(&mut self, to: RecoveryState) {
        if self.state != to {
            tracing::trace!(from = ?self.state, ?to, "recovery state");
            self.state = to;
        }
    }
}

const OPENERS: TokenSet = TokenSet::new(&[
    SyntaxKind::L_PAREN,
    SyntaxKind::L_BRACKET,
    SyntaxKind::L_BRACE,
    SyntaxKind::L_BRACE_PIPE,
    SyntaxKind::TEMPLATE_INTERP_START,
    SyntaxKind::XML_INTERP_START,
]);

const CLOSERS: TokenSet = TokenSet::new(&[
    SyntaxKind::R_PAREN,
    SyntaxKind::R_BRACKET,
    SyntaxKind::R_BRACE,
    SyntaxKind::PIPE_R_BRACE,
    SyntaxKind::XML_INTERP_END,
]);

fn current_context(p: &Parser<'_>) -> ParseContext {
    p.innermost_frame()
        .map(|f| f.rule.context())
        .unwrap_or_default()
}

/// Render the current token for a diagnostic: `end of input`, `identifier 'x'`, `';'`
pub(crate) fn describe_found(p: &Parser<'_>) -> String {
    let kind = p.current_kind();
    let text = p.current_text();
    match kind {
        SyntaxKind::EOF => "end of input".to_string(),
        SyntaxKind::IDENT | SyntaxKind::INTEGER_LITERAL | SyntaxKind::FLOAT_LITERAL => {
            format!("{} '{}'", kind.display_name(), text)
        }
        SyntaxKind::STRING_LITERAL => "string literal".to_string(),
        _ if kind.is_keyword() => format!("keyword '{text}'"),
        _ => kind.display_name().to_string(),
    }
}

/// Diagnostic code for a failed expectation of `kind`
fn code_for(p: &Parser<'_>, kind: SyntaxKind) -> ErrorCode {
    match kind {
        SyntaxKind::SEMICOLON => ErrorCode::E0201,
        SyntaxKind::R_BRACE | SyntaxKind::PIPE_R_BRACE => ErrorCode::E0202,
        SyntaxKind::R_PAREN => ErrorCode::E0203,
        SyntaxKind::R_BRACKET => ErrorCode::E0204,
        SyntaxKind::GT => ErrorCode::E0206,
        SyntaxKind::IDENT => ErrorCode::E0301,
        SyntaxKind::BACKTICK => match current_context(p) {
            ParseContext::XmlLiteral => ErrorCode::E0802,
            _ => ErrorCode::E0801,
        },
        _ => ErrorCode::E0902,
    }
}

/// Record one diagnostic unless it repeats or cascades from the previous one
///
/// While speculating every report counts, since the probe's error count is
/// what decides viability.
pub(crate) fn report(p: &mut Parser<'_>, error: SyntaxError) {
    let at = p.current_raw_index().unwrap_or_else(|| p.raw_pos());
    report_at(p, error, at);
}

fn report_at(p: &mut Parser<'_>, error: SyntaxError, at: usize) {
    if p.halted() {
        return;
    }
    if p.is_speculating() {
        p.push_error(error);
        return;
    }
    if p.recovery.last_report == Some(at) {
        tracing::trace!(code = %error.code, "suppressed duplicate diagnostic");
        return;
    }
    if p.recovery.awaiting_match {
        tracing::trace!(code = %error.code, "suppressed cascading diagnostic");
        return;
    }
    p.recovery.transition(RecoveryState::Reporting);
    p.recovery.last_report = Some(at);
    p.recovery.awaiting_match = true;
    p.push_error(error);
}

/// Report the lexer `ERROR` token at raw `index`
///
/// Speculative parses pass over these silently: every alternative meets the
/// same token, so it cannot tell them apart.
pub(crate) fn report_lexical(p: &mut Parser<'_>, token: &Token<'_>, index: usize) {
    if p.is_speculating() {
        return;
    }
    let code = if token.text.starts_with('"') {
        ErrorCode::E0102
    } else {
        ErrorCode::E0101
    };
    let mut builder = SyntaxError::builder(code)
        .message(format!(
            "{} '{}' {}",
            code.default_message(),
            token.text,
            current_context(p).description()
        ))
        .range(token.range())
        .found(SyntaxKind::ERROR);
    if code == ErrorCode::E0102 {
        builder = builder.hint("add a closing '\"' before the end of the line");
    }
    let error = builder.build();
    let state = p.recovery.state;
    report_at(p, error, index);
    p.recovery.transition(state);
}

fn report_expected(
    p: &mut Parser<'_>,
    expected: TokenSet,
    code: ErrorCode,
    opened: Option<TextRange>,
) {
    let found = describe_found(p);
    let mut builder = SyntaxError::builder(code)
        .message(expectation_message(
            &expected.describe(),
            current_context(p),
            &found,
        ))
        .range(p.current_range())
        .expected(expected)
        .found(p.current_kind());
    if let Some(range) = opened {
        let what = current_context(p).description().trim_start_matches("in ");
        builder = builder.related(format!("{what} opened here"), range);
    }
    report(p, builder.build());
}

/// Consume `kind` or repair its absence; true when a real `kind` token was consumed
pub(crate) fn expect(p: &mut Parser<'_>, kind: SyntaxKind) -> bool {
    if p.eat(kind) {
        p.recovery.transition(RecoveryState::Sync);
        return true;
    }
    let code = code_for(p, kind);
    repair(p, kind, code, None)
}

/// Like [`expect`] for a closing delimiter; a diagnostic points back at `opened`
pub(crate) fn expect_closing(p: &mut Parser<'_>, kind: SyntaxKind, opened: TextRange) -> bool {
    if p.eat(kind) {
        p.recovery.transition(RecoveryState::Sync);
        return true;
    }
    let code = code_for(p, kind);
    repair(p, kind, code, Some(opened))
}

/// Like [`expect`], with an explicit diagnostic code
pub(crate) fn expect_with(p: &mut Parser<'_>, kind: SyntaxKind, code: ErrorCode) -> bool {
    if p.eat(kind) {
        p.recovery.transition(RecoveryState::Sync);
        return true;
    }
    repair(p, kind, code, None)
}

fn repair(
    p: &mut Parser<'_>,
    kind: SyntaxKind,
    code: ErrorCode,
    opened: Option<TextRange>,
) -> bool {
    report_expected(p, TokenSet::single(kind), code, opened);
    let sync = p.sync_set();

    if p.at_eof() || p.at_set(sync) {
        tracing::debug!(expected = ?kind, found = ?p.current_kind(), "recovery: insert");
        p.missing();
        p.recovery.transition(RecoveryState::Sync);
        return false;
    }

    if p.nth(1) == kind {
        tracing::debug!(expected = ?kind, deleted = ?p.current_kind(), "recovery: delete");
        delete_current(p);
        p.bump();
        return true;
    }

    skip_until(p, sync.union(TokenSet::single(kind)));
    let found = p.eat(kind);
    p.recovery.transition(RecoveryState::Sync);
    if !found {
        p.missing();
    }
    found
}

/// Wrap the current token alone in an `ERROR` node; consuming it does not
/// count as a match
pub(crate) fn delete_current(p: &mut Parser<'_>) {
    p.recovery.transition(RecoveryState::Skipping);
    p.start_node(SyntaxKind::ERROR);
    p.bump();
    p.finish_node();
    p.note_skipped(1);
    p.recovery.transition(RecoveryState::Sync);
}

/// Delete a single stray token standing in front of `follow`
///
/// Applies only when the current token is not in `follow` and the next one
/// is; the caller then carries on as though the stray token were absent.
pub(crate) fn delete_stray(p: &mut Parser<'_>, follow: TokenSet, code: ErrorCode) -> bool {
    if p.at_eof() || p.at_set(follow) || !follow.contains(p.nth(1)) {
        return false;
    }
    tracing::debug!(deleted = ?p.current_kind(), "recovery: delete stray token");
    report_expected(p, follow, code, None);
    delete_current(p);
    true
}

/// Skip tokens into one `ERROR` node until `stop` is reached outside any
/// bracket opened during the skip. Returns the number of tokens skipped.
pub(crate) fn skip_until(p: &mut Parser<'_>, stop: TokenSet) -> usize {
    p.recovery.transition(RecoveryState::Skipping);
    let cp = p.checkpoint();
    let mut depth = 0usize;
    let mut skipped = 0usize;
    while !p.at_eof() {
        let kind = p.current_kind();
        if depth == 0 && stop.contains(kind) {
            break;
        }
        if OPENERS.contains(kind) {
            depth += 1;
        } else if CLOSERS.contains(kind) {
            depth = depth.saturating_sub(1);
        }
        p.bump();
        skipped += 1;
        p.note_skipped(1);
    }
    if skipped > 0 {
        p.wrap(cp, SyntaxKind::ERROR);
        tracing::debug!(skipped, "recovery: resynchronized");
    }
    skipped
}

/// Report that the current token cannot start anything here, then resynchronize
pub(crate) fn recover_unexpected(p: &mut Parser<'_>, expected: TokenSet, code: ErrorCode) {
    let error = super::rules::unexpected_here(p, code, expected);
    report(p, error);
    let skipped = skip_until(p, p.sync_set());
    if skipped == 0 {
        p.missing();
    }
    p.recovery.transition(RecoveryState::Sync);
}

/// Guarantee forward progress in a loop body: when nothing was consumed since
/// `before` (a `Parser::bumped` reading), report and consume one token.
pub(crate) fn ensure_progress(p: &mut Parser<'_>, before: usize) {
    if p.bumped() != before || p.at_eof() {
        return;
    }
    let error = super::rules::unexpected_here(p, ErrorCode::E0901, TokenSet::EMPTY);
    report(p, error);
    delete_current(p);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseOptions;
    use crate::parser::lexer::tokenize;
    use crate::parser::rules::{Rule, RuleFrame, unexpected_here};

    fn with_parser<R>(source: &str, f: impl FnOnce(&mut Parser<'_>) -> R) -> R {
        let tokens = tokenize(source);
        let mut p = Parser::new(&tokens, source, ParseOptions::default());
        p.start_root(SyntaxKind::FRAGMENT);
        p.push_frame(RuleFrame {
            rule: Rule::Block,
            entry: 0,
            min_bp: 0,
            sync: Rule::Block.sync_set(),
        });
        f(&mut p)
    }

    #[test]
    fn test_expect_matches() {
        with_parser(";", |p| {
            assert!(expect(p, SyntaxKind::SEMICOLON));
            assert!(p.errors().is_empty());
            assert_eq!(p.recovery.state(), RecoveryState::Sync);
        });
    }

    #[test]
    fn test_insertion_at_sync_token() {
        with_parser("}", |p| {
            assert!(!expect(p, SyntaxKind::SEMICOLON));
            assert_eq!(p.errors().len(), 1);
            assert_eq!(p.errors()[0].code, ErrorCode::E0201);
            assert_eq!(p.errors()[0].message, "expected ';' in block, found '}'");
            assert!(p.at(SyntaxKind::R_BRACE));
        });
    }

    #[test]
    fn test_deletion_of_single_stray_token() {
        with_parser("2 ;", |p| {
            assert!(expect(p, SyntaxKind::SEMICOLON));
            assert_eq!(p.errors().len(), 1);
            assert!(p.at_eof());
            assert_eq!(p.skipped(), 1);
        });
    }

    #[test]
    fn test_resync_skips_balanced_brackets() {
        with_parser("a ( ; ) b ; c", |p| {
            assert!(expect(p, SyntaxKind::SEMICOLON));
            assert_eq!(p.errors().len(), 1);
            assert_eq!(p.current_text(), "c");
            assert_eq!(p.skipped(), 5);
        });
    }

    #[test]
    fn test_duplicate_report_suppressed() {
        with_parser("}", |p| {
            expect(p, SyntaxKind::SEMICOLON);
            expect(p, SyntaxKind::R_PAREN);
            assert_eq!(p.errors().len(), 1);
        });
    }

    #[test]
    fn test_lexical_error_never_reaches_the_grammar() {
        with_parser("\"abc\n;", |p| {
            assert_eq!(p.errors()[0].code, ErrorCode::E0102);
            assert!(p.at(SyntaxKind::SEMICOLON));
            assert!(expect(p, SyntaxKind::SEMICOLON));
            assert_eq!(p.errors().len(), 1);
        });
        with_parser("$ x", |p| {
            assert_eq!(p.errors()[0].code, ErrorCode::E0101);
            assert_eq!(p.errors()[0].message, "invalid character '$' at top level");
            assert_eq!(p.current_text(), "x");
        });
    }

    #[test]
    fn test_ensure_progress_consumes_one_token() {
        with_parser("} x", |p| {
            let before = p.bumped();
            ensure_progress(p, before);
            assert_eq!(p.bumped(), before + 1);
            assert_eq!(p.errors().len(), 1);
            assert_eq!(p.errors()[0].code, ErrorCode::E0901);
            let before = p.bumped();
            p.bump();
            ensure_progress(p, before);
            assert_eq!(p.errors().len(), 1);
        });
    }

    #[test]
    fn test_cascade_suppressed_until_a_token_matches() {
        with_parser("a b c", |p| {
            let error = unexpected_here(p, ErrorCode::E0901, TokenSet::EMPTY);
            report(p, error);
            delete_current(p);
            assert!(p.recovery.awaiting_match());

            let error = unexpected_here(p, ErrorCode::E0901, TokenSet::EMPTY);
            report(p, error);
            assert_eq!(p.errors().len(), 1);

            p.bump();
            assert!(!p.recovery.awaiting_match());
            let error = unexpected_here(p, ErrorCode::E0901, TokenSet::EMPTY);
            report(p, error);
            assert_eq!(p.errors().len(), 2);
        });
    }

    #[test]
    fn test_delete_stray_needs_the_follow_token_next() {
        let follow = TokenSet::new(&[SyntaxKind::EQ, SyntaxKind::SEMICOLON]);
        with_parser("x 7 = 1", |p| {
            p.bump();
            assert!(delete_stray(p, follow, ErrorCode::E0201));
            assert!(p.at(SyntaxKind::EQ));
            assert_eq!(p.errors().len(), 1);
            assert_eq!(p.errors()[0].found, Some(SyntaxKind::INTEGER_LITERAL));
        });
        with_parser("x 7 8 = 1", |p| {
            p.bump();
            assert!(!delete_stray(p, follow, ErrorCode::E0201));
            assert!(p.errors().is_empty());
        });
    }

    #[test]
    fn test_found_descriptions() {
        with_parser("foo", |p| assert_eq!(describe_found(p), "identifier 'foo'"));
        with_parser("if", |p| assert_eq!(describe_found(p), "keyword 'if'"));
        with_parser("", |p| assert_eq!(describe_found(p), "end of input"));
    }
}
