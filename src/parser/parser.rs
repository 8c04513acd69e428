//! Parser session for Ballerina
//!
//! Builds a rowan GreenNode tree from tokens. One session parses one input:
//! it owns the token cursor, the tree sink, the diagnostics list and the stack
//! of rule frames. Speculative parses run on the same session with the sink
//! switched to `Discard` and are rolled back wholesale afterwards.

use super::cursor::TokenCursor;
use super::errors::SyntaxError;
use super::lexer::{Token, tokenize};
use super::lookahead::MemoEntry;
use super::predicates::ShiftOperator;
use super::recovery::RecoveryController;
use super::rules::{self, Rule, RuleFrame};
use super::syntax_kind::SyntaxKind;
use super::token_set::TokenSet;
use super::ast::{AstNode, CompilationUnit};
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};
use rustc_hash::FxHashMap;

/// Knobs for a parse session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Stop reporting and consuming after the first diagnostic
    pub halt_on_first_error: bool,
    /// Total tokens error recovery may skip before the rest of the input is abandoned
    pub max_skipped_tokens: usize,
    /// Significant tokens a speculative parse may consume
    pub max_lookahead_tokens: usize,
    /// Nested speculative parses allowed at once
    pub max_speculation_depth: usize,
    /// Nested rule invocations allowed at once. Deep inputs parse on a thread
    /// whose stack is sized for their nesting, up to this many frames
    pub max_nesting: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            halt_on_first_error: false,
            max_skipped_tokens: 4096,
            max_lookahead_tokens: 512,
            max_speculation_depth: 32,
            max_nesting: 4096,
        }
    }
}

impl ParseOptions {
    pub fn halt_on_first_error(mut self, halt: bool) -> Self {
        self.halt_on_first_error = halt;
        self
    }

    pub fn max_skipped_tokens(mut self, n: usize) -> Self {
        self.max_skipped_tokens = n;
        self
    }

    pub fn max_lookahead_tokens(mut self, n: usize) -> Self {
        self.max_lookahead_tokens = n.max(1);
        self
    }

    pub fn max_speculation_depth(mut self, n: usize) -> Self {
        self.max_speculation_depth = n;
        self
    }

    pub fn max_nesting(mut self, n: usize) -> Self {
        self.max_nesting = n.max(1);
        self
    }
}

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Typed root; `None` for single-rule parses
    pub fn tree(&self) -> Option<CompilationUnit> {
        CompilationUnit::cast(self.syntax())
    }
}

/// Parse Ballerina source code into a CST
pub fn parse(input: &str) -> Parse {
    parse_with(input, &ParseOptions::default())
}

/// Parse with explicit options
pub fn parse_with(input: &str, options: &ParseOptions) -> Parse {
    let tokens = tokenize(input);
    with_stack_for(&tokens, options, |options| {
        let mut parser = Parser::new(&tokens, input, options);
        rules::parse_rule(&mut parser, Rule::CompilationUnit);
        parser.finish()
    })
}

/// Rule frames a parse may nest on the caller's own stack
const INLINE_NESTING: usize = 256;
/// Rule frames assumed per level of bracket or prefix-operator nesting
const FRAMES_PER_LEVEL: usize = 4;
/// Stack reserved per rule frame on a dedicated parse thread
const STACK_PER_FRAME: usize = 32 * 1024;

const NESTING_OPENERS: TokenSet = TokenSet::new(&[
    SyntaxKind::L_PAREN,
    SyntaxKind::L_BRACKET,
    SyntaxKind::L_BRACE,
    SyntaxKind::L_BRACE_PIPE,
    SyntaxKind::TEMPLATE_INTERP_START,
    SyntaxKind::XML_INTERP_START,
]);

const NESTING_CLOSERS: TokenSet = TokenSet::new(&[
    SyntaxKind::R_PAREN,
    SyntaxKind::R_BRACKET,
    SyntaxKind::R_BRACE,
    SyntaxKind::PIPE_R_BRACE,
    SyntaxKind::XML_INTERP_END,
]);

const PREFIX_CHAIN: TokenSet = TokenSet::new(&[
    SyntaxKind::PLUS,
    SyntaxKind::MINUS,
    SyntaxKind::BANG,
    SyntaxKind::TILDE,
    SyntaxKind::LENGTHOF_KW,
    SyntaxKind::UNTAINT_KW,
    SyntaxKind::CHECK_KW,
    SyntaxKind::TRAP_KW,
    SyntaxKind::TYPEOF_KW,
]);

/// Deepest nesting the token stream can drive the parser into
///
/// Brackets count while open. Type parameter chevrons count until the next
/// `;` or brace, since `<` is also a comparison. A run of prefix operators
/// counts once per operator.
fn nesting_estimate(tokens: &[Token<'_>]) -> usize {
    let mut brackets = 0usize;
    let mut chevrons = 0usize;
    let mut prefixes = 0usize;
    let mut deepest = 0usize;
    for kind in tokens.iter().map(|t| t.kind).filter(|k| !k.is_trivia()) {
        match kind {
            k if NESTING_OPENERS.contains(k) => brackets += 1,
            k if NESTING_CLOSERS.contains(k) => brackets = brackets.saturating_sub(1),
            SyntaxKind::LT => chevrons += 1,
            SyntaxKind::GT => chevrons = chevrons.saturating_sub(1),
            _ => {}
        }
        if matches!(
            kind,
            SyntaxKind::SEMICOLON | SyntaxKind::L_BRACE | SyntaxKind::R_BRACE
        ) {
            chevrons = 0;
        }
        prefixes = if PREFIX_CHAIN.contains(kind) {
            prefixes + 1
        } else {
            0
        };
        deepest = deepest.max(brackets + chevrons + prefixes);
    }
    deepest
}

/// Run `parse` where the stack can hold the input's nesting
///
/// Shallow input parses on the calling thread with nesting held to
/// [`INLINE_NESTING`]. Deeper input parses on a scoped thread whose stack is
/// sized for the frames it needs, so `E0903` is reported before the stack
/// could run out.
pub(crate) fn with_stack_for<R: Send>(
    tokens: &[Token<'_>],
    options: &ParseOptions,
    parse: impl Fn(ParseOptions) -> R + Sync,
) -> R {
    let inline = ParseOptions {
        max_nesting: options.max_nesting.min(INLINE_NESTING),
        ..*options
    };
    let wanted = nesting_estimate(tokens)
        .saturating_mul(FRAMES_PER_LEVEL)
        .saturating_add(INLINE_NESTING / 4)
        .min(options.max_nesting);
    if wanted <= INLINE_NESTING {
        return parse(inline);
    }

    let frames = wanted.saturating_mul(2).min(options.max_nesting);
    let sized = ParseOptions {
        max_nesting: frames,
        ..*options
    };
    let stack = frames.saturating_mul(STACK_PER_FRAME);
    tracing::debug!(frames, stack, "parsing deeply nested input on a sized stack");
    std::thread::scope(|scope| {
        let spawned = std::thread::Builder::new()
            .name("balsyn-parse".to_string())
            .stack_size(stack)
            .spawn_scoped(scope, || parse(sized));
        match spawned {
            Ok(handle) => handle
                .join()
                .unwrap_or_else(|payload| std::panic::resume_unwind(payload)),
            Err(err) => {
                tracing::warn!(
                    %err,
                    "could not start parse thread, nesting held to the inline limit"
                );
                parse(inline)
            }
        }
    })
}

/// Where the tree goes: a real builder, or nowhere while speculating
enum Sink {
    Build(GreenNodeBuilder<'static>),
    Discard,
}

/// A position in the tree that a node can later be started at
///
/// Empty when taken while speculating.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint(Option<rowan::Checkpoint>);

/// Bookkeeping for one level of speculative parsing
#[derive(Debug, Clone, Copy)]
struct Speculation {
    remaining: usize,
    errors: usize,
    first_error: Option<usize>,
    /// The token budget ran out
    tainted: bool,
    /// A nested choice point was decided at `max_speculation_depth`
    depth_capped: bool,
}

/// Everything a speculative parse may disturb
pub(crate) struct Snapshot<'t> {
    cursor: TokenCursor<'t>,
    sink: Sink,
    errors_len: usize,
    frames_len: usize,
    nesting: usize,
    bumped: usize,
    prev_end: TextSize,
    recovery: RecoveryController,
    skipped: usize,
}

/// Result of a finished speculative parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SpeculationOutcome {
    pub viable: bool,
    pub progress: usize,
    pub errors: usize,
    pub tainted: bool,
    pub depth_capped: bool,
}

/// The parser state
pub struct Parser<'t> {
    source: &'t str,
    cursor: TokenCursor<'t>,
    sink: Sink,
    errors: Vec<SyntaxError>,
    options: ParseOptions,
    frames: Vec<RuleFrame>,
    pub(crate) recovery: RecoveryController,
    speculation: Vec<Speculation>,
    pub(crate) probe_memo: FxHashMap<(usize, usize), MemoEntry>,
    /// Speculative parses actually executed, memo hits excluded
    pub(crate) probes_run: usize,
    pub(crate) shift_cache: Option<(usize, Option<ShiftOperator>)>,
    nesting: usize,
    bumped: usize,
    prev_end: TextSize,
    skipped: usize,
    halted: bool,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(tokens: &'t [Token<'t>], source: &'t str, options: ParseOptions) -> Self {
        Self {
            source,
            cursor: TokenCursor::new(tokens),
            sink: Sink::Build(GreenNodeBuilder::new()),
            errors: Vec::new(),
            options,
            frames: Vec::new(),
            recovery: RecoveryController::default(),
            speculation: Vec::new(),
            probe_memo: FxHashMap::default(),
            probes_run: 0,
            shift_cache: None,
            nesting: 0,
            bumped: 0,
            prev_end: TextSize::new(0),
            skipped: 0,
            halted: false,
        }
    }

    pub(crate) fn finish(self) -> Parse {
        tracing::debug!(
            probes = self.probes_run,
            memoized = self.probe_memo.len(),
            errors = self.errors.len(),
            "parse finished"
        );
        let green = match self.sink {
            Sink::Build(builder) => builder.finish(),
            Sink::Discard => GreenNode::new(SyntaxKind::ERROR.into(), std::iter::empty()),
        };
        Parse {
            green,
            errors: self.errors,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn budget_exhausted(&self) -> bool {
        self.speculation.last().is_some_and(|s| s.remaining == 0)
    }

    /// The current significant token; `EOF` once halted or past the speculation budget
    pub fn current(&self) -> &'t Token<'t> {
        if self.halted || self.budget_exhausted() {
            return self.cursor.eof_token();
        }
        self.cursor.peek(0)
    }

    pub fn current_kind(&self) -> SyntaxKind {
        self.current().kind
    }

    pub fn current_text(&self) -> &'t str {
        self.current().text
    }

    pub fn current_range(&self) -> TextRange {
        let token = self.current();
        if token.kind == SyntaxKind::EOF {
            return TextRange::empty(TextSize::of(self.source));
        }
        token.range()
    }

    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    pub fn at_set(&self, set: TokenSet) -> bool {
        set.contains(self.current_kind())
    }

    pub fn at_eof(&self) -> bool {
        self.at(SyntaxKind::EOF)
    }

    /// Look ahead `n` significant tokens
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_token(n).kind
    }

    fn nth_token(&self, n: usize) -> &'t Token<'t> {
        if self.halted || self.speculation.last().is_some_and(|s| n >= s.remaining) {
            return self.cursor.eof_token();
        }
        self.cursor.peek(n)
    }

    /// True when no trivia separates the `n`-th significant token from the raw token before it
    pub fn is_adjacent(&self, n: usize) -> bool {
        self.cursor.is_adjacent_to_previous(n)
    }

    /// Raw index of the current significant token
    pub fn current_raw_index(&self) -> Option<usize> {
        if self.halted || self.budget_exhausted() {
            return None;
        }
        self.cursor.significant_index(0)
    }

    pub fn raw_token(&self, index: usize) -> Option<&'t Token<'t>> {
        self.cursor.raw(index)
    }

    /// Raw cursor position (trivia included)
    pub fn raw_pos(&self) -> usize {
        self.cursor.raw_pos()
    }

    /// Significant tokens consumed so far
    pub fn bumped(&self) -> usize {
        self.bumped
    }

    /// End offset of the last consumed significant token
    pub fn prev_end(&self) -> TextSize {
        self.prev_end
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn emit(&mut self, kind: SyntaxKind, text: &str) {
        if let Sink::Build(builder) = &mut self.sink {
            builder.token(kind.into(), text);
        }
    }

    fn flush_trivia(&mut self) {
        while let Some(token) = self.cursor.raw(self.cursor.raw_pos()) {
            if token.kind == SyntaxKind::ERROR {
                self.pass_lexical_error();
                continue;
            }
            if !token.kind.is_trivia() {
                break;
            }
            self.cursor.step();
            self.emit(token.kind, token.text);
        }
    }

    /// Pass over lexer `ERROR` tokens ahead of the next significant token, so
    /// their diagnostics come before any the grammar reports there
    fn flush_lexical_errors(&mut self) {
        loop {
            let mut next = self.cursor.raw_pos();
            while self.cursor.raw(next).is_some_and(|t| t.kind.is_trivia()) {
                next += 1;
            }
            if self.cursor.raw(next).is_none_or(|t| t.kind != SyntaxKind::ERROR) {
                return;
            }
            while self.cursor.raw_pos() < next {
                if let Some(token) = self.cursor.step() {
                    self.emit(token.kind, token.text);
                }
            }
            self.pass_lexical_error();
        }
    }

    fn pass_lexical_error(&mut self) {
        let index = self.cursor.raw_pos();
        let Some(token) = self.cursor.step() else {
            return;
        };
        self.start_raw_node(SyntaxKind::ERROR);
        self.emit(token.kind, token.text);
        self.finish_node();
        super::recovery::report_lexical(self, token, index);
        self.note_skipped(1);
    }

    fn consume_budget(&mut self, n: usize) {
        if let Some(probe) = self.speculation.last_mut() {
            probe.remaining = probe.remaining.saturating_sub(n);
            if probe.remaining == 0 {
                probe.tainted = true;
            }
        }
    }

    /// Consume the current significant token (and the trivia before it)
    pub fn bump(&mut self) {
        if self.at_eof() {
            return;
        }
        self.flush_trivia();
        if let Some(token) = self.cursor.step() {
            self.emit(token.kind, token.text);
            self.bumped += 1;
            self.prev_end = token.range().end();
            self.consume_budget(1);
            self.recovery.on_bump();
            self.flush_lexical_errors();
        }
    }

    /// Consume `width` adjacent raw tokens as a single token of `kind`
    pub fn bump_joined(&mut self, kind: SyntaxKind, width: usize) {
        if self.at_eof() || width == 0 {
            return;
        }
        self.flush_trivia();
        let Some(first) = self.cursor.raw(self.cursor.raw_pos()) else {
            return;
        };
        let start = first.offset;
        let mut end = start;
        for _ in 0..width {
            match self.cursor.step() {
                Some(token) => end = token.range().end(),
                None => break,
            }
        }
        let text = &self.source[TextRange::new(start, end)];
        self.emit(kind, text);
        self.bumped += 1;
        self.prev_end = end;
        self.consume_budget(width);
        self.recovery.on_bump();
        self.flush_lexical_errors();
    }

    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub fn eat_set(&mut self, set: TokenSet) -> bool {
        if self.at_set(set) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or recover (insertion, deletion or resynchronization)
    pub fn expect(&mut self, kind: SyntaxKind) -> bool {
        super::recovery::expect(self, kind)
    }

    /// Consume every remaining token into an `ERROR` node (used once the skip budget is spent)
    pub(crate) fn dump_remaining(&mut self) -> usize {
        let mut dumped = 0;
        self.flush_trivia();
        if self.cursor.at_eof() {
            return 0;
        }
        self.start_raw_node(SyntaxKind::ERROR);
        while let Some(token) = self.cursor.step() {
            self.emit(token.kind, token.text);
            if !token.kind.is_trivia() {
                dumped += 1;
            }
        }
        self.finish_node();
        dumped
    }

    /// Consume trailing trivia so the tree covers the whole input
    pub(crate) fn flush_trailing(&mut self) {
        self.flush_trivia();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_raw_node(&mut self, kind: SyntaxKind) {
        if let Sink::Build(builder) = &mut self.sink {
            builder.start_node(kind.into());
        }
    }

    /// Open the root node; leading trivia goes inside it
    pub(crate) fn start_root(&mut self, kind: SyntaxKind) {
        self.start_raw_node(kind);
        self.flush_lexical_errors();
    }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.flush_trivia();
        self.start_raw_node(kind);
    }

    pub fn finish_node(&mut self) {
        if let Sink::Build(builder) = &mut self.sink {
            builder.finish_node();
        }
    }

    pub fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        match &self.sink {
            Sink::Build(builder) => Checkpoint(Some(builder.checkpoint())),
            Sink::Discard => Checkpoint(None),
        }
    }

    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        if let (Sink::Build(builder), Some(cp)) = (&mut self.sink, checkpoint.0) {
            builder.start_node_at(cp, kind.into());
        }
    }

    /// Wrap everything since `checkpoint` into a finished node of `kind`
    pub fn wrap(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.start_node_at(checkpoint, kind);
        self.finish_node();
    }

    /// Zero-width placeholder for a virtually inserted token
    pub(crate) fn missing(&mut self) {
        self.start_raw_node(SyntaxKind::MISSING);
        self.finish_node();
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Diagnostics recorded so far (a private count while speculating)
    pub fn error_count(&self) -> usize {
        match self.speculation.last() {
            Some(probe) => probe.errors,
            None => self.errors.len(),
        }
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub(crate) fn push_error(&mut self, error: SyntaxError) {
        if self.halted {
            return;
        }
        let pos = self.cursor.raw_pos();
        if let Some(probe) = self.speculation.last_mut() {
            if probe.remaining > 0 {
                probe.errors += 1;
                probe.first_error.get_or_insert(pos);
            }
            return;
        }
        tracing::debug!(code = %error.code, message = %error.message, "syntax error");
        self.errors.push(error);
        if self.options.halt_on_first_error {
            self.halted = true;
        }
    }

    /// Count skipped tokens against the session budget; halts once it is spent
    pub(crate) fn note_skipped(&mut self, n: usize) {
        if self.is_speculating() {
            return;
        }
        self.skipped += n;
        if self.skipped > self.options.max_skipped_tokens && !self.halted {
            tracing::warn!(
                skipped = self.skipped,
                budget = self.options.max_skipped_tokens,
                "error recovery budget exhausted, abandoning the rest of the input"
            );
            self.halted = true;
        }
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    // =========================================================================
    // Rule frames
    // =========================================================================

    pub(crate) fn push_frame(&mut self, frame: RuleFrame) {
        self.frames.push(frame);
    }

    pub(crate) fn pop_frame(&mut self) -> Option<RuleFrame> {
        self.frames.pop()
    }

    pub fn innermost_frame(&self) -> Option<&RuleFrame> {
        self.frames.last()
    }

    /// Active rule frames, outermost first
    pub fn frames(&self) -> &[RuleFrame] {
        &self.frames
    }

    /// Binding-power threshold of the innermost climbing rule
    pub fn frame_min_bp(&self) -> u8 {
        self.frames.last().map(|f| f.min_bp).unwrap_or(0)
    }

    /// Union of the synchronization sets of every active rule
    pub fn sync_set(&self) -> TokenSet {
        self.frames
            .iter()
            .fold(TokenSet::EMPTY, |acc, f| acc.union(f.sync))
    }

    /// Enter one level of nesting; false when the limit is reached
    pub(crate) fn enter_nesting(&mut self) -> bool {
        if self.nesting >= self.options.max_nesting {
            return false;
        }
        self.nesting += 1;
        true
    }

    pub(crate) fn leave_nesting(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    // =========================================================================
    // Speculation
    // =========================================================================

    pub fn is_speculating(&self) -> bool {
        !self.speculation.is_empty()
    }

    pub fn speculation_depth(&self) -> usize {
        self.speculation.len()
    }

    /// Mark the active speculation as cut short by the token budget
    pub(crate) fn taint_speculation(&mut self) {
        if let Some(probe) = self.speculation.last_mut() {
            probe.tainted = true;
        }
    }

    /// Mark the active speculation as containing a choice taken at the depth cap
    pub(crate) fn mark_depth_capped(&mut self) {
        if let Some(probe) = self.speculation.last_mut() {
            probe.depth_capped = true;
        }
    }

    /// Significant tokens the innermost speculation may still consume
    pub(crate) fn lookahead_remaining(&self) -> usize {
        self.speculation
            .last()
            .map(|s| s.remaining)
            .unwrap_or(self.options.max_lookahead_tokens)
    }

    pub(crate) fn begin_speculation(&mut self) -> Snapshot<'t> {
        let remaining = self.lookahead_remaining();
        let snapshot = Snapshot {
            cursor: self.cursor,
            sink: std::mem::replace(&mut self.sink, Sink::Discard),
            errors_len: self.errors.len(),
            frames_len: self.frames.len(),
            nesting: self.nesting,
            bumped: self.bumped,
            prev_end: self.prev_end,
            recovery: self.recovery,
            skipped: self.skipped,
        };
        self.speculation.push(Speculation {
            remaining,
            errors: 0,
            first_error: None,
            tainted: false,
            depth_capped: false,
        });
        snapshot
    }

    pub(crate) fn end_speculation(&mut self, snapshot: Snapshot<'t>) -> SpeculationOutcome {
        let probe = self.speculation.pop().unwrap_or(Speculation {
            remaining: 0,
            errors: 0,
            first_error: None,
            tainted: true,
            depth_capped: false,
        });
        let outcome = SpeculationOutcome {
            viable: probe.errors == 0,
            progress: probe.first_error.unwrap_or(self.cursor.raw_pos()),
            errors: probe.errors,
            tainted: probe.tainted,
            depth_capped: probe.depth_capped,
        };
        if probe.tainted {
            self.taint_speculation();
        }
        if probe.depth_capped {
            self.mark_depth_capped();
        }
        self.cursor = snapshot.cursor;
        self.sink = snapshot.sink;
        self.errors.truncate(snapshot.errors_len);
        self.frames.truncate(snapshot.frames_len);
        self.nesting = snapshot.nesting;
        self.bumped = snapshot.bumped;
        self.prev_end = snapshot.prev_end;
        self.recovery = snapshot.recovery;
        self.skipped = snapshot.skipped;
        outcome
    }
}
