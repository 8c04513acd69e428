//! Token cursor over the lexed token vector
//!
//! The cursor is a plain index into the raw token slice. `peek(k)` looks at the
//! k-th *significant* token (trivia and lexer `ERROR` tokens skipped); raw
//! access is kept for the adjacency predicates, which care about whitespace
//! between tokens.
//!
//! Copying a cursor is how speculative parses get a private position: restoring
//! the copy rolls the position back atomically.

use super::lexer::Token;
use super::syntax_kind::SyntaxKind;
use rowan::TextSize;

static EOF_TOKEN: Token<'static> = Token {
    kind: SyntaxKind::EOF,
    text: "",
    offset: TextSize::new(0),
};

/// Trivia, and lexer `ERROR` tokens, which the parser reports as it passes them
pub fn is_passed_over(kind: SyntaxKind) -> bool {
    kind.is_trivia() || kind == SyntaxKind::ERROR
}

#[derive(Debug, Clone, Copy)]
pub struct TokenCursor<'t> {
    tokens: &'t [Token<'t>],
    pos: usize,
}

impl<'t> TokenCursor<'t> {
    pub fn new(tokens: &'t [Token<'t>]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Raw index of the next unconsumed token (trivia included)
    pub fn raw_pos(&self) -> usize {
        self.pos
    }

    pub fn raw_len(&self) -> usize {
        self.tokens.len()
    }

    pub fn raw(&self, index: usize) -> Option<&'t Token<'t>> {
        self.tokens.get(index)
    }

    /// The final token of the stream; always `EOF` for lexer output
    pub fn eof_token(&self) -> &'t Token<'t> {
        match self.tokens.last() {
            Some(t) if t.kind == SyntaxKind::EOF => t,
            _ => &EOF_TOKEN,
        }
    }

    /// Raw index of the k-th significant token at or after the cursor
    pub fn significant_index(&self, k: usize) -> Option<usize> {
        let mut seen = 0;
        for (idx, token) in self.tokens.iter().enumerate().skip(self.pos) {
            if is_passed_over(token.kind) {
                continue;
            }
            if seen == k {
                return Some(idx);
            }
            seen += 1;
        }
        None
    }

    /// The k-th significant token; `EOF` past the end
    pub fn peek(&self, k: usize) -> &'t Token<'t> {
        match self.significant_index(k) {
            Some(idx) => &self.tokens[idx],
            None => self.eof_token(),
        }
    }

    pub fn peek_kind(&self, k: usize) -> SyntaxKind {
        self.peek(k).kind
    }

    pub fn at_eof(&self) -> bool {
        self.peek_kind(0) == SyntaxKind::EOF
    }

    /// Move past exactly one raw token (trivia or not); never past `EOF`
    pub fn step(&mut self) -> Option<&'t Token<'t>> {
        let token = self.tokens.get(self.pos)?;
        if token.kind == SyntaxKind::EOF {
            return None;
        }
        self.pos += 1;
        Some(token)
    }

    /// Move past leading trivia and one significant token
    pub fn advance(&mut self) -> Option<&'t Token<'t>> {
        while self.tokens.get(self.pos).is_some_and(|t| is_passed_over(t.kind)) {
            self.pos += 1;
        }
        self.step()
    }

    /// True when the raw token directly before the k-th significant token is not trivia
    pub fn is_adjacent_to_previous(&self, k: usize) -> bool {
        match self.significant_index(k) {
            Some(idx) if idx > 0 => !is_passed_over(self.tokens[idx - 1].kind),
            _ => false,
        }
    }

    /// Number of significant tokens between `earlier` and this cursor
    pub fn significant_since(&self, earlier: &TokenCursor<'t>) -> usize {
        self.tokens[earlier.pos.min(self.pos)..self.pos]
            .iter()
            .filter(|t| !is_passed_over(t.kind))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    #[test]
    fn test_peek_skips_trivia() {
        let tokens = tokenize("a  // c\n b");
        let cursor = TokenCursor::new(&tokens);
        assert_eq!(cursor.peek(0).text, "a");
        assert_eq!(cursor.peek(1).text, "b");
        assert_eq!(cursor.peek_kind(2), SyntaxKind::EOF);
        assert_eq!(cursor.peek_kind(10), SyntaxKind::EOF);
    }

    #[test]
    fn test_peek_skips_lexer_errors() {
        let tokens = tokenize("a $ b");
        let cursor = TokenCursor::new(&tokens);
        assert_eq!(cursor.peek(1).text, "b");
        assert_eq!(cursor.significant_index(1), Some(4));
    }

    #[test]
    fn test_copy_is_independent() {
        let tokens = tokenize("a b c");
        let mut cursor = TokenCursor::new(&tokens);
        let saved = cursor;
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.peek(0).text, "c");
        assert_eq!(saved.peek(0).text, "a");
        assert_eq!(cursor.significant_since(&saved), 2);
    }

    #[test]
    fn test_adjacency() {
        let tokens = tokenize("a>> b");
        let cursor = TokenCursor::new(&tokens);
        assert!(cursor.is_adjacent_to_previous(1));
        assert!(cursor.is_adjacent_to_previous(2));
        assert!(!cursor.is_adjacent_to_previous(3));
    }

    #[test]
    fn test_never_steps_past_eof() {
        let tokens = tokenize("");
        let mut cursor = TokenCursor::new(&tokens);
        assert!(cursor.at_eof());
        assert!(cursor.advance().is_none());
        assert_eq!(cursor.raw_pos(), 0);
    }
}
