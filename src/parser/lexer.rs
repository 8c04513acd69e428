//! Logos-based lexer for Ballerina
//!
//! Fast tokenization using the logos crate, wrapped in a small mode stack for
//! the embedded sub-languages: string templates (`` string `a ${b}` ``) and XML
//! literals (`` xml `<a>{{b}}</a>` ``). Inside their text the wrapper scans by
//! hand; interpolations switch back to logos until the balancing brace.
//!
//! Chevrons are never merged: `>>` is lexed as two `GT` tokens and the parser
//! decides whether they form a shift operator.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::{TextRange, TextSize};

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    /// Source range covered by this token
    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, TextSize::of(self.text))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    Template,
    Xml,
    TemplateInterpolation { depth: u32 },
    XmlInterpolation { depth: u32 },
}

/// Lexer wrapping the logos-generated tokenizer
///
/// Yields every token of the input, trivia included, followed by exactly
/// one `EOF` token with empty text.
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, LogosToken>,
    /// Absolute offset where `inner` started
    base: usize,
    /// Absolute offset of the next unread byte
    offset: usize,
    modes: Vec<Mode>,
    last_significant: SyntaxKind,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            source: input,
            inner: LogosToken::lexer(input),
            base: 0,
            offset: 0,
            modes: vec![Mode::Code],
            last_significant: SyntaxKind::EOF,
            finished: false,
        }
    }

    fn mode(&self) -> Mode {
        self.modes.last().copied().unwrap_or(Mode::Code)
    }

    fn set_mode(&mut self, mode: Mode) {
        if let Some(top) = self.modes.last_mut() {
            *top = mode;
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    /// Emit a token for `len` bytes starting at the current offset, bypassing logos
    fn manual(&mut self, kind: SyntaxKind, len: usize) -> Token<'a> {
        let start = self.offset;
        self.offset += len;
        self.inner = LogosToken::lexer(&self.source[self.offset..]);
        self.base = self.offset;
        self.token(kind, start, self.offset)
    }

    fn token(&mut self, kind: SyntaxKind, start: usize, end: usize) -> Token<'a> {
        if !kind.is_trivia() {
            self.last_significant = kind;
        }
        Token {
            kind,
            text: &self.source[start..end],
            offset: TextSize::new(start as u32),
        }
    }

    fn eof(&mut self) -> Option<Token<'a>> {
        if self.finished {
            return None;
        }
        self.finished = true;
        let end = self.source.len();
        Some(self.token(SyntaxKind::EOF, end, end))
    }

    /// Scan template or XML text up to the closing backtick or an interpolation opener
    fn scan_text(&mut self, xml: bool) -> Option<Token<'a>> {
        let rest = self.rest();
        if rest.is_empty() {
            // Unterminated literal: fall back to code mode so EOF is reported by the parser
            self.modes.pop();
            return self.eof();
        }
        if rest.starts_with('`') {
            self.modes.pop();
            return Some(self.manual(SyntaxKind::BACKTICK, 1));
        }
        let opener = if xml { "{{" } else { "${" };
        if rest.starts_with(opener) {
            let (kind, mode) = if xml {
                (SyntaxKind::XML_INTERP_START, Mode::XmlInterpolation { depth: 0 })
            } else {
                (SyntaxKind::TEMPLATE_INTERP_START, Mode::TemplateInterpolation { depth: 0 })
            };
            self.modes.push(mode);
            return Some(self.manual(kind, 2));
        }
        let mut len = 0;
        for (idx, ch) in rest.char_indices() {
            if ch == '`' || rest[idx..].starts_with(opener) {
                break;
            }
            len = idx + ch.len_utf8();
        }
        let kind = if xml { SyntaxKind::XML_TEXT } else { SyntaxKind::TEMPLATE_TEXT };
        Some(self.manual(kind, len))
    }

    fn scan_code(&mut self) -> Option<Token<'a>> {
        if let Mode::XmlInterpolation { depth: 0 } = self.mode() {
            if self.rest().starts_with("}}") {
                self.modes.pop();
                return Some(self.manual(SyntaxKind::XML_INTERP_END, 2));
            }
        }

        let Some(result) = self.inner.next() else {
            return self.eof();
        };
        let span = self.inner.span();
        let start = self.base + span.start;
        let end = self.base + span.end;
        self.offset = end;

        let kind = match result {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        match (kind, self.mode()) {
            (
                SyntaxKind::L_BRACE | SyntaxKind::L_BRACE_PIPE,
                Mode::TemplateInterpolation { depth },
            ) => {
                self.set_mode(Mode::TemplateInterpolation { depth: depth + 1 });
            }
            (SyntaxKind::L_BRACE | SyntaxKind::L_BRACE_PIPE, Mode::XmlInterpolation { depth }) => {
                self.set_mode(Mode::XmlInterpolation { depth: depth + 1 });
            }
            (
                SyntaxKind::R_BRACE | SyntaxKind::PIPE_R_BRACE,
                Mode::TemplateInterpolation { depth },
            ) => {
                if depth == 0 {
                    // Closes `${`, back to template text
                    self.modes.pop();
                    let token = self.token(kind, start, end);
                    self.inner = LogosToken::lexer(&self.source[self.offset..]);
                    self.base = self.offset;
                    return Some(token);
                }
                self.set_mode(Mode::TemplateInterpolation { depth: depth - 1 });
            }
            (SyntaxKind::R_BRACE | SyntaxKind::PIPE_R_BRACE, Mode::XmlInterpolation { depth }) => {
                self.set_mode(Mode::XmlInterpolation { depth: depth.saturating_sub(1) });
            }
            (SyntaxKind::BACKTICK, _) => {
                let mode = if self.last_significant == SyntaxKind::XML_KW {
                    Mode::Xml
                } else {
                    Mode::Template
                };
                self.modes.push(mode);
                let token = self.token(kind, start, end);
                self.inner = LogosToken::lexer(&self.source[self.offset..]);
                self.base = self.offset;
                return Some(token);
            }
            _ => {}
        }

        Some(self.token(kind, start, end))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.mode() {
            Mode::Template => self.scan_text(false),
            Mode::Xml => self.scan_text(true),
            Mode::Code | Mode::TemplateInterpolation { .. } | Mode::XmlInterpolation { .. } => {
                self.scan_code()
            }
        }
    }
}

/// Tokenize an entire string into a Vec (always ends with `EOF`)
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"#[^\n]*")]
    DocLine,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    #[regex(r"0[xX][0-9a-fA-F]+")]
    #[regex(r"0[bB][01]+")]
    Integer,

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[fFdD]?")]
    Float,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    /// A string literal cut off by a newline or the end of input
    #[regex(r#""([^"\\\n]|\\.)*"#)]
    UnterminatedString,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("{|")]
    LBracePipe,
    #[token("|}")]
    PipeRBrace,
    #[token("...")]
    Ellipsis,
    #[token("..<")]
    DotDotLt,
    #[token("..")]
    DotDot,
    #[token("?:")]
    Elvis,
    #[token("===")]
    EqEqEq,
    #[token("!==")]
    BangEqEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("->")]
    Arrow,
    #[token("<-")]
    LArrow,
    #[token("=>")]
    FatArrow,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("@")]
    At,
    #[token("`")]
    Backtick,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("import")]
    Import,
    #[token("as")]
    As,
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("extern")]
    Extern,
    #[token("final")]
    Final,
    #[token("const")]
    Const,
    #[token("listener")]
    Listener,
    #[token("service")]
    Service,
    #[token("resource")]
    Resource,
    #[token("remote")]
    Remote,
    #[token("function")]
    Function,
    #[token("object")]
    Object,
    #[token("record")]
    Record,
    #[token("annotation")]
    Annotation,
    #[token("worker")]
    Worker,
    #[token("xmlns")]
    Xmlns,
    #[token("returns")]
    Returns,
    #[token("abstract")]
    Abstract,
    #[token("client")]
    Client,
    #[token("type")]
    Type,
    #[token("on")]
    On,

    #[token("int")]
    Int,
    #[token("byte")]
    Byte,
    #[token("float")]
    FloatKw,
    #[token("decimal")]
    Decimal,
    #[token("boolean")]
    Boolean,
    #[token("string")]
    StringKw,
    #[token("error")]
    Error,
    #[token("map")]
    Map,
    #[token("json")]
    Json,
    #[token("xml")]
    Xml,
    #[token("table")]
    Table,
    #[token("stream")]
    Stream,
    #[token("any")]
    Any,
    #[token("typedesc")]
    Typedesc,
    #[token("future")]
    Future,
    #[token("anydata")]
    Anydata,

    #[token("var")]
    Var,
    #[token("new")]
    New,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("match")]
    Match,
    #[token("foreach")]
    Foreach,
    #[token("in")]
    In,
    #[token("while")]
    While,
    #[token("continue")]
    Continue,
    #[token("break")]
    Break,
    #[token("fork")]
    Fork,
    #[token("panic")]
    Panic,
    #[token("trap")]
    Trap,
    #[token("return")]
    Return,
    #[token("transaction")]
    Transaction,
    #[token("abort")]
    Abort,
    #[token("retry")]
    Retry,
    #[token("onretry")]
    Onretry,
    #[token("retries")]
    Retries,
    #[token("committed")]
    Committed,
    #[token("aborted")]
    Aborted,
    #[token("with")]
    With,
    #[token("lock")]
    Lock,
    #[token("untaint")]
    Untaint,
    #[token("lengthof")]
    Lengthof,
    #[token("typeof")]
    Typeof,
    #[token("start")]
    Start,
    #[token("but")]
    But,
    #[token("check")]
    Check,
    #[token("wait")]
    Wait,
    #[token("forever")]
    Forever,

    #[token("from")]
    From,
    #[token("where")]
    Where,
    #[token("select")]
    Select,
    #[token("group")]
    Group,
    #[token("by")]
    By,
    #[token("having")]
    Having,
    #[token("order")]
    Order,
    #[token("join")]
    Join,

    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => SyntaxKind::WHITESPACE,
            LogosToken::LineComment => SyntaxKind::LINE_COMMENT,
            LogosToken::DocLine => SyntaxKind::DOC_LINE,
            LogosToken::Ident => SyntaxKind::IDENT,
            LogosToken::Integer => SyntaxKind::INTEGER_LITERAL,
            LogosToken::Float => SyntaxKind::FLOAT_LITERAL,
            LogosToken::String => SyntaxKind::STRING_LITERAL,
            LogosToken::UnterminatedString => SyntaxKind::ERROR,

            LogosToken::LBracePipe => SyntaxKind::L_BRACE_PIPE,
            LogosToken::PipeRBrace => SyntaxKind::PIPE_R_BRACE,
            LogosToken::Ellipsis => SyntaxKind::ELLIPSIS,
            LogosToken::DotDotLt => SyntaxKind::DOT_DOT_LT,
            LogosToken::DotDot => SyntaxKind::DOT_DOT,
            LogosToken::Elvis => SyntaxKind::ELVIS,
            LogosToken::EqEqEq => SyntaxKind::EQ_EQ_EQ,
            LogosToken::BangEqEq => SyntaxKind::BANG_EQ_EQ,
            LogosToken::EqEq => SyntaxKind::EQ_EQ,
            LogosToken::BangEq => SyntaxKind::BANG_EQ,
            LogosToken::LtEq => SyntaxKind::LT_EQ,
            LogosToken::GtEq => SyntaxKind::GT_EQ,
            LogosToken::AmpAmp => SyntaxKind::AMP_AMP,
            LogosToken::PipePipe => SyntaxKind::PIPE_PIPE,
            LogosToken::Arrow => SyntaxKind::ARROW,
            LogosToken::LArrow => SyntaxKind::LARROW,
            LogosToken::FatArrow => SyntaxKind::FAT_ARROW,
            LogosToken::PlusEq => SyntaxKind::PLUS_EQ,
            LogosToken::MinusEq => SyntaxKind::MINUS_EQ,
            LogosToken::StarEq => SyntaxKind::STAR_EQ,
            LogosToken::SlashEq => SyntaxKind::SLASH_EQ,
            LogosToken::AmpEq => SyntaxKind::AMP_EQ,
            LogosToken::PipeEq => SyntaxKind::PIPE_EQ,
            LogosToken::CaretEq => SyntaxKind::CARET_EQ,

            LogosToken::LBrace => SyntaxKind::L_BRACE,
            LogosToken::RBrace => SyntaxKind::R_BRACE,
            LogosToken::LBracket => SyntaxKind::L_BRACKET,
            LogosToken::RBracket => SyntaxKind::R_BRACKET,
            LogosToken::LParen => SyntaxKind::L_PAREN,
            LogosToken::RParen => SyntaxKind::R_PAREN,
            LogosToken::Semicolon => SyntaxKind::SEMICOLON,
            LogosToken::Colon => SyntaxKind::COLON,
            LogosToken::Comma => SyntaxKind::COMMA,
            LogosToken::Dot => SyntaxKind::DOT,
            LogosToken::Question => SyntaxKind::QUESTION,
            LogosToken::Eq => SyntaxKind::EQ,
            LogosToken::Lt => SyntaxKind::LT,
            LogosToken::Gt => SyntaxKind::GT,
            LogosToken::Plus => SyntaxKind::PLUS,
            LogosToken::Minus => SyntaxKind::MINUS,
            LogosToken::Star => SyntaxKind::STAR,
            LogosToken::Slash => SyntaxKind::SLASH,
            LogosToken::Percent => SyntaxKind::PERCENT,
            LogosToken::Bang => SyntaxKind::BANG,
            LogosToken::Tilde => SyntaxKind::TILDE,
            LogosToken::Amp => SyntaxKind::AMP,
            LogosToken::Pipe => SyntaxKind::PIPE,
            LogosToken::Caret => SyntaxKind::CARET,
            LogosToken::At => SyntaxKind::AT,
            LogosToken::Backtick => SyntaxKind::BACKTICK,

            LogosToken::Import => SyntaxKind::IMPORT_KW,
            LogosToken::As => SyntaxKind::AS_KW,
            LogosToken::Public => SyntaxKind::PUBLIC_KW,
            LogosToken::Private => SyntaxKind::PRIVATE_KW,
            LogosToken::Extern => SyntaxKind::EXTERN_KW,
            LogosToken::Final => SyntaxKind::FINAL_KW,
            LogosToken::Const => SyntaxKind::CONST_KW,
            LogosToken::Listener => SyntaxKind::LISTENER_KW,
            LogosToken::Service => SyntaxKind::SERVICE_KW,
            LogosToken::Resource => SyntaxKind::RESOURCE_KW,
            LogosToken::Remote => SyntaxKind::REMOTE_KW,
            LogosToken::Function => SyntaxKind::FUNCTION_KW,
            LogosToken::Object => SyntaxKind::OBJECT_KW,
            LogosToken::Record => SyntaxKind::RECORD_KW,
            LogosToken::Annotation => SyntaxKind::ANNOTATION_KW,
            LogosToken::Worker => SyntaxKind::WORKER_KW,
            LogosToken::Xmlns => SyntaxKind::XMLNS_KW,
            LogosToken::Returns => SyntaxKind::RETURNS_KW,
            LogosToken::Abstract => SyntaxKind::ABSTRACT_KW,
            LogosToken::Client => SyntaxKind::CLIENT_KW,
            LogosToken::Type => SyntaxKind::TYPE_KW,
            LogosToken::On => SyntaxKind::ON_KW,

            LogosToken::Int => SyntaxKind::INT_KW,
            LogosToken::Byte => SyntaxKind::BYTE_KW,
            LogosToken::FloatKw => SyntaxKind::FLOAT_KW,
            LogosToken::Decimal => SyntaxKind::DECIMAL_KW,
            LogosToken::Boolean => SyntaxKind::BOOLEAN_KW,
            LogosToken::StringKw => SyntaxKind::STRING_KW,
            LogosToken::Error => SyntaxKind::ERROR_KW,
            LogosToken::Map => SyntaxKind::MAP_KW,
            LogosToken::Json => SyntaxKind::JSON_KW,
            LogosToken::Xml => SyntaxKind::XML_KW,
            LogosToken::Table => SyntaxKind::TABLE_KW,
            LogosToken::Stream => SyntaxKind::STREAM_KW,
            LogosToken::Any => SyntaxKind::ANY_KW,
            LogosToken::Typedesc => SyntaxKind::TYPEDESC_KW,
            LogosToken::Future => SyntaxKind::FUTURE_KW,
            LogosToken::Anydata => SyntaxKind::ANYDATA_KW,

            LogosToken::Var => SyntaxKind::VAR_KW,
            LogosToken::New => SyntaxKind::NEW_KW,
            LogosToken::If => SyntaxKind::IF_KW,
            LogosToken::Else => SyntaxKind::ELSE_KW,
            LogosToken::Match => SyntaxKind::MATCH_KW,
            LogosToken::Foreach => SyntaxKind::FOREACH_KW,
            LogosToken::In => SyntaxKind::IN_KW,
            LogosToken::While => SyntaxKind::WHILE_KW,
            LogosToken::Continue => SyntaxKind::CONTINUE_KW,
            LogosToken::Break => SyntaxKind::BREAK_KW,
            LogosToken::Fork => SyntaxKind::FORK_KW,
            LogosToken::Panic => SyntaxKind::PANIC_KW,
            LogosToken::Trap => SyntaxKind::TRAP_KW,
            LogosToken::Return => SyntaxKind::RETURN_KW,
            LogosToken::Transaction => SyntaxKind::TRANSACTION_KW,
            LogosToken::Abort => SyntaxKind::ABORT_KW,
            LogosToken::Retry => SyntaxKind::RETRY_KW,
            LogosToken::Onretry => SyntaxKind::ONRETRY_KW,
            LogosToken::Retries => SyntaxKind::RETRIES_KW,
            LogosToken::Committed => SyntaxKind::COMMITTED_KW,
            LogosToken::Aborted => SyntaxKind::ABORTED_KW,
            LogosToken::With => SyntaxKind::WITH_KW,
            LogosToken::Lock => SyntaxKind::LOCK_KW,
            LogosToken::Untaint => SyntaxKind::UNTAINT_KW,
            LogosToken::Lengthof => SyntaxKind::LENGTHOF_KW,
            LogosToken::Typeof => SyntaxKind::TYPEOF_KW,
            LogosToken::Start => SyntaxKind::START_KW,
            LogosToken::But => SyntaxKind::BUT_KW,
            LogosToken::Check => SyntaxKind::CHECK_KW,
            LogosToken::Wait => SyntaxKind::WAIT_KW,
            LogosToken::Forever => SyntaxKind::FOREVER_KW,

            LogosToken::From => SyntaxKind::FROM_KW,
            LogosToken::Where => SyntaxKind::WHERE_KW,
            LogosToken::Select => SyntaxKind::SELECT_KW,
            LogosToken::Group => SyntaxKind::GROUP_KW,
            LogosToken::By => SyntaxKind::BY_KW,
            LogosToken::Having => SyntaxKind::HAVING_KW,
            LogosToken::Order => SyntaxKind::ORDER_KW,
            LogosToken::Join => SyntaxKind::JOIN_KW,

            LogosToken::True => SyntaxKind::TRUE_KW,
            LogosToken::False => SyntaxKind::FALSE_KW,
            LogosToken::Null => SyntaxKind::NULL_KW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        tokenize(input)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_lex_keywords_and_idents() {
        assert_eq!(
            kinds("function foo"),
            vec![SyntaxKind::FUNCTION_KW, SyntaxKind::IDENT, SyntaxKind::EOF]
        );
    }

    #[test]
    fn test_lex_keyword_prefix_is_ident() {
        assert_eq!(kinds("imports"), vec![SyntaxKind::IDENT, SyntaxKind::EOF]);
    }

    #[test]
    fn test_chevrons_are_never_merged() {
        assert_eq!(
            kinds("a >> b"),
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::GT,
                SyntaxKind::GT,
                SyntaxKind::IDENT,
                SyntaxKind::EOF
            ]
        );
    }

    #[test]
    fn test_range_operators() {
        assert_eq!(
            kinds("1...5 1..<5"),
            vec![
                SyntaxKind::INTEGER_LITERAL,
                SyntaxKind::ELLIPSIS,
                SyntaxKind::INTEGER_LITERAL,
                SyntaxKind::INTEGER_LITERAL,
                SyntaxKind::DOT_DOT_LT,
                SyntaxKind::INTEGER_LITERAL,
                SyntaxKind::EOF
            ]
        );
    }

    #[test]
    fn test_lex_floats() {
        assert_eq!(
            kinds("3.14 1e10 2.5f"),
            vec![
                SyntaxKind::FLOAT_LITERAL,
                SyntaxKind::FLOAT_LITERAL,
                SyntaxKind::FLOAT_LITERAL,
                SyntaxKind::EOF
            ]
        );
    }

    #[test]
    fn test_string_template_modes() {
        assert_eq!(
            kinds("string `a ${x + 1} b`"),
            vec![
                SyntaxKind::STRING_KW,
                SyntaxKind::BACKTICK,
                SyntaxKind::TEMPLATE_TEXT,
                SyntaxKind::TEMPLATE_INTERP_START,
                SyntaxKind::IDENT,
                SyntaxKind::PLUS,
                SyntaxKind::INTEGER_LITERAL,
                SyntaxKind::R_BRACE,
                SyntaxKind::TEMPLATE_TEXT,
                SyntaxKind::BACKTICK,
                SyntaxKind::EOF
            ]
        );
    }

    #[test]
    fn test_template_interpolation_with_nested_braces() {
        let toks = kinds("string `${ {a: 1}.a }`");
        assert_eq!(toks[2], SyntaxKind::TEMPLATE_INTERP_START);
        assert_eq!(toks[toks.len() - 2], SyntaxKind::BACKTICK);
        assert_eq!(toks.iter().filter(|k| **k == SyntaxKind::R_BRACE).count(), 2);
    }

    #[test]
    fn test_xml_literal_modes() {
        assert_eq!(
            kinds("xml `<a>{{name}}</a>`"),
            vec![
                SyntaxKind::XML_KW,
                SyntaxKind::BACKTICK,
                SyntaxKind::XML_TEXT,
                SyntaxKind::XML_INTERP_START,
                SyntaxKind::IDENT,
                SyntaxKind::XML_INTERP_END,
                SyntaxKind::XML_TEXT,
                SyntaxKind::BACKTICK,
                SyntaxKind::EOF
            ]
        );
    }

    #[test]
    fn test_closing_braces_outside_xml_are_separate() {
        assert_eq!(
            kinds("{{}}"),
            vec![
                SyntaxKind::L_BRACE,
                SyntaxKind::L_BRACE,
                SyntaxKind::R_BRACE,
                SyntaxKind::R_BRACE,
                SyntaxKind::EOF
            ]
        );
    }

    #[test]
    fn test_doc_lines() {
        assert_eq!(
            kinds("# Adds numbers\n# + a - first\nfunction"),
            vec![
                SyntaxKind::DOC_LINE,
                SyntaxKind::DOC_LINE,
                SyntaxKind::FUNCTION_KW,
                SyntaxKind::EOF
            ]
        );
    }

    #[test]
    fn test_lossless_offsets() {
        let input = "int x = 1; // done\n";
        let tokens = tokenize(input);
        let rebuilt: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(rebuilt, input);
        for pair in tokens.windows(2) {
            assert_eq!(pair[0].range().end(), pair[1].offset);
        }
    }

    #[test]
    fn test_invalid_character() {
        assert!(kinds("a $ b").contains(&SyntaxKind::ERROR));
    }

    #[test]
    fn test_unterminated_string_is_one_error_token() {
        let tokens = tokenize("\"abc\n;");
        assert_eq!(tokens[0].kind, SyntaxKind::ERROR);
        assert_eq!(tokens[0].text, "\"abc");
        assert_eq!(kinds("\"a\\\"b\""), vec![SyntaxKind::STRING_LITERAL, SyntaxKind::EOF]);
    }

    #[test]
    fn test_unterminated_template_ends_with_eof() {
        let toks = kinds("string `abc");
        assert_eq!(toks.last(), Some(&SyntaxKind::EOF));
        assert_eq!(toks.iter().filter(|k| **k == SyntaxKind::EOF).count(), 1);
    }
}
