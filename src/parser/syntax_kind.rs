//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree:
//! trivia, tokens produced by the lexer, tokens assembled by the parser
//! (multi-chevron shift operators), keywords, and composite nodes.

/// All syntax kinds (tokens and nodes) of the Ballerina CST
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (definitions, statements, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,

    // =========================================================================
    // LITERALS AND TEXT
    // =========================================================================
    IDENT,              // identifier
    INTEGER_LITERAL,    // 42, 0xFF, 0b101
    FLOAT_LITERAL,      // 3.14, 1e10
    STRING_LITERAL,     // "hello"
    DOC_LINE,           // # markdown documentation line
    TEMPLATE_TEXT,      // raw text inside string `...`
    XML_TEXT,           // raw text inside xml `...`

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,            // {
    R_BRACE,            // }
    L_BRACE_PIPE,       // {|
    PIPE_R_BRACE,       // |}
    L_BRACKET,          // [
    R_BRACKET,          // ]
    L_PAREN,            // (
    R_PAREN,            // )
    SEMICOLON,          // ;
    COLON,              // :
    COMMA,              // ,
    DOT,                // .
    DOT_DOT,            // ..
    DOT_DOT_LT,         // ..<
    ELLIPSIS,           // ...
    QUESTION,           // ?
    ELVIS,              // ?:
    EQ,                 // =
    EQ_EQ,              // ==
    BANG_EQ,            // !=
    EQ_EQ_EQ,           // ===
    BANG_EQ_EQ,         // !==
    LT,                 // <
    GT,                 // >
    LT_EQ,              // <=
    GT_EQ,              // >=
    PLUS,               // +
    MINUS,              // -
    STAR,               // *
    SLASH,              // /
    PERCENT,            // %
    BANG,               // !
    TILDE,              // ~
    AMP,                // &
    AMP_AMP,            // &&
    PIPE,               // |
    PIPE_PIPE,          // ||
    CARET,              // ^
    AT,                 // @
    ARROW,              // ->
    LARROW,             // <-
    FAT_ARROW,          // =>
    PLUS_EQ,            // +=
    MINUS_EQ,           // -=
    STAR_EQ,            // *=
    SLASH_EQ,           // /=
    AMP_EQ,             // &=
    PIPE_EQ,            // |=
    CARET_EQ,           // ^=
    BACKTICK,           // `
    TEMPLATE_INTERP_START, // ${
    XML_INTERP_START,   // {{
    XML_INTERP_END,     // }}

    // Assembled by the parser from adjacent chevrons
    SHL,                // <<
    SHR,                // >>
    USHR,               // >>>
    SHL_EQ,             // <<=
    SHR_EQ,             // >>=
    USHR_EQ,            // >>>=

    // =========================================================================
    // KEYWORDS - module level and definitions
    // =========================================================================
    IMPORT_KW,
    AS_KW,
    PUBLIC_KW,
    PRIVATE_KW,
    EXTERN_KW,
    FINAL_KW,
    CONST_KW,
    LISTENER_KW,
    SERVICE_KW,
    RESOURCE_KW,
    REMOTE_KW,
    FUNCTION_KW,
    OBJECT_KW,
    RECORD_KW,
    ANNOTATION_KW,
    WORKER_KW,
    XMLNS_KW,
    RETURNS_KW,
    ABSTRACT_KW,
    CLIENT_KW,
    TYPE_KW,
    ON_KW,

    // Builtin type names
    INT_KW,
    BYTE_KW,
    FLOAT_KW,
    DECIMAL_KW,
    BOOLEAN_KW,
    STRING_KW,
    ERROR_KW,
    MAP_KW,
    JSON_KW,
    XML_KW,
    TABLE_KW,
    STREAM_KW,
    ANY_KW,
    TYPEDESC_KW,
    FUTURE_KW,
    ANYDATA_KW,

    // Statements and expressions
    VAR_KW,
    NEW_KW,
    IF_KW,
    ELSE_KW,
    MATCH_KW,
    FOREACH_KW,
    IN_KW,
    WHILE_KW,
    CONTINUE_KW,
    BREAK_KW,
    FORK_KW,
    PANIC_KW,
    TRAP_KW,
    RETURN_KW,
    TRANSACTION_KW,
    ABORT_KW,
    RETRY_KW,
    ONRETRY_KW,
    RETRIES_KW,
    COMMITTED_KW,
    ABORTED_KW,
    WITH_KW,
    LOCK_KW,
    UNTAINT_KW,
    LENGTHOF_KW,
    TYPEOF_KW,
    START_KW,
    BUT_KW,
    CHECK_KW,
    WAIT_KW,
    FOREVER_KW,

    // Queries
    FROM_KW,
    WHERE_KW,
    SELECT_KW,
    GROUP_KW,
    BY_KW,
    HAVING_KW,
    ORDER_KW,
    JOIN_KW,

    // Literal keywords
    TRUE_KW,
    FALSE_KW,
    NULL_KW,

    // =========================================================================
    // END OF INPUT
    // =========================================================================
    EOF,

    // =========================================================================
    // COMPOSITE NODES (non-terminals in the grammar)
    // =========================================================================
    // Roots
    COMPILATION_UNIT,
    FRAGMENT,           // root of a single-rule parse

    // Module level
    IMPORT_DECL,
    ORG_NAME,
    PACKAGE_NAME,
    VERSION_CLAUSE,
    IMPORT_ALIAS,
    NAMESPACE_DECL,
    DOCUMENTATION,
    ANNOTATION_ATTACHMENT,

    // Definitions
    FUNCTION_DEF,
    SERVICE_DEF,
    SERVICE_BODY,
    TYPE_DEF,
    GLOBAL_VAR_DEF,
    CONST_DEF,
    ANNOTATION_DEF,
    ATTACH_POINTS,
    PARAM_LIST,
    PARAM,
    REST_PARAM,
    RETURN_TYPE,
    ATTACHED_NAME,

    // Names
    NAME,
    NAME_REF,

    // Types
    BUILTIN_TYPE,
    TYPE_REF,
    TYPE_PARAMS,
    PARAMETERIZED_TYPE,
    LITERAL_TYPE,
    NIL_TYPE,
    GROUP_TYPE,
    TUPLE_TYPE,
    ARRAY_TYPE,
    ARRAY_DIMENSION,
    UNION_TYPE,
    OPTIONAL_TYPE,
    FUNCTION_TYPE,
    OBJECT_TYPE,
    RECORD_TYPE,
    FIELD_DEF,
    TYPE_INCLUSION,
    REST_DESCRIPTOR,
    SEALED_MARKER,

    // Variable references
    FUNCTION_CALL,
    INDEX_EXPR,
    FIELD_EXPR,
    XML_ATTRIBUTE_EXPR,
    CALL_EXPR,
    ARG_LIST,
    NAMED_ARG,
    REST_ARG,

    // Expressions
    LITERAL,
    NIL_LITERAL,
    ARRAY_LITERAL,
    RECORD_LITERAL,
    RECORD_FIELD,
    TABLE_LITERAL,
    TABLE_COLUMNS,
    TABLE_ROW,
    TUPLE_EXPR,
    PAREN_EXPR,
    BINARY_EXPR,
    PREFIX_EXPR,
    TERNARY_EXPR,
    ELVIS_EXPR,
    RANGE_EXPR,
    MATCH_EXPR,
    MATCH_EXPR_ARM,
    TYPE_CONVERSION_EXPR,
    CHECK_EXPR,
    TRAP_EXPR,
    START_EXPR,
    WAIT_EXPR,
    WORKER_RECEIVE_EXPR,
    ACTION_INVOCATION,
    LAMBDA_EXPR,
    ARROW_FUNCTION,
    ARROW_PARAMS,
    TYPE_INIT_EXPR,
    TYPEOF_EXPR,

    // Embedded sub-languages
    STRING_TEMPLATE,
    TEMPLATE_INTERPOLATION,
    XML_LITERAL,
    XML_INTERPOLATION,
    TABLE_QUERY,
    FROM_CLAUSE,
    JOIN_CLAUSE,
    WHERE_CLAUSE,
    WINDOW_CLAUSE,
    SELECT_CLAUSE,
    SELECT_ITEM,
    GROUP_BY_CLAUSE,
    HAVING_CLAUSE,
    ORDER_BY_CLAUSE,
    LIMIT_CLAUSE,

    // Statements
    BLOCK,
    VAR_DEF_STMT,
    ASSIGN_STMT,
    COMPOUND_ASSIGN_STMT,
    TUPLE_DESTRUCTURE_STMT,
    TUPLE_REF,
    WORKER_SEND_STMT,
    EXPR_STMT,
    IF_STMT,
    ELSE_CLAUSE,
    WHILE_STMT,
    FOREACH_STMT,
    BINDING_PATTERN,
    MATCH_STMT,
    MATCH_CLAUSE,
    MATCH_PATTERN,
    BREAK_STMT,
    CONTINUE_STMT,
    RETURN_STMT,
    PANIC_STMT,
    LOCK_STMT,
    TRANSACTION_STMT,
    TRANSACTION_PROPS,
    ONRETRY_CLAUSE,
    COMMITTED_CLAUSE,
    ABORTED_CLAUSE,
    RETRY_STMT,
    ABORT_STMT,
    FORK_STMT,
    WORKER_DECL,
    FOREVER_STMT,
    STREAMING_QUERY,
    STREAMING_ACTION,

    // Special
    ERROR,
    MISSING,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::IMPORT_KW as u16) && (self as u16) <= (Self::NULL_KW as u16)
    }

    /// Check if this is a punctuation or operator token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::USHR_EQ as u16)
    }

    /// Check if this kind is a composite node rather than a token
    pub fn is_node(self) -> bool {
        (self as u16) >= (Self::COMPILATION_UNIT as u16) && self != Self::__LAST
    }

    /// Short human-readable rendering used in diagnostics (`';'`, `identifier`, ...)
    pub fn display_name(self) -> &'static str {
        match self {
            Self::IDENT => "identifier",
            Self::INTEGER_LITERAL => "integer literal",
            Self::FLOAT_LITERAL => "float literal",
            Self::STRING_LITERAL => "string literal",
            Self::DOC_LINE => "documentation line",
            Self::TEMPLATE_TEXT => "template text",
            Self::XML_TEXT => "XML text",
            Self::L_BRACE => "'{'",
            Self::R_BRACE => "'}'",
            Self::L_BRACE_PIPE => "'{|'",
            Self::PIPE_R_BRACE => "'|}'",
            Self::L_BRACKET => "'['",
            Self::R_BRACKET => "']'",
            Self::L_PAREN => "'('",
            Self::R_PAREN => "')'",
            Self::SEMICOLON => "';'",
            Self::COLON => "':'",
            Self::COMMA => "','",
            Self::DOT => "'.'",
            Self::DOT_DOT => "'..'",
            Self::DOT_DOT_LT => "'..<'",
            Self::ELLIPSIS => "'...'",
            Self::QUESTION => "'?'",
            Self::ELVIS => "'?:'",
            Self::EQ => "'='",
            Self::EQ_EQ => "'=='",
            Self::BANG_EQ => "'!='",
            Self::EQ_EQ_EQ => "'==='",
            Self::BANG_EQ_EQ => "'!=='",
            Self::LT => "'<'",
            Self::GT => "'>'",
            Self::LT_EQ => "'<='",
            Self::GT_EQ => "'>='",
            Self::PLUS => "'+'",
            Self::MINUS => "'-'",
            Self::STAR => "'*'",
            Self::SLASH => "'/'",
            Self::PERCENT => "'%'",
            Self::BANG => "'!'",
            Self::TILDE => "'~'",
            Self::AMP => "'&'",
            Self::AMP_AMP => "'&&'",
            Self::PIPE => "'|'",
            Self::PIPE_PIPE => "'||'",
            Self::CARET => "'^'",
            Self::AT => "'@'",
            Self::ARROW => "'->'",
            Self::LARROW => "'<-'",
            Self::FAT_ARROW => "'=>'",
            Self::BACKTICK => "'`'",
            Self::TEMPLATE_INTERP_START => "'${'",
            Self::XML_INTERP_START => "'{{'",
            Self::XML_INTERP_END => "'}}'",
            Self::SHL => "'<<'",
            Self::SHR => "'>>'",
            Self::USHR => "'>>>'",
            Self::EOF => "end of input",
            Self::ERROR => "invalid token",
            _ if self.is_keyword() => "keyword",
            _ => "token",
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BallerinaLanguage {}

impl rowan::Language for BallerinaLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<BallerinaLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<BallerinaLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<BallerinaLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<BallerinaLanguage>;
