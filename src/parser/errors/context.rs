//! Parse context tracking for context-aware error messages
//!
//! Every rule frame on the dispatcher stack carries a context. The innermost
//! one phrases diagnostics ("expected ';' in function body") and the union of
//! all active contexts' recovery tokens bounds error-recovery skipping.

use crate::parser::SyntaxKind;
use crate::parser::token_set::TokenSet;

/// Represents the current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParseContext {
    /// At the top level of a compilation unit
    #[default]
    TopLevel,
    /// Parsing an import declaration
    Import,
    /// Parsing an `xmlns` declaration
    Namespace,
    /// Parsing a definition prefix (documentation, annotations, visibility)
    Definition,
    /// Parsing a function definition
    FunctionDefinition,
    /// Parsing a service definition
    ServiceDefinition,
    /// Parsing a type definition
    TypeDefinition,
    /// Parsing a module-level variable
    GlobalVariable,
    /// Parsing a constant definition
    Constant,
    /// Parsing an annotation definition
    AnnotationDefinition,
    /// Parsing an annotation attachment `@name {...}`
    AnnotationAttachment,
    /// Parsing `#` documentation lines
    Documentation,
    /// Parsing a parameter list
    ParameterList,
    /// Parsing a single parameter
    Parameter,
    /// Parsing a type descriptor
    TypeDescriptor,
    /// Inside a record type body
    RecordBody,
    /// Inside an object type body
    ObjectBody,
    /// Parsing a variable reference chain
    VariableReference,
    /// Parsing an expression
    Expression,
    /// Parsing an argument list
    ArgumentList,
    /// Inside a block of statements
    Block,
    /// Parsing a statement
    Statement,
    /// Parsing a match clause
    MatchClause,
    /// Inside a string template
    StringTemplate,
    /// Inside an XML literal
    XmlLiteral,
    /// Parsing a table query
    TableQuery,
    /// Parsing a streaming query inside `forever`
    StreamingQuery,
}

const DEFINITION_START: TokenSet = TokenSet::new(&[
    SyntaxKind::IMPORT_KW,
    SyntaxKind::XMLNS_KW,
    SyntaxKind::PUBLIC_KW,
    SyntaxKind::PRIVATE_KW,
    SyntaxKind::EXTERN_KW,
    SyntaxKind::FUNCTION_KW,
    SyntaxKind::SERVICE_KW,
    SyntaxKind::TYPE_KW,
    SyntaxKind::CONST_KW,
    SyntaxKind::LISTENER_KW,
    SyntaxKind::FINAL_KW,
    SyntaxKind::ANNOTATION_KW,
    SyntaxKind::AT,
    SyntaxKind::DOC_LINE,
]);

const STATEMENT_START: TokenSet = TokenSet::new(&[
    SyntaxKind::SEMICOLON,
    SyntaxKind::R_BRACE,
    SyntaxKind::IF_KW,
    SyntaxKind::WHILE_KW,
    SyntaxKind::FOREACH_KW,
    SyntaxKind::MATCH_KW,
    SyntaxKind::RETURN_KW,
    SyntaxKind::BREAK_KW,
    SyntaxKind::CONTINUE_KW,
    SyntaxKind::PANIC_KW,
    SyntaxKind::LOCK_KW,
    SyntaxKind::TRANSACTION_KW,
    SyntaxKind::RETRY_KW,
    SyntaxKind::ABORT_KW,
    SyntaxKind::FORK_KW,
    SyntaxKind::WORKER_KW,
    SyntaxKind::FOREVER_KW,
]);

const EXPRESSION_END: TokenSet = TokenSet::new(&[
    SyntaxKind::SEMICOLON,
    SyntaxKind::R_PAREN,
    SyntaxKind::R_BRACE,
    SyntaxKind::R_BRACKET,
    SyntaxKind::COMMA,
]);

impl ParseContext {
    /// Get a human-readable description of this context for error messages
    pub fn description(&self) -> &'static str {
        match self {
            Self::TopLevel => "at top level",
            Self::Import => "in import declaration",
            Self::Namespace => "in xmlns declaration",
            Self::Definition => "in definition",
            Self::FunctionDefinition => "in function definition",
            Self::ServiceDefinition => "in service definition",
            Self::TypeDefinition => "in type definition",
            Self::GlobalVariable => "in module variable",
            Self::Constant => "in constant definition",
            Self::AnnotationDefinition => "in annotation definition",
            Self::AnnotationAttachment => "in annotation",
            Self::Documentation => "in documentation",
            Self::ParameterList => "in parameter list",
            Self::Parameter => "in parameter",
            Self::TypeDescriptor => "in type",
            Self::RecordBody => "in record body",
            Self::ObjectBody => "in object body",
            Self::VariableReference => "in variable reference",
            Self::Expression => "in expression",
            Self::ArgumentList => "in argument list",
            Self::Block => "in block",
            Self::Statement => "in statement",
            Self::MatchClause => "in match clause",
            Self::StringTemplate => "in string template",
            Self::XmlLiteral => "in XML literal",
            Self::TableQuery => "in table query",
            Self::StreamingQuery => "in streaming query",
        }
    }

    /// Get a description of what is expected in this context
    pub fn expected_description(&self) -> &'static str {
        match self {
            Self::TopLevel => "an import, a definition, or an annotation",
            Self::Import => "an organization and package name",
            Self::Namespace => "a namespace URI string",
            Self::Definition => "a function, service, type, constant, or variable",
            Self::FunctionDefinition => "a function signature and body",
            Self::ServiceDefinition | Self::ObjectBody => "fields or function definitions",
            Self::TypeDefinition => "a type name and type descriptor",
            Self::GlobalVariable => "a typed variable declaration",
            Self::Constant => "a constant name and value",
            Self::AnnotationDefinition => "attach points and an annotation name",
            Self::AnnotationAttachment => "an annotation name and optional record literal",
            Self::Documentation => "documentation lines",
            Self::ParameterList | Self::Parameter => "a parameter (type and name)",
            Self::TypeDescriptor => "a type (e.g., int, string[], map<json>, Person?)",
            Self::RecordBody => "record fields",
            Self::VariableReference => "a variable name, field access, index, or call",
            Self::Expression => "an expression (literal, name, or operator)",
            Self::ArgumentList => "an argument",
            Self::Block | Self::Statement => "a statement",
            Self::MatchClause => "a match pattern followed by '=>'",
            Self::StringTemplate => "template text or '${' interpolation",
            Self::XmlLiteral => "XML text or '{{' interpolation",
            Self::TableQuery => "query clauses (from, where, select, order by)",
            Self::StreamingQuery => "a streaming query and '=>' action",
        }
    }

    /// Tokens at which error recovery may resume inside this context
    pub fn recovery_tokens(&self) -> TokenSet {
        match self {
            Self::TopLevel | Self::Definition => DEFINITION_START,
            Self::Documentation | Self::AnnotationAttachment => {
                DEFINITION_START.union(TokenSet::new(&[SyntaxKind::R_BRACE]))
            }
            Self::Import | Self::Namespace => TokenSet::new(&[SyntaxKind::SEMICOLON]),
            Self::FunctionDefinition => TokenSet::new(&[
                SyntaxKind::L_BRACE,
                SyntaxKind::SEMICOLON,
                SyntaxKind::RETURNS_KW,
            ]),
            Self::ServiceDefinition | Self::ObjectBody => TokenSet::new(&[
                SyntaxKind::SEMICOLON,
                SyntaxKind::R_BRACE,
                SyntaxKind::FUNCTION_KW,
                SyntaxKind::RESOURCE_KW,
                SyntaxKind::REMOTE_KW,
                SyntaxKind::PUBLIC_KW,
                SyntaxKind::PRIVATE_KW,
                SyntaxKind::AT,
                SyntaxKind::DOC_LINE,
            ]),
            Self::TypeDefinition | Self::GlobalVariable | Self::Constant => {
                TokenSet::new(&[SyntaxKind::SEMICOLON, SyntaxKind::EQ])
            }
            Self::AnnotationDefinition => TokenSet::new(&[SyntaxKind::SEMICOLON, SyntaxKind::GT]),
            Self::ParameterList | Self::Parameter => TokenSet::new(&[
                SyntaxKind::R_PAREN,
                SyntaxKind::COMMA,
                SyntaxKind::L_BRACE,
                SyntaxKind::RETURNS_KW,
            ]),
            Self::TypeDescriptor => TokenSet::new(&[
                SyntaxKind::SEMICOLON,
                SyntaxKind::R_PAREN,
                SyntaxKind::R_BRACE,
                SyntaxKind::PIPE_R_BRACE,
                SyntaxKind::COMMA,
                SyntaxKind::GT,
                SyntaxKind::EQ,
            ]),
            Self::RecordBody => TokenSet::new(&[
                SyntaxKind::SEMICOLON,
                SyntaxKind::R_BRACE,
                SyntaxKind::PIPE_R_BRACE,
            ]),
            Self::VariableReference | Self::Expression => EXPRESSION_END,
            Self::ArgumentList => TokenSet::new(&[
                SyntaxKind::R_PAREN,
                SyntaxKind::COMMA,
                SyntaxKind::SEMICOLON,
            ]),
            Self::Block | Self::Statement => STATEMENT_START,
            Self::MatchClause => TokenSet::new(&[
                SyntaxKind::FAT_ARROW,
                SyntaxKind::R_BRACE,
                SyntaxKind::COMMA,
            ]),
            Self::StringTemplate | Self::XmlLiteral => TokenSet::new(&[SyntaxKind::BACKTICK]),
            Self::TableQuery => TokenSet::new(&[
                SyntaxKind::WHERE_KW,
                SyntaxKind::SELECT_KW,
                SyntaxKind::ORDER_KW,
                SyntaxKind::GROUP_KW,
                SyntaxKind::JOIN_KW,
                SyntaxKind::SEMICOLON,
            ]),
            Self::StreamingQuery => TokenSet::new(&[
                SyntaxKind::FAT_ARROW,
                SyntaxKind::R_BRACE,
                SyntaxKind::SELECT_KW,
            ]),
        }
    }
}
