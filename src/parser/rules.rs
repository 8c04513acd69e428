//! Rule dispatcher
//!
//! Every grammar rule with its own context and synchronization set is named by
//! a [`Rule`]. [`parse_rule`] runs one rule to completion: it pushes a frame
//! (rule identity, entry position, binding-power threshold, sync set), runs the
//! rule's production, and pops the frame. Productions commit to one alternative;
//! only the lookahead disambiguator explores, and it never touches the real tree
//! or diagnostics.

use super::errors::{ErrorCode, ParseContext, SyntaxError, unexpected_message};
use super::grammar::{embedded, expressions, module, references, statements, types};
use super::parser::Parser;
use super::syntax_kind::SyntaxKind;
use super::token_set::TokenSet;
use rowan::TextRange;

/// A grammar production: consumes tokens and emits exactly one node
pub type RuleFn = for<'p, 't> fn(&'p mut Parser<'t>);

/// Grammar rules routed through the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    CompilationUnit,
    ImportDeclaration,
    NamespaceDeclaration,
    /// Dispatches to one of the concrete definition rules below
    Definition,
    FunctionDefinition,
    ServiceDefinition,
    TypeDefinition,
    GlobalVariableDefinition,
    ConstantDefinition,
    AnnotationDefinition,
    AnnotationAttachment,
    Documentation,
    ParameterList,
    Parameter,
    /// Precedence-climbing: array, union, optional
    TypeDescriptor,
    RecordBody,
    ObjectBody,
    /// Precedence-climbing: index, field, xml attribute, invocation
    VariableReference,
    /// Precedence-climbing: the full expression grammar
    Expression,
    ArgumentList,
    Block,
    Statement,
    MatchClause,
    StringTemplate,
    XmlLiteral,
    TableQuery,
    StreamingQuery,
}

impl Rule {
    pub const ALL: &'static [Rule] = &[
        Rule::CompilationUnit,
        Rule::ImportDeclaration,
        Rule::NamespaceDeclaration,
        Rule::Definition,
        Rule::FunctionDefinition,
        Rule::ServiceDefinition,
        Rule::TypeDefinition,
        Rule::GlobalVariableDefinition,
        Rule::ConstantDefinition,
        Rule::AnnotationDefinition,
        Rule::AnnotationAttachment,
        Rule::Documentation,
        Rule::ParameterList,
        Rule::Parameter,
        Rule::TypeDescriptor,
        Rule::RecordBody,
        Rule::ObjectBody,
        Rule::VariableReference,
        Rule::Expression,
        Rule::ArgumentList,
        Rule::Block,
        Rule::Statement,
        Rule::MatchClause,
        Rule::StringTemplate,
        Rule::XmlLiteral,
        Rule::TableQuery,
        Rule::StreamingQuery,
    ];

    pub fn context(self) -> ParseContext {
        match self {
            Rule::CompilationUnit => ParseContext::TopLevel,
            Rule::ImportDeclaration => ParseContext::Import,
            Rule::NamespaceDeclaration => ParseContext::Namespace,
            Rule::Definition => ParseContext::Definition,
            Rule::FunctionDefinition => ParseContext::FunctionDefinition,
            Rule::ServiceDefinition => ParseContext::ServiceDefinition,
            Rule::TypeDefinition => ParseContext::TypeDefinition,
            Rule::GlobalVariableDefinition => ParseContext::GlobalVariable,
            Rule::ConstantDefinition => ParseContext::Constant,
            Rule::AnnotationDefinition => ParseContext::AnnotationDefinition,
            Rule::AnnotationAttachment => ParseContext::AnnotationAttachment,
            Rule::Documentation => ParseContext::Documentation,
            Rule::ParameterList => ParseContext::ParameterList,
            Rule::Parameter => ParseContext::Parameter,
            Rule::TypeDescriptor => ParseContext::TypeDescriptor,
            Rule::RecordBody => ParseContext::RecordBody,
            Rule::ObjectBody => ParseContext::ObjectBody,
            Rule::VariableReference => ParseContext::VariableReference,
            Rule::Expression => ParseContext::Expression,
            Rule::ArgumentList => ParseContext::ArgumentList,
            Rule::Block => ParseContext::Block,
            Rule::Statement => ParseContext::Statement,
            Rule::MatchClause => ParseContext::MatchClause,
            Rule::StringTemplate => ParseContext::StringTemplate,
            Rule::XmlLiteral => ParseContext::XmlLiteral,
            Rule::TableQuery => ParseContext::TableQuery,
            Rule::StreamingQuery => ParseContext::StreamingQuery,
        }
    }

    /// Tokens at which recovery inside this rule may resume
    pub fn sync_set(self) -> TokenSet {
        self.context().recovery_tokens()
    }

    /// Rules implemented by the precedence-climbing engine
    pub fn is_climbing(self) -> bool {
        matches!(
            self,
            Rule::TypeDescriptor | Rule::VariableReference | Rule::Expression
        )
    }

    fn production(self) -> RuleFn {
        match self {
            Rule::CompilationUnit => module::compilation_unit,
            Rule::ImportDeclaration => module::import_declaration,
            Rule::NamespaceDeclaration => module::namespace_declaration,
            Rule::Definition => module::definition,
            Rule::FunctionDefinition => module::function_definition,
            Rule::ServiceDefinition => module::service_definition,
            Rule::TypeDefinition => module::type_definition,
            Rule::GlobalVariableDefinition => module::global_variable_definition,
            Rule::ConstantDefinition => module::constant_definition,
            Rule::AnnotationDefinition => module::annotation_definition,
            Rule::AnnotationAttachment => module::annotation_attachment,
            Rule::Documentation => module::documentation,
            Rule::ParameterList => module::parameter_list,
            Rule::Parameter => module::parameter,
            Rule::TypeDescriptor => types::type_descriptor,
            Rule::RecordBody => types::record_body,
            Rule::ObjectBody => types::object_body,
            Rule::VariableReference => references::variable_reference,
            Rule::Expression => expressions::expression,
            Rule::ArgumentList => references::argument_list,
            Rule::Block => statements::block,
            Rule::Statement => statements::statement,
            Rule::MatchClause => statements::match_clause,
            Rule::StringTemplate => embedded::string_template,
            Rule::XmlLiteral => embedded::xml_literal,
            Rule::TableQuery => embedded::table_query,
            Rule::StreamingQuery => embedded::streaming_query,
        }
    }
}

/// One active rule invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleFrame {
    pub rule: Rule,
    /// Raw token index at entry
    pub entry: usize,
    /// Binding-power threshold for climbing rules (0 otherwise)
    pub min_bp: u8,
    pub sync: TokenSet,
}

/// What a finished rule invocation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleOutcome {
    /// At least one significant token was consumed
    pub consumed: bool,
    /// Diagnostics were recorded while the rule ran
    pub partial: bool,
    /// Source range of the consumed tokens
    pub range: TextRange,
}

/// Sync set for a new frame of `rule`
///
/// The listener expressions of a service stop at the `{` of its body, so a
/// broken expression cannot skip the body as one bracketed group.
fn frame_sync(p: &Parser<'_>, rule: Rule) -> TokenSet {
    let parent = p.innermost_frame().map(|f| f.rule);
    match (rule, parent) {
        (Rule::Expression, Some(Rule::ServiceDefinition)) => {
            rule.sync_set().union(TokenSet::single(SyntaxKind::L_BRACE))
        }
        _ => rule.sync_set(),
    }
}

/// Run `rule` to completion at the current position
pub fn parse_rule(p: &mut Parser<'_>, rule: Rule) -> RuleOutcome {
    parse_rule_bp(p, rule, 0)
}

/// Run a climbing rule with an explicit binding-power threshold
pub fn parse_rule_bp(p: &mut Parser<'_>, rule: Rule, min_bp: u8) -> RuleOutcome {
    let entry = p.raw_pos();
    let start = p.current_range().start();
    let bumped_before = p.bumped();
    let errors_before = p.error_count();

    if !p.enter_nesting() {
        nesting_overflow(p, rule);
        return RuleOutcome {
            consumed: p.bumped() > bumped_before,
            partial: true,
            range: TextRange::empty(start),
        };
    }

    let sync = frame_sync(p, rule);
    p.push_frame(RuleFrame {
        rule,
        entry,
        min_bp,
        sync,
    });
    tracing::trace!(?rule, entry, min_bp, speculating = p.is_speculating(), "enter rule");

    (rule.production())(p);

    p.pop_frame();
    p.leave_nesting();

    let consumed = p.bumped() > bumped_before;
    let range = if consumed {
        TextRange::new(start, p.prev_end().max(start))
    } else {
        TextRange::empty(start)
    };
    let partial = p.error_count() > errors_before;
    tracing::trace!(?rule, consumed, partial, "exit rule");

    RuleOutcome {
        consumed,
        partial,
        range,
    }
}

fn nesting_overflow(p: &mut Parser<'_>, rule: Rule) {
    let found = p.current_kind();
    let message = format!(
        "nesting limit of {} exceeded {}",
        p.options().max_nesting,
        rule.context().description()
    );
    let error = SyntaxError::builder(ErrorCode::E0903)
        .message(message)
        .range(p.current_range())
        .found(found)
        .build();
    super::recovery::report(p, error);
    if !p.at_eof() && !p.at_set(p.sync_set()) {
        super::recovery::delete_current(p);
    }
}

/// Report that nothing the rule accepts starts at the current token
pub(crate) fn unexpected_here(p: &Parser<'_>, code: ErrorCode, expected: TokenSet) -> SyntaxError {
    let context = p
        .innermost_frame()
        .map(|f| f.rule.context())
        .unwrap_or_default();
    let found = super::recovery::describe_found(p);
    SyntaxError::builder(code)
        .message(unexpected_message(&found, context))
        .range(p.current_range())
        .expected(expected)
        .found(p.current_kind())
        .build()
}
