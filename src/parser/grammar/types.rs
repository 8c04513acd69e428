//! Type descriptors
//!
//! ```text
//! Type    = Type '[' dim? ']'+        ARRAY_TYPE     bp 7
//!         | Type ('|' Type)+          UNION_TYPE     bp 6 (one flat node)
//!         | Type '?'                  OPTIONAL_TYPE  bp 5
//!         | Primary
//! Primary = builtin | builtin '<' Type (',' Type)* '>' | name_ref | literal
//!         | '(' ')' | '(' Type ')' | '(' Type (',' Type)+ ')'
//!         | function-type | object-type | record-type
//! ```
//!
//! Type parameter lists close on single `>` tokens. Chevrons are never merged
//! by the lexer, so `map<map<int>>` needs no special casing here.

use super::module;
use super::{delimited, expression, name, name_ref};
use crate::parser::errors::ErrorCode;
use crate::parser::lookahead::{self, Alternative, Guard};
use crate::parser::parser::{Checkpoint, Parser};
use crate::parser::precedence::{Climbing, Fixity, OperatorDescriptor, climb, fold, operand};
use crate::parser::predicates;
use crate::parser::recovery;
use crate::parser::rules::{self, Rule, parse_rule};
use crate::parser::syntax_kind::SyntaxKind;
use crate::parser::token_set::TokenSet;

/// Builtin type keywords without parameters
const SIMPLE_BUILTINS: TokenSet = TokenSet::new(&[
    SyntaxKind::INT_KW,
    SyntaxKind::BYTE_KW,
    SyntaxKind::FLOAT_KW,
    SyntaxKind::DECIMAL_KW,
    SyntaxKind::BOOLEAN_KW,
    SyntaxKind::STRING_KW,
    SyntaxKind::JSON_KW,
    SyntaxKind::XML_KW,
    SyntaxKind::ANY_KW,
    SyntaxKind::ANYDATA_KW,
]);

/// Builtin type keywords that may take `<...>` parameters
const PARAMETERIZED_BUILTINS: TokenSet = TokenSet::new(&[
    SyntaxKind::MAP_KW,
    SyntaxKind::FUTURE_KW,
    SyntaxKind::STREAM_KW,
    SyntaxKind::TABLE_KW,
    SyntaxKind::TYPEDESC_KW,
    SyntaxKind::ERROR_KW,
]);

const LITERAL_TYPES: TokenSet = TokenSet::new(&[
    SyntaxKind::INTEGER_LITERAL,
    SyntaxKind::FLOAT_LITERAL,
    SyntaxKind::STRING_LITERAL,
    SyntaxKind::TRUE_KW,
    SyntaxKind::FALSE_KW,
]);

const OBJECT_START: TokenSet = TokenSet::new(&[
    SyntaxKind::OBJECT_KW,
    SyntaxKind::ABSTRACT_KW,
    SyntaxKind::CLIENT_KW,
]);

/// Tokens that can start a type descriptor
pub(crate) const TYPE_START: TokenSet = SIMPLE_BUILTINS
    .union(PARAMETERIZED_BUILTINS)
    .union(LITERAL_TYPES)
    .union(OBJECT_START)
    .union(TokenSet::new(&[
        SyntaxKind::IDENT,
        SyntaxKind::L_PAREN,
        SyntaxKind::FUNCTION_KW,
        SyntaxKind::RECORD_KW,
    ]));

const DIMENSION_CONTENT: TokenSet = TokenSet::new(&[
    SyntaxKind::INTEGER_LITERAL,
    SyntaxKind::BANG,
    SyntaxKind::R_BRACKET,
]);

const RECORD_CLOSE: TokenSet = TokenSet::new(&[SyntaxKind::R_BRACE, SyntaxKind::PIPE_R_BRACE]);

const RECORD_MEMBER_START: TokenSet =
    TokenSet::new(&[SyntaxKind::STAR, SyntaxKind::AT, SyntaxKind::BANG]).union(TYPE_START);

pub struct TypeClimbing;

impl Climbing for TypeClimbing {
    const NAME: &'static str = "type";
    const RULE: Rule = Rule::TypeDescriptor;
    const FIRST: TokenSet = TYPE_START;
    const OPERATORS: &'static [OperatorDescriptor] = &[
        OperatorDescriptor::new(SyntaxKind::L_BRACKET, 7, Fixity::Postfix, SyntaxKind::ARRAY_TYPE),
        OperatorDescriptor::new(SyntaxKind::PIPE, 6, Fixity::BinaryLeft, SyntaxKind::UNION_TYPE),
        OperatorDescriptor::new(
            SyntaxKind::QUESTION,
            5,
            Fixity::Postfix,
            SyntaxKind::OPTIONAL_TYPE,
        ),
    ];

    fn primary(p: &mut Parser<'_>) -> bool {
        match p.current_kind() {
            kind if PARAMETERIZED_BUILTINS.contains(kind) && p.nth(1) == SyntaxKind::LT => {
                parameterized_type(p)
            }
            kind if SIMPLE_BUILTINS.contains(kind) || PARAMETERIZED_BUILTINS.contains(kind) => {
                p.start_node(SyntaxKind::BUILTIN_TYPE);
                p.bump();
                p.finish_node();
            }
            kind if LITERAL_TYPES.contains(kind) => {
                p.start_node(SyntaxKind::LITERAL_TYPE);
                p.bump();
                p.finish_node();
            }
            SyntaxKind::IDENT => type_reference(p),
            SyntaxKind::L_PAREN => {
                lookahead::dispatch(p, PAREN_TYPES);
            }
            SyntaxKind::FUNCTION_KW => function_type(p),
            SyntaxKind::RECORD_KW => {
                parse_rule(p, Rule::RecordBody);
            }
            kind if OBJECT_START.contains(kind) => {
                parse_rule(p, Rule::ObjectBody);
            }
            _ => return false,
        }
        true
    }

    fn apply(p: &mut Parser<'_>, lhs: Checkpoint, op: &OperatorDescriptor) {
        match op.node {
            // int[][3]: one node, one dimension child per bracket pair
            SyntaxKind::ARRAY_TYPE => {
                while p.at(SyntaxKind::L_BRACKET) {
                    array_dimension(p);
                }
                p.wrap(lhs, SyntaxKind::ARRAY_TYPE);
            }
            // int|string|(): members are siblings
            SyntaxKind::UNION_TYPE => {
                while p.eat(SyntaxKind::PIPE) {
                    operand::<Self>(p, op.bp);
                }
                p.wrap(lhs, SyntaxKind::UNION_TYPE);
            }
            _ => fold::<Self>(p, lhs, op),
        }
    }
}

pub(crate) fn type_descriptor(p: &mut Parser<'_>) {
    let min_bp = p.frame_min_bp();
    if !climb::<TypeClimbing>(p, min_bp) {
        recovery::recover_unexpected(p, TYPE_START, ErrorCode::E0601);
    }
}

/// `TYPE_REF`: a (possibly qualified) user-defined type name
pub(crate) fn type_reference(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::TYPE_REF);
    name_ref(p);
    p.finish_node();
}

fn parameterized_type(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::PARAMETERIZED_TYPE);
    p.bump(); // map, future, stream, table, typedesc, error
    p.start_node(SyntaxKind::TYPE_PARAMS);
    p.bump(); // <
    delimited(p, SyntaxKind::GT, |p| {
        parse_rule(p, Rule::TypeDescriptor);
    });
    p.expect(SyntaxKind::GT);
    p.finish_node();
    p.finish_node();
}

fn array_dimension(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::ARRAY_DIMENSION);
    p.bump(); // [
    if predicates::sealed_marker(p) {
        sealed_marker(p);
    } else if !p.eat(SyntaxKind::INTEGER_LITERAL) && !p.at(SyntaxKind::R_BRACKET) {
        let error = rules::unexpected_here(p, ErrorCode::E0602, DIMENSION_CONTENT);
        recovery::report(p, error);
        let stop = p.sync_set().union(TokenSet::single(SyntaxKind::R_BRACKET));
        recovery::skip_until(p, stop);
    }
    p.expect(SyntaxKind::R_BRACKET);
    p.finish_node();
}

fn sealed_marker(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::SEALED_MARKER);
    p.bump(); // !
    p.bump(); // ...
    p.finish_node();
}

static PAREN_TYPES: &[Alternative] = &[
    Alternative::new(
        "nil type",
        Guard::Sequence(&[SyntaxKind::L_PAREN, SyntaxKind::R_PAREN]),
        nil_type,
    ),
    Alternative::new(
        "parenthesized type",
        Guard::Set(TokenSet::single(SyntaxKind::L_PAREN)),
        group_type,
    ),
    Alternative::new(
        "tuple type",
        Guard::Set(TokenSet::single(SyntaxKind::L_PAREN)),
        tuple_type,
    ),
];

fn nil_type(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::NIL_TYPE);
    p.expect(SyntaxKind::L_PAREN);
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

fn group_type(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::GROUP_TYPE);
    p.expect(SyntaxKind::L_PAREN);
    parse_rule(p, Rule::TypeDescriptor);
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

fn tuple_type(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::TUPLE_TYPE);
    p.expect(SyntaxKind::L_PAREN);
    parse_rule(p, Rule::TypeDescriptor);
    p.expect(SyntaxKind::COMMA);
    delimited(p, SyntaxKind::R_PAREN, |p| {
        parse_rule(p, Rule::TypeDescriptor);
    });
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

/// `function (T, U name, V...) returns R`; parameter names are optional
fn function_type(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::FUNCTION_TYPE);
    p.bump(); // function
    p.start_node(SyntaxKind::PARAM_LIST);
    p.expect(SyntaxKind::L_PAREN);
    delimited(p, SyntaxKind::R_PAREN, |p| {
        let cp = p.checkpoint();
        parse_rule(p, Rule::TypeDescriptor);
        let kind = if p.eat(SyntaxKind::ELLIPSIS) {
            SyntaxKind::REST_PARAM
        } else {
            SyntaxKind::PARAM
        };
        if p.at(SyntaxKind::IDENT) {
            name(p);
        }
        p.wrap(cp, kind);
    });
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
    if p.at(SyntaxKind::RETURNS_KW) {
        module::return_type(p);
    }
    p.finish_node();
}

/// `record { fields }` or the closed form `record {| fields |}`
pub(crate) fn record_body(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::RECORD_TYPE);
    p.expect(SyntaxKind::RECORD_KW);
    let close = if p.eat(SyntaxKind::L_BRACE_PIPE) {
        SyntaxKind::PIPE_R_BRACE
    } else {
        p.expect(SyntaxKind::L_BRACE);
        SyntaxKind::R_BRACE
    };
    while !p.at_set(RECORD_CLOSE) && !p.at_eof() {
        let before = p.bumped();
        record_member(p);
        recovery::ensure_progress(p, before);
    }
    p.expect(close);
    p.finish_node();
}

const FIELD_FOLLOW: TokenSet = TokenSet::new(&[
    SyntaxKind::QUESTION,
    SyntaxKind::EQ,
    SyntaxKind::SEMICOLON,
]);

fn record_member(p: &mut Parser<'_>) {
    if p.at(SyntaxKind::STAR) {
        type_inclusion(p);
        return;
    }
    if predicates::sealed_marker(p) {
        sealed_marker(p);
        p.expect(SyntaxKind::SEMICOLON);
        return;
    }
    if !p.at_set(RECORD_MEMBER_START) {
        recovery::recover_unexpected(p, RECORD_MEMBER_START, ErrorCode::E0304);
        return;
    }

    let cp = p.checkpoint();
    while p.at(SyntaxKind::AT) {
        parse_rule(p, Rule::AnnotationAttachment);
    }
    parse_rule(p, Rule::TypeDescriptor);
    // string...; opens the record to further fields of that type
    if predicates::rest_descriptor(p) {
        p.bump();
        p.expect(SyntaxKind::SEMICOLON);
        p.wrap(cp, SyntaxKind::REST_DESCRIPTOR);
        return;
    }
    name(p);
    recovery::delete_stray(p, FIELD_FOLLOW, ErrorCode::E0901);
    p.eat(SyntaxKind::QUESTION);
    if p.eat(SyntaxKind::EQ) {
        expression(p);
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.wrap(cp, SyntaxKind::FIELD_DEF);
}

/// `*Person;` copies the fields of another type
pub(crate) fn type_inclusion(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::TYPE_INCLUSION);
    p.expect(SyntaxKind::STAR);
    type_reference(p);
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// `abstract client object { members }`
pub(crate) fn object_body(p: &mut Parser<'_>) {
    p.start_node(SyntaxKind::OBJECT_TYPE);
    while p.eat_set(TokenSet::new(&[SyntaxKind::ABSTRACT_KW, SyntaxKind::CLIENT_KW])) {}
    p.expect(SyntaxKind::OBJECT_KW);
    p.expect(SyntaxKind::L_BRACE);
    module::members(p, SyntaxKind::R_BRACE);
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();
}

#[cfg(test)]
mod tests {
    use crate::parser::rule_parser::parse_rule;
    use crate::parser::rules::Rule;
    use crate::parser::{SyntaxKind, SyntaxNode};

    fn type_node(source: &str) -> SyntaxNode {
        let result = parse_rule(Rule::TypeDescriptor, source);
        assert!(result.is_ok(), "{source}: {:?}", result.errors());
        let root = result.syntax();
        root.first_child().unwrap_or(root)
    }

    fn child_kinds(node: &SyntaxNode) -> Vec<SyntaxKind> {
        node.children().map(|n| n.kind()).collect()
    }

    #[test]
    fn test_union_is_flat() {
        let union = type_node("int|string|()");
        assert_eq!(union.kind(), SyntaxKind::UNION_TYPE);
        assert_eq!(
            child_kinds(&union),
            vec![SyntaxKind::BUILTIN_TYPE, SyntaxKind::BUILTIN_TYPE, SyntaxKind::NIL_TYPE]
        );
    }

    #[test]
    fn test_array_binds_tighter_than_union() {
        let union = type_node("int|string[]");
        assert_eq!(union.kind(), SyntaxKind::UNION_TYPE);
        assert_eq!(
            child_kinds(&union),
            vec![SyntaxKind::BUILTIN_TYPE, SyntaxKind::ARRAY_TYPE]
        );
    }

    #[test]
    fn test_optional_applies_to_union() {
        let optional = type_node("int|string?");
        assert_eq!(optional.kind(), SyntaxKind::OPTIONAL_TYPE);
        assert_eq!(child_kinds(&optional), vec![SyntaxKind::UNION_TYPE]);
    }

    #[test]
    fn test_multi_dimensional_array_is_one_node() {
        let array = type_node("int[][3]");
        assert_eq!(array.kind(), SyntaxKind::ARRAY_TYPE);
        assert_eq!(
            child_kinds(&array),
            vec![
                SyntaxKind::BUILTIN_TYPE,
                SyntaxKind::ARRAY_DIMENSION,
                SyntaxKind::ARRAY_DIMENSION
            ]
        );
    }

    #[test]
    fn test_nested_type_parameters_close_on_single_chevrons() {
        let map = type_node("map<map<int>>");
        assert_eq!(map.kind(), SyntaxKind::PARAMETERIZED_TYPE);
        assert!(!map.to_string().is_empty());
    }

    #[test]
    fn test_parenthesized_forms() {
        assert_eq!(type_node("()").kind(), SyntaxKind::NIL_TYPE);
        assert_eq!(type_node("(int)").kind(), SyntaxKind::GROUP_TYPE);
        assert_eq!(type_node("(int, string)").kind(), SyntaxKind::TUPLE_TYPE);
    }

    #[test]
    fn test_sealed_array_dimension() {
        let array = type_node("int[!...]");
        assert!(
            array
                .descendants()
                .any(|n| n.kind() == SyntaxKind::SEALED_MARKER)
        );
    }

    #[test]
    fn test_record_rest_descriptor_and_sealing() {
        let open = type_node("record { string name; int...; }");
        assert!(
            open.descendants()
                .any(|n| n.kind() == SyntaxKind::REST_DESCRIPTOR)
        );
        let sealed = type_node("record { string name; !...; }");
        assert!(
            sealed
                .children()
                .any(|n| n.kind() == SyntaxKind::SEALED_MARKER)
        );
        let closed = type_node("record {| string name; |}");
        assert_eq!(closed.kind(), SyntaxKind::RECORD_TYPE);
    }

    #[test]
    fn test_spaced_ellipsis_is_not_a_rest_descriptor() {
        let result = parse_rule(Rule::TypeDescriptor, "record { int ...; }");
        assert!(!result.is_ok());
    }

    #[test]
    fn test_object_type() {
        let object = type_node(
            "abstract client object { public string name; function greet() returns string; }",
        );
        assert_eq!(object.kind(), SyntaxKind::OBJECT_TYPE);
        assert_eq!(
            child_kinds(&object),
            vec![SyntaxKind::FIELD_DEF, SyntaxKind::FUNCTION_DEF]
        );
    }
}
