//! Whole programs through the public entry points

use crate::helpers::diagnostic_helpers::assert_no_errors;
use crate::helpers::source_fixtures::{
    CONCURRENCY, HELLO_SERVICE, ORDER_PROCESSING, SHIFTS_AND_GENERICS,
};
use crate::helpers::tree_render::{body_statement_kinds, count_kind};
use balsyn::SyntaxKind;
use balsyn::parser::ast::{AstNode, Item, Stmt};

fn names(items: impl Iterator<Item = Item>) -> Vec<String> {
    items
        .filter_map(|item| item.name().and_then(|n| n.text()))
        .collect()
}

#[test]
fn test_programs_are_lossless() {
    for source in [HELLO_SERVICE, ORDER_PROCESSING, CONCURRENCY, SHIFTS_AND_GENERICS] {
        let parse = balsyn::parse(source);
        assert_eq!(parse.syntax().text().to_string(), source);
    }
}

#[test]
fn test_hello_service() {
    let parse = assert_no_errors(HELLO_SERVICE);
    let unit = parse.tree().unwrap();
    assert_eq!(unit.imports().count(), 2);

    let items: Vec<_> = unit.items().collect();
    assert_eq!(items.len(), 4);
    let Item::GlobalVar(listener) = &items[2] else {
        panic!("expected listener declaration");
    };
    assert!(listener.is_listener());

    let Item::Service(service) = &items[3] else {
        panic!("expected service");
    };
    assert!(service.documentation().is_some());
    let resources = service.resources();
    assert_eq!(resources.len(), 1);
    assert!(resources[0].is_resource());
    let params = resources[0].param_list().unwrap().params().count();
    assert_eq!(params, 3);

    let root = parse.syntax();
    assert_eq!(count_kind(&root, SyntaxKind::STRING_TEMPLATE), 1);
    assert_eq!(count_kind(&root, SyntaxKind::ACTION_INVOCATION), 1);
}

#[test]
fn test_order_processing() {
    let parse = assert_no_errors(ORDER_PROCESSING);
    let unit = parse.tree().unwrap();
    assert_eq!(
        names(unit.items()),
        vec!["Item", "Purchase", "TAX_RATE", "Counter", "total", "describe", "main"]
    );

    let root = parse.syntax();
    assert_eq!(count_kind(&root, SyntaxKind::RECORD_TYPE), 2);
    assert_eq!(count_kind(&root, SyntaxKind::OBJECT_TYPE), 1);
    assert_eq!(count_kind(&root, SyntaxKind::MATCH_CLAUSE), 3);
    assert_eq!(count_kind(&root, SyntaxKind::TERNARY_EXPR), 2);
    assert_eq!(count_kind(&root, SyntaxKind::ELVIS_EXPR), 1);
    assert_eq!(count_kind(&root, SyntaxKind::TYPE_CONVERSION_EXPR), 1);
    assert_eq!(count_kind(&root, SyntaxKind::COMPOUND_ASSIGN_STMT), 3);
}

#[test]
fn test_main_body_statements() {
    let parse = assert_no_errors(ORDER_PROCESSING);
    let main = parse
        .tree()
        .unwrap()
        .functions()
        .find(|f| f.name().and_then(|n| n.text()).as_deref() == Some("main"))
        .unwrap();
    let kinds = body_statement_kinds(main.syntax());
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::VAR_DEF_STMT,
            SyntaxKind::VAR_DEF_STMT,
            SyntaxKind::EXPR_STMT,
            SyntaxKind::EXPR_STMT,
            SyntaxKind::VAR_DEF_STMT,
            SyntaxKind::VAR_DEF_STMT,
            SyntaxKind::WHILE_STMT,
        ]
    );
}

#[test]
fn test_concurrency_and_embedded_languages() {
    let parse = assert_no_errors(CONCURRENCY);
    let main = parse.tree().unwrap().functions().nth(1).unwrap();
    let statements: Vec<_> = main.body().unwrap().statements().collect();
    assert!(matches!(statements[0], Stmt::VarDef(_)));
    assert!(matches!(statements[2], Stmt::Worker(_)));
    assert!(matches!(statements[4], Stmt::Fork(_)));
    assert!(matches!(statements[5], Stmt::Transaction(_)));

    let root = parse.syntax();
    for kind in [
        SyntaxKind::START_EXPR,
        SyntaxKind::WAIT_EXPR,
        SyntaxKind::WORKER_SEND_STMT,
        SyntaxKind::WORKER_RECEIVE_EXPR,
        SyntaxKind::TABLE_LITERAL,
        SyntaxKind::TABLE_QUERY,
        SyntaxKind::XML_LITERAL,
        SyntaxKind::ARROW_FUNCTION,
    ] {
        assert_eq!(count_kind(&root, kind), 1, "{kind:?}");
    }
}

#[test]
fn test_nested_generics_and_shifts() {
    let parse = assert_no_errors(SHIFTS_AND_GENERICS);
    let root = parse.syntax();
    let count_tokens = |kind: SyntaxKind| {
        root.descendants_with_tokens()
            .filter(|e| e.kind() == kind)
            .count()
    };
    assert_eq!(count_tokens(SyntaxKind::SHL), 1);
    assert_eq!(count_tokens(SyntaxKind::SHR), 1);
    assert_eq!(count_tokens(SyntaxKind::USHR), 1);
    // four closing chevrons in the map types and one comparison
    assert_eq!(count_tokens(SyntaxKind::GT), 5);
    assert_eq!(count_kind(&root, SyntaxKind::PARAMETERIZED_TYPE), 4);
}
