//! Diagnostic assertion helpers.

use balsyn::{ErrorCode, Parse, SyntaxError};

pub fn error_codes(parse: &Parse) -> Vec<ErrorCode> {
    parse.errors.iter().map(|e| e.code).collect()
}

/// Assert a parse produced no diagnostics.
pub fn assert_no_errors(source: &str) -> Parse {
    let parse = balsyn::parse(source);
    assert!(
        parse.ok(),
        "Expected no errors, got {} error(s):\n{}",
        parse.errors.len(),
        render(source, &parse.errors)
    );
    parse
}

/// One line per diagnostic: `line:col CODE: message`
pub fn render(source: &str, errors: &[SyntaxError]) -> String {
    let index = balsyn::LineIndex::new(source);
    errors
        .iter()
        .map(|e| format!("  {} {}", index.position(e.range.start()), e.format()))
        .collect::<Vec<_>>()
        .join("\n")
}
