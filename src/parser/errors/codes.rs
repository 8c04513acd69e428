//! Stable diagnostic codes
//!
//! `E` + two-digit category + two-digit number, grouped as:
//! - E01xx: Lexical errors (invalid tokens)
//! - E02xx: Delimiter errors (braces, semicolons, brackets)
//! - E03xx: Declaration errors (definitions, parameters, bodies)
//! - E04xx: Expression errors
//! - E05xx: Import/namespace errors
//! - E06xx: Type descriptor errors
//! - E07xx: Statement errors
//! - E08xx: Embedded language errors (templates, XML, queries)
//! - E09xx: Generic/fallback errors

use std::fmt;

/// Declares every code once with its category and fallback message, and
/// derives the lookup tables from that list.
macro_rules! error_codes {
    ($(
        $category:literal => {
            $($(#[$doc:meta])* $code:ident => $message:literal,)+
        }
    )+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ErrorCode {
            $($($(#[$doc])* $code,)+)+
        }

        impl ErrorCode {
            pub const ALL: &'static [ErrorCode] = &[$($(Self::$code,)+)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($(Self::$code => stringify!($code),)+)+
                }
            }

            /// Category phrase, e.g. "delimiter error"
            pub fn category_description(&self) -> &'static str {
                match self {
                    $($(Self::$code)|+ => $category,)+
                }
            }

            /// Message used when a diagnostic is built without one
            pub fn default_message(&self) -> &'static str {
                match self {
                    $($(Self::$code => $message,)+)+
                }
            }
        }
    };
}

error_codes! {
    "lexical error" => {
        /// Character no token starts with
        E0101 => "invalid character",
        E0102 => "unterminated string literal",
    }
    "delimiter error" => {
        E0201 => "missing semicolon",
        /// `}` or `|}` missing
        E0202 => "unclosed brace",
        E0203 => "unclosed parenthesis",
        E0204 => "unclosed bracket",
        E0205 => "unexpected closing delimiter",
        /// `>` missing after type parameters
        E0206 => "unclosed type parameter list",
    }
    "declaration error" => {
        E0301 => "missing identifier",
        /// Token that starts no import, definition or annotation
        E0302 => "expected a definition",
        /// Stray token inside an object, record or service body
        E0304 => "unexpected token in body",
        E0305 => "invalid parameter",
        /// Neither `;` nor `{` after a signature
        E0307 => "missing body",
    }
    "expression error" => {
        E0402 => "missing operand",
        E0405 => "invalid argument",
        E0406 => "expected expression",
    }
    "import error" => {
        E0501 => "invalid import path",
        E0502 => "missing package name",
        E0503 => "invalid alias",
    }
    "type error" => {
        E0601 => "expected type",
        E0602 => "invalid array dimension",
    }
    "statement error" => {
        E0701 => "expected statement",
        E0702 => "invalid match pattern",
    }
    "embedded language error" => {
        E0801 => "unterminated string template",
        E0802 => "unterminated XML literal",
        /// Query clauses out of order or incomplete
        E0803 => "invalid query clause",
    }
    "syntax error" => {
        /// Token the current context cannot use
        E0901 => "unexpected token",
        E0902 => "expected token",
        /// Rule nesting deeper than `ParseOptions::max_nesting`
        E0903 => "nesting limit exceeded",
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::E0201.as_str(), "E0201");
        assert_eq!(ErrorCode::E0901.as_str(), "E0901");
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::E0406), "E0406");
    }

    #[test]
    fn test_error_code_default_message() {
        assert_eq!(ErrorCode::E0201.default_message(), "missing semicolon");
        assert_eq!(ErrorCode::E0601.default_message(), "expected type");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::E0202.category_description(), "delimiter error");
        assert_eq!(ErrorCode::E0701.category_description(), "statement error");
        assert_eq!(ErrorCode::E0802.category_description(), "embedded language error");
    }
}
