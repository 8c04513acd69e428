//! Typed AST wrappers over the untyped rowan CST.
//!
//! Each struct wraps a `SyntaxNode` and provides accessors for its children.
//! Accessors return `Option` or iterators: a tree produced from erroneous
//! input may be missing any child.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

// ============================================================================
// Helper utilities
// ============================================================================

/// Check if a syntax node has a direct child token of the specified kind.
#[inline]
fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .any(|t| t.kind() == kind)
}

/// First direct child token of the specified kind.
#[inline]
fn find_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

/// Strip the quotes and unescape the simple escapes of a string literal.
fn unquote(text: &str) -> String {
    let inner = text
        .strip_prefix('"')
        .map(|s| s.strip_suffix('"').unwrap_or(s))
        .unwrap_or(text);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    /// Find all descendant nodes of a specific AST type
    fn descendants<T: AstNode>(&self) -> impl Iterator<Item = T> {
        self.syntax().descendants().filter_map(T::cast)
    }

    /// Source text of the node, trivia included
    fn text(&self) -> String {
        self.syntax().text().to_string()
    }
}

/// Trait for AST tokens that wrap a SyntaxToken
pub trait AstToken: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(token: SyntaxToken) -> Option<Self>;
    fn syntax(&self) -> &SyntaxToken;
    fn text(&self) -> &str {
        self.syntax().text()
    }
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

/// Enum over several node kinds, one variant per wrapped node type.
macro_rules! ast_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident($ty:ident) = $kind:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant($ty),)+
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$kind)|+)
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                match node.kind() {
                    $(SyntaxKind::$kind => Some($name::$variant($ty(node))),)+
                    _ => None,
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                match self {
                    $($name::$variant(it) => &it.0,)+
                }
            }
        }
    };
}

/// Macro to generate boolean property methods that check for a specific token kind.
macro_rules! has_token_method {
    ($name:ident, $kind:ident) => {
        #[doc = concat!("Check if this node has the `", stringify!($kind), "` token.")]
        pub fn $name(&self) -> bool {
            has_token(&self.0, SyntaxKind::$kind)
        }
    };
    ($name:ident, $kind:ident, $example:literal) => {
        #[doc = concat!("Check if this node has the `", stringify!($kind), "` token (e.g., `", $example, "`).")]
        pub fn $name(&self) -> bool {
            has_token(&self.0, SyntaxKind::$kind)
        }
    };
}

/// Macro to generate a method that finds the first child of a specific AST type.
macro_rules! first_child_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get the first `", stringify!($type), "` child of this node.")]
        pub fn $name(&self) -> Option<$type> {
            self.0.children().find_map($type::cast)
        }
    };
}

/// Macro to generate a method that returns an iterator over children of a specific AST type.
macro_rules! children_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get all `", stringify!($type), "` children of this node.")]
        pub fn $name(&self) -> impl Iterator<Item = $type> + '_ {
            self.0.children().filter_map($type::cast)
        }
    };
}

/// Macro to generate a method that maps token kinds to enum variants.
macro_rules! token_to_enum_method {
    ($name:ident, $enum_type:ident, [$($token:ident => $variant:ident),+ $(,)?]) => {
        pub fn $name(&self) -> Option<$enum_type> {
            for token in self.0.children_with_tokens().filter_map(|e| e.into_token()) {
                match token.kind() {
                    $(SyntaxKind::$token => return Some($enum_type::$variant),)+
                    _ => {}
                }
            }
            None
        }
    };
}

// ============================================================================
// Tokens
// ============================================================================

/// An identifier token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(SyntaxToken);

impl AstToken for Ident {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::IDENT
    }

    fn cast(token: SyntaxToken) -> Option<Self> {
        Self::can_cast(token.kind()).then_some(Self(token))
    }

    fn syntax(&self) -> &SyntaxToken {
        &self.0
    }
}

/// One `#` documentation line
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocLine(SyntaxToken);

impl AstToken for DocLine {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::DOC_LINE
    }

    fn cast(token: SyntaxToken) -> Option<Self> {
        Self::can_cast(token.kind()).then_some(Self(token))
    }

    fn syntax(&self) -> &SyntaxToken {
        &self.0
    }
}

impl DocLine {
    /// Line content without the leading `#` and one following space
    pub fn content(&self) -> &str {
        let text = self.text().strip_prefix('#').unwrap_or(self.text());
        text.strip_prefix(' ').unwrap_or(text).trim_end()
    }
}

// ============================================================================
// Names
// ============================================================================

ast_node!(Name, NAME);

impl Name {
    pub fn ident(&self) -> Option<Ident> {
        find_token(&self.0, SyntaxKind::IDENT).and_then(Ident::cast)
    }

    pub fn text(&self) -> Option<String> {
        self.ident().map(|i| i.text().to_string())
    }
}

ast_node!(NameRef, NAME_REF);

impl NameRef {
    fn idents(&self) -> Vec<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::ERROR_KW))
            .collect()
    }

    /// Module prefix of `pkg:name`
    pub fn prefix(&self) -> Option<String> {
        let idents = self.idents();
        (idents.len() == 2).then(|| idents[0].text().to_string())
    }

    /// The referenced name without its module prefix
    pub fn name(&self) -> Option<String> {
        self.idents().last().map(|t| t.text().to_string())
    }

    pub fn is_qualified(&self) -> bool {
        has_token(&self.0, SyntaxKind::COLON)
    }
}

// Submodules, declared after the macros so they are in scope
mod expressions;
mod module;
mod statements;
mod types;

pub use self::expressions::*;
pub use self::module::*;
pub use self::statements::*;
pub use self::types::*;
