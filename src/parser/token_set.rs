//! Compact sets of token kinds
//!
//! Used for guards ("can this alternative start here?"), expected sets in
//! diagnostics and synchronization sets in error recovery.

use super::syntax_kind::SyntaxKind;
use std::fmt;

const WORDS: usize = 4;

/// A bitset over token kinds (node kinds are never members)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenSet([u64; WORDS]);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet([0; WORDS]);

    pub const fn new(kinds: &[SyntaxKind]) -> TokenSet {
        let mut bits = [0u64; WORDS];
        let mut i = 0;
        while i < kinds.len() {
            let k = kinds[i] as usize;
            bits[k / 64] |= 1u64 << (k % 64);
            i += 1;
        }
        TokenSet(bits)
    }

    pub const fn single(kind: SyntaxKind) -> TokenSet {
        TokenSet::new(&[kind])
    }

    pub const fn union(self, other: TokenSet) -> TokenSet {
        let mut bits = [0u64; WORDS];
        let mut i = 0;
        while i < WORDS {
            bits[i] = self.0[i] | other.0[i];
            i += 1;
        }
        TokenSet(bits)
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let k = kind as usize;
        if k >= WORDS * 64 {
            return false;
        }
        self.0[k / 64] & (1u64 << (k % 64)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|w| *w == 0)
    }

    pub fn len(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Members in declaration order of `SyntaxKind`
    pub fn iter(&self) -> impl Iterator<Item = SyntaxKind> + '_ {
        (0..(WORDS * 64) as u16)
            .filter(move |raw| self.0[*raw as usize / 64] & (1u64 << (*raw % 64)) != 0)
            .map(|raw| SyntaxKind::from(rowan::SyntaxKind(raw)))
    }

    /// Human-readable rendering for diagnostics: `';'`, `';' or '}'`, `one of ...`
    pub fn describe(&self) -> String {
        let names: Vec<&str> = self.iter().map(describe_kind).collect();
        match names.as_slice() {
            [] => "nothing".to_string(),
            [one] => (*one).to_string(),
            [a, b] => format!("{a} or {b}"),
            many => format!("one of {}", many.join(", ")),
        }
    }
}

fn describe_kind(kind: SyntaxKind) -> &'static str {
    if kind.is_keyword() {
        keyword_text(kind)
    } else {
        kind.display_name()
    }
}

/// Source spelling of a keyword kind, quoted
pub(crate) fn keyword_text(kind: SyntaxKind) -> &'static str {
    use SyntaxKind::*;
    match kind {
        IMPORT_KW => "'import'",
        AS_KW => "'as'",
        PUBLIC_KW => "'public'",
        PRIVATE_KW => "'private'",
        EXTERN_KW => "'extern'",
        FINAL_KW => "'final'",
        CONST_KW => "'const'",
        LISTENER_KW => "'listener'",
        SERVICE_KW => "'service'",
        RESOURCE_KW => "'resource'",
        REMOTE_KW => "'remote'",
        FUNCTION_KW => "'function'",
        OBJECT_KW => "'object'",
        RECORD_KW => "'record'",
        ANNOTATION_KW => "'annotation'",
        WORKER_KW => "'worker'",
        XMLNS_KW => "'xmlns'",
        RETURNS_KW => "'returns'",
        TYPE_KW => "'type'",
        ON_KW => "'on'",
        IN_KW => "'in'",
        ELSE_KW => "'else'",
        BUT_KW => "'but'",
        SELECT_KW => "'select'",
        BY_KW => "'by'",
        WITH_KW => "'with'",
        _ => "keyword",
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
