//! Constant token bitsets for recovery synchronization.

use cxx_ir::TokenKind;

/// A set of token kinds over two 128-bit words, indexed by discriminant.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub(crate) struct TokenSet {
    lo: u128,
    hi: u128,
}

impl TokenSet {
    pub(crate) const EMPTY: TokenSet = TokenSet { lo: 0, hi: 0 };

    pub(crate) const fn new(kinds: &[TokenKind]) -> Self {
        let mut set = TokenSet::EMPTY;
        let mut i = 0;
        while i < kinds.len() {
            set = set.with(kinds[i]);
            i += 1;
        }
        set
    }

    pub(crate) const fn with(self, kind: TokenKind) -> Self {
        let index = kind.discriminant_index();
        if index < 128 {
            TokenSet {
                lo: self.lo | (1 << index),
                hi: self.hi,
            }
        } else {
            TokenSet {
                lo: self.lo,
                hi: self.hi | (1 << (index - 128)),
            }
        }
    }

    pub(crate) const fn union(self, other: TokenSet) -> Self {
        TokenSet {
            lo: self.lo | other.lo,
            hi: self.hi | other.hi,
        }
    }

    pub(crate) const fn contains(self, kind: TokenKind) -> bool {
        let index = kind.discriminant_index();
        if index < 128 {
            self.lo & (1 << index) != 0
        } else {
            self.hi & (1 << (index - 128)) != 0
        }
    }
}

/// Tokens a statement-level recovery can stop at.
pub(crate) const STMT_SYNC: TokenSet = TokenSet::new(&[
    TokenKind::Semicolon,
    TokenKind::LBrace,
    TokenKind::RBrace,
    TokenKind::If,
    TokenKind::While,
    TokenKind::Do,
    TokenKind::For,
    TokenKind::Switch,
    TokenKind::Return,
    TokenKind::Break,
    TokenKind::Continue,
    TokenKind::Goto,
    TokenKind::Try,
    TokenKind::Eof,
]);

/// Tokens a declaration-level recovery can stop at.
pub(crate) const DECL_SYNC: TokenSet = TokenSet::new(&[
    TokenKind::Semicolon,
    TokenKind::RBrace,
    TokenKind::Namespace,
    TokenKind::Template,
    TokenKind::Using,
    TokenKind::Typedef,
    TokenKind::Struct,
    TokenKind::Class,
    TokenKind::Union,
    TokenKind::Enum,
    TokenKind::Eof,
]);

/// Tokens that end a parenthesized or bracketed piece.
pub(crate) const GROUP_SYNC: TokenSet = TokenSet::new(&[
    TokenKind::RParen,
    TokenKind::RBracket,
    TokenKind::RBrace,
    TokenKind::Comma,
    TokenKind::Semicolon,
    TokenKind::Eof,
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_across_both_words() {
        // Identifier sits in the low word, Eof near the top of the enum.
        assert!(STMT_SYNC.contains(TokenKind::Eof));
        assert!(STMT_SYNC.contains(TokenKind::Semicolon));
        assert!(!STMT_SYNC.contains(TokenKind::Identifier));
    }

    #[test]
    fn union_merges() {
        let merged = STMT_SYNC.union(TokenSet::new(&[TokenKind::Identifier]));
        assert!(merged.contains(TokenKind::Identifier));
        assert!(merged.contains(TokenKind::Return));
    }
}
