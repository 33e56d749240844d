//! The declarative grammar data model.
//!
//! A [`Grammar`] is data, not code: named rules over tokens and rule
//! references, a declared conflict set, the external-token list, the binary
//! operator table, and the alias table. [`build`](crate::build) validates
//! the whole thing and distills it into the immutable
//! [`ParseTables`](crate::ParseTables) the parser consults.
//!
//! Alternatives carrying an explicit [`Prec`] are statically ordered against
//! their siblings; alternatives without one that can start with the same
//! token must be covered by a declared conflict, which is what authorizes
//! the parser to explore them in parallel.

use crate::alias::AliasPair;
use crate::conflict::ConflictGroup;
use crate::prec::BinaryOperator;
use cxx_ir::{ExternalToken, TokenKind};

/// One position in an alternative.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Symbol {
    /// Reference to a named rule.
    Rule(&'static str),
    /// A concrete token.
    Token(TokenKind),
    /// A token produced by an external recognizer.
    External(ExternalToken),
}

/// Operator associativity.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Assoc {
    Left,
    Right,
}

/// Precedence annotation on an alternative or operator.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Prec {
    pub level: i16,
    pub assoc: Option<Assoc>,
    /// Dynamic weight consulted only when static precedence ties during
    /// candidate scoring.
    pub dynamic: i16,
}

impl Prec {
    pub const fn level(level: i16) -> Self {
        Prec {
            level,
            assoc: None,
            dynamic: 0,
        }
    }

    pub const fn left(level: i16) -> Self {
        Prec {
            level,
            assoc: Some(Assoc::Left),
            dynamic: 0,
        }
    }

    pub const fn right(level: i16) -> Self {
        Prec {
            level,
            assoc: Some(Assoc::Right),
            dynamic: 0,
        }
    }

    #[must_use]
    pub const fn with_dynamic(mut self, dynamic: i16) -> Self {
        self.dynamic = dynamic;
        self
    }
}

/// One alternative of a rule: a symbol sequence plus optional precedence.
///
/// An empty symbol sequence makes the alternative (and possibly the rule)
/// nullable.
#[derive(Clone, Debug)]
pub struct Alt {
    pub symbols: Vec<Symbol>,
    pub prec: Option<Prec>,
}

impl Alt {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Alt {
            symbols,
            prec: None,
        }
    }

    #[must_use]
    pub fn with_prec(mut self, prec: Prec) -> Self {
        self.prec = Some(prec);
        self
    }
}

/// A named rule with one or more alternatives.
#[derive(Clone, Debug)]
pub struct Rule {
    pub name: &'static str,
    pub alts: Vec<Alt>,
}

impl Rule {
    pub fn new(name: &'static str, alts: Vec<Alt>) -> Self {
        Rule { name, alts }
    }
}

/// A complete declared grammar, ready for [`build`](crate::build).
#[derive(Clone, Debug)]
pub struct Grammar {
    pub name: &'static str,
    pub start: &'static str,
    pub rules: Vec<Rule>,
    pub conflicts: Vec<ConflictGroup>,
    pub externals: Vec<ExternalToken>,
    pub binary_operators: Vec<BinaryOperator>,
    pub aliases: Vec<AliasPair>,
    /// Upper bound on simultaneously live candidates during conflict
    /// resolution; exceeding it is an internal defect, not an input error.
    pub ambiguity_bound: usize,
}

/// Shorthand for [`Symbol::Rule`].
#[inline]
pub(crate) fn r(name: &'static str) -> Symbol {
    Symbol::Rule(name)
}

/// Shorthand for [`Symbol::Token`].
#[inline]
pub(crate) fn t(kind: TokenKind) -> Symbol {
    Symbol::Token(kind)
}
