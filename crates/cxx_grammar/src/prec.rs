//! Precedence calibration for C++ expressions.
//!
//! Levels are relative, not ISO-table absolutes; only the ordering matters.
//! The deliberate outliers: `<=>` binds one step tighter than the relational
//! operators so `a < b <=> c` parses as `a < (b <=> c)`, placement `new`
//! binds tighter than call so `new T(x)` is one expression, lambdas sit at
//! the top so a trailing lambda body never captures a following operator,
//! and structured bindings sit below assignment so `auto [a, b] = e` never
//! reads as a subscript.

use crate::rule::Assoc;
use cxx_ir::TokenKind;

pub const PAREN_DECLARATOR: i16 = -10;
pub const ASSIGNMENT: i16 = -2;
pub const CONDITIONAL: i16 = -1;
pub const STRUCTURED_BINDING: i16 = -1;
pub const DEFAULT: i16 = 0;
pub const LOGICAL_OR: i16 = 1;
pub const LOGICAL_AND: i16 = 2;
pub const INCLUSIVE_OR: i16 = 3;
pub const EXCLUSIVE_OR: i16 = 4;
pub const BITWISE_AND: i16 = 5;
pub const EQUAL: i16 = 6;
pub const RELATIONAL: i16 = 7;
pub const THREE_WAY: i16 = RELATIONAL + 1;
pub const SHIFT: i16 = 9;
pub const ADD: i16 = 10;
pub const MULTIPLY: i16 = 11;
pub const POINTER_TO_MEMBER: i16 = 12;
pub const CAST: i16 = 13;
pub const SIZEOF: i16 = 14;
pub const UNARY: i16 = 15;
pub const CALL: i16 = 16;
pub const NEW: i16 = CALL + 1;
pub const FIELD: i16 = 18;
pub const SUBSCRIPT: i16 = 19;
pub const LAMBDA: i16 = 20;

/// One entry in the binary operator table.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct BinaryOperator {
    pub token: TokenKind,
    pub level: i16,
    pub assoc: Assoc,
    /// Dynamic weight for candidate scoring when static precedence ties.
    pub dynamic: i16,
}

impl BinaryOperator {
    pub const fn left(token: TokenKind, level: i16) -> Self {
        BinaryOperator {
            token,
            level,
            assoc: Assoc::Left,
            dynamic: 0,
        }
    }

    pub const fn right(token: TokenKind, level: i16) -> Self {
        BinaryOperator {
            token,
            level,
            assoc: Assoc::Right,
            dynamic: 0,
        }
    }
}

/// The full binary operator table, alternative spellings included.
///
/// Assignment operators are right-associative; everything else here is
/// left-associative.
pub fn cpp_binary_operators() -> Vec<BinaryOperator> {
    use TokenKind as T;
    vec![
        BinaryOperator::left(T::PipePipe, LOGICAL_OR),
        BinaryOperator::left(T::Or, LOGICAL_OR),
        BinaryOperator::left(T::AmpAmp, LOGICAL_AND),
        BinaryOperator::left(T::And, LOGICAL_AND),
        BinaryOperator::left(T::Pipe, INCLUSIVE_OR),
        BinaryOperator::left(T::Bitor, INCLUSIVE_OR),
        BinaryOperator::left(T::Caret, EXCLUSIVE_OR),
        BinaryOperator::left(T::Xor, EXCLUSIVE_OR),
        BinaryOperator::left(T::Amp, BITWISE_AND),
        BinaryOperator::left(T::Bitand, BITWISE_AND),
        BinaryOperator::left(T::EqEq, EQUAL),
        BinaryOperator::left(T::BangEq, EQUAL),
        BinaryOperator::left(T::NotEq, EQUAL),
        BinaryOperator::left(T::Lt, RELATIONAL),
        BinaryOperator::left(T::Gt, RELATIONAL),
        BinaryOperator::left(T::LtEq, RELATIONAL),
        BinaryOperator::left(T::GtEq, RELATIONAL),
        BinaryOperator::left(T::Spaceship, THREE_WAY),
        BinaryOperator::left(T::Shl, SHIFT),
        BinaryOperator::left(T::Shr, SHIFT),
        BinaryOperator::left(T::Plus, ADD),
        BinaryOperator::left(T::Minus, ADD),
        BinaryOperator::left(T::Star, MULTIPLY),
        BinaryOperator::left(T::Slash, MULTIPLY),
        BinaryOperator::left(T::Percent, MULTIPLY),
        BinaryOperator::left(T::DotStar, POINTER_TO_MEMBER),
        BinaryOperator::left(T::ArrowStar, POINTER_TO_MEMBER),
    ]
}

/// Operators admissible in fold expressions, assignment forms and the comma
/// included.
pub const FOLD_OPERATORS: &[TokenKind] = &[
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Star,
    TokenKind::Slash,
    TokenKind::Percent,
    TokenKind::Caret,
    TokenKind::Amp,
    TokenKind::Pipe,
    TokenKind::Assign,
    TokenKind::Lt,
    TokenKind::Gt,
    TokenKind::Shl,
    TokenKind::Shr,
    TokenKind::PlusAssign,
    TokenKind::MinusAssign,
    TokenKind::StarAssign,
    TokenKind::SlashAssign,
    TokenKind::PercentAssign,
    TokenKind::CaretAssign,
    TokenKind::AmpAssign,
    TokenKind::PipeAssign,
    TokenKind::ShrAssign,
    TokenKind::ShlAssign,
    TokenKind::EqEq,
    TokenKind::BangEq,
    TokenKind::LtEq,
    TokenKind::GtEq,
    TokenKind::AmpAmp,
    TokenKind::PipePipe,
    TokenKind::Comma,
    TokenKind::DotStar,
    TokenKind::ArrowStar,
    TokenKind::And,
    TokenKind::Or,
    TokenKind::Bitand,
    TokenKind::Bitor,
    TokenKind::Xor,
    TokenKind::NotEq,
];

/// Whether `token` may be the operator of a fold expression.
pub fn is_fold_operator(token: TokenKind) -> bool {
    FOLD_OPERATORS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_way_binds_tighter_than_relational() {
        assert!(THREE_WAY > RELATIONAL);
    }

    #[test]
    fn new_binds_tighter_than_call() {
        assert!(NEW > CALL);
    }

    #[test]
    fn lambda_outranks_every_operator() {
        for op in cpp_binary_operators() {
            assert!(LAMBDA > op.level, "{:?}", op.token);
        }
    }

    #[test]
    fn structured_binding_sits_below_default() {
        assert!(STRUCTURED_BINDING < DEFAULT);
    }

    #[test]
    fn fold_operators_include_compound_assignment_and_comma() {
        assert!(is_fold_operator(TokenKind::ShlAssign));
        assert!(is_fold_operator(TokenKind::Comma));
        assert!(!is_fold_operator(TokenKind::Question));
    }

    #[test]
    fn fold_operators_include_alternative_spellings() {
        assert!(is_fold_operator(TokenKind::Or));
        assert!(is_fold_operator(TokenKind::And));
        assert!(is_fold_operator(TokenKind::Bitor));
        assert!(is_fold_operator(TokenKind::Bitand));
        assert!(is_fold_operator(TokenKind::Xor));
        assert!(is_fold_operator(TokenKind::NotEq));
    }

    #[test]
    fn pointer_to_member_sits_between_multiplicative_and_cast() {
        assert!(MULTIPLY < POINTER_TO_MEMBER);
        assert!(POINTER_TO_MEMBER < CAST);
        assert!(POINTER_TO_MEMBER < UNARY);
    }

    #[test]
    fn field_access_binds_below_subscript() {
        assert!(FIELD < SUBSCRIPT);
    }
}
