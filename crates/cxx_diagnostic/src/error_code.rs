use std::fmt;

/// Error codes for all diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E9xxx: Internal defects
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Unterminated character literal
    E0003,
    /// Unterminated block comment
    E0004,
    /// Unterminated raw string literal (no matching close delimiter)
    E0005,
    /// Raw string delimiter tag too long (over 16 characters)
    E0006,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Expected declarator
    E1003,
    /// Expected identifier
    E1004,
    /// Expected type specifier
    E1005,
    /// Unclosed delimiter
    E1006,
    /// Missing initializer
    E1007,
    /// Expected statement
    E1008,
    /// Expected template argument
    E1009,
    /// Expected parameter declaration
    E1010,
    /// Expected capture
    E1011,
    /// Expected requirement
    E1012,

    // Internal defects (E9xxx)
    /// More live candidates than the declared conflict bound
    E9001,
    /// Parse cancelled at a token boundary
    E9002,
}

impl ErrorCode {
    /// Short human description of the code, independent of any instance.
    pub fn summary(self) -> &'static str {
        match self {
            ErrorCode::E0001 => "unterminated string literal",
            ErrorCode::E0002 => "invalid character",
            ErrorCode::E0003 => "unterminated character literal",
            ErrorCode::E0004 => "unterminated block comment",
            ErrorCode::E0005 => "unterminated raw string literal",
            ErrorCode::E0006 => "raw string delimiter too long",
            ErrorCode::E1001 => "unexpected token",
            ErrorCode::E1002 => "expected expression",
            ErrorCode::E1003 => "expected declarator",
            ErrorCode::E1004 => "expected identifier",
            ErrorCode::E1005 => "expected type specifier",
            ErrorCode::E1006 => "unclosed delimiter",
            ErrorCode::E1007 => "missing initializer",
            ErrorCode::E1008 => "expected statement",
            ErrorCode::E1009 => "expected template argument",
            ErrorCode::E1010 => "expected parameter declaration",
            ErrorCode::E1011 => "expected capture",
            ErrorCode::E1012 => "expected requirement",
            ErrorCode::E9001 => "ambiguity bound exceeded",
            ErrorCode::E9002 => "parse cancelled",
        }
    }

    /// Internal defects indicate a bug in the declared grammar, not the input.
    pub fn is_internal(self) -> bool {
        matches!(self, ErrorCode::E9001 | ErrorCode::E9002)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_code() {
        assert_eq!(ErrorCode::E1001.to_string(), "E1001");
    }

    #[test]
    fn internal_codes_flagged() {
        assert!(ErrorCode::E9001.is_internal());
        assert!(!ErrorCode::E1001.is_internal());
    }
}
