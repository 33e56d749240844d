//! Lexer for cxx-syntax.
//!
//! Splits a C++ document into an Eof-terminated [`TokenList`](cxx_ir::TokenList)
//! with trivia retained, so the original text is recoverable from token spans.
//! All tokens but the raw-string family come from the static scanner; raw
//! strings go through the stateful [`RawStringScanner`], the single external
//! recognizer. Lexical errors become `Error` tokens plus diagnostics — the
//! lex always completes.

mod cursor;
mod raw_string;
mod scanner;
mod source_buffer;

pub use cursor::Cursor;
pub use raw_string::{RawMatch, RawStringScanner, ValidTokenSet, MAX_TAG_LEN};
pub use scanner::{lex, lex_with_externals, LexOutput};
pub use source_buffer::SourceBuffer;

#[cfg(test)]
mod tests {
    use super::*;
    use cxx_ir::TokenKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_is_just_eof() {
        let out = lex("");
        assert_eq!(out.tokens.len(), 1);
        assert_eq!(out.tokens.get(0).kind, TokenKind::Eof);
        assert!(!out.has_errors());
    }

    #[test]
    fn hello_world_lexes_cleanly() {
        let source = "int main() {\n    return 0;\n}\n";
        let out = lex(source);
        assert!(!out.has_errors());
        assert_eq!(out.tokens.reconstruct(source), source);
    }

    #[test]
    fn errors_do_not_stop_the_lex() {
        // A stray backslash and an unterminated char literal, with valid
        // tokens on either side.
        let source = "int \\ x '\nfloat";
        let out = lex(source);
        assert!(out.has_errors());
        let kinds: Vec<_> = out
            .tokens
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
            .collect();
        assert_eq!(kinds.first(), Some(&TokenKind::PrimitiveType));
        assert!(kinds.contains(&TokenKind::Error));
        // The lex reached the last line.
        assert_eq!(kinds[kinds.len() - 2], TokenKind::PrimitiveType);
        assert_eq!(kinds.last(), Some(&TokenKind::Eof));
    }
}
