//! Static scanner for the C++ token set.
//!
//! Every token except the raw-string family is a fixed or regular pattern
//! handled here by a byte dispatch; raw strings are delegated to the
//! stateful [`RawStringScanner`] when the valid-token set permits. Lexical
//! errors become explicit `Error` tokens in the stream — the lex never
//! aborts.
//!
//! Trivia (whitespace, comments, preprocessor lines) is kept in the output
//! so the original text is reconstructible from token spans.

use crate::{Cursor, RawStringScanner, SourceBuffer, ValidTokenSet};
use cxx_diagnostic::{Diagnostic, ErrorCode};
use cxx_ir::{Span, Token, TokenKind, TokenList};

/// Result of lexing one document.
#[derive(Clone, Debug)]
pub struct LexOutput {
    pub tokens: TokenList,
    pub diagnostics: Vec<Diagnostic>,
}

impl LexOutput {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Lex a document with all external tokens enabled.
pub fn lex(source: &str) -> LexOutput {
    lex_with_externals(source, ValidTokenSet::ALL)
}

/// Lex a document, attempting external tokens only when `valid` allows.
///
/// With raw strings disabled, `R"..."` falls back to an identifier followed
/// by an ordinary (likely erroneous) string literal, mirroring how the
/// parser-driven valid set would behave outside expression positions.
pub fn lex_with_externals(source: &str, valid: ValidTokenSet) -> LexOutput {
    let buffer = SourceBuffer::new(source);
    let mut scanner = Scanner {
        cursor: buffer.cursor(),
        raw: RawStringScanner::new(),
        valid,
        tokens: Vec::new(),
        diagnostics: Vec::new(),
    };
    scanner.run();
    LexOutput {
        tokens: TokenList::new(scanner.tokens, buffer.source_len()),
        diagnostics: scanner.diagnostics,
    }
}

struct Scanner<'a> {
    cursor: Cursor<'a>,
    raw: RawStringScanner,
    valid: ValidTokenSet,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl Scanner<'_> {
    fn run(&mut self) {
        while !self.cursor.is_eof() {
            let start = self.cursor.pos();
            match self.cursor.current() {
                b' ' | b'\t' | b'\r' | b'\n' => self.whitespace(start),
                b'#' => self.preproc(start),
                b'/' => self.slash(start),
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.word(start),
                b'0'..=b'9' => self.number(start),
                b'"' => self.string_literal(start, start),
                b'\'' => self.char_literal(start, start),
                b'.' if self.cursor.peek().is_ascii_digit() => self.number(start),
                0 => {
                    // Interior null.
                    self.cursor.advance();
                    self.error_token(start, ErrorCode::E0002);
                }
                _ => self.operator(start),
            }
        }
        let end = self.cursor.source_len();
        self.push(TokenKind::Eof, end, end);
    }

    #[inline]
    fn push(&mut self, kind: TokenKind, start: u32, end: u32) {
        self.tokens.push(Token::new(kind, Span::new(start, end)));
    }

    #[inline]
    fn push_here(&mut self, kind: TokenKind, start: u32) {
        self.push(kind, start, self.cursor.pos());
    }

    fn error_token(&mut self, start: u32, code: ErrorCode) {
        let span = Span::new(start, self.cursor.pos());
        self.push(TokenKind::Error, start, self.cursor.pos());
        self.diagnostics
            .push(Diagnostic::error(code).with_label(span, "here"));
    }

    fn whitespace(&mut self, start: u32) {
        self.cursor
            .eat_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'));
        self.push_here(TokenKind::Whitespace, start);
    }

    /// A whole `#...` line, honoring backslash-newline continuations.
    fn preproc(&mut self, start: u32) {
        loop {
            self.cursor.eat_until_newline_or_eof();
            if self.cursor.is_eof() {
                break;
            }
            // Continuation if the byte before the newline is a backslash.
            let before = self.cursor.pos().saturating_sub(1);
            if self.cursor.slice(before, self.cursor.pos()) == "\\" {
                self.cursor.advance();
                continue;
            }
            break;
        }
        self.push_here(TokenKind::Preproc, start);
    }

    fn slash(&mut self, start: u32) {
        match self.cursor.peek() {
            b'/' => {
                self.cursor.eat_until_newline_or_eof();
                self.push_here(TokenKind::LineComment, start);
            }
            b'*' => {
                self.cursor.advance_n(2);
                loop {
                    if !self.cursor.eat_until_byte(b'*') {
                        self.push_here(TokenKind::BlockComment, start);
                        let span = Span::new(start, self.cursor.pos());
                        self.diagnostics.push(
                            Diagnostic::error(ErrorCode::E0004).with_label(span, "opened here"),
                        );
                        return;
                    }
                    self.cursor.advance();
                    if self.cursor.current() == b'/' {
                        self.cursor.advance();
                        self.push_here(TokenKind::BlockComment, start);
                        return;
                    }
                }
            }
            b'=' => {
                self.cursor.advance_n(2);
                self.push_here(TokenKind::SlashAssign, start);
            }
            _ => {
                self.cursor.advance();
                self.push_here(TokenKind::Slash, start);
            }
        }
    }

    /// Identifier, keyword, or a literal-prefix word (`u8R"`, `L"`, `u'`).
    fn word(&mut self, start: u32) {
        self.cursor
            .eat_while(|b| b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80);
        let end = self.cursor.pos();
        let text = self.cursor.slice(start, end);

        match self.cursor.current() {
            b'"' if is_raw_string_prefix(text) => {
                if self.try_raw_string(start) {
                    return;
                }
                // Invalid delimiter tag: keep the word as an identifier and
                // let the quote start an ordinary string next round.
                self.report_long_tag();
                self.push(TokenKind::Identifier, start, end);
            }
            b'"' if is_encoding_prefix(text) => self.string_literal(start, end),
            b'\'' if is_encoding_prefix(text) => self.char_literal(start, end),
            _ => {
                let kind = keyword_kind(text).unwrap_or(TokenKind::Identifier);
                self.push(kind, start, end);
            }
        }
    }

    /// Drive the external recognizer through one raw string literal.
    ///
    /// The cursor sits on the `"` right after the prefix word; the opening
    /// delimiter token is extended back to `start` so the encoding prefix
    /// stays inside the literal.
    fn try_raw_string(&mut self, start: u32) -> bool {
        // Step back onto the `R` itself for the recognizer.
        let mut probe = self.cursor;
        probe.rewind_n(1);
        let Some(open) = self.raw.try_match(&mut probe, self.valid) else {
            return false;
        };
        debug_assert_eq!(open.kind, TokenKind::RawStringDelimiter);
        self.cursor = probe;
        self.push(TokenKind::RawStringDelimiter, start, self.cursor.pos());

        let content_start = self.cursor.pos();
        match self.raw.try_match(&mut self.cursor, self.valid) {
            Some(content) => {
                self.push(content.kind, content_start, self.cursor.pos());
            }
            None => {
                // Unterminated: everything consumed becomes an error token.
                self.error_token(content_start, ErrorCode::E0005);
                return true;
            }
        }

        let close_start = self.cursor.pos();
        match self.raw.try_match(&mut self.cursor, self.valid) {
            Some(close) => self.push(close.kind, close_start, self.cursor.pos()),
            None => self.error_token(close_start, ErrorCode::E0005),
        }
        true
    }

    /// Diagnose a raw-string opener whose only defect is a delimiter tag
    /// over the 16-byte limit. The cursor sits on the `"`.
    fn report_long_tag(&mut self) {
        let quote = self.cursor.pos();
        let mut n = 0;
        loop {
            let byte = self.cursor.peek_at(1 + n);
            if byte == b'(' {
                if n > crate::MAX_TAG_LEN {
                    let span = Span::new(quote + 1, quote + 1 + n);
                    self.diagnostics.push(
                        Diagnostic::error(ErrorCode::E0006).with_label(span, "delimiter tag"),
                    );
                }
                return;
            }
            if !crate::raw_string::is_tag_byte(byte) || n > crate::MAX_TAG_LEN * 4 {
                return;
            }
            n += 1;
        }
    }

    /// Ordinary string literal; `start` may precede an encoding prefix.
    fn string_literal(&mut self, start: u32, quote_pos: u32) {
        debug_assert_eq!(self.cursor.pos(), quote_pos);
        self.cursor.advance();
        loop {
            match self.cursor.current() {
                b'"' => {
                    self.cursor.advance();
                    self.eat_ud_suffix();
                    self.push_here(TokenKind::StringLiteral, start);
                    return;
                }
                b'\\' => {
                    self.cursor.advance();
                    self.cursor.advance_char();
                }
                b'\n' => {
                    self.error_token(start, ErrorCode::E0001);
                    return;
                }
                0 if self.cursor.is_eof() => {
                    self.error_token(start, ErrorCode::E0001);
                    return;
                }
                _ => self.cursor.advance_char(),
            }
        }
    }

    fn char_literal(&mut self, start: u32, quote_pos: u32) {
        debug_assert_eq!(self.cursor.pos(), quote_pos);
        self.cursor.advance();
        loop {
            match self.cursor.current() {
                b'\'' => {
                    self.cursor.advance();
                    self.eat_ud_suffix();
                    self.push_here(TokenKind::CharLiteral, start);
                    return;
                }
                b'\\' => {
                    self.cursor.advance();
                    self.cursor.advance_char();
                }
                b'\n' => {
                    self.error_token(start, ErrorCode::E0003);
                    return;
                }
                0 if self.cursor.is_eof() => {
                    self.error_token(start, ErrorCode::E0003);
                    return;
                }
                _ => self.cursor.advance_char(),
            }
        }
    }

    /// User-defined literal suffix glued onto the preceding literal token.
    fn eat_ud_suffix(&mut self) {
        if self.cursor.current().is_ascii_alphabetic() || self.cursor.current() == b'_' {
            self.cursor
                .eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        }
    }

    /// Integer or floating literal: digits, hex/binary/octal prefixes, digit
    /// separators, a fraction, and an exponent with optional sign. The
    /// trailing alnum run also swallows type and user-defined suffixes.
    fn number(&mut self, start: u32) {
        let mut prev = 0u8;
        loop {
            let b = self.cursor.current();
            let keep = match b {
                b'0'..=b'9' | b'a'..=b'd' | b'f'..=b'o' | b'q'..=b'z' => true,
                b'A'..=b'D' | b'F'..=b'O' | b'Q'..=b'Z' => true,
                b'e' | b'E' | b'p' | b'P' | b'_' | b'\'' => true,
                b'.' => true,
                b'+' | b'-' => matches!(prev, b'e' | b'E' | b'p' | b'P'),
                _ => false,
            };
            if !keep {
                break;
            }
            prev = b;
            self.cursor.advance();
        }
        self.push_here(TokenKind::NumberLiteral, start);
    }

    /// Operators and punctuation with maximal munch.
    ///
    /// `>>` is a single shift token here; the parser splits it when closing
    /// nested template-argument lists.
    fn operator(&mut self, start: u32) {
        use TokenKind as T;
        let (kind, len) = match (self.cursor.current(), self.cursor.peek(), self.cursor.peek2()) {
            (b'<', b'=', b'>') => (T::Spaceship, 3),
            (b'<', b'<', b'=') => (T::ShlAssign, 3),
            (b'>', b'>', b'=') => (T::ShrAssign, 3),
            (b'.', b'.', b'.') => (T::Ellipsis, 3),
            (b'-', b'>', b'*') => (T::ArrowStar, 3),
            (b'<', b'<', _) => (T::Shl, 2),
            (b'>', b'>', _) => (T::Shr, 2),
            (b'<', b'=', _) => (T::LtEq, 2),
            (b'>', b'=', _) => (T::GtEq, 2),
            (b'=', b'=', _) => (T::EqEq, 2),
            (b'!', b'=', _) => (T::BangEq, 2),
            (b'&', b'&', _) => (T::AmpAmp, 2),
            (b'|', b'|', _) => (T::PipePipe, 2),
            (b'+', b'+', _) => (T::PlusPlus, 2),
            (b'-', b'-', _) => (T::MinusMinus, 2),
            (b'+', b'=', _) => (T::PlusAssign, 2),
            (b'-', b'=', _) => (T::MinusAssign, 2),
            (b'*', b'=', _) => (T::StarAssign, 2),
            (b'%', b'=', _) => (T::PercentAssign, 2),
            (b'^', b'=', _) => (T::CaretAssign, 2),
            (b'&', b'=', _) => (T::AmpAssign, 2),
            (b'|', b'=', _) => (T::PipeAssign, 2),
            (b'-', b'>', _) => (T::Arrow, 2),
            (b'.', b'*', _) => (T::DotStar, 2),
            (b':', b':', _) => (T::ColonColon, 2),
            (b'+', _, _) => (T::Plus, 1),
            (b'-', _, _) => (T::Minus, 1),
            (b'*', _, _) => (T::Star, 1),
            (b'%', _, _) => (T::Percent, 1),
            (b'^', _, _) => (T::Caret, 1),
            (b'&', _, _) => (T::Amp, 1),
            (b'|', _, _) => (T::Pipe, 1),
            (b'~', _, _) => (T::Tilde, 1),
            (b'!', _, _) => (T::Bang, 1),
            (b'=', _, _) => (T::Assign, 1),
            (b'<', _, _) => (T::Lt, 1),
            (b'>', _, _) => (T::Gt, 1),
            (b',', _, _) => (T::Comma, 1),
            (b'.', _, _) => (T::Dot, 1),
            (b'?', _, _) => (T::Question, 1),
            (b':', _, _) => (T::Colon, 1),
            (b';', _, _) => (T::Semicolon, 1),
            (b'(', _, _) => (T::LParen, 1),
            (b')', _, _) => (T::RParen, 1),
            (b'[', _, _) => (T::LBracket, 1),
            (b']', _, _) => (T::RBracket, 1),
            (b'{', _, _) => (T::LBrace, 1),
            (b'}', _, _) => (T::RBrace, 1),
            _ => {
                self.cursor.advance_char();
                self.error_token(start, ErrorCode::E0002);
                return;
            }
        };
        self.cursor.advance_n(len);
        self.push_here(kind, start);
    }
}

/// Words that open a raw string when immediately followed by `"`.
fn is_raw_string_prefix(text: &str) -> bool {
    matches!(text, "R" | "u8R" | "uR" | "UR" | "LR")
}

/// Encoding prefixes for ordinary string and character literals.
fn is_encoding_prefix(text: &str) -> bool {
    matches!(text, "u8" | "u" | "U" | "L")
}

fn keyword_kind(text: &str) -> Option<TokenKind> {
    use TokenKind as T;
    let kind = match text {
        "alignas" => T::Alignas,
        "alignof" => T::Alignof,
        "auto" => T::Auto,
        "break" => T::Break,
        "case" => T::Case,
        "catch" => T::Catch,
        "class" => T::Class,
        "concept" => T::Concept,
        "const" => T::Const,
        "const_cast" => T::ConstCast,
        "consteval" => T::Consteval,
        "constexpr" => T::Constexpr,
        "constinit" => T::Constinit,
        "continue" => T::Continue,
        "co_await" => T::CoAwait,
        "co_return" => T::CoReturn,
        "co_yield" => T::CoYield,
        "decltype" => T::Decltype,
        "default" => T::Default,
        "delete" => T::Delete,
        "do" => T::Do,
        "dynamic_cast" => T::DynamicCast,
        "else" => T::Else,
        "enum" => T::Enum,
        "explicit" => T::Explicit,
        "export" => T::Export,
        "extern" => T::Extern,
        "false" => T::False,
        "final" => T::Final,
        "for" => T::For,
        "friend" => T::Friend,
        "goto" => T::Goto,
        "if" => T::If,
        "import" => T::Import,
        "inline" => T::Inline,
        "module" => T::Module,
        "mutable" => T::Mutable,
        "namespace" => T::Namespace,
        "new" => T::New,
        "noexcept" => T::Noexcept,
        "nullptr" => T::Nullptr,
        "operator" => T::Operator,
        "override" => T::Override,
        "private" => T::Private,
        "protected" => T::Protected,
        "public" => T::Public,
        "reinterpret_cast" => T::ReinterpretCast,
        "requires" => T::Requires,
        "return" => T::Return,
        "sizeof" => T::Sizeof,
        "static" => T::Static,
        "static_assert" => T::StaticAssert,
        "static_cast" => T::StaticCast,
        "struct" => T::Struct,
        "switch" => T::Switch,
        "template" => T::Template,
        "this" => T::This,
        "thread_local" => T::ThreadLocal,
        "throw" => T::Throw,
        "true" => T::True,
        "try" => T::Try,
        "typedef" => T::Typedef,
        "typeid" => T::Typeid,
        "typename" => T::Typename,
        "union" => T::Union,
        "using" => T::Using,
        "virtual" => T::Virtual,
        "volatile" => T::Volatile,
        "while" => T::While,
        "int" | "float" | "double" | "bool" | "void" | "char" | "wchar_t" | "char8_t"
        | "char16_t" | "char32_t" => T::PrimitiveType,
        "signed" => T::Signed,
        "unsigned" => T::Unsigned,
        "short" => T::Short,
        "long" => T::Long,
        "and" => T::And,
        "or" => T::Or,
        "not" => T::Not,
        "bitand" => T::Bitand,
        "bitor" => T::Bitor,
        "xor" => T::Xor,
        "compl" => T::Compl,
        "and_eq" => T::AndEq,
        "or_eq" => T::OrEq,
        "xor_eq" => T::XorEq,
        "not_eq" => T::NotEq,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source)
            .tokens
            .iter()
            .filter(|t| !t.kind.is_trivia() && t.kind != TokenKind::Eof)
            .map(|t| t.kind)
            .collect()
    }

    fn texts(source: &str) -> Vec<(TokenKind, String)> {
        lex(source)
            .tokens
            .iter()
            .filter(|t| !t.kind.is_trivia() && t.kind != TokenKind::Eof)
            .map(|t| {
                (
                    t.kind,
                    source.get(t.span.to_range()).unwrap_or("").to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn keywords_and_identifiers() {
        use TokenKind as T;
        assert_eq!(
            kinds("class Foo final"),
            vec![T::Class, T::Identifier, T::Final]
        );
    }

    #[test]
    fn spaceship_and_shift_munch() {
        use TokenKind as T;
        assert_eq!(kinds("a <=> b"), vec![T::Identifier, T::Spaceship, T::Identifier]);
        assert_eq!(kinds("a >> b"), vec![T::Identifier, T::Shr, T::Identifier]);
        assert_eq!(kinds("a >>= b"), vec![T::Identifier, T::ShrAssign, T::Identifier]);
    }

    #[test]
    fn member_pointer_operators() {
        use TokenKind as T;
        assert_eq!(kinds("a->*b"), vec![T::Identifier, T::ArrowStar, T::Identifier]);
        assert_eq!(kinds("a.*b"), vec![T::Identifier, T::DotStar, T::Identifier]);
        assert_eq!(kinds("a::b"), vec![T::Identifier, T::ColonColon, T::Identifier]);
    }

    #[test]
    fn ellipsis_vs_dots() {
        use TokenKind as T;
        assert_eq!(kinds("f(...)"), vec![T::Identifier, T::LParen, T::Ellipsis, T::RParen]);
        assert_eq!(kinds("a.b"), vec![T::Identifier, T::Dot, T::Identifier]);
    }

    #[test]
    fn numbers() {
        use TokenKind as T;
        assert_eq!(kinds("0x1F 1'000 3.14e-2 1.0f 42ull 0b1010"), vec![T::NumberLiteral; 6]);
        // Exponent sign is part of the literal; ordinary plus is not.
        assert_eq!(
            kinds("1e+5+2"),
            vec![T::NumberLiteral, T::Plus, T::NumberLiteral]
        );
    }

    #[test]
    fn string_and_char_literals() {
        use TokenKind as T;
        assert_eq!(kinds(r#""hi" 'x' L"wide" u8"u" u'\n'"#), vec![
            T::StringLiteral,
            T::CharLiteral,
            T::StringLiteral,
            T::StringLiteral,
            T::CharLiteral,
        ]);
    }

    #[test]
    fn ud_literal_suffix_glued() {
        let out = texts(r#"12_km "abc"_sv"#);
        assert_eq!(out[0].1, "12_km");
        assert_eq!(out[1].1, "\"abc\"_sv");
    }

    #[test]
    fn unterminated_string_is_error_token() {
        let out = lex("\"oops\nint x;");
        assert!(out
            .tokens
            .iter()
            .any(|t| t.kind == TokenKind::Error));
        assert!(out
            .diagnostics
            .iter()
            .any(|d| d.code == ErrorCode::E0001));
        // The following line still lexes.
        assert!(out.tokens.iter().any(|t| t.kind == TokenKind::PrimitiveType));
    }

    #[test]
    fn raw_string_three_tokens() {
        let out = texts("R\"tag(body)tag\"");
        assert_eq!(
            out,
            vec![
                (TokenKind::RawStringDelimiter, "R\"tag(".to_string()),
                (TokenKind::RawStringContent, "body".to_string()),
                (TokenKind::RawStringDelimiter, ")tag\"".to_string()),
            ]
        );
    }

    #[test]
    fn raw_string_with_encoding_prefix() {
        let out = texts("u8R\"(x)\"");
        assert_eq!(out[0].1, "u8R\"(");
        assert_eq!(out[1].1, "x");
    }

    #[test]
    fn unterminated_raw_string() {
        let out = lex("R\"tag(no close");
        let kinds: Vec<_> = out.tokens.iter().map(|t| t.kind).collect();
        assert!(kinds.contains(&TokenKind::RawStringDelimiter));
        assert!(kinds.contains(&TokenKind::Error));
        assert!(out.diagnostics.iter().any(|d| d.code == ErrorCode::E0005));
    }

    #[test]
    fn over_long_raw_tag_is_diagnosed() {
        let out = lex("R\"aaaaaaaaaaaaaaaaa(x)aaaaaaaaaaaaaaaaa\"");
        assert!(out.diagnostics.iter().any(|d| d.code == ErrorCode::E0006));
        // Fallback lexing still produces tokens, starting with the word.
        assert_eq!(out.tokens.get(0).kind, TokenKind::Identifier);
    }

    #[test]
    fn raw_string_disabled_by_valid_set() {
        let out = lex_with_externals("R\"(x)\"", ValidTokenSet::NONE);
        let has_raw = out
            .tokens
            .iter()
            .any(|t| t.kind == TokenKind::RawStringDelimiter);
        assert!(!has_raw);
        // Falls back to identifier + string.
        assert!(out.tokens.iter().any(|t| t.kind == TokenKind::Identifier));
    }

    #[test]
    fn comments_and_preproc_are_trivia() {
        let out = lex("#include <vector>\n// line\n/* block */ int");
        let trivia: Vec<_> = out
            .tokens
            .iter()
            .filter(|t| t.kind.is_trivia())
            .map(|t| t.kind)
            .collect();
        assert!(trivia.contains(&TokenKind::Preproc));
        assert!(trivia.contains(&TokenKind::LineComment));
        assert!(trivia.contains(&TokenKind::BlockComment));
    }

    #[test]
    fn preproc_line_continuation() {
        let out = lex("#define A \\\n  1\nint");
        let preproc: Vec<_> = out
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Preproc)
            .collect();
        assert_eq!(preproc.len(), 1);
        assert!(out.tokens.iter().any(|t| t.kind == TokenKind::PrimitiveType));
    }

    #[test]
    fn reconstruction_is_exact() {
        let source = "int main() { return R\"(x)\" ? 1'000 : 0x2; } // done\n";
        let out = lex(source);
        assert_eq!(out.tokens.reconstruct(source), source);
    }

    #[test]
    fn alternative_operator_spellings() {
        use TokenKind as T;
        assert_eq!(
            kinds("a and b or not c"),
            vec![T::Identifier, T::And, T::Identifier, T::Or, T::Not, T::Identifier]
        );
    }
}
