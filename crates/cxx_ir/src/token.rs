//! Token types for the C++ lexer.
//!
//! Tokens are fieldless kinds plus a [`Span`]; all text (identifier
//! spellings, literal values, raw string contents) is recovered by slicing
//! the source with the span. Trivia (whitespace, comments, preprocessor
//! lines) stays in the [`TokenList`] so the original text can be
//! reconstructed exactly from token spans.

use super::Span;
use std::fmt;

/// A token with its span in the source.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Token kinds for C++.
///
/// Fieldless so the whole kind fits in two bytes and bitset membership
/// (`discriminant_index`) is a plain cast.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
#[repr(u16)]
pub enum TokenKind {
    // Literals and names
    Identifier,
    NumberLiteral,
    CharLiteral,
    StringLiteral,
    /// Raw string open (`R"tag(`) or close (`)tag"`) — external recognizer.
    RawStringDelimiter,
    /// Raw string body between the delimiters — external recognizer.
    RawStringContent,

    // Keywords
    Alignas,
    Alignof,
    Auto,
    Break,
    Case,
    Catch,
    Class,
    Concept,
    Const,
    ConstCast,
    Consteval,
    Constexpr,
    Constinit,
    Continue,
    CoAwait,
    CoReturn,
    CoYield,
    Decltype,
    Default,
    Delete,
    Do,
    DynamicCast,
    Else,
    Enum,
    Explicit,
    Export,
    Extern,
    False,
    Final,
    For,
    Friend,
    Goto,
    If,
    Import,
    Inline,
    Module,
    Mutable,
    Namespace,
    New,
    Noexcept,
    Nullptr,
    Operator,
    Override,
    Private,
    Protected,
    Public,
    ReinterpretCast,
    Requires,
    Return,
    Sizeof,
    Static,
    StaticAssert,
    StaticCast,
    Struct,
    Switch,
    Template,
    This,
    ThreadLocal,
    Throw,
    True,
    Try,
    Typedef,
    Typeid,
    Typename,
    Union,
    Using,
    Virtual,
    Volatile,
    While,

    /// `int`, `float`, `double`, `bool`, `void`, `char`, `wchar_t`,
    /// `char8_t`, `char16_t`, `char32_t` — spelling via span.
    PrimitiveType,
    Signed,
    Unsigned,
    Short,
    Long,

    // Alternative operator spellings
    And,
    Or,
    Not,
    Bitand,
    Bitor,
    Xor,
    Compl,
    AndEq,
    OrEq,
    XorEq,
    NotEq,

    // Operators and punctuation
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Amp,
    Pipe,
    Tilde,
    Bang,
    Assign,
    Lt,
    Gt,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    CaretAssign,
    AmpAssign,
    PipeAssign,
    Shl,
    Shr,
    ShlAssign,
    ShrAssign,
    EqEq,
    BangEq,
    LtEq,
    GtEq,
    /// `<=>`
    Spaceship,
    AmpAmp,
    PipePipe,
    PlusPlus,
    MinusMinus,
    Comma,
    ArrowStar,
    Arrow,
    DotStar,
    Dot,
    Ellipsis,
    Question,
    Colon,
    ColonColon,
    Semicolon,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // Trivia — retained in the token list, skipped by the parser
    Whitespace,
    LineComment,
    BlockComment,
    /// A whole `#...` line. Preprocessing is out of scope; the line is
    /// carried as trivia so surrounding structure still parses.
    Preproc,

    /// Lexically invalid input, embedded rather than aborting the lex.
    Error,
    Eof,
}

impl TokenKind {
    /// Index used for bitset membership. Stable within one build.
    #[inline]
    pub const fn discriminant_index(self) -> u16 {
        self as u16
    }

    /// Trivia tokens carry source text but never drive the grammar.
    #[inline]
    pub const fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::Preproc
        )
    }

    /// Tokens that can begin a literal expression.
    #[inline]
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::NumberLiteral
                | TokenKind::CharLiteral
                | TokenKind::StringLiteral
                | TokenKind::RawStringDelimiter
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nullptr
        )
    }

    /// Assignment operators, including compound and alternative spellings.
    #[inline]
    pub const fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Assign
                | TokenKind::PlusAssign
                | TokenKind::MinusAssign
                | TokenKind::StarAssign
                | TokenKind::SlashAssign
                | TokenKind::PercentAssign
                | TokenKind::CaretAssign
                | TokenKind::AmpAssign
                | TokenKind::PipeAssign
                | TokenKind::ShlAssign
                | TokenKind::ShrAssign
                | TokenKind::AndEq
                | TokenKind::OrEq
                | TokenKind::XorEq
        )
    }
}

/// Tokens produced by an external recognizer rather than a regular pattern.
///
/// External tokens fire only when the caller's current valid-token set
/// includes them; the recognizer must refuse kinds that are not valid.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum ExternalToken {
    RawStringDelimiter,
    RawStringContent,
}

impl ExternalToken {
    /// The token kind this external produces.
    #[inline]
    pub const fn token_kind(self) -> TokenKind {
        match self {
            ExternalToken::RawStringDelimiter => TokenKind::RawStringDelimiter,
            ExternalToken::RawStringContent => TokenKind::RawStringContent,
        }
    }
}

/// The tokens of one document, trivia included, Eof-terminated.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    /// Wrap a token vector, appending an Eof token if the lexer did not.
    pub fn new(mut tokens: Vec<Token>, source_len: u32) -> Self {
        let needs_eof = tokens.last().is_none_or(|t| t.kind != TokenKind::Eof);
        if needs_eof {
            tokens.push(Token::new(TokenKind::Eof, Span::point(source_len)));
        }
        TokenList { tokens }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        // The Eof token is always present.
        self.tokens.len() <= 1
    }

    /// Token at `index`, clamped to the trailing Eof.
    #[inline]
    pub fn get(&self, index: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[index.min(last)]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Reconstruct the document text from token spans, trivia included.
    ///
    /// For a lex with no gaps this is byte-identical to the input.
    pub fn reconstruct(&self, source: &str) -> String {
        let mut out = String::with_capacity(source.len());
        for token in &self.tokens {
            if let Some(text) = source.get(token.span.to_range()) {
                out.push_str(text);
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminant_indexes_are_distinct_for_bitset_use() {
        // Spot-check both ends of the enum.
        assert_ne!(
            TokenKind::Identifier.discriminant_index(),
            TokenKind::Eof.discriminant_index()
        );
        assert!(usize::from(TokenKind::Eof.discriminant_index()) < 256);
    }

    #[test]
    fn trivia_classification() {
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(TokenKind::LineComment.is_trivia());
        assert!(TokenKind::BlockComment.is_trivia());
        assert!(TokenKind::Preproc.is_trivia());
        assert!(!TokenKind::Identifier.is_trivia());
        assert!(!TokenKind::Eof.is_trivia());
    }

    #[test]
    fn token_list_appends_eof() {
        let tokens = vec![Token::new(TokenKind::Identifier, Span::new(0, 3))];
        let list = TokenList::new(tokens, 3);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(1).kind, TokenKind::Eof);
        assert_eq!(list.get(1).span, Span::point(3));
    }

    #[test]
    fn token_list_get_clamps_to_eof() {
        let list = TokenList::new(Vec::new(), 0);
        assert_eq!(list.get(100).kind, TokenKind::Eof);
    }

    #[test]
    fn reconstruct_joins_spans() {
        let source = "int x;";
        let tokens = vec![
            Token::new(TokenKind::PrimitiveType, Span::new(0, 3)),
            Token::new(TokenKind::Whitespace, Span::new(3, 4)),
            Token::new(TokenKind::Identifier, Span::new(4, 5)),
            Token::new(TokenKind::Semicolon, Span::new(5, 6)),
        ];
        let list = TokenList::new(tokens, 6);
        assert_eq!(list.reconstruct(source), source);
    }
}
