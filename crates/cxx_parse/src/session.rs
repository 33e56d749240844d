//! Mutable state of one parse: token cursor, diagnostics, context flags.
//!
//! The cursor walks the token list skipping trivia and supports cheap
//! checkpoints so candidate exploration can rewind both position and
//! diagnostics. It also owns the one token-level fixup the grammar needs:
//! splitting a `>>` into two `>` when a template-argument list closes, so
//! `vector<vector<int>>` never reads a right shift.

use crate::context::ParseContext;
use crate::green::GreenNode;
use crate::token_set::TokenSet;
use cxx_diagnostic::{Diagnostic, ErrorCode};
use cxx_grammar::ParseTables;
use cxx_ir::{NodeKind, Span, TokenKind, TokenList};
use std::sync::atomic::{AtomicBool, Ordering};

/// A rewindable position: cursor, pending split, diagnostic high-water mark.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Checkpoint {
    pos: usize,
    pending_gt: Option<Span>,
    diag_len: usize,
}

pub(crate) struct ParseSession<'a> {
    source: &'a str,
    tokens: &'a TokenList,
    tables: &'a ParseTables,
    pos: usize,
    /// Second half of a split `>>`, surfaced as a `>` before the cursor
    /// moves past the shift token.
    pending_gt: Option<Span>,
    pub(crate) ctx: ParseContext,
    pub(crate) diagnostics: Vec<Diagnostic>,
    cancel: Option<&'a AtomicBool>,
    cancelled: bool,
    speculation: u32,
}

impl<'a> ParseSession<'a> {
    pub(crate) fn new(
        source: &'a str,
        tokens: &'a TokenList,
        tables: &'a ParseTables,
        cancel: Option<&'a AtomicBool>,
    ) -> Self {
        let mut session = ParseSession {
            source,
            tokens,
            tables,
            pos: 0,
            pending_gt: None,
            ctx: ParseContext::default(),
            diagnostics: Vec::new(),
            cancel,
            cancelled: false,
            speculation: 0,
        };
        session.skip_trivia();
        session
    }

    pub(crate) fn tables(&self) -> &ParseTables {
        self.tables
    }

    fn skip_trivia(&mut self) {
        while self.tokens.get(self.pos).kind.is_trivia() {
            self.pos += 1;
        }
    }

    /// Kind of the current token.
    pub(crate) fn peek(&self) -> TokenKind {
        if self.pending_gt.is_some() {
            return TokenKind::Gt;
        }
        self.tokens.get(self.pos).kind
    }

    /// Kind of the `n`-th non-trivia token after the current one.
    pub(crate) fn peek_nth(&self, n: usize) -> TokenKind {
        let mut remaining = n;
        if self.pending_gt.is_some() {
            if remaining == 0 {
                return TokenKind::Gt;
            }
            remaining -= 1;
        } else if remaining == 0 {
            return self.tokens.get(self.pos).kind;
        } else {
            remaining -= 1;
        }
        let mut index = self.pos + 1;
        loop {
            let kind = self.tokens.get(index).kind;
            if kind == TokenKind::Eof {
                return kind;
            }
            if !kind.is_trivia() {
                if remaining == 0 {
                    return kind;
                }
                remaining -= 1;
            }
            index += 1;
        }
    }

    /// Span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.pending_gt
            .unwrap_or_else(|| self.tokens.get(self.pos).span)
    }

    /// Source text of the current token.
    pub(crate) fn current_text(&self) -> &'a str {
        self.source
            .get(self.current_span().to_range())
            .unwrap_or("")
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.peek() == TokenKind::Eof
    }

    /// Move past the current token. The cancellation flag is sampled here,
    /// so an abort always lands on a token boundary.
    fn advance(&mut self) {
        // Consuming the pending half of a split `>>` also steps past the
        // shift token it came from.
        self.pending_gt = None;
        self.pos += 1;
        self.skip_trivia();
        if !self.cancelled {
            if let Some(flag) = self.cancel {
                if flag.load(Ordering::Relaxed) {
                    self.cancelled = true;
                    self.diagnostics.push(
                        Diagnostic::error(ErrorCode::E9002)
                            .with_label(self.current_span(), "parse stopped here"),
                    );
                }
            }
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Nesting depth of in-flight candidate exploration. Deeply nested
    /// speculation degrades to the first-declared reading to keep the work
    /// bounded on adversarial input.
    pub(crate) fn speculation_depth(&self) -> u32 {
        self.speculation
    }

    pub(crate) fn enter_speculation(&mut self) {
        self.speculation += 1;
    }

    pub(crate) fn exit_speculation(&mut self) {
        self.speculation = self.speculation.saturating_sub(1);
    }

    /// Consume the current token as a leaf node.
    pub(crate) fn bump(&mut self) -> GreenNode {
        let span = self.current_span();
        let kind = leaf_kind(self.peek());
        self.advance();
        GreenNode::leaf(kind, span)
    }

    /// Consume the current token as a leaf of the given node kind.
    pub(crate) fn bump_as(&mut self, kind: NodeKind) -> GreenNode {
        let span = self.current_span();
        self.advance();
        GreenNode::leaf(kind, span)
    }

    /// Consume `kind`, or synthesize a zero-width missing marker.
    pub(crate) fn expect(&mut self, kind: TokenKind, code: ErrorCode) -> GreenNode {
        if self.at(kind) {
            self.bump()
        } else {
            self.missing(code)
        }
    }

    /// A zero-width missing marker at the current position, with a
    /// diagnostic.
    pub(crate) fn missing(&mut self, code: ErrorCode) -> GreenNode {
        let at = Span::point(self.current_span().start);
        self.diagnostics.push(
            Diagnostic::error(code).with_label(
                self.current_span(),
                format!("found `{}`", printable(self.current_text())),
            ),
        );
        GreenNode::leaf(NodeKind::Missing, at)
    }

    /// Report the current token as unexpected and consume forward to a
    /// synchronization token. Returns an error node spanning everything
    /// consumed (zero-width when the sync token is already current).
    pub(crate) fn recover(&mut self, code: ErrorCode, sync: TokenSet) -> GreenNode {
        let start = self.current_span();
        self.diagnostics.push(
            Diagnostic::error(code).with_label(
                start,
                format!("unexpected `{}`", printable(self.current_text())),
            ),
        );
        let mut end = start.start;
        while !sync.contains(self.peek()) && !self.at_eof() && !self.is_cancelled() {
            end = self.current_span().end;
            self.advance();
        }
        let span = Span::new(start.start, end.max(start.start));
        tracing::debug!(code = %code, span = %span, "resynchronized");
        GreenNode::leaf(NodeKind::ErrorNode, span)
    }

    /// Split a `>>` token: emit a `>` over its first byte and leave a
    /// pending `>` as the current token.
    pub(crate) fn split_shr(&mut self) -> GreenNode {
        debug_assert!(self.at(TokenKind::Shr));
        let span = self.current_span();
        self.pending_gt = Some(Span::new(span.start + 1, span.end));
        GreenNode::leaf(NodeKind::Token, Span::new(span.start, span.start + 1))
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            pending_gt: self.pending_gt,
            diag_len: self.diagnostics.len(),
        }
    }

    /// Position delta since `checkpoint`, in tokens. The pending half of a
    /// split `>>` counts as an extra half-step behind.
    pub(crate) fn consumed_since(&self, checkpoint: &Checkpoint) -> usize {
        self.pos - checkpoint.pos
    }

    pub(crate) fn diagnostics_since(&self, checkpoint: &Checkpoint) -> usize {
        self.diagnostics.len() - checkpoint.diag_len
    }

    pub(crate) fn rewind(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.pending_gt = checkpoint.pending_gt;
        self.diagnostics.truncate(checkpoint.diag_len);
    }

    /// Drain diagnostics recorded since `checkpoint`, for candidate
    /// bookkeeping.
    pub(crate) fn take_diagnostics_since(&mut self, checkpoint: &Checkpoint) -> Vec<Diagnostic> {
        self.diagnostics.split_off(checkpoint.diag_len)
    }

    pub(crate) fn append_diagnostics(&mut self, mut diagnostics: Vec<Diagnostic>) {
        self.diagnostics.append(&mut diagnostics);
    }

    /// Restore a candidate's end state captured by `checkpoint` taken at
    /// its finish.
    pub(crate) fn restore(&mut self, end: Checkpoint) {
        self.pos = end.pos;
        self.pending_gt = end.pending_gt;
    }
}

/// Leaf node kind for a consumed token.
fn leaf_kind(kind: TokenKind) -> NodeKind {
    match kind {
        TokenKind::Identifier => NodeKind::Identifier,
        TokenKind::NumberLiteral => NodeKind::NumberLiteral,
        TokenKind::CharLiteral => NodeKind::CharLiteral,
        TokenKind::StringLiteral => NodeKind::StringLiteral,
        TokenKind::RawStringDelimiter => NodeKind::RawStringDelimiter,
        TokenKind::RawStringContent => NodeKind::RawStringContent,
        TokenKind::True => NodeKind::True,
        TokenKind::False => NodeKind::False,
        TokenKind::Nullptr => NodeKind::Nullptr,
        TokenKind::This => NodeKind::This,
        TokenKind::PrimitiveType => NodeKind::PrimitiveType,
        TokenKind::Error => NodeKind::ErrorNode,
        _ => NodeKind::Token,
    }
}

/// Clip a token's text for diagnostics; Eof has none.
fn printable(text: &str) -> &str {
    if text.is_empty() {
        "<eof>"
    } else {
        text
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::ParseSession;
    use cxx_grammar::{build, cpp};
    use cxx_lexer::lex;

    /// Run a test body against a fresh session over `source`.
    pub(crate) fn with_session<R>(source: &str, f: impl FnOnce(&mut ParseSession<'_>) -> R) -> R {
        let tables = build(&cpp()).unwrap();
        let lexed = lex(source);
        let mut session = ParseSession::new(source, &lexed.tokens, &tables, None);
        f(&mut session)
    }
}

#[cfg(test)]
mod tests {
    use super::tests_support::with_session;
    use super::*;
    use crate::token_set::STMT_SYNC;
    use cxx_grammar::{build, cpp};
    use cxx_lexer::lex;
    use pretty_assertions::assert_eq;

    #[test]
    fn trivia_is_invisible_to_peek() {
        with_session("  int   x ;", |s| {
            assert_eq!(s.peek(), TokenKind::PrimitiveType);
            assert_eq!(s.peek_nth(1), TokenKind::Identifier);
            assert_eq!(s.peek_nth(2), TokenKind::Semicolon);
            assert_eq!(s.peek_nth(3), TokenKind::Eof);
        });
    }

    #[test]
    fn split_shr_yields_two_closers() {
        with_session(">>", |s| {
            assert_eq!(s.peek(), TokenKind::Shr);
            let first = s.split_shr();
            assert_eq!(first.span, Span::new(0, 1));
            assert_eq!(s.peek(), TokenKind::Gt);
            let second = s.bump();
            assert_eq!(second.span, Span::new(1, 2));
            assert!(s.at_eof());
        });
    }

    #[test]
    fn rewind_restores_pending_split() {
        with_session(">> x", |s| {
            let before = s.checkpoint();
            let _ = s.split_shr();
            let after_split = s.checkpoint();
            let _ = s.bump();
            assert_eq!(s.peek(), TokenKind::Identifier);
            s.rewind(after_split);
            assert_eq!(s.peek(), TokenKind::Gt);
            s.rewind(before);
            assert_eq!(s.peek(), TokenKind::Shr);
        });
    }

    #[test]
    fn expect_synthesizes_missing() {
        with_session("x", |s| {
            let node = s.expect(TokenKind::Semicolon, ErrorCode::E1001);
            assert_eq!(node.kind, NodeKind::Missing);
            assert!(node.span.is_empty());
            assert_eq!(s.diagnostics.len(), 1);
            // The cursor did not move.
            assert_eq!(s.peek(), TokenKind::Identifier);
        });
    }

    #[test]
    fn recover_consumes_to_sync() {
        with_session("@ @ ;", |s| {
            let node = s.recover(ErrorCode::E1001, STMT_SYNC);
            assert_eq!(node.kind, NodeKind::ErrorNode);
            assert_eq!(s.peek(), TokenKind::Semicolon);
            assert!(node.span.end > node.span.start);
        });
    }

    #[test]
    fn cancellation_latches_at_token_boundary() {
        let tables = build(&cpp()).unwrap();
        let lexed = lex("a b c d");
        let flag = AtomicBool::new(true);
        let mut s = ParseSession::new("a b c d", &lexed.tokens, &tables, Some(&flag));
        assert!(!s.is_cancelled());
        let _ = s.bump();
        assert!(s.is_cancelled());
        assert!(s
            .diagnostics
            .iter()
            .any(|d| d.code == ErrorCode::E9002));
    }
}
