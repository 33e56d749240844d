//! The raw-string external recognizer.
//!
//! Raw string literals are the one token family a static pattern cannot
//! express: the closing sequence `)` + tag + `"` is unknown until the
//! opening delimiter `R"tag(` has been read. The recognizer is therefore
//! stateful across calls — it remembers the exact delimiter tag and serves
//! the three pieces of the literal one token at a time:
//!
//! 1. `RawStringDelimiter` covering `R"tag(`
//! 2. `RawStringContent` covering everything up to the exact close
//! 3. `RawStringDelimiter` covering `)tag"`
//!
//! Per the external-token contract it only matches kinds present in the
//! caller's valid-token set, and reaching end of input before the close is a
//! no-match: the caller turns the longest consumed prefix into an error.

use crate::Cursor;
use cxx_ir::{ExternalToken, TokenKind};

/// Maximum length of a raw string delimiter tag, per the C++ grammar.
pub const MAX_TAG_LEN: u32 = 16;

/// The set of external tokens the parser currently accepts.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct ValidTokenSet(u8);

impl ValidTokenSet {
    pub const NONE: ValidTokenSet = ValidTokenSet(0);
    pub const ALL: ValidTokenSet = ValidTokenSet::NONE
        .with(ExternalToken::RawStringDelimiter)
        .with(ExternalToken::RawStringContent);

    #[must_use]
    pub const fn with(self, token: ExternalToken) -> Self {
        ValidTokenSet(self.0 | (1 << token as u8))
    }

    pub const fn contains(&self, token: ExternalToken) -> bool {
        (self.0 & (1 << token as u8)) != 0
    }
}

/// A successful external match: the token kind and how many bytes it spans.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct RawMatch {
    pub kind: TokenKind,
    pub len: u32,
}

/// Recognizer state between calls.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
enum Phase {
    /// Not inside a raw string.
    Idle,
    /// Opening delimiter consumed; tag recorded as a span into the source.
    Content { tag_start: u32, tag_len: u32 },
    /// Content consumed; the exact close sequence is next.
    Close { tag_len: u32 },
}

/// Stateful scanner for raw string literals.
#[derive(Clone, Copy, Debug)]
pub struct RawStringScanner {
    phase: Phase,
}

impl Default for RawStringScanner {
    fn default() -> Self {
        RawStringScanner::new()
    }
}

impl RawStringScanner {
    pub fn new() -> Self {
        RawStringScanner { phase: Phase::Idle }
    }

    /// Whether a raw string is partially consumed.
    pub fn in_progress(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Abandon a partially consumed literal (after a no-match).
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Attempt to match the next raw-string token at the cursor.
    ///
    /// Only token kinds present in `valid` are attempted. On a match the
    /// cursor is advanced past the token and the phase moves forward; on a
    /// no-match the phase resets and the cursor is left at the furthest
    /// consumed position (EOF for an unterminated literal), so the caller
    /// can bound an error token by the consumed prefix.
    pub fn try_match(&mut self, cursor: &mut Cursor<'_>, valid: ValidTokenSet) -> Option<RawMatch> {
        match self.phase {
            Phase::Idle => self.open_delimiter(cursor, valid),
            Phase::Content { tag_start, tag_len } => {
                self.content(cursor, valid, tag_start, tag_len)
            }
            Phase::Close { tag_len } => self.close_delimiter(cursor, valid, tag_len),
        }
    }

    /// Match `R"tag(` at the cursor. The cursor must be at the `R`.
    fn open_delimiter(
        &mut self,
        cursor: &mut Cursor<'_>,
        valid: ValidTokenSet,
    ) -> Option<RawMatch> {
        if !valid.contains(ExternalToken::RawStringDelimiter) {
            return None;
        }
        if cursor.current() != b'R' || cursor.peek() != b'"' {
            return None;
        }

        // Tag: 0..=16 bytes between `"` and `(`, none of which may be a
        // space, parenthesis, backslash, or control character.
        let tag_start = cursor.pos() + 2;
        let mut tag_len = 0;
        loop {
            let byte = cursor.peek_at(2 + tag_len);
            if byte == b'(' {
                break;
            }
            if tag_len >= MAX_TAG_LEN || !is_tag_byte(byte) {
                return None;
            }
            tag_len += 1;
        }

        let len = 2 + tag_len + 1;
        cursor.advance_n(len);
        self.phase = Phase::Content { tag_start, tag_len };
        Some(RawMatch {
            kind: TokenKind::RawStringDelimiter,
            len,
        })
    }

    /// Match everything up to (not including) `)` + tag + `"`.
    fn content(
        &mut self,
        cursor: &mut Cursor<'_>,
        valid: ValidTokenSet,
        tag_start: u32,
        tag_len: u32,
    ) -> Option<RawMatch> {
        if !valid.contains(ExternalToken::RawStringContent) {
            self.phase = Phase::Idle;
            return None;
        }
        let start = cursor.pos();
        let tag = cursor.slice(tag_start, tag_start + tag_len);

        loop {
            if !cursor.eat_until_byte(b')') {
                // EOF before the close sequence: no-match, cursor left at
                // the furthest consumed position.
                self.phase = Phase::Idle;
                return None;
            }
            let candidate_start = cursor.pos() + 1;
            let candidate = cursor.slice(candidate_start, candidate_start + tag_len);
            if candidate == tag && cursor.peek_at(1 + tag_len) == b'"' {
                let len = cursor.pos() - start;
                self.phase = Phase::Close { tag_len };
                return Some(RawMatch {
                    kind: TokenKind::RawStringContent,
                    len,
                });
            }
            // A `)` that does not begin the close sequence is content.
            cursor.advance();
        }
    }

    /// Match `)tag"`. The cursor sits on the `)` after a content match.
    fn close_delimiter(
        &mut self,
        cursor: &mut Cursor<'_>,
        valid: ValidTokenSet,
        tag_len: u32,
    ) -> Option<RawMatch> {
        if !valid.contains(ExternalToken::RawStringDelimiter) {
            self.phase = Phase::Idle;
            return None;
        }
        let len = 1 + tag_len + 1;
        cursor.advance_n(len);
        self.phase = Phase::Idle;
        Some(RawMatch {
            kind: TokenKind::RawStringDelimiter,
            len,
        })
    }
}

/// Bytes allowed in a delimiter tag: printable, excluding space,
/// parentheses, and backslash.
#[inline]
pub(crate) fn is_tag_byte(byte: u8) -> bool {
    byte.is_ascii_graphic() && !matches!(byte, b'(' | b')' | b'\\')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceBuffer;
    use pretty_assertions::assert_eq;

    fn match_all(source: &str) -> Vec<(TokenKind, String)> {
        let buf = SourceBuffer::new(source);
        let mut cursor = buf.cursor();
        let mut scanner = RawStringScanner::new();
        let mut out = Vec::new();
        loop {
            let start = cursor.pos();
            match scanner.try_match(&mut cursor, ValidTokenSet::ALL) {
                Some(m) => {
                    out.push((m.kind, cursor.slice(start, start + m.len).to_string()));
                    if !scanner.in_progress() {
                        break;
                    }
                }
                None => break,
            }
        }
        out
    }

    #[test]
    fn plain_raw_string() {
        let pieces = match_all("R\"(hello)\"");
        assert_eq!(
            pieces,
            vec![
                (TokenKind::RawStringDelimiter, "R\"(".to_string()),
                (TokenKind::RawStringContent, "hello".to_string()),
                (TokenKind::RawStringDelimiter, ")\"".to_string()),
            ]
        );
    }

    #[test]
    fn tagged_raw_string_skips_false_closes() {
        // The content contains `)`, `)tag` without a quote, and a close
        // sequence with the wrong tag; none of them terminate the literal.
        let source = "R\"tag(any ) content not matching )tag x or )gat\")tag\"";
        let pieces = match_all(source);
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[0].1, "R\"tag(");
        assert_eq!(pieces[1].1, "any ) content not matching )tag x or )gat\"");
        assert_eq!(pieces[2].1, ")tag\"");
    }

    #[test]
    fn close_is_the_first_exact_match() {
        // Per the C++ grammar the literal ends at the first `)tag"`, even
        // when another one follows.
        let pieces = match_all("R\"tag(left)tag\")tag\"");
        assert_eq!(pieces[1].1, "left");
        assert_eq!(pieces[2].1, ")tag\"");
    }

    #[test]
    fn empty_content() {
        let pieces = match_all("R\"()\"");
        assert_eq!(pieces[1], (TokenKind::RawStringContent, String::new()));
    }

    #[test]
    fn unterminated_is_no_match_with_consumed_prefix() {
        let buf = SourceBuffer::new("R\"tag(never closed");
        let mut cursor = buf.cursor();
        let mut scanner = RawStringScanner::new();
        let open = scanner.try_match(&mut cursor, ValidTokenSet::ALL);
        assert!(open.is_some());
        let content = scanner.try_match(&mut cursor, ValidTokenSet::ALL);
        assert_eq!(content, None);
        // Cursor consumed everything: the caller bounds the error token.
        assert!(cursor.is_eof());
        assert!(!scanner.in_progress());
    }

    #[test]
    fn tag_over_sixteen_chars_is_no_match() {
        let source = "R\"aaaaaaaaaaaaaaaaa(x)aaaaaaaaaaaaaaaaa\"";
        let buf = SourceBuffer::new(source);
        let mut cursor = buf.cursor();
        let mut scanner = RawStringScanner::new();
        assert_eq!(scanner.try_match(&mut cursor, ValidTokenSet::ALL), None);
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn sixteen_char_tag_matches() {
        let tag = "abcdefghijklmnop";
        let source = format!("R\"{tag}(x){tag}\"");
        let pieces = match_all(&source);
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[1].1, "x");
    }

    #[test]
    fn tag_with_space_is_no_match() {
        let buf = SourceBuffer::new("R\"a b(x)a b\"");
        let mut cursor = buf.cursor();
        let mut scanner = RawStringScanner::new();
        assert_eq!(scanner.try_match(&mut cursor, ValidTokenSet::ALL), None);
    }

    #[test]
    fn disabled_valid_set_refuses_match() {
        let buf = SourceBuffer::new("R\"(hello)\"");
        let mut cursor = buf.cursor();
        let mut scanner = RawStringScanner::new();
        assert_eq!(scanner.try_match(&mut cursor, ValidTokenSet::NONE), None);
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn close_candidate_shorter_than_tag_at_eof() {
        // Ends with `)ta` — a prefix of the tag, then EOF.
        let buf = SourceBuffer::new("R\"tag(stuff)ta");
        let mut cursor = buf.cursor();
        let mut scanner = RawStringScanner::new();
        assert!(scanner.try_match(&mut cursor, ValidTokenSet::ALL).is_some());
        assert_eq!(scanner.try_match(&mut cursor, ValidTokenSet::ALL), None);
        assert!(cursor.is_eof());
    }
}
