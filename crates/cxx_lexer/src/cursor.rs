//! Byte cursor over a sentinel-terminated buffer.
//!
//! The cursor is `Copy`, so scanner code can snapshot it cheaply before a
//! speculative scan (the raw-string recognizer does this when probing for an
//! opening delimiter). EOF is the sentinel byte at or past the source length.

/// Cursor over a sentinel-terminated byte buffer.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    /// Source bytes plus trailing `0x00` sentinel.
    buf: &'a [u8],
    /// Current read position.
    pos: u32,
    /// Length of the source content (excludes the sentinel).
    source_len: u32,
}

impl<'a> Cursor<'a> {
    /// # Contract
    ///
    /// `buf[source_len]` must be the `0x00` sentinel. Guaranteed by
    /// [`SourceBuffer`](crate::SourceBuffer) construction.
    pub(crate) fn new(buf: &'a [u8], source_len: u32) -> Self {
        debug_assert!((source_len as usize) < buf.len());
        debug_assert_eq!(buf[source_len as usize], 0);
        Self {
            buf,
            pos: 0,
            source_len,
        }
    }

    /// Byte at the current position; `0x00` at EOF.
    #[inline]
    pub fn current(&self) -> u8 {
        self.buf.get(self.pos as usize).copied().unwrap_or(0)
    }

    /// Byte one ahead; `0x00` past the end.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.buf.get(self.pos as usize + 1).copied().unwrap_or(0)
    }

    /// Byte two ahead; `0x00` past the end.
    #[inline]
    pub fn peek2(&self) -> u8 {
        self.buf.get(self.pos as usize + 2).copied().unwrap_or(0)
    }

    /// Byte at `pos + n`; `0x00` past the end.
    #[inline]
    pub fn peek_at(&self, n: u32) -> u8 {
        self.buf
            .get(self.pos as usize + n as usize)
            .copied()
            .unwrap_or(0)
    }

    #[inline]
    pub fn advance(&mut self) {
        self.pos = (self.pos + 1).min(self.source_len);
    }

    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos = self.pos.saturating_add(n).min(self.source_len);
    }

    /// Move back `n` bytes, clamped to the start of the buffer.
    #[inline]
    pub fn rewind_n(&mut self, n: u32) {
        self.pos = self.pos.saturating_sub(n);
    }

    /// EOF: sentinel byte at or past the source length.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source_len
    }

    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source_len
    }

    /// Source substring for `start..end`.
    ///
    /// Boundaries that came from token scanning always land on character
    /// boundaries; anything else yields an empty string rather than a panic.
    pub fn slice(&self, start: u32, end: u32) -> &'a str {
        let end = end.min(self.source_len);
        let start = start.min(end);
        std::str::from_utf8(&self.buf[start as usize..end as usize]).unwrap_or("")
    }

    /// Advance while `pred` holds for the current byte.
    ///
    /// `pred(0)` must be `false` so the sentinel stops the loop.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.pos < self.source_len && pred(self.buf[self.pos as usize]) {
            self.pos += 1;
        }
    }

    /// Advance to the next `\n` or EOF (memchr-accelerated).
    pub fn eat_until_newline_or_eof(&mut self) {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        match memchr::memchr(b'\n', remaining) {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "offset is bounded by source_len which fits in u32"
            )]
            Some(offset) => self.pos += offset as u32,
            None => self.pos = self.source_len,
        }
    }

    /// Advance to the next occurrence of `byte` or EOF (memchr-accelerated).
    /// Returns `true` if the byte was found.
    pub fn eat_until_byte(&mut self, byte: u8) -> bool {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        match memchr::memchr(byte, remaining) {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "offset is bounded by source_len which fits in u32"
            )]
            Some(offset) => {
                self.pos += offset as u32;
                true
            }
            None => {
                self.pos = self.source_len;
                false
            }
        }
    }

    /// Number of bytes in the UTF-8 character beginning with `byte`.
    #[inline]
    pub fn utf8_char_width(byte: u8) -> u32 {
        match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    /// Advance past one full UTF-8 character.
    #[inline]
    pub fn advance_char(&mut self) {
        let width = Self::utf8_char_width(self.current());
        self.advance_n(width);
    }
}

#[cfg(test)]
mod tests {
    use crate::SourceBuffer;

    #[test]
    fn navigation() {
        let buf = SourceBuffer::new("abc");
        let mut cursor = buf.cursor();
        assert_eq!(cursor.current(), b'a');
        assert_eq!(cursor.peek(), b'b');
        assert_eq!(cursor.peek2(), b'c');
        cursor.advance();
        assert_eq!(cursor.current(), b'b');
        cursor.advance_n(2);
        assert!(cursor.is_eof());
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn peek_past_end_returns_zero() {
        let buf = SourceBuffer::new("a");
        let cursor = buf.cursor();
        assert_eq!(cursor.peek(), 0);
        assert_eq!(cursor.peek2(), 0);
        assert_eq!(cursor.peek_at(10), 0);
    }

    #[test]
    fn eat_while_stops_at_sentinel() {
        let buf = SourceBuffer::new("aaa");
        let mut cursor = buf.cursor();
        cursor.eat_while(|b| b == b'a');
        assert_eq!(cursor.pos(), 3);
        assert!(cursor.is_eof());
    }

    #[test]
    fn eat_until_newline() {
        let buf = SourceBuffer::new("// hi\nnext");
        let mut cursor = buf.cursor();
        cursor.eat_until_newline_or_eof();
        assert_eq!(cursor.pos(), 5);
        assert_eq!(cursor.current(), b'\n');
    }

    #[test]
    fn eat_until_byte_found_and_not_found() {
        let buf = SourceBuffer::new("abcdef");
        let mut cursor = buf.cursor();
        assert!(cursor.eat_until_byte(b'd'));
        assert_eq!(cursor.pos(), 3);
        assert!(!cursor.eat_until_byte(b'z'));
        assert!(cursor.is_eof());
    }

    #[test]
    fn slice_is_panic_free() {
        let buf = SourceBuffer::new("hello");
        let cursor = buf.cursor();
        assert_eq!(cursor.slice(0, 5), "hello");
        assert_eq!(cursor.slice(2, 100), "llo");
        assert_eq!(cursor.slice(4, 2), "");
    }

    #[test]
    fn rewind_clamps_at_start() {
        let buf = SourceBuffer::new("abc");
        let mut cursor = buf.cursor();
        cursor.advance_n(2);
        cursor.rewind_n(1);
        assert_eq!(cursor.pos(), 1);
        cursor.rewind_n(10);
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn cursor_is_copy_for_checkpointing() {
        let buf = SourceBuffer::new("abcdef");
        let mut cursor = buf.cursor();
        cursor.advance_n(2);
        let saved = cursor;
        cursor.advance_n(3);
        assert_eq!(saved.pos(), 2);
        assert_eq!(cursor.pos(), 5);
    }
}
