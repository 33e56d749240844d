//! Sentinel-terminated source buffer.
//!
//! The buffer appends one `0x00` sentinel byte after the source so the
//! scanner's byte dispatch terminates naturally at EOF without bounds checks
//! in the common path. Interior nulls are distinguished from the sentinel by
//! comparing the position against the source length.

use crate::Cursor;

/// Owned, sentinel-terminated copy of the source text.
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    /// Source bytes followed by a single `0x00` sentinel.
    buf: Vec<u8>,
    /// Length of the actual source content, excluding the sentinel.
    source_len: u32,
}

impl SourceBuffer {
    /// Copy `source` into a sentinel-terminated buffer.
    ///
    /// Sources at or beyond `u32::MAX` bytes are truncated at the last
    /// character boundary below the limit; C++ translation units never get
    /// close in practice.
    pub fn new(source: &str) -> Self {
        let mut len = source.len().min(u32::MAX as usize - 1);
        while len > 0 && !source.is_char_boundary(len) {
            len -= 1;
        }
        let mut buf = Vec::with_capacity(len + 1);
        buf.extend_from_slice(&source.as_bytes()[..len]);
        buf.push(0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "len was clamped below u32::MAX"
        )]
        SourceBuffer {
            buf,
            source_len: len as u32,
        }
    }

    /// Length of the source content in bytes.
    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source_len
    }

    /// A cursor positioned at the start of the buffer.
    #[inline]
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf, self.source_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_sentinel() {
        let buf = SourceBuffer::new("abc");
        assert_eq!(buf.source_len(), 3);
        let cursor = buf.cursor();
        assert_eq!(cursor.current(), b'a');
    }

    #[test]
    fn empty_source_is_immediately_eof() {
        let buf = SourceBuffer::new("");
        assert!(buf.cursor().is_eof());
    }

    #[test]
    fn interior_null_is_not_eof() {
        let buf = SourceBuffer::new("a\0b");
        let mut cursor = buf.cursor();
        cursor.advance();
        assert_eq!(cursor.current(), 0);
        assert!(!cursor.is_eof());
    }
}
