//! Zero-cost cursor over a sentinel-terminated buffer.
//!
//! The cursor advances through the buffer byte-by-byte. EOF is detected
//! when the current byte equals the sentinel (`0x00`) and the position has
//! reached or exceeded the source length. No explicit bounds checking is
//! needed in the common case — the sentinel guarantees safe termination.

/// Zero-cost cursor over a sentinel-terminated byte buffer.
///
/// Created via [`SourceBuffer::cursor()`](crate::SourceBuffer::cursor). The
/// cursor is [`Copy`], so snapshotting for the brace-disambiguation
/// lookahead (bounded to one value, see `rdn_reader`) is a cheap struct copy.
///
/// # Invariant
///
/// `buf` must be sentinel-terminated: `buf[source_len] == 0x00`, and all
/// bytes after `source_len` (cache-line padding) are also `0x00`. This is
/// guaranteed by [`SourceBuffer`](crate::SourceBuffer) construction.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: u32,
    source_len: u32,
}

/// Size assertion: Cursor should be <= 24 bytes on 64-bit platforms.
const _: () = assert!(std::mem::size_of::<Cursor<'static>>() <= 24);

impl<'a> Cursor<'a> {
    /// Create a new cursor at position 0 over a sentinel-terminated buffer.
    pub(crate) fn new(buf: &'a [u8], source_len: u32) -> Self {
        debug_assert!((source_len as usize) < buf.len());
        debug_assert!(buf[source_len as usize] == 0);
        Self {
            buf,
            pos: 0,
            source_len,
        }
    }

    /// Returns the byte at the current position.
    ///
    /// Returns `0x00` at EOF (the sentinel byte). Interior null bytes also
    /// return `0x00`; use [`is_eof()`](Self::is_eof) to distinguish.
    #[inline]
    pub fn current(&self) -> u8 {
        self.buf[self.pos as usize]
    }

    /// Returns the byte one position ahead of current.
    ///
    /// Safe to call at any position: the sentinel and cache-line padding
    /// guarantee valid reads beyond the source content.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.buf[self.pos as usize + 1]
    }

    /// Returns the byte two positions ahead of current.
    #[inline]
    pub fn peek2(&self) -> u8 {
        self.buf[self.pos as usize + 2]
    }

    /// Advance the cursor by one byte.
    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    /// Advance the cursor by `n` bytes.
    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos += n;
    }

    /// Returns `true` if the cursor has reached EOF.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.current() == 0 && self.pos >= self.source_len
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Reposition the cursor to an earlier (or equal) byte offset.
    ///
    /// Used by the one-value bounded lookahead in the brace-disambiguation
    /// state machine: the reader snapshots `pos()` before scanning ahead and
    /// rewinds here once the separator after the first element is known.
    #[inline]
    pub fn set_pos(&mut self, pos: u32) {
        debug_assert!(pos <= self.source_len);
        self.pos = pos;
    }

    /// Length of the source content (excludes sentinel and padding).
    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source_len
    }

    /// Extract a source substring as `&str`.
    ///
    /// # Contract
    ///
    /// `start..end` must fall within the source content and on valid UTF-8
    /// character boundaries. True whenever the range comes from this
    /// cursor's own token-boundary tracking, since the source was originally
    /// valid UTF-8 (`&str`).
    #[allow(
        unsafe_code,
        reason = "from_utf8_unchecked on source originally validated as &str"
    )]
    pub fn slice(&self, start: u32, end: u32) -> &'a str {
        debug_assert!(end <= self.source_len);
        debug_assert!(start <= end);
        // SAFETY: the source buffer was constructed from `&str` (valid
        // UTF-8) and the scanner only ever slices on character boundaries.
        unsafe { std::str::from_utf8_unchecked(&self.buf[start as usize..end as usize]) }
    }

    /// Extract a source substring from `start` to the current position.
    pub fn slice_from(&self, start: u32) -> &'a str {
        self.slice(start, self.pos)
    }

    /// Advance while `pred` returns `true` for the current byte.
    ///
    /// # Contract
    ///
    /// `pred(0)` must return `false`, which holds for every byte-class
    /// predicate used by this crate's scanner.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while pred(self.buf[self.pos as usize]) {
            self.pos += 1;
        }
    }

    /// Returns the number of bytes in the UTF-8 character starting with `byte`.
    #[inline]
    pub fn utf8_char_width(byte: u8) -> u32 {
        match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    /// Advance the cursor past one full UTF-8 character.
    #[inline]
    pub fn advance_char(&mut self) {
        let width = Self::utf8_char_width(self.current());
        self.advance_n(width);
    }

    /// Advance to the next `\n` byte or EOF using SIMD-accelerated search.
    /// Used by the line-comment scanner.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "remaining.len() <= source_len which fits in u32"
    )]
    pub fn eat_until_newline_or_eof(&mut self) {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        if let Some(offset) = memchr::memchr(b'\n', remaining) {
            self.pos += offset as u32;
        } else {
            self.pos = self.source_len;
        }
    }

    /// Advance past ordinary string content to the next interesting byte.
    /// Returns the byte found, or 0 for EOF.
    ///
    /// "Interesting" bytes inside a string body: `"` and `\`. Embedded
    /// control bytes (< 0x20) are not detected here — the raw scanner only
    /// needs the token's extent; the cooking layer walks the decoded body
    /// and rejects unescaped control bytes there.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "remaining.len() <= source_len which fits in u32"
    )]
    pub fn skip_to_string_delim(&mut self) -> u8 {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];

        if let Some(off) = memchr::memchr2(b'"', b'\\', remaining) {
            self.pos += off as u32;
            self.buf[self.pos as usize]
        } else {
            self.pos = self.source_len;
            0
        }
    }

    /// Advance to the next unescaped `/` (regex pattern terminator) or EOF.
    /// Returns the byte found, or 0 for EOF. Treats `\/` as non-terminating.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "remaining.len() <= source_len which fits in u32"
    )]
    pub fn skip_to_regex_delim(&mut self) -> u8 {
        loop {
            let remaining = &self.buf[self.pos as usize..self.source_len as usize];
            match memchr::memchr2(b'/', b'\\', remaining) {
                None => {
                    self.pos = self.source_len;
                    return 0;
                }
                Some(off) => {
                    self.pos += off as u32;
                    let hit = self.buf[self.pos as usize];
                    if hit == b'\\' {
                        // Skip the escape and the byte it protects.
                        self.pos += 2;
                        continue;
                    }
                    return hit;
                }
            }
        }
    }

    /// Advance past horizontal whitespace (space, tab, CR, LF).
    #[inline]
    pub fn eat_whitespace(&mut self) {
        self.eat_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceBuffer;

    #[test]
    fn advance_and_current() {
        let buf = SourceBuffer::new("abc");
        let mut c = buf.cursor();
        assert_eq!(c.current(), b'a');
        c.advance();
        assert_eq!(c.current(), b'b');
        assert_eq!(c.peek(), b'c');
    }

    #[test]
    fn eat_while_stops_at_sentinel() {
        let buf = SourceBuffer::new("aaa");
        let mut c = buf.cursor();
        c.eat_while(|b| b == b'a');
        assert_eq!(c.pos(), 3);
        assert!(c.is_eof());
    }

    #[test]
    fn set_pos_rewinds() {
        let buf = SourceBuffer::new("hello world");
        let mut c = buf.cursor();
        let start = c.pos();
        c.advance_n(5);
        assert_eq!(c.current(), b' ');
        c.set_pos(start);
        assert_eq!(c.current(), b'h');
    }

    #[test]
    fn skip_to_string_delim_finds_quote() {
        let buf = SourceBuffer::new(r#"hello world""#);
        let mut c = buf.cursor();
        let hit = c.skip_to_string_delim();
        assert_eq!(hit, b'"');
        assert_eq!(c.pos() as usize, "hello world".len());
    }

    #[test]
    fn skip_to_regex_delim_treats_escaped_slash_as_literal() {
        let buf = SourceBuffer::new(r"a\/b/i");
        let mut c = buf.cursor();
        let hit = c.skip_to_regex_delim();
        assert_eq!(hit, b'/');
        assert_eq!(c.pos() as usize, r"a\/b".len());
    }

    #[test]
    fn slice_roundtrips_source_text() {
        let buf = SourceBuffer::new("hello world");
        let c = buf.cursor();
        assert_eq!(c.slice(0, 5), "hello");
        assert_eq!(c.slice(6, 11), "world");
    }

    proptest::proptest! {
        #[test]
        fn eat_while_matches_naive_scalar_scan(s in "[a-z ]{0,64}") {
            let buf = SourceBuffer::new(&s);
            let mut c = buf.cursor();
            c.eat_while(|b| b == b' ');
            let expected = s.bytes().take_while(|&b| b == b' ').count() as u32;
            prop_assert_eq!(c.pos(), expected);
        }
    }
}
