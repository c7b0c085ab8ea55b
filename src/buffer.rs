//! The bounded lookahead buffer of the scanner and the character source it reads from.

use std::collections::VecDeque;
use std::io::{BufRead, ErrorKind};

use crate::{LexGenError, LexGenErrorKind, Result};

/// Decodes the UTF-8 characters of a buffered reader one at a time.
#[derive(Debug)]
pub(crate) struct CharReader<R> {
    reader: R,
}

impl<R: BufRead> CharReader<R> {
    pub(crate) fn new(reader: R) -> Self {
        CharReader { reader }
    }

    fn unavailable(error: std::io::Error) -> LexGenError {
        LexGenError::new(LexGenErrorKind::SourceUnavailable(error))
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        loop {
            match self.reader.fill_buf() {
                Ok([]) => return Ok(None),
                Ok(buf) => {
                    let byte = buf[0];
                    self.reader.consume(1);
                    return Ok(Some(byte));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Self::unavailable(e)),
            }
        }
    }

    /// Returns the next character or `None` at the end of the input.
    pub(crate) fn next_char(&mut self) -> Result<Option<char>> {
        let Some(first) = self.read_byte()? else {
            return Ok(None);
        };
        let width = match first {
            0x00..=0x7F => return Ok(Some(first as char)),
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(Self::invalid_utf8()),
        };
        let mut bytes = [first, 0, 0, 0];
        for byte in bytes.iter_mut().take(width).skip(1) {
            *byte = self.read_byte()?.ok_or_else(Self::invalid_utf8)?;
        }
        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(Self::invalid_utf8)
    }

    fn invalid_utf8() -> LexGenError {
        Self::unavailable(std::io::Error::new(
            ErrorKind::InvalidData,
            "input is not valid UTF-8",
        ))
    }
}

/// A bounded buffer of characters read ahead of the last committed position.
///
/// Reads are speculative until they are committed. A rewind makes all speculative reads
/// available again, so the scanner can backtrack to the end of the longest match.
#[derive(Debug)]
pub(crate) struct LookaheadBuffer {
    chars: VecDeque<char>,
    // Number of buffered characters handed out since the last rewind
    cursor: usize,
    capacity: usize,
}

impl LookaheadBuffer {
    pub(crate) fn new(capacity: usize) -> Self {
        LookaheadBuffer {
            chars: VecDeque::with_capacity(capacity),
            cursor: 0,
            capacity,
        }
    }

    /// Returns the next uncommitted character. A new character is pulled from the source
    /// only if all buffered characters have already been read.
    pub(crate) fn peek_or_fetch<R: BufRead>(
        &mut self,
        source: &mut CharReader<R>,
    ) -> Result<Option<char>> {
        if let Some(c) = self.chars.get(self.cursor) {
            self.cursor += 1;
            return Ok(Some(*c));
        }
        let next = source.next_char()?;
        if let Some(c) = next {
            if self.chars.len() >= self.capacity {
                return Err(LexGenError::new(LexGenErrorKind::LookaheadExceeded(
                    self.capacity,
                )));
            }
            self.chars.push_back(c);
            self.cursor += 1;
        }
        Ok(next)
    }

    /// Removes the first `count` characters and returns them as the accepted span.
    pub(crate) fn commit(&mut self, count: usize) -> String {
        debug_assert!(count <= self.cursor, "committing unread characters");
        let count = count.min(self.chars.len());
        self.cursor = self.cursor.saturating_sub(count);
        self.chars.drain(..count).collect()
    }

    /// Discards all speculative reads back to the last commit point.
    pub(crate) fn rewind_speculative(&mut self) {
        self.cursor = 0;
    }

    /// The number of characters read since the last commit or rewind.
    pub(crate) fn speculative_len(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(input: &[u8]) -> Result<String> {
        let mut reader = CharReader::new(input);
        let mut text = String::new();
        while let Some(c) = reader.next_char()? {
            text.push(c);
        }
        Ok(text)
    }

    #[test]
    fn test_char_reader() {
        let text = "aε€😀\r\n";
        assert_eq!(read_all(text.as_bytes()).unwrap(), text);
    }

    #[test]
    fn test_char_reader_invalid_utf8() {
        let err = read_all(&[b'a', 0xFF]).unwrap_err();
        assert!(matches!(err.kind(), LexGenErrorKind::SourceUnavailable(_)));
        let err = read_all(&[0xE2, 0x82]).unwrap_err();
        assert!(matches!(err.kind(), LexGenErrorKind::SourceUnavailable(_)));
    }

    #[test]
    fn test_commit_and_rewind() {
        let mut source = CharReader::new("abcd".as_bytes());
        let mut buffer = LookaheadBuffer::new(8);
        assert_eq!(buffer.peek_or_fetch(&mut source).unwrap(), Some('a'));
        assert_eq!(buffer.peek_or_fetch(&mut source).unwrap(), Some('b'));
        assert_eq!(buffer.peek_or_fetch(&mut source).unwrap(), Some('c'));
        assert_eq!(buffer.speculative_len(), 3);
        assert_eq!(buffer.commit(1), "a");
        buffer.rewind_speculative();
        assert_eq!(buffer.speculative_len(), 0);
        // The speculative reads are served from the buffer again
        assert_eq!(buffer.peek_or_fetch(&mut source).unwrap(), Some('b'));
        assert_eq!(buffer.peek_or_fetch(&mut source).unwrap(), Some('c'));
        assert_eq!(buffer.peek_or_fetch(&mut source).unwrap(), Some('d'));
        assert_eq!(buffer.peek_or_fetch(&mut source).unwrap(), None);
        assert_eq!(buffer.commit(3), "bcd");
        assert_eq!(buffer.peek_or_fetch(&mut source).unwrap(), None);
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut source = CharReader::new("abc".as_bytes());
        let mut buffer = LookaheadBuffer::new(2);
        buffer.peek_or_fetch(&mut source).unwrap();
        buffer.peek_or_fetch(&mut source).unwrap();
        let err = buffer.peek_or_fetch(&mut source).unwrap_err();
        assert!(matches!(err.kind(), LexGenErrorKind::LookaheadExceeded(2)));
    }

    #[test]
    fn test_end_of_input_at_full_capacity() {
        let mut source = CharReader::new("ab".as_bytes());
        let mut buffer = LookaheadBuffer::new(2);
        assert_eq!(buffer.peek_or_fetch(&mut source).unwrap(), Some('a'));
        assert_eq!(buffer.peek_or_fetch(&mut source).unwrap(), Some('b'));
        assert_eq!(buffer.peek_or_fetch(&mut source).unwrap(), None);
        assert_eq!(buffer.speculative_len(), 2);
    }
}
