//! Bounds-checked cursor over CodeView record bytes.
//!
//! This module provides the [`crate::file::parser::Parser`] type, the read cursor handed to every
//! leaf decoder. Besides the usual little-endian reads it supports *forking*: carving an
//! independent window of a given length out of the current position, which is how the record
//! framing isolates one record's payload from the rest of the stream.
//!
//! # Architecture
//!
//! A parser is nothing more than a borrowed slice, a position within it and the absolute offset
//! of the slice start inside the enclosing stream. Forks borrow the same underlying buffer, so
//! creating one never copies bytes, and advancing a fork is invisible to its parent and vice
//! versa.
//!
//! # Key Components
//!
//! - [`crate::file::parser::Parser::fork`] - Isolate the next `len` bytes as their own cursor
//! - [`crate::file::parser::Parser::read_le`] - Read primitive types (little-endian)
//! - [`crate::file::parser::Parser::read_cstring`] - Read NUL-terminated names as raw bytes
//! - [`crate::file::parser::Parser::read_string_utf8`] - Read NUL-terminated UTF-8 strings
//! - [`crate::file::parser::Parser::read_to_end`] - Take everything that is left
//! - [`crate::file::parser::Parser::skip_padding`] - Skip `LF_PAD*` alignment bytes
//!
//! # Examples
//!
//! ```rust
//! use cvleaf::Parser;
//!
//! // Two framed records: [len=2][0xAAAA] [len=4][0xBBBB 0xCCCC]
//! let data = [0x02, 0x00, 0xAA, 0xAA, 0x04, 0x00, 0xBB, 0xBB, 0xCC, 0xCC];
//! let mut outer = Parser::new(&data);
//!
//! let len = outer.read_le::<u16>()?;
//! let mut first = outer.fork(len as usize)?;
//! assert_eq!(outer.pos(), 4);
//! assert_eq!(first.read_le::<u16>()?, 0xAAAA);
//! assert!(first.read_le::<u16>().is_err()); // bounded to its own record
//!
//! let len = outer.read_le::<u16>()?;
//! let second = outer.fork(len as usize)?;
//! assert_eq!(second.absolute_pos(), 6);
//! assert!(!outer.has_more_data());
//! # Ok::<(), cvleaf::Error>(())
//! ```

use crate::{
    file::io::{read_le_at, CvIO},
    Error::OutOfBounds,
    Result,
};

/// First byte value of the `LF_PAD0..LF_PAD15` alignment filler.
const LF_PAD0: u8 = 0xF0;

/// A cursor over a window of CodeView bytes.
///
/// The parser maintains an internal position and validates every read against the end of its
/// window. A read that would overrun returns [`crate::Error::OutOfBounds`] without moving the
/// position, so a failed read never leaves the cursor in between two fields.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    /// The window being parsed
    data: &'a [u8],
    /// Current position within the window
    position: usize,
    /// Offset of the window start within the enclosing stream
    base: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::file::parser::Parser`] over a byte slice.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser {
            data,
            position: 0,
            base: 0,
        }
    }

    /// Create a parser whose window starts at `base` bytes into an enclosing stream.
    ///
    /// Only affects [`Parser::absolute_pos`], which diagnostics use to point at the record.
    #[must_use]
    pub fn with_base(data: &'a [u8], base: usize) -> Self {
        Parser {
            data,
            position: 0,
            base,
        }
    }

    /// Returns the length of the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the window holds no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Get the current position within the window.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Get the current position relative to the enclosing stream.
    #[must_use]
    pub fn absolute_pos(&self) -> usize {
        self.base + self.position
    }

    /// Number of bytes left in the window.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Get access to the complete window, including already consumed bytes.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Move the position forward by `step` bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `step` bytes remain.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        if step > self.remaining() {
            return Err(OutOfBounds);
        }

        self.position += step;
        Ok(())
    }

    /// Peek at the next byte without advancing the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the window is exhausted.
    pub fn peek_byte(&self) -> Result<u8> {
        if self.position >= self.data.len() {
            return Err(OutOfBounds);
        }
        Ok(self.data[self.position])
    }

    /// Peek at a value of type `T` without advancing the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading `T` would exceed the window.
    pub fn peek_le<T: CvIO>(&self) -> Result<T> {
        let mut temp_position = self.position;
        read_le_at::<T>(self.data, &mut temp_position)
    }

    /// Read a value of type `T` in little-endian format.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading `T` would exceed the window.
    pub fn read_le<T: CvIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Read `length` raw bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `length` bytes remain.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        if length > self.remaining() {
            return Err(OutOfBounds);
        }

        let bytes = &self.data[self.position..self.position + length];
        self.position += length;
        Ok(bytes)
    }

    /// Consume and return everything left in the window.
    pub fn read_to_end(&mut self) -> &'a [u8] {
        let start = self.position.min(self.data.len());
        self.position = self.data.len();
        &self.data[start..]
    }

    /// Split the next `length` bytes off into an independent parser.
    ///
    /// The fork starts at position 0 of its own window and can never read past `length` bytes.
    /// `self` is advanced past the forked range, so a record decoder working on the fork cannot
    /// influence where the next record starts.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `length` bytes remain; `self` is left
    /// untouched in that case.
    pub fn fork(&mut self, length: usize) -> Result<Parser<'a>> {
        let base = self.absolute_pos();
        let window = self.read_bytes(length)?;

        Ok(Parser::with_base(window, base))
    }

    /// Read the raw bytes of a NUL-terminated string, without the terminator.
    ///
    /// A name running into the end of the window without a terminator is accepted as-is; such
    /// records show up for the last field of a list where the padding was dropped.
    pub fn read_cstring(&mut self) -> &'a [u8] {
        let start = self.position.min(self.data.len());
        let end = self.data[start..]
            .iter()
            .position(|&b| b == 0)
            .map_or(self.data.len(), |terminator| start + terminator);

        self.position = if end < self.data.len() { end + 1 } else { end };
        &self.data[start..end]
    }

    /// Read a NUL-terminated UTF-8 string.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the bytes are not valid UTF-8. The cursor is left
    /// behind the string either way.
    pub fn read_string_utf8(&mut self) -> Result<String> {
        let start = self.absolute_pos();
        let string_data = self.read_cstring();

        std::str::from_utf8(string_data)
            .map(str::to_owned)
            .map_err(|e| {
                malformed_error!(
                    "Invalid UTF-8 string at offset {}-{}: {}",
                    start,
                    start + string_data.len(),
                    e
                )
            })
    }

    /// Skip `LF_PAD0..LF_PAD15` alignment bytes.
    ///
    /// Field list entries are aligned to four bytes. The filler bytes are `0xF0 | n`, and since no
    /// leaf kind has a low byte of `0xF0` or above, the first non-filler byte starts the next
    /// entry.
    pub fn skip_padding(&mut self) {
        while self.position < self.data.len() && self.data[self.position] >= LF_PAD0 {
            self.position += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn read_sequential() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read_le::<u16>().unwrap(), 0x0201);
        assert_eq!(parser.read_le::<u32>().unwrap(), 0x0605_0403);
        assert!(!parser.has_more_data());
        assert!(matches!(parser.read_le::<u8>(), Err(Error::OutOfBounds)));
    }

    #[test]
    fn peek_does_not_advance() {
        let data = [0x02, 0x10];
        let parser = Parser::new(&data);

        assert_eq!(parser.peek_le::<u16>().unwrap(), 0x1002);
        assert_eq!(parser.peek_byte().unwrap(), 0x02);
        assert_eq!(parser.pos(), 0);
    }

    #[test]
    fn fork_is_isolated() {
        let data = [0xAA, 0xBB, 0xCC, 0xDD, 0xEE];
        let mut outer = Parser::new(&data);
        outer.advance_by(1).unwrap();

        let mut fork = outer.fork(2).unwrap();
        assert_eq!(outer.pos(), 3);
        assert_eq!(fork.len(), 2);
        assert_eq!(fork.absolute_pos(), 1);

        assert_eq!(fork.read_le::<u8>().unwrap(), 0xBB);
        assert_eq!(outer.pos(), 3);
        assert_eq!(fork.read_le::<u8>().unwrap(), 0xCC);
        assert!(matches!(fork.read_le::<u8>(), Err(Error::OutOfBounds)));

        assert_eq!(outer.read_le::<u8>().unwrap(), 0xDD);
        assert_eq!(fork.pos(), 2);
    }

    #[test]
    fn fork_truncated() {
        let data = [0x01, 0x02, 0x03];
        let mut outer = Parser::new(&data);

        assert!(matches!(outer.fork(4), Err(Error::OutOfBounds)));
        assert_eq!(outer.pos(), 0);

        let empty = outer.fork(0).unwrap();
        assert!(empty.is_empty());
        assert_eq!(outer.pos(), 0);
    }

    #[test]
    fn read_to_end() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut parser = Parser::new(&data);
        parser.advance_by(1).unwrap();

        assert_eq!(parser.read_to_end(), &[0x02, 0x03, 0x04]);
        assert_eq!(parser.read_to_end(), &[] as &[u8]);
    }

    #[test]
    fn read_string() {
        let test_cases: [(&[u8], &str, usize); 4] = [
            (&b"Red\0"[..], "Red", 4),
            (&b"\0"[..], "", 1),
            (&b"Green"[..], "Green", 5),
            (&b"a\0b\0"[..], "a", 2),
        ];

        for (input, expected, consumed) in test_cases {
            let mut parser = Parser::new(input);
            assert_eq!(parser.read_string_utf8().unwrap(), expected);
            assert_eq!(parser.pos(), consumed);
        }
    }

    #[test]
    fn read_cstring_keeps_raw_bytes() {
        let data = [b'S', b't', b'r', b'a', 0xDF, b'e', 0x00, 0x41];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read_cstring(), b"Stra\xDFe");
        assert_eq!(parser.pos(), 7);
        assert_eq!(parser.read_cstring(), b"A");
        assert!(!parser.has_more_data());
    }

    #[test]
    fn read_string_invalid_utf8() {
        let data = [0xC3, 0x28, 0x00];
        let mut parser = Parser::new(&data);
        assert!(matches!(
            parser.read_string_utf8(),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn skip_padding() {
        let data = [0xF3, 0xF2, 0xF1, 0x0D, 0x15];
        let mut parser = Parser::new(&data);

        parser.skip_padding();
        assert_eq!(parser.pos(), 3);
        assert_eq!(parser.read_le::<u16>().unwrap(), 0x150D);

        parser.skip_padding();
        assert!(!parser.has_more_data());
    }
}
