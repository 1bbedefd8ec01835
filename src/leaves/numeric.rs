//! Numeric literals embedded in leaf records.
//!
//! CodeView stores constants such as enumerator values, member offsets and structure sizes as
//! *numeric leaves*: a `u16` tag optionally followed by a fixed-width payload.
//!
//! - A tag below [`LF_NUMERIC`] (`0x8000`) **is** the value. Nothing else is consumed. This is by
//!   far the most common form, every offset or enumerator below 32768 is stored this way.
//! - Otherwise the tag selects the width and signedness of the little-endian payload that
//!   follows.
//!
//! | Tag      | Name           | Payload               |
//! |----------|----------------|-----------------------|
//! | `0x8000` | `LF_CHAR`      | 1 byte                |
//! | `0x8001` | `LF_SHORT`     | `i16`                 |
//! | `0x8002` | `LF_USHORT`    | `u16`                 |
//! | `0x8003` | `LF_LONG`      | `i32`                 |
//! | `0x8004` | `LF_ULONG`     | `u32`                 |
//! | `0x8009` | `LF_QUADWORD`  | `i64`                 |
//! | `0x800a` | `LF_UQUADWORD` | `u64`                 |
//!
//! Any other tag at or above `0x8000` (reals, variable length strings, 128-bit integers, or
//! plain garbage) decodes to [`NumericLiteral::Unsupported`], which evaluates to zero and keeps
//! the tag around for callers that want to be strict about it. The surrounding record keeps
//! decoding; only [`crate::leaves::ReaderConfig::strict_numeric_tags`] turns this into an error.
//!
//! # Examples
//!
//! ```rust
//! use cvleaf::{Parser, leaves::{read_numeric, NumericLiteral}};
//!
//! let mut parser = Parser::new(&[0x03, 0x00]);
//! assert_eq!(read_numeric(&mut parser)?, NumericLiteral::Immediate(3));
//! assert_eq!(parser.pos(), 2);
//!
//! let mut parser = Parser::new(&[0x01, 0x80, 0xFE, 0xFF]);
//! assert_eq!(read_numeric(&mut parser)?.as_i64(), Some(-2));
//! # Ok::<(), cvleaf::Error>(())
//! ```

use std::fmt;

use crate::{file::parser::Parser, Result};

/// First tag value that does not encode its value directly
pub const LF_NUMERIC: u16 = 0x8000;
/// 8-bit character payload (shares its value with [`LF_NUMERIC`])
pub const LF_CHAR: u16 = 0x8000;
/// Signed 16-bit payload
pub const LF_SHORT: u16 = 0x8001;
/// Unsigned 16-bit payload
pub const LF_USHORT: u16 = 0x8002;
/// Signed 32-bit payload
pub const LF_LONG: u16 = 0x8003;
/// Unsigned 32-bit payload
pub const LF_ULONG: u16 = 0x8004;
/// Signed 64-bit payload
pub const LF_QUADWORD: u16 = 0x8009;
/// Unsigned 64-bit payload
pub const LF_UQUADWORD: u16 = 0x800a;

/// A decoded numeric leaf.
///
/// The variant records the encoding that was found in the stream; the `as_*` accessors convert
/// to a common integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericLiteral {
    /// Value stored directly in the tag (always `< 0x8000`)
    Immediate(u32),
    /// `LF_CHAR`
    Char(u8),
    /// `LF_SHORT`
    Short(i16),
    /// `LF_USHORT`
    UShort(u16),
    /// `LF_LONG`
    Long(i32),
    /// `LF_ULONG`
    ULong(u32),
    /// `LF_QUADWORD`
    QuadWord(i64),
    /// `LF_UQUADWORD`
    UQuadWord(u64),
    /// A reserved tag without a supported payload width. Evaluates to zero.
    Unsupported(u16),
}

impl NumericLiteral {
    /// The literal as a 128-bit signed integer, which holds every supported encoding losslessly.
    #[must_use]
    pub fn as_i128(&self) -> i128 {
        match *self {
            NumericLiteral::Immediate(value) | NumericLiteral::ULong(value) => i128::from(value),
            NumericLiteral::Char(value) => i128::from(value),
            NumericLiteral::Short(value) => i128::from(value),
            NumericLiteral::UShort(value) => i128::from(value),
            NumericLiteral::Long(value) => i128::from(value),
            NumericLiteral::QuadWord(value) => i128::from(value),
            NumericLiteral::UQuadWord(value) => i128::from(value),
            NumericLiteral::Unsupported(_) => 0,
        }
    }

    /// The literal as `u64`, or `None` if it is negative.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        u64::try_from(self.as_i128()).ok()
    }

    /// The literal as `i64`, or `None` if it does not fit (large `LF_UQUADWORD` values).
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        i64::try_from(self.as_i128()).ok()
    }

    /// The literal as `u32`, or `None` if it is negative or too large.
    ///
    /// Member offsets and aggregate sizes are read through this.
    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        u32::try_from(self.as_i128()).ok()
    }

    /// `LF_CHAR` payloads as a character.
    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        match *self {
            NumericLiteral::Char(value) => Some(char::from(value)),
            _ => None,
        }
    }

    /// Returns `true` if the literal was stored with its value in the tag.
    #[must_use]
    pub fn is_immediate(&self) -> bool {
        matches!(self, NumericLiteral::Immediate(_))
    }

    /// Returns `true` for reserved tags that were decoded as the zero fallback.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        !matches!(self, NumericLiteral::Unsupported(_))
    }

    /// Number of bytes this literal occupies in the stream, tag included.
    ///
    /// For [`NumericLiteral::Unsupported`] only the tag was consumed.
    #[must_use]
    pub fn encoded_size(&self) -> usize {
        2 + match self {
            NumericLiteral::Immediate(_) | NumericLiteral::Unsupported(_) => 0,
            NumericLiteral::Char(_) => 1,
            NumericLiteral::Short(_) | NumericLiteral::UShort(_) => 2,
            NumericLiteral::Long(_) | NumericLiteral::ULong(_) => 4,
            NumericLiteral::QuadWord(_) | NumericLiteral::UQuadWord(_) => 8,
        }
    }
}

impl Default for NumericLiteral {
    fn default() -> Self {
        NumericLiteral::Immediate(0)
    }
}

impl fmt::Display for NumericLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericLiteral::Char(value) => write!(f, "'{}'", char::from(*value)),
            NumericLiteral::Unsupported(tag) => write!(f, "0 (unsupported tag 0x{tag:04x})"),
            _ => write!(f, "{}", self.as_i128()),
        }
    }
}

/// Decodes one numeric leaf at the current position.
///
/// Consumes exactly the tag plus the payload width the tag selects. Reserved tags without a
/// supported width consume only the tag and yield [`NumericLiteral::Unsupported`].
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the tag or its payload is truncated.
pub fn read_numeric(parser: &mut Parser<'_>) -> Result<NumericLiteral> {
    let tag = parser.read_le::<u16>()?;
    if tag < LF_NUMERIC {
        return Ok(NumericLiteral::Immediate(u32::from(tag)));
    }

    Ok(match tag {
        LF_CHAR => NumericLiteral::Char(parser.read_le::<u8>()?),
        LF_SHORT => NumericLiteral::Short(parser.read_le::<i16>()?),
        LF_USHORT => NumericLiteral::UShort(parser.read_le::<u16>()?),
        LF_LONG => NumericLiteral::Long(parser.read_le::<i32>()?),
        LF_ULONG => NumericLiteral::ULong(parser.read_le::<u32>()?),
        LF_QUADWORD => NumericLiteral::QuadWord(parser.read_le::<i64>()?),
        LF_UQUADWORD => NumericLiteral::UQuadWord(parser.read_le::<u64>()?),
        _ => NumericLiteral::Unsupported(tag),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn immediate_values() {
        for value in [0_u16, 1, 3, 0x1234, 0x7FFF] {
            let bytes = value.to_le_bytes();
            let mut parser = Parser::new(&bytes);

            let literal = read_numeric(&mut parser).unwrap();
            assert_eq!(literal, NumericLiteral::Immediate(u32::from(value)));
            assert_eq!(parser.pos(), 2);
            assert!(literal.is_immediate());
        }
    }

    #[test]
    fn wide_values() {
        let test_cases: Vec<(Vec<u8>, NumericLiteral, i128)> = vec![
            (vec![0x00, 0x80, 0x41], NumericLiteral::Char(0x41), 0x41),
            (vec![0x01, 0x80, 0x00, 0x80], NumericLiteral::Short(i16::MIN), -32768),
            (vec![0x02, 0x80, 0xFF, 0xFF], NumericLiteral::UShort(u16::MAX), 65535),
            (
                vec![0x03, 0x80, 0xFF, 0xFF, 0xFF, 0xFF],
                NumericLiteral::Long(-1),
                -1,
            ),
            (
                vec![0x04, 0x80, 0x00, 0x00, 0x01, 0x00],
                NumericLiteral::ULong(0x10000),
                0x10000,
            ),
            (
                vec![0x09, 0x80, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
                NumericLiteral::QuadWord(-2),
                -2,
            ),
            (
                vec![0x0A, 0x80, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
                NumericLiteral::UQuadWord(u64::MAX),
                i128::from(u64::MAX),
            ),
        ];

        for (input, expected, value) in test_cases {
            let mut parser = Parser::new(&input);
            let literal = read_numeric(&mut parser).unwrap();

            assert_eq!(literal, expected);
            assert_eq!(literal.as_i128(), value);
            assert_eq!(parser.pos(), input.len());
            assert_eq!(literal.encoded_size(), input.len());
        }
    }

    #[test]
    fn wide_values_leave_trailing_bytes() {
        let data = [0x02, 0x80, 0x34, 0x12, 0xAA, 0xBB];
        let mut parser = Parser::new(&data);

        assert_eq!(
            read_numeric(&mut parser).unwrap(),
            NumericLiteral::UShort(0x1234)
        );
        assert_eq!(parser.remaining(), 2);
    }

    #[test]
    fn unsupported_tag_is_zero() {
        // LF_REAL32 followed by what would be its payload
        let data = [0x05, 0x80, 0x00, 0x00, 0x80, 0x3F];
        let mut parser = Parser::new(&data);

        let literal = read_numeric(&mut parser).unwrap();
        assert_eq!(literal, NumericLiteral::Unsupported(0x8005));
        assert_eq!(literal.as_i128(), 0);
        assert_eq!(literal.as_u64(), Some(0));
        assert!(!literal.is_supported());
        assert_eq!(parser.pos(), 2);
    }

    #[test]
    fn truncated_payload() {
        let mut parser = Parser::new(&[0x04, 0x80, 0x01, 0x02]);
        assert!(matches!(read_numeric(&mut parser), Err(Error::OutOfBounds)));

        let mut parser = Parser::new(&[0x01]);
        assert!(matches!(read_numeric(&mut parser), Err(Error::OutOfBounds)));
    }

    #[test]
    fn conversions() {
        assert_eq!(NumericLiteral::Short(-5).as_u64(), None);
        assert_eq!(NumericLiteral::Short(-5).as_i64(), Some(-5));
        assert_eq!(NumericLiteral::UQuadWord(u64::MAX).as_i64(), None);
        assert_eq!(NumericLiteral::ULong(7).as_u32(), Some(7));
        assert_eq!(NumericLiteral::Char(b'x').as_char(), Some('x'));
        assert_eq!(NumericLiteral::Immediate(3).as_char(), None);
        assert_eq!(NumericLiteral::Long(-3).to_string(), "-3");
        assert_eq!(NumericLiteral::Char(b'A').to_string(), "'A'");
    }
}
