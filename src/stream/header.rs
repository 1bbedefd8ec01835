//! The fixed header in front of the records of a TPI or IPI stream.
//!
//! ```text
//! offset  size  field
//! 0x00    4     version
//! 0x04    4     header size
//! 0x08    4     first type index
//! 0x0c    4     end of type indices (exclusive)
//! 0x10    4     byte size of the record area
//! 0x14    2     hash stream number
//! 0x16    2     auxiliary hash stream number
//! 0x18    4     hash key size
//! 0x1c    4     number of hash buckets
//! 0x20    8     hash values (offset, size)
//! 0x28    8     type index offsets (offset, size)
//! 0x30    8     hash adjusters (offset, size)
//! ```
//!
//! The header size field may announce more than these 56 bytes; newer writers append fields
//! that are skipped.

use crate::{file::parser::Parser, leaves::FIRST_NON_SIMPLE_INDEX, Error, Result};

/// Size of the header fields this crate understands.
pub const TPI_HEADER_SIZE: u32 = 56;

/// Upper bound accepted for the header size field.
const TPI_HEADER_SIZE_MAX: u32 = 1024;

/// `V80`, written by every compiler since Visual C++ 7.0.
pub const TPI_VERSION_V80: u32 = 20_040_203;

/// A region of the hash stream, relative to its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HashSlice {
    /// Byte offset
    pub offset: i32,
    /// Byte length
    pub size: u32,
}

impl HashSlice {
    fn read(parser: &mut Parser<'_>) -> Result<Self> {
        Ok(HashSlice {
            offset: parser.read_le::<i32>()?,
            size: parser.read_le::<u32>()?,
        })
    }
}

/// Header of a TPI or IPI stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TpiStreamHeader {
    /// Format version, normally [`TPI_VERSION_V80`]
    pub version: u32,
    /// Total header size; the records start here
    pub header_size: u32,
    /// Index of the first record
    pub type_index_begin: u32,
    /// One past the index of the last record
    pub type_index_end: u32,
    /// Byte size of the record area
    pub record_bytes: u32,
    /// Stream holding the hash values
    pub hash_stream: u16,
    /// Auxiliary hash stream
    pub hash_aux_stream: u16,
    /// Size of one hash value
    pub hash_key_size: u32,
    /// Number of hash buckets
    pub hash_buckets: u32,
    /// Per-record hash values
    pub hash_values: HashSlice,
    /// Index offset table for binary search
    pub index_offsets: HashSlice,
    /// Hash adjustment table
    pub hash_adjusters: HashSlice,
}

impl TpiStreamHeader {
    /// Reads and validates the header, leaving `parser` on the first record.
    ///
    /// An empty stream stands for a missing TPI/IPI stream and yields an empty header that
    /// describes zero records.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if the header is truncated, or
    /// [`Error::InvalidStreamHeader`] if the header size or the index range is implausible.
    pub fn read(parser: &mut Parser<'_>) -> Result<Self> {
        if parser.is_empty() {
            return Ok(TpiStreamHeader {
                type_index_begin: FIRST_NON_SIMPLE_INDEX,
                type_index_end: FIRST_NON_SIMPLE_INDEX,
                ..Default::default()
            });
        }

        let start = parser.pos();
        let header = TpiStreamHeader {
            version: parser.read_le::<u32>()?,
            header_size: parser.read_le::<u32>()?,
            type_index_begin: parser.read_le::<u32>()?,
            type_index_end: parser.read_le::<u32>()?,
            record_bytes: parser.read_le::<u32>()?,
            hash_stream: parser.read_le::<u16>()?,
            hash_aux_stream: parser.read_le::<u16>()?,
            hash_key_size: parser.read_le::<u32>()?,
            hash_buckets: parser.read_le::<u32>()?,
            hash_values: HashSlice::read(parser)?,
            index_offsets: HashSlice::read(parser)?,
            hash_adjusters: HashSlice::read(parser)?,
        };

        if header.header_size < TPI_HEADER_SIZE {
            return Err(Error::InvalidStreamHeader("header size is impossibly small"));
        }
        if header.header_size > TPI_HEADER_SIZE_MAX {
            return Err(Error::InvalidStreamHeader("header size is unreasonably large"));
        }

        let consumed = parser.pos() - start;
        parser.advance_by(header.header_size as usize - consumed)?;

        if header.type_index_begin < FIRST_NON_SIMPLE_INDEX {
            return Err(Error::InvalidStreamHeader("first type index is below 0x1000"));
        }
        if header.type_index_end < header.type_index_begin {
            return Err(Error::InvalidStreamHeader(
                "type index end is below the first type index",
            ));
        }

        Ok(header)
    }

    /// Number of records announced by the index range.
    #[must_use]
    pub fn record_count(&self) -> usize {
        (self.type_index_end - self.type_index_begin) as usize
    }
}
