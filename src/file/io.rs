//! Little-endian primitive decoding for CodeView records.
//!
//! Every multi-byte field in a TPI/IPI stream is stored little-endian. This module provides the
//! [`CvIO`] trait that abstracts over the fixed-width primitives the leaf decoders read, plus
//! the free functions [`read_le`] and [`read_le_at`] that perform bounds-checked reads at a
//! caller-maintained offset.
//!
//! The functions never panic: a read that would run past the end of the slice returns
//! [`crate::Error::OutOfBounds`] and leaves the offset untouched.
//!
//! # Examples
//!
//! ```rust
//! use cvleaf::file::io::read_le_at;
//!
//! let data = [0x02, 0x10, 0x10, 0x00, 0x00, 0x00];
//! let mut offset = 0;
//!
//! let kind = read_le_at::<u16>(&data, &mut offset)?;
//! let pointee = read_le_at::<u32>(&data, &mut offset)?;
//! assert_eq!(kind, 0x1002);
//! assert_eq!(pointee, 0x10);
//! assert_eq!(offset, 6);
//! # Ok::<(), cvleaf::Error>(())
//! ```

use crate::{Error::OutOfBounds, Result};

/// Trait for fixed-width primitives that can be decoded from raw CodeView bytes.
///
/// The associated `Bytes` type is the exact-size byte array for the primitive, which lets
/// [`read_le_at`] convert a sub-slice with a single `try_into`.
pub trait CvIO: Sized {
    /// Exact-size byte array backing this primitive
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Decode `Self` from little-endian bytes
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_cvio {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CvIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_cvio!(u8, i8, u16, i16, u32, i32, u64, i64);

/// Reads a `T` from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn read_le<T: CvIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Reads a `T` at `offset` and advances `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_le_at<T: CvIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };

    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}
