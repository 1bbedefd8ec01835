//! Byte sources and low-level reading primitives.
//!
//! This module holds everything below the leaf decoders: where the stream bytes live and how
//! they are read.
//!
//! # Key Components
//!
//! - [`Backend`] - Abstraction over a resident, read-only byte buffer
//! - [`File`] - Owner of a backend, created from a path (memory mapped) or from a `Vec<u8>`
//! - [`parser::Parser`] - Bounds-checked cursor with forking, used by every leaf decoder
//! - [`io`] - Little-endian primitive decoding
//!
//! The buffer behind a [`File`] is immutable for its whole lifetime, which is what allows any
//! number of [`parser::Parser`] instances (and threads) to read it at the same time.
//!
//! # Examples
//!
//! ```rust
//! use cvleaf::file::File;
//!
//! let file = File::from_mem(vec![0x02, 0x00, 0x0A, 0x00])?;
//! assert_eq!(file.len(), 4);
//! assert_eq!(file.data_slice(2, 2)?, &[0x0A, 0x00]);
//! # Ok::<(), cvleaf::Error>(())
//! ```

pub mod io;
pub mod parser;

mod memory;
mod physical;

use std::path::Path;

use crate::{Error::Empty, Result};
use memory::Memory;
use physical::Physical;

/// Read-only access to a fully resident byte buffer.
///
/// Implementations must be `Send + Sync`; decoding of the TPI and IPI streams of the same
/// database may happen on different threads over one shared backend.
pub trait Backend: Send + Sync {
    /// Returns `len` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the buffer.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the complete buffer.
    fn data(&self) -> &[u8];

    /// Returns the buffer size in bytes.
    fn len(&self) -> usize;
}

/// Owner of the raw bytes of a type stream.
pub struct File {
    data: Box<dyn Backend>,
}

impl File {
    /// Memory maps the stream dump at `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened, or
    /// [`crate::Error::Empty`] if it holds no data.
    pub fn from_file(path: &Path) -> Result<File> {
        let input = Physical::new(path)?;

        Self::load(input)
    }

    /// Takes ownership of an in-memory buffer.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] if `data` is empty.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        Ok(File {
            data: Box::new(data),
        })
    }

    /// Returns the complete buffer.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data.data()
    }

    /// Returns `len` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the buffer.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.data.data_slice(offset, len)
    }

    /// Returns the buffer size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer holds no data. Never the case for a loaded file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.len() == 0
    }
}
