use thiserror::Error;

use crate::leaves::TypeIndex;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors produced while decoding a leaf are always local to that single record. Stream level
/// iteration reports them per record and carries on with the next one, so a caller never loses
/// the records surrounding a broken one.
///
/// # Error Categories
///
/// ## Decoding Errors
/// - [`Error::OutOfBounds`] - A length or width field demanded more bytes than remain
/// - [`Error::Malformed`] - Structurally invalid data (strict numeric tag, oversized count, ...)
/// - [`Error::RecursionLimit`] - Nested field lists exceeded the configured depth
///
/// ## Stream Errors
/// - [`Error::InvalidStreamHeader`] - The TPI/IPI header failed validation
/// - [`Error::TypeNotFound`] - A type index outside of the stream was requested
/// - [`Error::TypeIndexReassigned`] - A leaf was renumbered a second time
///
/// ## I/O Errors
/// - [`Error::Empty`] - Empty input provided
/// - [`Error::FileError`] - Filesystem I/O errors
///
/// # Examples
///
/// ```rust
/// use cvleaf::{Error, Parser, leaves::{read_leaf, LeafReaderContext, TypeIndex}};
///
/// // Length prefix claims 8 bytes, only 2 follow
/// let data = [0x08, 0x00, 0x02, 0x10];
/// let context = LeafReaderContext::default();
///
/// match read_leaf(&context, TypeIndex(0x1000), &mut Parser::new(&data)) {
///     Err(Error::OutOfBounds) => println!("record is truncated"),
///     Err(e) => println!("other error: {e}"),
///     Ok(leaf) => println!("decoded {:?}", leaf.kind()),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The data is structurally invalid.
    ///
    /// Carries the source location that detected the problem to ease debugging of
    /// hand-crafted or fuzzed inputs.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing.
    ///
    /// Reading past the end of a forked record window also ends up here, which is what keeps
    /// an overrunning record from touching its neighbours.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// Provided input was empty
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Other errors that don't fit specific categories
    #[error("{0}")]
    Error(String),

    /// The TPI/IPI stream header is invalid
    #[error("Invalid type stream header - {0}")]
    InvalidStreamHeader(&'static str),

    /// The requested type index is not part of the stream
    #[error("Failed to find type in stream - {0}")]
    TypeNotFound(TypeIndex),

    /// A leaf was renumbered more than once
    #[error("The type index of leaf {0} has already been reassigned")]
    TypeIndexReassigned(TypeIndex),

    /// Nested leaf dispatch went deeper than the configured limit
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}
