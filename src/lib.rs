// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # cvleaf
//!
//! A decoder for CodeView leaf records, the type records stored in the TPI and IPI streams of
//! Microsoft PDB files.
//!
//! Every type a compiler emits into a PDB (classes, enums, pointers, function signatures, member
//! lists, ...) is stored as a length-prefixed, tag-dispatched *leaf*. `cvleaf` turns those bytes
//! into typed Rust values without resolving anything eagerly: records refer to each other by
//! [`leaves::TypeIndex`], and materialization happens on demand.
//!
//! ## Features
//!
//! - **Bounded decoding** - every record is decoded inside its own window; a broken record
//!   never affects its neighbours
//! - **Lenient by default** - unknown leaf kinds and numeric encodings degrade into opaque or
//!   zero-valued data and are reported through [`leaves::Diagnostics`]
//! - **Lazy and memoized** - [`stream::TypeStream`] frames a stream in one cheap pass and
//!   decodes records only when asked for them
//! - **Parallel** - whole streams can be decoded with rayon
//! - **Zero-copy input** - memory mapped files or owned buffers through [`file::File`]
//!
//! ## Quick Start
//!
//! ```rust
//! use cvleaf::prelude::*;
//!
//! // LF_ENUMERATE "Red" = 3, as found inside a field list
//! let payload = [0x02, 0x15, 0x03, 0x00, 0x03, 0x00, b'R', b'e', b'd', 0x00];
//! let context = LeafReaderContext::default();
//!
//! let leaf = read_leaf_no_header(&context, TypeIndex::NONE, &mut Parser::new(&payload))?;
//! assert_eq!(leaf.kind(), LeafKind::Enumerate);
//! assert_eq!(leaf.name(), Some("Red"));
//! # Ok::<(), cvleaf::Error>(())
//! ```
//!
//! ### Reading a whole stream
//!
//! ```rust,no_run
//! use cvleaf::prelude::*;
//! use std::path::Path;
//!
//! let source = TypeStreamSource::from_file(Path::new("tpi.bin"), ReaderConfig::default())?;
//! let stream = source.stream()?;
//!
//! for leaf in stream.iter().flatten() {
//!     if let Some(name) = leaf.name() {
//!         println!("{} {:?} {}", leaf.type_index(), leaf.kind(), name);
//!     }
//! }
//!
//! for diagnostic in source.diagnostics().iter() {
//!     eprintln!("{diagnostic}");
//! }
//! # Ok::<(), cvleaf::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`file`] - Byte sources ([`file::File`], memory mapped or owned) and the [`Parser`] cursor
//! - [`leaves`] - Numeric literals, record framing, kind dispatch and every leaf variant
//! - [`stream`] - The TPI/IPI header and indexed access to a stream's records
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events: undecoded kinds and numeric
//! fallbacks at `debug`, records failing during stream iteration at `warn`. No subscriber is
//! installed.

#[macro_use]
pub(crate) mod error;

/// Byte sources and the bounds-checked [`Parser`].
pub mod file;

/// CodeView leaf records and their decoders.
///
/// # Examples
///
/// ```rust
/// use cvleaf::{Parser, leaves::{read_leaf, LeafKind, LeafReaderContext, TypeIndex}};
///
/// // A framed LF_POINTER record to `int`
/// let record = [0x0a, 0x00, 0x02, 0x10, 0x74, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
/// let leaf = read_leaf(&LeafReaderContext::default(), TypeIndex(0x1050), &mut Parser::new(&record))?;
///
/// assert_eq!(leaf.kind(), LeafKind::Pointer);
/// assert_eq!(leaf.type_index(), TypeIndex(0x1050));
/// # Ok::<(), cvleaf::Error>(())
/// ```
pub mod leaves;

/// TPI and IPI type streams.
pub mod stream;

/// Convenient re-exports of the most commonly used types and functions.
///
/// ```rust
/// use cvleaf::prelude::*;
///
/// let context = LeafReaderContext::new(ReaderConfig::strict());
/// assert!(context.config().strict_numeric_tags);
/// ```
pub mod prelude;

/// `cvleaf` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `cvleaf` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use cvleaf::{Error, Parser, leaves::{read_leaf, LeafReaderContext, TypeIndex}};
///
/// match read_leaf(&LeafReaderContext::default(), TypeIndex(0x1000), &mut Parser::new(&[0x04])) {
///     Ok(leaf) => println!("decoded {:?}", leaf.kind()),
///     Err(Error::OutOfBounds) => println!("truncated record"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

/// Bounds-checked cursor used by every decoder.
///
/// See [`file::parser::Parser`] for details.
pub use file::parser::Parser;

/// Owned or memory mapped input buffer.
///
/// See [`file::File`] for details.
pub use file::File;
