//! TPI and IPI type streams.
//!
//! A type stream is a [`TpiStreamHeader`] followed by a dense run of framed leaf records. The
//! first record has index [`TpiStreamHeader::type_index_begin`], each following record the next
//! index. [`TypeStream`] gives indexed and sequential access to these records.
//!
//! # Architecture
//!
//! Construction performs a single framing pass that only reads the length prefixes and records
//! where each record starts. Nothing is decoded at that point. Leaves are materialized:
//!
//! - on demand through [`TypeStream::get`], memoized per index in a `DashMap` so that each
//!   record is decoded at most once even when many threads resolve the same index
//! - in stream order through [`TypeStream::iter`], which decodes without caching and yields one
//!   `Result` per record, so a broken record never hides its neighbours
//! - in parallel through [`TypeStream::par_iter`] and [`TypeStream::par_leaves`]
//!
//! Because record boundaries come from the framing pass and every record is decoded inside its
//! own bounded window, decoding failures are always local to one record.
//!
//! # Examples
//!
//! ```rust
//! use cvleaf::{stream::TypeStream, leaves::{LeafKind, LeafReaderContext, TypeIndex}};
//!
//! // Two records: LF_MODIFIER (const int) and LF_POINTER to it
//! let records = [
//!     0x08, 0x00, 0x01, 0x10, 0x74, 0x00, 0x00, 0x00, 0x01, 0x00,
//!     0x0a, 0x00, 0x02, 0x10, 0x00, 0x10, 0x00, 0x00, 0x0c, 0x00, 0x01, 0x00,
//! ];
//!
//! let stream = TypeStream::from_records(&records, TypeIndex(0x1000), LeafReaderContext::default())?;
//! assert_eq!(stream.len(), 2);
//!
//! let pointer = stream.get(TypeIndex(0x1001))?;
//! assert_eq!(pointer.kind(), LeafKind::Pointer);
//!
//! for leaf in stream.iter() {
//!     println!("{:?}", leaf?.kind());
//! }
//! # Ok::<(), cvleaf::Error>(())
//! ```

mod header;
mod source;

pub use header::{HashSlice, TpiStreamHeader, TPI_HEADER_SIZE, TPI_VERSION_V80};
pub use source::TypeStreamSource;

use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use rayon::prelude::*;

use crate::{
    file::parser::Parser,
    leaves::{
        read_leaf, CodeViewLeaf, DiagnosticCategory, DiagnosticSeverity, LeafReaderContext,
        TypeIndex,
    },
    Error, Result,
};

/// Indexed access to the leaf records of one TPI or IPI stream.
///
/// Borrows the stream bytes; decoded leaves are owned by the stream's cache and handed out as
/// `Arc`s.
pub struct TypeStream<'a> {
    header: TpiStreamHeader,
    records: &'a [u8],
    /// Offset of `records` within the stream
    base: usize,
    /// Start of each record's length prefix within `records`
    offsets: Vec<usize>,
    context: LeafReaderContext,
    cache: DashMap<TypeIndex, Arc<CodeViewLeaf>>,
}

impl<'a> TypeStream<'a> {
    /// Parses the stream header and frames the records that follow it.
    ///
    /// # Arguments
    /// * `data` - The complete TPI or IPI stream
    /// * `context` - Reading context shared by every decode of this stream
    ///
    /// # Errors
    /// Returns an error if the header is truncated or fails validation. Problems inside the
    /// record area are reported through the context's diagnostics instead.
    pub fn new(data: &'a [u8], context: LeafReaderContext) -> Result<Self> {
        let mut parser = Parser::new(data);
        let header = TpiStreamHeader::read(&mut parser)?;

        let base = parser.pos();
        let available = parser.remaining();
        let claimed = header.record_bytes as usize;
        if claimed > available {
            tracing::warn!(claimed, available, "type stream record area is truncated");
            context.report(
                DiagnosticSeverity::Warning,
                DiagnosticCategory::Stream,
                format!("record area of 0x{claimed:x} bytes is truncated to 0x{available:x}"),
                base,
                None,
            );
        }

        let records = &data[base..base + claimed.min(available)];
        let stream = Self::frame(header, records, base, context);

        if stream.offsets.len() != header.record_count() {
            context_warning(
                &stream.context,
                format!(
                    "header announces {} records, found {}",
                    header.record_count(),
                    stream.offsets.len()
                ),
                base,
            );
        }

        Ok(stream)
    }

    /// Frames a header-less run of records whose first record has index `first_index`.
    ///
    /// # Errors
    /// Returns [`Error::Error`] if the record count would overflow the type index space.
    pub fn from_records(
        records: &'a [u8],
        first_index: TypeIndex,
        context: LeafReaderContext,
    ) -> Result<Self> {
        let header = TpiStreamHeader {
            header_size: 0,
            type_index_begin: first_index.value(),
            type_index_end: first_index.value(),
            record_bytes: u32::try_from(records.len())
                .map_err(|_| Error::Error("record area exceeds 4 GiB".to_string()))?,
            ..Default::default()
        };

        let mut stream = Self::frame(header, records, 0, context);

        let count = u32::try_from(stream.offsets.len())
            .map_err(|_| Error::Error("too many records".to_string()))?;
        stream.header.type_index_end = first_index
            .value()
            .checked_add(count)
            .ok_or_else(|| Error::Error("type index space exhausted".to_string()))?;

        Ok(stream)
    }

    /// Walks the length prefixes once and records where each record starts.
    fn frame(
        header: TpiStreamHeader,
        records: &'a [u8],
        base: usize,
        context: LeafReaderContext,
    ) -> Self {
        let mut offsets = Vec::with_capacity(header.record_count());
        let mut parser = Parser::with_base(records, base);

        while parser.has_more_data() {
            let offset = parser.pos();
            let Ok(length) = parser.read_le::<u16>() else {
                context_warning(&context, "stray byte after the last record", base + offset);
                break;
            };

            offsets.push(offset);

            if parser.advance_by(usize::from(length)).is_err() {
                context_warning(
                    &context,
                    format!("last record claims 0x{length:x} bytes, stream ends first"),
                    base + offset,
                );
                break;
            }
        }

        TypeStream {
            header,
            records,
            base,
            offsets,
            context,
            cache: DashMap::new(),
        }
    }

    /// The stream header. Synthesized for streams created with [`TypeStream::from_records`].
    #[must_use]
    pub fn header(&self) -> &TpiStreamHeader {
        &self.header
    }

    /// The reading context used for every decode.
    #[must_use]
    pub fn context(&self) -> &LeafReaderContext {
        &self.context
    }

    /// Index of the first record.
    #[must_use]
    pub fn type_index_begin(&self) -> TypeIndex {
        TypeIndex(self.header.type_index_begin)
    }

    /// One past the index of the last framed record.
    #[must_use]
    pub fn type_index_end(&self) -> TypeIndex {
        self.type_index_begin().offset(self.offsets.len())
    }

    /// Number of framed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns `true` if the stream holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Returns `true` if `index` names a record of this stream.
    #[must_use]
    pub fn contains(&self, index: TypeIndex) -> bool {
        self.position(index).is_some()
    }

    /// Offset of a record's length prefix within the stream.
    #[must_use]
    pub fn record_offset(&self, index: TypeIndex) -> Option<usize> {
        self.position(index)
            .map(|position| self.base + self.offsets[position])
    }

    /// Number of leaves currently memoized.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Resolves a type index to its decoded leaf.
    ///
    /// The first request decodes the record; later requests return the memoized leaf, unless
    /// caching is disabled in the reader configuration. Concurrent first requests for the same
    /// index decode it once.
    ///
    /// # Errors
    /// Returns [`Error::TypeNotFound`] if `index` is outside the stream, or the decode error of
    /// the record. Failed decodes are not memoized.
    pub fn get(&self, index: TypeIndex) -> Result<Arc<CodeViewLeaf>> {
        let position = self.position(index).ok_or(Error::TypeNotFound(index))?;

        if !self.context.config().cache_leaves {
            return self.decode(position).map(Arc::new);
        }

        if let Some(leaf) = self.cache.get(&index) {
            return Ok(Arc::clone(leaf.value()));
        }

        match self.cache.entry(index) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let leaf = Arc::new(self.decode(position)?);
                entry.insert(Arc::clone(&leaf));
                Ok(leaf)
            }
        }
    }

    /// Iterates over all records in stream order.
    ///
    /// Each item is the outcome for one record; a failed record is logged, reported to the
    /// diagnostics and yielded as `Err`, and iteration continues with the next record.
    #[must_use]
    pub fn iter(&self) -> LeafIterator<'_, 'a> {
        LeafIterator {
            stream: self,
            position: 0,
        }
    }

    /// Parallel iterator decoding every record, in stream order when collected.
    pub fn par_iter(&self) -> impl IndexedParallelIterator<Item = Result<CodeViewLeaf>> + '_ {
        (0..self.offsets.len())
            .into_par_iter()
            .map(move |position| self.decode_reported(position))
    }

    /// Decodes every record in parallel.
    #[must_use]
    pub fn par_leaves(&self) -> Vec<Result<CodeViewLeaf>> {
        self.par_iter().collect()
    }

    fn position(&self, index: TypeIndex) -> Option<usize> {
        let position = index.value().checked_sub(self.header.type_index_begin)? as usize;
        (position < self.offsets.len()).then_some(position)
    }

    fn decode(&self, position: usize) -> Result<CodeViewLeaf> {
        let offset = self.offsets[position];
        let mut parser = Parser::with_base(&self.records[offset..], self.base + offset);

        read_leaf(
            &self.context,
            self.type_index_begin().offset(position),
            &mut parser,
        )
    }

    /// Decodes a record, logging and reporting a failure before returning it.
    fn decode_reported(&self, position: usize) -> Result<CodeViewLeaf> {
        self.decode(position).inspect_err(|error| {
            let index = self.type_index_begin().offset(position);
            let offset = self.base + self.offsets[position];

            tracing::warn!(%index, offset, %error, "failed to decode type record");
            self.context.report(
                DiagnosticSeverity::Error,
                DiagnosticCategory::Leaf,
                format!("failed to decode record: {error}"),
                offset,
                Some(index),
            );
        })
    }
}

fn context_warning(context: &LeafReaderContext, message: impl Into<String>, offset: usize) {
    context.report(
        DiagnosticSeverity::Warning,
        DiagnosticCategory::Stream,
        message,
        offset,
        None,
    );
}

impl<'s, 'a> IntoIterator for &'s TypeStream<'a> {
    type Item = Result<CodeViewLeaf>;
    type IntoIter = LeafIterator<'s, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Sequential iterator over the records of a [`TypeStream`].
pub struct LeafIterator<'s, 'a> {
    stream: &'s TypeStream<'a>,
    position: usize,
}

impl Iterator for LeafIterator<'_, '_> {
    type Item = Result<CodeViewLeaf>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.stream.offsets.len() {
            return None;
        }

        let item = self.stream.decode_reported(self.position);
        self.position += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.stream.offsets.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LeafIterator<'_, '_> {}
