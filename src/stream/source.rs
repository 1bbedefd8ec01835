//! Owned byte source for a type stream.

use std::{path::Path, sync::Arc};

use crate::{
    file::File,
    leaves::{Diagnostics, LeafReaderContext, ReaderConfig},
    stream::TypeStream,
    Result,
};

/// Owns the bytes of an extracted TPI or IPI stream and hands out [`TypeStream`] views.
///
/// Streams created from one source share its diagnostics sink.
///
/// # Examples
///
/// ```rust,no_run
/// use cvleaf::{stream::TypeStreamSource, leaves::ReaderConfig};
/// use std::path::Path;
///
/// let source = TypeStreamSource::from_file(Path::new("tpi.bin"), ReaderConfig::default())?;
/// let stream = source.stream()?;
/// println!("{} records", stream.len());
/// # Ok::<(), cvleaf::Error>(())
/// ```
pub struct TypeStreamSource {
    file: File,
    config: ReaderConfig,
    diagnostics: Arc<Diagnostics>,
}

impl TypeStreamSource {
    /// Memory maps a stream dumped to disk.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or mapped, or
    /// [`crate::Error::Empty`] for an empty file.
    pub fn from_file(path: &Path, config: ReaderConfig) -> Result<Self> {
        Ok(TypeStreamSource {
            file: File::from_file(path)?,
            config,
            diagnostics: Arc::new(Diagnostics::new()),
        })
    }

    /// Takes ownership of a stream held in memory.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] if `data` is empty.
    pub fn from_mem(data: Vec<u8>, config: ReaderConfig) -> Result<Self> {
        Ok(TypeStreamSource {
            file: File::from_mem(data)?,
            config,
            diagnostics: Arc::new(Diagnostics::new()),
        })
    }

    /// Parses the header and frames the records.
    ///
    /// # Errors
    /// Returns an error if the stream header is invalid.
    pub fn stream(&self) -> Result<TypeStream<'_>> {
        TypeStream::new(self.file.data(), self.context())
    }

    /// A reading context reporting into this source's diagnostics.
    #[must_use]
    pub fn context(&self) -> LeafReaderContext {
        LeafReaderContext::with_diagnostics(self.config, Arc::clone(&self.diagnostics))
    }

    /// Diagnostics of every stream created from this source.
    #[must_use]
    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.diagnostics
    }

    /// The raw stream bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.file.data()
    }
}
