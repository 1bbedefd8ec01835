//! # cvleaf Prelude
//!
//! The types needed for everyday decoding, importable in one line.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cvleaf operations
pub use crate::Error;

/// The result type used throughout cvleaf
pub use crate::Result;

/// Input buffers and the read cursor
pub use crate::{File, Parser};

// ================================================================================================
// Decoding
// ================================================================================================

/// Entry points decoding one record
pub use crate::leaves::{read_leaf, read_leaf_no_header, read_numeric};

/// Per-session configuration and diagnostics
pub use crate::leaves::{
    Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics, LeafReaderContext,
    ReaderConfig,
};

/// Decoded records
pub use crate::leaves::{CodeViewLeaf, LeafData, LeafKind, NumericLiteral, TypeIndex};

// ================================================================================================
// Streams
// ================================================================================================

/// Indexed access to TPI and IPI streams
pub use crate::stream::{TpiStreamHeader, TypeStream, TypeStreamSource};
