//! Diagnostics collected during lenient leaf decoding.
//!
//! Most irregularities in a type stream do not stop decoding: an unknown leaf kind becomes an
//! opaque record, an unsupported numeric tag becomes zero, a broken record is skipped while its
//! neighbours are still returned. [`Diagnostics`] is where those events are recorded so that a
//! caller can inspect them after the fact.
//!
//! The container is backed by `boxcar::Vec`, so it can be shared (behind an `Arc`) by parallel
//! decoders without locking.
//!
//! # Examples
//!
//! ```rust
//! use cvleaf::leaves::{DiagnosticCategory, Diagnostics};
//!
//! let diagnostics = Diagnostics::new();
//! diagnostics.warning(DiagnosticCategory::Leaf, "unknown leaf kind 0xffee");
//!
//! assert_eq!(diagnostics.len(), 1);
//! assert!(!diagnostics.has_errors());
//! ```

use std::fmt;

use crate::leaves::TypeIndex;

/// Severity of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticSeverity {
    /// Informational, nothing was lost
    Info,
    /// Data was degraded but decoding continued
    Warning,
    /// A record could not be decoded
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Info => write!(f, "INFO"),
            DiagnosticSeverity::Warning => write!(f, "WARN"),
            DiagnosticSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// Part of the decoder that raised a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// Leaf dispatch (unknown kinds, failed records)
    Leaf,
    /// Numeric literal decoding
    Numeric,
    /// Field list walking
    FieldList,
    /// Stream framing and header
    Stream,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Leaf => write!(f, "Leaf"),
            DiagnosticCategory::Numeric => write!(f, "Numeric"),
            DiagnosticCategory::FieldList => write!(f, "FieldList"),
            DiagnosticCategory::Stream => write!(f, "Stream"),
        }
    }
}

/// A single diagnostic entry.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// How severe the event was
    pub severity: DiagnosticSeverity,
    /// Where it was raised
    pub category: DiagnosticCategory,
    /// Human readable description
    pub message: String,
    /// Offset within the stream, if known
    pub offset: Option<usize>,
    /// Type index of the affected record, if known
    pub type_index: Option<TypeIndex>,
}

impl Diagnostic {
    /// Creates an entry without location information.
    pub fn new(
        severity: DiagnosticSeverity,
        category: DiagnosticCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            offset: None,
            type_index: None,
        }
    }

    /// Attaches a stream offset.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Attaches the type index of the affected record.
    #[must_use]
    pub fn with_type_index(mut self, type_index: TypeIndex) -> Self {
        self.type_index = Some(type_index);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;

        if let Some(offset) = self.offset {
            write!(f, " (offset: 0x{offset:08x})")?;
        }

        if let Some(type_index) = self.type_index {
            write!(f, " (type index: {type_index})")?;
        }

        Ok(())
    }
}

/// Append-only, thread-safe collection of [`Diagnostic`] entries.
#[derive(Debug)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Records an informational entry.
    pub fn info(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(DiagnosticSeverity::Info, category, message));
    }

    /// Records a warning.
    pub fn warning(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Warning,
            category,
            message,
        ));
    }

    /// Records an error.
    pub fn error(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(DiagnosticSeverity::Error, category, message));
    }

    /// Records a fully built entry.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.count()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.count() == 0
    }

    /// Returns `true` if at least one error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.iter()
            .any(|entry| entry.severity == DiagnosticSeverity::Error)
    }

    /// Number of recorded errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.iter()
            .filter(|entry| entry.severity == DiagnosticSeverity::Error)
            .count()
    }

    /// Iterates over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, entry)| entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn collect_and_count() {
        let diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());

        diagnostics.info(DiagnosticCategory::Stream, "stream has 3 records");
        diagnostics.warning(DiagnosticCategory::Numeric, "unsupported numeric tag");
        diagnostics.error(DiagnosticCategory::Leaf, "record truncated");

        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.error_count(), 1);

        let categories: Vec<_> = diagnostics.iter().map(|d| d.category).collect();
        assert_eq!(
            categories,
            vec![
                DiagnosticCategory::Stream,
                DiagnosticCategory::Numeric,
                DiagnosticCategory::Leaf
            ]
        );
    }

    #[test]
    fn display_with_location() {
        let diagnostic = Diagnostic::new(
            DiagnosticSeverity::Warning,
            DiagnosticCategory::Leaf,
            "unknown leaf kind 0xffee",
        )
        .with_offset(0x40)
        .with_type_index(TypeIndex(0x1002));

        assert_eq!(
            diagnostic.to_string(),
            "[WARN] Leaf: unknown leaf kind 0xffee (offset: 0x00000040) (type index: 0x1002)"
        );
    }

    #[test]
    fn concurrent_push() {
        let diagnostics = Arc::new(Diagnostics::new());

        let handles: Vec<_> = (0..4)
            .map(|thread| {
                let diagnostics = Arc::clone(&diagnostics);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        diagnostics.warning(DiagnosticCategory::Leaf, format!("{thread}-{i}"));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(diagnostics.len(), 100);
    }
}
