//! Reader configuration and the shared per-session reading context.
//!
//! A [`LeafReaderContext`] is created once per decoding session (typically once per TPI or IPI
//! stream) and passed by reference into every leaf decode. It is never owned by a leaf. It
//! carries the [`ReaderConfig`] and the [`Diagnostics`] sink.
//!
//! A finding is recorded once per session, keyed on its offset, category and message. Decoding a
//! record again (a second scan, an uncached lookup) adds nothing to the sink.

use std::sync::Arc;

use dashmap::DashSet;

use crate::{
    leaves::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics, TypeIndex},
    Result,
};

/// Options controlling how lenient leaf decoding is.
///
/// [`ReaderConfig::default`] decodes leniently and collects diagnostics. [`ReaderConfig::strict`]
/// rejects anything the decoder would otherwise paper over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Fail a record whose numeric literal uses a reserved tag without a supported width,
    /// instead of decoding it as zero.
    pub strict_numeric_tags: bool,

    /// Record degraded data (unknown kinds, numeric fallbacks, skipped records) in the context's
    /// [`Diagnostics`].
    pub collect_diagnostics: bool,

    /// Maximum depth of nested dispatch. A field list entry is one level below its list.
    pub max_nesting_depth: usize,

    /// Memoize decoded leaves in [`crate::stream::TypeStream`].
    pub cache_leaves: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            strict_numeric_tags: false,
            collect_diagnostics: true,
            max_nesting_depth: 64,
            cache_leaves: true,
        }
    }
}

impl ReaderConfig {
    /// Lenient decoding without bookkeeping: no diagnostics, no cache.
    ///
    /// Suited for one-shot linear scans where every record is visited exactly once.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            strict_numeric_tags: false,
            collect_diagnostics: false,
            max_nesting_depth: 64,
            cache_leaves: false,
        }
    }

    /// Strict decoding: unsupported numeric tags fail their record.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_numeric_tags: true,
            collect_diagnostics: true,
            max_nesting_depth: 16,
            cache_leaves: true,
        }
    }
}

/// Key identifying a finding already reported in this session.
type ReportKey = (usize, DiagnosticCategory, String);

/// Shared state of one decoding session.
///
/// Clones belong to the same session and share its record of reported findings.
#[derive(Debug, Clone, Default)]
pub struct LeafReaderContext {
    config: ReaderConfig,
    diagnostics: Arc<Diagnostics>,
    reported: Arc<DashSet<ReportKey>>,
}

impl LeafReaderContext {
    /// Creates a context with its own, empty diagnostics sink.
    #[must_use]
    pub fn new(config: ReaderConfig) -> Self {
        Self {
            config,
            diagnostics: Arc::new(Diagnostics::new()),
            reported: Arc::default(),
        }
    }

    /// Creates a context reporting into an existing diagnostics sink.
    ///
    /// Used when the TPI and IPI streams of one database are decoded side by side and should
    /// report into the same place.
    #[must_use]
    pub fn with_diagnostics(config: ReaderConfig, diagnostics: Arc<Diagnostics>) -> Self {
        Self {
            config,
            diagnostics,
            reported: Arc::default(),
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// The diagnostics sink.
    #[must_use]
    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.diagnostics
    }

    /// Records a diagnostic, if collection is enabled and the same finding was not reported at
    /// `offset` before.
    pub(crate) fn report(
        &self,
        severity: DiagnosticSeverity,
        category: DiagnosticCategory,
        message: impl Into<String>,
        offset: usize,
        type_index: Option<TypeIndex>,
    ) {
        if !self.config.collect_diagnostics {
            return;
        }

        let message = message.into();
        if !self.reported.insert((offset, category, message.clone())) {
            return;
        }

        let mut diagnostic = Diagnostic::new(severity, category, message).with_offset(offset);
        if let Some(type_index) = type_index {
            diagnostic = diagnostic.with_type_index(type_index);
        }

        self.diagnostics.push(diagnostic);
    }

    /// Fails with [`crate::Error::RecursionLimit`] once `depth` exceeds the configured limit.
    pub(crate) fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.config.max_nesting_depth {
            return Err(crate::Error::RecursionLimit(self.config.max_nesting_depth));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn config_presets() {
        let default = ReaderConfig::default();
        assert!(!default.strict_numeric_tags);
        assert!(default.collect_diagnostics);
        assert!(default.cache_leaves);
        assert_eq!(default.max_nesting_depth, 64);

        let lenient = ReaderConfig::lenient();
        assert!(!lenient.strict_numeric_tags);
        assert!(!lenient.collect_diagnostics);
        assert!(!lenient.cache_leaves);

        let strict = ReaderConfig::strict();
        assert!(strict.strict_numeric_tags);
        assert!(strict.collect_diagnostics);
        assert_eq!(strict.max_nesting_depth, 16);
    }

    #[test]
    fn report_respects_config() {
        let context = LeafReaderContext::new(ReaderConfig::lenient());
        context.report(
            DiagnosticSeverity::Warning,
            DiagnosticCategory::Leaf,
            "ignored",
            0,
            None,
        );
        assert!(context.diagnostics().is_empty());

        let context = LeafReaderContext::default();
        context.report(
            DiagnosticSeverity::Warning,
            DiagnosticCategory::Leaf,
            "kept",
            0x10,
            Some(TypeIndex(0x1000)),
        );

        let entry = context.diagnostics().iter().next().unwrap();
        assert_eq!(entry.offset, Some(0x10));
        assert_eq!(entry.type_index, Some(TypeIndex(0x1000)));
    }

    #[test]
    fn shared_diagnostics() {
        let sink = Arc::new(Diagnostics::new());
        let tpi = LeafReaderContext::with_diagnostics(ReaderConfig::default(), Arc::clone(&sink));
        let ipi = LeafReaderContext::with_diagnostics(ReaderConfig::default(), Arc::clone(&sink));

        tpi.report(DiagnosticSeverity::Info, DiagnosticCategory::Stream, "tpi", 0, None);
        ipi.report(DiagnosticSeverity::Info, DiagnosticCategory::Stream, "ipi", 0, None);

        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn repeated_report_is_recorded_once() {
        let context = LeafReaderContext::default();
        let clone = context.clone();

        for _ in 0..3 {
            context.report(DiagnosticSeverity::Info, DiagnosticCategory::Leaf, "kind", 8, None);
            clone.report(DiagnosticSeverity::Info, DiagnosticCategory::Leaf, "kind", 8, None);
        }
        context.report(DiagnosticSeverity::Info, DiagnosticCategory::Leaf, "kind", 12, None);
        context.report(DiagnosticSeverity::Info, DiagnosticCategory::Stream, "kind", 8, None);

        assert_eq!(context.diagnostics().len(), 3);
    }

    #[test]
    fn depth_limit() {
        let context = LeafReaderContext::new(ReaderConfig::strict());
        assert!(context.check_depth(16).is_ok());
        assert!(matches!(
            context.check_depth(17),
            Err(Error::RecursionLimit(16))
        ));
    }
}
