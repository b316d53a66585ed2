//! Thread-safe diagnostic accumulator for parallel analysis passes.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A thread-safe accumulator for diagnostics emitted during a check pass.
///
/// Multiple rayon workers can emit diagnostics concurrently via
/// [`emit`](Self::emit). The error count is tracked atomically for fast
/// `has_errors` checks without locking the diagnostic vector.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    error_count: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates a new empty diagnostic sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            error_count: AtomicUsize::new(0),
        }
    }

    /// Emits a diagnostic into the sink.
    pub fn emit(&self, diag: Diagnostic) {
        if diag.severity == Severity::Error {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        self.diagnostics.lock().push(diag);
    }

    /// Emits every diagnostic from an iterator under a single lock.
    pub fn extend(&self, diags: impl IntoIterator<Item = Diagnostic>) {
        let mut guard = self.diagnostics.lock();
        for diag in diags {
            if diag.severity == Severity::Error {
                self.error_count.fetch_add(1, Ordering::Relaxed);
            }
            guard.push(diag);
        }
    }

    /// Returns `true` if any error-severity diagnostics have been emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count.load(Ordering::Relaxed) > 0
    }

    /// Returns the number of error-severity diagnostics emitted so far.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Consumes the sink and returns everything it collected.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::DiagnosticCode;
    use tycheck_source::Span;

    fn make_error() -> Diagnostic {
        Diagnostic::error(DiagnosticCode::TOKEN_EXPECTED, "';' expected.", Span::DUMMY)
    }

    fn make_suggestion() -> Diagnostic {
        Diagnostic::suggestion(DiagnosticCode::REQUIRE_TO_IMPORT, "s", Span::DUMMY)
    }

    #[test]
    fn empty_sink() {
        let sink = DiagnosticSink::new();
        assert!(!sink.has_errors());
        assert!(sink.into_diagnostics().is_empty());
    }

    #[test]
    fn suggestions_do_not_count_as_errors() {
        let sink = DiagnosticSink::new();
        sink.emit(make_suggestion());
        sink.extend([make_error(), make_suggestion()]);
        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink.into_diagnostics().len(), 3);
    }

    #[test]
    fn thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let sink = Arc::new(DiagnosticSink::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for _ in 0..50 {
                        sink.emit(make_error());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(sink.error_count(), 400);
    }
}
