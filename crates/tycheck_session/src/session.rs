//! The single-owner program session.

use std::path::{Path, PathBuf};

use tycheck_common::normalize_path;
use tycheck_compiler::Program;
use tycheck_diagnostics::{DiagnosticRenderer, PrettyRenderer};
use tycheck_overlay::{DiskHost, EditBatch, OverlayHost, OverlayStore, RawEdit};

use crate::error::CheckError;
use crate::filter::DiagnosticFilter;
use crate::report::DiagnosticsReport;

/// Whether the checker has been constructed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No [`Program`] yet; the next check builds one.
    Uninitialized,
    /// The [`Program`] exists and keeps its caches across checks.
    Ready,
}

/// Everything that only exists once the project configuration has loaded.
struct Compiled {
    program: Program,
    filter: DiagnosticFilter,
}

impl Compiled {
    fn open(root: &Path) -> Result<Self, CheckError> {
        let program = Program::new(root)?;
        let filter = DiagnosticFilter::new(program.root(), &program.config().diagnostics)?;
        tracing::debug!(
            root = %program.root().display(),
            cached = program.cached_files(),
            "program session initialized"
        );
        Ok(Self { program, filter })
    }
}

/// A long-lived overlay of virtual edits plus the incremental checker.
///
/// Edits accumulate across calls: a file created in one batch stays visible
/// to every later check until it is deleted, moved, or the session is reset.
pub struct Session {
    root: PathBuf,
    overlay: OverlayStore,
    disk: DiskHost,
    compiled: Option<Box<Compiled>>,
    renderer: PrettyRenderer,
}

impl Session {
    /// Creates an uninitialized session for the project at `root`.
    ///
    /// `root` should be absolute; relative edit paths are resolved against it.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = normalize_path(root.as_ref());
        Self {
            overlay: OverlayStore::new(&root),
            root,
            disk: DiskHost::new(),
            compiled: None,
            renderer: PrettyRenderer::new(),
        }
    }

    /// Validates and applies `edits`, then checks the project.
    ///
    /// An invalid batch is rejected before anything is applied.
    pub fn check(&mut self, edits: &[RawEdit]) -> Result<DiagnosticsReport, CheckError> {
        let batch = EditBatch::validate(edits)?;
        self.check_batch(&batch)
    }

    /// Applies an already validated batch, then checks the project.
    ///
    /// If the checker cannot be constructed the edits stay applied and the
    /// session remains uninitialized, so the next call tries again.
    pub fn check_batch(&mut self, batch: &EditBatch) -> Result<DiagnosticsReport, CheckError> {
        self.overlay.apply_batch(batch);

        let compiled = match self.compiled.take() {
            Some(compiled) => compiled,
            None => Box::new(Compiled::open(&self.root)?),
        };
        let compiled = self.compiled.insert(compiled);

        let mut host = OverlayHost::new(&mut self.overlay, &mut self.disk);
        let mut output = compiled.program.check(&mut host)?;
        let kept = compiled.filter.apply(output.diagnostics, &output.sources);
        compiled.filter.rewrite_sources(&mut output.sources);
        tracing::debug!(
            reported = kept.len(),
            parsed = output.stats.parsed,
            reused = output.stats.reused,
            "check finished"
        );

        let diagnostics = if kept.is_empty() {
            None
        } else {
            Some(self.renderer.render_all(&kept, &output.sources))
        };

        if let Err(e) = compiled.program.persist() {
            tracing::warn!(error = %e, "failed to persist build cache");
        }
        Ok(DiagnosticsReport { diagnostics })
    }

    /// Discards the overlay and the checker. The persisted build cache stays
    /// on disk.
    pub fn reset(&mut self) {
        self.overlay.clear();
        self.compiled = None;
    }

    /// The current lifecycle state.
    pub fn state(&self) -> SessionState {
        if self.compiled.is_some() {
            SessionState::Ready
        } else {
            SessionState::Uninitialized
        }
    }

    /// Returns `true` once the checker exists.
    pub fn is_ready(&self) -> bool {
        self.state() == SessionState::Ready
    }

    /// The pending edits.
    pub fn overlay(&self) -> &OverlayStore {
        &self.overlay
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
