//! A session shared between threads.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tycheck_overlay::RawEdit;

use crate::error::CheckError;
use crate::report::DiagnosticsReport;
use crate::session::Session;

/// A cloneable handle that serializes every call into one [`Session`].
///
/// The lock is held for the whole validate, apply, check, render and persist
/// sequence, so batches apply in the order callers acquire it.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    /// Wraps a session.
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Creates a shared session for the project at `root`.
    pub fn open(root: impl AsRef<Path>) -> Self {
        Self::new(Session::new(root))
    }

    /// Runs [`Session::check`] under the lock.
    pub fn check(&self, edits: &[RawEdit]) -> Result<DiagnosticsReport, CheckError> {
        self.inner.lock().check(edits)
    }

    /// Runs `f` with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
