//! The file-resolution interface the checker consumes, and its two providers.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use ignore::WalkBuilder;
use tycheck_common::{normalize_path, VersionToken};

use crate::error::DiskReadError;
use crate::store::OverlayStore;

/// File-resolution capabilities the checker needs from its environment.
///
/// All paths are absolute and normalized.
pub trait CompilerHost {
    /// Returns `true` if a regular file exists at `path`.
    fn file_exists(&self, path: &Path) -> bool;

    /// Returns the text of the file at `path`, or `None` if it cannot be read.
    fn read_file(&self, path: &Path) -> Option<String>;

    /// Returns the identity token the checker compares to decide whether a
    /// cached analysis of `path` is still valid.
    fn version(&mut self, path: &Path) -> VersionToken;

    /// Returns `true` if `dir` exists as a directory.
    fn directory_exists(&self, dir: &Path) -> bool;

    /// Lists every file beneath `dir`, recursively, in sorted order.
    ///
    /// Directories named in `exclude` and hidden entries are skipped.
    fn list_files(&self, dir: &Path, exclude: &[String]) -> Vec<PathBuf>;
}

/// [`CompilerHost`] over the real filesystem.
///
/// I/O failures are absorbed: unreadable files have no content and get
/// [`VersionToken::Default`]. Failures other than not-found are logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskHost;

impl DiskHost {
    /// Creates a disk host.
    pub fn new() -> Self {
        Self
    }

    /// Reads a file's text.
    pub fn try_read(&self, path: &Path) -> Result<String, DiskReadError> {
        std::fs::read_to_string(path).map_err(|source| DiskReadError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads a file's modification time.
    pub fn try_modified(&self, path: &Path) -> Result<SystemTime, DiskReadError> {
        std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|source| DiskReadError::Stat {
                path: path.to_path_buf(),
                source,
            })
    }
}

fn absorb(err: &DiskReadError) {
    if !err.is_not_found() {
        tracing::warn!(error = %err, "disk access failed, using fallback");
    }
}

impl CompilerHost for DiskHost {
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_file(&self, path: &Path) -> Option<String> {
        self.try_read(path).map_err(|e| absorb(&e)).ok()
    }

    fn version(&mut self, path: &Path) -> VersionToken {
        match self.try_modified(path) {
            Ok(mtime) => VersionToken::of_mtime(mtime),
            Err(e) => {
                absorb(&e);
                VersionToken::Default
            }
        }
    }

    fn directory_exists(&self, dir: &Path) -> bool {
        dir.is_dir()
    }

    fn list_files(&self, dir: &Path, exclude: &[String]) -> Vec<PathBuf> {
        if !dir.is_dir() {
            return Vec::new();
        }
        let exclude = exclude.to_vec();
        let mut builder = WalkBuilder::new(dir);
        builder
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .ignore(false)
            .parents(false)
            .follow_links(false)
            .hidden(true)
            .filter_entry(move |entry| {
                let name = entry.file_name().to_string_lossy();
                !exclude.iter().any(|ex| *ex == name)
            });

        let mut files = Vec::new();
        for entry in builder.build() {
            match entry {
                Ok(entry) if entry.file_type().is_some_and(|t| t.is_file()) => {
                    files.push(normalize_path(entry.path()));
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "skipping unreadable directory entry"),
            }
        }
        files.sort();
        files
    }
}

/// [`CompilerHost`] decorator that answers from an [`OverlayStore`] first and
/// falls through to `inner` for paths the overlay does not know.
pub struct OverlayHost<'a, H: CompilerHost> {
    store: &'a mut OverlayStore,
    inner: &'a mut H,
}

impl<'a, H: CompilerHost> OverlayHost<'a, H> {
    /// Layers `store` over `inner`.
    pub fn new(store: &'a mut OverlayStore, inner: &'a mut H) -> Self {
        Self { store, inner }
    }

    /// Returns the overlay this host consults.
    pub fn store(&self) -> &OverlayStore {
        self.store
    }
}

impl<H: CompilerHost> CompilerHost for OverlayHost<'_, H> {
    fn file_exists(&self, path: &Path) -> bool {
        self.store.resolve_exists(path, &*self.inner)
    }

    fn read_file(&self, path: &Path) -> Option<String> {
        self.store.resolve_content(path, &*self.inner)
    }

    fn version(&mut self, path: &Path) -> VersionToken {
        self.store.resolve_version(path, &mut *self.inner)
    }

    fn directory_exists(&self, dir: &Path) -> bool {
        self.store.resolve_directory_exists(dir, &*self.inner)
    }

    fn list_files(&self, dir: &Path, exclude: &[String]) -> Vec<PathBuf> {
        self.store.resolve_list_files(dir, exclude, &*self.inner)
    }
}
