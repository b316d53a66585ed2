//! The versioned virtual filesystem layer.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tycheck_common::{is_within, resolve_against, VersionToken};

use crate::edit::{Edit, EditBatch};
use crate::host::CompilerHost;

/// Pending in-memory edits layered over the on-disk project tree.
///
/// Three structures make up the overlay:
/// - the entry map, holding the content of every live overlay file,
/// - the deleted set, holding paths that resolve as absent regardless of disk,
/// - the version map, holding the last known token of every path seen,
///   retained after deletion.
///
/// A path is never both an entry and deleted. Whenever a path is present in
/// the overlay it is the source of truth; disk is consulted only for paths
/// in neither structure.
#[derive(Debug)]
pub struct OverlayStore {
    root: PathBuf,
    entries: HashMap<PathBuf, String>,
    deleted: HashSet<PathBuf>,
    versions: HashMap<PathBuf, VersionToken>,
}

impl OverlayStore {
    /// Creates an empty overlay for the project at `root`.
    ///
    /// Relative edit paths are resolved against `root`.
    pub fn new(root: &Path) -> Self {
        Self {
            root: tycheck_common::normalize_path(root),
            entries: HashMap::new(),
            deleted: HashSet::new(),
            versions: HashMap::new(),
        }
    }

    /// Returns the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key(&self, path: &Path) -> PathBuf {
        resolve_against(&self.root, path)
    }

    /// Applies every edit of a validated batch, in order.
    pub fn apply_batch(&mut self, batch: &EditBatch) {
        for edit in batch.edits() {
            self.apply_edit(edit);
        }
    }

    /// Applies a single edit.
    pub fn apply_edit(&mut self, edit: &Edit) {
        tracing::trace!(kind = %edit.kind(), path = edit.path(), "applying edit");
        match edit {
            Edit::Create { path, content } | Edit::Update { path, content } => {
                let key = self.key(Path::new(path));
                self.put(key, content.clone());
            }
            Edit::Delete { path } => {
                let key = self.key(Path::new(path));
                self.remove(key);
            }
            Edit::Move {
                path,
                new_path,
                content,
            } => {
                let from = self.key(Path::new(path));
                let to = self.key(Path::new(new_path));
                self.remove(from);
                self.put(to, content.clone());
            }
        }
    }

    fn put(&mut self, key: PathBuf, content: String) {
        self.deleted.remove(&key);
        self.versions
            .insert(key.clone(), VersionToken::of_content(&content));
        self.entries.insert(key, content);
    }

    fn remove(&mut self, key: PathBuf) {
        self.entries.remove(&key);
        self.deleted.insert(key);
    }

    /// Deleted → `false`; overlay entry → `true`; otherwise asks `disk`.
    pub fn resolve_exists<H: CompilerHost + ?Sized>(&self, path: &Path, disk: &H) -> bool {
        let key = self.key(path);
        if self.deleted.contains(&key) {
            return false;
        }
        self.entries.contains_key(&key) || disk.file_exists(&key)
    }

    /// Deleted → `None`; overlay entry → its content; otherwise reads `disk`.
    pub fn resolve_content<H: CompilerHost + ?Sized>(
        &self,
        path: &Path,
        disk: &H,
    ) -> Option<String> {
        let key = self.key(path);
        if self.deleted.contains(&key) {
            return None;
        }
        match self.entries.get(&key) {
            Some(content) => Some(content.clone()),
            None => disk.read_file(&key),
        }
    }

    /// Returns the version map's token for `path`.
    ///
    /// A path the map has never seen gets `disk`'s token, which is cached on
    /// this first observation and returned unchanged afterwards.
    pub fn resolve_version<H: CompilerHost + ?Sized>(
        &mut self,
        path: &Path,
        disk: &mut H,
    ) -> VersionToken {
        let key = self.key(path);
        if let Some(version) = self.versions.get(&key) {
            return *version;
        }
        let version = disk.version(&key);
        self.versions.insert(key, version);
        version
    }

    /// `true` if a live overlay file lies beneath `dir` or is `dir` itself;
    /// otherwise asks `disk`.
    pub fn resolve_directory_exists<H: CompilerHost + ?Sized>(&self, dir: &Path, disk: &H) -> bool {
        let dir = self.key(dir);
        self.entries
            .keys()
            .any(|path| is_within(path, &dir))
            || disk.directory_exists(&dir)
    }

    /// Lists the files beneath `dir`: disk files that are not deleted, plus
    /// live overlay files, sorted and without duplicates.
    pub fn resolve_list_files<H: CompilerHost + ?Sized>(
        &self,
        dir: &Path,
        exclude: &[String],
        disk: &H,
    ) -> Vec<PathBuf> {
        let dir = self.key(dir);
        let mut files: Vec<PathBuf> = disk
            .list_files(&dir, exclude)
            .into_iter()
            .filter(|path| !self.deleted.contains(path))
            .collect();
        files.extend(
            self.entries
                .keys()
                .filter(|path| path.as_path() != dir && is_within(path, &dir))
                .filter(|path| !is_skipped(path, &dir, exclude))
                .cloned(),
        );
        files.sort();
        files.dedup();
        files
    }

    /// Returns `true` if `path` has been deleted through the overlay.
    pub fn is_deleted(&self, path: &Path) -> bool {
        self.deleted.contains(&self.key(path))
    }

    /// Returns the overlay content of `path`, without consulting disk.
    pub fn overlay_content(&self, path: &Path) -> Option<&str> {
        self.entries.get(&self.key(path)).map(String::as_str)
    }

    /// Iterates over the paths of live overlay files.
    pub fn live_paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }

    /// Returns the number of live overlay files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no overlay file is live.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discards every entry, deletion, and cached version.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.deleted.clear();
        self.versions.clear();
    }
}

/// Mirrors the disk walk's filter: hidden or excluded components below `dir`.
fn is_skipped(path: &Path, dir: &Path, exclude: &[String]) -> bool {
    let Ok(rel) = path.strip_prefix(dir) else {
        return true;
    };
    rel.components().any(|c| {
        let name = c.as_os_str().to_string_lossy();
        name.starts_with('.') || exclude.iter().any(|ex| *ex == name)
    })
}
