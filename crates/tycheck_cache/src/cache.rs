//! High-level build cache.
//!
//! [`BuildCache`] is both the in-process memory of per-file analyses and the
//! thing persisted to disk between processes. Loading is fail-safe: a missing,
//! corrupt, or incompatible file yields an empty cache.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tycheck_common::VersionToken;

use crate::artifact;
use crate::buildinfo::{BuildInfo, FileRecord};
use crate::changes::ChangeSet;
use crate::error::CacheError;

/// File name of the persisted cache within the cache directory.
pub const BUILD_INFO_FILE: &str = "buildinfo.bin";

/// Per-file analysis cache keyed by version token.
pub struct BuildCache<T> {
    /// Where the cache is persisted, or `None` for an in-memory cache.
    path: Option<PathBuf>,

    /// The cached records.
    info: BuildInfo<T>,

    /// Set when records changed since the last load or save.
    dirty: bool,
}

impl<T: Serialize + DeserializeOwned> BuildCache<T> {
    /// Loads the cache persisted in `cache_dir`, or creates an empty one.
    ///
    /// Any problem with the existing file (absent, corrupt, produced by
    /// another tool version) results in starting fresh.
    pub fn load_or_create(cache_dir: &Path, tool_version: &str) -> Self {
        let path = cache_dir.join(BUILD_INFO_FILE);
        let info = match Self::load(&path) {
            Ok(info) if info.is_compatible(tool_version) => {
                tracing::debug!(path = %path.display(), files = info.files.len(), "loaded build cache");
                info
            }
            Ok(info) => {
                tracing::debug!(
                    found = %info.tool_version,
                    expected = tool_version,
                    "discarding build cache from another version"
                );
                BuildInfo::new(tool_version)
            }
            Err(CacheError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                BuildInfo::new(tool_version)
            }
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unreadable build cache");
                BuildInfo::new(tool_version)
            }
        };
        Self {
            path: Some(path),
            info,
            dirty: false,
        }
    }

    fn load(path: &Path) -> Result<BuildInfo<T>, CacheError> {
        let payload = artifact::read_artifact(path)?;
        let (info, _) = bincode::serde::decode_from_slice(&payload, bincode::config::standard())
            .map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;
        Ok(info)
    }

    /// Persists the cache if it changed since it was loaded or last saved.
    ///
    /// An in-memory cache never touches disk.
    pub fn save(&mut self) -> Result<(), CacheError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if !self.dirty && path.exists() {
            return Ok(());
        }
        let payload = bincode::serde::encode_to_vec(&self.info, bincode::config::standard())
            .map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;
        artifact::write_artifact(path, &payload, &self.info.tool_version)?;
        self.dirty = false;
        tracing::debug!(path = %path.display(), files = self.info.files.len(), "saved build cache");
        Ok(())
    }
}

impl<T> BuildCache<T> {
    /// Creates an empty cache that is never persisted.
    pub fn in_memory(tool_version: &str) -> Self {
        Self {
            path: None,
            info: BuildInfo::new(tool_version),
            dirty: false,
        }
    }

    /// Returns the cached analysis for `path` if it was recorded at `version`.
    pub fn lookup(&self, path: &Path, version: VersionToken) -> Option<&T> {
        self.info
            .files
            .get(path)
            .filter(|record| record.version == version)
            .map(|record| &record.analysis)
    }

    /// Records the analysis of `path` at `version`, replacing any older record.
    pub fn insert(&mut self, path: PathBuf, version: VersionToken, analysis: T) {
        self.info
            .files
            .insert(path, FileRecord { version, analysis });
        self.dirty = true;
    }

    /// Drops records for files that are no longer part of the program.
    ///
    /// Returns the number of records removed.
    pub fn prune(&mut self, live: &HashSet<PathBuf>) -> usize {
        let before = self.info.files.len();
        self.info.files.retain(|path, _| live.contains(path));
        let removed = before - self.info.files.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Classifies `current` against the cached version tokens.
    pub fn detect_changes(&self, current: &HashMap<PathBuf, VersionToken>) -> ChangeSet {
        ChangeSet::detect(current, &self.info)
    }

    /// Returns the persisted location, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the number of cached files.
    pub fn len(&self) -> usize {
        self.info.files.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.info.files.is_empty()
    }
}
