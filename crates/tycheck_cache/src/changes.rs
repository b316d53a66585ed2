//! Change detection against the cached version tokens.

use std::collections::HashMap;
use std::path::PathBuf;

use tycheck_common::VersionToken;

use crate::buildinfo::BuildInfo;

/// Result of comparing the current version tokens against the cache.
///
/// Categorizes files into new (never seen), modified (token changed),
/// deleted (cached but no longer part of the program), and unchanged.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// Files that are not present in the cache.
    pub new_files: Vec<PathBuf>,

    /// Files whose version token differs from the cached one.
    pub modified_files: Vec<PathBuf>,

    /// Files present in the cache but not in the current file set.
    pub deleted_files: Vec<PathBuf>,

    /// Files whose version token matches the cache.
    pub unchanged_files: Vec<PathBuf>,
}

impl ChangeSet {
    /// Compares `current` tokens against `info`.
    pub fn detect<T>(current: &HashMap<PathBuf, VersionToken>, info: &BuildInfo<T>) -> Self {
        let mut set = ChangeSet::default();
        for (path, version) in current {
            match info.files.get(path) {
                Some(record) if record.version == *version => {
                    set.unchanged_files.push(path.clone())
                }
                Some(_) => set.modified_files.push(path.clone()),
                None => set.new_files.push(path.clone()),
            }
        }
        set.deleted_files = info
            .files
            .keys()
            .filter(|p| !current.contains_key(*p))
            .cloned()
            .collect();

        set.new_files.sort();
        set.modified_files.sort();
        set.unchanged_files.sort();
        set.deleted_files.sort();
        set
    }

    /// Returns `true` if there are no new, modified, or deleted files.
    pub fn is_empty(&self) -> bool {
        self.new_files.is_empty() && self.modified_files.is_empty() && self.deleted_files.is_empty()
    }

    /// Returns the number of files that need re-analysis (new + modified).
    pub fn dirty_count(&self) -> usize {
        self.new_files.len() + self.modified_files.len()
    }
}
