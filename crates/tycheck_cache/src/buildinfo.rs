//! The serialized contents of the build cache.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tycheck_common::VersionToken;

/// Everything the build cache persists between processes.
///
/// `T` is the per-file analysis produced by the checker. The cache never
/// looks inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildInfo<T> {
    /// Tool version that produced this cache. Invalidate on version change.
    pub tool_version: String,

    /// Per-file analysis, keyed by normalized absolute path.
    pub files: BTreeMap<PathBuf, FileRecord<T>>,
}

/// Cached analysis for a single source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord<T> {
    /// The file's version token when it was analysed.
    pub version: VersionToken,

    /// The analysis, valid while the file keeps `version`.
    pub analysis: T,
}

impl<T> BuildInfo<T> {
    /// Creates an empty build info for the given tool version.
    pub fn new(tool_version: &str) -> Self {
        Self {
            tool_version: tool_version.to_string(),
            files: BTreeMap::new(),
        }
    }

    /// Returns `true` if this cache was produced by `tool_version`.
    pub fn is_compatible(&self, tool_version: &str) -> bool {
        self.tool_version == tool_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_empty() {
        let info: BuildInfo<String> = BuildInfo::new("0.1.0");
        assert!(info.files.is_empty());
        assert!(info.is_compatible("0.1.0"));
        assert!(!info.is_compatible("0.2.0"));
    }

    #[test]
    fn bincode_preserves_records() {
        let mut info = BuildInfo::new("0.1.0");
        info.files.insert(
            PathBuf::from("/app/src/App.tsx"),
            FileRecord {
                version: VersionToken::of_content("export default 1;"),
                analysis: vec!["default".to_string()],
            },
        );
        let bytes = bincode::serde::encode_to_vec(&info, bincode::config::standard()).unwrap();
        let (back, _): (BuildInfo<Vec<String>>, usize) =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard()).unwrap();
        let record = &back.files[&PathBuf::from("/app/src/App.tsx")];
        assert_eq!(record.version, VersionToken::of_content("export default 1;"));
        assert_eq!(record.analysis, vec!["default".to_string()]);
    }
}
