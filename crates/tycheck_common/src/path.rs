//! Lexical path handling.
//!
//! Every path the overlay or compiler keys a map by goes through
//! [`normalize_path`] first, so `src/./a.tsx`, `src/b/../a.tsx` and
//! `/root/src/a.tsx` all land on the same entry. Nothing here touches the
//! filesystem; symlinks are not resolved.

use std::path::{Component, Path, PathBuf};

/// Collapses `.` and `..` components without consulting the filesystem.
///
/// A `..` at the root is dropped, matching how a resolver treats `/..`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::RootDir | Component::Normal(_) | Component::Prefix(_) => {
                normalized.push(component.as_os_str());
            }
        }
    }
    normalized
}

/// Makes `path` absolute against `root` (if relative) and normalizes it.
pub fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&root.join(path))
    }
}

/// Returns `true` if `path` equals `dir` or lies lexically beneath it.
///
/// Both arguments are expected to be normalized.
pub fn is_within(path: &Path, dir: &Path) -> bool {
    path.starts_with(dir)
}

/// Renders `path` relative to `root` with `/` separators, for user-facing
/// output. Paths outside `root` are shown as-is.
pub fn display_relative(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_cur_dir() {
        assert_eq!(
            normalize_path(Path::new("/p/./src/./a.tsx")),
            PathBuf::from("/p/src/a.tsx")
        );
    }

    #[test]
    fn collapses_parent_dir() {
        assert_eq!(
            normalize_path(Path::new("/p/src/pages/../components/A.tsx")),
            PathBuf::from("/p/src/components/A.tsx")
        );
    }

    #[test]
    fn parent_at_root_is_dropped() {
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn resolve_relative_and_absolute() {
        let root = Path::new("/project");
        assert_eq!(
            resolve_against(root, Path::new("src/App.tsx")),
            PathBuf::from("/project/src/App.tsx")
        );
        assert_eq!(
            resolve_against(root, Path::new("/elsewhere/./x.ts")),
            PathBuf::from("/elsewhere/x.ts")
        );
    }

    #[test]
    fn within_is_component_wise() {
        let dir = Path::new("/p/src/gen");
        assert!(is_within(Path::new("/p/src/gen/A.tsx"), dir));
        assert!(is_within(Path::new("/p/src/gen"), dir));
        assert!(!is_within(Path::new("/p/src/generated/A.tsx"), dir));
    }

    #[test]
    fn relative_display_uses_forward_slashes() {
        let root = Path::new("/p");
        assert_eq!(
            display_relative(Path::new("/p/src/App.tsx"), root),
            "src/App.tsx"
        );
        assert_eq!(display_relative(Path::new("/q/x.ts"), root), "/q/x.ts");
    }
}
