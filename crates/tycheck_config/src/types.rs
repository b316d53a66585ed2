//! Configuration types deserialized from `tycheck.toml`.

use serde::Deserialize;
use std::collections::BTreeMap;

/// The top-level project configuration parsed from `tycheck.toml`.
///
/// Every section is optional; missing sections take their defaults, which
/// describe a Vite-style React project with sources in `src/`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Which files make up the program.
    pub project: ProjectSection,
    /// Checker behaviour.
    pub compiler: CompilerOptions,
    /// Module specifier aliases, `pattern -> [targets]`, with at most one `*`
    /// in each pattern and target (e.g. `"@/*" = ["src/*"]`).
    pub paths: BTreeMap<String, Vec<String>>,
    /// Filtering and rewriting of reported diagnostics.
    pub diagnostics: DiagnosticsConfig,
    /// Persisted incremental build cache.
    pub cache: CacheConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        let mut paths = BTreeMap::new();
        paths.insert("@/*".to_string(), vec!["src/*".to_string()]);
        paths.insert(
            "@internal/*".to_string(),
            vec!["src/__internal__/*".to_string()],
        );
        Self {
            project: ProjectSection::default(),
            compiler: CompilerOptions::default(),
            paths,
            diagnostics: DiagnosticsConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

/// Root-file selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectSection {
    /// Project-relative directories whose code files are program roots.
    pub include: Vec<String>,
    /// Directory names skipped while walking `include` directories.
    pub exclude: Vec<String>,
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            include: vec!["src".to_string()],
            exclude: vec!["node_modules".to_string(), "dist".to_string()],
        }
    }
}

/// Options controlling what the checker reports.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Report bare package imports that have no `node_modules/<package>` directory.
    pub check_packages: bool,
    /// Treat `.js`/`.jsx` files under `include` as program roots.
    pub allow_js: bool,
    /// Wildcard module declarations assumed to exist (like `declare module "*.css"`).
    pub ambient_modules: Vec<String>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        let ambient = [
            "*.css", "*.scss", "*.sass", "*.less", "*.svg", "*.png", "*.jpg", "*.jpeg", "*.gif",
            "*.webp", "*.avif", "*.ico", "*.woff", "*.woff2", "*.mp4", "*.webm", "*.json",
            "*?raw", "*?url",
        ];
        Self {
            check_packages: true,
            allow_js: false,
            ambient_modules: ambient.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Diagnostic filtering and path rewriting applied by the session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Project-relative directory holding internal runtime shims. Diagnostics
    /// located in it are never reported.
    pub internal_dir: String,
    /// Logical prefix that replaces `internal_dir` in rendered output.
    pub internal_alias: String,
    /// Diagnostics whose message contains any of these substrings are dropped.
    pub ignore_messages: Vec<String>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            internal_dir: "src/__internal__".to_string(),
            internal_alias: "@internal".to_string(),
            ignore_messages: vec!["index.css".to_string()],
        }
    }
}

/// Location and enablement of the persisted build cache.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether analyses are persisted between processes.
    pub enabled: bool,
    /// Project-relative cache directory.
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: ".tycheck".to_string(),
        }
    }
}
