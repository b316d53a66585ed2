//! Module specifier resolution.
//!
//! Every existence check goes through the [`CompilerHost`], so files and
//! directories that only exist in the overlay resolve like real ones, and
//! deleted files do not resolve at all.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tycheck_common::normalize_path;
use tycheck_config::ProjectConfig;
use tycheck_overlay::CompilerHost;

/// Extensions probed, in order, when a specifier names a file without one.
const PROBE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".d.ts", ".js", ".jsx"];

/// What a module specifier refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A source file of the program.
    File(PathBuf),
    /// Matched by an ambient module declaration; its shape is unknown.
    Ambient,
    /// An installed (or unchecked) package.
    Package(String),
    /// Nothing provides this module.
    Unresolved,
}

struct PathAlias {
    pattern: String,
    targets: Vec<String>,
}

impl PathAlias {
    /// The part of `spec` matched by `*`, or `""` for an exact pattern match.
    fn capture<'s>(&self, spec: &'s str) -> Option<&'s str> {
        match self.pattern.split_once('*') {
            Some((prefix, suffix)) => wildcard_capture(prefix, suffix, spec),
            None => (self.pattern == spec).then_some(""),
        }
    }

    fn prefix_len(&self) -> usize {
        self.pattern.find('*').unwrap_or(self.pattern.len())
    }
}

fn wildcard_capture<'s>(prefix: &str, suffix: &str, spec: &'s str) -> Option<&'s str> {
    if spec.len() < prefix.len() + suffix.len() {
        return None;
    }
    spec.strip_prefix(prefix)?.strip_suffix(suffix)
}

/// Returns `true` if `spec` matches an ambient module name or `*` pattern.
pub fn matches_ambient(pattern: &str, spec: &str) -> bool {
    match pattern.split_once('*') {
        Some((prefix, suffix)) => wildcard_capture(prefix, suffix, spec).is_some(),
        None => pattern == spec,
    }
}

/// Resolves module specifiers for one project.
pub struct Resolver {
    root: PathBuf,
    aliases: Vec<PathAlias>,
    ambient: Vec<String>,
    check_packages: bool,
}

impl Resolver {
    /// Builds a resolver from the project configuration.
    pub fn new(root: &Path, config: &ProjectConfig) -> Self {
        let mut aliases: Vec<PathAlias> = config
            .paths
            .iter()
            .map(|(pattern, targets)| PathAlias {
                pattern: pattern.clone(),
                targets: targets.clone(),
            })
            .collect();
        // The longest matching prefix wins.
        aliases.sort_by_key(|a| std::cmp::Reverse(a.prefix_len()));
        Self {
            root: normalize_path(root),
            aliases,
            ambient: config.compiler.ambient_modules.clone(),
            check_packages: config.compiler.check_packages,
        }
    }

    /// Fully resolves `spec` as imported from `importer`.
    ///
    /// `declared` holds the ambient module names declared by the program's
    /// own files.
    pub fn resolve<H: CompilerHost + ?Sized>(
        &self,
        spec: &str,
        importer: &Path,
        declared: &[String],
        host: &H,
    ) -> Resolution {
        match self.resolve_file(spec, importer, host) {
            Some(path) => Resolution::File(path),
            None => self.resolve_non_file(spec, importer, declared, host),
        }
    }

    /// Resolves `spec` to a source file, if one provides it.
    pub fn resolve_file<H: CompilerHost + ?Sized>(
        &self,
        spec: &str,
        importer: &Path,
        host: &H,
    ) -> Option<PathBuf> {
        if is_path_like(spec) {
            let base = if spec.starts_with('/') {
                normalize_path(Path::new(spec))
            } else {
                let dir = importer.parent().unwrap_or(&self.root);
                normalize_path(&dir.join(spec))
            };
            return self.try_path(&base, host);
        }
        let (alias, capture) = self.match_alias(spec)?;
        alias.targets.iter().find_map(|target| {
            let target = target.replacen('*', capture, 1);
            self.try_path(&normalize_path(&self.root.join(target)), host)
        })
    }

    /// Classifies a specifier that no source file provides.
    pub fn resolve_non_file<H: CompilerHost + ?Sized>(
        &self,
        spec: &str,
        importer: &Path,
        declared: &[String],
        host: &H,
    ) -> Resolution {
        let ambient = self
            .ambient
            .iter()
            .chain(declared)
            .any(|pattern| matches_ambient(pattern, spec));
        if ambient {
            return Resolution::Ambient;
        }
        if is_path_like(spec) || self.match_alias(spec).is_some() {
            return Resolution::Unresolved;
        }
        let package = package_name(spec);
        if !self.check_packages || self.package_installed(&package, importer, host) {
            Resolution::Package(package)
        } else {
            Resolution::Unresolved
        }
    }

    fn match_alias<'s>(&self, spec: &'s str) -> Option<(&PathAlias, &'s str)> {
        self.aliases
            .iter()
            .find_map(|alias| alias.capture(spec).map(|capture| (alias, capture)))
    }

    fn try_path<H: CompilerHost + ?Sized>(&self, base: &Path, host: &H) -> Option<PathBuf> {
        let ext = base.extension().and_then(|e| e.to_str()).unwrap_or("");
        let substitutes: &[&str] = match ext {
            "js" => &["ts", "tsx", "d.ts"],
            "jsx" => &["tsx"],
            "mjs" => &["mts", "d.mts"],
            "cjs" => &["cts", "d.cts"],
            _ => &[],
        };
        for substitute in substitutes {
            let candidate = base.with_extension(substitute);
            if host.file_exists(&candidate) {
                return Some(candidate);
            }
        }
        if matches!(ext, "ts" | "tsx" | "mts" | "cts" | "js" | "jsx" | "mjs" | "cjs")
            && host.file_exists(base)
        {
            return Some(base.to_path_buf());
        }

        for suffix in PROBE_EXTENSIONS {
            let candidate = with_suffix(base, suffix);
            if host.file_exists(&candidate) {
                return Some(candidate);
            }
        }

        if host.directory_exists(base) {
            for suffix in PROBE_EXTENSIONS {
                let candidate = with_suffix(&base.join("index"), suffix);
                if host.file_exists(&candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Looks for `node_modules/<package>` (or its `@types` package) from the
    /// importer's directory up to the project root.
    fn package_installed<H: CompilerHost + ?Sized>(
        &self,
        package: &str,
        importer: &Path,
        host: &H,
    ) -> bool {
        let types = types_package(package);
        let mut dir = importer.parent();
        while let Some(current) = dir {
            let modules = current.join("node_modules");
            if host.directory_exists(&modules.join(package))
                || host.directory_exists(&modules.join(&types))
            {
                return true;
            }
            if current == self.root || !current.starts_with(&self.root) {
                break;
            }
            dir = current.parent();
        }
        false
    }
}

fn is_path_like(spec: &str) -> bool {
    spec == "." || spec == ".." || spec.starts_with("./") || spec.starts_with("../") || spec.starts_with('/')
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = base.as_os_str().to_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// The package a bare specifier belongs to: `react-dom/client` → `react-dom`,
/// `@scope/pkg/sub` → `@scope/pkg`, `node:fs` → `@types/node`.
pub fn package_name(spec: &str) -> String {
    if spec.starts_with("node:") {
        return "@types/node".to_string();
    }
    let mut parts = spec.split('/');
    let first = parts.next().unwrap_or(spec);
    match (first.starts_with('@'), parts.next()) {
        (true, Some(second)) => format!("{first}/{second}"),
        _ => first.to_string(),
    }
}

fn types_package(package: &str) -> String {
    match package.strip_prefix('@') {
        Some(_) if package.starts_with("@types/") => package.to_string(),
        Some(scoped) => format!("@types/{}", scoped.replacen('/', "__", 1)),
        None => format!("@types/{package}"),
    }
}
