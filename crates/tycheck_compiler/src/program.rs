//! The incremental checker.
//!
//! A [`Program`] owns the project configuration and the build cache. Each
//! [`check`](Program::check) discovers the program's files through a
//! [`CompilerHost`], reuses cached analyses whose version token still matches,
//! parses the rest in parallel, and re-runs the cross-file checks.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tycheck_cache::{BuildCache, CacheError};
use tycheck_common::{display_relative, normalize_path, VersionToken};
use tycheck_config::ProjectConfig;
use tycheck_diagnostics::{Diagnostic, DiagnosticSink};
use tycheck_overlay::CompilerHost;
use tycheck_source::SourceDb;

use crate::analysis::{CachedDiagnostic, FileAnalysis};
use crate::error::CompilationError;
use crate::lang::Lang;
use crate::parse;
use crate::resolve::{Resolution, Resolver};
use crate::semantic::ModuleGraph;

/// Version recorded in the build cache; caches from other versions are
/// discarded on load.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Files in the program.
    pub files: usize,
    /// Files parsed during this pass.
    pub parsed: usize,
    /// Files whose cached analysis was reused.
    pub reused: usize,
    /// Whether the build cache gained, replaced or dropped records.
    pub cache_changed: bool,
}

/// Result of one pass.
pub struct CheckOutput {
    /// Every diagnostic of the program, ordered by file name then position.
    pub diagnostics: Vec<Diagnostic>,
    /// Texts of the files the diagnostics point into.
    pub sources: SourceDb,
    /// Pass counters.
    pub stats: PassStats,
}

impl CheckOutput {
    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }
}

/// A TypeScript project under incremental checking.
pub struct Program {
    root: PathBuf,
    config: ProjectConfig,
    resolver: Resolver,
    cache: BuildCache<FileAnalysis>,
}

impl Program {
    /// Loads `tycheck.toml` from `root` and opens the build cache.
    pub fn new(root: &Path) -> Result<Self, CompilationError> {
        if !root.is_dir() {
            return Err(CompilationError::MissingRoot(root.to_path_buf()));
        }
        let config = tycheck_config::load_config(root)?;
        Ok(Self::with_config(root, config))
    }

    /// Creates a program with an explicit configuration.
    pub fn with_config(root: &Path, config: ProjectConfig) -> Self {
        let root = normalize_path(root);
        let cache = if config.cache.enabled {
            BuildCache::load_or_create(&root.join(&config.cache.dir), TOOL_VERSION)
        } else {
            BuildCache::in_memory(TOOL_VERSION)
        };
        let resolver = Resolver::new(&root, &config);
        Self {
            root,
            config,
            resolver,
            cache,
        }
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Number of analyses held by the build cache.
    pub fn cached_files(&self) -> usize {
        self.cache.len()
    }

    /// Runs one diagnostic pass over the program as `host` presents it.
    pub fn check<H: CompilerHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<CheckOutput, CompilationError> {
        let mut stats = PassStats::default();
        let mut analyses: HashMap<PathBuf, FileAnalysis> = HashMap::new();
        let mut versions: HashMap<PathBuf, VersionToken> = HashMap::new();
        let mut texts: HashMap<PathBuf, String> = HashMap::new();
        let mut targets: HashMap<PathBuf, Vec<Option<PathBuf>>> = HashMap::new();

        let mut level = self.root_files(host);
        let mut seen: HashSet<PathBuf> = level.iter().cloned().collect();

        while !level.is_empty() {
            let mut stale: Vec<(PathBuf, Lang, String)> = Vec::new();
            for path in &level {
                let Some(lang) = Lang::from_path(path) else {
                    continue;
                };
                let version = host.version(path);
                if let Some(cached) = self.cache.lookup(path, version) {
                    versions.insert(path.clone(), version);
                    analyses.insert(path.clone(), cached.clone());
                    stats.reused += 1;
                    continue;
                }
                match host.read_file(path) {
                    Some(text) => {
                        versions.insert(path.clone(), version);
                        stale.push((path.clone(), lang, text));
                    }
                    None => tracing::debug!(path = %path.display(), "skipping unreadable file"),
                }
            }

            let parsed: Vec<(PathBuf, String, Result<FileAnalysis, CompilationError>)> = stale
                .into_par_iter()
                .map(|(path, lang, text)| {
                    let result = parse::analyze(&path, lang, &text);
                    (path, text, result)
                })
                .collect();
            for (path, text, result) in parsed {
                analyses.insert(path.clone(), result?);
                texts.insert(path.clone(), text);
                stats.parsed += 1;
            }

            let mut next = Vec::new();
            for path in &level {
                let Some(analysis) = analyses.get(path) else {
                    continue;
                };
                let resolved: Vec<Option<PathBuf>> = analysis
                    .imports
                    .iter()
                    .map(|record| self.resolver.resolve_file(&record.specifier, path, &*host))
                    .collect();
                for target in resolved.iter().flatten() {
                    if self.is_program_file(target) && seen.insert(target.clone()) {
                        next.push(target.clone());
                    }
                }
                targets.insert(path.clone(), resolved);
            }
            next.sort();
            level = next;
        }
        stats.files = analyses.len();

        let mut declared: Vec<String> = analyses
            .values()
            .flat_map(|a| a.declared_modules.iter().cloned())
            .collect();
        declared.sort();
        declared.dedup();

        let mut resolutions: HashMap<PathBuf, Vec<Resolution>> = HashMap::new();
        for (path, analysis) in &analyses {
            let file_targets = targets.remove(path).unwrap_or_default();
            let resolved = analysis
                .imports
                .iter()
                .zip(file_targets)
                .map(|(record, target)| match target {
                    Some(target) => Resolution::File(target),
                    None => self.resolver.resolve_non_file(
                        &record.specifier,
                        path,
                        &declared,
                        &*host,
                    ),
                })
                .collect();
            resolutions.insert(path.clone(), resolved);
        }

        stats.cache_changed = self.update_cache(&versions, &analyses);

        let mut files: Vec<(String, &PathBuf)> = analyses
            .keys()
            .map(|path| (display_relative(path, &self.root), path))
            .collect();
        files.sort();

        let graph = ModuleGraph::new(&analyses, &resolutions);
        let per_file: Vec<Vec<CachedDiagnostic>> = files
            .par_iter()
            .map(|(_, path)| {
                let mut diags = analyses[*path].diagnostics.clone();
                diags.extend(graph.check_file(path));
                diags.sort_by_key(|d| (d.range.start, d.code));
                diags
            })
            .collect();

        let mut sources = SourceDb::new();
        let sink = DiagnosticSink::new();
        for ((name, path), diags) in files.iter().zip(per_file) {
            if diags.is_empty() {
                continue;
            }
            let text = match texts.remove(*path) {
                Some(text) => text,
                None => host.read_file(path).unwrap_or_default(),
            };
            let file = sources.add_source(name.clone(), text);
            sink.extend(diags.iter().map(|d| d.to_diagnostic(file)));
        }

        tracing::debug!(
            files = stats.files,
            parsed = stats.parsed,
            reused = stats.reused,
            errors = sink.error_count(),
            "check pass complete"
        );

        Ok(CheckOutput {
            diagnostics: sink.into_diagnostics(),
            sources,
            stats,
        })
    }

    /// Writes the build cache to disk if it changed.
    pub fn persist(&mut self) -> Result<(), CacheError> {
        self.cache.save()
    }

    /// Code files under the `include` directories.
    fn root_files<H: CompilerHost + ?Sized>(&self, host: &H) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .config
            .project
            .include
            .iter()
            .flat_map(|dir| {
                let dir = normalize_path(&self.root.join(dir));
                host.list_files(&dir, &self.config.project.exclude)
            })
            .filter(|path| self.is_program_file(path))
            .collect();
        files.sort();
        files.dedup();
        files
    }

    fn is_program_file(&self, path: &Path) -> bool {
        if path.components().any(|c| c.as_os_str() == "node_modules") {
            return false;
        }
        match Lang::from_path(path) {
            Some(lang) => lang.is_typescript() || self.config.compiler.allow_js,
            None => false,
        }
    }

    /// Brings the cache in line with this pass. Returns `false` when every
    /// file matched its cached token and nothing was touched.
    fn update_cache(
        &mut self,
        versions: &HashMap<PathBuf, VersionToken>,
        analyses: &HashMap<PathBuf, FileAnalysis>,
    ) -> bool {
        let changes = self.cache.detect_changes(versions);
        if changes.is_empty() {
            return false;
        }
        let dirty = changes.dirty_count();
        let unchanged = changes.unchanged_files.len();
        for path in changes.new_files.into_iter().chain(changes.modified_files) {
            if let (Some(version), Some(analysis)) = (versions.get(&path), analyses.get(&path)) {
                self.cache.insert(path, *version, analysis.clone());
            }
        }
        let live: HashSet<PathBuf> = versions.keys().cloned().collect();
        let pruned = self.cache.prune(&live);
        tracing::debug!(dirty, unchanged, removed = pruned, "build cache updated");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tycheck_diagnostics::DiagnosticCode;
    use tycheck_overlay::{DiskHost, EditBatch, OverlayHost, OverlayStore, RawEdit};

    fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        dir
    }

    fn codes(output: &CheckOutput) -> Vec<u32> {
        output.diagnostics.iter().map(|d| d.code.number()).collect()
    }

    #[test]
    fn clean_project_has_no_diagnostics() {
        let dir = project(&[
            ("src/main.tsx", "import App from './App';\nimport './index.css';\nexport const root = <App />;\n"),
            ("src/App.tsx", "export default function App() { return <div>Hi</div>; }\n"),
        ]);
        let mut program = Program::new(dir.path()).unwrap();
        let output = program.check(&mut DiskHost::new()).unwrap();
        assert!(output.diagnostics.is_empty(), "{:?}", codes(&output));
        assert_eq!(output.stats.files, 2);
        assert_eq!(output.stats.parsed, 2);
    }

    #[test]
    fn second_pass_reuses_every_analysis() {
        let dir = project(&[("src/a.ts", "export const a = 1;\n")]);
        let mut program = Program::new(dir.path()).unwrap();
        let mut host = DiskHost::new();
        program.check(&mut host).unwrap();
        let second = program.check(&mut host).unwrap();
        assert_eq!(second.stats.parsed, 0);
        assert_eq!(second.stats.reused, 1);
        assert!(!second.stats.cache_changed);
    }

    #[test]
    fn cache_changes_only_when_files_do() {
        let dir = project(&[("src/a.ts", "export const a = 1;\n")]);
        let mut program = Program::new(dir.path()).unwrap();
        let mut disk = DiskHost::new();
        let mut store = OverlayStore::new(dir.path());

        let first = program
            .check(&mut OverlayHost::new(&mut store, &mut disk))
            .unwrap();
        assert!(first.stats.cache_changed);
        let idle = program
            .check(&mut OverlayHost::new(&mut store, &mut disk))
            .unwrap();
        assert!(!idle.stats.cache_changed);

        let batch = EditBatch::validate(&[RawEdit::update("src/a.ts", "export const a = 2;\n")]).unwrap();
        store.apply_batch(&batch);
        let edited = program
            .check(&mut OverlayHost::new(&mut store, &mut disk))
            .unwrap();
        assert!(edited.stats.cache_changed);
        assert_eq!(edited.stats.parsed, 1);
    }

    #[test]
    fn missing_module_is_reported_with_source() {
        let dir = project(&[("src/App.tsx", "import Missing from './Missing';\nexport default 1;\n")]);
        let mut program = Program::new(dir.path()).unwrap();
        let output = program.check(&mut DiskHost::new()).unwrap();
        assert_eq!(codes(&output), vec![DiagnosticCode::CANNOT_FIND_MODULE.number()]);
        let span = output.diagnostics[0].primary_span;
        assert_eq!(output.sources.get_file(span.file).name, "src/App.tsx");
        assert_eq!(output.sources.snippet(span), "'./Missing'");
    }

    #[test]
    fn cache_survives_a_new_program() {
        let dir = project(&[("src/a.ts", "export const a = 1;\n")]);
        let mut host = DiskHost::new();
        {
            let mut program = Program::new(dir.path()).unwrap();
            program.check(&mut host).unwrap();
            program.persist().unwrap();
        }
        assert!(dir.path().join(".tycheck/buildinfo.bin").exists());
        let mut program = Program::new(dir.path()).unwrap();
        let output = program.check(&mut host).unwrap();
        assert_eq!(output.stats.reused, 1);
        assert_eq!(output.stats.parsed, 0);
    }

    #[test]
    fn disabled_cache_is_not_written() {
        let dir = project(&[
            ("tycheck.toml", "[cache]\nenabled = false\n"),
            ("src/a.ts", "export const a = 1;\n"),
        ]);
        let mut program = Program::new(dir.path()).unwrap();
        program.check(&mut DiskHost::new()).unwrap();
        program.persist().unwrap();
        assert!(!dir.path().join(".tycheck").exists());
    }

    #[test]
    fn overlay_files_join_the_program() {
        let dir = project(&[("src/App.tsx", "import { Button } from './Button';\nexport default Button;\n")]);
        let mut program = Program::new(dir.path()).unwrap();
        let mut disk = DiskHost::new();
        let mut store = OverlayStore::new(dir.path());

        let before = program
            .check(&mut OverlayHost::new(&mut store, &mut disk))
            .unwrap();
        assert_eq!(codes(&before), vec![2307]);

        let batch = EditBatch::validate(&[RawEdit::create(
            "src/Button.tsx",
            "export const Button = () => <button />;\n",
        )])
        .unwrap();
        store.apply_batch(&batch);
        let after = program
            .check(&mut OverlayHost::new(&mut store, &mut disk))
            .unwrap();
        assert!(after.diagnostics.is_empty());
        assert_eq!(after.stats.files, 2);
        assert_eq!(after.stats.parsed, 1);
    }

    #[test]
    fn files_outside_include_are_reached_through_imports() {
        let dir = project(&[
            ("src/a.ts", "import { helper } from '../lib/helper';\nexport const a = helper;\n"),
            ("lib/helper.ts", "export const helper = 1;\nexport default helper;\nexport default 2;\n"),
        ]);
        let mut program = Program::new(dir.path()).unwrap();
        let output = program.check(&mut DiskHost::new()).unwrap();
        assert_eq!(output.stats.files, 2);
        assert!(codes(&output).contains(&DiagnosticCode::MULTIPLE_DEFAULT_EXPORTS.number()));
        let span = output.diagnostics[0].primary_span;
        assert_eq!(output.sources.get_file(span.file).name, "lib/helper.ts");
    }

    #[test]
    fn diagnostics_are_ordered_by_file() {
        let dir = project(&[
            ("src/b.ts", "import './nope';\n"),
            ("src/a.ts", "import './gone';\n"),
        ]);
        let mut program = Program::new(dir.path()).unwrap();
        let output = program.check(&mut DiskHost::new()).unwrap();
        let names: Vec<&str> = output
            .diagnostics
            .iter()
            .map(|d| output.sources.get_file(d.primary_span.file).name.as_str())
            .collect();
        assert_eq!(names, vec!["src/a.ts", "src/b.ts"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Program::new(&dir.path().join("absent")).err().unwrap();
        assert!(matches!(err, CompilationError::MissingRoot(_)));
    }
}
