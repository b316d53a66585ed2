//! Cross-file checks over the import graph.
//!
//! These run on every pass from cached [`FileAnalysis`] summaries, so a change
//! in one file re-checks its importers without reparsing them.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tycheck_diagnostics::DiagnosticCode;

use crate::analysis::{CachedDiagnostic, FileAnalysis, ImportKind};
use crate::lang::{self, Lang};
use crate::resolve::Resolution;

/// The names a module exports, following `export *` chains.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ExportSet {
    /// Every name known to be exported.
    pub names: HashSet<String>,
    /// Some `export *` target could not be inspected, so any name may exist.
    pub open: bool,
}

impl ExportSet {
    /// Returns `true` if importing `name` is known to be valid.
    pub fn allows(&self, name: &str) -> bool {
        self.open || self.names.contains(name)
    }
}

/// The analysed program: per-file summaries plus per-import resolutions.
pub struct ModuleGraph<'a> {
    analyses: &'a HashMap<PathBuf, FileAnalysis>,
    resolutions: &'a HashMap<PathBuf, Vec<Resolution>>,
}

impl<'a> ModuleGraph<'a> {
    /// Builds a graph view. `resolutions[file][i]` belongs to
    /// `analyses[file].imports[i]`.
    pub fn new(
        analyses: &'a HashMap<PathBuf, FileAnalysis>,
        resolutions: &'a HashMap<PathBuf, Vec<Resolution>>,
    ) -> Self {
        Self {
            analyses,
            resolutions,
        }
    }

    /// Computes the export set of `file`.
    pub fn exports_of(&self, file: &Path) -> ExportSet {
        let mut set = ExportSet::default();
        let mut visited = HashSet::new();
        self.collect_exports(file, &mut set, &mut visited);
        set
    }

    fn collect_exports<'p>(
        &'p self,
        file: &'p Path,
        set: &mut ExportSet,
        visited: &mut HashSet<&'p Path>,
    ) {
        if !visited.insert(file) {
            return;
        }
        let Some(analysis) = self.analyses.get(file) else {
            set.open = true;
            return;
        };
        if analysis.exports.export_assignment {
            set.open = true;
        }
        set.names.extend(analysis.exports.names.iter().cloned());

        let resolutions = self.resolutions.get(file).map(Vec::as_slice).unwrap_or(&[]);
        for (record, resolution) in analysis.imports.iter().zip(resolutions) {
            if !record.star {
                continue;
            }
            match resolution {
                Resolution::File(target) => self.collect_exports(target, set, visited),
                _ => set.open = true,
            }
        }
    }

    /// Runs the cross-file checks for the imports of `file`.
    pub fn check_file(&self, file: &Path) -> Vec<CachedDiagnostic> {
        let mut diags = Vec::new();
        let Some(analysis) = self.analyses.get(file) else {
            return diags;
        };
        let resolutions = self.resolutions.get(file).map(Vec::as_slice).unwrap_or(&[]);
        let mut export_sets: HashMap<&Path, ExportSet> = HashMap::new();

        for (record, resolution) in analysis.imports.iter().zip(resolutions) {
            let target = match resolution {
                Resolution::Unresolved => {
                    diags.push(CachedDiagnostic::error(
                        DiagnosticCode::CANNOT_FIND_MODULE,
                        format!(
                            "Cannot find module '{}' or its corresponding type declarations.",
                            record.specifier
                        ),
                        record.range,
                    ));
                    continue;
                }
                Resolution::File(target) => target,
                Resolution::Ambient | Resolution::Package(_) => continue,
            };
            if matches!(record.kind, ImportKind::Dynamic | ImportKind::RequireAlias) {
                continue;
            }
            // Only typed local modules have a shape worth checking.
            if !Lang::from_path(target).is_some_and(|lang| lang.is_typescript()) {
                continue;
            }
            let Some(target_analysis) = self.analyses.get(target.as_path()) else {
                continue;
            };
            if target_analysis.exports.export_assignment {
                continue;
            }

            // Declaration files allow a synthesized default import.
            if let Some(range) = record.default_binding {
                if !target_analysis.exports.has_default && !lang::is_declaration_file(target) {
                    diags.push(CachedDiagnostic::error(
                        DiagnosticCode::NO_DEFAULT_EXPORT,
                        format!("Module '\"{}\"' has no default export.", record.specifier),
                        range,
                    ));
                }
            }

            if record.named.is_empty() {
                continue;
            }
            let exports = export_sets
                .entry(target.as_path())
                .or_insert_with(|| self.exports_of(target));
            for binding in &record.named {
                if !exports.allows(&binding.name) {
                    diags.push(CachedDiagnostic::error(
                        DiagnosticCode::NO_EXPORTED_MEMBER,
                        format!(
                            "Module '\"{}\"' has no exported member '{}'.",
                            record.specifier, binding.name
                        ),
                        binding.range,
                    ));
                }
            }
        }
        diags
    }
}
