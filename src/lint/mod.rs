//! Linting driver.
//!
//! Ties extraction, evaluation and fixing together for a source buffer, a
//! single file, or a whole project tree.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::analysis::{language_of, AnalysisError, ImportExtractor, SourceLanguage, TextRange};
use crate::fix::{apply_plans, EditPlan, FixError};
use crate::restriction::RestrictionTable;
use crate::rule::{evaluate, plan, ImportIndex, Violation};

/// Upper bound on extract/plan/apply cycles for one file.
pub const MAX_FIX_PASSES: usize = 10;

/// Errors raised while linting a file.
#[derive(Error, Debug)]
pub enum LintError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Failed to apply fix: {0}")]
    Fix(#[from] FixError),

    #[error("Failed to write file: {0}")]
    Io(#[from] io::Error),
}

/// Result type for lint operations.
pub type LintResult<T> = Result<T, LintError>;

/// Violations found on one import statement.
#[derive(Debug, Clone, Serialize)]
pub struct StatementFindings {
    /// 1-based line of the statement.
    pub line: usize,
    pub range: TextRange,
    pub violations: Vec<Violation>,
    #[serde(skip)]
    pub fix: Option<EditPlan>,
}

impl StatementFindings {
    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }
}

/// Result of running the fix loop over a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub text: String,
    /// Number of plans applied across all passes.
    pub applied: usize,
    pub passes: usize,
}

impl FixOutcome {
    pub fn changed(&self) -> bool {
        self.applied > 0
    }
}

/// Lint result for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// Findings left after fixing, or all findings when not fixing.
    pub findings: Vec<StatementFindings>,
    pub fixes_applied: usize,
}

impl FileReport {
    pub fn violation_count(&self) -> usize {
        self.findings.iter().map(|f| f.violations.len()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// A file the project scan could not process.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Lint result for a directory tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectReport {
    pub files_scanned: usize,
    /// Files with findings or applied fixes.
    pub files: Vec<FileReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
}

impl ProjectReport {
    pub fn violation_count(&self) -> usize {
        self.files.iter().map(FileReport::violation_count).sum()
    }

    pub fn fixes_applied(&self) -> usize {
        self.files.iter().map(|f| f.fixes_applied).sum()
    }

    pub fn has_violations(&self) -> bool {
        self.files.iter().any(|f| !f.is_clean())
    }
}

/// Runs the restriction rule over source files.
pub struct Linter {
    table: RestrictionTable,
    extractor: ImportExtractor,
}

impl Linter {
    pub fn new(table: RestrictionTable) -> LintResult<Self> {
        Ok(Self {
            table,
            extractor: ImportExtractor::new()?,
        })
    }

    pub fn table(&self) -> &RestrictionTable {
        &self.table
    }

    /// Evaluates every top-level import of `source` and plans its fix.
    pub fn lint_source(
        &mut self,
        source: &str,
        language: SourceLanguage,
        path: &Path,
    ) -> LintResult<Vec<StatementFindings>> {
        let statements = self.extractor.extract_source(source, language, path)?;
        let index = ImportIndex::new(&statements);

        let findings = statements
            .iter()
            .filter_map(|statement| {
                let violations = evaluate(statement, &self.table);
                if violations.is_empty() {
                    return None;
                }
                debug!(
                    "{}:{}: {} violation(s)",
                    path.display(),
                    statement.line,
                    violations.len()
                );
                let fix = plan(statement, &violations, &index);
                Some(StatementFindings {
                    line: statement.line,
                    range: statement.range,
                    violations,
                    fix,
                })
            })
            .collect();

        Ok(findings)
    }

    /// Applies fixes to `source` until nothing more can be fixed.
    ///
    /// Each pass applies every plan that neither overlaps an earlier plan nor
    /// introduces a module another plan of the same pass already introduces.
    /// The deferred plans are re-planned against the updated text, so a
    /// second relocation to the same new module merges into the import the
    /// first one created.
    pub fn fix_source(
        &mut self,
        source: &str,
        language: SourceLanguage,
        path: &Path,
    ) -> LintResult<FixOutcome> {
        let mut text = source.to_string();
        let mut applied = 0;
        let mut passes = 0;

        while passes < MAX_FIX_PASSES {
            let findings = self.lint_source(&text, language, path)?;
            let plans = select_plans(findings.into_iter().filter_map(|f| f.fix));
            if plans.is_empty() {
                break;
            }

            let count = apply_plans(&mut text, &plans)?;
            passes += 1;
            applied += count;
            debug!("{}: pass {} applied {} fix(es)", path.display(), passes, count);
            if count == 0 {
                break;
            }
        }

        if passes == MAX_FIX_PASSES {
            warn!(
                "{}: stopped fixing after {} passes",
                path.display(),
                MAX_FIX_PASSES
            );
        }

        Ok(FixOutcome {
            text,
            applied,
            passes,
        })
    }

    /// Lints one file, writing fixes back to disk when `fix` is set.
    pub fn lint_file(&mut self, path: &Path, fix: bool) -> LintResult<FileReport> {
        let language = language_of(path)?;
        let source = fs::read_to_string(path).map_err(AnalysisError::FileRead)?;

        let (text, fixes_applied) = if fix {
            let outcome = self.fix_source(&source, language, path)?;
            if outcome.changed() {
                fs::write(path, &outcome.text)?;
                info!(
                    "Fixed {} import(s) in {}",
                    outcome.applied,
                    path.display()
                );
            }
            let applied = outcome.applied;
            (outcome.text, applied)
        } else {
            (source, 0)
        };

        let findings = self.lint_source(&text, language, path)?;
        Ok(FileReport {
            path: path.to_path_buf(),
            findings,
            fixes_applied,
        })
    }

    /// Lints a file, or every supported file under a directory.
    ///
    /// Per-file failures are logged and recorded as skipped; the scan goes on.
    pub fn lint_path(&mut self, root: &Path, fix: bool) -> ProjectReport {
        let mut report = ProjectReport::default();

        for path in collect_files(root) {
            report.files_scanned += 1;
            match self.lint_file(&path, fix) {
                Ok(file) => {
                    if !file.is_clean() || file.fixes_applied > 0 {
                        report.files.push(file);
                    }
                }
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    report.skipped.push(SkippedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }
}

/// Drops plans that would create an import of a module another plan in the
/// list already creates.
fn select_plans(plans: impl IntoIterator<Item = EditPlan>) -> Vec<EditPlan> {
    let mut introduced: HashSet<String> = HashSet::new();
    let mut selected = Vec::new();

    for plan in plans {
        if plan.introduces().iter().any(|m| introduced.contains(m)) {
            debug!("Deferring plan that re-introduces {:?}", plan.introduces());
            continue;
        }
        introduced.extend(plan.introduces().iter().cloned());
        selected.push(plan);
    }

    selected
}

/// Supported source files under `root`, in a stable order.
///
/// A file path is returned as is.
pub fn collect_files(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| SourceLanguage::from_path(e.path()).is_some())
        .map(|e| e.into_path())
        .collect()
}

/// Check if a directory should be ignored during traversal.
fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    matches!(
        name.as_ref(),
        "node_modules" | ".git" | "dist" | "build" | ".next" | "coverage" | ".turbo"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_str, DetailedEntry, ReplacementConfig, RestrictionEntry};
    use tempfile::TempDir;

    fn linter(entries: Vec<RestrictionEntry>) -> Linter {
        Linter::new(RestrictionTable::build(&entries).unwrap()).unwrap()
    }

    fn scoped() -> Vec<RestrictionEntry> {
        vec![DetailedEntry::new("restricted-module")
            .named_imports(["restrictedImport"])
            .replacement(ReplacementConfig::module("replacement-module"))
            .into()]
    }

    fn fix_js(linter: &mut Linter, source: &str) -> FixOutcome {
        linter
            .fix_source(source, SourceLanguage::JavaScript, Path::new("test.js"))
            .unwrap()
    }

    // ===== Lint Tests =====

    #[test]
    fn test_lint_source_reports_lines() {
        let mut linter = linter(vec![RestrictionEntry::exact("lodash")]);
        let source = "import a from 'a';\nimport _ from 'lodash';\n";
        let findings = linter
            .lint_source(source, SourceLanguage::JavaScript, Path::new("test.js"))
            .unwrap();

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 2);
        assert!(!findings[0].is_fixable());
    }

    #[test]
    fn test_lint_source_clean() {
        let mut linter = linter(scoped());
        let findings = linter
            .lint_source(
                "import { allowed } from 'restricted-module';",
                SourceLanguage::JavaScript,
                Path::new("test.js"),
            )
            .unwrap();
        assert!(findings.is_empty());
    }

    // ===== Fix Loop Tests =====

    #[test]
    fn test_fix_is_idempotent() {
        let mut linter = linter(scoped());
        let first = fix_js(
            &mut linter,
            "import { restrictedImport, allowed } from 'restricted-module';\n",
        );
        assert!(first.changed());

        let second = fix_js(&mut linter, &first.text);
        assert!(!second.changed());
        assert_eq!(second.text, first.text);
    }

    #[test]
    fn test_two_relocations_to_new_module_merge() {
        let mut linter = linter(vec![
            DetailedEntry::new("a")
                .named_imports(["x"])
                .replacement(ReplacementConfig::module("z"))
                .into(),
            DetailedEntry::new("b")
                .named_imports(["y"])
                .replacement(ReplacementConfig::module("z"))
                .into(),
        ]);
        let outcome = fix_js(
            &mut linter,
            "import { x, keep } from 'a';\nimport { y } from 'b';\n",
        );

        assert_eq!(
            outcome.text,
            "import { x, y } from 'z';\nimport { keep } from 'a';\n"
        );
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.passes, 2);
    }

    #[test]
    fn test_adjacent_statements_fixed() {
        let mut linter = linter(vec![DetailedEntry::new("react")
            .replacement(ReplacementConfig::module("preact"))
            .into()]);
        let outcome = fix_js(
            &mut linter,
            "import a from 'react';\nimport { b } from 'react';\n",
        );
        assert_eq!(
            outcome.text,
            "import a from 'preact';\nimport { b } from 'preact';\n"
        );
    }

    #[test]
    fn test_unfixable_leaves_text() {
        let mut linter = linter(vec![RestrictionEntry::exact("lodash")]);
        let source = "import _ from 'lodash';\n";
        let outcome = fix_js(&mut linter, source);
        assert_eq!(outcome.text, source);
        assert_eq!(outcome.passes, 0);
    }

    #[test]
    fn test_select_plans_defers_duplicate_introductions() {
        use crate::fix::TextEdit;

        let make = |at: usize| {
            EditPlan::new(vec![TextEdit::insert_before(at, "x")])
                .with_introduced(vec!["z".to_string()])
        };
        let unrelated = EditPlan::new(vec![TextEdit::remove(TextRange::new(20, 21))]);
        let selected = select_plans(vec![make(0), make(10), unrelated]);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].introduces(), &["z".to_string()]);
        assert!(selected[1].introduces().is_empty());
    }

    // ===== File Tests =====

    #[test]
    fn test_lint_file_writes_fix() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("index.ts");
        fs::write(&file, "import { restrictedImport } from \"restricted-module\"\n").unwrap();

        let mut linter = linter(scoped());
        let report = linter.lint_file(&file, true).unwrap();

        assert_eq!(report.fixes_applied, 1);
        assert!(report.is_clean());
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "import { restrictedImport } from \"replacement-module\"\n"
        );
    }

    #[test]
    fn test_lint_file_without_fix_leaves_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("index.js");
        let source = "import { restrictedImport } from 'restricted-module';\n";
        fs::write(&file, source).unwrap();

        let mut linter = linter(scoped());
        let report = linter.lint_file(&file, false).unwrap();

        assert_eq!(report.violation_count(), 1);
        assert!(report.findings[0].is_fixable());
        assert_eq!(fs::read_to_string(&file).unwrap(), source);
    }

    #[test]
    fn test_lint_file_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("style.css");
        fs::write(&file, "body {}").unwrap();

        let mut linter = linter(scoped());
        assert!(matches!(
            linter.lint_file(&file, false),
            Err(LintError::Analysis(AnalysisError::UnsupportedFileType(_)))
        ));
    }

    // ===== Project Tests =====

    #[test]
    fn test_lint_path_skips_ignored_dirs() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("src/a.js"), "import _ from 'lodash';\n").unwrap();
        fs::write(root.join("src/b.jsx"), "import React from 'react';\n").unwrap();
        fs::write(root.join("src/notes.md"), "import _ from 'lodash';\n").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "import _ from 'lodash';\n").unwrap();

        let entries = parse_str(r#"{ "paths": ["lodash"] }"#).unwrap();
        let mut linter = linter(entries);
        let report = linter.lint_path(root, false);

        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.files.len(), 1);
        assert!(report.files[0].path.ends_with("src/a.js"));
        assert_eq!(report.violation_count(), 1);
        assert!(report.has_violations());
    }

    #[test]
    fn test_collect_files_accepts_single_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("only.mjs");
        fs::write(&file, "").unwrap();
        assert_eq!(collect_files(&file), vec![file]);
    }

    #[test]
    fn test_root_named_like_ignored_dir_is_scanned() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("build");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.js"), "").unwrap();
        assert_eq!(collect_files(&root).len(), 1);
    }
}
