//! Token migration: rewrite a legacy symbol vocabulary into a new one.
//!
//! Works line by line on plain text, never on a syntax tree:
//!
//! 1. Discover candidate files holding the legacy marker (or take one file)
//! 2. Skip lines that touch a protected sub-vocabulary
//! 3. Apply direct mappings, then opacity-style parameterized mappings
//! 4. Report every reference that could not be mapped
//! 5. Write back files with replacements (unless dry run) and aggregate

mod discovery;
mod file;
mod report;
mod rewriter;
mod rules;
mod skip;

use std::path::{Path, PathBuf};

pub use discovery::{count_marker_instances, discover_files, list_candidates, CandidateFile};
pub use file::{migrate_file, rewrite_content, MigrationResult};
pub use report::{
    aggregate, render_review, FileChange, FileError, MigrationReport, MigrationSummary, ReviewItem,
    PREVIEW_CHARS,
};
pub use rewriter::{LineOutcome, LineRewriter, SkipKind, SkippedInstance};
pub use rules::{
    OpacityMapping, ParameterizedColorEntry, ParameterizedLookup, ReplacementRule, RuleTable,
};
pub use skip::{SkipPattern, SkipPolicy};

use crate::defaults::{RepaintConfig, RuleSetConfig};
use crate::{Error, Result};

/// Rule table and skip policy for one run. Read-only once built.
#[derive(Debug, Clone)]
pub struct Engine {
    pub rules: RuleTable,
    pub skip: SkipPolicy,
}

impl Engine {
    pub fn from_config(config: &RuleSetConfig) -> Result<Self> {
        Ok(Self {
            rules: RuleTable::from_config(config)?,
            skip: SkipPolicy::from_config(config)?,
        })
    }

    pub fn rewriter(&self) -> LineRewriter<'_> {
        LineRewriter::new(&self.rules, &self.skip)
    }
}

/// Where and how to run a migration.
#[derive(Debug, Clone)]
pub struct MigrateOptions {
    pub root: PathBuf,
    /// Process only this file. Relative paths resolve against `root`.
    pub file: Option<PathBuf>,
    pub dry_run: bool,
}

/// Migrate a sequence of files, one at a time, in the given order.
pub fn migrate_files(files: &[PathBuf], engine: &Engine, dry_run: bool) -> Vec<MigrationResult> {
    let rewriter = engine.rewriter();

    files
        .iter()
        .map(|path| {
            let result = migrate_file(path, &rewriter, dry_run);
            if result.replacements_made > 0 {
                log_status!(
                    "migrate",
                    "{}: {} replacements{}",
                    path.display(),
                    result.replacements_made,
                    if dry_run { " (dry run)" } else { "" }
                );
            }
            for error in &result.errors {
                log_status!("migrate", "{}: {}", path.display(), error);
            }
            result
        })
        .collect()
}

/// Resolve targets, migrate them, and aggregate the report.
///
/// Only a missing root or target file is fatal; per-file problems end up
/// in the report.
pub fn run(config: &RepaintConfig, options: &MigrateOptions) -> Result<MigrationReport> {
    let engine = Engine::from_config(&config.rules)?;
    let files = resolve_targets(config, options, engine.rules.marker())?;

    log_status!(
        "migrate",
        "Processing {} file(s) under {}{}",
        files.len(),
        options.root.display(),
        if options.dry_run { " (dry run)" } else { "" }
    );

    let results = migrate_files(&files, &engine, options.dry_run);
    let report = aggregate(&results, Some(&options.root));

    log_status!(
        "migrate",
        "Complete: {} files, {} modified, {} replacements, {} need review",
        report.summary.files_processed,
        report.summary.files_modified,
        report.summary.total_replacements,
        report.summary.total_skipped
    );

    Ok(report)
}

/// List candidate files under a root with their marker counts.
pub fn list(config: &RepaintConfig, root: &Path) -> Result<Vec<CandidateFile>> {
    require_root(root)?;
    let engine = Engine::from_config(&config.rules)?;
    Ok(list_candidates(root, &config.discovery, engine.rules.marker()))
}

fn resolve_targets(
    config: &RepaintConfig,
    options: &MigrateOptions,
    marker: &str,
) -> Result<Vec<PathBuf>> {
    require_root(&options.root)?;

    match &options.file {
        Some(file) => {
            let path = if file.is_absolute() {
                file.clone()
            } else {
                options.root.join(file)
            };
            if !path.is_file() {
                return Err(Error::target_not_found("target file", path.display().to_string()));
            }
            Ok(vec![path])
        }
        None => {
            let files = discover_files(&options.root, &config.discovery, marker);
            log_status!("discover", "Found {} candidate file(s)", files.len());
            Ok(files)
        }
    }
}

fn require_root(root: &Path) -> Result<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(Error::target_not_found("root directory", root.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::builtin_config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn run_rejects_missing_root() {
        let options = MigrateOptions {
            root: PathBuf::from("/nonexistent/root"),
            file: None,
            dry_run: true,
        };
        let err = run(&builtin_config(), &options).unwrap_err();
        assert_eq!(err.code.as_str(), "target.not_found");
    }

    #[test]
    fn run_rejects_missing_target_file() {
        let dir = TempDir::new().unwrap();
        let options = MigrateOptions {
            root: dir.path().to_path_buf(),
            file: Some(PathBuf::from("Views/Nope.swift")),
            dry_run: true,
        };
        let err = run(&builtin_config(), &options).unwrap_err();
        assert_eq!(err.details["kind"], "target file");
    }

    #[test]
    fn run_with_relative_file_override() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("Views")).unwrap();
        fs::write(dir.path().join("Views/A.swift"), "AppColors.success\n").unwrap();
        fs::write(dir.path().join("Views/B.swift"), "AppColors.success\n").unwrap();

        let options = MigrateOptions {
            root: dir.path().to_path_buf(),
            file: Some(PathBuf::from("Views/A.swift")),
            dry_run: false,
        };
        let report = run(&builtin_config(), &options).unwrap();

        assert_eq!(report.summary.files_processed, 1);
        assert_eq!(report.modified[0].file, "Views/A.swift");
        assert_eq!(
            fs::read_to_string(dir.path().join("Views/A.swift")).unwrap(),
            "SemanticColors.success\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("Views/B.swift")).unwrap(),
            "AppColors.success\n"
        );
    }

    #[test]
    fn invalid_rules_fail_before_touching_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("A.swift"), "AppColors.success\n").unwrap();

        let mut config = builtin_config();
        config.rules.parameterized.push("unknown".to_string());
        let options = MigrateOptions {
            root: dir.path().to_path_buf(),
            file: None,
            dry_run: false,
        };

        assert!(run(&config, &options).is_err());
        assert_eq!(fs::read_to_string(dir.path().join("A.swift")).unwrap(), "AppColors.success\n");
    }
}
