//! File migrator: streams a file's lines through the rewriter.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::rewriter::{LineRewriter, SkippedInstance};
use crate::error::Error;
use crate::utils::{io, parser};

/// Outcome of migrating one file. Problems are data, never faults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationResult {
    pub file_path: PathBuf,
    pub replacements_made: usize,
    pub skipped_instances: Vec<SkippedInstance>,
    pub errors: Vec<String>,
    /// Whether the rewritten content was written back.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub written: bool,
}

impl MigrationResult {
    fn new(file_path: &Path) -> Self {
        Self {
            file_path: file_path.to_path_buf(),
            replacements_made: 0,
            skipped_instances: Vec::new(),
            errors: Vec::new(),
            written: false,
        }
    }
}

/// Migrate a single file.
///
/// With `dry_run`, or when nothing was replaced, the file is left
/// byte-identical. Otherwise the full rewritten content goes out in one
/// atomic write.
pub fn migrate_file(path: &Path, rewriter: &LineRewriter<'_>, dry_run: bool) -> MigrationResult {
    let mut result = MigrationResult::new(path);

    let content = match io::read_file(path, &format!("read {}", path.display())) {
        Ok(content) => content,
        Err(err) => {
            result
                .errors
                .push(format!("Failed to read file: {}", io_cause(err)));
            return result;
        }
    };

    let rewritten = rewrite_content(&content, rewriter, &mut result);

    if dry_run || result.replacements_made == 0 {
        return result;
    }

    match io::write_file_atomic(path, &rewritten, &format!("write {}", path.display())) {
        Ok(()) => result.written = true,
        Err(err) => {
            result
                .errors
                .push(format!("Failed to write file: {}", io_cause(err)));
        }
    }

    result
}

fn io_cause(err: Error) -> String {
    err.details["error"]
        .as_str()
        .map(str::to_string)
        .unwrap_or(err.message)
}

/// Rewrite content line by line, preserving order and terminators.
pub fn rewrite_content(
    content: &str,
    rewriter: &LineRewriter<'_>,
    result: &mut MigrationResult,
) -> String {
    let mut out = String::with_capacity(content.len());

    for (idx, raw) in parser::lines_with_endings(content).enumerate() {
        let (body, terminator) = parser::split_terminator(raw);
        let outcome = rewriter.rewrite(body, idx + 1);

        out.push_str(&outcome.line);
        out.push_str(terminator);

        result.replacements_made += outcome.replacements;
        if let Some(skipped) = outcome.skipped {
            result.skipped_instances.push(skipped);
        }
    }

    out
}
