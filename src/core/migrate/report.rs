//! Aggregate per-file results into the run report and the review file.

use std::path::Path;

use serde::Serialize;

use super::file::MigrationResult;
use super::rewriter::SkipKind;
use crate::utils::parser;

/// Characters of source line kept in a review preview.
pub const PREVIEW_CHARS: usize = 100;

/// Helper for `skip_serializing_if` on zero-value usize fields.
fn is_zero(v: &usize) -> bool {
    *v == 0
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationSummary {
    pub files_processed: usize,
    pub files_modified: usize,
    pub total_replacements: usize,
    pub total_skipped: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub files_with_errors: usize,
}

/// A modified file and how many replacements it received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub file: String,
    pub replacements: usize,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub written: bool,
}

/// One entry of the manual-review list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    pub file: String,
    pub line: usize,
    pub kind: SkipKind,
    pub reason: String,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    pub file: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub summary: MigrationSummary,
    pub modified: Vec<FileChange>,
    pub skipped: Vec<ReviewItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FileError>,
}

impl MigrationReport {
    /// True when anything needs a human: review items or per-file errors.
    pub fn needs_review(&self) -> bool {
        !self.skipped.is_empty() || !self.errors.is_empty()
    }
}

/// Fold results, in order, into a report. Paths under `root` are shown relative to it.
pub fn aggregate(results: &[MigrationResult], root: Option<&Path>) -> MigrationReport {
    let mut report = MigrationReport::default();

    for result in results {
        let file = display_path(&result.file_path, root);

        report.summary.files_processed += 1;
        report.summary.total_replacements += result.replacements_made;
        report.summary.total_skipped += result.skipped_instances.len();

        if result.replacements_made > 0 {
            report.summary.files_modified += 1;
            report.modified.push(FileChange {
                file: file.clone(),
                replacements: result.replacements_made,
                written: result.written,
            });
        }

        for skipped in &result.skipped_instances {
            report.skipped.push(ReviewItem {
                file: file.clone(),
                line: skipped.line_number,
                kind: skipped.kind,
                reason: skipped.reason.clone(),
                preview: parser::truncate_chars(&skipped.line, PREVIEW_CHARS),
            });
        }

        if !result.errors.is_empty() {
            report.summary.files_with_errors += 1;
            for message in &result.errors {
                report.errors.push(FileError {
                    file: file.clone(),
                    message: message.clone(),
                });
            }
        }
    }

    report
}

/// Render the review file: a header, then one tab-separated entry per line.
pub fn render_review(report: &MigrationReport, generated_at: &str) -> String {
    let summary = &report.summary;
    let mut out = format!(
        "# repaint review, generated {}: {} files processed, {} modified, {} replacements, {} need review\n",
        generated_at,
        summary.files_processed,
        summary.files_modified,
        summary.total_replacements,
        summary.total_skipped
    );

    for item in &report.skipped {
        out.push_str(&format!(
            "{}:{}\t{}\t{}\n",
            item.file,
            item.line,
            review_field(&item.reason),
            review_field(&item.preview)
        ));
    }

    out
}

/// Fields are tab-separated; keep each one on a single column.
fn review_field(text: &str) -> String {
    text.replace(['\t', '\r', '\n'], " ")
}

fn display_path(path: &Path, root: Option<&Path>) -> String {
    root.and_then(|r| path.strip_prefix(r).ok())
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}
