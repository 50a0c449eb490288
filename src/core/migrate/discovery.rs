//! Candidate file discovery.

use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};

use glob_match::glob_match;
use serde::Serialize;

use crate::defaults::DiscoveryConfig;
use crate::utils::parser;

/// Directories to always skip at any depth (VCS, dependency and build output).
const ALWAYS_SKIP_DIRS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "node_modules",
    "vendor",
    "Pods",
    "DerivedData",
    ".build",
];

/// A file holding at least one legacy reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateFile {
    pub file: String,
    pub instances: usize,
}

/// Files under `root` that match the discovery config and contain `marker`.
///
/// Sorted by path so runs enumerate in a stable order.
pub fn discover_files(root: &Path, config: &DiscoveryConfig, marker: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk_recursive(root, root, config, &mut files);

    files.retain(|path| {
        fs::read_to_string(path)
            .map(|content| content.contains(marker))
            .unwrap_or(false)
    });
    files.sort();
    files
}

/// Candidates with their marker counts, most references first.
pub fn list_candidates(root: &Path, config: &DiscoveryConfig, marker: &str) -> Vec<CandidateFile> {
    let mut candidates: Vec<CandidateFile> = discover_files(root, config, marker)
        .into_iter()
        .map(|path| CandidateFile {
            instances: count_marker_instances(&path, marker),
            file: relative(&path, root),
        })
        .collect();

    candidates.sort_by_key(|c| Reverse(c.instances));
    candidates
}

/// Non-overlapping occurrences of `marker` in a file; 0 when unreadable.
pub fn count_marker_instances(path: &Path, marker: &str) -> usize {
    fs::read_to_string(path)
        .map(|content| parser::count_occurrences(&content, marker))
        .unwrap_or(0)
}

fn walk_recursive(dir: &Path, root: &Path, config: &DiscoveryConfig, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let rel = relative(&path, root);

        if path.is_dir() {
            let name = entry.file_name().to_string_lossy().to_string();
            if ALWAYS_SKIP_DIRS.contains(&name.as_str()) || is_excluded(&rel, config) {
                continue;
            }
            walk_recursive(&path, root, config, files);
        } else if has_extension(&path, config) && !is_excluded(&rel, config) {
            files.push(path);
        }
    }
}

fn has_extension(path: &Path, config: &DiscoveryConfig) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| config.extensions.iter().any(|wanted| wanted == ext))
        .unwrap_or(false)
}

fn is_excluded(rel: &str, config: &DiscoveryConfig) -> bool {
    config.exclude.iter().any(|pattern| glob_match(pattern, rel))
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(exclude: &[&str]) -> DiscoveryConfig {
        DiscoveryConfig {
            extensions: vec!["swift".to_string()],
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("Views/Budget")).unwrap();
        fs::create_dir_all(root.join("Generated")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("Pods/Lib")).unwrap();

        fs::write(root.join("Views/Home.swift"), "AppColors.primary\nAppColors.accent\n").unwrap();
        fs::write(root.join("Views/Budget/Row.swift"), "AppColors.Budget.income\n").unwrap();
        fs::write(root.join("Views/Plain.swift"), "Color.red\n").unwrap();
        fs::write(root.join("Views/Notes.md"), "AppColors.primary\n").unwrap();
        fs::write(root.join("Generated/Assets.swift"), "AppColors.primary\n").unwrap();
        fs::write(root.join(".git/HEAD.swift"), "AppColors.primary\n").unwrap();
        fs::write(root.join("Pods/Lib/X.swift"), "AppColors.primary\n").unwrap();
        dir
    }

    #[test]
    fn finds_only_marked_source_files() {
        let dir = tree();
        let files = discover_files(dir.path(), &config(&[]), "AppColors.");
        let rels: Vec<String> = files.iter().map(|p| relative(p, dir.path())).collect();
        assert_eq!(
            rels,
            vec!["Generated/Assets.swift", "Views/Budget/Row.swift", "Views/Home.swift"]
        );
    }

    #[test]
    fn exclude_globs_apply_to_relative_paths() {
        let dir = tree();
        let files = discover_files(dir.path(), &config(&["Generated/**", "**/Budget/**"]), "AppColors.");
        let rels: Vec<String> = files.iter().map(|p| relative(p, dir.path())).collect();
        assert_eq!(rels, vec!["Views/Home.swift"]);
    }

    #[test]
    fn list_candidates_sorts_by_count() {
        let dir = tree();
        let listed = list_candidates(dir.path(), &config(&["Generated/**"]), "AppColors.");
        assert_eq!(listed[0].file, "Views/Home.swift");
        assert_eq!(listed[0].instances, 2);
        assert_eq!(listed[1].instances, 1);
    }

    #[test]
    fn count_is_zero_for_missing_file() {
        assert_eq!(count_marker_instances(Path::new("/nonexistent.swift"), "AppColors."), 0);
    }
}
