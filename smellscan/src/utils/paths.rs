//! Path utilities.
//!
//! Display normalisation and source discovery with gitignore support.

use crate::constants::DEFAULT_EXCLUDE_FOLDERS;
use crate::language::Language;
use std::path::{Path, PathBuf};

/// Normalizes a path for CLI display.
///
/// - Converts backslashes to forward slashes
/// - Strips a leading "./" or ".\" prefix
///
/// # Examples
/// ```
/// use std::path::Path;
/// use smellscan::utils::normalize_display_path;
///
/// assert_eq!(normalize_display_path(Path::new(".\\src\\Main.java")), "src/Main.java");
/// assert_eq!(normalize_display_path(Path::new("./lib/app.js")), "lib/app.js");
/// ```
#[must_use]
pub fn normalize_display_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    let clean = s.trim_start_matches(r"\\?\");
    let normalized = clean.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .unwrap_or(&normalized)
        .to_owned()
}

/// Checks if a name matches any exclusion pattern.
/// Supports exact matching and wildcard patterns starting with `*.`.
#[must_use]
pub fn is_excluded(name: &str, excludes: &[String]) -> bool {
    excludes.iter().any(|exclude| {
        if exclude.starts_with("*.") {
            name.ends_with(&exclude[1..])
        } else {
            name == exclude
        }
    })
}

/// Collects analysable source files below `root`.
///
/// Uses the `ignore` crate to respect .gitignore, .git/info/exclude and the
/// global gitignore in addition to the default exclusions. Only files whose
/// extension maps to a [`Language`] are returned, sorted for stable output.
/// A `root` that is itself a file is returned as-is.
#[must_use]
pub fn collect_source_files(root: &Path, exclude: &[String]) -> Vec<PathBuf> {
    use ignore::WalkBuilder;

    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    let excludes: Vec<String> = exclude
        .iter()
        .cloned()
        .chain(DEFAULT_EXCLUDE_FOLDERS().iter().map(|&s| s.to_owned()))
        .collect();
    let root_for_filter = root.to_path_buf();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .filter_entry(move |entry| {
            if entry.path() == root_for_filter {
                return true;
            }
            if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }
            entry
                .file_name()
                .to_str()
                .map_or(true, |name| !is_excluded(name, &excludes))
        })
        .build();

    let mut files: Vec<PathBuf> = walker
        .filter_map(|result| match result {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("walk error: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|path| Language::from_path(path).is_ok())
        .collect();
    files.sort();
    files
}
