//! Loading source text, with an optional cache keyed by file freshness.

use crate::error::{AnalysisError, Result};
use crate::language::Language;
use rustc_hash::FxHashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Source text plus the language tag it should be analysed as.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Where the text came from; `None` for inline text.
    pub path: Option<PathBuf>,
    /// Recognised language, `None` for unrecognised extensions.
    pub language: Option<Language>,
    /// Extension as found on the path, without the dot.
    pub extension: String,
    /// File content. Invalid UTF-8 is replaced, never rejected.
    pub content: Arc<str>,
}

impl SourceFile {
    /// Wraps inline text.
    #[must_use]
    pub fn from_text(text: &str, language: Option<Language>) -> Self {
        Self {
            path: None,
            language,
            extension: language.map(Language::extension).unwrap_or_default().to_owned(),
            content: Arc::from(text),
        }
    }

    /// Reads a file from disk.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::SourceNotFound`] if the path does not exist,
    /// [`AnalysisError::Io`] if it cannot be read.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = read_bytes(path)?;
        Ok(Self::from_parts(path, Arc::from(String::from_utf8_lossy(&bytes))))
    }

    fn from_parts(path: &Path, content: Arc<str>) -> Self {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path: Some(path.to_path_buf()),
            language: Language::from_extension(&extension),
            extension,
            content,
        }
    }

    /// Path for display, or `<text>` for inline sources.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "<text>".to_owned(), |p| crate::utils::normalize_display_path(p))
    }
}

fn read_error(path: &Path, source: io::Error) -> AnalysisError {
    match source.kind() {
        io::ErrorKind::NotFound => AnalysisError::SourceNotFound {
            path: path.to_path_buf(),
        },
        _ => AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        },
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| read_error(path, source))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    modified: Option<SystemTime>,
    size: u64,
}

/// Source text cache keyed by `(path, mtime, size)`. A changed file gets a
/// new key, so stale entries are never returned.
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: FxHashMap<CacheKey, Arc<str>>,
    hits: usize,
}

impl SourceCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `path`, returning the cached text when the file is unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`SourceFile::read`].
    pub fn load(&mut self, path: &Path) -> Result<SourceFile> {
        let metadata = fs::metadata(path).map_err(|source| read_error(path, source))?;
        let key = CacheKey {
            path: path.to_path_buf(),
            modified: metadata.modified().ok(),
            size: metadata.len(),
        };
        if let Some(content) = self.entries.get(&key) {
            self.hits += 1;
            tracing::debug!(path = %path.display(), "source cache hit");
            return Ok(SourceFile::from_parts(path, Arc::clone(content)));
        }
        let bytes = read_bytes(path)?;
        let content: Arc<str> = Arc::from(String::from_utf8_lossy(&bytes));
        self.entries.insert(key, Arc::clone(&content));
        Ok(SourceFile::from_parts(path, content))
    }

    /// Number of loads served from the cache.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of cached files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_source_not_found() {
        let err = SourceFile::read(Path::new("/definitely/not/here.py")).unwrap_err();
        assert!(matches!(err, AnalysisError::SourceNotFound { .. }));
        let err = SourceCache::new()
            .load(Path::new("/definitely/not/here.py"))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::SourceNotFound { .. }));
    }

    #[test]
    fn test_file_removed_after_caching_is_source_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.py");
        fs::write(&path, "x = 1\n").unwrap();
        let mut cache = SourceCache::new();
        cache.load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(matches!(
            cache.load(&path).unwrap_err(),
            AnalysisError::SourceNotFound { .. }
        ));
    }

    #[test]
    fn test_directory_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = SourceFile::read(dir.path()).unwrap_err();
        assert!(matches!(err, AnalysisError::Io { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.py");
        fs::write(&path, b"x = 1\n\xff\xfe\n").unwrap();
        let source = SourceFile::read(&path).unwrap();
        assert!(source.content.starts_with("x = 1\n"));
        assert!(source.content.contains('\u{FFFD}'));
        assert_eq!(source.language, Some(Language::Python));
    }

    #[test]
    fn test_cache_hits_for_unchanged_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.js");
        fs::write(&path, "var a = 1;\n").unwrap();
        let mut cache = SourceCache::new();
        let first = cache.load(&path).unwrap();
        let second = cache.load(&path).unwrap();
        assert_eq!(first.content, second.content);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_unrecognised_extension_keeps_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.rb");
        fs::write(&path, "puts 1").unwrap();
        let source = SourceFile::read(&path).unwrap();
        assert_eq!(source.language, None);
        assert_eq!(source.extension, "rb");
    }
}
