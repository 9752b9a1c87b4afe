//! Language tags recognised by the analyzer.

use crate::error::AnalysisError;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// A recognised source language, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// `.py`
    Python,
    /// `.java`
    Java,
    /// `.js`
    JavaScript,
    /// `.ts`
    TypeScript,
    /// `.cpp`
    Cpp,
    /// `.c`
    C,
    /// `.h`
    CHeader,
    /// `.cs`
    CSharp,
    /// `.php`
    Php,
}

/// Extensions in the order they are listed to users.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["py", "java", "js", "ts", "cpp", "c", "h", "cs", "php"];

impl Language {
    /// All recognised languages.
    pub const ALL: [Language; 9] = [
        Language::Python,
        Language::Java,
        Language::JavaScript,
        Language::TypeScript,
        Language::Cpp,
        Language::C,
        Language::CHeader,
        Language::CSharp,
        Language::Php,
    ];

    /// Maps a bare extension (no leading dot) to a language. Matching is exact,
    /// so `.PY` is not Python.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" => Some(Self::Python),
            "java" => Some(Self::Java),
            "js" => Some(Self::JavaScript),
            "ts" => Some(Self::TypeScript),
            "cpp" => Some(Self::Cpp),
            "c" => Some(Self::C),
            "h" => Some(Self::CHeader),
            "cs" => Some(Self::CSharp),
            "php" => Some(Self::Php),
            _ => None,
        }
    }

    /// Determines the language of a path.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnsupportedLanguage`] when the extension is
    /// missing or not recognised.
    pub fn from_path(path: &Path) -> Result<Self, AnalysisError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_extension(&ext).ok_or(AnalysisError::UnsupportedLanguage { extension: ext })
    }

    /// The canonical extension for this language.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Python => "py",
            Self::Java => "java",
            Self::JavaScript => "js",
            Self::TypeScript => "ts",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::CHeader => "h",
            Self::CSharp => "cs",
            Self::Php => "php",
        }
    }

    /// Name shown in reports.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::Java => "Java",
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Cpp => "C++",
            Self::C => "C",
            Self::CHeader => "C/C++ Header",
            Self::CSharp => "C#",
            Self::Php => "PHP",
        }
    }

    /// Whether structure uses curly braces (everything except Python).
    #[must_use]
    pub fn is_brace_language(self) -> bool {
        !matches!(self, Self::Python)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
