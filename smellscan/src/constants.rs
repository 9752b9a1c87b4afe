use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Name of the project configuration file.
pub const CONFIG_FILENAME: &str = ".smellscan.toml";
/// Name of the Python project file that may carry a `[tool.smellscan]` table.
pub const PYPROJECT_FILENAME: &str = "pyproject.toml";

/// Function/method length above which a finding is raised.
pub const LONG_FUNCTION_MEDIUM: usize = 50;
/// Function/method length above which the finding is high severity.
pub const LONG_FUNCTION_HIGH: usize = 100;
/// Java `main` length above which a finding is raised.
pub const LONG_MAIN_MEDIUM: usize = 30;
/// Java `main` length above which the finding is high severity.
pub const LONG_MAIN_HIGH: usize = 50;
/// Nesting level above which a finding is raised.
pub const NESTING_MEDIUM: usize = 4;
/// Python nesting level above which the finding is high severity.
pub const NESTING_HIGH: usize = 6;
/// Parameter count above which a finding is raised.
pub const PARAMS_MEDIUM: usize = 5;
/// Parameter count above which the finding is high severity.
pub const PARAMS_HIGH: usize = 8;
/// Boolean operator count above which a condition is complex.
pub const CONDITION_MEDIUM: usize = 3;
/// Boolean operator count above which the finding is high severity.
pub const CONDITION_HIGH: usize = 5;
/// Method count above which a class is a god class.
pub const GOD_CLASS_METHODS: usize = 15;
/// Java field count above which a class is a god class.
pub const GOD_CLASS_FIELDS: usize = 20;
/// Integer literals at or below this value are not magic.
pub const MAGIC_NUMBER_LIMIT: u64 = 10;
/// Minimum Jaccard overlap for two bodies to count as duplicates.
pub const DUPLICATE_SIMILARITY: f64 = 0.7;
/// Maximum difference in non-blank line count for duplicate bodies.
pub const DUPLICATE_LINE_SLACK: usize = 2;
/// File line count above which a file is large.
pub const LARGE_FILE_MEDIUM: usize = 500;
/// File line count above which the large-file finding is high severity.
pub const LARGE_FILE_HIGH: usize = 1000;
/// Line length above which a line is long.
pub const LONG_LINE_CHARS: usize = 120;

/// Java class names allowed to write to `System.out`.
pub const PRESENTATION_CLASS_MARKERS: &[&str] = &[
    "Main",
    "Console",
    "Printer",
    "View",
    "UI",
    "CLI",
    "App",
    "Application",
];

/// Default folders skipped when walking a directory.
pub fn get_default_exclude_folders() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut s = FxHashSet::default();
        for folder in [
            ".git",
            "node_modules",
            "target",
            "build",
            "dist",
            "__pycache__",
            ".venv",
            "venv",
            ".tox",
            ".mypy_cache",
            "vendor",
        ] {
            s.insert(folder);
        }
        s
    })
}

/// Words that look like `type name(` in brace languages but are control flow.
pub fn get_control_keywords() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut s = FxHashSet::default();
        for kw in [
            "if",
            "else",
            "for",
            "foreach",
            "while",
            "do",
            "switch",
            "catch",
            "synchronized",
            "return",
            "new",
            "throw",
            "case",
            "elseif",
            "using",
            "lock",
        ] {
            s.insert(kw);
        }
        s
    })
}

macro_rules! lazy_regex {
    ($(#[$meta:meta])* $name:ident, $pattern:expr) => {
        $(#[$meta])*
        ///
        /// # Panics
        ///
        /// Panics if the regex pattern is invalid.
        pub fn $name() -> &'static ::regex::Regex {
            static RE: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            #[allow(clippy::expect_used)]
            RE.get_or_init(|| {
                ::regex::Regex::new($pattern).expect(concat!("Invalid regex: ", stringify!($name)))
            })
        }
    };
}
pub(crate) use lazy_regex;

lazy_regex!(
    /// Java method signature with access modifier, capturing return type (3) and name (4).
    get_java_method_re,
    r"(public|private|protected)\s+(static\s+)?(\w+(?:<[^>]+>)?)\s+(\w+)\s*\([^)]*\)\s*(?:throws\s+[\w,\s]+)?\s*\{"
);
lazy_regex!(
    /// `class Name`, capturing the name.
    get_class_name_re,
    r"class\s+(\w+)"
);
lazy_regex!(
    /// Java class header up to its opening brace, capturing the name.
    get_java_class_re,
    r"class\s+(\w+)[^{;]*\{"
);
lazy_regex!(
    /// Loose method declaration used for counting and duplicate bodies.
    get_method_decl_re,
    r"(?:public|private|protected)?\s*(?:static)?\s*(\w+)\s+(\w+)\s*\([^)]*\)\s*\{"
);
lazy_regex!(
    /// Field declaration without initializer, capturing the type word.
    get_field_decl_re,
    r"(?:public|private|protected)?\s*(?:static)?\s*(?:final)?\s*(\w+)\s+\w+;"
);
lazy_regex!(
    /// Method header with a parameter list, capturing the parameters.
    get_param_list_re,
    r"(?:public|private|protected)?\s*(?:static)?\s*(\w+)\s+(\w+)\s*\(([^)]*)\)"
);
lazy_regex!(
    /// Java method signature line used when looking back from `return null;`.
    get_java_signature_re,
    r"(public|private|protected)\s+\w+\s+\w+\s*\("
);
lazy_regex!(
    /// Signature whose return type is primitive or void.
    get_primitive_return_re,
    r"(void|int|long|double|float|boolean|byte|short|char)\s+\w+\s*\("
);
lazy_regex!(
    /// Public field declaration.
    get_public_field_re,
    r"public\s+\w+\s+\w+\s*[;=]"
);
lazy_regex!(
    /// `if (...)` header up to the first closing parenthesis.
    get_if_condition_re,
    r"if\s*\([^)]+\)"
);
lazy_regex!(
    /// Logical `&&` or `||`.
    get_logical_operator_re,
    r"&&|\|\|"
);
lazy_regex!(
    /// JavaScript function declaration or block-bodied arrow function.
    get_js_function_re,
    r"function\s+\w+\s*\([^)]*\)\s*\{|const\s+\w+\s*=\s*\([^)]*\)\s*=>\s*\{"
);
lazy_regex!(
    /// Three chained `.then(...)` calls.
    get_callback_chain_re,
    r"\.then\s*\([^)]*\)\s*\.then\s*\([^)]*\)\s*\.then\s*\([^)]*\)"
);
lazy_regex!(
    /// `var|let|const name =`.
    get_js_declaration_re,
    r"(?:var|let|const)\s+\w+\s*="
);
lazy_regex!(
    /// C/C++ function header, capturing the two leading words.
    get_cpp_function_re,
    r"(\w+)\s+(\w+)\s*\([^)]*\)\s*\{"
);
lazy_regex!(
    /// C# method header, capturing the two leading words.
    get_csharp_method_re,
    r"(?:public|private|protected|internal)?\s*(?:static)?\s*(\w+)\s+(\w+)\s*\([^)]*\)\s*\{"
);
lazy_regex!(
    /// PHP function header.
    get_php_function_re,
    r"function\s+\w+\s*\([^)]*\)\s*\{"
);
lazy_regex!(
    /// Heap allocation with `new`.
    get_new_re,
    r"\bnew\s+\w+"
);
lazy_regex!(
    /// `delete` or `delete[]`.
    get_delete_re,
    r"\bdelete\b"
);
lazy_regex!(
    /// Word tokens.
    get_word_re,
    r"\w+"
);
lazy_regex!(
    /// Maximal runs of ASCII digits.
    get_digits_re,
    r"[0-9]+"
);
lazy_regex!(
    /// Task markers in comments, capturing the text.
    get_todo_re,
    r"(?i)(TODO|FIXME|HACK|XXX):\s*(.+)"
);
lazy_regex!(
    /// Double quoted string of 20 or more characters.
    get_long_string_re,
    r#""[^"]{20,}""#
);
lazy_regex!(
    /// Single lowercase letter used as an assignment target.
    get_single_letter_assign_re,
    r"\b[a-z]\s*="
);
lazy_regex!(
    /// Operator with no surrounding whitespace.
    get_tight_operator_re,
    r"[a-zA-Z0-9][=+\-*/][a-zA-Z0-9]"
);
lazy_regex!(
    /// Java import statement, capturing the imported path.
    get_java_import_re,
    r"import\s+([\w.]+);"
);
lazy_regex!(
    /// Java field with at least one modifier, capturing type (1) and name (2).
    get_java_field_re,
    r"(?m)^\s*(?:(?:public|private|protected|static|final|transient|volatile)\s+)+([\w<>\[\],.]+)\s+(\w+)\s*(?:=[^;]*)?;"
);

pub use get_callback_chain_re as CALLBACK_CHAIN_RE;
pub use get_class_name_re as CLASS_NAME_RE;
pub use get_control_keywords as CONTROL_KEYWORDS;
pub use get_cpp_function_re as CPP_FUNCTION_RE;
pub use get_csharp_method_re as CSHARP_METHOD_RE;
pub use get_default_exclude_folders as DEFAULT_EXCLUDE_FOLDERS;
pub use get_delete_re as DELETE_RE;
pub use get_digits_re as DIGITS_RE;
pub use get_field_decl_re as FIELD_DECL_RE;
pub use get_if_condition_re as IF_CONDITION_RE;
pub use get_java_class_re as JAVA_CLASS_RE;
pub use get_java_field_re as JAVA_FIELD_RE;
pub use get_java_import_re as JAVA_IMPORT_RE;
pub use get_java_method_re as JAVA_METHOD_RE;
pub use get_java_signature_re as JAVA_SIGNATURE_RE;
pub use get_js_declaration_re as JS_DECLARATION_RE;
pub use get_js_function_re as JS_FUNCTION_RE;
pub use get_logical_operator_re as LOGICAL_OPERATOR_RE;
pub use get_long_string_re as LONG_STRING_RE;
pub use get_method_decl_re as METHOD_DECL_RE;
pub use get_new_re as NEW_RE;
pub use get_param_list_re as PARAM_LIST_RE;
pub use get_php_function_re as PHP_FUNCTION_RE;
pub use get_primitive_return_re as PRIMITIVE_RETURN_RE;
pub use get_public_field_re as PUBLIC_FIELD_RE;
pub use get_single_letter_assign_re as SINGLE_LETTER_ASSIGN_RE;
pub use get_tight_operator_re as TIGHT_OPERATOR_RE;
pub use get_todo_re as TODO_RE;
pub use get_word_re as WORD_RE;
