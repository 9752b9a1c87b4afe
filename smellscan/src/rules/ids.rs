//! Stable finding codes shown next to findings in console output.

use super::SmellKind;

/// General: Python source does not parse
pub const RULE_ID_SYNTAX_ERROR: &str = "SS-E001";
/// General: file too large
pub const RULE_ID_LARGE_FILE: &str = "SS-G001";
/// General: line too long
pub const RULE_ID_LONG_LINE: &str = "SS-G002";
/// General: task marker in comment
pub const RULE_ID_TODO: &str = "SS-G003";
/// General: repeated long string literal
pub const RULE_ID_DUPLICATE_STRING: &str = "SS-G004";
/// General: integer literal without a name
pub const RULE_ID_MAGIC_NUMBER: &str = "SS-G005";

/// Size: function too long
pub const RULE_ID_LONG_FUNCTION: &str = "SS-S001";
/// Size: method too long
pub const RULE_ID_LONG_METHOD: &str = "SS-S002";
/// Size: Java `main` too long
pub const RULE_ID_LONG_MAIN: &str = "SS-S003";
/// Size: too many parameters
pub const RULE_ID_LONG_PARAMS: &str = "SS-S004";
/// Size: god class
pub const RULE_ID_GOD_CLASS: &str = "SS-S005";

/// Structure: deep nesting
pub const RULE_ID_DEEP_NESTING: &str = "SS-C001";
/// Structure: complex condition
pub const RULE_ID_COMPLEX_CONDITION: &str = "SS-C002";
/// Structure: duplicate bodies
pub const RULE_ID_DUPLICATE_CODE: &str = "SS-C003";
/// Structure: unreachable statement
pub const RULE_ID_DEAD_CODE: &str = "SS-C004";
/// Structure: unused import
pub const RULE_ID_UNUSED_IMPORT: &str = "SS-C005";

/// Language: chained promise callbacks
pub const RULE_ID_CALLBACK_HELL: &str = "SS-L001";
/// Language: top-level JavaScript declaration
pub const RULE_ID_GLOBAL_VARIABLE: &str = "SS-L002";
/// Language: allocation without release
pub const RULE_ID_MEMORY_LEAK: &str = "SS-L003";
/// Language: console output in domain class
pub const RULE_ID_PRINTLN: &str = "SS-L004";
/// Language: null return without Optional
pub const RULE_ID_NULL_RETURN: &str = "SS-L005";
/// Language: public mutable field
pub const RULE_ID_PUBLIC_FIELD: &str = "SS-L006";

/// Code shown for a finding kind.
#[must_use]
pub fn rule_id(kind: SmellKind) -> &'static str {
    match kind {
        SmellKind::SyntaxError => RULE_ID_SYNTAX_ERROR,
        SmellKind::LargeFile => RULE_ID_LARGE_FILE,
        SmellKind::LongLine => RULE_ID_LONG_LINE,
        SmellKind::TodoComment => RULE_ID_TODO,
        SmellKind::DuplicateString => RULE_ID_DUPLICATE_STRING,
        SmellKind::MagicNumber => RULE_ID_MAGIC_NUMBER,
        SmellKind::LongFunction => RULE_ID_LONG_FUNCTION,
        SmellKind::LongMethod => RULE_ID_LONG_METHOD,
        SmellKind::LongMainMethod => RULE_ID_LONG_MAIN,
        SmellKind::LongParameterList => RULE_ID_LONG_PARAMS,
        SmellKind::GodClass => RULE_ID_GOD_CLASS,
        SmellKind::DeepNesting => RULE_ID_DEEP_NESTING,
        SmellKind::ComplexCondition => RULE_ID_COMPLEX_CONDITION,
        SmellKind::DuplicateCode => RULE_ID_DUPLICATE_CODE,
        SmellKind::DeadCode => RULE_ID_DEAD_CODE,
        SmellKind::UnusedImport => RULE_ID_UNUSED_IMPORT,
        SmellKind::CallbackHell => RULE_ID_CALLBACK_HELL,
        SmellKind::GlobalVariable => RULE_ID_GLOBAL_VARIABLE,
        SmellKind::PotentialMemoryLeak => RULE_ID_MEMORY_LEAK,
        SmellKind::PrintlnInDomain => RULE_ID_PRINTLN,
        SmellKind::NullReturn => RULE_ID_NULL_RETURN,
        SmellKind::PublicField => RULE_ID_PUBLIC_FIELD,
    }
}
