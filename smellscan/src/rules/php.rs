//! PHP battery.

use super::brace::{self, find_blocks};
use super::general::magic_numbers;
use super::{Battery, Context, Finding, SmellKind};
use crate::constants::PHP_FUNCTION_RE;

/// Rules run for `.php` files.
pub const PHP_BATTERY: Battery = &[
    ("long_function", long_functions),
    ("deep_nesting", deep_nesting),
    ("duplicate_code", duplicate_code),
    ("magic_number", magic_numbers),
    ("complex_condition", complex_conditions),
];

/// `function name(...) {` blocks over 50 lines.
#[must_use]
pub fn long_functions(context: &Context<'_>) -> Vec<Finding> {
    let blocks = find_blocks(context, PHP_FUNCTION_RE(), None, |_| true);
    brace::long_blocks(
        &blocks,
        SmellKind::LongFunction,
        "Function",
        "Consider breaking this function into smaller, more focused functions",
    )
}

/// Per-line brace nesting.
#[must_use]
pub fn deep_nesting(context: &Context<'_>) -> Vec<Finding> {
    brace::deep_nesting(
        context,
        "Consider extracting functions or using early returns to reduce nesting",
    )
}

/// Similar function bodies.
#[must_use]
pub fn duplicate_code(context: &Context<'_>) -> Vec<Finding> {
    let blocks = find_blocks(context, PHP_FUNCTION_RE(), None, |_| true);
    brace::duplicate_blocks(
        &blocks,
        "functions",
        "Consider extracting common functionality into a shared function",
    )
}

/// `&&`/`||` heavy `if` headers.
#[must_use]
pub fn complex_conditions(context: &Context<'_>) -> Vec<Finding> {
    brace::complex_conditions(
        context,
        "Consider extracting the condition into a well-named function",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similar_functions_are_duplicates() {
        let body = "  $total = $price * $qty;\n  $total = $total + $tax;\n  return $total;\n";
        let src = format!("<?php\nfunction a($price) {{\n{body}}}\nfunction b($price) {{\n{body}}}\n");
        let findings = duplicate_code(&Context::new(&src));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 2);
        assert_eq!(findings[0].message, "Duplicate code detected between functions");
    }
}
