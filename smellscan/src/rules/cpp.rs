//! C and C++ battery, shared by `.c`, `.cpp` and `.h` files.

use super::brace::{self, find_blocks, is_control_header};
use super::general::magic_numbers;
use super::{Battery, Context, Finding, Severity, SmellKind};
use crate::constants::{CPP_FUNCTION_RE, DELETE_RE, NEW_RE};

/// Rules run for C and C++ sources and headers.
pub const CPP_BATTERY: Battery = &[
    ("long_function", long_functions),
    ("deep_nesting", deep_nesting),
    ("duplicate_code", duplicate_code),
    ("magic_number", magic_numbers),
    ("potential_memory_leak", memory_leaks),
    ("complex_condition", complex_conditions),
];

/// `type name(...) {` headers, skipping control flow.
#[must_use]
pub fn long_functions(context: &Context<'_>) -> Vec<Finding> {
    let blocks = find_blocks(context, CPP_FUNCTION_RE(), Some(2), |c| !is_control_header(c));
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
    let blocks = find_blocks(context, CPP_FUNCTION_RE(), Some(2), |c| !is_control_header(c));
    brace::duplicate_blocks(
        &blocks,
        "functions",
        "Consider extracting common functionality into a shared function",
    )
}

/// One high finding per `new` left over once every `delete` is paired
/// with an allocation. The unpaired allocations are taken from the end.
#[must_use]
pub fn memory_leaks(context: &Context<'_>) -> Vec<Finding> {
    let news: Vec<usize> = NEW_RE().find_iter(context.source).map(|m| m.start()).collect();
    let deletes = DELETE_RE().find_iter(context.source).count();
    if news.len() <= deletes {
        return Vec::new();
    }
    news[deletes..]
        .iter()
        .map(|&offset| {
            Finding::new(
                SmellKind::PotentialMemoryLeak,
                Severity::High,
                "Potential memory leak: 'new' without corresponding 'delete'",
                context.line_index.line_of(offset),
                "Ensure all 'new' allocations have corresponding 'delete' statements",
            )
        })
        .collect()
}

/// `&&`/`||` heavy `if` headers.
#[must_use]
pub fn complex_conditions(context: &Context<'_>) -> Vec<Finding> {
    brace::complex_conditions(
        context,
        "Consider extracting the condition into a well-named function",
    )
}
