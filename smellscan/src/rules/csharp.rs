//! C# battery.

use super::brace::{self, find_blocks, is_control_header};
use super::general::magic_numbers;
use super::{Battery, Context, Finding, SmellKind};
use crate::constants::CSHARP_METHOD_RE;

/// Rules run for `.cs` files.
pub const CSHARP_BATTERY: Battery = &[
    ("long_method", long_methods),
    ("deep_nesting", deep_nesting),
    ("duplicate_code", duplicate_code),
    ("magic_number", magic_numbers),
    ("complex_condition", complex_conditions),
];

/// Method blocks over 50 lines.
#[must_use]
pub fn long_methods(context: &Context<'_>) -> Vec<Finding> {
    let blocks = find_blocks(context, CSHARP_METHOD_RE(), Some(2), |c| !is_control_header(c));
    brace::long_blocks(
        &blocks,
        SmellKind::LongMethod,
        "Method",
        "Consider breaking this method into smaller, more focused methods",
    )
}

/// Per-line brace nesting.
#[must_use]
pub fn deep_nesting(context: &Context<'_>) -> Vec<Finding> {
    brace::deep_nesting(
        context,
        "Consider extracting methods or using early returns to reduce nesting",
    )
}

/// Similar method bodies.
#[must_use]
pub fn duplicate_code(context: &Context<'_>) -> Vec<Finding> {
    let blocks = find_blocks(context, CSHARP_METHOD_RE(), Some(2), |c| !is_control_header(c));
    brace::duplicate_blocks(
        &blocks,
        "methods",
        "Consider extracting common functionality into a shared method",
    )
}

/// `&&`/`||` heavy `if` headers.
#[must_use]
pub fn complex_conditions(context: &Context<'_>) -> Vec<Finding> {
    brace::complex_conditions(
        context,
        "Consider extracting the condition into a well-named method",
    )
}
