//! JavaScript and TypeScript battery.

use super::brace::{self, find_blocks};
use super::general::magic_numbers;
use super::{Battery, Context, Finding, Severity, SmellKind};
use crate::constants::{CALLBACK_CHAIN_RE, JS_DECLARATION_RE, JS_FUNCTION_RE};
use crate::utils::brace_delta;

/// Rules run for `.js` and `.ts` files.
pub const JAVASCRIPT_BATTERY: Battery = &[
    ("long_function", long_functions),
    ("deep_nesting", deep_nesting),
    ("duplicate_code", duplicate_code),
    ("magic_number", magic_numbers),
    ("callback_hell", callback_hell),
    ("global_variable", global_variables),
    ("complex_condition", complex_conditions),
];

/// `function name(...) {` and block-bodied `const name = (...) => {`.
#[must_use]
pub fn long_functions(context: &Context<'_>) -> Vec<Finding> {
    let blocks = find_blocks(context, JS_FUNCTION_RE(), None, |_| true);
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
    let blocks = find_blocks(context, JS_FUNCTION_RE(), None, |_| true);
    brace::duplicate_blocks(
        &blocks,
        "functions",
        "Consider extracting common functionality into a shared function",
    )
}

/// Three or more chained `.then()` calls.
#[must_use]
pub fn callback_hell(context: &Context<'_>) -> Vec<Finding> {
    CALLBACK_CHAIN_RE()
        .find_iter(context.source)
        .map(|m| {
            Finding::new(
                SmellKind::CallbackHell,
                Severity::High,
                "Callback hell detected (multiple chained .then() calls)",
                context.line_index.line_of(m.start()),
                "Consider using async/await or breaking down the promise chain",
            )
        })
        .collect()
}

/// `var`/`let`/`const` declarations outside every brace block.
#[must_use]
pub fn global_variables(context: &Context<'_>) -> Vec<Finding> {
    let source = context.source;
    let mut depth = 0i64;
    let mut scanned = 0usize;
    let mut findings = Vec::new();
    for m in JS_DECLARATION_RE().find_iter(source) {
        depth += brace_delta(&source[scanned..m.start()]);
        scanned = m.start();
        if depth == 0 {
            findings.push(Finding::new(
                SmellKind::GlobalVariable,
                Severity::Medium,
                "Global variable declaration detected",
                context.line_index.line_of(m.start()),
                "Consider using modules or namespaces to avoid global scope pollution",
            ));
        }
    }
    findings
}

/// `&&`/`||` heavy `if` headers.
#[must_use]
pub fn complex_conditions(context: &Context<'_>) -> Vec<Finding> {
    brace::complex_conditions(
        context,
        "Consider extracting the condition into a well-named function",
    )
}
