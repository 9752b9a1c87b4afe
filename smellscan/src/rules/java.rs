//! Java battery.

use super::brace::{self, find_blocks, is_control_header};
use super::{Battery, Context, Finding, Severity, SmellKind};
use crate::constants::{
    CLASS_NAME_RE, FIELD_DECL_RE, GOD_CLASS_FIELDS, GOD_CLASS_METHODS, JAVA_CLASS_RE,
    JAVA_METHOD_RE, JAVA_SIGNATURE_RE, LONG_FUNCTION_HIGH, LONG_FUNCTION_MEDIUM, LONG_MAIN_HIGH,
    LONG_MAIN_MEDIUM, METHOD_DECL_RE, PARAMS_HIGH, PARAMS_MEDIUM, PARAM_LIST_RE,
    PRESENTATION_CLASS_MARKERS, PRIMITIVE_RETURN_RE, PUBLIC_FIELD_RE,
};
use crate::utils::{block_body, indent_width};
use rustc_hash::FxHashSet;

/// Rules run for `.java` files.
pub const JAVA_BATTERY: Battery = &[
    ("long_method", long_methods),
    ("deep_nesting", deep_nesting),
    ("duplicate_code", duplicate_code),
    ("long_parameter_list", long_parameter_lists),
    ("complex_condition", complex_conditions),
    ("god_class", god_classes),
    ("println_in_domain", println_in_domain),
    ("null_return", null_returns),
    ("public_field", public_fields),
    ("dead_code", dead_code),
];

const NESTING_SUGGESTION: &str =
    "Consider extracting methods or using early returns to reduce nesting";

/// Statement keywords that can look like `Type name;`.
const NON_TYPE_WORDS: &[&str] = &[
    "return", "throw", "new", "break", "continue", "goto", "yield", "else", "case", "package",
    "import", "assert",
];

/// Modifiers that make a `public` declaration something other than a field.
const NON_FIELD_MODIFIERS: &[&str] = &[
    "static",
    "final",
    "class",
    "interface",
    "enum",
    "void",
    "abstract",
];

/// Long methods, excluding constructors. `main` has its own stricter limits.
#[must_use]
pub fn long_methods(context: &Context<'_>) -> Vec<Finding> {
    let class_names: FxHashSet<&str> = CLASS_NAME_RE()
        .captures_iter(context.source)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    let blocks = find_blocks(context, JAVA_METHOD_RE(), Some(4), |caps| {
        let return_type = caps.get(3).map_or("", |m| m.as_str());
        let name = caps.get(4).map_or("", |m| m.as_str());
        !class_names.contains(name) && return_type != name
    });

    let mut findings = Vec::new();
    for block in &blocks {
        let length = block.length();
        let name = block.name.unwrap_or_default();
        if name == "main" {
            if length > LONG_MAIN_MEDIUM {
                let severity = if length > LONG_MAIN_HIGH {
                    Severity::High
                } else {
                    Severity::Medium
                };
                findings.push(Finding::new(
                    SmellKind::LongMainMethod,
                    severity,
                    format!("main() method is {length} lines - should delegate to other methods"),
                    block.start_line,
                    "Extract logic into separate methods/classes, main() should only bootstrap",
                ));
            }
        } else if length > LONG_FUNCTION_MEDIUM {
            let severity = if length > LONG_FUNCTION_HIGH {
                Severity::High
            } else {
                Severity::Medium
            };
            findings.push(Finding::new(
                SmellKind::LongMethod,
                severity,
                format!("Method '{name}' is {length} lines long"),
                block.start_line,
                "Consider breaking this method into smaller, more focused methods",
            ));
        }
    }
    findings
}

/// Per-line brace nesting.
#[must_use]
pub fn deep_nesting(context: &Context<'_>) -> Vec<Finding> {
    brace::deep_nesting(context, NESTING_SUGGESTION)
}

/// Similar method bodies.
#[must_use]
pub fn duplicate_code(context: &Context<'_>) -> Vec<Finding> {
    let blocks = find_blocks(context, METHOD_DECL_RE(), Some(2), |c| !is_control_header(c));
    brace::duplicate_blocks(
        &blocks,
        "methods",
        "Consider extracting common functionality into a shared method",
    )
}

/// Count of comma separated, non-empty parameters.
pub(crate) fn parameter_count(params: &str) -> usize {
    params.split(',').filter(|p| !p.trim().is_empty()).count()
}

/// Method headers with more than five parameters.
#[must_use]
pub fn long_parameter_lists(context: &Context<'_>) -> Vec<Finding> {
    PARAM_LIST_RE()
        .captures_iter(context.source)
        .filter(|caps| !is_control_header(caps))
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let count = parameter_count(caps.get(3)?.as_str());
            if count <= PARAMS_MEDIUM {
                return None;
            }
            let severity = if count > PARAMS_HIGH {
                Severity::High
            } else {
                Severity::Medium
            };
            let leading = whole.as_str().len() - whole.as_str().trim_start().len();
            Some(Finding::new(
                SmellKind::LongParameterList,
                severity,
                format!("Method has {count} parameters"),
                context.line_index.line_of(whole.start() + leading),
                "Consider using a data structure or object to group related parameters",
            ))
        })
        .collect()
}

/// `&&`/`||` heavy `if` headers.
#[must_use]
pub fn complex_conditions(context: &Context<'_>) -> Vec<Finding> {
    brace::complex_conditions(
        context,
        "Consider extracting the condition into a well-named boolean method",
    )
}

/// Members counted for the god-class rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassShape {
    /// Method declarations with a body.
    pub methods: usize,
    /// Field declarations without an initializer.
    pub fields: usize,
}

/// Counts methods and fields in a class body.
#[must_use]
pub fn class_shape(body: &str) -> ClassShape {
    let methods = METHOD_DECL_RE()
        .captures_iter(body)
        .filter(|caps| !is_control_header(caps))
        .count();
    let fields = FIELD_DECL_RE()
        .captures_iter(body)
        .filter(|caps| {
            caps.get(1)
                .is_some_and(|word| !NON_TYPE_WORDS.contains(&word.as_str()))
        })
        .count();
    ClassShape { methods, fields }
}

/// Classes with more than 15 methods or more than 20 fields.
#[must_use]
pub fn god_classes(context: &Context<'_>) -> Vec<Finding> {
    JAVA_CLASS_RE()
        .captures_iter(context.source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1).map_or("", |m| m.as_str());
            let shape = class_shape(block_body(context.source, whole.end()));
            if shape.methods <= GOD_CLASS_METHODS && shape.fields <= GOD_CLASS_FIELDS {
                return None;
            }
            Some(Finding::new(
                SmellKind::GodClass,
                Severity::High,
                format!(
                    "Class '{name}' has {} methods and {} fields",
                    shape.methods, shape.fields
                ),
                context.line_index.line_of(whole.start()),
                "Consider splitting this class into smaller, more focused classes",
            ))
        })
        .collect()
}

/// `System.out` inside classes whose names do not mark a presentation layer.
/// The most recent `class` header seen owns the following lines.
#[must_use]
pub fn println_in_domain(context: &Context<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut current_class: Option<&str> = None;
    for (i, line) in context.lines.iter().enumerate() {
        if let Some(caps) = CLASS_NAME_RE().captures(line) {
            current_class = caps.get(1).map(|m| m.as_str());
        }
        let Some(class) = current_class else {
            continue;
        };
        if !line.contains("System.out") {
            continue;
        }
        let allowed = PRESENTATION_CLASS_MARKERS
            .iter()
            .any(|marker| class.contains(marker));
        if !allowed {
            findings.push(Finding::new(
                SmellKind::PrintlnInDomain,
                Severity::Medium,
                format!("System.out in domain class '{class}' - violates Single Responsibility"),
                i + 1,
                "Move output logic to a presentation/view class",
            ));
        }
    }
    findings
}

/// `return null;` with an object-returning signature among the ten
/// preceding lines.
#[must_use]
pub fn null_returns(context: &Context<'_>) -> Vec<Finding> {
    let lines = &context.lines;
    let mut findings = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if !line.contains("return null;") {
            continue;
        }
        let object_returning = lines[i.saturating_sub(10)..i]
            .iter()
            .map(|candidate| candidate.trim())
            .filter(|candidate| JAVA_SIGNATURE_RE().is_match(candidate))
            .any(|signature| !PRIMITIVE_RETURN_RE().is_match(signature));
        if object_returning {
            findings.push(Finding::new(
                SmellKind::NullReturn,
                Severity::Medium,
                "Method returns null - consider using Optional<T>",
                i + 1,
                "Return Optional.empty() instead of null for better null safety",
            ));
        }
    }
    findings
}

fn is_public_field_line(stripped: &str) -> bool {
    let Some(rest) = stripped.strip_prefix("public") else {
        return false;
    };
    let after = rest.trim_start();
    if after.len() == rest.len() {
        return false;
    }
    if NON_FIELD_MODIFIERS.iter().any(|m| after.starts_with(m)) {
        return false;
    }
    PUBLIC_FIELD_RE().is_match(stripped)
}

/// Public, non-static, non-final fields.
#[must_use]
pub fn public_fields(context: &Context<'_>) -> Vec<Finding> {
    context
        .lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_public_field_line(line.trim()))
        .map(|(i, _)| {
            Finding::new(
                SmellKind::PublicField,
                Severity::Medium,
                "Public field detected - breaks encapsulation",
                i + 1,
                "Make field private and provide getter/setter if needed",
            )
        })
        .collect()
}

fn is_complete_return(stripped: &str) -> bool {
    stripped == "return;"
        || ((stripped.starts_with("return ") || stripped.starts_with("return("))
            && stripped.ends_with(';'))
}

/// A statement indented deeper than a completed `return` before the block
/// closes. Reported once per `return`.
#[must_use]
pub fn dead_code(context: &Context<'_>) -> Vec<Finding> {
    let lines = &context.lines;
    let mut findings = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let stripped = line.trim();
        if !is_complete_return(stripped) {
            continue;
        }
        let return_indent = indent_width(line);
        for (j, next) in lines.iter().enumerate().skip(i + 1) {
            let next_stripped = next.trim();
            if next_stripped.is_empty()
                || next_stripped.starts_with("//")
                || next_stripped.starts_with("/*")
                || next_stripped.starts_with('*')
            {
                continue;
            }
            if next_stripped.starts_with('}')
                || next_stripped.starts_with("case ")
                || next_stripped.starts_with("default:")
                || indent_width(next) <= return_indent
            {
                break;
            }
            findings.push(Finding::new(
                SmellKind::DeadCode,
                Severity::Medium,
                format!("Unreachable code after return statement on line {}", i + 1),
                j + 1,
                "Remove unreachable code or restructure the logic",
            ));
            break;
        }
    }
    findings
}
