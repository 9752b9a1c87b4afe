//! Language-independent rules.

use super::{Battery, Context, Finding, Severity, SmellKind};
use crate::constants::{
    DIGITS_RE, LARGE_FILE_HIGH, LARGE_FILE_MEDIUM, LONG_LINE_CHARS, LONG_STRING_RE,
    MAGIC_NUMBER_LIMIT, TODO_RE,
};
use rustc_hash::FxHashMap;

/// Rules run for every file regardless of language.
pub const GENERAL_BATTERY: Battery = &[("large_file", large_file)];

/// Optional rules enabled with `extended_rules = true`.
pub const EXTENDED_BATTERY: Battery = &[
    ("long_line", long_lines),
    ("todo_comment", todo_comments),
    ("duplicate_string", duplicate_strings),
];

/// Files over 500 lines are medium, over 1000 high.
#[must_use]
pub fn large_file(context: &Context<'_>) -> Vec<Finding> {
    let line_count = context.lines.len();
    if line_count <= LARGE_FILE_MEDIUM {
        return Vec::new();
    }
    let severity = if line_count > LARGE_FILE_HIGH {
        Severity::High
    } else {
        Severity::Medium
    };
    vec![Finding::new(
        SmellKind::LargeFile,
        severity,
        format!("File has {line_count} lines"),
        1,
        "Consider splitting this file into smaller, more focused files",
    )]
}

fn is_word_or_dot(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Integer literals above ten that stand alone: no word character or dot on
/// either side, no leading zero. One low finding per occurrence.
#[must_use]
pub fn magic_numbers(context: &Context<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (idx, line) in context.lines.iter().enumerate() {
        for m in DIGITS_RE().find_iter(line) {
            let number = m.as_str();
            if number.starts_with('0') {
                continue;
            }
            let before = line[..m.start()].chars().next_back();
            let after = line[m.end()..].chars().next();
            if before.is_some_and(is_word_or_dot) || after.is_some_and(is_word_or_dot) {
                continue;
            }
            // Literals too large for u64 are certainly above the limit.
            let above_limit = number.parse::<u64>().map_or(true, |n| n > MAGIC_NUMBER_LIMIT);
            if above_limit {
                findings.push(Finding::new(
                    SmellKind::MagicNumber,
                    Severity::Low,
                    format!("Magic number '{number}' found"),
                    idx + 1,
                    "Consider using a named constant instead of a magic number",
                ));
            }
        }
    }
    findings
}

/// Lines over 120 characters; over 200 is high.
#[must_use]
pub fn long_lines(context: &Context<'_>) -> Vec<Finding> {
    context
        .lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| {
            let length = line.chars().count();
            (length > LONG_LINE_CHARS).then(|| {
                let severity = if length > 200 {
                    Severity::High
                } else {
                    Severity::Medium
                };
                Finding::new(
                    SmellKind::LongLine,
                    severity,
                    format!("Line is {length} characters long"),
                    i + 1,
                    "Consider breaking long lines for better readability",
                )
            })
        })
        .collect()
}

/// `TODO:`-style task markers.
#[must_use]
pub fn todo_comments(context: &Context<'_>) -> Vec<Finding> {
    TODO_RE()
        .captures_iter(context.source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let text = caps.get(2).map_or("", |m| m.as_str().trim());
            Some(Finding::new(
                SmellKind::TodoComment,
                Severity::Low,
                format!("TODO comment: {text}"),
                context.line_index.line_of(whole.start()),
                "Address the TODO comment or remove it if no longer needed",
            ))
        })
        .collect()
}

/// Double-quoted literals of 20+ characters appearing more than five times,
/// reported once at their first occurrence.
#[must_use]
pub fn duplicate_strings(context: &Context<'_>) -> Vec<Finding> {
    let mut first_seen: FxHashMap<&str, (usize, usize)> = FxHashMap::default();
    let mut order = Vec::new();
    for m in LONG_STRING_RE().find_iter(context.source) {
        let entry = first_seen.entry(m.as_str()).or_insert_with(|| {
            order.push(m.as_str());
            (m.start(), 0)
        });
        entry.1 += 1;
    }
    order
        .into_iter()
        .filter_map(|literal| {
            let (offset, count) = first_seen[literal];
            (count > 5).then(|| {
                Finding::new(
                    SmellKind::DuplicateString,
                    Severity::Low,
                    format!("String literal appears {count} times"),
                    context.line_index.line_of(offset),
                    "Consider extracting the string into a named constant",
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(src: &str) -> Vec<String> {
        magic_numbers(&Context::new(src))
            .into_iter()
            .map(|f| f.message)
            .collect()
    }

    #[test]
    fn test_magic_number_boundaries() {
        assert_eq!(numbers("x = 10\ny = 11"), vec!["Magic number '11' found"]);
        assert!(numbers("v = 3.14159\nw = x11 + 11px").is_empty());
        assert!(numbers("mode = 0755").is_empty());
        assert_eq!(numbers("f(-42, 100)").len(), 2);
    }

    #[test]
    fn test_magic_number_line_numbers() {
        let findings = magic_numbers(&Context::new("a = 1\n\nb = 99\n"));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 3);
    }

    #[test]
    fn test_large_file_thresholds() {
        let lines = |n: usize| "x\n".repeat(n - 1) + "x";
        assert!(large_file(&Context::new(&lines(500))).is_empty());
        let medium = large_file(&Context::new(&lines(501)));
        assert_eq!(medium[0].severity, Severity::Medium);
        assert_eq!(medium[0].message, "File has 501 lines");
        let high = large_file(&Context::new(&lines(1001)));
        assert_eq!(high[0].severity, Severity::High);
    }

    #[test]
    fn test_duplicate_strings_reported_once() {
        let line = "log(\"connection to the database failed\");\n";
        let src = line.repeat(6);
        let findings = duplicate_strings(&Context::new(&src));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "String literal appears 6 times");
        assert_eq!(findings[0].line, 1);
        assert!(duplicate_strings(&Context::new(&line.repeat(5))).is_empty());
    }

    #[test]
    fn test_todo_comment() {
        let findings = todo_comments(&Context::new("x = 1\n# TODO: remove retry hack\n"));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 2);
        assert_eq!(findings[0].message, "TODO comment: remove retry hack");
    }
}
