//! Rules shared by the brace-delimited languages.
//!
//! These are regex pseudo-parsers: a header regex locates a block, and the
//! block extends to the matching closing brace. Braces inside strings and
//! comments are counted like any other brace.

use super::{Context, Finding, Severity, SmellKind};
use crate::constants::{
    CONDITION_HIGH, CONDITION_MEDIUM, CONTROL_KEYWORDS, IF_CONDITION_RE, LONG_FUNCTION_HIGH,
    LONG_FUNCTION_MEDIUM, LOGICAL_OPERATOR_RE, NESTING_MEDIUM,
};
use crate::utils::{block_body, block_end_line, blocks_are_similar, brace_delta};
use regex::{Captures, Regex};

/// A function-like block located by a header regex.
#[derive(Debug, Clone)]
pub struct Block<'a> {
    /// Declared name, when the header regex captures one.
    pub name: Option<&'a str>,
    /// Line of the first non-blank character of the header.
    pub start_line: usize,
    /// Line of the closing brace.
    pub end_line: usize,
    /// Text between the braces.
    pub body: &'a str,
}

impl Block<'_> {
    /// `end_line - start_line + 1`.
    #[must_use]
    pub fn length(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}

/// Whether a header's captured words are really control flow (`else if (`).
#[must_use]
pub fn is_control_header(caps: &Captures<'_>) -> bool {
    caps.iter()
        .skip(1)
        .flatten()
        .any(|m| CONTROL_KEYWORDS().contains(m.as_str()))
}

/// Locates every block whose header matches `header` (which must end with
/// the opening brace) and is accepted by `keep`. `name_group` selects the
/// capture holding the declared name.
pub fn find_blocks<'a>(
    context: &Context<'a>,
    header: &Regex,
    name_group: Option<usize>,
    keep: impl Fn(&Captures<'a>) -> bool,
) -> Vec<Block<'a>> {
    let source = context.source;
    header
        .captures_iter(source)
        .filter(|caps| keep(caps))
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let leading = whole.as_str().len() - whole.as_str().trim_start().len();
            Some(Block {
                name: name_group.and_then(|g| caps.get(g)).map(|m| m.as_str()),
                start_line: context.line_index.line_of(whole.start() + leading),
                end_line: block_end_line(source, whole.end(), &context.line_index),
                body: block_body(source, whole.end()),
            })
        })
        .collect()
}

/// Length rule over located blocks: over 50 lines medium, over 100 high.
#[must_use]
pub fn long_blocks(
    blocks: &[Block<'_>],
    kind: SmellKind,
    noun: &str,
    suggestion: &str,
) -> Vec<Finding> {
    blocks
        .iter()
        .filter_map(|block| {
            let length = block.length();
            if length <= LONG_FUNCTION_MEDIUM {
                return None;
            }
            let severity = if length > LONG_FUNCTION_HIGH {
                Severity::High
            } else {
                Severity::Medium
            };
            Some(Finding::new(
                kind,
                severity,
                format!("{noun} is {length} lines long"),
                block.start_line,
                suggestion,
            ))
        })
        .collect()
}

/// Per-line brace nesting: a line opening more than four braces net.
#[must_use]
pub fn deep_nesting(context: &Context<'_>, suggestion: &str) -> Vec<Finding> {
    context
        .lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| {
            let level = brace_delta(line);
            (level > i64::try_from(NESTING_MEDIUM).unwrap_or(i64::MAX)).then(|| {
                Finding::new(
                    SmellKind::DeepNesting,
                    Severity::Medium,
                    format!("Deep nesting detected (level {level})"),
                    i + 1,
                    suggestion,
                )
            })
        })
        .collect()
}

/// Pairwise duplicate bodies; one finding per similar pair at the first block.
#[must_use]
pub fn duplicate_blocks(blocks: &[Block<'_>], noun: &str, suggestion: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (i, first) in blocks.iter().enumerate() {
        for second in &blocks[i + 1..] {
            if blocks_are_similar(first.body, second.body) {
                findings.push(Finding::new(
                    SmellKind::DuplicateCode,
                    Severity::Medium,
                    format!("Duplicate code detected between {noun}"),
                    first.start_line,
                    suggestion,
                ));
            }
        }
    }
    findings
}

/// `&&`/`||` count inside each `if (...)` header.
#[must_use]
pub fn complex_conditions(context: &Context<'_>, suggestion: &str) -> Vec<Finding> {
    IF_CONDITION_RE()
        .find_iter(context.source)
        .filter_map(|m| {
            let operators = LOGICAL_OPERATOR_RE().find_iter(m.as_str()).count();
            if operators <= CONDITION_MEDIUM {
                return None;
            }
            let severity = if operators > CONDITION_HIGH {
                Severity::High
            } else {
                Severity::Medium
            };
            Some(Finding::new(
                SmellKind::ComplexCondition,
                severity,
                format!("Complex condition with {operators} operators"),
                context.line_index.line_of(m.start()),
                suggestion,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PHP_FUNCTION_RE;

    fn body_lines(n: usize) -> String {
        (0..n).map(|i| format!("  $x{i} = {i};\n")).collect()
    }

    #[test]
    fn test_block_length_counts_header_and_closing_lines() {
        let src = format!("<?php\nfunction run() {{\n{}}}\n", body_lines(48));
        let ctx = Context::new(&src);
        let blocks = find_blocks(&ctx, PHP_FUNCTION_RE(), None, |_| true);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start_line, 2);
        assert_eq!(blocks[0].length(), 50);
        assert!(long_blocks(&blocks, SmellKind::LongFunction, "Function", "s").is_empty());
    }

    #[test]
    fn test_long_block_severity_boundaries() {
        for (body, expected) in [(49, Some(Severity::Medium)), (99, Some(Severity::High))] {
            let src = format!("function run() {{\n{}}}\n", body_lines(body));
            let ctx = Context::new(&src);
            let blocks = find_blocks(&ctx, PHP_FUNCTION_RE(), None, |_| true);
            let findings = long_blocks(&blocks, SmellKind::LongFunction, "Function", "s");
            assert_eq!(findings.first().map(|f| f.severity), expected);
        }
    }

    #[test]
    fn test_nesting_is_per_line() {
        let ctx = Context::new("a {\n{{{{{ x\n}}}}}}\n");
        let findings = deep_nesting(&ctx, "s");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 2);
        assert_eq!(findings[0].message, "Deep nesting detected (level 5)");
    }

    #[test]
    fn test_complex_condition_thresholds() {
        let ctx = Context::new("if (a && b || c && d || e) {}\nif (a && b) {}\n");
        let findings = complex_conditions(&ctx, "s");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(findings[0].message, "Complex condition with 4 operators");
    }
}
