//! Quality scoring from smell counts and raw text statistics.

use crate::constants::{
    LARGE_FILE_HIGH, LARGE_FILE_MEDIUM, LONG_LINE_CHARS, SINGLE_LETTER_ASSIGN_RE,
    TIGHT_OPERATOR_RE,
};
use crate::rules::{SmellKind, SmellSummary};
use rustc_hash::FxHashSet;
use serde::Serialize;

/// Weight of maintainability in the overall score.
pub const MAINTAINABILITY_WEIGHT: f64 = 0.30;
/// Weight of readability in the overall score.
pub const READABILITY_WEIGHT: f64 = 0.25;
/// Weight of complexity in the overall score.
pub const COMPLEXITY_WEIGHT: f64 = 0.25;
/// Weight of documentation in the overall score.
pub const DOCUMENTATION_WEIGHT: f64 = 0.20;

/// Composite quality score. Every component lies in `[0, 100]` and
/// `overall` is their weighted sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityScore {
    /// Weighted overall score.
    pub overall: f64,
    /// Penalised by duplicates, long functions, god classes and dead code.
    pub maintainability: f64,
    /// Penalised by long lines, indentation, naming and spacing.
    pub readability: f64,
    /// Penalised by branch density and bracket nesting.
    pub complexity: f64,
    /// Bucketed comment ratio.
    pub documentation: f64,
    /// Problems found, most severe first.
    pub issues: Vec<String>,
    /// What to do about them.
    pub recommendations: Vec<String>,
}

impl QualityScore {
    /// Excellent (>= 90), Good (>= 80), Fair (>= 70) or Needs Improvement.
    #[must_use]
    pub fn grade(&self) -> &'static str {
        if self.overall >= 90.0 {
            "Excellent"
        } else if self.overall >= 80.0 {
            "Good"
        } else if self.overall >= 70.0 {
            "Fair"
        } else {
            "Needs Improvement"
        }
    }
}

/// Scores one file.
#[must_use]
pub fn score(summary: &SmellSummary, content: &str) -> QualityScore {
    let lines: Vec<&str> = content.lines().collect();
    let maintainability = maintainability_score(summary);
    let readability = readability_score(&lines);
    let complexity = complexity_score(&lines);
    let documentation = documentation_score(&lines);
    let overall = overall_score(maintainability, readability, complexity, documentation);
    let ratio = documentation_ratio(&lines);
    let issues = issues(summary, lines.len(), ratio);
    let recommendations = recommendations(summary, lines.len(), ratio);
    QualityScore {
        overall,
        maintainability,
        readability,
        complexity,
        documentation,
        issues,
        recommendations,
    }
}

/// `0.30*M + 0.25*R + 0.25*C + 0.20*D` over clamped components.
#[must_use]
pub fn overall_score(
    maintainability: f64,
    readability: f64,
    complexity: f64,
    documentation: f64,
) -> f64 {
    let clamp = |v: f64| v.clamp(0.0, 100.0);
    clamp(maintainability) * MAINTAINABILITY_WEIGHT
        + clamp(readability) * READABILITY_WEIGHT
        + clamp(complexity) * COMPLEXITY_WEIGHT
        + clamp(documentation) * DOCUMENTATION_WEIGHT
}

/// `100 - 8*duplicate_code - 6*long_function - 12*god_class - 4*dead_code`.
#[must_use]
pub fn maintainability_score(summary: &SmellSummary) -> f64 {
    let penalty = 8 * summary.count(SmellKind::DuplicateCode)
        + 6 * summary.count(SmellKind::LongFunction)
        + 12 * summary.count(SmellKind::GodClass)
        + 4 * summary.count(SmellKind::DeadCode);
    (100.0 - penalty as f64).clamp(0.0, 100.0)
}

/// 100 minus capped penalties for long lines, indentation, naming and spacing.
#[must_use]
pub fn readability_score(lines: &[&str]) -> f64 {
    let mut score = 100.0;
    let long_lines = lines
        .iter()
        .filter(|l| l.chars().count() > LONG_LINE_CHARS)
        .count();
    if long_lines > 0 && !lines.is_empty() {
        let ratio = long_lines as f64 / lines.len() as f64;
        score -= (ratio * 30.0).min(15.0);
    }
    score -= (indentation_issues(lines) as f64 * 5.0).min(10.0);
    score -= (naming_issues(lines) as f64 * 1.5).min(15.0);
    score -= (spacing_issues(lines) as f64 * 0.5).min(10.0);
    score.clamp(0.0, 100.0)
}

/// One issue for mixed tabs and spaces, one for more than five distinct
/// indentation widths.
fn indentation_issues(lines: &[&str]) -> usize {
    let non_blank: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|l| !l.trim().is_empty())
        .collect();
    let widths: FxHashSet<usize> = non_blank
        .iter()
        .map(|l| l.len() - l.trim_start().len())
        .filter(|&w| w > 0)
        .collect();
    if widths.is_empty() {
        return 0;
    }
    let has_tabs = non_blank.iter().any(|l| l.contains('\t'));
    let has_spaces = non_blank.iter().any(|l| l.starts_with(' '));
    usize::from(has_tabs && has_spaces) + usize::from(widths.len() > 5)
}

/// Single-letter assignment targets not within two lines after a `for `.
fn naming_issues(lines: &[&str]) -> usize {
    lines
        .iter()
        .enumerate()
        .filter(|(i, line)| {
            line.contains('=')
                && !line.trim().starts_with('#')
                && SINGLE_LETTER_ASSIGN_RE().is_match(line)
                && !lines[i.saturating_sub(2)..=*i].iter().any(|l| l.contains("for "))
        })
        .count()
}

/// Operators without surrounding spaces, and double spaces outside comments.
fn spacing_issues(lines: &[&str]) -> usize {
    lines
        .iter()
        .map(|line| {
            usize::from(TIGHT_OPERATOR_RE().is_match(line))
                + usize::from(line.contains("  ") && !line.trim().starts_with('#'))
        })
        .sum()
}

const COMPLEXITY_INDICATORS: &[&str] = &[
    "if ", "elif ", "else:", "for ", "while ", "&&", "||", "and ", "or ",
];

/// 100 minus `50 * indicators / lines`, minus 10 per bracket level beyond four.
#[must_use]
pub fn complexity_score(lines: &[&str]) -> f64 {
    let mut score = 100.0;
    let indicators: usize = lines
        .iter()
        .map(|line| {
            let stripped = line.trim();
            COMPLEXITY_INDICATORS
                .iter()
                .map(|needle| stripped.matches(needle).count())
                .sum::<usize>()
        })
        .sum();
    if !lines.is_empty() {
        score -= indicators as f64 / lines.len() as f64 * 50.0;
    }
    let nesting = max_bracket_nesting(lines);
    if nesting > 4 {
        score -= (nesting - 4) as f64 * 10.0;
    }
    score.clamp(0.0, 100.0)
}

/// Running balance of `{[(` against `}])` over non-comment lines.
#[must_use]
pub fn max_bracket_nesting(lines: &[&str]) -> usize {
    let mut current: i64 = 0;
    let mut max: i64 = 0;
    for line in lines {
        let stripped = line.trim();
        if stripped.is_empty() || stripped.starts_with('#') {
            continue;
        }
        let opens = line.chars().filter(|c| matches!(c, '{' | '[' | '(')).count();
        let closes = line.chars().filter(|c| matches!(c, '}' | ']' | ')')).count();
        current += i64::try_from(opens).unwrap_or(0) - i64::try_from(closes).unwrap_or(0);
        max = max.max(current);
    }
    usize::try_from(max).unwrap_or(0)
}

/// Comment and docstring lines. Triple-quoted spans count every line they
/// cover; `#`, `//`, `/*` and `*` continuation lines count once.
#[must_use]
pub fn documentation_lines(lines: &[&str]) -> usize {
    let mut count = 0;
    let mut open_delimiter: Option<&str> = None;
    for line in lines {
        let stripped = line.trim();
        if let Some(delimiter) = open_delimiter {
            count += 1;
            if stripped.contains(delimiter) {
                open_delimiter = None;
            }
            continue;
        }
        let delimiter = if stripped.contains("\"\"\"") {
            Some("\"\"\"")
        } else if stripped.contains("'''") {
            Some("'''")
        } else {
            None
        };
        if let Some(delimiter) = delimiter {
            count += 1;
            if stripped.matches(delimiter).count() == 1 {
                open_delimiter = Some(delimiter);
            }
        } else if stripped.starts_with('#')
            || stripped.starts_with("//")
            || stripped.starts_with("/*")
            || (stripped.starts_with('*') && !stripped.starts_with("*/"))
        {
            count += 1;
        }
    }
    count
}

fn documentation_ratio(lines: &[&str]) -> f64 {
    if lines.is_empty() {
        return 0.0;
    }
    documentation_lines(lines) as f64 / lines.len() as f64
}

/// Bucketed documentation ratio; an empty file scores 0.
#[must_use]
pub fn documentation_score(lines: &[&str]) -> f64 {
    if lines.is_empty() {
        return 0.0;
    }
    let ratio = documentation_ratio(lines);
    if ratio >= 0.20 {
        100.0
    } else if ratio >= 0.15 {
        90.0
    } else if ratio >= 0.10 {
        80.0
    } else if ratio >= 0.05 {
        60.0
    } else if ratio >= 0.02 {
        40.0
    } else {
        20.0
    }
}

fn issues(summary: &SmellSummary, total_lines: usize, doc_ratio: f64) -> Vec<String> {
    let mut issues = Vec::new();
    let counts = &summary.by_severity;
    if counts.critical > 0 {
        issues.push(format!(
            "Critical issues found: {} critical code smells",
            counts.critical
        ));
    }
    if counts.high > 0 {
        issues.push(format!(
            "High priority issues: {} high severity code smells",
            counts.high
        ));
    }
    let duplicates = summary.count(SmellKind::DuplicateCode);
    if duplicates > 0 {
        issues.push(format!("Code duplication: {duplicates} instances of duplicate code"));
    }
    let long_functions = summary.count(SmellKind::LongFunction);
    if long_functions > 0 {
        issues.push(format!("Long functions: {long_functions} functions are too long"));
    }
    let god_classes = summary.count(SmellKind::GodClass);
    if god_classes > 0 {
        issues.push(format!("God classes: {god_classes} classes are too large"));
    }
    if total_lines > LARGE_FILE_HIGH {
        issues.push(format!("Large file: {total_lines} lines (consider splitting)"));
    } else if total_lines > LARGE_FILE_MEDIUM {
        issues.push(format!("Moderately large file: {total_lines} lines"));
    }
    if doc_ratio < 0.02 {
        issues.push(
            "Very low documentation: Less than 2% of lines are comments or docstrings".to_owned(),
        );
    } else if doc_ratio > 0.5 {
        issues.push("Excessive comments: More than 50% of lines are comments".to_owned());
    }
    issues
}

fn recommendations(summary: &SmellSummary, total_lines: usize, doc_ratio: f64) -> Vec<String> {
    let by_kind = [
        (
            SmellKind::DuplicateCode,
            "Extract common functionality into shared functions/methods",
        ),
        (
            SmellKind::LongFunction,
            "Break down long functions into smaller, focused functions",
        ),
        (
            SmellKind::GodClass,
            "Split large classes into smaller, single-responsibility classes",
        ),
        (
            SmellKind::ComplexCondition,
            "Simplify complex conditions by extracting them into well-named methods",
        ),
        (SmellKind::MagicNumber, "Replace magic numbers with named constants"),
        (SmellKind::UnusedImport, "Remove unused imports to clean up the code"),
    ];
    let mut recommendations: Vec<String> = by_kind
        .iter()
        .filter(|(kind, _)| summary.count(*kind) > 0)
        .map(|(_, text)| (*text).to_owned())
        .collect();
    if total_lines > LARGE_FILE_MEDIUM {
        recommendations
            .push("Consider splitting this file into smaller, more focused files".to_owned());
    }
    if doc_ratio < 0.02 {
        recommendations.push("Add more comments to improve code documentation".to_owned());
    } else if doc_ratio > 0.5 {
        recommendations.push(
            "Review comments - some may be redundant or the code needs refactoring".to_owned(),
        );
    }
    if recommendations.is_empty() {
        recommendations.push("Code quality is good! Keep up the good work!".to_owned());
    } else {
        recommendations.push("Focus on addressing the highest priority issues first".to_owned());
    }
    recommendations
}
