//! Smell findings and the per-language rule batteries that produce them.

use crate::utils::LineIndex;
use ruff_python_ast::{Expr, Stmt};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Module containing stable finding codes.
pub mod ids;

/// Shared helpers for brace-delimited languages.
pub mod brace;
/// C and C++ battery.
pub mod cpp;
/// C# battery.
pub mod csharp;
/// Language-independent battery.
pub mod general;
/// Java battery.
pub mod java;
/// JavaScript and TypeScript battery.
pub mod javascript;
/// PHP battery.
pub mod php;
/// Python battery (AST based).
pub mod python;

/// Severity of a finding. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Cosmetic.
    Low,
    /// Worth fixing.
    Medium,
    /// Should be fixed soon.
    High,
    /// Blocks further analysis.
    Critical,
}

impl Severity {
    /// Lowercase name used in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of smell a finding reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SmellKind {
    /// Python source failed to parse.
    SyntaxError,
    /// File has too many lines.
    LargeFile,
    /// Function body too long.
    LongFunction,
    /// Java or C# method body too long.
    LongMethod,
    /// Java `main` does more than bootstrap.
    LongMainMethod,
    /// Too many nested blocks.
    DeepNesting,
    /// Two function bodies look alike.
    DuplicateCode,
    /// Unnamed numeric literal.
    MagicNumber,
    /// Import never referenced.
    UnusedImport,
    /// Too many parameters.
    LongParameterList,
    /// Too many boolean operators in one `if`.
    ComplexCondition,
    /// Class with too many members.
    GodClass,
    /// Chained `.then()` calls.
    CallbackHell,
    /// Top-level JavaScript declaration.
    GlobalVariable,
    /// More `new` than `delete`.
    PotentialMemoryLeak,
    /// `System.out` in a non-presentation class.
    PrintlnInDomain,
    /// `return null;` from an object-returning method.
    NullReturn,
    /// Mutable public field.
    PublicField,
    /// Statement after an unconditional `return`.
    DeadCode,
    /// Line longer than the readability limit.
    LongLine,
    /// Task marker left in a comment.
    TodoComment,
    /// Long string literal repeated many times.
    DuplicateString,
}

impl SmellKind {
    /// Snake case name used in reports and summaries.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SyntaxError => "syntax_error",
            Self::LargeFile => "large_file",
            Self::LongFunction => "long_function",
            Self::LongMethod => "long_method",
            Self::LongMainMethod => "long_main_method",
            Self::DeepNesting => "deep_nesting",
            Self::DuplicateCode => "duplicate_code",
            Self::MagicNumber => "magic_number",
            Self::UnusedImport => "unused_import",
            Self::LongParameterList => "long_parameter_list",
            Self::ComplexCondition => "complex_condition",
            Self::GodClass => "god_class",
            Self::CallbackHell => "callback_hell",
            Self::GlobalVariable => "global_variable",
            Self::PotentialMemoryLeak => "potential_memory_leak",
            Self::PrintlnInDomain => "println_in_domain",
            Self::NullReturn => "null_return",
            Self::PublicField => "public_field",
            Self::DeadCode => "dead_code",
            Self::LongLine => "long_line",
            Self::TodoComment => "todo_comment",
            Self::DuplicateString => "duplicate_string",
        }
    }
}

impl fmt::Display for SmellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single smell found by a rule. Line 0 means "whole file".
pub struct Finding {
    /// What kind of smell this is.
    #[serde(rename = "type")]
    pub kind: SmellKind,
    /// How urgent it is.
    pub severity: Severity,
    /// Description of the issue.
    pub message: String,
    /// 1-based line, or 0 when not tied to a line.
    pub line: usize,
    /// How to fix it.
    pub suggestion: String,
}

impl Finding {
    /// Creates a finding.
    #[must_use]
    pub fn new(
        kind: SmellKind,
        severity: Severity,
        message: impl Into<String>,
        line: usize,
        suggestion: &str,
    ) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            line,
            suggestion: suggestion.to_owned(),
        }
    }
}

/// Ordered findings for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FindingSet {
    findings: Vec<Finding>,
}

impl FindingSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends findings in order.
    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    /// Iterates in detection order.
    pub fn iter(&self) -> std::slice::Iter<'_, Finding> {
        self.findings.iter()
    }

    /// Number of findings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// True when nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings grouped by kind.
    #[must_use]
    pub fn by_kind(&self) -> BTreeMap<SmellKind, Vec<&Finding>> {
        let mut groups: BTreeMap<SmellKind, Vec<&Finding>> = BTreeMap::new();
        for finding in &self.findings {
            groups.entry(finding.kind).or_default().push(finding);
        }
        groups
    }

    /// Findings grouped by severity.
    #[must_use]
    pub fn by_severity(&self) -> BTreeMap<Severity, Vec<&Finding>> {
        let mut groups: BTreeMap<Severity, Vec<&Finding>> = BTreeMap::new();
        for finding in &self.findings {
            groups.entry(finding.severity).or_default().push(finding);
        }
        groups
    }

    /// Count summary consumed by the scorers.
    #[must_use]
    pub fn summary(&self) -> SmellSummary {
        let mut by_severity = SeverityCounts::default();
        let mut by_type = BTreeMap::new();
        for finding in &self.findings {
            by_severity.add(finding.severity);
            *by_type.entry(finding.kind).or_insert(0) += 1;
        }
        SmellSummary {
            total_smells: self.findings.len(),
            by_severity,
            by_type,
            smells: self.findings.clone(),
        }
    }
}

impl From<Vec<Finding>> for FindingSet {
    fn from(findings: Vec<Finding>) -> Self {
        Self { findings }
    }
}

impl<'a> IntoIterator for &'a FindingSet {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.iter()
    }
}

/// Per-severity counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    /// Critical findings.
    pub critical: usize,
    /// High findings.
    pub high: usize,
    /// Medium findings.
    pub medium: usize,
    /// Low findings.
    pub low: usize,
}

impl SeverityCounts {
    fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }

    /// Count for one severity.
    #[must_use]
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// Counts derived from a [`FindingSet`], plus the findings themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SmellSummary {
    /// Number of findings.
    pub total_smells: usize,
    /// Counts per severity.
    pub by_severity: SeverityCounts,
    /// Counts per kind.
    pub by_type: BTreeMap<SmellKind, usize>,
    /// The findings in detection order.
    pub smells: Vec<Finding>,
}

impl SmellSummary {
    /// Number of findings of one kind.
    #[must_use]
    pub fn count(&self, kind: SmellKind) -> usize {
        self.by_type.get(&kind).copied().unwrap_or(0)
    }
}

/// Source text shared by every rule of one detection run.
#[derive(Debug, Clone)]
pub struct Context<'a> {
    /// Full file content.
    pub source: &'a str,
    /// Physical lines, split on `\n`.
    pub lines: Vec<&'a str>,
    /// Offset to line mapping.
    pub line_index: LineIndex,
}

impl<'a> Context<'a> {
    /// Builds the context for one file.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            lines: source.split('\n').collect(),
            line_index: LineIndex::new(source),
        }
    }
}

/// A text rule: a pure function of the source.
pub type TextRule = fn(&Context<'_>) -> Vec<Finding>;

/// A named battery of text rules.
pub type Battery = &'static [(&'static str, TextRule)];

/// Runs every rule of a battery in order.
#[must_use]
pub fn run_battery(battery: Battery, context: &Context<'_>) -> Vec<Finding> {
    battery
        .iter()
        .flat_map(|(name, rule)| {
            let findings = rule(context);
            tracing::trace!(rule = name, count = findings.len(), "rule finished");
            findings
        })
        .collect()
}

/// Trait implemented by AST rules driven by [`crate::linter::LinterVisitor`].
pub trait Rule {
    /// Returns the descriptive name of the rule.
    fn name(&self) -> &'static str;
    /// Returns the kind of finding this rule emits.
    fn kind(&self) -> SmellKind;
    /// Called when entering a statement.
    fn enter_stmt(&mut self, _stmt: &Stmt, _context: &Context<'_>) -> Option<Vec<Finding>> {
        None
    }
    /// Called when leaving a statement.
    fn leave_stmt(&mut self, _stmt: &Stmt, _context: &Context<'_>) -> Option<Vec<Finding>> {
        None
    }
    /// Called when visiting an expression.
    fn visit_expr(&mut self, _expr: &Expr, _context: &Context<'_>) -> Option<Vec<Finding>> {
        None
    }
    /// Called once after the whole module has been walked.
    fn finish(&mut self, _context: &Context<'_>) -> Option<Vec<Finding>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let set = FindingSet::from(vec![
            Finding::new(SmellKind::MagicNumber, Severity::Low, "a", 1, "x"),
            Finding::new(SmellKind::MagicNumber, Severity::Low, "b", 2, "x"),
            Finding::new(SmellKind::GodClass, Severity::High, "c", 3, "y"),
        ]);
        let summary = set.summary();
        assert_eq!(summary.total_smells, 3);
        assert_eq!(summary.by_severity.low, 2);
        assert_eq!(summary.by_severity.high, 1);
        assert_eq!(summary.count(SmellKind::MagicNumber), 2);
        assert_eq!(summary.count(SmellKind::DeadCode), 0);
        assert_eq!(set.by_kind()[&SmellKind::GodClass].len(), 1);
        assert_eq!(set.by_severity()[&Severity::Low].len(), 2);
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_finding_serializes_kind_as_type() {
        let f = Finding::new(SmellKind::GodClass, Severity::High, "m", 4, "s");
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["type"], "god_class");
        assert_eq!(json["severity"], "high");
    }
}
