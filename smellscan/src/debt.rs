//! Technical debt estimate from smells, quality and complexity.
//!
//! Five categories are scored on `[0, 100]` and combined with fixed
//! weights. The weights and per-kind costs are empirical constants.

use crate::complexity::ComplexityPrediction;
use crate::quality::QualityScore;
use crate::rules::{Severity, SmellKind, SmellSummary};
use crate::structure::StructuralFacts;
use serde::Serialize;
use std::fmt;

/// Weight of the code smell category.
pub const CODE_SMELLS_WEIGHT: f64 = 0.35;
/// Weight of the complexity category.
pub const COMPLEXITY_WEIGHT: f64 = 0.25;
/// Weight of the maintainability category.
pub const MAINTAINABILITY_WEIGHT: f64 = 0.20;
/// Weight of the documentation category.
pub const DOCUMENTATION_WEIGHT: f64 = 0.10;
/// Weight of the duplication category.
pub const DUPLICATION_WEIGHT: f64 = 0.10;

/// Raw smell debt that maps to a category score of 100.
const MAX_SMELL_DEBT: f64 = 200.0;
const MAX_HOURS: f64 = 8.0;
const HOURS_PER_QUALITY_ISSUE: f64 = 0.25;
const DEFAULT_HOURS: f64 = 0.25;
const MAX_PRIORITY_ISSUES: usize = 10;
const MAX_RECOMMENDATIONS: usize = 8;
const QUALITY_ISSUES_CONSIDERED: usize = 5;
const QUALITY_RECOMMENDATIONS_KEPT: usize = 3;

fn severity_debt(severity: Severity) -> f64 {
    match severity {
        Severity::Critical => 25.0,
        Severity::High => 15.0,
        Severity::Medium => 8.0,
        Severity::Low => 3.0,
    }
}

fn kind_debt(kind: SmellKind) -> f64 {
    match kind {
        SmellKind::GodClass => 20.0,
        SmellKind::LongFunction => 12.0,
        SmellKind::DuplicateCode => 10.0,
        SmellKind::DeepNesting => 8.0,
        SmellKind::ComplexCondition => 5.0,
        _ => 2.0,
    }
}

fn severity_hours(severity: Severity) -> f64 {
    match severity {
        Severity::Critical => 8.0,
        Severity::High => 4.0,
        Severity::Medium => 2.0,
        Severity::Low => 0.5,
    }
}

fn kind_hours(kind: SmellKind) -> f64 {
    match kind {
        SmellKind::LongFunction => 3.0,
        SmellKind::GodClass => 6.0,
        SmellKind::DuplicateCode => 2.5,
        SmellKind::DeepNesting => 2.0,
        SmellKind::ComplexCondition => 1.5,
        SmellKind::MagicNumber => 0.3,
        SmellKind::UnusedImport => 0.1,
        _ => DEFAULT_HOURS,
    }
}

/// Smell kinds that also count against maintainability.
const MAINTAINABILITY_KINDS: [SmellKind; 3] = [
    SmellKind::GodClass,
    SmellKind::LongFunction,
    SmellKind::DuplicateCode,
];

/// Score per category, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DebtBreakdown {
    /// Severity and kind weighted smell count.
    pub code_smells: f64,
    /// Inverse complexity sub-score plus the predicted class.
    pub complexity: f64,
    /// Inverse maintainability sub-score plus structural smells.
    pub maintainability: f64,
    /// Inverse documentation sub-score plus undocumented elements.
    pub documentation: f64,
    /// Duplicate code and duplicate strings.
    pub duplication: f64,
}

impl DebtBreakdown {
    /// Category names and scores, in weight order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("code_smells", self.code_smells),
            ("complexity", self.complexity),
            ("maintainability", self.maintainability),
            ("documentation", self.documentation),
            ("duplication", self.duplication),
        ]
    }

    /// Weighted sum of the categories.
    #[must_use]
    pub fn weighted_total(&self) -> f64 {
        self.code_smells * CODE_SMELLS_WEIGHT
            + self.complexity * COMPLEXITY_WEIGHT
            + self.maintainability * MAINTAINABILITY_WEIGHT
            + self.documentation * DOCUMENTATION_WEIGHT
            + self.duplication * DUPLICATION_WEIGHT
    }
}

/// Bucketed total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtLevel {
    /// Below 30.
    Low,
    /// 30 to 50.
    Medium,
    /// 50 to 70.
    High,
    /// 70 and above.
    Critical,
}

impl DebtLevel {
    /// Bucket for a total score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            Self::Critical
        } else if score >= 50.0 {
            Self::High
        } else if score >= 30.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for DebtLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        })
    }
}

/// Direction the debt is assumed to move in. Derived from the current
/// total only; no history is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Total of 70 or more.
    Increasing,
    /// Total from 40 to 70.
    Stable,
    /// Total below 40.
    Decreasing,
}

impl Trend {
    /// Trend for a total score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            Self::Increasing
        } else if score >= 40.0 {
            Self::Stable
        } else {
            Self::Decreasing
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Increasing => "increasing",
            Self::Stable => "stable",
            Self::Decreasing => "decreasing",
        })
    }
}

/// An issue that should be handled first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityIssue {
    /// Smell kind, or `quality_issue`.
    #[serde(rename = "type")]
    pub kind: String,
    /// High or critical.
    pub severity: Severity,
    /// What is wrong.
    pub message: String,
    /// 1-based line, 0 for file-wide issues.
    pub line: usize,
    /// How to fix it.
    pub suggestion: String,
}

/// Debt estimate for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebtMetrics {
    /// Weighted total in `[0, 100]`.
    pub total_score: f64,
    /// Bucket of `total_score`.
    pub level: DebtLevel,
    /// Per-category scores.
    pub breakdown: DebtBreakdown,
    /// Hours to fix, capped at 8.
    pub estimated_hours: f64,
    /// At most 10 issues, most severe first.
    pub priority_issues: Vec<PriorityIssue>,
    /// Derived from `total_score`.
    pub trend: Trend,
    /// At most 8 actions.
    pub recommendations: Vec<String>,
}

/// Computes debt metrics.
#[must_use]
pub fn calculate(
    quality: &QualityScore,
    summary: &SmellSummary,
    complexity: &ComplexityPrediction,
    structure: &StructuralFacts,
) -> DebtMetrics {
    let breakdown = DebtBreakdown {
        code_smells: smell_debt(summary),
        complexity: complexity_debt(quality, complexity),
        maintainability: maintainability_debt(quality, summary),
        documentation: documentation_debt(quality, structure),
        duplication: duplication_debt(summary),
    };
    let total_score = breakdown.weighted_total().clamp(0.0, 100.0);
    tracing::debug!(total_score, "technical debt calculated");
    DebtMetrics {
        total_score,
        level: DebtLevel::from_score(total_score),
        breakdown,
        estimated_hours: estimated_hours(summary, quality),
        priority_issues: priority_issues(summary, quality),
        trend: Trend::from_score(total_score),
        recommendations: recommendations(&breakdown, quality, total_score),
    }
}

/// `(severity weights + kind add-ons) / 200`, as a percentage.
#[must_use]
pub fn smell_debt(summary: &SmellSummary) -> f64 {
    if summary.total_smells == 0 {
        return 0.0;
    }
    let by_severity: f64 = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ]
    .iter()
    .map(|&s| summary.by_severity.get(s) as f64 * severity_debt(s))
    .sum();
    let by_kind: f64 = summary
        .by_type
        .iter()
        .map(|(&kind, &count)| count as f64 * kind_debt(kind))
        .sum();
    ((by_severity + by_kind) / MAX_SMELL_DEBT * 100.0).min(100.0)
}

/// `0.6 * (100 - complexity)` plus `0.4` of the label debt scaled up by
/// uncertainty. Without a prediction only the first term applies.
#[must_use]
pub fn complexity_debt(quality: &QualityScore, prediction: &ComplexityPrediction) -> f64 {
    let mut debt = (100.0 - quality.complexity) * 0.6;
    if let Some((label, confidence)) = prediction.label() {
        debt += label.base_debt() * (1.0 + (1.0 - confidence)) * 0.4;
    }
    debt.clamp(0.0, 100.0)
}

/// `0.7 * (100 - maintainability) + 5` per god class, long function or duplicate.
#[must_use]
pub fn maintainability_debt(quality: &QualityScore, summary: &SmellSummary) -> f64 {
    let smells: usize = MAINTAINABILITY_KINDS.iter().map(|&k| summary.count(k)).sum();
    ((100.0 - quality.maintainability) * 0.7 + smells as f64 * 5.0).clamp(0.0, 100.0)
}

/// `0.8 * (100 - documentation) + 2 * 0.3 * (functions + classes)`.
#[must_use]
pub fn documentation_debt(quality: &QualityScore, structure: &StructuralFacts) -> f64 {
    let missing_docs = structure.element_count() as f64 * 0.3;
    ((100.0 - quality.documentation) * 0.8 + missing_docs * 2.0).clamp(0.0, 100.0)
}

/// `8` per duplicate code finding plus `1` per duplicate string.
#[must_use]
pub fn duplication_debt(summary: &SmellSummary) -> f64 {
    let debt = summary.count(SmellKind::DuplicateCode) as f64 * 8.0
        + summary.count(SmellKind::DuplicateString) as f64;
    debt.min(100.0)
}

/// Mean of severity and kind cost per finding, plus a quarter hour per
/// quality issue, capped at 8 hours.
#[must_use]
pub fn estimated_hours(summary: &SmellSummary, quality: &QualityScore) -> f64 {
    let smells: f64 = summary
        .smells
        .iter()
        .map(|f| (severity_hours(f.severity) + kind_hours(f.kind)) / 2.0)
        .sum();
    let issues = quality.issues.len() as f64 * HOURS_PER_QUALITY_ISSUE;
    (smells + issues).min(MAX_HOURS)
}

fn priority_issues(summary: &SmellSummary, quality: &QualityScore) -> Vec<PriorityIssue> {
    let mut issues: Vec<PriorityIssue> = summary
        .smells
        .iter()
        .filter(|f| f.severity >= Severity::High)
        .map(|f| PriorityIssue {
            kind: f.kind.as_str().to_owned(),
            severity: f.severity,
            message: f.message.clone(),
            line: f.line,
            suggestion: f.suggestion.clone(),
        })
        .collect();
    issues.extend(
        quality
            .issues
            .iter()
            .take(QUALITY_ISSUES_CONSIDERED)
            .filter(|issue| issue.contains("Critical") || issue.contains("High"))
            .map(|issue| PriorityIssue {
                kind: "quality_issue".to_owned(),
                severity: Severity::High,
                message: issue.clone(),
                line: 0,
                suggestion: "Review and address quality issues".to_owned(),
            }),
    );
    issues.sort_by(|a, b| b.severity.cmp(&a.severity));
    issues.truncate(MAX_PRIORITY_ISSUES);
    issues
}

fn recommendations(breakdown: &DebtBreakdown, quality: &QualityScore, total: f64) -> Vec<String> {
    let mut recommendations = Vec::new();
    if total >= 70.0 {
        recommendations.push(
            "CRITICAL: High technical debt detected. Prioritize refactoring immediately."
                .to_owned(),
        );
    } else if total >= 50.0 {
        recommendations
            .push("WARNING: Moderate technical debt. Plan refactoring sprints.".to_owned());
    } else if total >= 30.0 {
        recommendations
            .push("INFO: Some technical debt present. Address incrementally.".to_owned());
    }

    let triggers = [
        (
            breakdown.code_smells > 40.0,
            "Focus on eliminating code smells, especially critical and high-severity issues.",
        ),
        (
            breakdown.complexity > 40.0,
            "Reduce code complexity by breaking down large functions and simplifying logic.",
        ),
        (
            breakdown.maintainability > 40.0,
            "Improve maintainability by refactoring god classes and long functions.",
        ),
        (
            breakdown.documentation > 40.0,
            "Add comprehensive documentation to improve code understanding.",
        ),
        (
            breakdown.duplication > 30.0,
            "Eliminate code duplication by extracting common functionality.",
        ),
    ];
    recommendations.extend(
        triggers
            .iter()
            .filter(|(fired, _)| *fired)
            .map(|(_, text)| (*text).to_owned()),
    );
    recommendations.extend(
        quality
            .recommendations
            .iter()
            .take(QUALITY_RECOMMENDATIONS_KEPT)
            .cloned(),
    );
    if recommendations.is_empty() {
        recommendations.push("Code quality is good! Maintain current standards.".to_owned());
    }
    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complexity::ComplexityClass;
    use crate::language::Language;
    use crate::rules::{Finding, FindingSet};
    use crate::structure;

    fn perfect_quality() -> QualityScore {
        QualityScore {
            overall: 100.0,
            maintainability: 100.0,
            readability: 100.0,
            complexity: 100.0,
            documentation: 100.0,
            issues: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    fn no_prediction() -> ComplexityPrediction {
        ComplexityPrediction::Unavailable {
            error: "none".to_owned(),
        }
    }

    fn empty_structure() -> StructuralFacts {
        structure::extract("", Some(Language::Python), "py")
    }

    fn summary_of(findings: Vec<Finding>) -> SmellSummary {
        FindingSet::from(findings).summary()
    }

    #[test]
    fn test_clean_input_has_no_debt() {
        let metrics = calculate(
            &perfect_quality(),
            &SmellSummary::default(),
            &no_prediction(),
            &empty_structure(),
        );
        assert!(metrics.total_score.abs() < 1e-9);
        assert_eq!(metrics.level, DebtLevel::Low);
        assert_eq!(metrics.trend, Trend::Decreasing);
        assert!(metrics.priority_issues.is_empty());
        assert_eq!(
            metrics.recommendations,
            vec!["Code quality is good! Maintain current standards.".to_owned()]
        );
    }

    #[test]
    fn test_smell_debt_formula() {
        let summary = summary_of(vec![
            Finding::new(SmellKind::GodClass, Severity::High, "g", 1, "s"),
            Finding::new(SmellKind::MagicNumber, Severity::Low, "m", 2, "s"),
        ]);
        // (15 + 3 + 20 + 2) / 200 * 100
        assert!((smell_debt(&summary) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_complexity_debt_uses_confidence() {
        let prediction = ComplexityPrediction::Predicted {
            label: ComplexityClass::Quadratic,
            confidence: 0.5,
            class_probabilities: Vec::new(),
        };
        // 60 * 1.5 * 0.4
        assert!((complexity_debt(&perfect_quality(), &prediction) - 36.0).abs() < 1e-9);
        assert!(complexity_debt(&perfect_quality(), &no_prediction()).abs() < 1e-9);
    }

    #[test]
    fn test_total_is_weighted_sum_of_breakdown() {
        let mut quality = perfect_quality();
        quality.complexity = 40.0;
        quality.documentation = 20.0;
        let summary = summary_of(vec![Finding::new(
            SmellKind::DuplicateCode,
            Severity::Medium,
            "d",
            3,
            "s",
        )]);
        let metrics = calculate(&quality, &summary, &no_prediction(), &empty_structure());
        let expected = metrics.breakdown.weighted_total();
        assert!((metrics.total_score - expected).abs() < 1e-9);
        assert!((metrics.breakdown.duplication - 8.0).abs() < 1e-9);
        assert!((metrics.breakdown.documentation - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_hours_are_capped() {
        let findings = (0..20)
            .map(|i| Finding::new(SmellKind::GodClass, Severity::Critical, "g", i, "s"))
            .collect();
        assert!((estimated_hours(&summary_of(findings), &perfect_quality()) - 8.0).abs() < 1e-9);
        let one = summary_of(vec![Finding::new(
            SmellKind::MagicNumber,
            Severity::Low,
            "m",
            1,
            "s",
        )]);
        assert!((estimated_hours(&one, &perfect_quality()) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_priority_issues_sorted_and_capped() {
        let mut findings: Vec<Finding> = (0..12)
            .map(|i| Finding::new(SmellKind::PotentialMemoryLeak, Severity::High, "leak", i, "s"))
            .collect();
        findings.push(Finding::new(
            SmellKind::SyntaxError,
            Severity::Critical,
            "syntax",
            0,
            "s",
        ));
        let metrics = calculate(
            &perfect_quality(),
            &summary_of(findings),
            &no_prediction(),
            &empty_structure(),
        );
        assert_eq!(metrics.priority_issues.len(), 10);
        assert_eq!(metrics.priority_issues[0].severity, Severity::Critical);
        assert_eq!(metrics.priority_issues[1].line, 0);
    }

    #[test]
    fn test_quality_issue_becomes_priority() {
        let mut quality = perfect_quality();
        quality.issues = vec![
            "High priority issues: 1 high severity code smells".to_owned(),
            "Moderately large file: 600 lines".to_owned(),
        ];
        let metrics = calculate(
            &quality,
            &SmellSummary::default(),
            &no_prediction(),
            &empty_structure(),
        );
        assert_eq!(metrics.priority_issues.len(), 1);
        assert_eq!(metrics.priority_issues[0].kind, "quality_issue");
    }

    #[test]
    fn test_levels_and_trends() {
        assert_eq!(DebtLevel::from_score(70.0), DebtLevel::Critical);
        assert_eq!(DebtLevel::from_score(55.0), DebtLevel::High);
        assert_eq!(DebtLevel::from_score(30.0), DebtLevel::Medium);
        assert_eq!(DebtLevel::from_score(29.9), DebtLevel::Low);
        assert_eq!(Trend::from_score(45.0), Trend::Stable);
        assert_eq!(Trend::from_score(39.0), Trend::Decreasing);
    }
}
