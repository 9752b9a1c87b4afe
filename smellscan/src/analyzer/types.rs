//! Report types produced by the analyzer.

use crate::complexity::ComplexityAnalysis;
use crate::debt::DebtMetrics;
use crate::language::Language;
use crate::patterns::PatternReport;
use crate::quality::QualityScore;
use crate::rules::{SeverityCounts, SmellSummary};
use crate::structure::StructuralFacts;
use serde::Serialize;

/// Everything known about one analysed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Display path, or `<text>` for inline sources.
    pub file: String,
    /// Recognised language; `None` when only the general rules ran.
    pub language: Option<Language>,
    /// Physical line count.
    pub lines: usize,
    /// Declared classes, functions and imports.
    pub structure: StructuralFacts,
    /// Detected smells.
    pub smells: SmellSummary,
    /// Quality score.
    pub quality: QualityScore,
    /// Complexity features and prediction.
    pub complexity: ComplexityAnalysis,
    /// Technical debt estimate.
    pub debt: DebtMetrics,
    /// Design pattern guess, unless disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<PatternReport>,
    /// Sub-analyses that degraded, in plain words.
    pub diagnostics: Vec<String>,
}

/// A file that could not be analysed at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    /// Path as given.
    pub file: String,
    /// Error message.
    pub error: String,
}

/// Totals across many reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisSummary {
    /// Files that produced a report.
    pub total_files: usize,
    /// Lines across those files.
    pub total_lines: usize,
    /// Findings across those files.
    pub total_smells: usize,
    /// Findings per severity.
    pub by_severity: SeverityCounts,
    /// Mean overall quality, 0 when there are no reports.
    pub average_quality: f64,
    /// Mean debt score, 0 when there are no reports.
    pub average_debt: f64,
    /// Lowest overall quality and the file it belongs to.
    pub worst_file: Option<(String, f64)>,
    /// Files that could not be read.
    pub failed_files: usize,
}

impl AnalysisSummary {
    /// Aggregates `reports`; `failed_files` is carried through as given.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_reports<'a>(
        reports: impl IntoIterator<Item = &'a AnalysisReport>,
        failed_files: usize,
    ) -> Self {
        let mut summary = Self {
            failed_files,
            ..Self::default()
        };
        let mut quality_sum = 0.0;
        let mut debt_sum = 0.0;
        for report in reports {
            summary.total_files += 1;
            summary.total_lines += report.lines;
            summary.total_smells += report.smells.total_smells;
            summary.by_severity.critical += report.smells.by_severity.critical;
            summary.by_severity.high += report.smells.by_severity.high;
            summary.by_severity.medium += report.smells.by_severity.medium;
            summary.by_severity.low += report.smells.by_severity.low;
            quality_sum += report.quality.overall;
            debt_sum += report.debt.total_score;
            let worse = summary
                .worst_file
                .as_ref()
                .map_or(true, |(_, score)| report.quality.overall < *score);
            if worse {
                summary.worst_file = Some((report.file.clone(), report.quality.overall));
            }
        }
        if summary.total_files > 0 {
            summary.average_quality = quality_sum / summary.total_files as f64;
            summary.average_debt = debt_sum / summary.total_files as f64;
        }
        summary
    }
}
