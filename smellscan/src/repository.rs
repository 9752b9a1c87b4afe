//! Storage for analysis reports.
//!
//! Callers that keep reports around (the CLI for its directory summary,
//! a service for later lookups) go through [`ReportRepository`] so that the
//! pipeline itself never holds process-wide state.

use crate::analyzer::AnalysisReport;
use serde::Serialize;
use std::fmt;

/// Identifier handed out by a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ReportId(u64);

impl ReportId {
    /// Raw numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "report-{}", self.0)
    }
}

/// Create, get and list analysis reports.
pub trait ReportRepository: Send + Sync {
    /// Stores `report` and returns its new id.
    fn create(&mut self, report: AnalysisReport) -> ReportId;

    /// Looks up one report.
    fn get(&self, id: ReportId) -> Option<&AnalysisReport>;

    /// Every report with its id, in creation order.
    fn list(&self) -> Vec<(ReportId, &AnalysisReport)>;

    /// Number of stored reports.
    fn len(&self) -> usize {
        self.list().len()
    }

    /// True when nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Vector-backed repository; ids are creation indices starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryReportRepository {
    reports: Vec<AnalysisReport>,
}

impl InMemoryReportRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports in creation order.
    pub fn reports(&self) -> impl Iterator<Item = &AnalysisReport> {
        self.reports.iter()
    }
}

impl ReportRepository for InMemoryReportRepository {
    fn create(&mut self, report: AnalysisReport) -> ReportId {
        self.reports.push(report);
        ReportId(self.reports.len() as u64)
    }

    fn get(&self, id: ReportId) -> Option<&AnalysisReport> {
        let index = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.reports.get(index)
    }

    fn list(&self) -> Vec<(ReportId, &AnalysisReport)> {
        (1u64..).map(ReportId).zip(&self.reports).collect()
    }

    fn len(&self) -> usize {
        self.reports.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::language::Language;
    use crate::source::SourceFile;

    fn report(text: &str) -> AnalysisReport {
        Analyzer::default().analyze_source(&SourceFile::from_text(text, Some(Language::Python)))
    }

    #[test]
    fn test_create_get_list() {
        let mut repo = InMemoryReportRepository::new();
        assert!(repo.is_empty());
        let first = repo.create(report("x = 1\n"));
        let second = repo.create(report("def f():\n    pass\n"));
        assert_ne!(first, second);
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.get(second).unwrap().lines, 2);
        let ids: Vec<ReportId> = repo.list().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn test_unknown_id() {
        let repo = InMemoryReportRepository::new();
        assert!(repo.get(ReportId(0)).is_none());
        assert!(repo.get(ReportId(7)).is_none());
    }

    #[test]
    fn test_repository_is_object_safe() {
        let mut repo: Box<dyn ReportRepository> = Box::new(InMemoryReportRepository::new());
        let id = repo.create(report("y = 2\n"));
        assert_eq!(id.to_string(), "report-1");
    }
}
