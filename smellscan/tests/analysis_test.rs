//! End-to-end tests for the analysis pipeline: smells, quality, debt and
//! structure computed together for one file or a directory.
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use smellscan::analyzer::{AnalysisInput, AnalysisSummary, Analyzer};
use smellscan::complexity::ComplexityPrediction;
use smellscan::config::Config;
use smellscan::debt::{self, DebtLevel};
use smellscan::language::Language;
use smellscan::quality;
use smellscan::rules::{Finding, FindingSet, Severity, SmellKind};
use smellscan::structure;
use std::fs;
use tempfile::TempDir;

fn god_class_source(methods: usize) -> String {
    let mut src = String::from("class Everything:\n");
    for i in 0..methods {
        src.push_str(&format!("    def method_{i}(self):\n        return self.value\n\n"));
    }
    src
}

#[test]
fn test_clean_python_one_liner() {
    let mut analyzer = Analyzer::default();
    let report = analyzer
        .analyze(AnalysisInput::Text {
            content: "def f(): pass",
            language: Some(Language::Python),
        })
        .unwrap();
    assert_eq!(report.smells.total_smells, 0);
    assert_eq!(report.lines, 1);
    assert!((report.quality.documentation - 20.0).abs() < f64::EPSILON);
    assert_eq!(report.structure.functions, vec!["f".to_owned()]);
    assert!(report.quality.overall > 0.0 && report.quality.overall <= 100.0);
    assert!(matches!(
        report.complexity.prediction,
        ComplexityPrediction::Unavailable { .. }
    ));
}

#[test]
fn test_twenty_method_class_is_a_god_class() {
    let src = god_class_source(20);
    let mut analyzer = Analyzer::default();
    let report = analyzer
        .analyze(AnalysisInput::Text {
            content: &src,
            language: Some(Language::Python),
        })
        .unwrap();
    assert_eq!(report.smells.count(SmellKind::GodClass), 1);
    assert_eq!(report.structure.classes, vec!["Everything".to_owned()]);
    assert_eq!(report.structure.functions.len(), 20);
    assert!(report.quality.maintainability <= 88.0);
    assert!(report
        .debt
        .priority_issues
        .iter()
        .any(|issue| issue.kind == "god_class"));
}

#[test]
fn test_adding_a_god_class_worsens_scores() {
    let clean = "import os\n\n\ndef home():\n    return os.getcwd()\n\n\ndef name():\n    return os.name\n\n";
    let with_class = format!("{clean}{}", god_class_source(20));
    let analyze = |content: &str| {
        Analyzer::default()
            .analyze(AnalysisInput::Text {
                content,
                language: Some(Language::Python),
            })
            .unwrap()
    };
    let before = analyze(clean);
    let after = analyze(&with_class);
    assert_eq!(before.smells.total_smells, 0);
    assert!(after.quality.maintainability < before.quality.maintainability);
    assert!(after.debt.breakdown.code_smells > before.debt.breakdown.code_smells);
}

#[test]
fn test_more_smells_never_improve_scores() {
    let src = god_class_source(3);
    let base = FindingSet::new().summary();
    let worse = FindingSet::from(vec![Finding::new(
        SmellKind::GodClass,
        Severity::High,
        "Class 'Everything' has 20 methods",
        1,
        "Consider splitting this class into smaller, more focused classes",
    )])
    .summary();

    let base_quality = quality::score(&base, &src);
    let worse_quality = quality::score(&worse, &src);
    assert!(worse_quality.overall < base_quality.overall);
    assert!(worse_quality.maintainability < base_quality.maintainability);

    let facts = structure::extract(&src, Some(Language::Python), "py");
    let unavailable = ComplexityPrediction::Unavailable {
        error: "No trained model available".to_owned(),
    };
    let base_debt = debt::calculate(&base_quality, &base, &unavailable, &facts);
    let worse_debt = debt::calculate(&worse_quality, &worse, &unavailable, &facts);
    assert!(worse_debt.total_score > base_debt.total_score);
    assert!(worse_debt.breakdown.code_smells > base_debt.breakdown.code_smells);
}

#[test]
fn test_scores_stay_in_range() {
    let src = "def a(p1, p2, p3, p4, p5, p6, p7, p8, p9):\n    if p1 and p2 or p3 and p4 or p5:\n        return 12345\n";
    let report = Analyzer::default()
        .analyze(AnalysisInput::Text {
            content: src,
            language: Some(Language::Python),
        })
        .unwrap();
    for value in [
        report.quality.overall,
        report.quality.maintainability,
        report.quality.readability,
        report.quality.complexity,
        report.quality.documentation,
        report.debt.total_score,
    ] {
        assert!((0.0..=100.0).contains(&value), "{value} out of range");
    }
    assert!(report.debt.estimated_hours <= 8.0);
    assert!(report.debt.priority_issues.len() <= 10);
    assert!(report.debt.recommendations.len() <= 8);
    assert_eq!(report.debt.level, DebtLevel::from_score(report.debt.total_score));
}

#[test]
fn test_patterns_can_be_disabled() {
    let mut config = Config::default();
    config.smellscan.design_patterns = Some(false);
    let report = Analyzer::new(config)
        .analyze(AnalysisInput::Text {
            content: "class A:\n    pass\n",
            language: Some(Language::Python),
        })
        .unwrap();
    assert!(report.patterns.is_none());
}

#[test]
fn test_directory_summary() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("clean.py"), "def f():\n    return 1\n").unwrap();
    fs::write(
        dir.path().join("Leaky.cpp"),
        "void f() {\n  A* a = new A();\n}\n",
    )
    .unwrap();
    fs::create_dir(dir.path().join("build")).unwrap();
    fs::write(dir.path().join("build").join("gen.py"), "x = 1\n").unwrap();

    let mut config = Config::default();
    config.smellscan.exclude_folders = Some(vec!["build".to_owned()]);
    let batch = Analyzer::new(config).analyze_paths(&[dir.path().to_path_buf()], None);
    assert_eq!(batch.reports.len(), 2);

    let summary = AnalysisSummary::from_reports(&batch.reports, batch.failures.len());
    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.failed_files, 0);
    assert!(summary.total_smells >= 1);
    assert!(summary.by_severity.high >= 1);
    let worst = summary.worst_file.expect("worst file");
    assert!(worst.1 <= summary.average_quality);
}

#[test]
fn test_empty_summary() {
    let summary = AnalysisSummary::from_reports(std::iter::empty(), 3);
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.failed_files, 3);
    assert!(summary.worst_file.is_none());
    assert!(summary.average_quality.abs() < f64::EPSILON);
}
