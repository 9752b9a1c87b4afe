//! Integration tests for per-language smell detection.
//!
//! These go through the public `SmellDetector` so every battery is run the
//! same way the analyzer runs it, general rules included.
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use smellscan::detector::SmellDetector;
use smellscan::language::Language;
use smellscan::rules::{Severity, SmellKind, SmellSummary};

fn summary(src: &str, language: Language) -> SmellSummary {
    SmellDetector::new().detect(src, Some(language)).summary()
}

fn python_function(body_lines: usize) -> String {
    let body: String = (0..body_lines).map(|i| format!("    v{i} = {}\n", i % 5)).collect();
    format!("def work():\n{body}")
}

#[test]
fn test_python_clean_one_liner() {
    let result = summary("def f(): pass", Language::Python);
    assert_eq!(result.total_smells, 0);
}

#[test]
fn test_python_long_function_boundaries() {
    // Header line plus body lines: 50 is fine, 51 is medium, 101 is high.
    assert_eq!(summary(&python_function(49), Language::Python).count(SmellKind::LongFunction), 0);

    let medium = summary(&python_function(50), Language::Python);
    let finding = medium
        .smells
        .iter()
        .find(|f| f.kind == SmellKind::LongFunction)
        .expect("long function");
    assert_eq!(finding.severity, Severity::Medium);
    assert_eq!(finding.line, 1);

    let high = summary(&python_function(100), Language::Python);
    let finding = high
        .smells
        .iter()
        .find(|f| f.kind == SmellKind::LongFunction)
        .expect("long function");
    assert_eq!(finding.severity, Severity::High);
}

#[test]
fn test_python_long_parameter_list() {
    let result = summary("def f(a, b, c, d, e, g):\n    return a\n", Language::Python);
    assert_eq!(result.total_smells, 1);
    assert_eq!(result.smells[0].kind, SmellKind::LongParameterList);
    assert_eq!(result.smells[0].message, "Function 'f' has 6 parameters");
}

#[test]
fn test_python_syntax_error_is_critical() {
    let result = summary("def broken(:\n", Language::Python);
    assert_eq!(result.by_severity.critical, 1);
    assert_eq!(result.smells[0].kind, SmellKind::SyntaxError);
}

#[test]
fn test_java_god_class() {
    let methods: String = (0..16)
        .map(|i| format!("    public int get{i}() {{\n        return value;\n    }}\n"))
        .collect();
    let src = format!("public class Everything {{\n    private int value;\n{methods}}}\n");
    let result = summary(&src, Language::Java);
    assert_eq!(result.count(SmellKind::GodClass), 1);
    let finding = result
        .smells
        .iter()
        .find(|f| f.kind == SmellKind::GodClass)
        .expect("god class");
    assert_eq!(finding.severity, Severity::High);
    assert_eq!(finding.line, 1);
    assert!(finding.message.starts_with("Class 'Everything' has 16 methods"));
}

#[test]
fn test_java_fifteen_methods_is_not_a_god_class() {
    let methods: String = (0..15)
        .map(|i| format!("    public int get{i}() {{\n        return value;\n    }}\n"))
        .collect();
    let src = format!("public class Enough {{\n    private int value;\n{methods}}}\n");
    assert_eq!(summary(&src, Language::Java).count(SmellKind::GodClass), 0);
}

#[test]
fn test_cpp_memory_leaks() {
    let src = "void f() {\n  A* a = new A();\n  B* b = new B();\n  C* c = new C();\n}\n";
    let result = summary(src, Language::Cpp);
    assert_eq!(result.count(SmellKind::PotentialMemoryLeak), 3);
    let lines: Vec<usize> = result
        .smells
        .iter()
        .filter(|f| f.kind == SmellKind::PotentialMemoryLeak)
        .map(|f| f.line)
        .collect();
    assert_eq!(lines, vec![2, 3, 4]);
}

#[test]
fn test_header_files_use_the_c_battery() {
    let src = "int* make() {\n  return new int[4];\n}\n";
    assert_eq!(
        summary(src, Language::CHeader).count(SmellKind::PotentialMemoryLeak),
        1
    );
}

#[test]
fn test_csharp_battery() {
    let body = "        total = total + price;\n".repeat(48);
    let src = format!("public class Ledger\n{{\n    public int Sum(int price)\n    {{\n{body}    }}\n}}\n");
    let result = summary(&src, Language::CSharp);
    assert_eq!(result.total_smells, 1);
    assert_eq!(result.smells[0].kind, SmellKind::LongMethod);
    assert_eq!(result.smells[0].severity, Severity::Medium);
    assert_eq!(result.smells[0].line, 3);
}

#[test]
fn test_javascript_complex_condition() {
    let src = "function f() {\n  if (a && b || c && d || e) { return 1; }\n}\n";
    let result = summary(src, Language::JavaScript);
    assert_eq!(result.count(SmellKind::ComplexCondition), 1);
}

#[test]
fn test_magic_numbers_across_languages() {
    for (src, language) in [
        ("x = 42\n", Language::Python),
        ("int x = 42;\n", Language::C),
        ("<?php\n$x = 42;\n", Language::Php),
    ] {
        let result = summary(src, language);
        assert_eq!(result.count(SmellKind::MagicNumber), 1, "{language:?}");
    }
}

#[test]
fn test_large_file_applies_to_unknown_languages() {
    let src = "line\n".repeat(500) + "line";
    let result = SmellDetector::new().detect(&src, None).summary();
    assert_eq!(result.count(SmellKind::LargeFile), 1);
    assert_eq!(result.smells[0].severity, Severity::Medium);
}

#[test]
fn test_summary_totals_agree() {
    let src = "function f(a, b, c, d, e, f, g, h, i) {\n  if (a && b || c && d || e) { return 99; }\n}\n";
    let result = summary(src, Language::JavaScript);
    let by_severity = result.by_severity.critical
        + result.by_severity.high
        + result.by_severity.medium
        + result.by_severity.low;
    assert_eq!(by_severity, result.total_smells);
    assert_eq!(result.by_type.values().sum::<usize>(), result.total_smells);
    assert_eq!(result.smells.len(), result.total_smells);
}
