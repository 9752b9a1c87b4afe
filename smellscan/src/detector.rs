//! Language dispatch for the smell rules.

use crate::language::Language;
use crate::rules::cpp::CPP_BATTERY;
use crate::rules::csharp::CSHARP_BATTERY;
use crate::rules::general::{EXTENDED_BATTERY, GENERAL_BATTERY};
use crate::rules::java::JAVA_BATTERY;
use crate::rules::javascript::JAVASCRIPT_BATTERY;
use crate::rules::php::PHP_BATTERY;
use crate::rules::{python, run_battery, Context, Finding, FindingSet};

/// How one language's rules are run.
#[derive(Clone, Copy)]
pub enum Battery {
    /// Parsed with ruff; AST rules plus text rules.
    Python,
    /// Regex rules only.
    Text(crate::rules::Battery),
}

impl Battery {
    fn run(self, context: &Context<'_>) -> Vec<Finding> {
        match self {
            Self::Python => python::detect(context),
            Self::Text(rules) => run_battery(rules, context),
        }
    }
}

/// The rule battery for a language. `None` (unrecognised) has no
/// language battery and only the general rules run.
#[must_use]
pub fn battery_for(language: Option<Language>) -> Option<Battery> {
    let battery = match language? {
        Language::Python => Battery::Python,
        Language::Java => Battery::Text(JAVA_BATTERY),
        Language::JavaScript | Language::TypeScript => Battery::Text(JAVASCRIPT_BATTERY),
        Language::Cpp | Language::C | Language::CHeader => Battery::Text(CPP_BATTERY),
        Language::CSharp => Battery::Text(CSHARP_BATTERY),
        Language::Php => Battery::Text(PHP_BATTERY),
    };
    Some(battery)
}

/// Stateless smell detector. Each call builds a fresh [`FindingSet`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SmellDetector {
    extended_rules: bool,
}

impl SmellDetector {
    /// Detector running the language battery and the general rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also run long-line, TODO and duplicate-string rules.
    #[must_use]
    pub fn with_extended_rules(mut self, enabled: bool) -> Self {
        self.extended_rules = enabled;
        self
    }

    /// Runs the battery for `language`, then the general rules.
    #[must_use]
    pub fn detect(&self, source: &str, language: Option<Language>) -> FindingSet {
        let context = Context::new(source);
        let mut findings = FindingSet::new();
        if let Some(battery) = battery_for(language) {
            findings.extend(battery.run(&context));
        }
        findings.extend(run_battery(GENERAL_BATTERY, &context));
        if self.extended_rules {
            findings.extend(run_battery(EXTENDED_BATTERY, &context));
        }
        tracing::debug!(
            language = language.map_or("unknown", Language::display_name),
            findings = findings.len(),
            "smell detection finished"
        );
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::SmellKind;

    #[test]
    fn test_unknown_language_runs_general_rules_only() {
        let src = format!("{}x = 12345\n", "y\n".repeat(600));
        let findings = SmellDetector::new().detect(&src, None);
        let kinds: Vec<SmellKind> = findings.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![SmellKind::LargeFile]);
    }

    #[test]
    fn test_extended_rules_are_opt_in() {
        let src = "// TODO: split this\nint x;\n";
        assert!(SmellDetector::new()
            .detect(src, Some(Language::C))
            .is_empty());
        let findings = SmellDetector::new()
            .with_extended_rules(true)
            .detect(src, Some(Language::C));
        assert_eq!(findings.summary().count(SmellKind::TodoComment), 1);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let src = "function f() {\n  if (a && b || c && d || e) { return 42; }\n}\n";
        let detector = SmellDetector::new();
        assert_eq!(
            detector.detect(src, Some(Language::JavaScript)),
            detector.detect(src, Some(Language::JavaScript))
        );
    }
}
