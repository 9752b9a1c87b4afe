//! Python battery: AST rules driven by [`LinterVisitor`] plus the shared
//! text rules.

use super::general::magic_numbers;
use super::{Context, Finding, Rule, Severity, SmellKind};
use crate::linter::LinterVisitor;
use ruff_python_parser::parse_module;

mod complexity;
mod duplication;
mod finding;
mod imports;
mod maintainability;

/// Returns the AST rules run over every parsed Python module.
#[must_use]
pub fn get_python_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(maintainability::FunctionLengthRule),
        Box::new(maintainability::NestingRule::new()),
        Box::new(duplication::DuplicateFunctionRule::new()),
        Box::new(maintainability::ParameterCountRule),
        Box::new(complexity::ComplexConditionRule),
        Box::new(maintainability::GodClassRule),
    ]
}

/// Runs the Python battery. A parse failure yields a single critical
/// `syntax_error` finding in place of the AST rules.
#[must_use]
pub fn detect(context: &Context<'_>) -> Vec<Finding> {
    let mut findings = match parse_module(context.source) {
        Ok(parsed) => {
            let module = parsed.into_syntax();
            let mut visitor = LinterVisitor::new(get_python_rules(), context);
            for stmt in &module.body {
                visitor.visit_stmt(stmt);
            }
            let mut findings = visitor.finish();
            findings.extend(imports::unused_imports(&module.body, context));
            findings
        }
        Err(error) => {
            tracing::debug!(%error, "python source did not parse");
            vec![Finding::new(
                SmellKind::SyntaxError,
                Severity::Critical,
                format!("Syntax error in Python code: {error}"),
                0,
                "Fix syntax errors before analyzing code smells",
            )]
        }
    };
    findings.extend(magic_numbers(context));
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<SmellKind> {
        detect(&Context::new(src)).into_iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_clean_one_liner() {
        assert!(kinds("def f(): pass").is_empty());
    }

    #[test]
    fn test_syntax_error_keeps_text_rules() {
        let findings = detect(&Context::new("def broken(:\n    x = 42\n"));
        assert_eq!(findings[0].kind, SmellKind::SyntaxError);
        assert_eq!(findings[0].severity, Severity::Critical);
        assert_eq!(findings[0].line, 0);
        assert!(findings[0].message.starts_with("Syntax error in Python code: "));
        assert!(findings.iter().any(|f| f.kind == SmellKind::MagicNumber));
    }
}
