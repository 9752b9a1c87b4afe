use super::finding::{create_finding, graded};
use crate::constants::{
    GOD_CLASS_METHODS, LONG_FUNCTION_HIGH, LONG_FUNCTION_MEDIUM, NESTING_HIGH, NESTING_MEDIUM,
    PARAMS_HIGH, PARAMS_MEDIUM,
};
use crate::rules::{Context, Finding, Rule, Severity, SmellKind};
use ruff_python_ast::Stmt;
use ruff_text_size::{Ranged, TextSize};

/// `def` spanning more than 50 lines, from the `def` line to its last statement.
pub(super) struct FunctionLengthRule;

impl Rule for FunctionLengthRule {
    fn name(&self) -> &'static str {
        "FunctionLengthRule"
    }
    fn kind(&self) -> SmellKind {
        SmellKind::LongFunction
    }
    fn enter_stmt(&mut self, stmt: &Stmt, context: &Context<'_>) -> Option<Vec<Finding>> {
        let Stmt::FunctionDef(f) = stmt else {
            return None;
        };
        let name_start = f.name.range().start();
        let start_line = context.line_index.line_index(name_start);
        let end_line = context.line_index.line_index(stmt.range().end());
        let length = end_line.saturating_sub(start_line) + 1;
        let severity = graded(length, LONG_FUNCTION_MEDIUM, LONG_FUNCTION_HIGH)?;
        Some(vec![create_finding(
            self.kind(),
            severity,
            format!("Function '{}' is {length} lines long", f.name),
            context,
            name_start,
            "Consider breaking this function into smaller, more focused functions",
        )])
    }
}

/// Control blocks with more than four enclosing control blocks.
/// Each `elif` sits one level below the branch before it, and an `else`
/// after `elif`s shares the depth of the last `elif`.
pub(super) struct NestingRule {
    /// One frame per open control block, holding the start offsets of its
    /// `elif` clauses.
    frames: Vec<Vec<TextSize>>,
}

impl NestingRule {
    pub(super) fn new() -> Self {
        Self { frames: Vec::new() }
    }

    fn is_control_block(stmt: &Stmt) -> bool {
        matches!(
            stmt,
            Stmt::If(_) | Stmt::For(_) | Stmt::While(_) | Stmt::Try(_) | Stmt::With(_)
        )
    }

    fn level_at(&self, offset: TextSize) -> usize {
        self.frames
            .iter()
            .map(|elifs| 1 + elifs.iter().filter(|&&start| start <= offset).count())
            .sum()
    }

    fn finding(&self, level: usize, offset: TextSize, context: &Context<'_>) -> Option<Finding> {
        let severity = graded(level, NESTING_MEDIUM, NESTING_HIGH)?;
        Some(create_finding(
            self.kind(),
            severity,
            format!("Code block has {level} levels of nesting"),
            context,
            offset,
            "Consider extracting methods or using early returns to reduce nesting",
        ))
    }
}

impl Rule for NestingRule {
    fn name(&self) -> &'static str {
        "NestingRule"
    }
    fn kind(&self) -> SmellKind {
        SmellKind::DeepNesting
    }
    fn enter_stmt(&mut self, stmt: &Stmt, context: &Context<'_>) -> Option<Vec<Finding>> {
        if !Self::is_control_block(stmt) {
            return None;
        }
        let start = stmt.range().start();
        let level = self.level_at(start);
        let elifs: Vec<TextSize> = match stmt {
            Stmt::If(node) => node
                .elif_else_clauses
                .iter()
                .filter(|clause| clause.test.is_some())
                .map(|clause| clause.range().start())
                .collect(),
            _ => Vec::new(),
        };

        let mut findings: Vec<Finding> = self.finding(level, start, context).into_iter().collect();
        findings.extend(
            elifs
                .iter()
                .enumerate()
                .filter_map(|(k, &offset)| self.finding(level + k + 1, offset, context)),
        );
        self.frames.push(elifs);
        (!findings.is_empty()).then_some(findings)
    }
    fn leave_stmt(&mut self, stmt: &Stmt, _context: &Context<'_>) -> Option<Vec<Finding>> {
        if Self::is_control_block(stmt) {
            self.frames.pop();
        }
        None
    }
}

/// Ordinary parameters only: positional-only, keyword-only, `*args` and
/// `**kwargs` are not counted.
pub(super) struct ParameterCountRule;

impl Rule for ParameterCountRule {
    fn name(&self) -> &'static str {
        "ParameterCountRule"
    }
    fn kind(&self) -> SmellKind {
        SmellKind::LongParameterList
    }
    fn enter_stmt(&mut self, stmt: &Stmt, context: &Context<'_>) -> Option<Vec<Finding>> {
        let Stmt::FunctionDef(f) = stmt else {
            return None;
        };
        let count = f.parameters.args.len();
        let severity = graded(count, PARAMS_MEDIUM, PARAMS_HIGH)?;
        Some(vec![create_finding(
            self.kind(),
            severity,
            format!("Function '{}' has {count} parameters", f.name),
            context,
            f.name.range().start(),
            "Consider using a data structure or object to group related parameters",
        )])
    }
}

/// Classes defining more than fifteen methods directly in their body.
pub(super) struct GodClassRule;

impl Rule for GodClassRule {
    fn name(&self) -> &'static str {
        "GodClassRule"
    }
    fn kind(&self) -> SmellKind {
        SmellKind::GodClass
    }
    fn enter_stmt(&mut self, stmt: &Stmt, context: &Context<'_>) -> Option<Vec<Finding>> {
        let Stmt::ClassDef(class) = stmt else {
            return None;
        };
        let methods = class
            .body
            .iter()
            .filter(|s| matches!(s, Stmt::FunctionDef(_)))
            .count();
        if methods <= GOD_CLASS_METHODS {
            return None;
        }
        Some(vec![create_finding(
            self.kind(),
            Severity::High,
            format!("Class '{}' has {methods} methods", class.name),
            context,
            class.name.range().start(),
            "Consider splitting this class into smaller, more focused classes",
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::super::detect;
    use crate::rules::{Context, Severity, SmellKind};

    fn nesting(src: &str) -> Vec<(usize, String)> {
        detect(&Context::new(src))
            .into_iter()
            .filter(|f| f.kind == SmellKind::DeepNesting)
            .map(|f| (f.line, f.message))
            .collect()
    }

    fn ifs(depth: usize) -> String {
        (0..depth)
            .map(|i| format!("{}if x:\n", "    ".repeat(i)))
            .collect::<String>()
            + &format!("{}pass\n", "    ".repeat(depth))
    }

    #[test]
    fn test_fifth_enclosing_block_is_reported() {
        assert!(nesting(&ifs(5)).is_empty());
        let found = nesting(&ifs(6));
        assert_eq!(found, vec![(6, "Code block has 5 levels of nesting".to_owned())]);
    }

    #[test]
    fn test_high_severity_above_six() {
        let findings: Vec<Severity> = detect(&Context::new(&ifs(8)))
            .into_iter()
            .filter(|f| f.kind == SmellKind::DeepNesting)
            .map(|f| f.severity)
            .collect();
        assert_eq!(findings, vec![Severity::Medium, Severity::Medium, Severity::High]);
    }

    #[test]
    fn test_elif_chain_deepens() {
        let src = "if a:\n    pass\nelif b:\n    pass\nelif c:\n    pass\nelif d:\n    pass\nelif e:\n    pass\nelif f:\n    pass\nelse:\n    for i in y:\n        pass\n";
        let found = nesting(src);
        assert_eq!(
            found,
            vec![
                (11, "Code block has 5 levels of nesting".to_owned()),
                (14, "Code block has 6 levels of nesting".to_owned()),
            ]
        );
    }

    #[test]
    fn test_match_does_not_nest() {
        let body = ifs(5)
            .lines()
            .map(|line| format!("        {line}\n"))
            .collect::<String>();
        let src = format!("match v:\n    case 1:\n{body}");
        assert!(nesting(&src).is_empty());
    }

    #[test]
    fn test_keyword_only_parameters_are_not_counted() {
        let count = |src: &str| {
            detect(&Context::new(src))
                .into_iter()
                .filter(|f| f.kind == SmellKind::LongParameterList)
                .count()
        };
        assert_eq!(count("def f(a, *, b, c, d, e, g):\n    return a\n"), 0);
        assert_eq!(count("def f(a, b, /, c, d, e):\n    return a\n"), 0);
        assert_eq!(count("def f(a, b, c, d, e, g, *args, **kw):\n    return a\n"), 1);
    }
}
