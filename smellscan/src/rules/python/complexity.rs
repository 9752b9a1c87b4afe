use super::finding::{create_finding, graded};
use crate::constants::{CONDITION_HIGH, CONDITION_MEDIUM};
use crate::rules::{Context, Finding, Rule, SmellKind};
use ruff_python_ast::{Expr, Stmt, UnaryOp};
use ruff_text_size::{Ranged, TextSize};

/// Counts `and`/`or` operators in a condition, looking through `not`.
/// `a and b and c` is one `BoolOp` with three values and two operators.
pub(super) fn boolean_operator_count(expr: &Expr) -> usize {
    match expr {
        Expr::BoolOp(node) => {
            node.values.len().saturating_sub(1)
                + node
                    .values
                    .iter()
                    .map(boolean_operator_count)
                    .sum::<usize>()
        }
        Expr::UnaryOp(node) if node.op == UnaryOp::Not => boolean_operator_count(&node.operand),
        _ => 0,
    }
}

/// `if`/`elif` tests joining more than three boolean operators.
pub(super) struct ComplexConditionRule;

impl ComplexConditionRule {
    fn check(&self, test: &Expr, location: TextSize, context: &Context<'_>) -> Option<Finding> {
        let operators = boolean_operator_count(test);
        let severity = graded(operators, CONDITION_MEDIUM, CONDITION_HIGH)?;
        Some(create_finding(
            self.kind(),
            severity,
            format!("Complex condition with {operators} operators"),
            context,
            location,
            "Consider extracting the condition into a well-named boolean method",
        ))
    }
}

impl Rule for ComplexConditionRule {
    fn name(&self) -> &'static str {
        "ComplexConditionRule"
    }
    fn kind(&self) -> SmellKind {
        SmellKind::ComplexCondition
    }
    fn enter_stmt(&mut self, stmt: &Stmt, context: &Context<'_>) -> Option<Vec<Finding>> {
        let Stmt::If(node) = stmt else {
            return None;
        };
        let mut findings: Vec<Finding> = self
            .check(&node.test, stmt.range().start(), context)
            .into_iter()
            .collect();
        for clause in &node.elif_else_clauses {
            if let Some(test) = &clause.test {
                findings.extend(self.check(test, clause.range().start(), context));
            }
        }
        (!findings.is_empty()).then_some(findings)
    }
}
