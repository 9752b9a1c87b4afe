use super::finding::create_finding;
use crate::rules::{Context, Finding, Rule, Severity, SmellKind};
use crate::utils::blocks_are_similar;
use ruff_python_ast::visitor::{self, Visitor};
use ruff_python_ast::{Expr, Stmt};
use ruff_text_size::{Ranged, TextSize};

/// Functions with this many assignments, calls and returns or fewer are
/// too small to compare.
const MIN_STATEMENTS: usize = 5;

struct FunctionSpan {
    name: String,
    location: TextSize,
    body_start: usize,
    body_end: usize,
    size: usize,
}

/// Counts `Assign`, `Call` and `Return` nodes below a function.
#[derive(Default)]
struct SizeCounter {
    count: usize,
}

impl<'a> Visitor<'a> for SizeCounter {
    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        if matches!(stmt, Stmt::Assign(_) | Stmt::Return(_)) {
            self.count += 1;
        }
        visitor::walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'a Expr) {
        if matches!(expr, Expr::Call(_)) {
            self.count += 1;
        }
        visitor::walk_expr(self, expr);
    }
}

/// Pairwise comparison of every function body in the module, reported
/// once per similar pair at the first function.
pub(super) struct DuplicateFunctionRule {
    functions: Vec<FunctionSpan>,
}

impl DuplicateFunctionRule {
    pub(super) fn new() -> Self {
        Self {
            functions: Vec::new(),
        }
    }
}

impl Rule for DuplicateFunctionRule {
    fn name(&self) -> &'static str {
        "DuplicateFunctionRule"
    }
    fn kind(&self) -> SmellKind {
        SmellKind::DuplicateCode
    }
    fn enter_stmt(&mut self, stmt: &Stmt, _context: &Context<'_>) -> Option<Vec<Finding>> {
        let Stmt::FunctionDef(f) = stmt else {
            return None;
        };
        let (Some(first), Some(last)) = (f.body.first(), f.body.last()) else {
            return None;
        };
        let mut counter = SizeCounter::default();
        for s in &f.body {
            counter.visit_stmt(s);
        }
        self.functions.push(FunctionSpan {
            name: f.name.to_string(),
            location: f.name.range().start(),
            body_start: first.range().start().to_usize(),
            body_end: last.range().end().to_usize(),
            size: counter.count,
        });
        None
    }
    fn finish(&mut self, context: &Context<'_>) -> Option<Vec<Finding>> {
        let body = |f: &FunctionSpan| context.source.get(f.body_start..f.body_end).unwrap_or("");
        let candidates: Vec<&FunctionSpan> = self
            .functions
            .iter()
            .filter(|f| f.size > MIN_STATEMENTS)
            .collect();
        let mut findings = Vec::new();
        for (i, &first) in candidates.iter().enumerate() {
            for &second in &candidates[i + 1..] {
                if !blocks_are_similar(body(first), body(second)) {
                    continue;
                }
                findings.push(create_finding(
                    self.kind(),
                    Severity::Medium,
                    format!(
                        "Functions '{}' and '{}' appear to be similar",
                        first.name, second.name
                    ),
                    context,
                    first.location,
                    "Consider extracting common functionality into a shared function",
                ));
            }
        }
        self.functions.clear();
        (!findings.is_empty()).then_some(findings)
    }
}
