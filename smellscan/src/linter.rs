use crate::rules::{Context, Finding, Rule};
use ruff_python_ast::{ExceptHandler, Expr, Stmt};

/// Visitor for traversing the AST and applying linter rules.
pub struct LinterVisitor<'c, 'src> {
    rules: Vec<Box<dyn Rule>>,
    context: &'c Context<'src>,
    /// List of findings collected during the traversal.
    pub findings: Vec<Finding>,
}

impl<'c, 'src> LinterVisitor<'c, 'src> {
    /// Creates a new `LinterVisitor` with the given rules and context.
    #[must_use]
    pub fn new(rules: Vec<Box<dyn Rule>>, context: &'c Context<'src>) -> Self {
        Self {
            rules,
            context,
            findings: Vec::new(),
        }
    }

    /// Visits a statement node and applies rules.
    pub fn visit_stmt(&mut self, stmt: &Stmt) {
        for rule in &mut self.rules {
            if let Some(mut findings) = rule.enter_stmt(stmt, self.context) {
                self.findings.append(&mut findings);
            }
        }

        match stmt {
            Stmt::FunctionDef(node) => self.visit_body(&node.body),
            Stmt::ClassDef(node) => self.visit_body(&node.body),
            Stmt::If(node) => {
                self.visit_expr(&node.test);
                self.visit_body(&node.body);
                for clause in &node.elif_else_clauses {
                    if let Some(test) = &clause.test {
                        self.visit_expr(test);
                    }
                    self.visit_body(&clause.body);
                }
            }
            Stmt::For(node) => {
                self.visit_expr(&node.iter);
                self.visit_body(&node.body);
                self.visit_body(&node.orelse);
            }
            Stmt::While(node) => {
                self.visit_expr(&node.test);
                self.visit_body(&node.body);
                self.visit_body(&node.orelse);
            }
            Stmt::Try(node) => {
                self.visit_body(&node.body);
                for handler in &node.handlers {
                    match handler {
                        ExceptHandler::ExceptHandler(h) => self.visit_body(&h.body),
                    }
                }
                self.visit_body(&node.orelse);
                self.visit_body(&node.finalbody);
            }
            Stmt::With(node) => {
                for item in &node.items {
                    self.visit_expr(&item.context_expr);
                }
                self.visit_body(&node.body);
            }
            Stmt::Match(node) => {
                self.visit_expr(&node.subject);
                for case in &node.cases {
                    self.visit_body(&case.body);
                }
            }
            Stmt::Expr(node) => self.visit_expr(&node.value),
            Stmt::Assign(node) => self.visit_expr(&node.value),
            Stmt::AnnAssign(node) => {
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
            }
            Stmt::AugAssign(node) => self.visit_expr(&node.value),
            Stmt::Return(node) => {
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
            }
            _ => {}
        }

        for rule in &mut self.rules {
            if let Some(mut findings) = rule.leave_stmt(stmt, self.context) {
                self.findings.append(&mut findings);
            }
        }
    }

    fn visit_body(&mut self, body: &[Stmt]) {
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }

    /// Visits an expression node and applies rules, recursing into
    /// calls, operators, containers and comprehensions.
    pub fn visit_expr(&mut self, expr: &Expr) {
        for rule in &mut self.rules {
            if let Some(mut findings) = rule.visit_expr(expr, self.context) {
                self.findings.append(&mut findings);
            }
        }

        match expr {
            Expr::Call(node) => {
                self.visit_expr(&node.func);
                for arg in &node.arguments.args {
                    self.visit_expr(arg);
                }
                for keyword in &node.arguments.keywords {
                    self.visit_expr(&keyword.value);
                }
            }
            Expr::Attribute(node) => self.visit_expr(&node.value),
            Expr::BinOp(node) => {
                self.visit_expr(&node.left);
                self.visit_expr(&node.right);
            }
            Expr::UnaryOp(node) => self.visit_expr(&node.operand),
            Expr::BoolOp(node) => {
                for value in &node.values {
                    self.visit_expr(value);
                }
            }
            Expr::Compare(node) => {
                self.visit_expr(&node.left);
                for val in &node.comparators {
                    self.visit_expr(val);
                }
            }
            Expr::If(node) => {
                self.visit_expr(&node.test);
                self.visit_expr(&node.body);
                self.visit_expr(&node.orelse);
            }
            Expr::List(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::Tuple(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::Dict(node) => {
                for item in &node.items {
                    if let Some(key) = &item.key {
                        self.visit_expr(key);
                    }
                    self.visit_expr(&item.value);
                }
            }
            Expr::Subscript(node) => {
                self.visit_expr(&node.value);
                self.visit_expr(&node.slice);
            }
            Expr::Await(node) => self.visit_expr(&node.value),
            Expr::Lambda(node) => self.visit_expr(&node.body),
            _ => {}
        }
    }

    /// Lets every rule report module-level findings, then returns everything
    /// collected during the walk.
    #[must_use]
    pub fn finish(mut self) -> Vec<Finding> {
        for rule in &mut self.rules {
            if let Some(mut findings) = rule.finish(self.context) {
                tracing::trace!(rule = rule.name(), count = findings.len(), "rule finished");
                self.findings.append(&mut findings);
            }
        }
        self.findings
    }
}
