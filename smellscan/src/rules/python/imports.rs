use super::finding::create_finding;
use crate::rules::{Context, Finding, Severity, SmellKind};
use ruff_python_ast::visitor::{self, Visitor};
use ruff_python_ast::{Expr, Stmt};
use ruff_text_size::{Ranged, TextSize};
use rustc_hash::FxHashSet;

struct ImportedName<'a> {
    /// Name as written in the import statement.
    written: &'a str,
    /// Name the import binds in the module namespace.
    bound: &'a str,
    location: TextSize,
}

/// Collects every import, at any depth, and every bare name reference.
#[derive(Default)]
struct ImportCollector<'a> {
    imports: Vec<ImportedName<'a>>,
    used: FxHashSet<&'a str>,
}

impl<'a> Visitor<'a> for ImportCollector<'a> {
    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            Stmt::Import(node) => {
                for alias in &node.names {
                    let written = alias.name.as_str();
                    let bound = match &alias.asname {
                        Some(asname) => asname.as_str(),
                        None => written.split('.').next().unwrap_or(written),
                    };
                    self.imports.push(ImportedName {
                        written,
                        bound,
                        location: node.range().start(),
                    });
                }
            }
            Stmt::ImportFrom(node) => {
                if node.module.as_ref().is_some_and(|m| m.as_str() == "__future__") {
                    return;
                }
                for alias in &node.names {
                    let written = alias.name.as_str();
                    let bound = alias.asname.as_ref().map_or(written, |a| a.as_str());
                    self.imports.push(ImportedName {
                        written,
                        bound,
                        location: node.range().start(),
                    });
                }
            }
            _ => {}
        }
        visitor::walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'a Expr) {
        if let Expr::Name(name) = expr {
            self.used.insert(name.id.as_str());
        }
        visitor::walk_expr(self, expr);
    }
}

/// Imports whose bound name never appears as an identifier. Star imports
/// and names starting with `_` are exempt.
pub(super) fn unused_imports(body: &[Stmt], context: &Context<'_>) -> Vec<Finding> {
    let mut collector = ImportCollector::default();
    for stmt in body {
        collector.visit_stmt(stmt);
    }
    collector
        .imports
        .iter()
        .filter(|import| {
            import.bound != "*"
                && !import.bound.starts_with('_')
                && !collector.used.contains(import.bound)
        })
        .map(|import| {
            create_finding(
                SmellKind::UnusedImport,
                Severity::Low,
                format!("Unused import '{}'", import.written),
                context,
                import.location,
                "Remove unused imports to clean up the code",
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruff_python_parser::parse_module;

    fn unused(src: &str) -> Vec<String> {
        let module = parse_module(src).unwrap().into_syntax();
        unused_imports(&module.body, &Context::new(src))
            .into_iter()
            .map(|f| f.message)
            .collect()
    }

    #[test]
    fn test_dotted_import_binds_first_segment() {
        assert!(unused("import os.path\nprint(os.path.join('a'))\n").is_empty());
        assert_eq!(unused("import os.path\n"), vec!["Unused import 'os.path'"]);
    }

    #[test]
    fn test_alias_and_from_imports() {
        let src = "import numpy as np\nfrom typing import List, Dict\nfrom x import *\nx: List[int] = []\n";
        assert_eq!(
            unused(src),
            vec!["Unused import 'numpy'", "Unused import 'Dict'"]
        );
    }

    #[test]
    fn test_private_and_future_imports_are_exempt() {
        assert!(unused("from __future__ import annotations\nimport _thread\n").is_empty());
    }

    #[test]
    fn test_use_inside_function_counts() {
        assert!(unused("import json\ndef f():\n    return json.dumps({})\n").is_empty());
    }
}
