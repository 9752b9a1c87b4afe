//! Structural facts: the classes, functions and imports a file declares.
//!
//! Python is read from the ruff AST and Java from regexes. Every other
//! language only gets a "basic structure" record naming the language.

use crate::constants::{
    CLASS_NAME_RE, CONTROL_KEYWORDS, JAVA_FIELD_RE, JAVA_IMPORT_RE, METHOD_DECL_RE,
};
use crate::language::Language;
use ruff_python_ast::visitor::{self, Visitor};
use ruff_python_ast::{Expr, Stmt};
use serde::Serialize;

/// How the facts were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureSource {
    /// Parsed into a syntax tree.
    Ast,
    /// Approximated with regular expressions.
    Regex,
    /// Nothing beyond the language name.
    Basic,
}

/// Declarations found in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuralFacts {
    /// Display name of the language, or `Unknown`.
    pub language: String,
    /// How the facts were obtained.
    pub source: StructureSource,
    /// Class names in source order.
    pub classes: Vec<String>,
    /// Function and method names in source order, at every depth.
    pub functions: Vec<String>,
    /// Imported modules.
    pub imports: Vec<String>,
    /// Module-level variables (Python) or fields (Java).
    pub variables: Vec<String>,
    /// Number of statements (Python only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statements: Option<usize>,
    /// Why the facts are basic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StructuralFacts {
    fn basic(language: &str, message: String) -> Self {
        Self {
            language: language.to_owned(),
            source: StructureSource::Basic,
            classes: Vec::new(),
            functions: Vec::new(),
            imports: Vec::new(),
            variables: Vec::new(),
            statements: None,
            message: Some(message),
        }
    }

    /// Number of functions plus classes.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.functions.len() + self.classes.len()
    }
}

/// Extracts the facts for `content` written in `language`.
#[must_use]
pub fn extract(content: &str, language: Option<Language>, extension: &str) -> StructuralFacts {
    match language {
        Some(Language::Python) => python(content),
        Some(Language::Java) => java(content),
        Some(other) => StructuralFacts::basic(
            other.display_name(),
            format!(
                "Structure extraction is not available for .{extension} files, but smell detection is active"
            ),
        ),
        None => StructuralFacts::basic("Unknown", "Unsupported language".to_owned()),
    }
}

#[derive(Default)]
struct PythonCollector {
    classes: Vec<String>,
    functions: Vec<String>,
    imports: Vec<String>,
    statements: usize,
}

impl<'a> Visitor<'a> for PythonCollector {
    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        self.statements += 1;
        match stmt {
            Stmt::ClassDef(node) => self.classes.push(node.name.to_string()),
            Stmt::FunctionDef(node) => self.functions.push(node.name.to_string()),
            Stmt::Import(node) => {
                self.imports
                    .extend(node.names.iter().map(|alias| alias.name.to_string()));
            }
            Stmt::ImportFrom(node) => {
                let dots = ".".repeat(node.level as usize);
                let module = node.module.as_ref().map_or("", |m| m.as_str());
                self.imports.push(format!("{dots}{module}"));
            }
            _ => {}
        }
        visitor::walk_stmt(self, stmt);
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_owned());
    }
}

fn module_variables(body: &[Stmt]) -> Vec<String> {
    let mut variables = Vec::new();
    for stmt in body {
        match stmt {
            Stmt::Assign(node) => {
                for target in &node.targets {
                    if let Expr::Name(name) = target {
                        push_unique(&mut variables, name.id.as_str());
                    }
                }
            }
            Stmt::AnnAssign(node) => {
                if let Expr::Name(name) = node.target.as_ref() {
                    push_unique(&mut variables, name.id.as_str());
                }
            }
            _ => {}
        }
    }
    variables
}

fn python(content: &str) -> StructuralFacts {
    let module = match ruff_python_parser::parse_module(content) {
        Ok(parsed) => parsed.into_syntax(),
        Err(error) => {
            return StructuralFacts::basic("Python", format!("Syntax error: {error}"));
        }
    };
    let mut collector = PythonCollector::default();
    for stmt in &module.body {
        collector.visit_stmt(stmt);
    }
    StructuralFacts {
        language: "Python".to_owned(),
        source: StructureSource::Ast,
        classes: collector.classes,
        functions: collector.functions,
        imports: collector.imports,
        variables: module_variables(&module.body),
        statements: Some(collector.statements),
        message: None,
    }
}

fn java(content: &str) -> StructuralFacts {
    let classes: Vec<String> = CLASS_NAME_RE()
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_owned()))
        .collect();
    let functions = METHOD_DECL_RE()
        .captures_iter(content)
        .filter_map(|caps| {
            let return_type = caps.get(1)?.as_str();
            let name = caps.get(2)?.as_str();
            let control =
                CONTROL_KEYWORDS().contains(return_type) || CONTROL_KEYWORDS().contains(name);
            let constructor = classes.iter().any(|c| c == name);
            (!control && !constructor).then(|| name.to_owned())
        })
        .collect();
    let variables = JAVA_FIELD_RE()
        .captures_iter(content)
        .filter_map(|caps| {
            let type_word = caps.get(1)?.as_str();
            if CONTROL_KEYWORDS().contains(type_word) {
                return None;
            }
            caps.get(2).map(|m| m.as_str().to_owned())
        })
        .collect();
    let imports = JAVA_IMPORT_RE()
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_owned()))
        .collect();
    StructuralFacts {
        language: "Java".to_owned(),
        source: StructureSource::Regex,
        classes,
        functions,
        imports,
        variables,
        statements: None,
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_structure() {
        let src = "import os.path\nfrom collections import deque\nfrom . import sibling\n\nLIMIT = 3\nname: str = 'x'\n\nclass A:\n    def m(self):\n        def inner():\n            pass\n\ndef f():\n    local = 1\n";
        let facts = extract(src, Some(Language::Python), "py");
        assert_eq!(facts.source, StructureSource::Ast);
        assert_eq!(facts.classes, vec!["A"]);
        assert_eq!(facts.functions, vec!["m", "inner", "f"]);
        assert_eq!(facts.imports, vec!["os.path", "collections", "."]);
        assert_eq!(facts.variables, vec!["LIMIT", "name"]);
        assert_eq!(facts.element_count(), 4);
    }

    #[test]
    fn test_python_syntax_error_is_basic() {
        let facts = extract("def broken(:\n", Some(Language::Python), "py");
        assert_eq!(facts.source, StructureSource::Basic);
        assert!(facts.message.unwrap().starts_with("Syntax error"));
    }

    #[test]
    fn test_java_structure() {
        let src = "import java.util.List;\n\npublic class Shop {\n    private int count;\n    private final String name = \"x\";\n\n    public Shop() {\n    }\n\n    public int total(int a) {\n        if (a > 0) {\n            return a;\n        }\n        return 0;\n    }\n}\n";
        let facts = extract(src, Some(Language::Java), "java");
        assert_eq!(facts.classes, vec!["Shop"]);
        assert_eq!(facts.functions, vec!["total"]);
        assert_eq!(facts.variables, vec!["count", "name"]);
        assert_eq!(facts.imports, vec!["java.util.List"]);
    }

    #[test]
    fn test_other_languages_are_basic() {
        let facts = extract("int main() {}", Some(Language::Cpp), "cpp");
        assert_eq!(facts.language, "C++");
        assert_eq!(facts.source, StructureSource::Basic);
        let unknown = extract("puts 1", None, "rb");
        assert_eq!(unknown.language, "Unknown");
        assert_eq!(unknown.message.as_deref(), Some("Unsupported language"));
    }
}
