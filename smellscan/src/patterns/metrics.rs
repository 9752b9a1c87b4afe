//! CK-style class metrics approximated with regular expressions.

use crate::constants::lazy_regex;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Column names of the metric vector, as they appear in training datasets.
pub const FEATURE_NAMES: [&str; 31] = [
    "loc",
    "totalMethodsQty",
    "totalFieldsQty",
    "publicMethodsQty",
    "privateMethodsQty",
    "protectedMethodsQty",
    "staticMethodsQty",
    "abstractMethodsQty",
    "finalMethodsQty",
    "publicFieldsQty",
    "privateFieldsQty",
    "staticFieldsQty",
    "finalFieldsQty",
    "loopQty",
    "comparisonsQty",
    "tryCatchQty",
    "noc",
    "dit",
    "lambdasQty",
    "decoratorCount",
    "wmc",
    "cbo",
    "rfc",
    "lcom",
    "returnQty",
    "maxNestedBlocksQty",
    "innerClassesQty",
    "anonymousClassesQty",
    "interfaceCount",
    "abstractClassCount",
    "implementsCount",
];

/// Upper bound of the coupling estimate.
const MAX_COUPLING: usize = 50;
/// Upper bound of the inheritance depth estimate.
const MAX_DIT: usize = 5;

/// Which family of regexes applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// Indentation and `def`/`self` conventions.
    Python,
    /// Java-like braces, modifiers and `new`.
    CStyle,
}

/// Class-level metrics of one source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct PatternMetrics {
    pub loc: usize,
    pub total_methods: usize,
    pub total_fields: usize,
    pub public_methods: usize,
    pub private_methods: usize,
    pub protected_methods: usize,
    pub static_methods: usize,
    pub abstract_methods: usize,
    pub final_methods: usize,
    pub public_fields: usize,
    pub private_fields: usize,
    pub static_fields: usize,
    pub final_fields: usize,
    pub loops: usize,
    pub comparisons: usize,
    pub try_catch: usize,
    /// Number of subclass declarations.
    pub noc: usize,
    /// Depth of inheritance, estimated.
    pub dit: usize,
    pub lambdas: usize,
    pub decorators: usize,
    /// Weighted methods per class; every method weighs one.
    pub wmc: usize,
    /// Coupling between objects.
    pub cbo: usize,
    /// Response for class.
    pub rfc: usize,
    /// Lack of cohesion in methods.
    pub lcom: usize,
    pub returns: usize,
    pub max_nested_blocks: usize,
    pub inner_classes: usize,
    pub anonymous_classes: usize,
    pub interfaces: usize,
    pub abstract_classes: usize,
    pub implements: usize,
}

lazy_regex!(get_py_def_re, r"(?m)^\s*def\s+(\w+)\s*\(");
lazy_regex!(get_py_self_field_re, r"self\.(\w+)\s*=");
lazy_regex!(get_py_module_assign_re, r"(?m)^\s*\w+\s*=\s*[^=]");
lazy_regex!(get_py_loop_re, r"\b(?:for|while)\s+");
lazy_regex!(get_py_if_re, r"\bif\s+");
lazy_regex!(get_py_try_re, r"\btry\s*:");
lazy_regex!(get_py_subclass_re, r"class\s+\w+\s*\([^)]+\)");
lazy_regex!(get_py_lambda_re, r"\blambda\s+");
lazy_regex!(
    /// A decorator at the start of a line.
    get_py_decorator_re,
    r"(?m)^@\w+"
);
lazy_regex!(get_py_import_re, r"(?m)^\s*(?:import|from)\s+");
lazy_regex!(get_py_call_type_re, r"\b([A-Z][a-zA-Z0-9]*)\s*\(");
lazy_regex!(get_py_class_re, r"(?m)^\s*class\s+\w+");
lazy_regex!(get_py_interface_re, r"class\s+\w+\s*\(\s*ABC\s*\)");
lazy_regex!(
    get_py_abstract_class_re,
    r"@abstractmethod|class\s+\w+\s*\([^)]*ABC[^)]*\)"
);

lazy_regex!(
    get_c_method_re,
    r"\b(?:public|private|protected)?\s*(?:static)?\s*\w+\s+\w+\s*\([^)]*\)\s*\{"
);
lazy_regex!(
    get_c_field_re,
    r"\b(?:public|private|protected)?\s*(?:static)?\s*(?:final)?\s*\w+\s+\w+\s*[;=]"
);
lazy_regex!(
    /// Modifier followed by a return type and a method name.
    get_c_modified_method_re,
    r"\b(public|private|protected|static|abstract|final)\s+\w+\s+\w+\s*\("
);
lazy_regex!(
    /// Modifier followed by a type (captured) and a field name.
    get_c_modified_field_re,
    r"\b(public|private|static|final)\s+(\w+)\s+\w+\s*[;=]"
);
lazy_regex!(get_c_loop_re, r"\b(?:for|while|do)\s*\(");
lazy_regex!(get_c_if_re, r"\bif\s*\(");
lazy_regex!(get_c_try_re, r"\btry\s*\{");
lazy_regex!(get_c_extends_re, r"\bextends\s+\w+");
lazy_regex!(get_c_import_re, r"\bimport\s+");
lazy_regex!(get_c_type_re, r"\b([A-Z][a-zA-Z0-9]*)\b");
lazy_regex!(
    get_c_lcom_method_re,
    r"\b(?:public|private|protected)?\s*\w+\s+(\w+)\s*\([^)]*\)"
);
lazy_regex!(
    get_c_lcom_field_re,
    r"\b(?:public|private|protected)?\s*\w+\s+(\w+)\s*[;=]"
);
lazy_regex!(get_c_inner_class_re, r"(?s)\bclass\s+\w+.*\{[^}]*class\s+\w+");
lazy_regex!(
    /// `new Foo(...) {`, an anonymous subclass.
    get_c_anonymous_class_re,
    r"new\s+\w+\s*\([^)]*\)\s*\{"
);
lazy_regex!(get_c_interface_re, r"\binterface\s+\w+");
lazy_regex!(get_c_abstract_class_re, r"\babstract\s+class\s+\w+");
lazy_regex!(get_c_implements_re, r"\bimplements\s+");
lazy_regex!(get_return_re, r"\breturn\b");

fn count(re: &regex::Regex, content: &str) -> usize {
    re.find_iter(content).count()
}

fn distinct_captures<'a>(re: &regex::Regex, content: &'a str) -> FxHashSet<&'a str> {
    re.captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Deepest `{` nesting, counted character by character.
fn max_brace_depth(content: &str) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    for ch in content.chars() {
        match ch {
            '{' => {
                depth += 1;
                max = max.max(depth);
            }
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

fn lcom(methods: usize, fields: usize) -> usize {
    if methods <= 1 {
        0
    } else {
        methods.saturating_sub(fields * 2)
    }
}

impl PatternMetrics {
    /// Measures `content` with the regexes of `flavor`.
    #[must_use]
    pub fn extract(content: &str, flavor: Flavor) -> Self {
        let mut m = match flavor {
            Flavor::Python => Self::python(content),
            Flavor::CStyle => Self::c_style(content),
        };
        m.loc = content.split('\n').count();
        m.wmc = m.total_methods;
        m.rfc = m.total_methods + m.cbo;
        m.returns = count(get_return_re(), content);
        m.max_nested_blocks = max_brace_depth(content);
        m
    }

    fn python(content: &str) -> Self {
        let methods: Vec<&str> = get_py_def_re()
            .captures_iter(content)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect();
        let fields = distinct_captures(get_py_self_field_re(), content);
        let noc = count(get_py_subclass_re(), content);
        let imports = count(get_py_import_re(), content);
        let type_refs = distinct_captures(get_py_call_type_re(), content).len();
        Self {
            total_methods: methods.len(),
            total_fields: fields.len(),
            public_methods: methods.iter().filter(|m| !m.starts_with('_')).count(),
            private_methods: methods
                .iter()
                .filter(|m| m.starts_with("__") && !m.ends_with("__"))
                .count(),
            protected_methods: methods
                .iter()
                .filter(|m| m.starts_with('_') && !m.starts_with("__"))
                .count(),
            static_methods: content.matches("@staticmethod").count(),
            abstract_methods: content.matches("@abstractmethod").count(),
            public_fields: fields.iter().filter(|f| !f.starts_with('_')).count(),
            private_fields: fields.iter().filter(|f| f.starts_with("__")).count(),
            static_fields: count(get_py_module_assign_re(), content) / 2,
            loops: count(get_py_loop_re(), content),
            comparisons: count(get_py_if_re(), content),
            try_catch: count(get_py_try_re(), content),
            noc,
            dit: usize::from(noc > 0),
            lambdas: count(get_py_lambda_re(), content),
            decorators: count(get_py_decorator_re(), content),
            cbo: (imports + type_refs / 5).min(MAX_COUPLING),
            lcom: lcom(methods.len(), fields.len()),
            inner_classes: count(get_py_class_re(), content).saturating_sub(1),
            interfaces: count(get_py_interface_re(), content),
            abstract_classes: count(get_py_abstract_class_re(), content),
            implements: noc,
            ..Self::default()
        }
    }

    fn c_style(content: &str) -> Self {
        let mut m = Self {
            total_methods: count(get_c_method_re(), content),
            total_fields: count(get_c_field_re(), content),
            ..Self::default()
        };
        for caps in get_c_modified_method_re().captures_iter(content) {
            match caps.get(1).map_or("", |g| g.as_str()) {
                "public" => m.public_methods += 1,
                "private" => m.private_methods += 1,
                "protected" => m.protected_methods += 1,
                "static" => m.static_methods += 1,
                "abstract" => m.abstract_methods += 1,
                _ => m.final_methods += 1,
            }
        }
        for caps in get_c_modified_field_re().captures_iter(content) {
            let type_word = caps.get(2).map_or("", |g| g.as_str());
            if ["class", "interface", "enum"]
                .iter()
                .any(|kw| type_word.starts_with(kw))
            {
                continue;
            }
            match caps.get(1).map_or("", |g| g.as_str()) {
                "public" => m.public_fields += 1,
                "private" => m.private_fields += 1,
                "static" => m.static_fields += 1,
                _ => m.final_fields += 1,
            }
        }
        m.loops = count(get_c_loop_re(), content);
        m.comparisons = count(get_c_if_re(), content);
        m.try_catch = count(get_c_try_re(), content);
        m.noc = count(get_c_extends_re(), content);
        m.dit = (m.noc + 1).min(MAX_DIT);
        m.lambdas = content.matches("->").count();
        let type_refs = distinct_captures(get_c_type_re(), content).len();
        m.cbo = (count(get_c_import_re(), content) + type_refs / 5).min(MAX_COUPLING);
        m.lcom = lcom(
            count(get_c_lcom_method_re(), content),
            count(get_c_lcom_field_re(), content),
        );
        m.inner_classes = count(get_c_inner_class_re(), content);
        m.anonymous_classes = count(get_c_anonymous_class_re(), content);
        m.interfaces = count(get_c_interface_re(), content);
        m.abstract_classes = count(get_c_abstract_class_re(), content);
        m.implements = count(get_c_implements_re(), content);
        m
    }

    /// Values in [`FEATURE_NAMES`] order.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_vector(&self) -> Vec<f64> {
        [
            self.loc,
            self.total_methods,
            self.total_fields,
            self.public_methods,
            self.private_methods,
            self.protected_methods,
            self.static_methods,
            self.abstract_methods,
            self.final_methods,
            self.public_fields,
            self.private_fields,
            self.static_fields,
            self.final_fields,
            self.loops,
            self.comparisons,
            self.try_catch,
            self.noc,
            self.dit,
            self.lambdas,
            self.decorators,
            self.wmc,
            self.cbo,
            self.rfc,
            self.lcom,
            self.returns,
            self.max_nested_blocks,
            self.inner_classes,
            self.anonymous_classes,
            self.interfaces,
            self.abstract_classes,
            self.implements,
        ]
        .iter()
        .map(|&v| v as f64)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_metrics() {
        let src = "import os\n\nclass Cache(Base):\n    def __init__(self):\n        self.items = {}\n        self._hits = 0\n\n    def get(self, key):\n        if key in self.items:\n            return self.items[key]\n        return None\n\n    def _evict(self):\n        for k in list(self.items):\n            pass\n";
        let m = PatternMetrics::extract(src, Flavor::Python);
        assert_eq!(m.total_methods, 3);
        assert_eq!(m.public_methods, 1);
        assert_eq!(m.protected_methods, 1);
        assert_eq!(m.total_fields, 2);
        assert_eq!(m.public_fields, 1);
        assert_eq!(m.noc, 1);
        assert_eq!(m.dit, 1);
        assert_eq!(m.loops, 1);
        assert_eq!(m.comparisons, 1);
        assert_eq!(m.returns, 2);
        assert_eq!(m.lcom, 0);
        assert_eq!(m.wmc, 3);
    }

    #[test]
    fn test_java_metrics() {
        let src = "import java.util.List;\n\npublic class Shop extends Base implements Store {\n    private int count;\n    public static final int LIMIT = 3;\n\n    public int total(int a) {\n        if (a > 0) {\n            for (int i = 0; i < a; i++) { count++; }\n        }\n        return count;\n    }\n\n    private void reset() {\n        count = 0;\n    }\n}\n";
        let m = PatternMetrics::extract(src, Flavor::CStyle);
        assert_eq!(m.public_methods, 1);
        assert_eq!(m.private_methods, 1);
        assert_eq!(m.private_fields, 1);
        assert_eq!(m.loops, 1);
        assert_eq!(m.comparisons, 1);
        assert_eq!(m.noc, 1);
        assert_eq!(m.dit, 2);
        assert_eq!(m.implements, 1);
        assert_eq!(m.max_nested_blocks, 4);
        assert_eq!(m.rfc, m.total_methods + m.cbo);
    }

    #[test]
    fn test_class_keyword_is_not_a_field() {
        let m = PatternMetrics::extract("public class A;\nprivate classic b;\n", Flavor::CStyle);
        assert_eq!(m.public_fields, 0);
        assert_eq!(m.private_fields, 0);
    }

    #[test]
    fn test_vector_matches_names() {
        let m = PatternMetrics::extract("def f():\n    return 1\n", Flavor::Python);
        let v = m.to_vector();
        assert_eq!(v.len(), FEATURE_NAMES.len());
        assert_eq!(v[0], 3.0);
        assert_eq!(v[1], 1.0);
    }
}
