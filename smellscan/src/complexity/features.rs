//! Line-oriented feature extraction for the complexity classifier.
//!
//! Every check is a lowercase substring test on one trimmed line, so the
//! extractor works for any language and is deliberately imprecise.

use serde::{Deserialize, Serialize};

/// Feature column names, in vector order.
pub const FEATURE_NAMES: [&str; 9] = [
    "no_of_ifs",
    "no_of_loop",
    "no_of_break",
    "priority_queue_present",
    "no_of_sort",
    "hash_set_present",
    "hash_map_present",
    "recursion_present",
    "nested_loop_depth",
];

const LOOP_MARKERS: [&str; 3] = ["for ", "while ", "do "];

/// The nine surface features of one file. Flags are 0 or 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityFeatures {
    /// Lines containing `if ` or `if(`.
    pub no_of_ifs: u32,
    /// Lines containing `for `, `while ` or `do `.
    pub no_of_loop: u32,
    /// Lines containing `break`.
    pub no_of_break: u32,
    /// A priority queue is mentioned.
    pub priority_queue_present: u32,
    /// Lines mentioning `sort`.
    pub no_of_sort: u32,
    /// A set is mentioned.
    pub hash_set_present: u32,
    /// A map is mentioned.
    pub hash_map_present: u32,
    /// A `return` line also accesses `self.` or `this.`.
    pub recursion_present: u32,
    /// Deepest loop nesting seen by the brace counter.
    pub nested_loop_depth: u32,
}

impl ComplexityFeatures {
    /// Extracts the features from source text.
    #[must_use]
    pub fn extract(content: &str) -> Self {
        let mut features = Self::default();
        for line in content.split('\n') {
            let lower = line.trim().to_lowercase();
            if lower.contains("if ") || lower.contains("if(") {
                features.no_of_ifs += 1;
            }
            if is_loop_line(&lower) {
                features.no_of_loop += 1;
            }
            if lower.contains("break") {
                features.no_of_break += 1;
            }
            if lower.contains("priorityqueue") || lower.contains("priority_queue") {
                features.priority_queue_present = 1;
            }
            if lower.contains("sort") {
                features.no_of_sort += 1;
            }
            if lower.contains("set") {
                features.hash_set_present = 1;
            }
            if lower.contains("map") {
                features.hash_map_present = 1;
            }
            if lower.contains("return") && (lower.contains("self.") || lower.contains("this.")) {
                features.recursion_present = 1;
            }
        }
        features.nested_loop_depth = loop_depth(content);
        features
    }

    /// Features in [`FEATURE_NAMES`] order.
    #[must_use]
    pub fn to_vector(&self) -> Vec<f64> {
        [
            self.no_of_ifs,
            self.no_of_loop,
            self.no_of_break,
            self.priority_queue_present,
            self.no_of_sort,
            self.hash_set_present,
            self.hash_map_present,
            self.recursion_present,
            self.nested_loop_depth,
        ]
        .iter()
        .map(|&v| f64::from(v))
        .collect()
    }
}

fn is_loop_line(line: &str) -> bool {
    LOOP_MARKERS.iter().any(|marker| line.contains(marker))
}

/// Loop keywords open a level; a line starting with `}` or `end` closes one.
/// Case-sensitive, unlike the counters above.
fn loop_depth(content: &str) -> u32 {
    let mut max_depth = 0;
    let mut depth: u32 = 0;
    for line in content.split('\n') {
        let stripped = line.trim();
        if is_loop_line(stripped) {
            depth += 1;
            max_depth = max_depth.max(depth);
        } else if stripped.starts_with('}') || stripped.starts_with("end") {
            depth = depth.saturating_sub(1);
        }
    }
    max_depth
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_has_zero_features() {
        assert_eq!(ComplexityFeatures::extract(""), ComplexityFeatures::default());
    }

    #[test]
    fn test_nested_loops_in_braces() {
        let src = "for (int i = 0; i < n; i++) {\n  for (int j = 0; j < n; j++) {\n    if (a[i] > a[j]) break;\n  }\n}\n";
        let features = ComplexityFeatures::extract(src);
        assert_eq!(features.no_of_loop, 2);
        assert_eq!(features.nested_loop_depth, 2);
        assert_eq!(features.no_of_ifs, 1);
        assert_eq!(features.no_of_break, 1);
    }

    #[test]
    fn test_flags_are_binary() {
        let src = "s = set()\nt = set()\nm = map(f, xs)\nxs.sort()\nys = sorted(xs)\n";
        let features = ComplexityFeatures::extract(src);
        assert_eq!(features.hash_set_present, 1);
        assert_eq!(features.hash_map_present, 1);
        assert_eq!(features.no_of_sort, 2);
    }

    #[test]
    fn test_recursion_needs_member_access_on_return() {
        assert_eq!(ComplexityFeatures::extract("return self.walk(n - 1)").recursion_present, 1);
        assert_eq!(ComplexityFeatures::extract("return walk(n - 1)").recursion_present, 0);
    }

    #[test]
    fn test_python_loops_never_close() {
        let src = "for a in xs:\n    pass\nfor b in ys:\n    pass\n";
        assert_eq!(ComplexityFeatures::extract(src).nested_loop_depth, 2);
    }

    #[test]
    fn test_vector_order() {
        let features = ComplexityFeatures {
            no_of_ifs: 1,
            nested_loop_depth: 9,
            ..ComplexityFeatures::default()
        };
        let vector = features.to_vector();
        assert_eq!(vector.len(), FEATURE_NAMES.len());
        assert!((vector[0] - 1.0).abs() < f64::EPSILON);
        assert!((vector[8] - 9.0).abs() < f64::EPSILON);
    }
}
