//! Weighted regex cues for six well-known design patterns.
//!
//! Each indicator adds the weight of every cue it finds and saturates at 1.0.

use super::metrics::{get_py_decorator_re, Flavor};
use crate::constants::lazy_regex;
use regex::Regex;
use serde::Serialize;

lazy_regex!(get_private_ctor_re, r"private\s+\w+\s*\(\s*\)");
lazy_regex!(get_static_instance_re, r"(?i)private\s+static\s+\w+\s+instance");
lazy_regex!(get_get_instance_re, r"(?:public\s+)?static\s+\w+\s+getInstance");
lazy_regex!(get_dunder_new_re, r"def\s+__new__\s*\(");
lazy_regex!(get_instance_none_re, r"_instance\s*=\s*None");
lazy_regex!(get_py_get_instance_re, r"(?i)def\s+get_instance\s*\(");
lazy_regex!(get_metaclass_re, r"class\s+\w+\s*\(.*metaclass");

lazy_regex!(get_factory_word_re, r"\bFactory\b");
lazy_regex!(get_creation_call_re, r"\b(?:create|make|build)\w*\s*\(");
lazy_regex!(get_return_new_re, r"return\s+new\s+\w+\s*\(");
lazy_regex!(get_case_label_re, r#"case\s+["']?\w+["']?\s*:"#);

lazy_regex!(get_builder_word_re, r"\bBuilder\b");
lazy_regex!(get_build_call_re, r"\bbuild\s*\(\s*\)");
lazy_regex!(get_return_this_re, r"return\s+this\s*;");
lazy_regex!(get_return_self_re, r"return\s+self\b");
lazy_regex!(
    get_c_chain_setter_re,
    r"\b(?:with|set)\w+\s*\([^)]*\)\s*\{[^}]*return\s+this"
);
lazy_regex!(
    get_py_chain_setter_re,
    r"(?s)def\s+(?:with_|set_)\w+\s*\([^)]*\).*?return\s+self"
);

lazy_regex!(get_observer_word_re, r"\b(?:Observer|Listener|Subscriber)\b");
lazy_regex!(
    get_observer_registration_re,
    r"\b(?:add|remove|register|unregister)(?:Observer|Listener)\b"
);
lazy_regex!(get_notify_re, r"\b(?:notify|update|on\w+Changed)\b");
lazy_regex!(get_observer_list_re, r"List<.*?(?:Observer|Listener)>");

lazy_regex!(get_strategy_word_re, r"\bStrategy\b");
lazy_regex!(
    /// An interface body holding a bodiless method declaration.
    get_single_method_interface_re,
    r"interface\s+\w+\s*\{[^}]*\w+\s+\w+\s*\([^)]*\)\s*;[^}]*\}"
);
lazy_regex!(get_set_strategy_re, r"\bset\w*Strategy\b");

lazy_regex!(get_decorator_word_re, r"\bDecorator\b");
lazy_regex!(get_py_wrapping_init_re, r"def\s+__init__\s*\(\s*self\s*,\s*\w+\s*\)");
lazy_regex!(get_py_delegate_re, r"self\._\w+\s*=\s*\w+");
lazy_regex!(get_c_wrapping_ctor_re, r"public\s+\w+\s*\(\s*\w+\s+\w+\s*\)");
lazy_regex!(get_c_delegate_re, r"this\.\w+\s*=\s*\w+\s*;");
lazy_regex!(get_implements_name_re, r"implements\s+\w+");
lazy_regex!(get_private_field_re, r"private\s+\w+\s+\w+\s*;");

/// Score in `[0, 1]` per recognised pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct PatternIndicators {
    pub singleton: f64,
    pub factory: f64,
    pub builder: f64,
    pub observer: f64,
    pub strategy: f64,
    pub decorator: f64,
}

/// Sums the weights of the cues that match.
fn weigh(content: &str, cues: &[(&Regex, f64)]) -> f64 {
    cues.iter()
        .filter(|(re, _)| re.is_match(content))
        .map(|(_, weight)| weight)
        .sum()
}

fn cap(score: f64) -> f64 {
    score.min(1.0)
}

impl PatternIndicators {
    /// Scores `content` with the cues of `flavor`.
    #[must_use]
    pub fn detect(content: &str, flavor: Flavor) -> Self {
        Self {
            singleton: singleton(content, flavor),
            factory: factory(content),
            builder: builder(content, flavor),
            observer: observer(content),
            strategy: strategy(content),
            decorator: decorator(content, flavor),
        }
    }
}

fn singleton(content: &str, flavor: Flavor) -> f64 {
    let score = match flavor {
        Flavor::Python => weigh(
            content,
            &[
                (get_dunder_new_re(), 0.3),
                (get_instance_none_re(), 0.3),
                (get_py_get_instance_re(), 0.4),
                (get_metaclass_re(), 0.3),
            ],
        ),
        Flavor::CStyle => weigh(
            content,
            &[
                (get_private_ctor_re(), 0.3),
                (get_static_instance_re(), 0.3),
                (get_get_instance_re(), 0.4),
            ],
        ),
    };
    cap(score)
}

fn factory(content: &str) -> f64 {
    let mut score = weigh(
        content,
        &[
            (get_factory_word_re(), 0.3),
            (get_creation_call_re(), 0.3),
            (get_return_new_re(), 0.2),
        ],
    );
    if get_case_label_re().find_iter(content).count() > 1 {
        score += 0.2;
    }
    cap(score)
}

fn builder(content: &str, flavor: Flavor) -> f64 {
    let (chain, setter) = match flavor {
        Flavor::Python => (get_return_self_re(), get_py_chain_setter_re()),
        Flavor::CStyle => (get_return_this_re(), get_c_chain_setter_re()),
    };
    let mut score = weigh(
        content,
        &[
            (get_builder_word_re(), 0.3),
            (get_build_call_re(), 0.3),
            (chain, 0.2),
        ],
    );
    if setter.find_iter(content).count() > 2 {
        score += 0.2;
    }
    cap(score)
}

fn observer(content: &str) -> f64 {
    cap(weigh(
        content,
        &[
            (get_observer_word_re(), 0.3),
            (get_observer_registration_re(), 0.3),
            (get_notify_re(), 0.2),
            (get_observer_list_re(), 0.2),
        ],
    ))
}

fn strategy(content: &str) -> f64 {
    cap(weigh(
        content,
        &[
            (get_strategy_word_re(), 0.4),
            (get_single_method_interface_re(), 0.3),
            (get_set_strategy_re(), 0.3),
        ],
    ))
}

#[allow(clippy::cast_precision_loss)]
fn decorator(content: &str, flavor: Flavor) -> f64 {
    let mut score = weigh(content, &[(get_decorator_word_re(), 0.4)]);
    match flavor {
        Flavor::Python => {
            let decorators = get_py_decorator_re().find_iter(content).count();
            score += (decorators as f64 * 0.1).min(0.3);
            score += weigh(
                content,
                &[(get_py_wrapping_init_re(), 0.2), (get_py_delegate_re(), 0.2)],
            );
        }
        Flavor::CStyle => {
            score += weigh(
                content,
                &[(get_c_wrapping_ctor_re(), 0.2), (get_c_delegate_re(), 0.2)],
            );
            if get_implements_name_re().is_match(content)
                && get_private_field_re().is_match(content)
            {
                score += 0.2;
            }
        }
    }
    cap(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAVA_SINGLETON: &str = "public class Config {\n    private static Config instance;\n    private Config() {}\n    public static Config getInstance() {\n        if (instance == null) {\n            instance = new Config();\n        }\n        return instance;\n    }\n}\n";

    #[test]
    fn test_java_singleton_saturates() {
        let ind = PatternIndicators::detect(JAVA_SINGLETON, Flavor::CStyle);
        assert!((ind.singleton - 1.0).abs() < 1e-9);
        assert!(ind.builder < 0.3);
    }

    #[test]
    fn test_python_singleton() {
        let src = "class Registry:\n    _instance = None\n\n    def __new__(cls):\n        return super().__new__(cls)\n";
        let ind = PatternIndicators::detect(src, Flavor::Python);
        assert!((ind.singleton - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_builder_chain() {
        let src = "class PizzaBuilder {\n    PizzaBuilder withCheese(int n) { this.c = n; return this; }\n    PizzaBuilder withHam(int n) { this.h = n; return this; }\n    PizzaBuilder setSize(int n) { this.s = n; return this; }\n    Pizza build() { return new Pizza(c, h, s); }\n}\n";
        let ind = PatternIndicators::detect(src, Flavor::CStyle);
        assert!((ind.builder - 0.7).abs() < 1e-9, "{}", ind.builder);
        assert!(ind.factory > 0.45);
    }

    #[test]
    fn test_observer_and_strategy_words() {
        let ind = PatternIndicators::detect(
            "interface Listener { void onEvent(Event e); }\nvoid addListener(Listener l) {}\nvoid notify() {}\n",
            Flavor::CStyle,
        );
        assert!((ind.observer - 0.8).abs() < 1e-9);
        assert!((ind.strategy - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_plain_code_scores_zero() {
        let ind = PatternIndicators::detect("x = 1\nprint(x)\n", Flavor::Python);
        assert_eq!(ind, PatternIndicators::default());
    }
}
