//! Design pattern category guess.
//!
//! A file is measured with CK-style regex metrics and scored against six
//! pattern indicators. The indicators are blended into Creational,
//! Structural and Behavioral probabilities, unless a trained model over the
//! metric vector is available, in which case the model decides the category
//! and the indicators still name the concrete patterns.

mod indicators;
mod metrics;

use crate::error::{AnalysisError, Result};
use crate::language::Language;
use crate::ml::dataset::Dataset;
use crate::ml::TrainedModel;
pub use indicators::PatternIndicators;
pub use metrics::{Flavor, PatternMetrics, FEATURE_NAMES};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Label column of a pattern dataset.
pub const LABEL_COLUMN: &str = "category";

/// Indicator score above which a concrete pattern is reported.
pub const DETECTION_THRESHOLD: f64 = 0.3;

const CREATIONAL: &[&str] = &["abstract_factory", "builder", "factory", "prototype", "singleton"];
const STRUCTURAL: &[&str] = &[
    "adapter",
    "bridge",
    "composite",
    "decorator",
    "facade",
    "flyweight",
    "proxy",
];
const BEHAVIORAL: &[&str] = &[
    "chain_of_responsibility",
    "command",
    "interpreter",
    "iterator",
    "mediator",
    "memento",
    "observer",
    "state",
    "strategy",
    "template",
    "visitor",
];

/// Gang-of-four pattern family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PatternCategory {
    /// Object creation.
    Creational,
    /// Object composition.
    Structural,
    /// Object interaction.
    Behavioral,
}

impl PatternCategory {
    /// All categories, in tie-breaking order.
    pub const ALL: [Self; 3] = [Self::Creational, Self::Structural, Self::Behavioral];

    /// Category name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Creational => "Creational",
            Self::Structural => "Structural",
            Self::Behavioral => "Behavioral",
        }
    }

    /// Maps a category name or a concrete pattern name (`Abstract_factory`,
    /// `observer`, `Chain of responsibility`, ...) to its category.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let key = label.trim().to_lowercase().replace([' ', '-'], "_");
        if let Some(category) = Self::ALL.into_iter().find(|c| c.name().to_lowercase() == key) {
            return Some(category);
        }
        [
            (Self::Creational, CREATIONAL),
            (Self::Structural, STRUCTURAL),
            (Self::Behavioral, BEHAVIORAL),
        ]
        .into_iter()
        .find(|(_, names)| names.contains(&key.as_str()))
        .map(|(category, _)| category)
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A concrete pattern whose indicator crossed [`DETECTION_THRESHOLD`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedPattern {
    /// Pattern name.
    pub name: &'static str,
    /// Family of the pattern.
    pub category: PatternCategory,
    /// Indicator score.
    pub confidence: f64,
    /// One-line description.
    pub description: &'static str,
}

/// The pattern most worth considering for the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestedPattern {
    /// Pattern name.
    pub name: &'static str,
    /// Family of the pattern.
    pub category: PatternCategory,
    /// How sure the suggestion is.
    pub confidence: f64,
    /// One-line description.
    pub description: &'static str,
    /// What led to the suggestion.
    pub reason: &'static str,
}

/// Summary metrics echoed in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodeMetrics {
    /// Physical lines.
    pub loc: usize,
    /// Methods.
    pub methods: usize,
    /// Fields.
    pub fields: usize,
    /// Weighted methods per class.
    pub complexity: usize,
    /// Coupling between objects.
    pub coupling: usize,
    /// Lack of cohesion.
    pub cohesion: usize,
}

impl From<&PatternMetrics> for CodeMetrics {
    fn from(m: &PatternMetrics) -> Self {
        Self {
            loc: m.loc,
            methods: m.total_methods,
            fields: m.total_fields,
            complexity: m.wmc,
            coupling: m.cbo,
            cohesion: m.lcom,
        }
    }
}

/// Which path produced the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMethod {
    /// Indicator blend.
    Heuristic,
    /// Trained classifier.
    Trained,
}

/// Design pattern section of an analysis report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternReport {
    /// Most probable category.
    pub predicted_category: PatternCategory,
    /// Probability of `predicted_category`.
    pub confidence: f64,
    /// Probability per category; sums to one.
    pub category_scores: BTreeMap<PatternCategory, f64>,
    /// Concrete patterns, strongest first.
    pub detected_patterns: Vec<DetectedPattern>,
    /// Suggested concrete pattern.
    pub suggested_pattern: SuggestedPattern,
    /// Summary metrics.
    pub code_metrics: CodeMetrics,
    /// Which path produced the category.
    pub analysis_method: AnalysisMethod,
}

/// Guesses pattern categories, optionally with a trained model.
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    model: Option<TrainedModel>,
}

impl PatternDetector {
    /// Heuristic-only detector.
    #[must_use]
    pub fn heuristic() -> Self {
        Self::default()
    }

    /// Uses an already loaded model.
    #[must_use]
    pub fn with_model(model: TrainedModel) -> Self {
        Self { model: Some(model) }
    }

    /// Loads a model trained on [`FEATURE_NAMES`].
    ///
    /// # Errors
    ///
    /// [`AnalysisError::ModelUnavailable`] or [`AnalysisError::ModelFormat`].
    pub fn load(path: &Path) -> Result<Self> {
        let model = TrainedModel::load(path)?;
        if model.feature_names != FEATURE_NAMES {
            return Err(AnalysisError::ModelUnavailable {
                path: path.to_path_buf(),
                reason: "model was trained on different features".to_owned(),
            });
        }
        Ok(Self::with_model(model))
    }

    /// True when a trained model is loaded.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Analyses `content`. Python gets the Python cues; every other
    /// language, recognised or not, gets the C-style ones.
    #[must_use]
    pub fn detect(&self, content: &str, language: Option<Language>) -> PatternReport {
        let flavor = match language {
            Some(Language::Python) => Flavor::Python,
            _ => Flavor::CStyle,
        };
        let metrics = PatternMetrics::extract(content, flavor);
        let indicators = PatternIndicators::detect(content, flavor);

        let (scores, analysis_method) = match self.trained_scores(&metrics) {
            Some(scores) => (scores, AnalysisMethod::Trained),
            None => (heuristic_scores(&metrics, &indicators), AnalysisMethod::Heuristic),
        };
        let (predicted_category, confidence) = best_category(&scores);
        let detected_patterns = detected_patterns(&indicators);
        let suggested_pattern =
            suggest(predicted_category, &metrics, content, &detected_patterns);
        tracing::debug!(
            category = %predicted_category,
            confidence,
            method = ?analysis_method,
            detected = detected_patterns.len(),
            "design pattern analysed"
        );
        PatternReport {
            predicted_category,
            confidence,
            category_scores: scores,
            detected_patterns,
            suggested_pattern,
            code_metrics: CodeMetrics::from(&metrics),
            analysis_method,
        }
    }

    /// Category probabilities from the model, or `None` to fall back.
    fn trained_scores(&self, metrics: &PatternMetrics) -> Option<BTreeMap<PatternCategory, f64>> {
        let model = self.model.as_ref()?;
        let prediction = model.predict(&metrics.to_vector());
        let mut scores: BTreeMap<PatternCategory, f64> =
            PatternCategory::ALL.into_iter().map(|c| (c, 0.0)).collect();
        for (label, probability) in &prediction.probabilities {
            match PatternCategory::from_label(label) {
                Some(category) => *scores.entry(category).or_default() += probability,
                None => tracing::warn!(label, "model label is not a known pattern category"),
            }
        }
        let total: f64 = scores.values().sum();
        if total <= 0.0 {
            tracing::warn!("trained pattern model gave no usable labels; using heuristics");
            return None;
        }
        scores.values_mut().for_each(|v| *v /= total);
        Some(scores)
    }
}

/// Loads a pattern dataset, normalising labels to category names.
///
/// # Errors
///
/// [`AnalysisError::Io`] or [`AnalysisError::Dataset`].
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    Dataset::from_path(path, &FEATURE_NAMES, LABEL_COLUMN, |label| {
        let category = PatternCategory::from_label(label);
        if category.is_none() {
            tracing::warn!(label, "skipping row with unknown pattern label");
        }
        category.map(|c| c.name().to_owned())
    })
}

/// `max * max_weight + mean * (1 - max_weight)` over three signals.
fn blend(signals: [f64; 3], max_weight: f64) -> f64 {
    let max = signals.iter().copied().fold(0.0, f64::max);
    let mean = signals.iter().sum::<f64>() / 3.0;
    max * max_weight + mean * (1.0 - max_weight)
}

#[allow(clippy::cast_precision_loss)]
fn heuristic_scores(
    metrics: &PatternMetrics,
    ind: &PatternIndicators,
) -> BTreeMap<PatternCategory, f64> {
    let methods = metrics.total_methods.max(1) as f64;
    let creational = blend([ind.singleton, ind.factory, ind.builder], 0.7);
    let structural = blend(
        [
            ind.decorator,
            metrics.implements as f64 / methods * 0.5,
            (metrics.cbo as f64 / 20.0).min(1.0) * 0.3,
        ],
        0.6,
    );
    let behavioral = blend(
        [
            ind.observer,
            ind.strategy,
            metrics.interfaces as f64 / methods * 0.5,
        ],
        0.6,
    );
    let total = creational + structural + behavioral;
    let raw = if total > 0.0 {
        [creational / total, structural / total, behavioral / total]
    } else {
        [0.33, 0.33, 0.34]
    };
    PatternCategory::ALL.into_iter().zip(raw).collect()
}

/// Highest score; ties go to the earlier category.
fn best_category(scores: &BTreeMap<PatternCategory, f64>) -> (PatternCategory, f64) {
    scores
        .iter()
        .fold((PatternCategory::Creational, f64::NEG_INFINITY), |best, (&c, &s)| {
            if s > best.1 {
                (c, s)
            } else {
                best
            }
        })
}

fn detected_patterns(ind: &PatternIndicators) -> Vec<DetectedPattern> {
    let checks = [
        (
            "Singleton",
            ind.singleton,
            PatternCategory::Creational,
            "Ensures a class has only one instance and provides global access to it",
        ),
        (
            "Factory",
            ind.factory,
            PatternCategory::Creational,
            "Creates objects without specifying the exact class to create",
        ),
        (
            "Builder",
            ind.builder,
            PatternCategory::Creational,
            "Separates object construction from its representation",
        ),
        (
            "Observer",
            ind.observer,
            PatternCategory::Behavioral,
            "Defines a subscription mechanism to notify multiple objects about events",
        ),
        (
            "Strategy",
            ind.strategy,
            PatternCategory::Behavioral,
            "Defines a family of algorithms and makes them interchangeable",
        ),
        (
            "Decorator",
            ind.decorator,
            PatternCategory::Structural,
            "Attaches additional responsibilities to objects dynamically",
        ),
    ];
    let mut found: Vec<DetectedPattern> = checks
        .into_iter()
        .filter(|(_, score, _, _)| *score > DETECTION_THRESHOLD)
        .map(|(name, confidence, category, description)| DetectedPattern {
            name,
            category,
            confidence,
            description,
        })
        .collect();
    // Stable, so equal scores keep the order above.
    found.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    found
}

const SINGLETON: (&str, &str) = ("Singleton", "Ensures a class has only one instance");
const FACTORY_METHOD: (&str, &str) = (
    "Factory Method",
    "Creates objects without specifying exact class",
);
const BUILDER: (&str, &str) = (
    "Builder",
    "Separates object construction from representation",
);
const ADAPTER: (&str, &str) = (
    "Adapter",
    "Converts interface of a class into another interface",
);
const DECORATOR: (&str, &str) = (
    "Decorator",
    "Attaches additional responsibilities dynamically",
);
const FACADE: (&str, &str) = (
    "Facade",
    "Provides simplified interface to complex subsystem",
);
const OBSERVER: (&str, &str) = (
    "Observer",
    "Defines subscription mechanism for event notification",
);
const STRATEGY: (&str, &str) = ("Strategy", "Defines family of interchangeable algorithms");
const COMMAND: (&str, &str) = ("Command", "Encapsulates request as an object");
const STATE: (&str, &str) = (
    "State",
    "Allows object to alter behavior when state changes",
);

fn suggestion(
    (name, description): (&'static str, &'static str),
    category: PatternCategory,
    confidence: f64,
    reason: &'static str,
) -> SuggestedPattern {
    SuggestedPattern {
        name,
        category,
        confidence,
        description,
        reason,
    }
}

/// Strongest detected pattern, otherwise a keyword-refined default for
/// the predicted category.
fn suggest(
    category: PatternCategory,
    metrics: &PatternMetrics,
    content: &str,
    detected: &[DetectedPattern],
) -> SuggestedPattern {
    if let Some(top) = detected.first() {
        return SuggestedPattern {
            name: top.name,
            category: top.category,
            confidence: top.confidence,
            description: top.description,
            reason: "Detected through code analysis",
        };
    }
    let code = content.to_lowercase();
    let has = |word: &str| code.contains(word);
    match category {
        PatternCategory::Creational => {
            if has("instance") && has("private") && has("static") {
                suggestion(SINGLETON, category, 0.6, "Static instance field pattern detected")
            } else if has("create") || has("factory") || has("build") {
                suggestion(FACTORY_METHOD, category, 0.5, "Object creation methods detected")
            } else if has("builder") || (has("set") && has("return this")) {
                suggestion(BUILDER, category, 0.5, "Fluent builder pattern detected")
            } else {
                suggestion(
                    FACTORY_METHOD,
                    category,
                    0.4,
                    "Default suggestion for Creational category",
                )
            }
        }
        PatternCategory::Structural => {
            if has("adapter") || has("wrapper") {
                suggestion(ADAPTER, category, 0.6, "Adapter/wrapper pattern detected")
            } else if has("decorator") || (has("component") && has("wrapped")) {
                suggestion(DECORATOR, category, 0.5, "Decorator pattern indicators detected")
            } else if metrics.total_methods > 5 && metrics.cbo > 3 {
                suggestion(FACADE, category, 0.5, "High coupling suggests facade pattern")
            } else {
                suggestion(
                    ADAPTER,
                    category,
                    0.4,
                    "Default suggestion for Structural category",
                )
            }
        }
        PatternCategory::Behavioral => {
            if has("observer") || has("listener") || has("subscribe") {
                suggestion(OBSERVER, category, 0.6, "Observer/listener pattern detected")
            } else if has("strategy") || has("algorithm") {
                suggestion(STRATEGY, category, 0.5, "Strategy pattern indicators detected")
            } else if has("command") || has("execute") {
                suggestion(COMMAND, category, 0.5, "Command/execute pattern detected")
            } else if has("state") && metrics.total_methods > 3 {
                suggestion(STATE, category, 0.5, "State management pattern detected")
            } else {
                suggestion(
                    STRATEGY,
                    category,
                    0.4,
                    "Default suggestion for Behavioral category",
                )
            }
        }
    }
}
