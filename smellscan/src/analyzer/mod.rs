//! The composite per-file pipeline.
//!
//! Stages run in a fixed order: structure, smells, quality, complexity,
//! debt, design patterns. A stage that cannot run properly degrades and
//! leaves a line in [`AnalysisReport::diagnostics`]; only a missing or
//! unreadable file is an error.
//!
//! - `types`: [`AnalysisReport`], [`AnalysisSummary`], [`FileFailure`]
//! - `traversal`: parallel analysis of many paths

mod traversal;
/// Report types.
pub mod types;

pub use traversal::BatchResult;
pub use types::{AnalysisReport, AnalysisSummary, FileFailure};

use crate::complexity::{ComplexityPrediction, ComplexityPredictor};
use crate::config::Config;
use crate::detector::SmellDetector;
use crate::error::Result;
use crate::language::Language;
use crate::patterns::PatternDetector;
use crate::source::{SourceCache, SourceFile};
use crate::{debt, quality, structure};
use std::path::Path;

/// What to analyse.
#[derive(Debug, Clone, Copy)]
pub enum AnalysisInput<'a> {
    /// A file on disk; the language follows from its extension.
    Path(&'a Path),
    /// Inline text with an explicit language tag.
    Text {
        /// Source text.
        content: &'a str,
        /// Language, `None` for general rules only.
        language: Option<Language>,
    },
}

/// Runs every stage over one file at a time.
///
/// An analyzer is not shared between threads; batch analysis gives each
/// worker its own copy via [`Analyzer::worker`].
#[derive(Debug)]
pub struct Analyzer {
    /// Configuration in effect.
    pub config: Config,
    detector: SmellDetector,
    complexity: ComplexityPredictor,
    patterns: Option<PatternDetector>,
    cache: Option<SourceCache>,
    /// Model loading problems, repeated in every report.
    setup_diagnostics: Vec<String>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Analyzer {
    /// Builds an analyzer from `config`, loading any configured models.
    ///
    /// A model that cannot be loaded is logged and recorded as a diagnostic;
    /// the analyzer then runs without it.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let settings = &config.smellscan;
        let mut analyzer = Self {
            detector: SmellDetector::new().with_extended_rules(settings.extended_rules_enabled()),
            complexity: ComplexityPredictor::unavailable(),
            patterns: settings
                .design_patterns_enabled()
                .then(PatternDetector::heuristic),
            cache: settings.cache_enabled().then(SourceCache::new),
            setup_diagnostics: Vec::new(),
            config: config.clone(),
        };
        if let Some(path) = &config.smellscan.complexity_model {
            analyzer = analyzer.with_complexity_model(path);
        }
        if let Some(path) = &config.smellscan.pattern_model {
            analyzer = analyzer.with_pattern_model(path);
        }
        analyzer
    }

    /// Loads the complexity classifier from `path`.
    #[must_use]
    pub fn with_complexity_model(mut self, path: &Path) -> Self {
        match ComplexityPredictor::load(path) {
            Ok(predictor) => {
                tracing::info!(path = %path.display(), "complexity model loaded");
                self.complexity = predictor;
            }
            Err(error) => {
                tracing::warn!(%error, "complexity model unavailable");
                self.setup_diagnostics
                    .push(format!("Complexity model not loaded: {error}"));
            }
        }
        self
    }

    /// Loads the design pattern classifier from `path`. Ignored when
    /// pattern detection is disabled.
    #[must_use]
    pub fn with_pattern_model(mut self, path: &Path) -> Self {
        if self.patterns.is_none() {
            return self;
        }
        match PatternDetector::load(path) {
            Ok(detector) => {
                tracing::info!(path = %path.display(), "pattern model loaded");
                self.patterns = Some(detector);
            }
            Err(error) => {
                tracing::warn!(%error, "pattern model unavailable, using heuristics");
                self.setup_diagnostics
                    .push(format!("Pattern model not loaded, heuristics used: {error}"));
            }
        }
        self
    }

    /// Turns design pattern detection on or off.
    #[must_use]
    pub fn with_patterns(mut self, enabled: bool) -> Self {
        self.patterns = match (enabled, self.patterns.take()) {
            (true, Some(existing)) => Some(existing),
            (true, None) => Some(PatternDetector::heuristic()),
            (false, _) => None,
        };
        self
    }

    /// Turns on the long-line, TODO and duplicate-string rules.
    #[must_use]
    pub fn with_extended_rules(mut self, enabled: bool) -> Self {
        self.detector = self.detector.with_extended_rules(enabled);
        self
    }

    /// Turns the source cache on or off.
    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(SourceCache::new);
        self
    }

    /// An independent analyzer with the same models and an empty cache.
    #[must_use]
    pub fn worker(&self) -> Self {
        Self {
            config: self.config.clone(),
            detector: self.detector,
            complexity: self.complexity.clone(),
            patterns: self.patterns.clone(),
            cache: self.cache.as_ref().map(|_| SourceCache::new()),
            setup_diagnostics: self.setup_diagnostics.clone(),
        }
    }

    /// Number of reads served from the source cache.
    #[must_use]
    pub fn cache_hits(&self) -> usize {
        self.cache.as_ref().map_or(0, SourceCache::hits)
    }

    /// Analyses a path or inline text.
    ///
    /// # Errors
    ///
    /// See [`Analyzer::analyze_path`].
    pub fn analyze(&mut self, input: AnalysisInput<'_>) -> Result<AnalysisReport> {
        match input {
            AnalysisInput::Path(path) => self.analyze_path(path),
            AnalysisInput::Text { content, language } => {
                Ok(self.analyze_source(&SourceFile::from_text(content, language)))
            }
        }
    }

    /// Reads and analyses one file.
    ///
    /// # Errors
    ///
    /// [`crate::error::AnalysisError::SourceNotFound`] when the file does
    /// not exist, [`crate::error::AnalysisError::Io`] when it cannot be read.
    pub fn analyze_path(&mut self, path: &Path) -> Result<AnalysisReport> {
        let source = match self.cache.as_mut() {
            Some(cache) => cache.load(path)?,
            None => SourceFile::read(path)?,
        };
        Ok(self.analyze_source(&source))
    }

    /// Runs every stage over already loaded text.
    #[must_use]
    pub fn analyze_source(&self, source: &SourceFile) -> AnalysisReport {
        let content: &str = &source.content;
        let file = source.display_name();
        let mut diagnostics = self.setup_diagnostics.clone();

        if source.language.is_none() {
            tracing::warn!(file = %file, extension = %source.extension, "unsupported language");
            diagnostics.push(format!(
                "Unsupported language '.{}': only general rules were applied",
                source.extension
            ));
        }

        let structure = structure::extract(content, source.language, &source.extension);
        let smells = self.detector.detect(content, source.language).summary();
        let quality = quality::score(&smells, content);
        let complexity = self.complexity.analyze(content);
        if let ComplexityPrediction::Unavailable { error } = &complexity.prediction {
            diagnostics.push(format!("Complexity prediction unavailable: {error}"));
        }
        let debt = debt::calculate(&quality, &smells, &complexity.prediction, &structure);
        let patterns = self
            .patterns
            .as_ref()
            .map(|detector| detector.detect(content, source.language));

        tracing::debug!(
            file = %file,
            smells = smells.total_smells,
            quality = quality.overall,
            debt = debt.total_score,
            "file analysed"
        );
        AnalysisReport {
            file,
            language: source.language,
            lines: content.lines().count(),
            structure,
            smells,
            quality,
            complexity,
            debt,
            patterns,
            diagnostics,
        }
    }
}
