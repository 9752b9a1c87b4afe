//! Analysis of many files at once.

use super::{AnalysisReport, Analyzer, FileFailure};
use crate::utils::{collect_source_files, normalize_display_path};
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Reports and failures of a batch, both in path order.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// One report per readable file.
    pub reports: Vec<AnalysisReport>,
    /// Files that could not be analysed.
    pub failures: Vec<FileFailure>,
}

impl Analyzer {
    /// Expands `paths` into the files to analyse.
    ///
    /// Directories are walked for recognised extensions. Explicit file
    /// paths are kept whatever their extension, and missing paths are kept
    /// so that they surface as failures.
    #[must_use]
    pub fn collect_files(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let excludes = self
            .config
            .smellscan
            .exclude_folders
            .clone()
            .unwrap_or_default();
        let mut files = Vec::new();
        for path in paths {
            if path.is_dir() {
                files.extend(collect_source_files(path, &excludes));
            } else {
                files.push(path.clone());
            }
        }
        files
    }

    /// Analyses every file under `paths` in parallel.
    ///
    /// Each rayon worker gets its own [`Analyzer::worker`], so no state is
    /// shared between concurrent analyses.
    pub fn analyze_paths(&self, paths: &[PathBuf], progress: Option<&ProgressBar>) -> BatchResult {
        let files = self.collect_files(paths);
        tracing::info!(files = files.len(), "starting analysis");
        if let Some(bar) = progress {
            bar.set_length(files.len() as u64);
        }

        let outcomes: Vec<Result<AnalysisReport, FileFailure>> = files
            .par_iter()
            .map_init(
                || self.worker(),
                |analyzer, path| {
                    let outcome = analyze_one(analyzer, path);
                    if let Some(bar) = progress {
                        bar.inc(1);
                    }
                    outcome
                },
            )
            .collect();

        let mut batch = BatchResult::default();
        for outcome in outcomes {
            match outcome {
                Ok(report) => batch.reports.push(report),
                Err(failure) => batch.failures.push(failure),
            }
        }
        tracing::info!(
            analysed = batch.reports.len(),
            failed = batch.failures.len(),
            "analysis finished"
        );
        batch
    }
}

fn analyze_one(analyzer: &mut Analyzer, path: &Path) -> Result<AnalysisReport, FileFailure> {
    analyzer.analyze_path(path).map_err(|error| {
        tracing::warn!(path = %path.display(), %error, "file skipped");
        FileFailure {
            file: normalize_display_path(path),
            error: error.to_string(),
        }
    })
}
