//! Core library for the smellscan code quality analyzer.
//!
//! smellscan reads source files in Python, Java, JavaScript/TypeScript,
//! C/C++, C# and PHP, detects code smells with per-language rules, and
//! derives a quality score, a complexity estimate, a technical debt
//! assessment and design pattern hints from them.

#![allow(
    clippy::type_complexity,
    clippy::similar_names,
    clippy::format_push_string,
    clippy::map_unwrap_or,
    clippy::items_after_statements
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module containing the analysis pipeline.
/// This includes the `Analyzer` struct, per-file reports and batch traversal.
pub mod analyzer;

/// Module for loading configuration from `.smellscan.toml` or `pyproject.toml`.
pub mod config;

/// Module defining the crate error type.
pub mod error;

/// Supported languages and their file extensions.
pub mod language;

/// Module for reading source files and caching their contents.
pub mod source;

/// Module containing the smell rules for each language.
pub mod rules;

/// Module running the rules for one language over a file.
pub mod linter;

/// Module selecting the rules for a file and collecting findings.
pub mod detector;

/// Module computing the quality score from findings.
pub mod quality;

/// Module for complexity features and the complexity classifier.
pub mod complexity;

/// Module implementing the dataset loader and the classifiers behind
/// complexity and pattern prediction.
pub mod ml;

/// Module computing the technical debt assessment.
pub mod debt;

/// Module for design pattern metrics, indicators and classification.
pub mod patterns;

/// Module extracting structural facts (classes, functions, imports).
pub mod structure;

/// Module storing analysis reports.
pub mod repository;

/// Module containing utility functions.
/// This includes file discovery and path helpers.
pub mod utils;

/// Module defining the entry point logic shared by both binaries.
pub mod entry_point;

/// Module containing shared constants and regex patterns.
pub mod constants;

/// Module for rich CLI output formatting with colored text and spinners.
pub mod output;

/// Module defining the command-line interface arguments and structs.
pub mod cli;
