use crate::analyzer::{AnalysisReport, AnalysisSummary, Analyzer, FileFailure};
use crate::cli::{Cli, Commands, TrainTarget};
use crate::config::Config;
use crate::ml::dataset::Dataset;
use crate::ml::TrainedModel;
use crate::output;
use crate::repository::{InMemoryReportRepository, ReportRepository};
use crate::{complexity, ml, patterns};
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Exit code when the `--fail-under` quality gate trips.
pub const EXIT_GATE_FAILED: i32 = 2;

/// JSON document written by `--json`.
#[derive(Serialize)]
struct JsonOutput<'a> {
    reports: Vec<&'a AnalysisReport>,
    summary: &'a AnalysisSummary,
    failures: &'a [FileFailure],
}

/// Routes `tracing` output to stderr. `--verbose` forces debug level,
/// otherwise `RUST_LOG` decides and defaults to warnings.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("smellscan=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Only the first call in a process installs a subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

/// Runs smellscan with the given arguments.
///
/// # Errors
///
/// Returns an error if writing output fails or a model cannot be trained or saved.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run smellscan with the given arguments, writing output to the specified writer.
///
/// This is the testable version of `run_with_args` that allows output capture.
///
/// # Errors
///
/// Returns an error if writing output fails or a model cannot be trained or saved.
pub fn run_with_args_to<W: Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["smellscan".to_owned()];
    program_args.extend(args);
    let cli_var = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                write!(writer, "{e}")?;
                writer.flush()?;
                return Ok(0);
            }
            _ => {
                eprint!("{e}");
                return Ok(1);
            }
        },
    };
    init_tracing(cli_var.output.verbose);

    match &cli_var.command {
        Some(Commands::Languages) => {
            output::print_languages(writer)?;
            Ok(0)
        }
        Some(Commands::Train {
            dataset,
            output,
            target,
        }) => run_train(dataset, output, *target, writer),
        None => run_analysis(&cli_var, writer),
    }
}

fn run_train<W: Write>(
    dataset: &Path,
    output_path: &Path,
    target: TrainTarget,
    writer: &mut W,
) -> Result<i32> {
    if !dataset.exists() {
        eprintln!("Error: The dataset '{}' does not exist.", dataset.display());
        return Ok(1);
    }
    let spinner = output::create_spinner("training model…");
    let trained = train_and_save(dataset, output_path, target);
    spinner.finish_and_clear();
    let (data, model) = trained?;

    writeln!(
        writer,
        "Trained {} on {} rows ({} classes), validation accuracy {:.1}%",
        model.estimator.name(),
        data.len(),
        model.labels.len(),
        model.validation_accuracy * 100.0
    )?;
    writeln!(writer, "Model written to {}", output_path.display())?;
    Ok(0)
}

fn train_and_save(
    dataset: &Path,
    output_path: &Path,
    target: TrainTarget,
) -> Result<(Dataset, TrainedModel)> {
    let data = match target {
        TrainTarget::Complexity => complexity::load_dataset(dataset),
        TrainTarget::Patterns => patterns::load_dataset(dataset),
    }
    .with_context(|| format!("failed to load dataset {}", dataset.display()))?;
    let model = ml::train(&data).context("training failed")?;
    model
        .save(output_path)
        .with_context(|| format!("failed to write model {}", output_path.display()))?;
    Ok((data, model))
}

/// Folds command-line overrides into the file configuration.
fn apply_cli(config: &mut Config, cli_var: &Cli) {
    let settings = &mut config.smellscan;
    if let Some(path) = &cli_var.models.complexity_model {
        settings.complexity_model = Some(path.clone());
    }
    if let Some(path) = &cli_var.models.pattern_model {
        settings.pattern_model = Some(path.clone());
    }
    if cli_var.models.no_patterns {
        settings.design_patterns = Some(false);
    }
    if !cli_var.exclude_folders.is_empty() {
        settings
            .exclude_folders
            .get_or_insert_with(Vec::new)
            .extend(cli_var.exclude_folders.iter().cloned());
    }
    if cli_var.fail_under.is_some() {
        settings.fail_under = cli_var.fail_under;
    }
}

fn run_analysis<W: Write>(cli_var: &Cli, writer: &mut W) -> Result<i32> {
    let paths: Vec<PathBuf> = if cli_var.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli_var.paths.clone()
    };
    if let Some(missing) = paths.iter().find(|p| !p.exists()) {
        eprintln!(
            "Error: The file or directory '{}' does not exist.",
            missing.display()
        );
        return Ok(1);
    }

    let mut config = Config::load_from_path(&paths[0]);
    apply_cli(&mut config, cli_var);
    let fail_under = config.smellscan.fail_under;
    let analyzer = Analyzer::new(config);

    let json = cli_var.output.json;
    let quiet = cli_var.output.quiet;
    if cli_var.output.verbose && !json {
        eprintln!("[VERBOSE] smellscan v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("[VERBOSE] Using {} threads", rayon::current_num_threads());
    }

    let progress = (!json && !quiet).then(|| output::create_progress_bar(0));
    let batch = analyzer.analyze_paths(&paths, progress.as_ref());
    if let Some(bar) = &progress {
        bar.finish_and_clear();
    }

    let mut repository = InMemoryReportRepository::new();
    for report in batch.reports {
        repository.create(report);
    }
    let summary = AnalysisSummary::from_reports(repository.reports(), batch.failures.len());

    if json {
        let document = JsonOutput {
            reports: repository.reports().collect(),
            summary: &summary,
            failures: &batch.failures,
        };
        serde_json::to_writer_pretty(&mut *writer, &document)?;
        writeln!(writer)?;
    } else {
        output::print_header(writer)?;
        if !quiet {
            for (_, report) in repository.list() {
                output::print_report(writer, report, cli_var.output.verbose)?;
            }
        }
        output::print_summary(writer, &summary)?;
        output::print_failures(writer, &batch.failures)?;
    }

    if let Some(threshold) = fail_under {
        if let Some(gate) = quality_gate(repository.reports(), threshold) {
            if !json {
                eprintln!(
                    "\n[GATE] Quality: {} scored {:.1} (threshold: {threshold:.1}) - FAILED",
                    gate.0, gate.1
                );
            }
            return Ok(EXIT_GATE_FAILED);
        }
        if !json {
            writeln!(writer, "\n[GATE] Quality threshold {threshold:.1} - PASSED")?;
        }
    }

    Ok(i32::from(!batch.failures.is_empty()))
}

/// Lowest-scoring file below `threshold`, if any.
fn quality_gate<'a>(
    reports: impl Iterator<Item = &'a AnalysisReport>,
    threshold: f64,
) -> Option<(&'a str, f64)> {
    reports
        .filter(|r| r.quality.overall < threshold)
        .map(|r| (r.file.as_str(), r.quality.overall))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn run(args: &[&str]) -> (i32, String) {
        let mut buffer = Vec::new();
        let code = run_with_args_to(args.iter().map(|&a| a.to_owned()).collect(), &mut buffer)
            .unwrap();
        (code, String::from_utf8(buffer).unwrap())
    }

    #[test]
    fn test_json_output() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.py");
        fs::write(&file, "def f(a, b, c, d, e, g):\n    return a\n").unwrap();
        let (code, out) = run(&[file.to_str().unwrap(), "--json"]);
        assert_eq!(code, 0);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["summary"]["total_files"], 1);
        assert_eq!(
            value["reports"][0]["smells"]["smells"][0]["type"],
            "long_parameter_list"
        );
    }

    #[test]
    fn test_missing_path_exits_1() {
        let (code, _) = run(&["/definitely/not/here"]);
        assert_eq!(code, 1);
    }

    #[test]
    fn test_fail_under_gate() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.py");
        fs::write(&file, "x = 1\n").unwrap();
        let (code, _) = run(&[file.to_str().unwrap(), "--quiet", "--fail-under", "101"]);
        assert_eq!(code, EXIT_GATE_FAILED);
        let (code, out) = run(&[file.to_str().unwrap(), "--quiet", "--fail-under", "0"]);
        assert_eq!(code, 0);
        assert!(out.contains("PASSED"));
    }

    #[test]
    fn test_languages_command() {
        let (code, out) = run(&["languages"]);
        assert_eq!(code, 0);
        assert!(out.contains(".php"));
    }

    #[test]
    fn test_train_command() {
        let dir = TempDir::new().unwrap();
        let dataset = dir.path().join("data.csv");
        let mut csv = String::from(
            "no_of_ifs,no_of_switches,no_of_loop,no_of_break,priority_queue_present,no_of_sort,hash_set_present,hash_map_present,recursion_present,nested_loop_depth,complexity\n",
        );
        for i in 0..12 {
            csv.push_str(&format!("{i},0,0,0,0,0,0,0,0,0,1\n"));
            csv.push_str(&format!("{i},0,2,0,0,0,0,0,0,2,n_square\n"));
        }
        fs::write(&dataset, csv).unwrap();
        let model = dir.path().join("model.json");
        let (code, out) = run(&[
            "train",
            "--dataset",
            dataset.to_str().unwrap(),
            "--output",
            model.to_str().unwrap(),
        ]);
        assert_eq!(code, 0);
        assert!(out.contains("Model written to"));
        assert!(model.exists());
    }

    #[test]
    fn test_train_reports_bad_dataset() {
        let dir = TempDir::new().unwrap();
        let dataset = dir.path().join("bad.csv");
        fs::write(&dataset, "no_of_ifs,complexity\n1,n\n").unwrap();
        let model = dir.path().join("model.json");
        let args = [
            "train",
            "--dataset",
            dataset.to_str().unwrap(),
            "--output",
            model.to_str().unwrap(),
        ];
        let mut buffer = Vec::new();
        let result = run_with_args_to(args.iter().map(|&a| a.to_owned()).collect(), &mut buffer);
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("failed to load dataset"));
        assert!(!model.exists());
        assert!(buffer.is_empty());
    }
}
