use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.smellscan.toml, or [tool.smellscan] in pyproject.toml):
  Looked up from the first analysed path towards the filesystem root.

  [smellscan]
  complexity_model = \"models/complexity.json\"  # Trained complexity classifier
  pattern_model = \"models/patterns.json\"       # Trained pattern classifier
  design_patterns = true     # Run the design pattern detector
  extended_rules = false     # Long lines, TODO comments, repeated strings
  cache = true               # Reuse source text of unchanged files

  # Path filters
  exclude_folders = [\"build\", \"dist\", \".venv\"]

  # CI/CD
  fail_under = 70.0          # Exit 2 if a file scores below this quality
";

/// Options for output formatting and verbosity.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputOptions {
    /// Output raw JSON.
    #[arg(long)]
    pub json: bool,

    /// Show suggestions, recommendations and debug logs.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: show only the summary and gate results.
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Options for the trained classifiers.
#[derive(Args, Debug, Default, Clone)]
pub struct ModelOptions {
    /// Trained complexity model (JSON written by `train`).
    #[arg(long = "model")]
    pub complexity_model: Option<PathBuf>,

    /// Trained design pattern model (JSON written by `train --target patterns`).
    #[arg(long)]
    pub pattern_model: Option<PathBuf>,

    /// Skip design pattern detection.
    #[arg(long)]
    pub no_patterns: bool,
}

/// Command line interface configuration using `clap`.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "smellscan - code smells, quality and technical debt for Python, Java, JavaScript, C/C++, C# and PHP",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    #[command(subcommand)]
    /// The subcommand to execute.
    pub command: Option<Commands>,

    /// Files or directories to analyse. Defaults to the current directory.
    pub paths: Vec<PathBuf>,

    /// Output formatting options.
    #[command(flatten)]
    pub output: OutputOptions,

    /// Classifier options.
    #[command(flatten)]
    pub models: ModelOptions,

    /// Folders to exclude from analysis.
    #[arg(long, alias = "exclude-folder")]
    pub exclude_folders: Vec<String>,

    /// Exit with code 2 if any file's overall quality is below this score.
    #[arg(long, value_name = "SCORE")]
    pub fail_under: Option<f64>,
}

/// Which classifier `train` fits.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrainTarget {
    /// Complexity class, label column `complexity`.
    #[default]
    Complexity,
    /// Design pattern category, label column `category`.
    Patterns,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit a classifier from a labelled CSV and save it as JSON
    Train {
        /// Labelled CSV dataset.
        #[arg(long)]
        dataset: PathBuf,

        /// Where to write the model.
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Which model to train.
        #[arg(long, value_enum, default_value_t = TrainTarget::Complexity)]
        target: TrainTarget,
    },
    /// List recognised file extensions
    Languages,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analysis_flags() {
        let cli = Cli::try_parse_from([
            "smellscan",
            "src",
            "--json",
            "--model",
            "m.json",
            "--no-patterns",
            "--fail-under",
            "70",
            "--exclude-folders",
            "vendor",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.paths, vec![PathBuf::from("src")]);
        assert!(cli.output.json);
        assert_eq!(cli.models.complexity_model, Some(PathBuf::from("m.json")));
        assert!(cli.models.no_patterns);
        assert_eq!(cli.fail_under, Some(70.0));
        assert_eq!(cli.exclude_folders, vec!["vendor".to_owned()]);
    }

    #[test]
    fn test_parse_train() {
        let cli = Cli::try_parse_from([
            "smellscan",
            "train",
            "--dataset",
            "data.csv",
            "--output",
            "model.json",
            "--target",
            "patterns",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Train { target, .. }) => assert_eq!(target, TrainTarget::Patterns),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["smellscan", "--quiet", "--verbose"]).is_err());
    }
}
