use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_FILENAME, PYPROJECT_FILENAME};

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The `[smellscan]` section.
    pub smellscan: SmellScanConfig,
    /// The path to the configuration file this was loaded from.
    /// Set during `load_from_path`, `None` if using defaults or programmatic config.
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
/// Configuration options for smellscan.
pub struct SmellScanConfig {
    /// Trained complexity classifier artifact.
    pub complexity_model: Option<PathBuf>,
    /// Trained design-pattern classifier artifact.
    pub pattern_model: Option<PathBuf>,
    /// Whether to run the design pattern detector (default: true).
    pub design_patterns: Option<bool>,
    /// Whether to run the optional general rules (default: false).
    pub extended_rules: Option<bool>,
    /// Whether to reuse source text for unchanged files (default: true).
    pub cache: Option<bool>,
    /// List of folders to exclude when walking directories.
    pub exclude_folders: Option<Vec<String>>,
    /// Minimum overall quality score; lower scores fail the run.
    pub fail_under: Option<f64>,
}

impl SmellScanConfig {
    /// Whether the design pattern detector runs.
    #[must_use]
    pub fn design_patterns_enabled(&self) -> bool {
        self.design_patterns.unwrap_or(true)
    }

    /// Whether the optional general rules run.
    #[must_use]
    pub fn extended_rules_enabled(&self) -> bool {
        self.extended_rules.unwrap_or(false)
    }

    /// Whether the source cache is used.
    #[must_use]
    pub fn cache_enabled(&self) -> bool {
        self.cache.unwrap_or(true)
    }
}

#[derive(Debug, Deserialize, Clone)]
struct PyProject {
    tool: ToolConfig,
}

#[derive(Debug, Deserialize, Clone)]
struct ToolConfig {
    smellscan: SmellScanConfig,
}

impl Config {
    /// Loads configuration from default locations (.smellscan.toml or pyproject.toml in current dir).
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    /// Files that fail to parse are skipped with a warning.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            let smellscan_toml = current.join(CONFIG_FILENAME);
            if smellscan_toml.exists() {
                if let Ok(content) = fs::read_to_string(&smellscan_toml) {
                    match toml::from_str::<Config>(&content) {
                        Ok(mut config) => {
                            tracing::debug!(
                                path = %smellscan_toml.display(),
                                "loaded configuration"
                            );
                            config.config_file_path = Some(smellscan_toml);
                            return config;
                        }
                        Err(error) => {
                            tracing::warn!(
                                path = %smellscan_toml.display(),
                                %error,
                                "ignoring invalid configuration"
                            );
                        }
                    }
                }
            }

            let pyproject_toml = current.join(PYPROJECT_FILENAME);
            if pyproject_toml.exists() {
                if let Ok(content) = fs::read_to_string(&pyproject_toml) {
                    if let Ok(pyproject) = toml::from_str::<PyProject>(&content) {
                        tracing::debug!(
                            path = %pyproject_toml.display(),
                            "loaded [tool.smellscan]"
                        );
                        return Config {
                            smellscan: pyproject.tool.smellscan,
                            config_file_path: Some(pyproject_toml),
                        };
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }
}
