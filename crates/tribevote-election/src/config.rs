//! Configuration loading from TOML and environment variables.
//!
//! The runner reads its configuration from:
//! 1. A TOML config file (optional; defaults apply when absent)
//! 2. Environment variables (override TOML values)
//!
//! Environment variable prefix: TRIBEVOTE_

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TallyConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// How query results are printed.
    #[serde(default)]
    pub output: OutputConfig,
    /// Scenario execution behaviour.
    #[serde(default)]
    pub run: RunConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "tribevote_tally=trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Rendering of reports on stdout.
    #[serde(default)]
    pub format: OutputFormat,
    /// Whether winner reports carry area and tribe names next to ids.
    #[serde(default = "default_true")]
    pub show_names: bool,
}

/// Scenario execution configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Stop at the first step the election rejects.
    #[serde(default)]
    pub halt_on_error: bool,
}

/// Report rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One human-readable line per fact.
    #[default]
    Text,
    /// One JSON object per report.
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow::anyhow!("unknown output format: {other}")),
        }
    }
}

// -- Defaults --

fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}

// -- Trait impls --

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            show_names: true,
        }
    }
}

impl TallyConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, anyhow::Error> {
        let config: TallyConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, with environment variable overrides.
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged.
    pub fn load(path: Option<&Path>) -> Result<Self, anyhow::Error> {
        let mut config = if let Some(path) = path {
            if path.exists() {
                Self::from_file(path)?
            } else {
                tracing::warn!(
                    path = %path.display(),
                    "Config file not found, using defaults"
                );
                Self::default()
            }
        } else {
            Self::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("TRIBEVOTE_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = lookup("TRIBEVOTE_OUTPUT_FORMAT") {
            match val.parse() {
                Ok(format) => self.output.format = format,
                Err(err) => {
                    tracing::warn!("invalid TRIBEVOTE_OUTPUT_FORMAT, ignoring: {err}");
                }
            }
        }
        if let Some(val) = lookup("TRIBEVOTE_SHOW_NAMES") {
            self.output.show_names = val == "true" || val == "1";
        }
        if let Some(val) = lookup("TRIBEVOTE_HALT_ON_ERROR") {
            self.run.halt_on_error = val == "true" || val == "1";
        }
    }
}
