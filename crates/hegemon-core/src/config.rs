//! Configuration loading for a Hegemon run.
//!
//! The canonical configuration lives in `hegemon-config.yaml` at the project
//! root. Every section and key is optional; anything left out takes the
//! documented default, so an empty file describes the stock simulation.
//!
//! ```yaml
//! simulation:
//!   extraction_efficiency: 0.8
//! defines:
//!   territory:
//!     eviction_threshold: 0.8
//! logging:
//!   level: info
//! run:
//!   max_ticks: 52
//!   scenario: imperial_circuit
//! ```

use std::path::{Path, PathBuf};

use hegemon_systems::{GameDefines, SimulationConfig};
use serde::Deserialize;
use tracing::warn;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration mirroring `hegemon-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HegemonConfig {
    /// Imperial-circuit coefficients.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Per-system tunables.
    #[serde(default)]
    pub defines: GameDefines,

    /// Logging output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// What to run and where to write results.
    #[serde(default)]
    pub run: RunConfig,
}

impl HegemonConfig {
    /// Load configuration from a YAML file.
    ///
    /// Environment overrides are applied after parsing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.run.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Run parameters for the engine binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Number of ticks to advance.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Name of the starting scenario.
    #[serde(default = "default_scenario")]
    pub scenario: String,

    /// Where to write the final state as graph JSON.
    #[serde(default)]
    pub output_path: Option<PathBuf>,

    /// Where to write the per-tick metrics JSON.
    #[serde(default)]
    pub metrics_path: Option<PathBuf>,

    /// Keep every intermediate snapshot in memory.
    #[serde(default)]
    pub retain_history: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            scenario: default_scenario(),
            output_path: None,
            metrics_path: None,
            retain_history: false,
        }
    }
}

impl RunConfig {
    /// Override fields from `HEGEMON_MAX_TICKS`, `HEGEMON_SCENARIO`, and
    /// `HEGEMON_OUTPUT` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HEGEMON_MAX_TICKS") {
            match val.parse() {
                Ok(ticks) => self.max_ticks = ticks,
                Err(e) => warn!(value = %val, error = %e, "ignoring invalid HEGEMON_MAX_TICKS"),
            }
        }
        if let Ok(val) = std::env::var("HEGEMON_SCENARIO") {
            self.scenario = val;
        }
        if let Ok(val) = std::env::var("HEGEMON_OUTPUT") {
            self.output_path = Some(PathBuf::from(val));
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_log_format() -> String {
    "pretty".to_owned()
}

const fn default_max_ticks() -> u64 {
    52
}

fn default_scenario() -> String {
    "imperial_circuit".to_owned()
}
