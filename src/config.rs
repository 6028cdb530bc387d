//! Configuration for a race

use crate::error::SimError;
use crate::{
    DEFAULT_ACTIVE_SYMBOL, DEFAULT_CHART_WIDTH, DEFAULT_COMPLETION_EPSILON, DEFAULT_IDLE_SYMBOL,
    DEFAULT_LABEL_WIDTH, DEFAULT_TICK_DELTA,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a race and its chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Simulated seconds per host step (default: one 60 Hz frame)
    pub tick_delta: f64,

    /// Remaining service below which a process counts as finished
    pub completion_epsilon: f64,

    /// Log level used when RUST_LOG is not set
    pub log_level: String,

    /// Chart rendering configuration
    pub chart: ChartConfig,
}

/// Text chart configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Number of columns per process strip
    pub width: usize,

    /// Cell symbol for columns where the process executed
    pub active_symbol: char,

    /// Cell symbol for every other column
    pub idle_symbol: char,

    /// Process names are padded to this many characters
    pub label_width: usize,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            tick_delta: DEFAULT_TICK_DELTA,
            completion_epsilon: DEFAULT_COMPLETION_EPSILON,
            log_level: "info".to_string(),
            chart: ChartConfig::default(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CHART_WIDTH,
            active_symbol: DEFAULT_ACTIVE_SYMBOL,
            idle_symbol: DEFAULT_IDLE_SYMBOL,
            label_width: DEFAULT_LABEL_WIDTH,
        }
    }
}

impl RaceConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.tick_delta.is_finite() && self.tick_delta > 0.0) {
            return Err(SimError::Config(format!(
                "tick_delta must be positive, got {}",
                self.tick_delta
            )));
        }
        if !(self.completion_epsilon.is_finite() && self.completion_epsilon >= 0.0) {
            return Err(SimError::Config(format!(
                "completion_epsilon must be non-negative, got {}",
                self.completion_epsilon
            )));
        }
        if self.chart.width == 0 {
            return Err(SimError::Config("chart width must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, SimError> {
        let config: RaceConfig =
            toml::from_str(content).map_err(|e| SimError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> Result<String, SimError> {
        toml::to_string_pretty(self).map_err(|e| SimError::Config(e.to_string()))
    }
}
