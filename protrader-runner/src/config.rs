//! Application configuration (TOML).
//!
//! ```toml
//! [engine]
//! policy = "weighted_score"
//!
//! [engine.decision]
//! ema_tie_break = "down"
//!
//! [ml]
//! weight = 0.3
//! weights = [0.8, -0.02, 0.5, 0.1]
//! bias = 0.0
//!
//! [data]
//! timeframes = ["5m", "15m", "1d"]
//! max_bars = 150
//! ```
//!
//! Every section is optional; an empty file yields the reference engine
//! with no model.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use protrader_core::components::LogisticModel;
use protrader_core::engine::{EngineConfig, SignalEngine};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Logistic confidence model and its share of the blended confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlConfig {
    #[serde(default = "default_ml_weight")]
    pub weight: f64,
    /// Coefficients for `[macd, rsi, sma_spread, price_change]`.
    pub weights: [f64; 4],
    #[serde(default)]
    pub bias: f64,
}

fn default_ml_weight() -> f64 {
    0.3
}

impl MlConfig {
    pub fn model(&self) -> LogisticModel {
        LogisticModel {
            weights: self.weights,
            bias: self.bias,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Timeframes evaluated by the consensus command when none are given.
    pub timeframes: Vec<String>,
    /// Analyze only the most recent `max_bars` bars of each input.
    pub max_bars: Option<usize>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            timeframes: ["1m", "5m", "15m", "60m", "1d"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_bars: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub ml: Option<MlConfig>,
    pub data: DataConfig,
}

impl AppConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate().map_err(ConfigError::Invalid)?;
        if let Some(ml) = &self.ml {
            if !(0.0..=1.0).contains(&ml.weight) {
                return Err(ConfigError::Invalid(format!(
                    "ml.weight must be in [0, 1], got {}",
                    ml.weight
                )));
            }
            if ml.weights.iter().chain([&ml.bias]).any(|w| !w.is_finite()) {
                return Err(ConfigError::Invalid("ml coefficients must be finite".into()));
            }
        }
        if self.data.max_bars == Some(0) {
            return Err(ConfigError::Invalid("data.max_bars must be >= 1".into()));
        }
        Ok(())
    }

    /// Build the engine this config describes.
    pub fn build_engine(&self) -> SignalEngine {
        let engine = SignalEngine::new(self.engine.clone());
        match &self.ml {
            Some(ml) => engine.with_model(ml.model(), ml.weight),
            None => engine,
        }
    }
}
