//! Serializable engine configuration.
//!
//! Every knob the engine exposes lives here with the documented default, so
//! a config file only needs to name what it changes. The content hash ties a
//! result back to the exact configuration that produced it.

use serde::{Deserialize, Serialize};

/// Unique identifier for an engine configuration (content-addressable hash).
pub type ConfigId = String;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub backtest: BacktestConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub regression: RegressionConfig,
}

impl EngineConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two identical configs share a ConfigId, so cached or exported results
    /// can be matched to the parameters that produced them.
    pub fn config_id(&self) -> ConfigId {
        let json = serde_json::to_string(self).expect("EngineConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

/// RSI mean-reversion backtest parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestConfig {
    /// Go long below this RSI level.
    #[serde(default = "default_oversold")]
    pub oversold: f64,

    /// Go short above this RSI level.
    #[serde(default = "default_overbought")]
    pub overbought: f64,
}

fn default_oversold() -> f64 {
    30.0
}

fn default_overbought() -> f64 {
    70.0
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            oversold: default_oversold(),
            overbought: default_overbought(),
        }
    }
}

/// Monte Carlo simulation parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    /// Number of future periods to simulate per path.
    #[serde(default = "default_days")]
    pub days: usize,

    /// Number of independent paths.
    #[serde(default = "default_paths")]
    pub paths: usize,
}

fn default_days() -> usize {
    30
}

fn default_paths() -> usize {
    1000
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            days: default_days(),
            paths: default_paths(),
        }
    }
}

/// Portfolio optimizer parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizerConfig {
    /// Number of random-weight trials.
    #[serde(default = "default_trials")]
    pub trials: usize,

    /// Annual risk-free rate used in the Sharpe ratio.
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
}

fn default_trials() -> usize {
    2000
}

fn default_risk_free_rate() -> f64 {
    0.04
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            risk_free_rate: default_risk_free_rate(),
        }
    }
}

/// Factor regression parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegressionConfig {
    /// Minimum overlapping rows required to fit a model.
    #[serde(default = "default_min_overlap")]
    pub min_overlap: usize,
}

fn default_min_overlap() -> usize {
    60
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            min_overlap: default_min_overlap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.backtest.oversold, 30.0);
        assert_eq!(cfg.backtest.overbought, 70.0);
        assert_eq!(cfg.simulation.days, 30);
        assert_eq!(cfg.simulation.paths, 1000);
        assert_eq!(cfg.optimizer.trials, 2000);
        assert_eq!(cfg.optimizer.risk_free_rate, 0.04);
        assert_eq!(cfg.regression.min_overlap, 60);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            [simulation]
            paths = 250

            [optimizer]
            trials = 500
            "#,
        )
        .unwrap();
        assert_eq!(cfg.simulation.paths, 250);
        assert_eq!(cfg.simulation.days, 30);
        assert_eq!(cfg.optimizer.trials, 500);
        assert_eq!(cfg.optimizer.risk_free_rate, 0.04);
        assert_eq!(cfg.backtest, BacktestConfig::default());
    }

    #[test]
    fn empty_toml_is_the_default_config() {
        let cfg = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn config_id_is_stable_and_content_sensitive() {
        let a = EngineConfig::default();
        let b = EngineConfig::default();
        assert_eq!(a.config_id(), b.config_id());

        let mut c = EngineConfig::default();
        c.optimizer.trials = 5000;
        assert_ne!(a.config_id(), c.config_id());
    }

    #[test]
    fn toml_roundtrip_preserves_config_id() {
        let mut cfg = EngineConfig::default();
        cfg.simulation.days = 60;
        let text = toml::to_string(&cfg).unwrap();
        let back = EngineConfig::from_toml_str(&text).unwrap();
        assert_eq!(cfg.config_id(), back.config_id());
    }
}
