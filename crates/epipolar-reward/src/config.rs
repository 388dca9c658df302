//! Metric configuration.

use crate::RewardError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Weights of the linear reward `lm_tp * tp + lm_fp * fp + lm_kp * n_kps`.
///
/// # Example
///
/// ```
/// use epipolar_reward::RewardWeights;
///
/// let w = RewardWeights::default();
/// assert_eq!(w.reward(2.0, 1.0, 100.0), 1.75);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardWeights {
    /// Weight of the total keypoint count (neutral by default).
    pub lm_kp: f64,
    /// Weight of each consistent correspondence.
    pub lm_tp: f64,
    /// Weight of each inconsistent correspondence (a penalty by default).
    pub lm_fp: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            lm_kp: 0.0,
            lm_tp: 1.0,
            lm_fp: -0.25,
        }
    }
}

impl RewardWeights {
    /// Linear scalarization of one pair's counts. No normalization.
    #[inline]
    pub fn reward(&self, tp: f64, fp: f64, n_kps: f64) -> f64 {
        self.lm_tp * tp + self.lm_fp * fp + self.lm_kp * n_kps
    }
}

/// Configuration of [`DiscreteMetric`](crate::DiscreteMetric).
///
/// Missing JSON fields fall back to their defaults, so `{"threshold": 1.0}`
/// is a complete configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Epipolar distance bound in pixels; a correspondence passes only if
    /// both directional distances are strictly below it.
    pub threshold: f64,
    #[serde(flatten)]
    pub weights: RewardWeights,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            threshold: 2.0,
            weights: RewardWeights::default(),
        }
    }
}

impl RewardConfig {
    /// Reject a negative or non-finite threshold and non-finite weights.
    pub fn validate(&self) -> Result<(), RewardError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(RewardError::InvalidConfig(format!(
                "threshold must be finite and non-negative, got {}",
                self.threshold
            )));
        }
        let w = &self.weights;
        for (name, value) in [("lm_kp", w.lm_kp), ("lm_tp", w.lm_tp), ("lm_fp", w.lm_fp)] {
            if !value.is_finite() {
                return Err(RewardError::InvalidConfig(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, RewardError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json_str(&data).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn to_json(&self) -> Result<String, RewardError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RewardConfig::default();
        assert_eq!(config.threshold, 2.0);
        assert_eq!(config.weights.lm_kp, 0.0);
        assert_eq!(config.weights.lm_tp, 1.0);
        assert_eq!(config.weights.lm_fp, -0.25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = RewardConfig::from_json_str(r#"{"threshold": 1.5, "lm_fp": -1.0}"#).unwrap();
        assert_eq!(config.threshold, 1.5);
        assert_eq!(config.weights.lm_fp, -1.0);
        assert_eq!(config.weights.lm_tp, 1.0);
        assert_eq!(config.weights.lm_kp, 0.0);
    }

    #[test]
    fn rejects_negative_threshold() {
        let err = RewardConfig::from_json_str(r#"{"threshold": -0.1}"#).unwrap_err();
        assert!(matches!(err, RewardError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = RewardConfig::from_json_str("{threshold: 1").unwrap_err();
        assert!(matches!(err, RewardError::ConfigParse(_)));
    }

    #[test]
    fn rejects_non_finite_weight() {
        let config = RewardConfig {
            weights: RewardWeights {
                lm_tp: f64::INFINITY,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_roundtrip_is_flat() {
        let config = RewardConfig {
            threshold: 3.0,
            weights: RewardWeights {
                lm_kp: 0.01,
                lm_tp: 2.0,
                lm_fp: -0.5,
            },
        };
        let json = config.to_json().unwrap();
        assert!(json.contains("\"lm_kp\""));
        assert_eq!(RewardConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn load_json_reports_missing_file() {
        let err = RewardConfig::load_json("/nonexistent/reward.json").unwrap_err();
        assert!(err.to_string().contains("reading"));
    }
}
