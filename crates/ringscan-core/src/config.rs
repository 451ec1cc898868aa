//! Engine configuration.
//!
//! Every threshold the detectors use is carried here rather than hardcoded
//! at call sites, so callers can override any of them per analysis run.
//! `Default` carries the production values.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Per-signal score contributions for the composite suspicion score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Membership in a detected ring (cycle participant).
    pub cycle: f64,
    /// Fan-in convergence point.
    pub fan_in: f64,
    /// Fan-out distribution source.
    pub fan_out: f64,
    /// Shell / pass-through account.
    pub shell: f64,
    /// High transaction velocity.
    pub high_velocity: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            cycle: 40.0,
            fan_in: 25.0,
            fan_out: 25.0,
            shell: 20.0,
            high_velocity: 10.0,
        }
    }
}

/// Configuration for a full analysis run.
///
/// Window bounds are inclusive: a transaction at exactly `window_hours`
/// after the window anchor still counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum cycle length considered a fraud loop.
    pub cycle_min_length: usize,
    /// Maximum cycle length searched for (hard DFS depth bound).
    pub cycle_max_length: usize,
    /// Sliding window for fan-in/fan-out detection, in hours.
    pub smurfing_window_hours: i64,
    /// Distinct counterparties required inside one window.
    pub smurfing_min_counterparties: usize,
    /// Per-direction transaction count below which an account is skipped
    /// (necessary condition, avoids the window scan).
    pub smurfing_min_transactions: usize,
    /// Sliding window for velocity detection, in hours.
    pub velocity_window_hours: i64,
    /// Transactions (as sender or receiver) inside one window that flag
    /// an account as high velocity.
    pub velocity_min_transactions: usize,
    /// Maximum total degree (in + out, counting every transaction) for a
    /// shell classification.
    pub shell_max_total_degree: usize,
    /// Minimum total transaction count before the legitimacy override is
    /// considered.
    pub legitimacy_min_total_tx: usize,
    /// One-directional ratio above which a high-volume account is treated
    /// as likely legitimate (merchant / payroll).
    pub legitimacy_ratio_threshold: f64,
    /// Per-signal score contributions.
    pub weights: ScoreWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cycle_min_length: 3,
            cycle_max_length: 5,
            smurfing_window_hours: 72,
            smurfing_min_counterparties: 10,
            smurfing_min_transactions: 10,
            velocity_window_hours: 72,
            velocity_min_transactions: 5,
            shell_max_total_degree: 3,
            legitimacy_min_total_tx: 20,
            legitimacy_ratio_threshold: 0.9,
            weights: ScoreWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Create a configuration with the default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cycle length bounds.
    #[must_use]
    pub fn with_cycle_lengths(mut self, min: usize, max: usize) -> Self {
        self.cycle_min_length = min;
        self.cycle_max_length = max;
        self
    }

    /// Set the smurfing window in hours.
    #[must_use]
    pub fn with_smurfing_window_hours(mut self, hours: i64) -> Self {
        self.smurfing_window_hours = hours;
        self
    }

    /// Set the distinct-counterparty threshold for smurfing.
    #[must_use]
    pub fn with_smurfing_min_counterparties(mut self, count: usize) -> Self {
        self.smurfing_min_counterparties = count;
        self
    }

    /// Set the velocity window in hours.
    #[must_use]
    pub fn with_velocity_window_hours(mut self, hours: i64) -> Self {
        self.velocity_window_hours = hours;
        self
    }

    /// Set the velocity transaction-count threshold.
    #[must_use]
    pub fn with_velocity_min_transactions(mut self, count: usize) -> Self {
        self.velocity_min_transactions = count;
        self
    }

    /// Set the maximum total degree for shell classification.
    #[must_use]
    pub fn with_shell_max_total_degree(mut self, degree: usize) -> Self {
        self.shell_max_total_degree = degree;
        self
    }

    /// Set the legitimacy override thresholds.
    #[must_use]
    pub fn with_legitimacy(mut self, min_total_tx: usize, ratio_threshold: f64) -> Self {
        self.legitimacy_min_total_tx = min_total_tx;
        self.legitimacy_ratio_threshold = ratio_threshold;
        self
    }

    /// Set the per-signal score weights.
    #[must_use]
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.cycle_min_length < 2 {
            return Err(EngineError::config(format!(
                "cycle_min_length must be at least 2, got {}",
                self.cycle_min_length
            )));
        }
        if self.cycle_min_length > self.cycle_max_length {
            return Err(EngineError::config(format!(
                "cycle_min_length {} exceeds cycle_max_length {}",
                self.cycle_min_length, self.cycle_max_length
            )));
        }
        if self.smurfing_window_hours <= 0 || self.velocity_window_hours <= 0 {
            return Err(EngineError::config(
                "detection windows must be positive".to_string(),
            ));
        }
        if self.smurfing_min_counterparties == 0 || self.velocity_min_transactions == 0 {
            return Err(EngineError::config(
                "detection thresholds must be nonzero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.legitimacy_ratio_threshold) {
            return Err(EngineError::config(format!(
                "legitimacy_ratio_threshold must be in [0, 1], got {}",
                self.legitimacy_ratio_threshold
            )));
        }
        Ok(())
    }

    /// Smurfing window as a chrono duration.
    #[must_use]
    pub fn smurfing_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.smurfing_window_hours)
    }

    /// Velocity window as a chrono duration.
    #[must_use]
    pub fn velocity_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.velocity_window_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = EngineConfig::default();
        assert_eq!(config.cycle_min_length, 3);
        assert_eq!(config.cycle_max_length, 5);
        assert_eq!(config.smurfing_window_hours, 72);
        assert_eq!(config.smurfing_min_counterparties, 10);
        assert_eq!(config.velocity_min_transactions, 5);
        assert_eq!(config.shell_max_total_degree, 3);
        assert_eq!(config.legitimacy_min_total_tx, 20);
        assert!((config.legitimacy_ratio_threshold - 0.9).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_weights() {
        let weights = ScoreWeights::default();
        assert_eq!(weights.cycle, 40.0);
        assert_eq!(weights.fan_in, 25.0);
        assert_eq!(weights.fan_out, 25.0);
        assert_eq!(weights.shell, 20.0);
        assert_eq!(weights.high_velocity, 10.0);
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::new()
            .with_cycle_lengths(3, 4)
            .with_smurfing_window_hours(24)
            .with_velocity_min_transactions(8);

        assert_eq!(config.cycle_max_length, 4);
        assert_eq!(config.smurfing_window_hours, 24);
        assert_eq!(config.velocity_min_transactions, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_cycle_bounds() {
        let config = EngineConfig::new().with_cycle_lengths(5, 3);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_ratio() {
        let config = EngineConfig::new().with_legitimacy(20, 1.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
