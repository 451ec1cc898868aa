//! Transaction velocity detection.
//!
//! An account is flagged when it participates in `min_transactions`
//! transactions within one sliding window, counting both directions. A
//! self-transfer contributes one timestamp per role. The check uses the
//! span of `min_transactions` consecutive timestamps, which is equivalent
//! to a fixed-count sliding window.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use ringscan_core::detector::{BatchDetector, Detector, DetectorMetadata};
use ringscan_core::error::{EngineError, Result};
use ringscan_core::types::{AccountId, TransactionRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Input for velocity detection.
#[derive(Debug, Clone)]
pub struct VelocityDetectionInput {
    /// The shared record batch.
    pub records: Arc<Vec<TransactionRecord>>,
    /// Sliding window size in hours.
    pub window_hours: i64,
    /// Transactions inside one window that flag the account.
    pub min_transactions: usize,
}

impl VelocityDetectionInput {
    /// Create a new input.
    #[must_use]
    pub fn new(
        records: Arc<Vec<TransactionRecord>>,
        window_hours: i64,
        min_transactions: usize,
    ) -> Self {
        Self {
            records,
            window_hours,
            min_transactions,
        }
    }
}

/// Output of velocity detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VelocityDetectionOutput {
    /// High-velocity accounts, sorted ascending.
    pub flagged: Vec<AccountId>,
}

/// Fixed-count sliding-window burst detector.
#[derive(Debug, Clone)]
pub struct VelocityDetection {
    metadata: DetectorMetadata,
}

impl Default for VelocityDetection {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityDetection {
    /// Create a new velocity detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("detect/velocity")
                .with_description("Transaction-burst detection over both directions"),
        }
    }

    /// Find all accounts with a qualifying burst.
    #[must_use]
    pub fn compute(
        records: &[TransactionRecord],
        window_hours: i64,
        min_transactions: usize,
    ) -> Vec<AccountId> {
        let window = Duration::hours(window_hours);
        let mut involvement: HashMap<&str, Vec<DateTime<Utc>>> = HashMap::new();

        for record in records {
            involvement
                .entry(record.sender_id.as_str())
                .or_default()
                .push(record.timestamp);
            involvement
                .entry(record.receiver_id.as_str())
                .or_default()
                .push(record.timestamp);
        }

        let mut flagged = Vec::new();
        for (account, mut timestamps) in involvement {
            if timestamps.len() < min_transactions {
                continue;
            }
            timestamps.sort();
            let qualifies = timestamps
                .windows(min_transactions)
                .any(|w| w[min_transactions - 1] - w[0] <= window);
            if qualifies {
                flagged.push(account.to_string());
            }
        }

        flagged.sort();
        tracing::debug!(flagged = flagged.len(), "velocity scan complete");
        flagged
    }
}

impl Detector for VelocityDetection {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}

#[async_trait]
impl BatchDetector<VelocityDetectionInput, VelocityDetectionOutput> for VelocityDetection {
    async fn execute(&self, input: VelocityDetectionInput) -> Result<VelocityDetectionOutput> {
        self.validate_input(&input)?;
        let flagged = Self::compute(&input.records, input.window_hours, input.min_transactions);
        Ok(VelocityDetectionOutput { flagged })
    }

    fn validate_input(&self, input: &VelocityDetectionInput) -> Result<()> {
        if input.window_hours <= 0 {
            return Err(EngineError::validation("velocity window must be positive"));
        }
        if input.min_transactions == 0 {
            return Err(EngineError::validation(
                "velocity threshold must be nonzero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap() + Duration::hours(hour)
    }

    fn tx(id: &str, from: &str, to: &str, hour: i64) -> TransactionRecord {
        TransactionRecord::new(id, from, to, 100.0, at(hour))
    }

    #[test]
    fn test_burst_as_sender() {
        let records: Vec<TransactionRecord> = (0..5)
            .map(|i| tx(&format!("T{i}"), "X", &format!("R{i}"), i))
            .collect();
        let flagged = VelocityDetection::compute(&records, 72, 5);
        assert_eq!(flagged, ["X"]);
    }

    #[test]
    fn test_both_directions_count() {
        // X sends 3 times and receives twice within the window.
        let records = vec![
            tx("T1", "X", "A", 0),
            tx("T2", "X", "B", 1),
            tx("T3", "X", "C", 2),
            tx("T4", "D", "X", 3),
            tx("T5", "E", "X", 4),
        ];
        let flagged = VelocityDetection::compute(&records, 72, 5);
        assert_eq!(flagged, ["X"]);
    }

    #[test]
    fn test_below_threshold() {
        let records: Vec<TransactionRecord> = (0..4)
            .map(|i| tx(&format!("T{i}"), "X", &format!("R{i}"), i))
            .collect();
        let flagged = VelocityDetection::compute(&records, 72, 5);
        assert!(flagged.is_empty());
    }

    #[test]
    fn test_span_bound_is_inclusive() {
        // Five timestamps spanning exactly 72 hours.
        let records: Vec<TransactionRecord> = (0..5)
            .map(|i| tx(&format!("T{i}"), "X", &format!("R{i}"), i * 18))
            .collect();
        let flagged = VelocityDetection::compute(&records, 72, 5);
        assert_eq!(flagged, ["X"]);
    }

    #[test]
    fn test_spread_out_not_flagged() {
        // One transaction a week: no 5-burst inside 72 hours.
        let records: Vec<TransactionRecord> = (0..6)
            .map(|i| tx(&format!("T{i}"), "X", &format!("R{i}"), i * 168))
            .collect();
        let flagged = VelocityDetection::compute(&records, 72, 5);
        assert!(flagged.is_empty());
    }

    #[test]
    fn test_burst_inside_long_history() {
        // Sparse history with a dense burst in the middle.
        let mut records: Vec<TransactionRecord> = (0..3)
            .map(|i| tx(&format!("S{i}"), "X", "A", i * 500))
            .collect();
        for i in 0..5 {
            records.push(tx(&format!("B{i}"), "X", "A", 1000 + i));
        }
        let flagged = VelocityDetection::compute(&records, 72, 5);
        assert!(flagged.contains(&"X".to_string()));
    }

    #[test]
    fn test_self_transfer_counts_both_roles() {
        // Three self-transfers give 6 participations for X.
        let records = vec![
            tx("T1", "X", "X", 0),
            tx("T2", "X", "X", 1),
            tx("T3", "X", "X", 2),
        ];
        let flagged = VelocityDetection::compute(&records, 72, 5);
        assert_eq!(flagged, ["X"]);
    }

    #[test]
    fn test_empty_batch() {
        assert!(VelocityDetection::compute(&[], 72, 5).is_empty());
    }

    #[tokio::test]
    async fn test_batch_execute() {
        let records: Vec<TransactionRecord> = (0..5)
            .map(|i| tx(&format!("T{i}"), "X", &format!("R{i}"), i))
            .collect();
        let detector = VelocityDetection::new();
        let output = detector
            .execute(VelocityDetectionInput::new(Arc::new(records), 72, 5))
            .await
            .unwrap();
        assert_eq!(output.flagged, ["X"]);
    }
}
