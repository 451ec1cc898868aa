//! Fan-in / fan-out (smurfing) detection.
//!
//! An account is a fan-in target when at least `min_counterparties`
//! distinct senders reach it within some sliding window; fan-out is the
//! symmetric condition over receivers. The window bound is inclusive at
//! both ends. The check is an existence check: the scan for an account
//! stops at the first qualifying window.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use ringscan_core::detector::{BatchDetector, Detector, DetectorMetadata};
use ringscan_core::error::{EngineError, Result};
use ringscan_core::types::{AccountId, TransactionRecord};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Input for smurfing detection.
#[derive(Debug, Clone)]
pub struct SmurfingDetectionInput {
    /// The shared record batch.
    pub records: Arc<Vec<TransactionRecord>>,
    /// Sliding window size in hours.
    pub window_hours: i64,
    /// Distinct counterparties required inside one window.
    pub min_counterparties: usize,
    /// Per-direction transaction count below which an account is skipped.
    pub min_transactions: usize,
}

impl SmurfingDetectionInput {
    /// Create a new input.
    #[must_use]
    pub fn new(
        records: Arc<Vec<TransactionRecord>>,
        window_hours: i64,
        min_counterparties: usize,
        min_transactions: usize,
    ) -> Self {
        Self {
            records,
            window_hours,
            min_counterparties,
            min_transactions,
        }
    }
}

/// Accounts flagged per direction, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmurfingResult {
    /// Convergence targets (many senders, one receiver).
    pub fan_in: Vec<AccountId>,
    /// Distribution sources (one sender, many receivers).
    pub fan_out: Vec<AccountId>,
}

impl SmurfingResult {
    /// True if the account was flagged as a fan-in target.
    #[must_use]
    pub fn is_fan_in(&self, account: &str) -> bool {
        self.fan_in.iter().any(|a| a == account)
    }

    /// True if the account was flagged as a fan-out source.
    #[must_use]
    pub fn is_fan_out(&self, account: &str) -> bool {
        self.fan_out.iter().any(|a| a == account)
    }
}

/// Sliding-window fan-in/fan-out detector.
#[derive(Debug, Clone)]
pub struct SmurfingDetection {
    metadata: DetectorMetadata,
}

impl Default for SmurfingDetection {
    fn default() -> Self {
        Self::new()
    }
}

impl SmurfingDetection {
    /// Create a new smurfing detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("detect/smurfing")
                .with_description("Windowed fan-in/fan-out counterparty convergence"),
        }
    }

    /// Detect fan-in and fan-out accounts.
    #[must_use]
    pub fn compute(
        records: &[TransactionRecord],
        window_hours: i64,
        min_counterparties: usize,
        min_transactions: usize,
    ) -> SmurfingResult {
        let window = Duration::hours(window_hours);

        // Fan-in: group by receiver, counterparty is the sender.
        let mut by_receiver: HashMap<&str, Vec<(DateTime<Utc>, &str)>> = HashMap::new();
        // Fan-out: group by sender, counterparty is the receiver.
        let mut by_sender: HashMap<&str, Vec<(DateTime<Utc>, &str)>> = HashMap::new();

        for record in records {
            by_receiver
                .entry(record.receiver_id.as_str())
                .or_default()
                .push((record.timestamp, record.sender_id.as_str()));
            by_sender
                .entry(record.sender_id.as_str())
                .or_default()
                .push((record.timestamp, record.receiver_id.as_str()));
        }

        let fan_in = flagged_accounts(by_receiver, window, min_counterparties, min_transactions);
        let fan_out = flagged_accounts(by_sender, window, min_counterparties, min_transactions);

        tracing::debug!(
            fan_in = fan_in.len(),
            fan_out = fan_out.len(),
            "smurfing scan complete"
        );
        SmurfingResult { fan_in, fan_out }
    }
}

/// Existence check per account: does any window anchored at one of its
/// transactions hold `min_counterparties` distinct counterparties?
fn flagged_accounts(
    groups: HashMap<&str, Vec<(DateTime<Utc>, &str)>>,
    window: Duration,
    min_counterparties: usize,
    min_transactions: usize,
) -> Vec<AccountId> {
    let mut flagged = Vec::new();

    for (account, mut entries) in groups {
        // Necessary but not sufficient; skips the window scan entirely.
        if entries.len() < min_transactions {
            continue;
        }
        entries.sort_by_key(|(timestamp, _)| *timestamp);

        'windows: for i in 0..entries.len() {
            let bound = entries[i].0 + window;
            let mut counterparties: HashSet<&str> = HashSet::new();
            for &(timestamp, counterparty) in &entries[i..] {
                if timestamp > bound {
                    break;
                }
                counterparties.insert(counterparty);
                if counterparties.len() >= min_counterparties {
                    flagged.push(account.to_string());
                    break 'windows;
                }
            }
        }
    }

    flagged.sort();
    flagged
}

impl Detector for SmurfingDetection {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}

#[async_trait]
impl BatchDetector<SmurfingDetectionInput, SmurfingResult> for SmurfingDetection {
    async fn execute(&self, input: SmurfingDetectionInput) -> Result<SmurfingResult> {
        self.validate_input(&input)?;
        Ok(Self::compute(
            &input.records,
            input.window_hours,
            input.min_counterparties,
            input.min_transactions,
        ))
    }

    fn validate_input(&self, input: &SmurfingDetectionInput) -> Result<()> {
        if input.window_hours <= 0 {
            return Err(EngineError::validation("smurfing window must be positive"));
        }
        if input.min_counterparties == 0 {
            return Err(EngineError::validation(
                "counterparty threshold must be nonzero",
            ));
        }
        Ok(())
    }
}
