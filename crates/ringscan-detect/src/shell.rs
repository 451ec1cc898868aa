//! Shell / pass-through account classification.
//!
//! Pure per-account function of (in-degree, out-degree), counting every
//! transaction rather than distinct counterparties. No temporal
//! dimension.

use async_trait::async_trait;
use ringscan_core::detector::{BatchDetector, Detector, DetectorMetadata};
use ringscan_core::error::Result;
use ringscan_core::types::{AccountId, TransactionRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Input for shell classification.
#[derive(Debug, Clone)]
pub struct ShellDetectionInput {
    /// The shared record batch.
    pub records: Arc<Vec<TransactionRecord>>,
    /// Maximum total degree (in + out) for a shell classification.
    pub max_total_degree: usize,
}

impl ShellDetectionInput {
    /// Create a new input.
    #[must_use]
    pub fn new(records: Arc<Vec<TransactionRecord>>, max_total_degree: usize) -> Self {
        Self {
            records,
            max_total_degree,
        }
    }
}

/// Output of shell classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShellDetectionOutput {
    /// Shell accounts, sorted ascending.
    pub shells: Vec<AccountId>,
}

/// Classifier for low-volume pass-through accounts.
#[derive(Debug, Clone)]
pub struct ShellDetection {
    metadata: DetectorMetadata,
}

impl Default for ShellDetection {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellDetection {
    /// Create a new shell detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("detect/shell-accounts")
                .with_description("Low-degree bidirectional pass-through classification"),
        }
    }

    /// Classify a single account from its multi-edge degrees.
    #[must_use]
    pub fn classify(in_degree: usize, out_degree: usize, max_total_degree: usize) -> bool {
        in_degree > 0 && out_degree > 0 && in_degree + out_degree <= max_total_degree
    }

    /// Find all shell accounts in the batch.
    #[must_use]
    pub fn compute(records: &[TransactionRecord], max_total_degree: usize) -> Vec<AccountId> {
        let mut degrees: HashMap<&str, (usize, usize)> = HashMap::new();
        for record in records {
            degrees.entry(record.sender_id.as_str()).or_default().1 += 1;
            degrees.entry(record.receiver_id.as_str()).or_default().0 += 1;
        }

        let mut shells: Vec<AccountId> = degrees
            .into_iter()
            .filter(|&(_, (d_in, d_out))| Self::classify(d_in, d_out, max_total_degree))
            .map(|(account, _)| account.to_string())
            .collect();
        shells.sort();
        shells
    }
}

impl Detector for ShellDetection {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}

#[async_trait]
impl BatchDetector<ShellDetectionInput, ShellDetectionOutput> for ShellDetection {
    async fn execute(&self, input: ShellDetectionInput) -> Result<ShellDetectionOutput> {
        let shells = Self::compute(&input.records, input.max_total_degree);
        Ok(ShellDetectionOutput { shells })
    }
}
