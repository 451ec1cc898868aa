//! Composite suspicion scoring.
//!
//! Signals accumulate additively per account and the total is capped at
//! 100. High-volume, heavily one-directional accounts (merchant/payroll
//! shape) get a legitimacy override that suppresses the fan-in, fan-out
//! and velocity contributions; cycle and shell contributions are decisive
//! and always apply.

use ringscan_core::config::EngineConfig;
use ringscan_core::detector::DetectorMetadata;
use ringscan_core::types::{AccountId, DetectionResult, Pattern};
use ringscan_detect::smurfing::SmurfingResult;
use ringscan_graph::cycles::Cycle;
use ringscan_graph::graph::TransactionGraph;
use ringscan_graph::rings::RingSet;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Maximum composite score.
const SCORE_CAP: f64 = 100.0;

/// Combines all detector outputs into per-account results.
#[derive(Debug, Clone)]
pub struct SuspicionScoring {
    metadata: DetectorMetadata,
}

impl Default for SuspicionScoring {
    fn default() -> Self {
        Self::new()
    }
}

impl SuspicionScoring {
    /// Create a new scoring stage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("engine/suspicion-scoring")
                .with_description("Additive signal scoring with legitimacy override"),
        }
    }

    /// The scoring stage metadata.
    #[must_use]
    pub fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }

    /// True if the account's volume and direction ratio mark it as a
    /// likely-legitimate merchant or payroll account.
    #[must_use]
    pub fn is_likely_legitimate(
        in_degree: usize,
        out_degree: usize,
        config: &EngineConfig,
    ) -> bool {
        let total = in_degree + out_degree;
        if total <= config.legitimacy_min_total_tx {
            return false;
        }
        let ratio_in = in_degree as f64 / total as f64;
        let ratio_out = out_degree as f64 / total as f64;
        ratio_in > config.legitimacy_ratio_threshold || ratio_out > config.legitimacy_ratio_threshold
    }

    /// Score every account that appears in any detector output.
    ///
    /// Accounts whose final score is zero are excluded entirely. Output
    /// is sorted by score descending, then account id ascending.
    #[must_use]
    pub fn compute(
        graph: &TransactionGraph,
        cycles: &[Cycle],
        rings: &RingSet,
        smurfing: &SmurfingResult,
        shells: &[AccountId],
        velocity: &[AccountId],
        config: &EngineConfig,
    ) -> Vec<DetectionResult> {
        let weights = &config.weights;

        let fan_in: HashSet<&str> = smurfing.fan_in.iter().map(String::as_str).collect();
        let fan_out: HashSet<&str> = smurfing.fan_out.iter().map(String::as_str).collect();
        let shell_set: HashSet<&str> = shells.iter().map(String::as_str).collect();
        let velocity_set: HashSet<&str> = velocity.iter().map(String::as_str).collect();

        // Distinct cycle lengths per ring member, ascending.
        let mut cycle_lengths: HashMap<&str, BTreeSet<usize>> = HashMap::new();
        for cycle in cycles {
            for account in cycle.accounts() {
                cycle_lengths
                    .entry(account.as_str())
                    .or_default()
                    .insert(cycle.len());
            }
        }

        let mut suspects: BTreeSet<&str> = BTreeSet::new();
        for ring in rings.rings() {
            suspects.extend(ring.member_accounts.iter().map(String::as_str));
        }
        suspects.extend(fan_in.iter().copied());
        suspects.extend(fan_out.iter().copied());
        suspects.extend(shell_set.iter().copied());
        suspects.extend(velocity_set.iter().copied());

        let mut results = Vec::new();
        for account in suspects {
            let (in_degree, out_degree) = graph.degrees_of(account);
            let likely_legit = Self::is_likely_legitimate(in_degree, out_degree, config);

            let mut score = 0.0;
            let mut patterns = Vec::new();

            // Cycle membership is decisive regardless of apparent
            // legitimacy.
            let ring_id = rings.ring_of(account).map(str::to_string);
            if ring_id.is_some() {
                score += weights.cycle;
                match cycle_lengths.get(account) {
                    Some(lengths) if !lengths.is_empty() => {
                        for &length in lengths {
                            patterns.push(
                                Pattern::cycle_of_length(length).unwrap_or(Pattern::Cycle),
                            );
                        }
                    }
                    _ => patterns.push(Pattern::Cycle),
                }
            }

            if fan_in.contains(account) && !likely_legit {
                score += weights.fan_in;
                patterns.push(Pattern::FanIn);
            }
            if fan_out.contains(account) && !likely_legit {
                score += weights.fan_out;
                patterns.push(Pattern::FanOut);
            }
            // Shells are low volume by definition; no override.
            if shell_set.contains(account) {
                score += weights.shell;
                patterns.push(Pattern::ShellAccount);
            }
            if velocity_set.contains(account) && !likely_legit {
                score += weights.high_velocity;
                patterns.push(Pattern::HighVelocity);
            }

            let score = score.min(SCORE_CAP);
            if score > 0.0 {
                results.push(DetectionResult {
                    account_id: account.to_string(),
                    suspicion_score: score,
                    detected_patterns: patterns,
                    ring_id,
                });
            }
        }

        results.sort_by(|a, b| {
            b.suspicion_score
                .partial_cmp(&a.suspicion_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.account_id.cmp(&b.account_id))
        });

        tracing::debug!(flagged = results.len(), "scoring complete");
        results
    }
}
