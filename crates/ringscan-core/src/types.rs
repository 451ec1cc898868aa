//! Data model for the RingScan engine.
//!
//! Inputs are immutable [`TransactionRecord`]s; outputs are the
//! [`AnalysisReport`] with scored accounts, consolidated rings, a run
//! summary, and a renderable graph projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An account identifier. Accounts exist implicitly: any identifier that
/// appears as sender or receiver is an account.
pub type AccountId = String;

// ============================================================================
// Input Types
// ============================================================================

/// An immutable financial transaction record.
///
/// Created by the ingestion boundary from validated input; never mutated
/// by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Opaque unique transaction identifier.
    pub transaction_id: String,
    /// Sending account.
    pub sender_id: AccountId,
    /// Receiving account.
    pub receiver_id: AccountId,
    /// Non-negative transaction amount.
    pub amount: f64,
    /// Absolute transaction time.
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    /// Create a record.
    #[must_use]
    pub fn new(
        transaction_id: impl Into<String>,
        sender_id: impl Into<AccountId>,
        receiver_id: impl Into<AccountId>,
        amount: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
            amount,
            timestamp,
        }
    }

    /// True if sender and receiver are the same account.
    #[must_use]
    pub fn is_self_transfer(&self) -> bool {
        self.sender_id == self.receiver_id
    }
}

// ============================================================================
// Detection Types
// ============================================================================

/// A structural fraud pattern attributed to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pattern {
    /// Ring member without a direct per-cycle length attribution.
    #[serde(rename = "cycle")]
    Cycle,
    /// Member of a 3-account cycle.
    #[serde(rename = "cycle_length_3")]
    CycleLength3,
    /// Member of a 4-account cycle.
    #[serde(rename = "cycle_length_4")]
    CycleLength4,
    /// Member of a 5-account cycle.
    #[serde(rename = "cycle_length_5")]
    CycleLength5,
    /// Fan-in convergence point (many senders, one receiver).
    #[serde(rename = "fan_in")]
    FanIn,
    /// Fan-out distribution source (one sender, many receivers).
    #[serde(rename = "fan_out")]
    FanOut,
    /// Low-volume pass-through account.
    #[serde(rename = "shell_account")]
    ShellAccount,
    /// Transaction burst within the velocity window.
    #[serde(rename = "high_velocity")]
    HighVelocity,
}

impl Pattern {
    /// Cycle-membership label for a given cycle length, if one exists.
    #[must_use]
    pub fn cycle_of_length(length: usize) -> Option<Self> {
        match length {
            3 => Some(Pattern::CycleLength3),
            4 => Some(Pattern::CycleLength4),
            5 => Some(Pattern::CycleLength5),
            _ => None,
        }
    }

    /// The label string as it appears in reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Pattern::Cycle => "cycle",
            Pattern::CycleLength3 => "cycle_length_3",
            Pattern::CycleLength4 => "cycle_length_4",
            Pattern::CycleLength5 => "cycle_length_5",
            Pattern::FanIn => "fan_in",
            Pattern::FanOut => "fan_out",
            Pattern::ShellAccount => "shell_account",
            Pattern::HighVelocity => "high_velocity",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-account detection result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// The account.
    pub account_id: AccountId,
    /// Composite suspicion score in [0, 100].
    pub suspicion_score: f64,
    /// Patterns that contributed to the score.
    pub detected_patterns: Vec<Pattern>,
    /// Ring the account belongs to, if any.
    pub ring_id: Option<String>,
}

/// A consolidated fraud ring: a maximal union of cycles sharing accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudRing {
    /// Stable identifier assigned in discovery order (`RING_001`, ...).
    pub ring_id: String,
    /// Member accounts, sorted ascending.
    pub member_accounts: Vec<AccountId>,
    /// Pattern class of the ring. Always "cycle" for consolidated cycles.
    pub pattern_type: String,
    /// Ring risk score: min(99.9, 80 + 2 x member count), one decimal.
    pub risk_score: f64,
}

impl FraudRing {
    /// Build a ring from sorted members, computing the risk score.
    #[must_use]
    pub fn new(ring_id: impl Into<String>, member_accounts: Vec<AccountId>) -> Self {
        let risk = Self::risk_score_for(member_accounts.len());
        Self {
            ring_id: ring_id.into(),
            member_accounts,
            pattern_type: "cycle".to_string(),
            risk_score: risk,
        }
    }

    /// Risk score for a ring of the given size, rounded to one decimal.
    #[must_use]
    pub fn risk_score_for(member_count: usize) -> f64 {
        let raw = (80.0 + 2.0 * member_count as f64).min(99.9);
        (raw * 10.0).round() / 10.0
    }
}

// ============================================================================
// Report Types
// ============================================================================

/// Run-level summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Total distinct accounts in the batch.
    pub total_accounts_analyzed: usize,
    /// Accounts with a nonzero suspicion score.
    pub suspicious_accounts_flagged: usize,
    /// Consolidated fraud rings.
    pub fraud_rings_detected: usize,
    /// Engine wall-clock time, seconds, two decimals.
    pub processing_time_seconds: f64,
}

/// A renderable graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualNode {
    /// Account identifier.
    pub id: AccountId,
    /// Display label.
    pub label: String,
    /// Fill color.
    pub color: String,
    /// Node size (ring members largest).
    pub size: u32,
    /// Tooltip HTML.
    pub title: String,
}

/// Edge color with hover highlight and opacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualEdgeColor {
    /// Base color.
    pub color: String,
    /// Hover highlight color.
    pub highlight: String,
    /// Opacity in [0, 1].
    pub opacity: f64,
}

/// A renderable directed edge (one per transaction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualEdge {
    /// Sender account.
    pub from: AccountId,
    /// Receiver account.
    pub to: AccountId,
    /// Arrow style.
    pub arrows: String,
    /// Edge color.
    pub color: VisualEdgeColor,
    /// Stroke width (cycle edges widest).
    pub width: u32,
    /// Tooltip HTML.
    pub title: String,
    /// Edge label (amount).
    pub label: String,
}

/// The projected presentation model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualGraph {
    /// Nodes, one per account.
    pub nodes: Vec<VisualNode>,
    /// Edges, one per transaction.
    pub edges: Vec<VisualEdge>,
}

/// Full output of one analysis run. All-or-nothing: the engine never
/// partially emits results on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Scored accounts, descending by score.
    pub suspicious_accounts: Vec<DetectionResult>,
    /// Consolidated rings in discovery order.
    pub fraud_rings: Vec<FraudRing>,
    /// Run summary.
    pub summary: AnalysisSummary,
    /// Renderable projection of the graph plus detection results.
    pub graph_visualization: VisualGraph,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tx(id: &str, from: &str, to: &str) -> TransactionRecord {
        TransactionRecord::new(
            id,
            from,
            to,
            100.0,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_self_transfer() {
        assert!(tx("T1", "A", "A").is_self_transfer());
        assert!(!tx("T1", "A", "B").is_self_transfer());
    }

    #[test]
    fn test_pattern_labels() {
        assert_eq!(Pattern::CycleLength3.as_str(), "cycle_length_3");
        assert_eq!(Pattern::FanIn.as_str(), "fan_in");
        assert_eq!(Pattern::ShellAccount.as_str(), "shell_account");
        assert_eq!(Pattern::cycle_of_length(4), Some(Pattern::CycleLength4));
        assert_eq!(Pattern::cycle_of_length(6), None);
    }

    #[test]
    fn test_pattern_serialization() {
        let json = serde_json::to_string(&Pattern::HighVelocity).unwrap();
        assert_eq!(json, "\"high_velocity\"");
        let back: Pattern = serde_json::from_str("\"cycle_length_5\"").unwrap();
        assert_eq!(back, Pattern::CycleLength5);
    }

    #[test]
    fn test_ring_risk_score() {
        // 3 members: 80 + 6 = 86.0
        assert_eq!(FraudRing::risk_score_for(3), 86.0);
        // 10 members hits the ceiling: min(99.9, 100) = 99.9
        assert_eq!(FraudRing::risk_score_for(10), 99.9);
        assert_eq!(FraudRing::risk_score_for(50), 99.9);
    }

    #[test]
    fn test_ring_constructor() {
        let ring = FraudRing::new("RING_001", vec!["A".into(), "B".into(), "C".into()]);
        assert_eq!(ring.pattern_type, "cycle");
        assert_eq!(ring.risk_score, 86.0);
    }

    #[test]
    fn test_report_serialization() {
        let report = AnalysisReport {
            suspicious_accounts: vec![DetectionResult {
                account_id: "A".into(),
                suspicion_score: 40.0,
                detected_patterns: vec![Pattern::CycleLength3],
                ring_id: Some("RING_001".into()),
            }],
            fraud_rings: vec![FraudRing::new("RING_001", vec!["A".into()])],
            summary: AnalysisSummary {
                total_accounts_analyzed: 3,
                suspicious_accounts_flagged: 1,
                fraud_rings_detected: 1,
                processing_time_seconds: 0.01,
            },
            graph_visualization: VisualGraph {
                nodes: vec![],
                edges: vec![],
            },
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["suspicious_accounts"][0]["suspicion_score"], 40.0);
        assert_eq!(
            json["suspicious_accounts"][0]["detected_patterns"][0],
            "cycle_length_3"
        );
        assert_eq!(json["fraud_rings"][0]["pattern_type"], "cycle");
    }
}
