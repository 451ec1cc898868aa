//! Projection of the graph and detection results into a renderable
//! node/edge model.
//!
//! Purely mechanical: visual priority is ring membership, then flagged,
//! then normal; edges that close a detected cycle (by (from, to) pair)
//! are highlighted. No detection logic lives here.

use ringscan_core::detector::DetectorMetadata;
use ringscan_core::types::{
    DetectionResult, VisualEdge, VisualEdgeColor, VisualGraph, VisualNode,
};
use ringscan_graph::cycles::Cycle;
use ringscan_graph::graph::TransactionGraph;
use ringscan_graph::rings::RingSet;
use std::collections::{HashMap, HashSet};

const RING_COLOR: &str = "#f59e0b";
const FLAGGED_COLOR: &str = "#ef4444";
const NORMAL_COLOR: &str = "#3b82f6";
const FAINT_EDGE_COLOR: &str = "rgba(255, 255, 255, 0.2)";

const RING_NODE_SIZE: u32 = 35;
const FLAGGED_NODE_SIZE: u32 = 25;
const NORMAL_NODE_SIZE: u32 = 15;

/// Projects an analysis run into a presentation model.
#[derive(Debug, Clone)]
pub struct GraphProjection {
    metadata: DetectorMetadata,
}

impl Default for GraphProjection {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphProjection {
    /// Create a new projection stage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("engine/graph-projection")
                .with_description("Node/edge presentation model with signal priority"),
        }
    }

    /// The projection stage metadata.
    #[must_use]
    pub fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }

    /// Project the graph plus detection results.
    ///
    /// Deterministic and side-effect free: nodes follow the graph's
    /// first-appearance order, edges follow record order.
    #[must_use]
    pub fn compute(
        graph: &TransactionGraph,
        scored: &[DetectionResult],
        rings: &RingSet,
        cycles: &[Cycle],
    ) -> VisualGraph {
        let by_account: HashMap<&str, &DetectionResult> = scored
            .iter()
            .map(|result| (result.account_id.as_str(), result))
            .collect();

        // Directed pairs that close any detected cycle, independent of
        // which parallel transaction did so.
        let mut cycle_pairs: HashSet<(&str, &str)> = HashSet::new();
        for cycle in cycles {
            cycle_pairs.extend(cycle.edge_pairs());
        }

        let nodes = graph
            .accounts()
            .iter()
            .map(|account| {
                let in_ring = rings.is_member(account);
                let result = by_account.get(account.as_str());

                let (color, size) = if in_ring {
                    (RING_COLOR, RING_NODE_SIZE)
                } else if result.is_some() {
                    (FLAGGED_COLOR, FLAGGED_NODE_SIZE)
                } else {
                    (NORMAL_COLOR, NORMAL_NODE_SIZE)
                };

                let title = match result {
                    Some(result) => {
                        let patterns: Vec<&str> = result
                            .detected_patterns
                            .iter()
                            .map(|p| p.as_str())
                            .collect();
                        format!(
                            "<b>{}</b><br>Score: {}<br>Patterns: {}",
                            account,
                            result.suspicion_score,
                            patterns.join(", ")
                        )
                    }
                    None => format!("<b>{account}</b><br>Status: Normal"),
                };

                VisualNode {
                    id: account.clone(),
                    label: account.clone(),
                    color: color.to_string(),
                    size,
                    title,
                }
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| {
                let from = graph.account(edge.from);
                let to = graph.account(edge.to);
                let in_cycle = cycle_pairs.contains(&(from, to));

                let (color, width, opacity) = if in_cycle {
                    (RING_COLOR, 3, 1.0)
                } else {
                    (FAINT_EDGE_COLOR, 1, 0.4)
                };

                VisualEdge {
                    from: from.to_string(),
                    to: to.to_string(),
                    arrows: "to".to_string(),
                    color: VisualEdgeColor {
                        color: color.to_string(),
                        highlight: RING_COLOR.to_string(),
                        opacity,
                    },
                    width,
                    title: format!(
                        "Tx: {}<br>Amount: ${}<br>Time: {}",
                        edge.transaction_id, edge.amount, edge.timestamp
                    ),
                    label: format!("${}", edge.amount),
                }
            })
            .collect();

        VisualGraph { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ringscan_core::types::{Pattern, TransactionRecord};
    use ringscan_graph::rings::RingConsolidation;

    fn tx(id: &str, from: &str, to: &str) -> TransactionRecord {
        TransactionRecord::new(
            id,
            from,
            to,
            750.0,
            Utc.with_ymd_and_hms(2024, 4, 2, 8, 30, 0).unwrap(),
        )
    }

    fn cycle(accounts: &[&str]) -> Cycle {
        Cycle::new(accounts.iter().map(|a| a.to_string()).collect())
    }

    #[test]
    fn test_node_priority() {
        let records = vec![
            tx("T1", "A", "B"),
            tx("T2", "B", "C"),
            tx("T3", "C", "A"),
            tx("T4", "D", "E"),
        ];
        let graph = TransactionGraph::from_records(&records);
        let cycles = vec![cycle(&["A", "B", "C"])];
        let rings = RingConsolidation::compute(&cycles);
        let scored = vec![
            DetectionResult {
                account_id: "A".into(),
                suspicion_score: 40.0,
                detected_patterns: vec![Pattern::CycleLength3],
                ring_id: Some("RING_001".into()),
            },
            DetectionResult {
                account_id: "D".into(),
                suspicion_score: 25.0,
                detected_patterns: vec![Pattern::FanIn],
                ring_id: None,
            },
        ];

        let visual = GraphProjection::compute(&graph, &scored, &rings, &cycles);
        let node = |id: &str| visual.nodes.iter().find(|n| n.id == id).unwrap();

        // Ring membership wins even for scored accounts.
        assert_eq!(node("A").color, RING_COLOR);
        assert_eq!(node("A").size, RING_NODE_SIZE);
        // Flagged but not in a ring.
        assert_eq!(node("D").color, FLAGGED_COLOR);
        assert_eq!(node("D").size, FLAGGED_NODE_SIZE);
        // Untouched account.
        assert_eq!(node("E").color, NORMAL_COLOR);
        assert_eq!(node("E").size, NORMAL_NODE_SIZE);
    }

    #[test]
    fn test_tooltips() {
        let records = vec![tx("T1", "A", "B")];
        let graph = TransactionGraph::from_records(&records);
        let scored = vec![DetectionResult {
            account_id: "A".into(),
            suspicion_score: 45.0,
            detected_patterns: vec![Pattern::ShellAccount, Pattern::FanIn],
            ring_id: None,
        }];

        let visual = GraphProjection::compute(&graph, &scored, &RingSet::default(), &[]);
        let a = visual.nodes.iter().find(|n| n.id == "A").unwrap();
        assert!(a.title.contains("Score: 45"));
        assert!(a.title.contains("shell_account, fan_in"));

        let b = visual.nodes.iter().find(|n| n.id == "B").unwrap();
        assert!(b.title.contains("Status: Normal"));
    }

    #[test]
    fn test_cycle_edges_highlighted_by_pair() {
        // Two parallel A->B transactions: both edges highlight, because
        // the pair (A, B) closes the cycle.
        let records = vec![
            tx("T1", "A", "B"),
            tx("T2", "A", "B"),
            tx("T3", "B", "C"),
            tx("T4", "C", "A"),
            tx("T5", "C", "D"),
        ];
        let graph = TransactionGraph::from_records(&records);
        let cycles = vec![cycle(&["A", "B", "C"])];
        let rings = RingConsolidation::compute(&cycles);

        let visual = GraphProjection::compute(&graph, &[], &rings, &cycles);
        assert_eq!(visual.edges.len(), 5);

        let highlighted: Vec<&VisualEdge> =
            visual.edges.iter().filter(|e| e.width == 3).collect();
        assert_eq!(highlighted.len(), 4);
        assert!(highlighted
            .iter()
            .all(|e| e.color.color == RING_COLOR && e.color.opacity == 1.0));

        let faint = visual
            .edges
            .iter()
            .find(|e| e.from == "C" && e.to == "D")
            .unwrap();
        assert_eq!(faint.width, 1);
        assert_eq!(faint.color.opacity, 0.4);
    }

    #[test]
    fn test_edges_keep_per_transaction_detail() {
        let records = vec![tx("T1", "A", "B")];
        let graph = TransactionGraph::from_records(&records);
        let visual = GraphProjection::compute(&graph, &[], &RingSet::default(), &[]);

        let edge = &visual.edges[0];
        assert_eq!(edge.arrows, "to");
        assert!(edge.title.contains("Tx: T1"));
        assert!(edge.title.contains("Amount: $750"));
        assert_eq!(edge.label, "$750");
    }

    #[test]
    fn test_empty_graph() {
        let graph = TransactionGraph::from_records(&[]);
        let visual = GraphProjection::compute(&graph, &[], &RingSet::default(), &[]);
        assert!(visual.nodes.is_empty());
        assert!(visual.edges.is_empty());
    }
}
