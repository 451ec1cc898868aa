//! Bounded-length directed cycle detection.
//!
//! Cycle detection is structural: the multigraph is collapsed to simple
//! directed adjacency (parallel edges deduplicated, self-loops excluded)
//! and the search runs over its 2-core. Nodes with total degree < 2
//! cannot lie on any cycle, so the pruning preserves full completeness
//! for the searched length range.

use crate::graph::TransactionGraph;
use async_trait::async_trait;
use ringscan_core::detector::{BatchDetector, Detector, DetectorMetadata};
use ringscan_core::error::{EngineError, Result};
use ringscan_core::types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// A simple directed cycle in canonical form.
///
/// The account sequence is rotated so the lexicographically smallest
/// identifier comes first; two rotations of the same cycle compare equal.
/// A cycle and its reverse stay distinct (direction matters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cycle {
    accounts: Vec<AccountId>,
}

impl Cycle {
    /// Create a cycle, canonicalizing the rotation.
    #[must_use]
    pub fn new(mut accounts: Vec<AccountId>) -> Self {
        if let Some(min_pos) = (0..accounts.len()).min_by_key(|&i| &accounts[i]) {
            accounts.rotate_left(min_pos);
        }
        Self { accounts }
    }

    /// The member accounts in canonical order.
    #[must_use]
    pub fn accounts(&self) -> &[AccountId] {
        &self.accounts
    }

    /// Cycle length (number of distinct accounts).
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// True if the cycle has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// True if the account is a member.
    #[must_use]
    pub fn contains(&self, account: &str) -> bool {
        self.accounts.iter().any(|a| a == account)
    }

    /// Consecutive (from, to) pairs, wrapping back to the start.
    pub fn edge_pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        (0..self.accounts.len()).map(move |i| {
            let from = self.accounts[i].as_str();
            let to = self.accounts[(i + 1) % self.accounts.len()].as_str();
            (from, to)
        })
    }
}

/// Input for cycle detection.
#[derive(Debug, Clone)]
pub struct CycleDetectionInput {
    /// The shared, read-only transaction graph.
    pub graph: Arc<TransactionGraph>,
    /// Minimum cycle length.
    pub min_length: usize,
    /// Maximum cycle length (hard search depth bound).
    pub max_length: usize,
}

impl CycleDetectionInput {
    /// Create a new input.
    #[must_use]
    pub fn new(graph: Arc<TransactionGraph>, min_length: usize, max_length: usize) -> Self {
        Self {
            graph,
            min_length,
            max_length,
        }
    }
}

/// Output of cycle detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleDetectionOutput {
    /// Canonical cycles in discovery order.
    pub cycles: Vec<Cycle>,
}

/// Bounded-length simple cycle detector.
///
/// Runs a depth-bounded depth-first search from every 2-core node. The
/// DFS keeps an explicit frame stack and path set; no call recursion, so
/// the depth bound is the only growth bound.
#[derive(Debug, Clone)]
pub struct CycleDetection {
    metadata: DetectorMetadata,
}

impl Default for CycleDetection {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleDetection {
    /// Create a new cycle detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("graph/cycle-detection")
                .with_description("Bounded-length directed cycle search over the 2-core"),
        }
    }

    /// Find every canonical simple directed cycle with length in
    /// `[min_length, max_length]`.
    ///
    /// Discovery order is deterministic: start nodes ascend by pruned
    /// degree with an account-id tie-break, and neighbors are visited in
    /// account-id order.
    #[must_use]
    pub fn compute(
        graph: &TransactionGraph,
        min_length: usize,
        max_length: usize,
    ) -> Vec<Cycle> {
        let n = graph.node_count();
        if n == 0 || min_length > max_length {
            return Vec::new();
        }

        let adjacency = graph.simple_adjacency();
        let (alive, degree) = two_core(&adjacency, n);
        let core_size = alive.iter().filter(|&&a| a).count();
        tracing::debug!(
            nodes = n,
            core_nodes = core_size,
            "cycle search restricted to 2-core"
        );
        if core_size == 0 {
            return Vec::new();
        }

        // Lower-degree starts first; ties break on account id so the
        // discovery order (and downstream ring numbering) is reproducible.
        let mut starts: Vec<usize> = (0..n).filter(|&v| alive[v]).collect();
        starts.sort_by(|&a, &b| {
            degree[a]
                .cmp(&degree[b])
                .then_with(|| graph.account(a).cmp(graph.account(b)))
        });

        let mut seen: HashSet<Vec<AccountId>> = HashSet::new();
        let mut cycles = Vec::new();
        let mut on_path = vec![false; n];

        for &start in &starts {
            // Frame: (node, position of the next neighbor to try).
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
            let mut path: Vec<usize> = vec![start];
            on_path[start] = true;

            while !stack.is_empty() {
                let top = stack.len() - 1;
                let (node, pos) = stack[top];
                if let Some(&next) = adjacency[node].get(pos) {
                    stack[top].1 += 1;
                    if next == start {
                        let length = path.len();
                        if length >= min_length && length <= max_length {
                            let cycle = Cycle::new(
                                path.iter().map(|&v| graph.account(v).to_string()).collect(),
                            );
                            if seen.insert(cycle.accounts().to_vec()) {
                                cycles.push(cycle);
                            }
                        }
                    } else if alive[next] && !on_path[next] && path.len() < max_length {
                        on_path[next] = true;
                        path.push(next);
                        stack.push((next, 0));
                    }
                } else {
                    stack.pop();
                    on_path[node] = false;
                    path.pop();
                }
            }
        }

        tracing::debug!(cycles = cycles.len(), "cycle search complete");
        cycles
    }
}

/// Peel nodes with total simple degree (in + out) < 2 until a fixed
/// point. Returns the alive mask and the remaining per-node degree
/// within the pruned subgraph.
fn two_core(adjacency: &[Vec<usize>], n: usize) -> (Vec<bool>, Vec<usize>) {
    let mut reverse: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (node, targets) in adjacency.iter().enumerate() {
        for &t in targets {
            reverse[t].push(node);
        }
    }

    let mut degree: Vec<usize> = (0..n)
        .map(|v| adjacency[v].len() + reverse[v].len())
        .collect();
    let mut alive = vec![true; n];
    let mut queue: VecDeque<usize> = (0..n).filter(|&v| degree[v] < 2).collect();

    while let Some(v) = queue.pop_front() {
        if !alive[v] {
            continue;
        }
        alive[v] = false;
        for &u in adjacency[v].iter().chain(reverse[v].iter()) {
            if alive[u] {
                degree[u] -= 1;
                if degree[u] < 2 {
                    queue.push_back(u);
                }
            }
        }
    }

    (alive, degree)
}

impl Detector for CycleDetection {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}

#[async_trait]
impl BatchDetector<CycleDetectionInput, CycleDetectionOutput> for CycleDetection {
    async fn execute(&self, input: CycleDetectionInput) -> Result<CycleDetectionOutput> {
        self.validate_input(&input)?;
        let cycles = Self::compute(&input.graph, input.min_length, input.max_length);
        Ok(CycleDetectionOutput { cycles })
    }

    fn validate_input(&self, input: &CycleDetectionInput) -> Result<()> {
        if input.min_length < 2 {
            return Err(EngineError::validation(format!(
                "minimum cycle length must be at least 2, got {}",
                input.min_length
            )));
        }
        if input.min_length > input.max_length {
            return Err(EngineError::validation(format!(
                "minimum cycle length {} exceeds maximum {}",
                input.min_length, input.max_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ringscan_core::types::TransactionRecord;

    fn tx(id: &str, from: &str, to: &str) -> TransactionRecord {
        TransactionRecord::new(
            id,
            from,
            to,
            100.0,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    fn graph_of(pairs: &[(&str, &str)]) -> TransactionGraph {
        let records: Vec<TransactionRecord> = pairs
            .iter()
            .enumerate()
            .map(|(i, (from, to))| tx(&format!("T{i}"), from, to))
            .collect();
        TransactionGraph::from_records(&records)
    }

    #[test]
    fn test_triangle() {
        let graph = graph_of(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let cycles = CycleDetection::compute(&graph, 3, 5);

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].accounts(), ["A", "B", "C"]);
    }

    #[test]
    fn test_canonical_form_is_rotation_stable() {
        let cycle = Cycle::new(vec!["C".into(), "A".into(), "B".into()]);
        let rotated = Cycle::new(vec!["B".into(), "C".into(), "A".into()]);
        assert_eq!(cycle, rotated);
        assert_eq!(cycle.accounts()[0], "A");
    }

    #[test]
    fn test_direction_matters() {
        // A->B->C->A and its reverse A->C->B->A are distinct cycles.
        let graph = graph_of(&[
            ("A", "B"),
            ("B", "C"),
            ("C", "A"),
            ("A", "C"),
            ("C", "B"),
            ("B", "A"),
        ]);
        let cycles = CycleDetection::compute(&graph, 3, 5);
        assert_eq!(cycles.len(), 2);
    }

    #[test]
    fn test_two_cycle_below_min_length() {
        let graph = graph_of(&[("A", "B"), ("B", "A")]);
        let cycles = CycleDetection::compute(&graph, 3, 5);
        assert!(cycles.is_empty());
    }

    #[test]
    fn test_self_loop_is_not_a_cycle() {
        let graph = graph_of(&[("A", "A"), ("A", "B"), ("B", "A")]);
        let cycles = CycleDetection::compute(&graph, 3, 5);
        assert!(cycles.is_empty());
    }

    #[test]
    fn test_length_bound_is_hard() {
        // A 6-cycle: under the default 3..=5 bound nothing is returned.
        let graph = graph_of(&[
            ("A", "B"),
            ("B", "C"),
            ("C", "D"),
            ("D", "E"),
            ("E", "F"),
            ("F", "A"),
        ]);
        assert!(CycleDetection::compute(&graph, 3, 5).is_empty());
        assert_eq!(CycleDetection::compute(&graph, 3, 6).len(), 1);
    }

    #[test]
    fn test_parallel_edges_do_not_duplicate_cycles() {
        let graph = graph_of(&[
            ("A", "B"),
            ("A", "B"),
            ("B", "C"),
            ("C", "A"),
            ("C", "A"),
        ]);
        let cycles = CycleDetection::compute(&graph, 3, 5);
        assert_eq!(cycles.len(), 1);
    }

    #[test]
    fn test_tree_prunes_to_nothing() {
        // A pure fan-out tree has no 2-core.
        let graph = graph_of(&[("R", "A"), ("R", "B"), ("A", "C"), ("A", "D")]);
        let cycles = CycleDetection::compute(&graph, 3, 5);
        assert!(cycles.is_empty());
    }

    #[test]
    fn test_overlapping_cycles() {
        // Two triangles sharing node B.
        let graph = graph_of(&[
            ("A", "B"),
            ("B", "C"),
            ("C", "A"),
            ("B", "D"),
            ("D", "E"),
            ("E", "B"),
        ]);
        let cycles = CycleDetection::compute(&graph, 3, 5);
        assert_eq!(cycles.len(), 2);
    }

    #[test]
    fn test_every_cycle_is_simple_and_in_bounds() {
        let graph = graph_of(&[
            ("A", "B"),
            ("B", "C"),
            ("C", "D"),
            ("D", "A"),
            ("B", "A"),
            ("C", "B"),
            ("D", "C"),
            ("A", "D"),
            ("A", "C"),
            ("B", "D"),
        ]);
        let cycles = CycleDetection::compute(&graph, 3, 5);
        assert!(!cycles.is_empty());

        for cycle in &cycles {
            assert!(cycle.len() >= 3 && cycle.len() <= 5);
            let distinct: HashSet<&AccountId> = cycle.accounts().iter().collect();
            assert_eq!(distinct.len(), cycle.len(), "repeated account in {cycle:?}");
        }
    }

    #[test]
    fn test_edge_pairs_wrap() {
        let cycle = Cycle::new(vec!["A".into(), "B".into(), "C".into()]);
        let pairs: Vec<(&str, &str)> = cycle.edge_pairs().collect();
        assert_eq!(pairs, vec![("A", "B"), ("B", "C"), ("C", "A")]);
    }

    #[tokio::test]
    async fn test_batch_execute() {
        let graph = Arc::new(graph_of(&[("A", "B"), ("B", "C"), ("C", "A")]));
        let detector = CycleDetection::new();
        let output = detector
            .execute(CycleDetectionInput::new(graph, 3, 5))
            .await
            .unwrap();
        assert_eq!(output.cycles.len(), 1);
    }

    #[tokio::test]
    async fn test_batch_execute_rejects_inverted_bounds() {
        let graph = Arc::new(graph_of(&[("A", "B")]));
        let detector = CycleDetection::new();
        let err = detector
            .execute(CycleDetectionInput::new(graph, 5, 3))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
