//! Directed transaction multigraph.

use chrono::{DateTime, Utc};
use ringscan_core::types::{AccountId, TransactionRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One edge of the multigraph. Every transaction record becomes exactly
/// one edge; parallel edges between the same pair are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Sender node index.
    pub from: usize,
    /// Receiver node index.
    pub to: usize,
    /// Originating transaction identifier.
    pub transaction_id: String,
    /// Transaction amount.
    pub amount: f64,
    /// Transaction time.
    pub timestamp: DateTime<Utc>,
}

/// A directed multigraph of accounts and transactions.
///
/// Nodes are account identifiers (the union of all sender/receiver ids,
/// in first-appearance order); edges are transaction records. Built once
/// per analysis run, read-only thereafter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionGraph {
    accounts: Vec<AccountId>,
    index: HashMap<AccountId, usize>,
    edges: Vec<GraphEdge>,
    out_edges: Vec<Vec<usize>>,
    in_edges: Vec<Vec<usize>>,
}

impl TransactionGraph {
    /// Build the graph from an ordered record batch.
    ///
    /// No record is dropped or merged; an empty batch yields an empty
    /// graph.
    #[must_use]
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let mut graph = Self::default();

        for record in records {
            let from = graph.intern(&record.sender_id);
            let to = graph.intern(&record.receiver_id);
            let edge_idx = graph.edges.len();
            graph.edges.push(GraphEdge {
                from,
                to,
                transaction_id: record.transaction_id.clone(),
                amount: record.amount,
                timestamp: record.timestamp,
            });
            graph.out_edges[from].push(edge_idx);
            graph.in_edges[to].push(edge_idx);
        }

        graph
    }

    fn intern(&mut self, account: &str) -> usize {
        if let Some(&idx) = self.index.get(account) {
            return idx;
        }
        let idx = self.accounts.len();
        self.accounts.push(account.to_string());
        self.index.insert(account.to_string(), idx);
        self.out_edges.push(Vec::new());
        self.in_edges.push(Vec::new());
        idx
    }

    /// Number of accounts.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.accounts.len()
    }

    /// Number of transactions.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Account identifier for a node index.
    #[must_use]
    pub fn account(&self, node: usize) -> &str {
        &self.accounts[node]
    }

    /// All account identifiers, in first-appearance order.
    #[must_use]
    pub fn accounts(&self) -> &[AccountId] {
        &self.accounts
    }

    /// Node index for an account identifier.
    #[must_use]
    pub fn node_index(&self, account: &str) -> Option<usize> {
        self.index.get(account).copied()
    }

    /// All edges, in record order.
    #[must_use]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// In-degree of a node, counting every transaction.
    #[must_use]
    pub fn in_degree(&self, node: usize) -> usize {
        self.in_edges.get(node).map_or(0, Vec::len)
    }

    /// Out-degree of a node, counting every transaction.
    #[must_use]
    pub fn out_degree(&self, node: usize) -> usize {
        self.out_edges.get(node).map_or(0, Vec::len)
    }

    /// (in-degree, out-degree) for an account identifier; (0, 0) for an
    /// account not present in the batch.
    #[must_use]
    pub fn degrees_of(&self, account: &str) -> (usize, usize) {
        match self.node_index(account) {
            Some(node) => (self.in_degree(node), self.out_degree(node)),
            None => (0, 0),
        }
    }

    /// Outgoing edge indices of a node.
    #[must_use]
    pub fn out_edge_indices(&self, node: usize) -> &[usize] {
        &self.out_edges[node]
    }

    /// Incoming edge indices of a node.
    #[must_use]
    pub fn in_edge_indices(&self, node: usize) -> &[usize] {
        &self.in_edges[node]
    }

    /// Collapse the multigraph to simple directed adjacency: parallel
    /// edges deduplicated, self-loops excluded, neighbors sorted by
    /// account identifier for deterministic traversal.
    #[must_use]
    pub fn simple_adjacency(&self) -> Vec<Vec<usize>> {
        let n = self.node_count();
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (node, edge_indices) in self.out_edges.iter().enumerate() {
            let mut targets: Vec<usize> = edge_indices
                .iter()
                .map(|&e| self.edges[e].to)
                .filter(|&t| t != node)
                .collect();
            targets.sort_by(|&a, &b| self.accounts[a].cmp(&self.accounts[b]));
            targets.dedup();
            adjacency[node] = targets;
        }
        adjacency
    }

    /// Graph density over distinct ordered pairs.
    #[must_use]
    pub fn density(&self) -> f64 {
        if self.node_count() <= 1 {
            return 0.0;
        }
        let max_edges = self.node_count() * (self.node_count() - 1);
        self.edge_count() as f64 / max_edges as f64
    }
}
