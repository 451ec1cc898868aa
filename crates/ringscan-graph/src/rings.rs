//! Consolidation of overlapping cycles into fraud rings.
//!
//! Two cycles sharing at least one account belong to the same ring; rings
//! are the connected components of that overlap relation, computed with a
//! disjoint-set over cycle-participating accounts.

use crate::cycles::Cycle;
use ringscan_core::detector::DetectorMetadata;
use ringscan_core::types::{AccountId, FraudRing};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The consolidated ring partition.
///
/// Every cycle-participating account belongs to exactly one ring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RingSet {
    rings: Vec<FraudRing>,
    assignments: HashMap<AccountId, String>,
}

impl RingSet {
    /// Rings in discovery order.
    #[must_use]
    pub fn rings(&self) -> &[FraudRing] {
        &self.rings
    }

    /// Ring identifier for an account, if it participates in any cycle.
    #[must_use]
    pub fn ring_of(&self, account: &str) -> Option<&str> {
        self.assignments.get(account).map(String::as_str)
    }

    /// True if the account belongs to a ring.
    #[must_use]
    pub fn is_member(&self, account: &str) -> bool {
        self.assignments.contains_key(account)
    }

    /// Number of rings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rings.len()
    }

    /// True if no rings were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Number of accounts assigned to any ring.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.assignments.len()
    }
}

/// Disjoint-set forest with union by rank and path compression.
#[derive(Debug)]
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Consolidates detected cycles into rings and assigns identifiers.
#[derive(Debug, Clone)]
pub struct RingConsolidation {
    metadata: DetectorMetadata,
}

impl Default for RingConsolidation {
    fn default() -> Self {
        Self::new()
    }
}

impl RingConsolidation {
    /// Create a new consolidator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("graph/ring-consolidation")
                .with_description("Union-find merge of overlapping cycles into rings"),
        }
    }

    /// The consolidator metadata.
    #[must_use]
    pub fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }

    /// Partition cycle-participating accounts into rings.
    ///
    /// Ring identifiers (`RING_001`, ...) are assigned in discovery
    /// order: a ring is numbered when the first cycle belonging to it is
    /// encountered. Members are listed sorted ascending.
    #[must_use]
    pub fn compute(cycles: &[Cycle]) -> RingSet {
        if cycles.is_empty() {
            return RingSet::default();
        }

        // Intern cycle-participating accounts in first-seen order.
        let mut account_index: HashMap<&str, usize> = HashMap::new();
        let mut accounts: Vec<&str> = Vec::new();
        for cycle in cycles {
            for account in cycle.accounts() {
                account_index.entry(account.as_str()).or_insert_with(|| {
                    accounts.push(account.as_str());
                    accounts.len() - 1
                });
            }
        }

        let mut sets = DisjointSet::new(accounts.len());
        for cycle in cycles {
            let first = account_index[cycle.accounts()[0].as_str()];
            for account in &cycle.accounts()[1..] {
                sets.union(first, account_index[account.as_str()]);
            }
        }

        // Number components by the first cycle that touches them.
        let mut ring_of_root: HashMap<usize, usize> = HashMap::new();
        for cycle in cycles {
            let root = sets.find(account_index[cycle.accounts()[0].as_str()]);
            let next = ring_of_root.len();
            ring_of_root.entry(root).or_insert(next);
        }

        let mut members: Vec<Vec<AccountId>> = vec![Vec::new(); ring_of_root.len()];
        for (idx, account) in accounts.iter().enumerate() {
            let ring = ring_of_root[&sets.find(idx)];
            members[ring].push((*account).to_string());
        }

        let mut rings = Vec::with_capacity(members.len());
        let mut assignments = HashMap::new();
        for (ring, mut member_accounts) in members.into_iter().enumerate() {
            member_accounts.sort();
            let ring_id = format!("RING_{:03}", ring + 1);
            for account in &member_accounts {
                assignments.insert(account.clone(), ring_id.clone());
            }
            rings.push(FraudRing::new(ring_id, member_accounts));
        }

        tracing::debug!(
            rings = rings.len(),
            members = assignments.len(),
            "ring consolidation complete"
        );
        RingSet { rings, assignments }
    }
}
