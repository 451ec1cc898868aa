//! Catalog of detection stages for discovery and tooling.

use ringscan_core::detector::Detector;
use ringscan_detect::{ShellDetection, SmurfingDetection, VelocityDetection};
use ringscan_engine::{GraphProjection, SuspicionScoring};
use ringscan_graph::{CycleDetection, RingConsolidation};

/// Description of one pipeline stage.
#[derive(Debug, Clone)]
pub struct StageInfo {
    /// Stage identifier (e.g., "graph/cycle-detection").
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// True for the independent detectors that may run concurrently;
    /// false for the sequential consolidation/scoring/projection stages.
    pub concurrent: bool,
}

/// All pipeline stages, in execution order.
#[must_use]
pub fn stages() -> Vec<StageInfo> {
    let cycle = CycleDetection::new();
    let smurfing = SmurfingDetection::new();
    let shell = ShellDetection::new();
    let velocity = VelocityDetection::new();
    let rings = RingConsolidation::new();
    let scoring = SuspicionScoring::new();
    let projection = GraphProjection::new();

    vec![
        StageInfo {
            id: cycle.metadata().id.clone(),
            description: cycle.metadata().description.clone(),
            concurrent: true,
        },
        StageInfo {
            id: smurfing.metadata().id.clone(),
            description: smurfing.metadata().description.clone(),
            concurrent: true,
        },
        StageInfo {
            id: shell.metadata().id.clone(),
            description: shell.metadata().description.clone(),
            concurrent: true,
        },
        StageInfo {
            id: velocity.metadata().id.clone(),
            description: velocity.metadata().description.clone(),
            concurrent: true,
        },
        StageInfo {
            id: rings.metadata().id.clone(),
            description: rings.metadata().description.clone(),
            concurrent: false,
        },
        StageInfo {
            id: scoring.metadata().id.clone(),
            description: scoring.metadata().description.clone(),
            concurrent: false,
        },
        StageInfo {
            id: projection.metadata().id.clone(),
            description: projection.metadata().description.clone(),
            concurrent: false,
        },
    ]
}

/// Number of pipeline stages.
#[must_use]
pub fn stage_count() -> usize {
    stages().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_complete() {
        let stages = stages();
        assert_eq!(stages.len(), 7);

        for stage in &stages {
            assert!(!stage.id.is_empty());
            assert!(!stage.description.is_empty());
        }

        let concurrent = stages.iter().filter(|s| s.concurrent).count();
        assert_eq!(concurrent, 4);
    }

    #[test]
    fn test_stage_ids_unique() {
        let stages = stages();
        let mut ids: Vec<&str> = stages.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), stages.len());
    }
}
