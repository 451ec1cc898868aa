//! The analysis orchestrator.

use ringscan_core::config::EngineConfig;
use ringscan_core::detector::BatchDetector;
use ringscan_core::error::Result;
use ringscan_core::types::{AnalysisReport, AnalysisSummary, TransactionRecord};
use ringscan_detect::shell::{ShellDetection, ShellDetectionInput};
use ringscan_detect::smurfing::{SmurfingDetection, SmurfingDetectionInput};
use ringscan_detect::velocity::{VelocityDetection, VelocityDetectionInput};
use ringscan_graph::cycles::{CycleDetection, CycleDetectionInput};
use ringscan_graph::graph::TransactionGraph;
use ringscan_graph::rings::RingConsolidation;
use std::sync::Arc;
use std::time::Instant;

use crate::scoring::SuspicionScoring;
use crate::visualize::GraphProjection;

/// Runs the full detection pipeline for one record batch.
///
/// Stateless per invocation: the graph is built once and read-only, the
/// four independent detectors run as concurrent tasks with task-local
/// accumulators, and their results are merged by this orchestrator.
/// Output is all-or-nothing; a failing stage fails the whole analysis.
#[derive(Debug, Clone, Default)]
pub struct AnalysisEngine {
    config: EngineConfig,
}

impl AnalysisEngine {
    /// Create an engine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given configuration.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze a pre-validated record batch.
    pub async fn analyze(&self, records: Vec<TransactionRecord>) -> Result<AnalysisReport> {
        let started = Instant::now();
        tracing::info!(records = records.len(), "starting analysis");

        let graph = Arc::new(TransactionGraph::from_records(&records));
        let records = Arc::new(records);
        tracing::debug!(
            accounts = graph.node_count(),
            edges = graph.edge_count(),
            "transaction graph built"
        );

        let cycle_detector = CycleDetection::new();
        let smurfing_detector = SmurfingDetection::new();
        let shell_detector = ShellDetection::new();
        let velocity_detector = VelocityDetection::new();

        let (cycle_out, smurfing_out, shell_out, velocity_out) = tokio::join!(
            cycle_detector.execute(CycleDetectionInput::new(
                Arc::clone(&graph),
                self.config.cycle_min_length,
                self.config.cycle_max_length,
            )),
            smurfing_detector.execute(SmurfingDetectionInput::new(
                Arc::clone(&records),
                self.config.smurfing_window_hours,
                self.config.smurfing_min_counterparties,
                self.config.smurfing_min_transactions,
            )),
            shell_detector.execute(ShellDetectionInput::new(
                Arc::clone(&records),
                self.config.shell_max_total_degree,
            )),
            velocity_detector.execute(VelocityDetectionInput::new(
                Arc::clone(&records),
                self.config.velocity_window_hours,
                self.config.velocity_min_transactions,
            )),
        );

        let cycles = cycle_out?.cycles;
        let smurfing = smurfing_out?;
        let shells = shell_out?.shells;
        let velocity = velocity_out?.flagged;

        let rings = RingConsolidation::compute(&cycles);
        tracing::info!(
            cycles = cycles.len(),
            rings = rings.len(),
            fan_in = smurfing.fan_in.len(),
            fan_out = smurfing.fan_out.len(),
            shells = shells.len(),
            high_velocity = velocity.len(),
            "detection complete"
        );

        let suspicious_accounts = SuspicionScoring::compute(
            &graph,
            &cycles,
            &rings,
            &smurfing,
            &shells,
            &velocity,
            &self.config,
        );

        let graph_visualization =
            GraphProjection::compute(&graph, &suspicious_accounts, &rings, &cycles);

        let elapsed = started.elapsed().as_secs_f64();
        let summary = AnalysisSummary {
            total_accounts_analyzed: graph.node_count(),
            suspicious_accounts_flagged: suspicious_accounts.len(),
            fraud_rings_detected: rings.len(),
            processing_time_seconds: (elapsed * 100.0).round() / 100.0,
        };

        tracing::info!(
            flagged = summary.suspicious_accounts_flagged,
            rings = summary.fraud_rings_detected,
            seconds = summary.processing_time_seconds,
            "analysis complete"
        );

        Ok(AnalysisReport {
            suspicious_accounts,
            fraud_rings: rings.rings().to_vec(),
            summary,
            graph_visualization,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn tx(id: &str, from: &str, to: &str, hour: i64) -> TransactionRecord {
        TransactionRecord::new(
            id,
            from,
            to,
            100.0,
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap() + Duration::hours(hour),
        )
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let engine = AnalysisEngine::new();
        let report = engine.analyze(Vec::new()).await.unwrap();

        assert!(report.suspicious_accounts.is_empty());
        assert!(report.fraud_rings.is_empty());
        assert_eq!(report.summary.total_accounts_analyzed, 0);
        assert!(report.graph_visualization.nodes.is_empty());
    }

    #[tokio::test]
    async fn test_cycle_scenario() {
        let engine = AnalysisEngine::new();
        let records = vec![
            tx("T1", "A", "B", 0),
            tx("T2", "B", "C", 1),
            tx("T3", "C", "A", 2),
        ];
        let report = engine.analyze(records).await.unwrap();

        assert_eq!(report.fraud_rings.len(), 1);
        let ring = &report.fraud_rings[0];
        assert_eq!(ring.ring_id, "RING_001");
        assert_eq!(ring.member_accounts, ["A", "B", "C"]);
        assert_eq!(ring.risk_score, 86.0);
        assert_eq!(ring.pattern_type, "cycle");

        assert_eq!(report.summary.total_accounts_analyzed, 3);
        assert_eq!(report.summary.suspicious_accounts_flagged, 3);
        assert_eq!(report.summary.fraud_rings_detected, 1);
    }

    #[tokio::test]
    async fn test_rejects_invalid_config() {
        let config = EngineConfig::new().with_cycle_lengths(6, 3);
        assert!(AnalysisEngine::with_config(config).is_err());
    }

    #[tokio::test]
    async fn test_custom_config_is_honored() {
        // Lower the velocity threshold to 3 and watch a small burst flag.
        let config = EngineConfig::new().with_velocity_min_transactions(3);
        let engine = AnalysisEngine::with_config(config).unwrap();
        let records = vec![
            tx("T1", "X", "A", 0),
            tx("T2", "X", "B", 1),
            tx("T3", "X", "C", 2),
        ];
        let report = engine.analyze(records).await.unwrap();

        let x = report
            .suspicious_accounts
            .iter()
            .find(|r| r.account_id == "X")
            .unwrap();
        assert_eq!(x.suspicion_score, 10.0);
    }
}
