//! # RingScan
//!
//! Batch fraud-ring detection for financial transaction data.
//!
//! RingScan ingests a validated batch of transactions and flags accounts
//! and groups of accounts ("rings") exhibiting structural fraud shapes:
//!
//! - **Cycles** - closed transaction loops of 3-5 accounts, consolidated
//!   into rings when they overlap
//! - **Smurfing** - fan-in/fan-out convergence of many counterparties
//!   within a sliding window
//! - **Shell accounts** - low-volume bidirectional pass-throughs
//! - **High velocity** - transaction bursts within a sliding window
//!
//! Each flagged account gets a composite suspicion score in [0, 100]
//! with pattern labels; the report also carries consolidated rings and a
//! renderable graph projection.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ringscan::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> ringscan::Result<()> {
//!     let records: Vec<TransactionRecord> = load_batch();
//!
//!     let engine = AnalysisEngine::new();
//!     let report = engine.analyze(records).await?;
//!
//!     for account in &report.suspicious_accounts {
//!         println!("{}: {}", account.account_id, account.suspicion_score);
//!     }
//!     Ok(())
//! }
//! # fn load_batch() -> Vec<ringscan::TransactionRecord> { Vec::new() }
//! ```
//!
//! ## Determinism
//!
//! One invocation is a pure function of its input batch. Discovery
//! orders, ring numbering, and score tie-breaks all use explicit
//! deterministic comparators, so re-running the same batch reproduces
//! the same report (modulo the timing field in the summary).

#![warn(missing_docs)]

pub mod catalog;

pub use ringscan_core::config::{EngineConfig, ScoreWeights};
pub use ringscan_core::error::{EngineError, Result};
pub use ringscan_core::types::{
    AnalysisReport, AnalysisSummary, DetectionResult, FraudRing, Pattern, TransactionRecord,
};
pub use ringscan_detect::{ShellDetection, SmurfingDetection, VelocityDetection};
pub use ringscan_engine::{AnalysisEngine, GraphProjection, SuspicionScoring};
pub use ringscan_graph::{Cycle, CycleDetection, RingConsolidation, TransactionGraph};

/// Re-export of the core crate.
pub use ringscan_core as core;
/// Re-export of the detector crate.
pub use ringscan_detect as detect;
/// Re-export of the engine crate.
pub use ringscan_engine as engine;
/// Re-export of the graph crate.
pub use ringscan_graph as graph;

/// Commonly used items.
pub mod prelude {
    pub use ringscan_core::config::{EngineConfig, ScoreWeights};
    pub use ringscan_core::detector::{BatchDetector, Detector};
    pub use ringscan_core::error::{EngineError, Result};
    pub use ringscan_core::types::{
        AccountId, AnalysisReport, DetectionResult, FraudRing, Pattern, TransactionRecord,
    };
    pub use ringscan_engine::AnalysisEngine;
}
