//! # RingScan Core
//!
//! Shared foundation for the RingScan fraud-ring detection engine:
//!
//! - [`types`] - transaction records, detection results, fraud rings, and
//!   the analysis report emitted to callers
//! - [`config`] - engine configuration with every recognized threshold
//! - [`detector`] - detector metadata and the batch detector traits
//! - [`error`] - the engine error taxonomy
//!
//! The engine is a pure, deterministic function of its input batch: no
//! persistence, no cross-invocation state. Input validation belongs to the
//! ingestion boundary (see `ringscan-cli`); the detection crates assume
//! pre-validated records.

#![warn(missing_docs)]

pub mod config;
pub mod detector;
pub mod error;
pub mod types;

pub use config::{EngineConfig, ScoreWeights};
pub use detector::{BatchDetector, Detector, DetectorMetadata};
pub use error::{EngineError, Result};

/// Commonly used items.
pub mod prelude {
    pub use crate::config::{EngineConfig, ScoreWeights};
    pub use crate::detector::{BatchDetector, Detector, DetectorMetadata};
    pub use crate::error::{EngineError, Result};
    pub use crate::types::{
        AccountId, AnalysisReport, AnalysisSummary, DetectionResult, FraudRing, Pattern,
        TransactionRecord,
    };
}
