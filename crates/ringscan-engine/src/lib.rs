//! # RingScan Engine
//!
//! The orchestration layer of RingScan:
//!
//! - [`scoring`] - composite suspicion scoring with the legitimacy
//!   override
//! - [`visualize`] - projection of graph plus detection results into a
//!   renderable node/edge model
//! - [`engine`] - the [`engine::AnalysisEngine`] running the full
//!   pipeline per request
//!
//! One invocation is a pure, deterministic function of its record batch:
//! graph construction, four independent detectors joined concurrently,
//! ring consolidation, scoring, projection. Output is all-or-nothing.

#![warn(missing_docs)]

pub mod engine;
pub mod scoring;
pub mod visualize;

pub use engine::AnalysisEngine;
pub use scoring::SuspicionScoring;
pub use visualize::GraphProjection;
