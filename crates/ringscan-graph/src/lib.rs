//! # RingScan Graph
//!
//! Graph layer of the RingScan engine:
//!
//! - [`graph`] - the directed transaction multigraph (one edge per record)
//! - [`cycles`] - bounded-length simple cycle detection over the 2-core
//! - [`rings`] - consolidation of overlapping cycles into fraud rings
//!
//! The graph is built once per analysis run and read-only thereafter;
//! detectors accumulate into task-local state only.

#![warn(missing_docs)]

pub mod cycles;
pub mod graph;
pub mod rings;

pub use cycles::{Cycle, CycleDetection, CycleDetectionInput, CycleDetectionOutput};
pub use graph::{GraphEdge, TransactionGraph};
pub use rings::{RingConsolidation, RingSet};
