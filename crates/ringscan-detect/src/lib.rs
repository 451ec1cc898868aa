//! # RingScan Detect
//!
//! Per-account classifiers of the RingScan engine:
//!
//! - [`smurfing`] - fan-in/fan-out convergence within a sliding window
//! - [`shell`] - low-volume pass-through classification
//! - [`velocity`] - transaction-burst detection
//!
//! All three read the immutable record batch; none touches the graph or
//! another detector's state, so the orchestrator may run them
//! concurrently.

#![warn(missing_docs)]

pub mod shell;
pub mod smurfing;
pub mod velocity;

pub use shell::{ShellDetection, ShellDetectionInput, ShellDetectionOutput};
pub use smurfing::{SmurfingDetection, SmurfingDetectionInput, SmurfingResult};
pub use velocity::{VelocityDetection, VelocityDetectionInput, VelocityDetectionOutput};
