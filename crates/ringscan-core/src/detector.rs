//! Detector metadata and traits.
//!
//! Every detector is a batch unit of work: it reads an immutable input
//! (the record batch or the transaction graph), accumulates into its own
//! local state, and returns a result for the orchestrator to merge.
//! Detectors never mutate shared structures.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Metadata describing a detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorMetadata {
    /// Unique detector identifier (e.g., "graph/cycle-detection").
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Version of the detector implementation.
    pub version: u32,
}

impl DetectorMetadata {
    /// Create metadata for a detector.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            version: 1,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }
}

/// Base trait for all detectors.
pub trait Detector: Send + Sync + Debug {
    /// Returns the detector metadata.
    fn metadata(&self) -> &DetectorMetadata;

    /// Returns the detector ID.
    fn id(&self) -> &str {
        &self.metadata().id
    }
}

/// Trait for batch detectors.
///
/// A batch detector runs once per analysis request over an immutable
/// input. Independent detectors may be joined concurrently by the
/// orchestrator; each confines its accumulation state to its own task.
///
/// # Type Parameters
///
/// - `I`: Input type
/// - `O`: Output type
#[async_trait]
pub trait BatchDetector<I, O>: Detector
where
    I: Send + Sync,
    O: Send + Sync,
{
    /// Execute the detector over the given input.
    async fn execute(&self, input: I) -> Result<O>;

    /// Validate the input before execution.
    ///
    /// Override to provide custom input validation.
    fn validate_input(&self, _input: &I) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_builder() {
        let meta = DetectorMetadata::new("graph/cycle-detection")
            .with_description("Bounded-length directed cycle search")
            .with_version(2);

        assert_eq!(meta.id, "graph/cycle-detection");
        assert_eq!(meta.description, "Bounded-length directed cycle search");
        assert_eq!(meta.version, 2);
    }

    #[test]
    fn test_metadata_defaults() {
        let meta = DetectorMetadata::new("detect/velocity");
        assert_eq!(meta.version, 1);
        assert!(meta.description.is_empty());
    }
}
