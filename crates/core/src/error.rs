// Central Error Type for the Probe

use std::time::Duration;
use thiserror::Error;

use crate::domain::{IntegrityMismatch, ProbeStep};
use crate::port::StorageError;

/// Probe-level error type
///
/// The first Upload/Download/Integrity/Timeout error of a run is its terminal
/// failure reason. `Cleanup` is always secondary and never replaces it.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upload failed: {0}")]
    Upload(#[source] StorageError),

    #[error("Download failed: {0}")]
    Download(#[source] StorageError),

    #[error("Integrity check failed: {0}")]
    Integrity(#[from] IntegrityMismatch),

    #[error("{step} timed out (probe budget {budget:?})")]
    Timeout { step: ProbeStep, budget: Duration },

    #[error("Cleanup failed: {0}")]
    Cleanup(#[source] StorageError),
}

impl ProbeError {
    /// Wrap a storage failure in the variant matching the step it happened in
    pub fn from_storage(step: ProbeStep, err: StorageError) -> Self {
        match step {
            ProbeStep::Upload => ProbeError::Upload(err),
            ProbeStep::Download => ProbeError::Download(err),
            ProbeStep::Cleanup => ProbeError::Cleanup(err),
        }
    }

    /// Short machine-readable kind, used in the probe summary
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::Config(_) => "config",
            ProbeError::Upload(_) => "upload",
            ProbeError::Download(_) => "download",
            ProbeError::Integrity(_) => "integrity",
            ProbeError::Timeout { .. } => "timeout",
            ProbeError::Cleanup(_) => "cleanup",
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, ProbeError::Config(_))
    }
}

/// Result type alias using ProbeError
pub type Result<T> = std::result::Result<T, ProbeError>;
