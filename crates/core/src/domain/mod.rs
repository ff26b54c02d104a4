// Domain Layer - Probe configuration, fixture, deadline and outcome

pub mod config;
pub mod deadline;
pub mod outcome;
pub mod payload;
pub mod stage;

// Re-exports
pub use config::{Credential, ProbeConfig, DEFAULT_BLOB_NAME, DEFAULT_TIMEOUT};
pub use deadline::Deadline;
pub use outcome::{ProbeOutcome, EXIT_CONFIG_ERROR, EXIT_PROBE_FAILURE, EXIT_SUCCESS};
pub use payload::{IntegrityMismatch, PayloadFixture, PROBE_PAYLOAD};
pub use stage::{ProbeStage, ProbeStep};
