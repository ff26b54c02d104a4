// Application Layer - Probe workflow

pub mod constants;
pub mod probe;

// Re-exports
pub use probe::{CleanupGuard, ProbeReport, ProbeRunner, ProbeSummary};
