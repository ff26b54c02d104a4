// Terminal probe report
// One log statement and one summary, both derived from the finished outcome

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::domain::{ProbeConfig, ProbeOutcome, ProbeStage};

/// Machine-readable snapshot of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct ProbeSummary {
    pub container: String,
    pub blob: String,
    pub stage: ProbeStage,
    pub success: bool,
    pub uploaded: bool,
    pub downloaded: bool,
    pub integrity_ok: bool,
    pub cleaned_up: bool,
    pub error_kind: Option<&'static str>,
    pub error: Option<String>,
    pub cleanup_error: Option<String>,
    pub elapsed_ms: u64,
    pub finished_at: DateTime<Utc>,
    pub exit_code: i32,
}

impl ProbeSummary {
    pub fn from_outcome(config: &ProbeConfig, outcome: &ProbeOutcome) -> Self {
        Self {
            container: config.container_name().to_string(),
            blob: config.blob_name().to_string(),
            stage: outcome.stage(),
            success: outcome.is_success(),
            uploaded: outcome.uploaded,
            downloaded: outcome.downloaded,
            integrity_ok: outcome.integrity_ok,
            cleaned_up: outcome.cleaned_up,
            error_kind: outcome.error.as_ref().map(|e| e.kind()),
            error: outcome.error.as_ref().map(|e| e.to_string()),
            cleanup_error: outcome.cleanup_error.as_ref().map(|e| e.to_string()),
            elapsed_ms: u64::try_from(outcome.elapsed.as_millis()).unwrap_or(u64::MAX),
            finished_at: Utc::now(),
            exit_code: outcome.exit_code(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Final report of a probe run
pub struct ProbeReport {
    summary: ProbeSummary,
}

impl ProbeReport {
    pub fn new(config: &ProbeConfig, outcome: &ProbeOutcome) -> Self {
        Self {
            summary: ProbeSummary::from_outcome(config, outcome),
        }
    }

    pub fn summary(&self) -> &ProbeSummary {
        &self.summary
    }

    pub fn exit_code(&self) -> i32 {
        self.summary.exit_code
    }

    /// Emit the single terminal log line for the run
    pub fn log(&self) {
        let s = &self.summary;
        match &s.error {
            None => info!(
                container = %s.container,
                blob = %s.blob,
                stage = %s.stage,
                cleaned_up = s.cleaned_up,
                elapsed_ms = s.elapsed_ms,
                "File integrity check successful. Probe finished with success"
            ),
            Some(reason) => error!(
                container = %s.container,
                blob = %s.blob,
                stage = %s.stage,
                kind = s.error_kind.unwrap_or("unknown"),
                cleaned_up = s.cleaned_up,
                elapsed_ms = s.elapsed_ms,
                reason = %reason,
                "Probe finished with failure"
            ),
        }
    }
}
