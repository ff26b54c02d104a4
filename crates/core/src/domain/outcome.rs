// Probe Outcome

use std::time::Duration;

use crate::domain::ProbeStage;
use crate::error::ProbeError;

/// Exit status of a run where upload, download and integrity all succeeded
pub const EXIT_SUCCESS: i32 = 0;

/// Exit status of a failed upload, download, integrity check or timeout
pub const EXIT_PROBE_FAILURE: i32 = 1;

/// Exit status of a rejected configuration (matches clap usage errors)
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// What a single probe run achieved
///
/// Built by the runner step by step; read once to produce the terminal report.
#[derive(Debug, Default)]
pub struct ProbeOutcome {
    pub validated: bool,
    pub uploaded: bool,
    pub downloaded: bool,
    pub integrity_ok: bool,
    pub cleaned_up: bool,
    /// First failure of the run (terminal reason)
    pub error: Option<ProbeError>,
    /// Cleanup failure, reported but never gating the exit status
    pub cleanup_error: Option<ProbeError>,
    pub elapsed: Duration,
}

impl ProbeOutcome {
    /// Record a failure; only the first one is kept
    pub fn record_failure(&mut self, err: ProbeError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.uploaded && self.downloaded && self.integrity_ok
    }

    pub fn stage(&self) -> ProbeStage {
        if self.error.is_some() {
            ProbeStage::Failed
        } else if self.integrity_ok {
            ProbeStage::Verified
        } else if self.downloaded {
            ProbeStage::Downloaded
        } else if self.uploaded {
            ProbeStage::Uploaded
        } else if self.validated {
            ProbeStage::Validated
        } else {
            ProbeStage::Started
        }
    }

    /// Process exit status for this outcome (cleanup never affects it)
    pub fn exit_code(&self) -> i32 {
        match &self.error {
            Some(err) if err.is_config() => EXIT_CONFIG_ERROR,
            Some(_) => EXIT_PROBE_FAILURE,
            None if self.is_success() => EXIT_SUCCESS,
            None => EXIT_PROBE_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::StorageError;

    fn verified() -> ProbeOutcome {
        ProbeOutcome {
            validated: true,
            uploaded: true,
            downloaded: true,
            integrity_ok: true,
            cleaned_up: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_stage_progression() {
        let mut outcome = ProbeOutcome::default();
        assert_eq!(outcome.stage(), ProbeStage::Started);
        outcome.validated = true;
        assert_eq!(outcome.stage(), ProbeStage::Validated);
        outcome.uploaded = true;
        assert_eq!(outcome.stage(), ProbeStage::Uploaded);
        outcome.downloaded = true;
        assert_eq!(outcome.stage(), ProbeStage::Downloaded);
        outcome.integrity_ok = true;
        assert_eq!(outcome.stage(), ProbeStage::Verified);
    }

    #[test]
    fn test_first_failure_wins() {
        let mut outcome = ProbeOutcome::default();
        outcome.record_failure(ProbeError::Upload(StorageError::Transport("reset".into())));
        outcome.record_failure(ProbeError::Download(StorageError::Timeout));
        assert!(matches!(outcome.error, Some(ProbeError::Upload(_))));
        assert_eq!(outcome.stage(), ProbeStage::Failed);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(verified().exit_code(), EXIT_SUCCESS);

        let mut cleanup_failed = verified();
        cleanup_failed.cleaned_up = false;
        cleanup_failed.cleanup_error = Some(ProbeError::Cleanup(StorageError::Timeout));
        assert_eq!(cleanup_failed.exit_code(), EXIT_SUCCESS);

        let mut config = ProbeOutcome::default();
        config.record_failure(ProbeError::Config("container name cannot be empty".into()));
        assert_eq!(config.exit_code(), EXIT_CONFIG_ERROR);

        let mut integrity = verified();
        integrity.integrity_ok = false;
        assert_eq!(integrity.exit_code(), EXIT_PROBE_FAILURE);
    }
}
