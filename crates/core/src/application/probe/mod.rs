// Probe Runner - upload, download, verify, always clean up

mod cleanup;
pub mod report;


pub use cleanup::CleanupGuard;
pub use report::{ProbeReport, ProbeSummary};

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::application::constants::CLEANUP_GRACE_PERIOD;
use crate::domain::{Deadline, PayloadFixture, ProbeConfig, ProbeOutcome, ProbeStep};
use crate::error::{ProbeError, Result};
use crate::port::{StorageClient, StorageError};

/// Runs one probe pass against a storage backend
///
/// Sequence: validate -> deadline -> upload -> download -> verify, then
/// cleanup exactly once whatever happened before it.
pub struct ProbeRunner {
    storage: Arc<dyn StorageClient>,
    payload: PayloadFixture,
    cleanup_grace: Duration,
}

impl ProbeRunner {
    /// Create a runner using the standard payload fixture
    ///
    /// # Example
    /// ```text
    /// let runner = ProbeRunner::new(Arc::new(AzureBlobStorage::from_connection_string(cs)?));
    /// let outcome = runner.run(&config).await;
    /// std::process::exit(outcome.exit_code());
    /// ```
    pub fn new(storage: Arc<dyn StorageClient>) -> Self {
        Self {
            storage,
            payload: PayloadFixture::default(),
            cleanup_grace: CLEANUP_GRACE_PERIOD,
        }
    }

    pub fn with_payload(mut self, payload: PayloadFixture) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_cleanup_grace(mut self, grace: Duration) -> Self {
        self.cleanup_grace = grace;
        self
    }

    /// Execute one probe run
    ///
    /// Never returns an error: every failure is recorded in the outcome.
    /// An invalid config short-circuits before any storage call.
    pub async fn run(&self, config: &ProbeConfig) -> ProbeOutcome {
        let started = Instant::now();
        let mut outcome = ProbeOutcome::default();

        if let Err(e) = config.validate() {
            outcome.record_failure(e);
            outcome.elapsed = started.elapsed();
            return outcome;
        }
        outcome.validated = true;

        let deadline = Deadline::after(config.timeout());
        let guard = CleanupGuard::arm(
            Arc::clone(&self.storage),
            config.container_name(),
            config.blob_name(),
            deadline,
            self.cleanup_grace,
        );

        if let Err(e) = self.execute_steps(config, &deadline, &mut outcome).await {
            outcome.record_failure(e);
        }

        match guard.run().await {
            Ok(()) => outcome.cleaned_up = true,
            Err(e) => {
                warn!(error = %e, blob = %config.blob_name(), "Failed to remove probe blob");
                outcome.cleanup_error = Some(e);
            }
        }

        outcome.elapsed = started.elapsed();
        outcome
    }

    async fn execute_steps(
        &self,
        config: &ProbeConfig,
        deadline: &Deadline,
        outcome: &mut ProbeOutcome,
    ) -> Result<()> {
        let container = config.container_name();
        let blob = config.blob_name();

        info!(container = %container, blob = %blob, bytes = self.payload.len(), "Uploading probe blob");
        bounded(
            ProbeStep::Upload,
            deadline,
            self.storage
                .put(container, blob, self.payload.as_bytes(), deadline),
        )
        .await?;
        outcome.uploaded = true;
        info!(container = %container, blob = %blob, "Probe blob uploaded");

        let mut buffer = self.payload.download_buffer();
        let bytes_read = bounded(
            ProbeStep::Download,
            deadline,
            self.storage.get(container, blob, &mut buffer, deadline),
        )
        .await?;
        outcome.downloaded = true;
        debug!(
            bytes_read = bytes_read,
            remaining = ?deadline.remaining(),
            "Probe blob downloaded"
        );

        self.payload.verify_read(&buffer, bytes_read)?;
        outcome.integrity_ok = true;

        Ok(())
    }
}

/// Await a storage call under the shared deadline
///
/// Both the runner's cut-off and an adapter-reported timeout surface as
/// `ProbeError::Timeout` for `step`.
pub(crate) async fn bounded<T, F>(step: ProbeStep, deadline: &Deadline, op: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, StorageError>>,
{
    match deadline.bound(op).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(StorageError::Timeout)) | Err(_) => Err(ProbeError::Timeout {
            step,
            budget: deadline.budget(),
        }),
        Ok(Err(e)) => Err(ProbeError::from_storage(step, e)),
    }
}
