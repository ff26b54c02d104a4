// Scoped cleanup of the probe blob

use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{error, info, warn};

use super::bounded;
use crate::domain::{Deadline, ProbeStep};
use crate::error::Result;
use crate::port::StorageClient;

/// Deletion intent for the probe blob, registered right after the deadline
///
/// `run` performs the delete exactly once. A guard dropped without running
/// (caller cancelled the probe future, or a step panicked) schedules a
/// best-effort delete on the current runtime instead.
pub struct CleanupGuard {
    storage: Arc<dyn StorageClient>,
    container: String,
    blob: String,
    deadline: Deadline,
    grace: Duration,
    armed: bool,
}

impl CleanupGuard {
    pub fn arm(
        storage: Arc<dyn StorageClient>,
        container: impl Into<String>,
        blob: impl Into<String>,
        deadline: Deadline,
        grace: Duration,
    ) -> Self {
        Self {
            storage,
            container: container.into(),
            blob: blob.into(),
            deadline,
            grace,
            armed: true,
        }
    }

    /// Delete the blob under the shared deadline (or the grace window if it
    /// has already elapsed)
    pub async fn run(mut self) -> Result<()> {
        self.armed = false;

        if self.deadline.is_elapsed() {
            warn!(
                grace = ?self.grace,
                "Probe deadline already elapsed, cleanup gets a grace window"
            );
        }
        let deadline = self.deadline.or_grace(self.grace);

        info!(container = %self.container, blob = %self.blob, "Beginning clean up");
        bounded(
            ProbeStep::Cleanup,
            &deadline,
            self.storage.delete(&self.container, &self.blob, &deadline),
        )
        .await?;

        info!(container = %self.container, blob = %self.blob, "Removed probe blob");
        Ok(())
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let container = std::mem::take(&mut self.container);
        let blob = std::mem::take(&mut self.blob);

        match Handle::try_current() {
            Ok(handle) => {
                warn!(
                    container = %container,
                    blob = %blob,
                    "Cleanup guard dropped before running, scheduling delete"
                );
                let storage = Arc::clone(&self.storage);
                let deadline = Deadline::after(self.grace);
                handle.spawn(async move {
                    match deadline.bound(storage.delete(&container, &blob, &deadline)).await {
                        Ok(Ok(())) => info!(container = %container, blob = %blob, "Removed probe blob"),
                        Ok(Err(e)) => warn!(error = %e, blob = %blob, "Deferred cleanup failed"),
                        Err(_) => warn!(blob = %blob, "Deferred cleanup timed out"),
                    }
                });
            }
            Err(_) => {
                error!(
                    container = %container,
                    blob = %blob,
                    "No runtime available for cleanup, probe blob may be left behind"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::storage_client::mocks::{MockBehavior, MockStorageClient};
    use crate::port::StorageError;
    use crate::ProbeError;

    #[tokio::test]
    async fn test_run_deletes_once() {
        let storage = Arc::new(MockStorageClient::new());
        let deadline = Deadline::after(Duration::from_secs(5));
        storage
            .put("probes", "test-blob", b"data", &deadline)
            .await
            .unwrap();

        let guard = CleanupGuard::arm(
            storage.clone(),
            "probes",
            "test-blob",
            deadline,
            Duration::from_secs(1),
        );
        tokio_test::assert_ok!(guard.run().await);

        // Dropping the consumed guard must not delete again
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(storage.delete_count(), 1);
        assert!(!storage.contains("probes", "test-blob"));
    }

    #[tokio::test]
    async fn test_run_reports_delete_failure() {
        let storage = Arc::new(
            MockStorageClient::new()
                .with_delete(MockBehavior::Fail(StorageError::PermissionDenied("ro".into()))),
        );
        let guard = CleanupGuard::arm(
            storage.clone(),
            "probes",
            "test-blob",
            Deadline::after(Duration::from_secs(5)),
            Duration::from_secs(1),
        );

        let err = tokio_test::assert_err!(guard.run().await);
        assert!(matches!(err, ProbeError::Cleanup(StorageError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn test_run_uses_grace_after_deadline() {
        let storage = Arc::new(MockStorageClient::new());
        let expired = Deadline::after(Duration::ZERO);
        let live = Deadline::after(Duration::from_secs(5));
        storage.put("probes", "test-blob", b"data", &live).await.unwrap();

        let guard = CleanupGuard::arm(
            storage.clone(),
            "probes",
            "test-blob",
            expired,
            Duration::from_secs(1),
        );
        tokio_test::assert_ok!(guard.run().await);
        assert!(!storage.contains("probes", "test-blob"));
    }

    #[tokio::test]
    async fn test_dropped_guard_schedules_delete() {
        let storage = Arc::new(MockStorageClient::new());
        let guard = CleanupGuard::arm(
            storage.clone(),
            "probes",
            "test-blob",
            Deadline::after(Duration::from_secs(5)),
            Duration::from_secs(1),
        );
        drop(guard);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(storage.delete_count(), 1);
    }
}
