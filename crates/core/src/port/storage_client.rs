// Storage Client Port
// Capability set the probe consumes from a blob-storage backend
use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Deadline;

/// Storage backend errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Deadline elapsed before the operation completed")]
    Timeout,

    #[error("Buffer too small: blob has {actual} bytes, buffer holds {capacity}")]
    BufferTooSmall { capacity: usize, actual: usize },

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Storage Client trait
///
/// Every call receives the probe's single shared deadline. Implementations
/// must not start work once it has elapsed (return `StorageError::Timeout`);
/// the runner additionally cancels any call still in flight when it passes.
///
/// Implementations:
/// - AzureBlobStorage (infra-azure): Azure Blob Storage via connection string
/// - mocks::MockStorageClient: in-memory, call-recording
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Write `data` to `container/key`, replacing any existing blob
    async fn put(
        &self,
        container: &str,
        key: &str,
        data: &[u8],
        deadline: &Deadline,
    ) -> Result<(), StorageError>;

    /// Read `container/key` into `buffer`, returning the number of bytes read
    ///
    /// # Errors
    /// - StorageError::BufferTooSmall if the blob does not fit in `buffer`
    async fn get(
        &self,
        container: &str,
        key: &str,
        buffer: &mut [u8],
        deadline: &Deadline,
    ) -> Result<usize, StorageError>;

    /// Delete `container/key`
    async fn delete(&self, container: &str, key: &str, deadline: &Deadline)
        -> Result<(), StorageError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// A call received by the mock, in order
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum StorageCall {
        Put {
            container: String,
            key: String,
            data: Vec<u8>,
        },
        Get {
            container: String,
            key: String,
            buffer_len: usize,
        },
        Delete {
            container: String,
            key: String,
        },
    }

    /// Mock behavior for one operation
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Act like an in-memory blob store
        Succeed,
        /// Fail with the given error
        Fail(StorageError),
        /// Never complete (deadline testing)
        Hang,
        /// get only: serve these bytes instead of the stored blob
        Serve(Vec<u8>),
    }

    /// In-memory StorageClient that records every call
    pub struct MockStorageClient {
        blobs: Arc<Mutex<HashMap<(String, String), Vec<u8>>>>,
        calls: Arc<Mutex<Vec<StorageCall>>>,
        put_behavior: MockBehavior,
        get_behavior: MockBehavior,
        delete_behavior: MockBehavior,
    }

    impl MockStorageClient {
        pub fn new() -> Self {
            Self {
                blobs: Arc::new(Mutex::new(HashMap::new())),
                calls: Arc::new(Mutex::new(Vec::new())),
                put_behavior: MockBehavior::Succeed,
                get_behavior: MockBehavior::Succeed,
                delete_behavior: MockBehavior::Succeed,
            }
        }

        pub fn with_put(mut self, behavior: MockBehavior) -> Self {
            self.put_behavior = behavior;
            self
        }

        pub fn with_get(mut self, behavior: MockBehavior) -> Self {
            self.get_behavior = behavior;
            self
        }

        pub fn with_delete(mut self, behavior: MockBehavior) -> Self {
            self.delete_behavior = behavior;
            self
        }

        pub fn calls(&self) -> Vec<StorageCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn put_count(&self) -> usize {
            self.count(|c| matches!(c, StorageCall::Put { .. }))
        }

        pub fn get_count(&self) -> usize {
            self.count(|c| matches!(c, StorageCall::Get { .. }))
        }

        pub fn delete_count(&self) -> usize {
            self.count(|c| matches!(c, StorageCall::Delete { .. }))
        }

        /// Whether `container/key` is currently stored
        pub fn contains(&self, container: &str, key: &str) -> bool {
            self.blobs
                .lock()
                .unwrap()
                .contains_key(&(container.to_string(), key.to_string()))
        }

        fn count(&self, pred: impl Fn(&StorageCall) -> bool) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
        }

        fn record(&self, call: StorageCall) {
            self.calls.lock().unwrap().push(call);
        }

        fn blob_key(container: &str, key: &str) -> (String, String) {
            (container.to_string(), key.to_string())
        }
    }

    impl Default for MockStorageClient {
        fn default() -> Self {
            Self::new()
        }
    }

    fn copy_into(content: &[u8], buffer: &mut [u8]) -> Result<usize, StorageError> {
        if content.len() > buffer.len() {
            return Err(StorageError::BufferTooSmall {
                capacity: buffer.len(),
                actual: content.len(),
            });
        }
        buffer[..content.len()].copy_from_slice(content);
        Ok(content.len())
    }

    #[async_trait]
    impl StorageClient for MockStorageClient {
        async fn put(
            &self,
            container: &str,
            key: &str,
            data: &[u8],
            deadline: &Deadline,
        ) -> Result<(), StorageError> {
            self.record(StorageCall::Put {
                container: container.to_string(),
                key: key.to_string(),
                data: data.to_vec(),
            });

            match self.put_behavior.clone() {
                MockBehavior::Fail(err) => Err(err),
                MockBehavior::Hang => std::future::pending().await,
                _ if deadline.is_elapsed() => Err(StorageError::Timeout),
                _ => {
                    self.blobs
                        .lock()
                        .unwrap()
                        .insert(Self::blob_key(container, key), data.to_vec());
                    Ok(())
                }
            }
        }

        async fn get(
            &self,
            container: &str,
            key: &str,
            buffer: &mut [u8],
            deadline: &Deadline,
        ) -> Result<usize, StorageError> {
            self.record(StorageCall::Get {
                container: container.to_string(),
                key: key.to_string(),
                buffer_len: buffer.len(),
            });

            match self.get_behavior.clone() {
                MockBehavior::Fail(err) => Err(err),
                MockBehavior::Hang => std::future::pending().await,
                _ if deadline.is_elapsed() => Err(StorageError::Timeout),
                MockBehavior::Serve(content) => copy_into(&content, buffer),
                MockBehavior::Succeed => {
                    let stored = self
                        .blobs
                        .lock()
                        .unwrap()
                        .get(&Self::blob_key(container, key))
                        .cloned();
                    match stored {
                        Some(content) => copy_into(&content, buffer),
                        None => Err(StorageError::NotFound(format!("{}/{}", container, key))),
                    }
                }
            }
        }

        async fn delete(
            &self,
            container: &str,
            key: &str,
            deadline: &Deadline,
        ) -> Result<(), StorageError> {
            self.record(StorageCall::Delete {
                container: container.to_string(),
                key: key.to_string(),
            });

            match self.delete_behavior.clone() {
                MockBehavior::Fail(err) => Err(err),
                MockBehavior::Hang => std::future::pending().await,
                _ if deadline.is_elapsed() => Err(StorageError::Timeout),
                _ => {
                    let removed = self
                        .blobs
                        .lock()
                        .unwrap()
                        .remove(&Self::blob_key(container, key));
                    match removed {
                        Some(_) => Ok(()),
                        None => Err(StorageError::NotFound(format!("{}/{}", container, key))),
                    }
                }
            }
        }
    }
}
