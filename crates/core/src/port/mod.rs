// Port Layer - Interfaces for external dependencies

pub mod storage_client;

// Re-exports
pub use storage_client::{StorageClient, StorageError};
