// Blob Probe Infrastructure - Azure Blob Storage Adapter
// Implements: StorageClient

pub mod blob_storage;

pub use blob_storage::AzureBlobStorage;
