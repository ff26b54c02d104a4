// Azure Blob Storage implementation of the StorageClient port
use async_trait::async_trait;
use azure_core::{StatusCode, Url};
use azure_storage::{CloudLocation, ConnectionString};
use azure_storage_blobs::prelude::*;
use std::fmt;
use tracing::debug;

use blobprobe_core::domain::Deadline;
use blobprobe_core::port::{StorageClient, StorageError};

/// StorageClient backed by an Azure Storage account
///
/// Built from a connection string. Account key and SAS credentials are both
/// accepted; a `BlobEndpoint` entry (Azurite, private endpoints) overrides
/// the public cloud location.
#[derive(Clone)]
pub struct AzureBlobStorage {
    account: String,
    service: BlobServiceClient,
}

impl fmt::Debug for AzureBlobStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureBlobStorage")
            .field("account", &self.account)
            .finish()
    }
}

impl AzureBlobStorage {
    /// Create a client from an Azure Storage connection string
    ///
    /// No network I/O happens here; bad credentials only show up on the
    /// first request.
    ///
    /// # Errors
    /// - StorageError::InvalidCredential if the string cannot be parsed or
    ///   carries neither an account key nor a SAS token
    ///
    /// # Example
    /// ```ignore
    /// let storage = AzureBlobStorage::from_connection_string(
    ///     "DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=...;EndpointSuffix=core.windows.net",
    /// )?;
    /// ```
    pub fn from_connection_string(connection_string: &str) -> Result<Self, StorageError> {
        // The SDK error text is kept out of the message: it may echo the secret
        let parsed = ConnectionString::new(connection_string).map_err(|_| {
            StorageError::InvalidCredential("malformed connection string".to_string())
        })?;

        let credentials = parsed.storage_credentials().map_err(|_| {
            StorageError::InvalidCredential(
                "connection string has neither AccountKey nor SharedAccessSignature".to_string(),
            )
        })?;

        let account = match (parsed.account_name, parsed.blob_endpoint) {
            (Some(account), _) => account.to_string(),
            (None, Some(endpoint)) => account_from_endpoint(endpoint)?,
            (None, None) => {
                return Err(StorageError::InvalidCredential(
                    "connection string has neither AccountName nor BlobEndpoint".to_string(),
                ))
            }
        };

        let builder = match parsed.blob_endpoint {
            Some(endpoint) => {
                debug!(endpoint = %endpoint, "Using custom blob endpoint");
                ClientBuilder::with_location(
                    CloudLocation::Custom {
                        account: account.clone(),
                        uri: endpoint.trim_end_matches('/').to_string(),
                    },
                    credentials,
                )
            }
            None => ClientBuilder::new(account.clone(), credentials),
        };

        debug!(account = %account, "Created Azure Blob Storage client");

        Ok(Self {
            account,
            service: builder.blob_service_client(),
        })
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    fn blob_client(&self, container: &str, key: &str) -> BlobClient {
        self.service.container_client(container).blob_client(key)
    }
}

/// Account name from a blob endpoint such as `https://acct.blob.core.windows.net`
fn account_from_endpoint(endpoint: &str) -> Result<String, StorageError> {
    let url = Url::parse(endpoint)
        .map_err(|e| StorageError::InvalidCredential(format!("invalid BlobEndpoint: {}", e)))?;

    url.host_str()
        .and_then(|host| host.split('.').next())
        .filter(|account| !account.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            StorageError::InvalidCredential("BlobEndpoint has no account host".to_string())
        })
}

/// Refuse to start a request once the probe deadline has passed
fn ensure_time_left(deadline: &Deadline) -> Result<(), StorageError> {
    if deadline.is_elapsed() {
        return Err(StorageError::Timeout);
    }
    Ok(())
}

/// Map an HTTP status (if any) and message onto the port's error type
fn classify(status: Option<StatusCode>, message: String) -> StorageError {
    match status {
        Some(StatusCode::NotFound) => StorageError::NotFound(message),
        Some(StatusCode::Unauthorized) | Some(StatusCode::Forbidden) => {
            StorageError::PermissionDenied(message)
        }
        _ => StorageError::Transport(message),
    }
}

fn map_azure_error(err: azure_core::Error) -> StorageError {
    let status = err.as_http_error().map(|http| http.status());
    classify(status, err.to_string())
}

#[async_trait]
impl StorageClient for AzureBlobStorage {
    async fn put(
        &self,
        container: &str,
        key: &str,
        data: &[u8],
        deadline: &Deadline,
    ) -> Result<(), StorageError> {
        ensure_time_left(deadline)?;
        debug!(
            container = %container,
            blob = %key,
            bytes = data.len(),
            remaining = ?deadline.remaining(),
            "Putting block blob"
        );

        self.blob_client(container, key)
            .put_block_blob(data.to_vec())
            .await
            .map_err(map_azure_error)?;

        Ok(())
    }

    async fn get(
        &self,
        container: &str,
        key: &str,
        buffer: &mut [u8],
        deadline: &Deadline,
    ) -> Result<usize, StorageError> {
        ensure_time_left(deadline)?;
        debug!(
            container = %container,
            blob = %key,
            buffer_len = buffer.len(),
            remaining = ?deadline.remaining(),
            "Downloading blob"
        );

        let content = self
            .blob_client(container, key)
            .get_content()
            .await
            .map_err(map_azure_error)?;

        if content.len() > buffer.len() {
            return Err(StorageError::BufferTooSmall {
                capacity: buffer.len(),
                actual: content.len(),
            });
        }
        buffer[..content.len()].copy_from_slice(&content);

        debug!(bytes_read = content.len(), "Blob downloaded");
        Ok(content.len())
    }

    async fn delete(
        &self,
        container: &str,
        key: &str,
        deadline: &Deadline,
    ) -> Result<(), StorageError> {
        ensure_time_left(deadline)?;
        debug!(container = %container, blob = %key, "Deleting blob");

        self.blob_client(container, key)
            .delete()
            .await
            .map_err(map_azure_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const AZURITE: &str = "DefaultEndpointsProtocol=http;AccountName=devstoreaccount1;AccountKey=Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==;BlobEndpoint=http://127.0.0.1:10000/devstoreaccount1;";

    #[test]
    fn test_from_azurite_connection_string() {
        let storage = AzureBlobStorage::from_connection_string(AZURITE).unwrap();
        assert_eq!(storage.account(), "devstoreaccount1");

        let debug = format!("{:?}", storage);
        assert!(!debug.contains("Eby8vdM02"));
    }

    #[test]
    fn test_public_cloud_connection_string() {
        let storage = AzureBlobStorage::from_connection_string(
            "DefaultEndpointsProtocol=https;AccountName=probeacct;AccountKey=Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==;EndpointSuffix=core.windows.net",
        )
        .unwrap();
        assert_eq!(storage.account(), "probeacct");
    }

    #[test]
    fn test_malformed_connection_string() {
        let err = AzureBlobStorage::from_connection_string("not-a-connection-string").unwrap_err();
        assert!(matches!(err, StorageError::InvalidCredential(_)));
    }

    #[test]
    fn test_connection_string_without_secret() {
        let err = AzureBlobStorage::from_connection_string("AccountName=probeacct").unwrap_err();
        assert!(matches!(err, StorageError::InvalidCredential(_)));
    }

    #[test]
    fn test_account_from_endpoint() {
        assert_eq!(
            account_from_endpoint("https://probeacct.blob.core.windows.net/").unwrap(),
            "probeacct"
        );
        assert!(account_from_endpoint("::not a url").is_err());
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify(Some(StatusCode::NotFound), "BlobNotFound".into()),
            StorageError::NotFound(_)
        ));
        assert!(matches!(
            classify(Some(StatusCode::Forbidden), "AuthorizationFailure".into()),
            StorageError::PermissionDenied(_)
        ));
        assert!(matches!(
            classify(Some(StatusCode::Unauthorized), "NoAuthenticationInformation".into()),
            StorageError::PermissionDenied(_)
        ));
        assert!(matches!(
            classify(Some(StatusCode::InternalServerError), "boom".into()),
            StorageError::Transport(_)
        ));
        assert!(matches!(classify(None, "dns".into()), StorageError::Transport(_)));
    }

    #[tokio::test]
    async fn test_elapsed_deadline_short_circuits() {
        let storage = AzureBlobStorage::from_connection_string(AZURITE).unwrap();
        let deadline = Deadline::after(Duration::ZERO);

        let err = storage
            .put("probes", "test-blob", b"data", &deadline)
            .await
            .unwrap_err();
        assert_eq!(err, StorageError::Timeout);

        let mut buffer = [0u8; 4];
        let err = storage
            .get("probes", "test-blob", &mut buffer, &deadline)
            .await
            .unwrap_err();
        assert_eq!(err, StorageError::Timeout);

        tokio_test::assert_err!(storage.delete("probes", "test-blob", &deadline).await);
    }
}
