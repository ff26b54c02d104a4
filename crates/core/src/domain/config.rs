// Probe Configuration

use std::fmt;
use std::time::Duration;

use crate::error::{ProbeError, Result};

/// Blob name used when none is given
pub const DEFAULT_BLOB_NAME: &str = "test-blob";

/// Whole-run timeout used when none is given (30s)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Opaque storage credential (connection string or SAS descriptor)
///
/// `Debug` and `Display` never print the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Raw secret, for handing to a storage adapter only
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", self)
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "<empty>")
        } else {
            write!(f, "<redacted>")
        }
    }
}

/// Configuration of a single probe run
///
/// Immutable once built. Call [`ProbeConfig::validate`] before any I/O;
/// the probe runner does this as its first step.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    container_name: String,
    credential: Credential,
    blob_name: String,
    timeout: Duration,
}

impl ProbeConfig {
    /// Create a config with the default blob name and timeout
    ///
    /// # Example
    /// ```text
    /// let config = ProbeConfig::new("probes", Credential::new(conn_str))
    ///     .with_timeout(Duration::from_secs(10));
    /// ```
    pub fn new(container_name: impl Into<String>, credential: Credential) -> Self {
        Self {
            container_name: container_name.into(),
            credential,
            blob_name: DEFAULT_BLOB_NAME.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_blob_name(mut self, blob_name: impl Into<String>) -> Self {
        self.blob_name = blob_name.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn blob_name(&self) -> &str {
        &self.blob_name
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check the config before any storage call is made
    ///
    /// # Errors
    /// - ProbeError::Config if the container name, credential or blob name
    ///   is empty, or if the timeout is zero
    pub fn validate(&self) -> Result<()> {
        if self.container_name.trim().is_empty() {
            return Err(ProbeError::Config(
                "container name cannot be empty (use -c <container>)".to_string(),
            ));
        }

        if self.credential.is_empty() {
            return Err(ProbeError::Config(
                "storage credential cannot be empty (use -s <connection-string>)".to_string(),
            ));
        }

        if self.blob_name.trim().is_empty() {
            return Err(ProbeError::Config("blob name cannot be empty".to_string()));
        }

        if self.timeout.is_zero() {
            return Err(ProbeError::Config(
                "timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ProbeConfig {
        ProbeConfig::new("probes", Credential::new("AccountName=a;AccountKey=b"))
    }

    #[test]
    fn test_defaults() {
        let config = valid();
        assert_eq!(config.blob_name(), "test-blob");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_container() {
        let config = ProbeConfig::new("", Credential::new("secret"));
        let err = config.validate().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("container"));
    }

    #[test]
    fn test_validate_empty_credential() {
        let config = ProbeConfig::new("probes", Credential::new("  "));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("credential"));
    }

    #[test]
    fn test_validate_empty_blob_name() {
        let result = valid().with_blob_name("").validate();
        assert!(result.unwrap_err().to_string().contains("blob name"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let result = valid().with_timeout(Duration::ZERO).validate();
        assert!(result.unwrap_err().to_string().contains("timeout"));
    }

    #[test]
    fn test_credential_is_redacted() {
        let config = valid();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("AccountKey"));
        assert!(debug.contains("<redacted>"));
        assert_eq!(config.credential().expose(), "AccountName=a;AccountKey=b");
    }
}
