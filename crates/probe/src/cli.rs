//! Command-line surface of the probe

use clap::{Parser, ValueEnum};
use std::time::Duration;

use blobprobe_core::domain::{Credential, ProbeConfig, DEFAULT_BLOB_NAME, DEFAULT_TIMEOUT};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, colored
    Pretty,
    /// JSON structured lines
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "blob-probe")]
#[command(about = "Synthetic write/read/delete probe for a blob storage container", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Storage container name
    #[arg(short = 'c', long = "container", env = "BLOB_PROBE_CONTAINER")]
    pub container: String,

    /// Storage account connection string
    #[arg(
        short = 's',
        long = "connection-string",
        env = "BLOB_PROBE_CONNECTION_STRING",
        hide_env_values = true
    )]
    pub connection_string: String,

    /// Name for the sample blob
    #[arg(short = 'n', long = "blob-name", env = "BLOB_PROBE_BLOB_NAME", default_value = DEFAULT_BLOB_NAME)]
    pub blob_name: String,

    /// Probe timeout in seconds
    #[arg(short = 't', long = "timeout", env = "BLOB_PROBE_TIMEOUT", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Log output format
    #[arg(long, env = "BLOB_PROBE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Print a JSON summary of the run on stdout
    #[arg(long)]
    pub json_summary: bool,
}

impl Cli {
    pub fn to_config(&self) -> ProbeConfig {
        ProbeConfig::new(
            self.container.clone(),
            Credential::new(self.connection_string.clone()),
        )
        .with_blob_name(self.blob_name.clone())
        .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}
