//! Logging setup (tracing-subscriber)
//! Logs go to stderr so stdout stays free for the JSON summary

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::LogFormat;

/// Used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "warn,blob_probe=info,blobprobe_core=info,blobprobe_infra_azure=info";

/// Install the global subscriber
///
/// `RUST_LOG` overrides the default filter, e.g.
/// `RUST_LOG=blobprobe_infra_azure=debug ./blob-probe -c probes -s ...`
pub fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("Failed to create env filter")?;

    match format {
        LogFormat::Json => {
            // Monitoring pipelines: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to install JSON subscriber")?;
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to install pretty subscriber")?;
        }
    }

    Ok(())
}
