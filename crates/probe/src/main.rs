//! Blob Probe - Main Entry Point
//! One synthetic upload/download/verify/cleanup pass, then exit

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

use blobprobe_core::application::{ProbeReport, ProbeRunner};
use blobprobe_core::domain::{ProbeConfig, ProbeOutcome, EXIT_PROBE_FAILURE};
use blobprobe_infra_azure::AzureBlobStorage;

use cli::Cli;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> ExitCode {
    // Missing -c / -s: clap prints usage and exits with status 2
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.log_format) {
        eprintln!("Failed to initialize logging: {:#}", e);
    }

    let code = exit_status(run(&cli).await);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

/// Map the result of `run` to a process exit status
///
/// A startup error (bad connection string, unwritable stdout) counts as a
/// probe failure.
fn exit_status(result: Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Probe could not start");
            EXIT_PROBE_FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<i32> {
    info!("Blob probe v{} (use '-h' for help)", VERSION);

    // 1. Configuration
    let config = cli.to_config();
    info!(
        timeout = ?config.timeout(),
        blob = %config.blob_name(),
        container = %config.container_name(),
        credential = %config.credential(),
        "Probe configured"
    );

    if let Err(e) = config.validate() {
        let mut outcome = ProbeOutcome::default();
        outcome.record_failure(e);
        return finish(cli, &config, &outcome);
    }

    // 2. Storage adapter (DI wiring)
    let storage = AzureBlobStorage::from_connection_string(config.credential().expose())
        .context("Could not create storage client from connection string")?;
    info!(account = %storage.account(), "Storage client ready");

    // 3. Probe
    let runner = ProbeRunner::new(Arc::new(storage));
    let outcome = runner.run(&config).await;

    finish(cli, &config, &outcome)
}

/// Emit the terminal report and pick the exit status
fn finish(cli: &Cli, config: &ProbeConfig, outcome: &ProbeOutcome) -> Result<i32> {
    let report = ProbeReport::new(config, outcome);
    report.log();

    if cli.json_summary {
        let json = report
            .summary()
            .to_json()
            .context("Failed to serialize probe summary")?;
        println!("{}", json);
    }

    Ok(report.exit_code())
}
