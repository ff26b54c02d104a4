// Blob Probe Core - Probe Workflow, Domain & Ports
// NO infrastructure dependencies (storage SDKs live in infra-* crates)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{ProbeError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
