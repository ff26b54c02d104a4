// Probe State Machine

use serde::Serialize;

/// Position of a probe run in its state machine
///
/// START -> VALIDATED -> UPLOADED -> DOWNLOADED -> VERIFIED, or FAILED from
/// any of them. Cleanup is attempted from every state after START.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProbeStage {
    Started,
    Validated,
    Uploaded,
    Downloaded,
    Verified,
    Failed,
}

impl std::fmt::Display for ProbeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeStage::Started => write!(f, "STARTED"),
            ProbeStage::Validated => write!(f, "VALIDATED"),
            ProbeStage::Uploaded => write!(f, "UPLOADED"),
            ProbeStage::Downloaded => write!(f, "DOWNLOADED"),
            ProbeStage::Verified => write!(f, "VERIFIED"),
            ProbeStage::Failed => write!(f, "FAILED"),
        }
    }
}

/// Storage operation a probe performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStep {
    Upload,
    Download,
    Cleanup,
}

impl std::fmt::Display for ProbeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeStep::Upload => write!(f, "upload"),
            ProbeStep::Download => write!(f, "download"),
            ProbeStep::Cleanup => write!(f, "cleanup"),
        }
    }
}
