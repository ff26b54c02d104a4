// Probe constants (no magic values)
use std::time::Duration;

/// Fresh budget given to cleanup when the run's deadline has already
/// elapsed (timeout path), so deletion is still attempted (5s)
pub const CLEANUP_GRACE_PERIOD: Duration = Duration::from_secs(5);
