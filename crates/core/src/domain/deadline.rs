// Probe Deadline
// One budget for the whole run, shared by every storage call

use std::future::Future;
use std::time::Duration;
use tokio::time::{error::Elapsed, timeout_at, Instant};

/// Fallback when `now + budget` overflows the clock (~30 years)
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// A single point in time that bounds a probe run
///
/// Computed once from the configured timeout. Copies refer to the same
/// instant, so passing it to each step never re-times the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    /// Deadline `budget` from now
    pub fn after(budget: Duration) -> Self {
        let now = Instant::now();
        let at = now
            .checked_add(budget)
            .unwrap_or_else(|| now + FAR_FUTURE);
        Self { at, budget }
    }

    /// Budget the deadline was created with
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left before the deadline (zero once elapsed)
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_elapsed(&self) -> bool {
        Instant::now() >= self.at
    }

    /// This deadline, or a fresh `grace` window if it has already elapsed
    pub fn or_grace(self, grace: Duration) -> Self {
        if self.is_elapsed() {
            Deadline::after(grace)
        } else {
            self
        }
    }

    /// Drive `future` until it completes or the deadline passes
    ///
    /// On expiry the in-flight future is dropped, aborting the operation.
    pub async fn bound<F: Future>(&self, future: F) -> Result<F::Output, Elapsed> {
        timeout_at(self.at, future).await
    }
}
