//! Minimum-interval pacing between oracle calls.

use std::time::Duration;

use tokio::time::Instant;

/// Minimum spacing between the starts of two consecutive oracle calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    min_interval: Duration,
}

impl PacingPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

    #[must_use]
    pub fn min_interval(min_interval: Duration) -> Self {
        Self { min_interval }
    }

    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self::min_interval(Duration::from_millis(ms))
    }

    /// No waiting between calls.
    #[must_use]
    pub fn disabled() -> Self {
        Self::min_interval(Duration::ZERO)
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.min_interval
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.min_interval.is_zero()
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::min_interval(Self::DEFAULT_INTERVAL)
    }
}

/// Per-run pacing state. The first call never waits.
#[derive(Debug)]
pub(crate) struct Pacer {
    policy: PacingPolicy,
    last_call: Option<Instant>,
}

impl Pacer {
    pub(crate) fn new(policy: PacingPolicy) -> Self {
        Self {
            policy,
            last_call: None,
        }
    }

    /// Wait until the next call is allowed, then mark it as started.
    pub(crate) async fn ready(&mut self) {
        if let Some(last) = self.last_call {
            if !self.policy.is_disabled() {
                tokio::time::sleep_until(last + self.policy.interval()).await;
            }
        }
        self.last_call = Some(Instant::now());
    }
}
