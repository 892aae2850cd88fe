//! Rate limit information.

use std::time::Duration;

/// Longest we are willing to sleep for a reset (1 hour).
pub(crate) const MAX_WAIT_SECS: u64 = 3600;

/// Remaining requests below which we wait for the window to reset.
pub(crate) const MIN_REMAINING_THRESHOLD: u32 = 5;

/// Core API rate limit state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,

    /// Unix timestamp when the rate limit resets.
    pub reset: u64,

    /// Total requests allowed per window.
    pub limit: u32,
}

impl RateLimitInfo {
    /// How long to sleep before the next request, given the current unix time.
    ///
    /// `None` when enough requests remain or the window already reset. The
    /// wait is capped at [`MAX_WAIT_SECS`].
    #[must_use]
    pub fn wait_duration(&self, now: u64) -> Option<Duration> {
        if self.remaining >= MIN_REMAINING_THRESHOLD || self.reset <= now {
            return None;
        }
        Some(Duration::from_secs((self.reset - now).min(MAX_WAIT_SECS)))
    }
}
