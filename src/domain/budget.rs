//! Rate-limit budgets and adaptive cache lifetimes.
//!
//! A budget is static configuration describing how many requests a source
//! grants per period and how many are assumed to remain. It is never used to
//! block a request; its only job is to stretch cache lifetimes when quota
//! runs low, trading staleness for quota preservation.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fraction of the limit below which a source's quota counts as scarce,
/// unless the source configures its own threshold.
pub const DEFAULT_SCARCITY_THRESHOLD: f64 = 0.25;

/// Configured request budget for one source.
///
/// # Example
/// ```
/// use user_fanout::RateLimitBudget;
/// use std::time::Duration;
///
/// let budget = RateLimitBudget::new(60, Duration::from_secs(3600), 10);
///
/// // 10 of 60 remaining is below a 0.2 threshold: lifetime doubles.
/// let lifetime = budget.cache_lifetime(Duration::from_secs(3600), 0.2);
/// assert_eq!(lifetime, Duration::from_secs(7200));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitBudget {
    limit: u32,
    period: Duration,
    remaining: u32,
}

impl RateLimitBudget {
    /// Create a budget of `limit` requests per `period`, with `remaining`
    /// requests assumed left in the current period.
    pub fn new(limit: u32, period: Duration, remaining: u32) -> Self {
        Self {
            limit,
            period,
            remaining,
        }
    }

    /// Maximum requests per period.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Length of one rate-limit period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Requests assumed to remain in the current period.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether the remaining quota is below `threshold` of the limit.
    pub fn is_scarce(&self, threshold: f64) -> bool {
        (self.remaining as f64) < (self.limit as f64) * threshold
    }

    /// Compute the cache lifetime for a response fetched under this budget.
    ///
    /// The lifetime is `base`, doubled when the remaining quota is scarce:
    /// the scarcer the quota, the longer cached data is served instead of
    /// spending another request.
    pub fn cache_lifetime(&self, base: Duration, threshold: f64) -> Duration {
        if self.is_scarce(threshold) {
            base * 2
        } else {
            base
        }
    }
}
