//! Provider pacing configuration.
//!
//! Describes how a catalog provider must be paced so a long enrichment
//! run stays within the provider's rate limit.

use std::time::Duration;

/// Pacing requirements for a provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimit {
    /// Minimum delay between successive items that hit the provider.
    pub min_delay: Duration,

    /// Cooldown after the provider signalled throttling.
    pub throttle_cooldown: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(250),
            throttle_cooldown: Duration::from_millis(5000),
        }
    }
}
