//! Enrichment run configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use top2000_catalog::RateLimit;

use crate::errors::{Error, Result};

/// Items processed per credential before a refresh is forced.
pub const DEFAULT_REFRESH_INTERVAL: usize = 1000;
pub const DEFAULT_PACING_INTERVAL: Duration = Duration::from_millis(250);
pub const DEFAULT_THROTTLE_COOLDOWN: Duration = Duration::from_millis(5000);

/// What the orchestrator does with an item after the provider throttled it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ThrottlePolicy {
    /// Forfeit the item and move on once the cooldown has elapsed.
    #[default]
    Advance,
    /// Re-run the item's chain after each cooldown, up to `max_retries` times.
    RetryAfterCooldown { max_retries: u32 },
}

impl ThrottlePolicy {
    /// `0` means advance.
    pub fn from_retries(max_retries: u32) -> Self {
        if max_retries == 0 {
            ThrottlePolicy::Advance
        } else {
            ThrottlePolicy::RetryAfterCooldown { max_retries }
        }
    }

    pub fn max_retries(&self) -> u32 {
        match self {
            ThrottlePolicy::Advance => 0,
            ThrottlePolicy::RetryAfterCooldown { max_retries } => *max_retries,
        }
    }
}

/// Tuning knobs for an enrichment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentConfig {
    /// Credential refresh cadence, in processed items.
    pub refresh_interval: usize,
    /// Wait after an item that made at least one external call.
    pub pacing_interval: Duration,
    /// Wait after the provider signalled throttling.
    pub throttle_cooldown: Duration,
    pub throttle_policy: ThrottlePolicy,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            pacing_interval: DEFAULT_PACING_INTERVAL,
            throttle_cooldown: DEFAULT_THROTTLE_COOLDOWN,
            throttle_policy: ThrottlePolicy::Advance,
        }
    }
}

impl EnrichmentConfig {
    /// Defaults with the pacing a provider asks for.
    pub fn for_rate_limit(rate_limit: &RateLimit) -> Self {
        Self {
            pacing_interval: rate_limit.min_delay,
            throttle_cooldown: rate_limit.throttle_cooldown,
            ..Self::default()
        }
    }

    pub fn with_refresh_interval(mut self, refresh_interval: usize) -> Self {
        self.refresh_interval = refresh_interval;
        self
    }

    pub fn with_throttle_policy(mut self, policy: ThrottlePolicy) -> Self {
        self.throttle_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval == 0 {
            return Err(Error::InvalidConfigValue(
                "refresh_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
