//! Pacing between external calls.
//!
//! Waits are plain timed sleeps on the run's own task. The orchestrator calls
//! the pacer strictly sequentially, so nothing is queued or shared.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use super::config::EnrichmentConfig;

/// Spacing policy for a sequential enrichment run.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Standard wait after an item that reached the provider.
    async fn wait_before_call(&self);

    /// Cooldown after the provider signalled throttling.
    async fn on_throttled(&self);
}

/// Fixed-interval pacer with a fixed throttling cooldown.
#[derive(Debug, Clone)]
pub struct FixedIntervalPacer {
    interval: Duration,
    cooldown: Duration,
}

impl FixedIntervalPacer {
    pub fn new(interval: Duration, cooldown: Duration) -> Self {
        Self { interval, cooldown }
    }

    pub fn from_config(config: &EnrichmentConfig) -> Self {
        Self::new(config.pacing_interval, config.throttle_cooldown)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}

#[async_trait]
impl Pacer for FixedIntervalPacer {
    async fn wait_before_call(&self) {
        if self.interval > Duration::ZERO {
            debug!("Pacer: waiting {:?}", self.interval);
            tokio::time::sleep(self.interval).await;
        }
    }

    async fn on_throttled(&self) {
        warn!("Rate limit hit. Pausing for {:?}", self.cooldown);
        tokio::time::sleep(self.cooldown).await;
    }
}
