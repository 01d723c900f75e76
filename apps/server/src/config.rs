use std::net::SocketAddr;
use std::time::Duration;

use top2000_catalog::{RateLimit, SpotifyConfig};
use top2000_core::enrichment::{EnrichmentConfig, ThrottlePolicy};

/// Server configuration, read once at startup.
///
/// Malformed values stop the process; missing ones fall back to defaults.
/// Client credentials have no default and are checked when the provider is
/// built.
#[derive(Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow_origins: Vec<String>,
    pub spotify: SpotifyConfig,
    pub refresh_interval: Option<usize>,
    pub pacing_interval: Option<Duration>,
    pub throttle_cooldown: Option<Duration>,
    pub throttle_retries: Option<u32>,
}

fn var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    var(key).map(|raw| {
        raw.parse()
            .unwrap_or_else(|_| panic!("Invalid value for {}: {:?}", key, raw))
    })
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let listen_addr = parsed("TOP2000_LISTEN_ADDR")
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8088)));
        let db_path = var("TOP2000_DB_PATH").unwrap_or_else(|| "./db/top2000.db".to_string());
        let cors_allow_origins = var("TOP2000_CORS_ALLOW_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let mut spotify = SpotifyConfig::new(
            var("SPOTIFY_CLIENT_ID").unwrap_or_default(),
            var("SPOTIFY_CLIENT_SECRET").unwrap_or_default(),
        );
        if let Some(url) = var("SPOTIFY_API_BASE_URL") {
            spotify = spotify.with_api_base_url(url);
        }
        if let Some(url) = var("SPOTIFY_TOKEN_URL") {
            spotify = spotify.with_token_url(url);
        }
        if let Some(secs) = parsed::<u64>("SPOTIFY_TIMEOUT_SECS") {
            spotify = spotify.with_timeout(Duration::from_secs(secs));
        }

        Self {
            listen_addr,
            db_path,
            cors_allow_origins,
            spotify,
            refresh_interval: parsed("TOP2000_ENRICH_REFRESH_INTERVAL"),
            pacing_interval: parsed("TOP2000_ENRICH_PACING_MS").map(Duration::from_millis),
            throttle_cooldown: parsed("TOP2000_ENRICH_COOLDOWN_MS").map(Duration::from_millis),
            throttle_retries: parsed("TOP2000_ENRICH_THROTTLE_RETRIES"),
        }
    }

    /// Provider pacing with any explicit overrides applied on top.
    pub fn enrichment_config(&self, rate_limit: &RateLimit) -> EnrichmentConfig {
        let mut config = EnrichmentConfig::for_rate_limit(rate_limit);
        if let Some(interval) = self.refresh_interval {
            config = config.with_refresh_interval(interval);
        }
        if let Some(pacing) = self.pacing_interval {
            config.pacing_interval = pacing;
        }
        if let Some(cooldown) = self.throttle_cooldown {
            config.throttle_cooldown = cooldown;
        }
        if let Some(retries) = self.throttle_retries {
            config = config.with_throttle_policy(ThrottlePolicy::from_retries(retries));
        }
        config
    }
}
