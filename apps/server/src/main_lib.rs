use std::sync::Arc;

use crate::config::Config;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use top2000_catalog::{CatalogProvider, SpotifyProvider};
use top2000_core::enrichment::{EnrichmentService, EnrichmentServiceTrait};
use top2000_storage_sqlite::{
    catalog::CatalogRepository,
    db::{self, spawn_writer},
};

pub struct AppState {
    pub enrichment_service: Arc<dyn EnrichmentServiceTrait>,
}

impl AppState {
    pub fn new(enrichment_service: Arc<dyn EnrichmentServiceTrait>) -> Arc<Self> {
        Arc::new(Self { enrichment_service })
    }
}

pub fn init_tracing() {
    let log_format =
        std::env::var("TOP2000_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    // DATABASE_URL takes precedence inside the storage crate.
    std::env::set_var("DATABASE_URL", &config.db_path);
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = spawn_writer(pool.clone());
    let repository = Arc::new(CatalogRepository::new(pool, writer));

    let provider = Arc::new(SpotifyProvider::new(config.spotify.clone())?);
    let enrichment_config = config.enrichment_config(&provider.rate_limit());
    enrichment_config.validate()?;
    tracing::info!(
        "Enrichment pacing {:?}, cooldown {:?}, credential refresh every {} items",
        enrichment_config.pacing_interval,
        enrichment_config.throttle_cooldown,
        enrichment_config.refresh_interval
    );

    let enrichment_service = Arc::new(EnrichmentService::new(
        provider,
        repository,
        enrichment_config,
    ));

    Ok(AppState::new(enrichment_service))
}
