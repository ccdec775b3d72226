//! Inventory Back Office
//!
//! Catalog and stock management served through a request pipeline:
//! - Validation of every request before it reaches a handler
//! - Read-through caching of queries with per-shape lifetimes
//! - Prefix-based invalidation of cached reads after successful writes
//! - In-memory (moka) or Redis cache stores

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use domain::category::CategoryRepository;
use domain::product::ProductRepository;
use infrastructure::cache::CacheFactory;
use infrastructure::catalog::build_mediator;
use infrastructure::category::InMemoryCategoryRepository;
use infrastructure::product::InMemoryProductRepository;

/// Wires the cache store, repositories and pipeline from configuration
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let cache_config = config.cache.cache_config()?;
    let cache = CacheFactory::new().create(&cache_config).await?;

    info!(
        backend = %cache_config.cache_type,
        timeout_ms = cache_config.operation_timeout.as_millis() as u64,
        purge_timeout_ms = cache_config.purge_timeout.as_millis() as u64,
        "Cache store ready"
    );

    let products: Arc<dyn ProductRepository> = Arc::new(InMemoryProductRepository::new());
    let categories: Arc<dyn CategoryRepository> = Arc::new(InMemoryCategoryRepository::new());

    let mediator = build_mediator(
        cache.clone(),
        config.cache.ttl_policy(),
        products,
        categories,
    );

    info!(behaviors = ?mediator.behavior_names(), "Request pipeline built");

    Ok(AppState::new(Arc::new(mediator), cache))
}
