//! Cancer Classification API
//!
//! Stacked-ensemble malignancy prediction across several biomedical
//! datasets, with:
//! - A read-only model registry loaded once from JSON artifacts
//! - Per-slot inference with visible abstentions and majority consensus
//! - Batch prediction from JSON or CSV uploads
//! - Structural compatibility analysis for uploaded tables

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{DatasetCatalog, ModelRegistry};
use infrastructure::artifact::{FallbackSlotFactory, FileArtifactStore, RegistryLoader};
use infrastructure::observability::record_registry_health;
use infrastructure::services::ClassificationService;
use tracing::{info, warn};

/// Datasets selected by configuration, in configured order
pub fn build_catalog(config: &AppConfig) -> anyhow::Result<DatasetCatalog> {
    let (catalog, unknown) = DatasetCatalog::standard().select(&config.models.datasets);

    for id in &unknown {
        warn!(dataset = %id, "Ignoring unknown dataset in configuration");
    }

    if catalog.profiles().is_empty() {
        anyhow::bail!("No supported datasets configured");
    }

    Ok(catalog)
}

/// Load every configured (dataset, slot) pair from the artifact directory
pub async fn build_registry(
    config: &AppConfig,
    catalog: &DatasetCatalog,
) -> anyhow::Result<ModelRegistry> {
    info!(
        dir = %config.models.dir,
        datasets = catalog.profiles().len(),
        slots = config.models.slots.len(),
        "Loading model registry"
    );

    let store = Arc::new(FileArtifactStore::new(
        &config.models.dir,
        &config.models.extension,
    ));
    let loader = RegistryLoader::new(store, FallbackSlotFactory::new(config.models.fallback_seed));

    Ok(loader.load(catalog, &config.models.slots).await?)
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let catalog = build_catalog(config)?;
    let registry = build_registry(config, &catalog).await?;

    record_registry_health(&registry.health());

    let classifier = ClassificationService::new(
        Arc::new(registry),
        catalog,
        config.batch.chunk_size,
    );

    Ok(AppState::new(Arc::new(classifier)))
}
