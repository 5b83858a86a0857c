//! Inspect command - report what the registry loaded without serving

use clap::Args;
use serde::Serialize;

use crate::config::AppConfig;
use crate::domain::registry::MetricsRecord;
use crate::domain::{ModelRegistry, RegistryHealth};
use crate::infrastructure::logging::init_logging;

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Only report metrics for this dataset
    #[arg(long)]
    pub dataset: Option<String>,
}

#[derive(Serialize)]
struct InspectReport {
    health: RegistryHealth,
    metrics: Vec<MetricsRecord>,
}

/// Load the registry and print health plus stored metrics as JSON
pub async fn run(args: InspectArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config.logging);

    let catalog = crate::build_catalog(&config)?;
    let registry = crate::build_registry(&config, &catalog).await?;

    println!("{}", render(&registry, args.dataset.as_deref())?);

    Ok(())
}

fn render(registry: &ModelRegistry, dataset: Option<&str>) -> anyhow::Result<String> {
    let report = InspectReport {
        health: registry.health(),
        metrics: registry.metrics(dataset)?,
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::test_support::loaded_registry;

    #[test]
    fn test_render_filters_metrics() {
        let output = render(&loaded_registry(), Some("breast")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["health"]["total_count"], 9);
        assert_eq!(json["metrics"].as_array().unwrap().len(), 3);
        assert_eq!(json["metrics"][0]["dataset"], "breast");
        assert_eq!(json["metrics"][0]["accuracy"], 0.85);
    }

    #[test]
    fn test_render_unknown_dataset_fails() {
        assert!(render(&loaded_registry(), Some("colon")).is_err());
    }
}
