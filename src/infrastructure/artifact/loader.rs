//! Registry loader - assemble the model registry from an artifact store

use std::sync::Arc;

use tracing::{info, warn};

use super::fallback::FallbackSlotFactory;
use crate::domain::registry::{
    ArtifactError, ArtifactStore, DatasetModels, ModelRegistry, RegisteredSlot, SlotOrigin,
};
use crate::domain::{DatasetCatalog, DatasetProfile, DomainError, ModelSlot};

/// Loads every (dataset, slot) pair once, substituting fallbacks
pub struct RegistryLoader {
    store: Arc<dyn ArtifactStore>,
    fallback: FallbackSlotFactory,
}

impl RegistryLoader {
    pub fn new(store: Arc<dyn ArtifactStore>, fallback: FallbackSlotFactory) -> Self {
        Self { store, fallback }
    }

    /// Build the registry for every profile in `catalog` and every slot name.
    ///
    /// Artifact problems never fail the load; only an empty slot list does.
    pub async fn load(
        &self,
        catalog: &DatasetCatalog,
        slot_names: &[String],
    ) -> Result<ModelRegistry, DomainError> {
        if slot_names.is_empty() {
            return Err(DomainError::validation("At least one model slot must be configured"));
        }

        let mut datasets = Vec::with_capacity(catalog.profiles().len());

        for profile in catalog.profiles() {
            let mut slots = Vec::with_capacity(slot_names.len());

            for name in slot_names {
                slots.push(self.load_slot(profile, name).await);
            }

            datasets.push(DatasetModels::new(profile.clone(), slots));
        }

        let registry = ModelRegistry::new(datasets)?;
        let health = registry.health();

        info!(
            status = ?health.status,
            loaded = health.loaded_count,
            total = health.total_count,
            "Model registry ready"
        );

        Ok(registry)
    }

    async fn load_slot(&self, profile: &DatasetProfile, name: &str) -> RegisteredSlot {
        let dataset = profile.id();
        let location = self.store.locate(dataset, name);

        let attempt = self
            .store
            .load(dataset, name)
            .await
            .and_then(|slot| check_shape(slot, profile, &location));

        match attempt {
            Ok(slot) => {
                info!(
                    dataset = %dataset,
                    slot = %name,
                    path = %location,
                    base = slot.base_learner().kind(),
                    meta = slot.meta_learner().kind(),
                    "Loaded model"
                );
                RegisteredSlot::new(name, slot, SlotOrigin::Artifact { location })
            }
            Err(error) => {
                match &error {
                    ArtifactError::Missing { .. } => {
                        warn!(dataset = %dataset, slot = %name, path = %location, "Model file not found, using fallback model");
                    }
                    _ => {
                        warn!(dataset = %dataset, slot = %name, path = %location, error = %error, "Error loading model, using fallback model");
                    }
                }

                RegisteredSlot::new(
                    name,
                    self.fallback.build(profile.target_width()),
                    SlotOrigin::Fallback {
                        reason: error.to_string(),
                    },
                )
            }
        }
    }
}

/// Reject artifacts whose learned width disagrees with what samples are adapted to
fn check_shape(
    slot: ModelSlot,
    profile: &DatasetProfile,
    location: &str,
) -> Result<ModelSlot, ArtifactError> {
    slot.check_width(profile.target_width())
        .map(|()| slot)
        .map_err(|message| ArtifactError::incompatible(location, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::test_support::sign_slot;
    use crate::domain::registry::{MockArtifactStore, RegistryStatus};
    use crate::domain::model::{
        DecisionTree, GradientBoostedTrees, Learner, StandardScaler, TreeNode,
    };
    use crate::domain::{classify, FeatureSample, ModelMetrics};

    fn slot_names() -> Vec<String> {
        ["xgb_svm", "xgb_lr", "xgb_rf"].iter().map(|s| s.to_string()).collect()
    }

    fn mock_store() -> MockArtifactStore {
        let mut store = MockArtifactStore::new();
        store
            .expect_locate()
            .returning(|dataset, slot| format!("models/{}_cancer_{}.json", dataset, slot));
        store
    }

    #[tokio::test]
    async fn test_missing_artifact_is_replaced_by_fallback() {
        let mut store = mock_store();
        store.expect_load().returning(|dataset, slot| {
            if dataset == "breast" && slot == "xgb_lr" {
                Err(ArtifactError::missing("models/breast_cancer_xgb_lr.json"))
            } else {
                let width = if dataset == "breast" { 8 } else { 1000 };
                Ok(sign_slot(width, ModelMetrics::default()))
            }
        });

        let loader = RegistryLoader::new(Arc::new(store), FallbackSlotFactory::default());
        let registry = loader
            .load(&DatasetCatalog::standard(), &slot_names())
            .await
            .unwrap();

        let health = registry.health();
        assert_eq!(health.status, RegistryStatus::Partial);
        assert_eq!(health.loaded_count, 8);
        assert_eq!(health.total_count, 9);

        let missing = health
            .slots
            .iter()
            .find(|s| s.dataset == "breast" && s.model == "xgb_lr")
            .unwrap();
        assert!(!missing.loaded);

        let sample = FeatureSample::new().with_feature("mean_radius", 1.0);
        let prediction = classify(&registry, "breast", &sample).unwrap();
        assert_eq!(prediction.predictions.len(), 3);
    }

    #[tokio::test]
    async fn test_incompatible_width_is_replaced_by_fallback() {
        let mut store = mock_store();
        // Every artifact was fitted on 8 features, which only fits breast.
        store
            .expect_load()
            .returning(|_, _| Ok(sign_slot(8, ModelMetrics::default())));

        let loader = RegistryLoader::new(Arc::new(store), FallbackSlotFactory::default());
        let registry = loader
            .load(&DatasetCatalog::standard(), &slot_names())
            .await
            .unwrap();

        let health = registry.health();
        assert_eq!(health.loaded_count, 3);

        let gastric = health.slots.iter().find(|s| s.dataset == "gastric").unwrap();
        assert!(gastric.reason.as_deref().unwrap().starts_with("Incompatible artifact"));

        let fallback = &registry.dataset("gastric").unwrap().slots()[0];
        assert!(fallback.slot().check_width(1000).is_ok());
        assert_eq!(fallback.slot().metrics(), ModelMetrics::PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_tree_split_outside_input_is_replaced_by_fallback() {
        let mut store = mock_store();
        store.expect_load().returning(|dataset, slot| {
            if dataset == "breast" && slot == "xgb_lr" {
                let tree = DecisionTree::new(vec![
                    TreeNode::Split {
                        feature: 50,
                        threshold: 0.0,
                        left: 1,
                        right: 2,
                    },
                    TreeNode::Leaf(-1.0),
                    TreeNode::Leaf(1.0),
                ]);
                let meta = sign_slot(8, ModelMetrics::default()).meta_learner().clone();
                Ok(ModelSlot::new(
                    Learner::GradientBoosted(GradientBoostedTrees::new(8, 0.0, vec![tree])),
                    meta,
                    StandardScaler::new(vec![0.0; 8], vec![1.0; 8]).unwrap(),
                    ModelMetrics::default(),
                ))
            } else {
                let width = if dataset == "breast" { 8 } else { 1000 };
                Ok(sign_slot(width, ModelMetrics::default()))
            }
        });

        let loader = RegistryLoader::new(Arc::new(store), FallbackSlotFactory::default());
        let registry = loader
            .load(&DatasetCatalog::standard(), &slot_names())
            .await
            .unwrap();

        let health = registry.health();
        assert_eq!(health.status, RegistryStatus::Partial);
        assert_eq!(health.loaded_count, 8);

        let rejected = health
            .slots
            .iter()
            .find(|s| s.dataset == "breast" && s.model == "xgb_lr")
            .unwrap();
        assert!(!rejected.loaded);
        let reason = rejected.reason.as_deref().unwrap();
        assert!(reason.starts_with("Incompatible artifact"));
        assert!(reason.contains("splits on feature 50"));

        let sample = FeatureSample::new().with_feature("mean_radius", 1.0);
        let prediction = classify(&registry, "breast", &sample).unwrap();
        assert!(prediction.predictions.iter().all(|p| !p.is_abstained()));
    }

    #[tokio::test]
    async fn test_all_loaded_is_healthy() {
        let mut store = mock_store();
        store.expect_load().returning(|dataset, _| {
            let width = if dataset == "breast" { 8 } else { 1000 };
            Ok(sign_slot(width, ModelMetrics::default()))
        });

        let loader = RegistryLoader::new(Arc::new(store), FallbackSlotFactory::default());
        let registry = loader
            .load(&DatasetCatalog::standard(), &slot_names())
            .await
            .unwrap();

        assert_eq!(registry.health().status, RegistryStatus::Healthy);
    }

    #[tokio::test]
    async fn test_empty_slot_list_is_rejected() {
        let loader = RegistryLoader::new(Arc::new(mock_store()), FallbackSlotFactory::default());
        let result = loader.load(&DatasetCatalog::standard(), &[]).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }
}
