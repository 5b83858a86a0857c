//! Model registry - immutable dataset to slot mapping built once at startup

mod store;

pub use store::{ArtifactError, ArtifactStore};

#[cfg(test)]
pub use store::MockArtifactStore;

use serde::Serialize;

use crate::domain::dataset::DatasetProfile;
use crate::domain::model::{ModelMetrics, ModelSlot};
use crate::domain::DomainError;

/// Where a registered slot came from
#[derive(Debug, Clone, PartialEq)]
pub enum SlotOrigin {
    Artifact { location: String },
    Fallback { reason: String },
}

/// A named slot held by the registry
#[derive(Debug, Clone)]
pub struct RegisteredSlot {
    name: String,
    slot: ModelSlot,
    origin: SlotOrigin,
}

impl RegisteredSlot {
    pub fn new(name: impl Into<String>, slot: ModelSlot, origin: SlotOrigin) -> Self {
        Self {
            name: name.into(),
            slot,
            origin,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slot(&self) -> &ModelSlot {
        &self.slot
    }

    pub fn origin(&self) -> &SlotOrigin {
        &self.origin
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.origin, SlotOrigin::Artifact { .. })
    }
}

/// One dataset's profile and its slots, in load order
#[derive(Debug, Clone)]
pub struct DatasetModels {
    profile: DatasetProfile,
    slots: Vec<RegisteredSlot>,
}

impl DatasetModels {
    pub fn new(profile: DatasetProfile, slots: Vec<RegisteredSlot>) -> Self {
        Self { profile, slots }
    }

    pub fn profile(&self) -> &DatasetProfile {
        &self.profile
    }

    pub fn slots(&self) -> &[RegisteredSlot] {
        &self.slots
    }
}

/// Overall artifact integrity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryStatus {
    Healthy,
    Partial,
}

/// Per-slot load state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotHealth {
    pub dataset: String,
    pub model: String,
    pub loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Artifact integrity report, not service liveness
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryHealth {
    pub status: RegistryStatus,
    pub loaded_count: usize,
    pub total_count: usize,
    pub slots: Vec<SlotHealth>,
}

/// Stored metrics of one slot, tagged with where they belong
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub dataset: String,
    pub model: String,
    #[serde(flatten)]
    pub metrics: ModelMetrics,
}

/// Catalog entry enriched with the slots serving it
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    #[serde(flatten)]
    pub profile: DatasetProfile,
    pub models: Vec<String>,
}

/// Read-only after construction; share it behind `Arc`.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    datasets: Vec<DatasetModels>,
}

impl ModelRegistry {
    /// Build a registry, refusing datasets without slots
    pub fn new(datasets: Vec<DatasetModels>) -> Result<Self, DomainError> {
        if let Some(empty) = datasets.iter().find(|d| d.slots.is_empty()) {
            return Err(DomainError::internal(format!(
                "dataset '{}' has no model slots",
                empty.profile.id()
            )));
        }

        Ok(Self { datasets })
    }

    pub fn datasets(&self) -> &[DatasetModels] {
        &self.datasets
    }

    /// Look up a dataset, failing with `UnsupportedDataset`
    pub fn dataset(&self, id: &str) -> Result<&DatasetModels, DomainError> {
        self.datasets
            .iter()
            .find(|d| d.profile.id() == id)
            .ok_or_else(|| DomainError::unsupported_dataset(id))
    }

    pub fn health(&self) -> RegistryHealth {
        let slots: Vec<SlotHealth> = self
            .datasets
            .iter()
            .flat_map(|d| {
                d.slots.iter().map(move |s| SlotHealth {
                    dataset: d.profile.id().to_string(),
                    model: s.name.clone(),
                    loaded: s.is_loaded(),
                    reason: match &s.origin {
                        SlotOrigin::Artifact { .. } => None,
                        SlotOrigin::Fallback { reason } => Some(reason.clone()),
                    },
                })
            })
            .collect();

        let loaded_count = slots.iter().filter(|s| s.loaded).count();
        let total_count = slots.len();
        let status = if loaded_count == total_count {
            RegistryStatus::Healthy
        } else {
            RegistryStatus::Partial
        };

        RegistryHealth {
            status,
            loaded_count,
            total_count,
            slots,
        }
    }

    /// Metrics records for one dataset, or for all of them when `None`
    pub fn metrics(&self, dataset: Option<&str>) -> Result<Vec<MetricsRecord>, DomainError> {
        let datasets: Vec<&DatasetModels> = match dataset {
            Some(id) => vec![self.dataset(id)?],
            None => self.datasets.iter().collect(),
        };

        Ok(datasets
            .into_iter()
            .flat_map(|d| {
                d.slots.iter().map(move |s| MetricsRecord {
                    dataset: d.profile.id().to_string(),
                    model: s.name.clone(),
                    metrics: s.slot.metrics(),
                })
            })
            .collect())
    }

    pub fn summaries(&self) -> Vec<DatasetSummary> {
        self.datasets
            .iter()
            .map(|d| DatasetSummary {
                profile: d.profile.clone(),
                models: d.slots.iter().map(|s| s.name.clone()).collect(),
            })
            .collect()
    }
}
