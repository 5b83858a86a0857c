//! Domain layer - Core classification logic and entities

pub mod compatibility;
pub mod dataset;
pub mod error;
pub mod inference;
pub mod model;
pub mod registry;

pub use compatibility::{analyze, detect_target_column, CompatibilityReport};
pub use dataset::{DatasetCatalog, DatasetKind, DatasetProfile, FeatureWidth};
pub use error::DomainError;
pub use inference::{
    classify, run_batch, BatchEntry, BatchRow, ConsensusResult, DatasetPrediction, FeatureSample,
    SlotPrediction,
};
pub use model::{InferenceError, ModelMetrics, ModelSlot};
pub use registry::{
    ArtifactError, ArtifactStore, DatasetModels, ModelRegistry, RegisteredSlot, RegistryHealth,
    RegistryStatus, SlotOrigin,
};
