//! Inference domain - Feature adaptation, stacked prediction, consensus and batches

mod adapter;
mod batch;
mod consensus;
mod engine;
mod predictor;
mod sample;

pub use adapter::{adapt, AdaptedFeatures, AdjustmentPolicy, FeatureAdjustment};
pub use batch::{run_batch, BatchEntry, BatchRow};
pub use consensus::{aggregate, ConsensusResult};
pub use engine::{classify, DatasetPrediction};
pub use predictor::{predict, predict_slot, Diagnosis, PredictionStatus, SlotPrediction};
pub use sample::{FeatureSample, SharedColumns};
