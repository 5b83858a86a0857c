//! Single-sample classification across every slot of a dataset

use serde::Serialize;

use super::adapter::{adapt, FeatureAdjustment};
use super::consensus::{aggregate, ConsensusResult};
use super::predictor::{predict_slot, SlotPrediction};
use super::sample::FeatureSample;
use crate::domain::registry::ModelRegistry;
use crate::domain::DomainError;

/// Every slot's answer plus the consensus for one sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetPrediction {
    pub dataset: String,
    pub predictions: Vec<SlotPrediction>,
    pub consensus: ConsensusResult,
    pub adjustment: FeatureAdjustment,
}

impl DatasetPrediction {
    pub fn abstained_count(&self) -> usize {
        self.predictions.iter().filter(|p| p.is_abstained()).count()
    }
}

/// Adapt the sample, run every slot of `dataset`, and aggregate.
///
/// Only request-shape problems surface as errors; model failures are
/// absorbed per slot.
pub fn classify(
    registry: &ModelRegistry,
    dataset: &str,
    sample: &FeatureSample,
) -> Result<DatasetPrediction, DomainError> {
    let models = registry.dataset(dataset)?;

    if sample.is_empty() {
        return Err(DomainError::validation("Feature sample is empty"));
    }

    let adapted = adapt(sample.values(), models.profile().target_width());

    let predictions: Vec<SlotPrediction> = models
        .slots()
        .iter()
        .map(|s| predict_slot(s.name(), &adapted.values, s.slot()))
        .collect();

    let consensus = aggregate(&predictions);

    Ok(DatasetPrediction {
        dataset: dataset.to_string(),
        predictions,
        consensus,
        adjustment: adapted.adjustment,
    })
}
