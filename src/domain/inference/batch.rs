//! Batch orchestrator - classify many rows with per-row failure isolation

use serde::{Serialize, Serializer};

use super::consensus::ConsensusResult;
use super::engine::{classify, DatasetPrediction};
use super::sample::FeatureSample;
use crate::domain::registry::ModelRegistry;
use crate::domain::DomainError;

/// One input row of a batch
#[derive(Debug, Clone, PartialEq)]
pub enum BatchRow {
    /// A parsed sample, optionally routed to a different dataset than the batch default
    Sample {
        dataset: Option<String>,
        features: FeatureSample,
    },
    /// A row that could not be parsed into a sample
    Rejected { reason: String },
}

impl BatchRow {
    pub fn sample(features: FeatureSample) -> Self {
        Self::Sample {
            dataset: None,
            features,
        }
    }

    pub fn for_dataset(dataset: impl Into<String>, features: FeatureSample) -> Self {
        Self::Sample {
            dataset: Some(dataset.into()),
            features,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// Outcome of one row, tagged with its 1-based position in the input
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub row: usize,
    pub outcome: Result<DatasetPrediction, DomainError>,
}

impl BatchEntry {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn consensus(&self) -> Option<&ConsensusResult> {
        self.outcome.as_ref().ok().map(|p| &p.consensus)
    }
}

impl Serialize for BatchEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("BatchEntry", 4)?;
        state.serialize_field("row", &self.row)?;
        match &self.outcome {
            Ok(prediction) => {
                state.serialize_field("dataset", &prediction.dataset)?;
                state.serialize_field("consensus", &prediction.consensus)?;
                state.serialize_field("predictions", &prediction.predictions)?;
            }
            Err(error) => {
                state.serialize_field("error", &error.to_string())?;
            }
        }
        state.end()
    }
}

/// Classify `rows` in order. `first_row` is the 1-based index of `rows[0]`,
/// so chunks of a larger batch keep their global row numbers.
pub fn run_batch(
    registry: &ModelRegistry,
    dataset: &str,
    rows: &[BatchRow],
    first_row: usize,
) -> Vec<BatchEntry> {
    rows.iter()
        .enumerate()
        .map(|(offset, row)| BatchEntry {
            row: first_row + offset,
            outcome: run_row(registry, dataset, row),
        })
        .collect()
}

fn run_row(
    registry: &ModelRegistry,
    default_dataset: &str,
    row: &BatchRow,
) -> Result<DatasetPrediction, DomainError> {
    match row {
        BatchRow::Sample { dataset, features } => {
            let dataset = dataset.as_deref().unwrap_or(default_dataset);
            classify(registry, dataset, features)
        }
        BatchRow::Rejected { reason } => Err(DomainError::validation(reason.clone())),
    }
}
