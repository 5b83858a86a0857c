//! Stacked ensemble predictor - scale, base learner, meta learner

use serde::Serialize;
use tracing::warn;

use crate::domain::model::{BinaryClassifier, InferenceError, ModelSlot, Verdict};

/// Human-readable tag for a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Diagnosis {
    Malignant,
    Benign,
}

impl Diagnosis {
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            Self::Malignant
        } else {
            Self::Benign
        }
    }
}

/// Whether a slot produced its own answer or fell back to the safe default
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PredictionStatus {
    Scored,
    Abstained { reason: String },
}

/// One slot's answer for one sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotPrediction {
    #[serde(rename = "model")]
    pub slot: String,
    #[serde(rename = "prediction")]
    pub label: u8,
    pub probability: f64,
    #[serde(rename = "label")]
    pub tag: Diagnosis,
    #[serde(flatten)]
    pub status: PredictionStatus,
}

impl SlotPrediction {
    pub fn scored(slot: impl Into<String>, verdict: Verdict) -> Self {
        Self {
            slot: slot.into(),
            label: verdict.label,
            probability: verdict.probability,
            tag: Diagnosis::from_label(verdict.label),
            status: PredictionStatus::Scored,
        }
    }

    /// Conservative default: benign at even odds
    pub fn abstained(slot: impl Into<String>, reason: &InferenceError) -> Self {
        Self {
            slot: slot.into(),
            label: 0,
            probability: 0.5,
            tag: Diagnosis::Benign,
            status: PredictionStatus::Abstained {
                reason: reason.to_string(),
            },
        }
    }

    pub fn is_abstained(&self) -> bool {
        matches!(self.status, PredictionStatus::Abstained { .. })
    }
}

/// Run the two-level stack on an already adapted vector
pub fn predict(features: &[f64], slot: &ModelSlot) -> Result<Verdict, InferenceError> {
    let scaled = slot.scaler().transform(features)?;
    let base_probability = slot.base_learner().predict_proba(&scaled)?;

    let mut meta_features = scaled;
    meta_features.push(base_probability);

    slot.meta_learner().predict(&meta_features)
}

/// Predict for one slot, substituting the safe default on any model failure
pub fn predict_slot(name: &str, features: &[f64], slot: &ModelSlot) -> SlotPrediction {
    match predict(features, slot) {
        Ok(verdict) => SlotPrediction::scored(name, verdict),
        Err(reason) => {
            warn!(slot = %name, reason = %reason, "Slot abstained, using default prediction");
            SlotPrediction::abstained(name, &reason)
        }
    }
}
