//! Consensus aggregator - majority verdict across a dataset's slots

use serde::Serialize;

use super::predictor::SlotPrediction;

/// Aggregate verdict for one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsensusResult {
    pub prediction: u8,
    pub confidence: f64,
    pub agreement: bool,
}

/// Combine per-slot predictions.
///
/// Malignant only with a strict majority of malignant votes, so ties resolve
/// to benign. Confidence averages every slot's probability, abstentions
/// included.
pub fn aggregate(predictions: &[SlotPrediction]) -> ConsensusResult {
    if predictions.is_empty() {
        return ConsensusResult {
            prediction: 0,
            confidence: 0.0,
            agreement: false,
        };
    }

    let total = predictions.len();
    let malignant_votes = predictions.iter().filter(|p| p.label == 1).count();
    let prediction = u8::from(malignant_votes * 2 > total);

    let confidence = predictions.iter().map(|p| p.probability).sum::<f64>() / total as f64;
    let agreement = predictions.iter().all(|p| p.label == prediction);

    ConsensusResult {
        prediction,
        confidence,
        agreement,
    }
}
