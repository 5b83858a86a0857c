//! Fallback slots substituted when an artifact cannot be used

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::model::{
    BinaryClassifier, Learner, LogisticRegression, ModelMetrics, ModelSlot, StandardScaler,
};

const SAMPLES: usize = 20;
const ITERATIONS: usize = 10;
const LEARNING_RATE: f64 = 0.1;

/// Builds minimally fitted logistic stand-ins on seeded synthetic data.
///
/// The result is deterministic for a given seed and width, so every restart
/// serves the same stand-in predictions.
#[derive(Debug, Clone, Copy)]
pub struct FallbackSlotFactory {
    seed: u64,
}

impl FallbackSlotFactory {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Fit a scaler, a base learner of `width` inputs and a meta learner of
    /// `width + 1` inputs, with placeholder metrics.
    pub fn build(&self, width: usize) -> ModelSlot {
        let mut rng = StdRng::seed_from_u64(self.seed);

        let rows: Vec<Vec<f64>> = (0..SAMPLES)
            .map(|_| (0..width).map(|_| rng.gen_range(-1.0..1.0)).collect())
            .collect();
        let labels: Vec<u8> = (0..SAMPLES).map(|_| rng.gen_range(0..=1)).collect();

        let scaler = StandardScaler::fit(&rows);
        let scaled: Vec<Vec<f64>> = rows
            .iter()
            .map(|row| scaler.transform(row).unwrap_or_else(|_| vec![0.0; width]))
            .collect();

        let base = LogisticRegression::fit(&scaled, &labels, ITERATIONS, LEARNING_RATE);

        let stacked: Vec<Vec<f64>> = scaled
            .into_iter()
            .map(|mut row| {
                let p = base.predict_proba(&row).unwrap_or(0.5);
                row.push(p);
                row
            })
            .collect();

        let meta = LogisticRegression::fit(&stacked, &labels, ITERATIONS, LEARNING_RATE);

        ModelSlot::new(
            Learner::Logistic(base),
            Learner::Logistic(meta),
            scaler,
            ModelMetrics::PLACEHOLDER,
        )
    }
}

impl Default for FallbackSlotFactory {
    fn default() -> Self {
        Self::new(42)
    }
}
