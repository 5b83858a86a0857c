//! Model slot - one stacked base/meta configuration with its scaler

use serde::{Deserialize, Serialize};

use super::learner::Learner;
use super::scaler::StandardScaler;

/// Stored evaluation metrics of a slot, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MetricsRecord")]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub auc: f64,
    pub kappa: f64,
}

#[derive(Deserialize)]
struct MetricsRecord {
    accuracy: f64,
    precision: f64,
    auc: f64,
    kappa: f64,
}

impl TryFrom<MetricsRecord> for ModelMetrics {
    type Error = String;

    fn try_from(record: MetricsRecord) -> Result<Self, Self::Error> {
        let fields = [
            ("accuracy", record.accuracy),
            ("precision", record.precision),
            ("auc", record.auc),
            ("kappa", record.kappa),
        ];

        if let Some((name, value)) = fields.iter().find(|(_, v)| !(0.0..=1.0).contains(v)) {
            return Err(format!("metric {} = {} is outside [0, 1]", name, value));
        }

        Ok(Self {
            accuracy: record.accuracy,
            precision: record.precision,
            auc: record.auc,
            kappa: record.kappa,
        })
    }
}

impl ModelMetrics {
    /// Placeholder metrics reported for slots without a stored record
    pub const PLACEHOLDER: Self = Self {
        accuracy: 0.85,
        precision: 0.82,
        auc: 0.88,
        kappa: 0.70,
    };
}

impl Default for ModelMetrics {
    fn default() -> Self {
        Self::PLACEHOLDER
    }
}

/// A fitted two-level stacking ensemble.
///
/// The base learner scores the scaled features; its probability is appended
/// to those features as the meta learner's input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSlot {
    #[serde(alias = "xgb_model")]
    base_learner: Learner,
    #[serde(alias = "meta_model")]
    meta_learner: Learner,
    scaler: StandardScaler,
    #[serde(default)]
    metrics: ModelMetrics,
}

impl ModelSlot {
    pub fn new(
        base_learner: Learner,
        meta_learner: Learner,
        scaler: StandardScaler,
        metrics: ModelMetrics,
    ) -> Self {
        Self {
            base_learner,
            meta_learner,
            scaler,
            metrics,
        }
    }

    pub fn base_learner(&self) -> &Learner {
        &self.base_learner
    }

    pub fn meta_learner(&self) -> &Learner {
        &self.meta_learner
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn metrics(&self) -> ModelMetrics {
        self.metrics
    }

    /// Check the slot's learned widths against the width samples are
    /// adapted to. Returns a description of the first mismatch.
    pub fn check_width(&self, width: usize) -> Result<(), String> {
        if self.scaler.width() != width {
            return Err(format!(
                "scaler was fitted on {} features, dataset expects {}",
                self.scaler.width(),
                width
            ));
        }

        self.base_learner
            .check_input("base learner", width, "dataset expects")?;
        self.meta_learner
            .check_input("meta learner", width + 1, "stacking produces")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::learner::{GradientBoostedTrees, LogisticRegression};
    use crate::domain::model::tree::{DecisionTree, TreeNode};

    fn slot(width: usize, meta_width: usize) -> ModelSlot {
        ModelSlot::new(
            Learner::Logistic(LogisticRegression::new(vec![0.1; width], 0.0)),
            Learner::Logistic(LogisticRegression::new(vec![0.1; meta_width], 0.0)),
            StandardScaler::new(vec![0.0; width], vec![1.0; width]).unwrap(),
            ModelMetrics::default(),
        )
    }

    #[test]
    fn test_check_width_accepts_consistent_slot() {
        assert!(slot(8, 9).check_width(8).is_ok());
    }

    #[test]
    fn test_check_width_rejects_meta_mismatch() {
        let err = slot(8, 8).check_width(8).unwrap_err();
        assert!(err.contains("meta learner expects 8"));
    }

    #[test]
    fn test_check_width_rejects_scaler_mismatch() {
        let err = slot(8, 9).check_width(1000).unwrap_err();
        assert!(err.starts_with("scaler was fitted on 8 features"));
    }

    #[test]
    fn test_check_width_rejects_split_outside_input() {
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
        let slot = ModelSlot::new(
            Learner::GradientBoosted(GradientBoostedTrees::new(8, 0.0, vec![tree])),
            Learner::Logistic(LogisticRegression::new(vec![0.1; 9], 0.0)),
            StandardScaler::new(vec![0.0; 8], vec![1.0; 8]).unwrap(),
            ModelMetrics::default(),
        );

        let err = slot.check_width(8).unwrap_err();
        assert!(err.contains("splits on feature 50"));
    }

    #[test]
    fn test_artifact_aliases_and_default_metrics() {
        let json = r#"{
            "xgb_model": {"type": "logistic", "coefficients": [1.0], "intercept": 0.0},
            "meta_model": {"type": "logistic", "coefficients": [1.0, 1.0], "intercept": 0.0},
            "scaler": {"mean": [0.0], "scale": [1.0]}
        }"#;
        let slot: ModelSlot = serde_json::from_str(json).unwrap();

        assert_eq!(slot.metrics(), ModelMetrics::PLACEHOLDER);
        assert!(slot.check_width(1).is_ok());
    }

    #[test]
    fn test_metrics_outside_unit_interval_are_rejected() {
        let ok: ModelMetrics =
            serde_json::from_str(r#"{"accuracy":0.9,"precision":0.8,"auc":1.0,"kappa":0.0}"#)
                .unwrap();
        assert_eq!(ok.auc, 1.0);

        let err = serde_json::from_str::<ModelMetrics>(
            r#"{"accuracy":7.3,"precision":0.8,"auc":0.9,"kappa":0.5}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("metric accuracy = 7.3 is outside [0, 1]"));
    }
}
