//! Fitted binary classifiers used as base and meta learners

use serde::{Deserialize, Serialize};

use super::error::{ensure_finite, InferenceError};
use super::tree::DecisionTree;

/// Label and malignancy probability produced by one learner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub label: u8,
    pub probability: f64,
}

impl Verdict {
    /// Threshold a probability the way probabilistic classifiers do
    pub fn from_probability(probability: f64) -> Self {
        Self {
            label: u8::from(probability > 0.5),
            probability,
        }
    }
}

/// A fitted binary classifier
pub trait BinaryClassifier {
    /// Number of features the classifier was fitted on
    fn input_width(&self) -> usize;

    /// Probability of the positive (malignant) class
    fn predict_proba(&self, features: &[f64]) -> Result<f64, InferenceError>;

    /// Label and probability together
    fn predict(&self, features: &[f64]) -> Result<Verdict, InferenceError> {
        self.predict_proba(features).map(Verdict::from_probability)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn max_split_feature(trees: &[DecisionTree]) -> Option<usize> {
    trees.iter().filter_map(DecisionTree::max_feature).max()
}

fn check_width(stage: &'static str, expected: usize, features: &[f64]) -> Result<(), InferenceError> {
    if features.len() == expected {
        Ok(())
    } else {
        Err(InferenceError::width_mismatch(stage, expected, features.len()))
    }
}

/// Probability outputs must be finite and inside [0, 1]
fn ensure_probability(stage: &'static str, p: f64) -> Result<f64, InferenceError> {
    let p = ensure_finite(stage, p)?;
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(InferenceError::malformed(
            stage,
            format!("probability {} outside [0, 1]", p),
        ))
    }
}

/// Logistic regression: `p = sigmoid(w . x + b)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    const STAGE: &'static str = "logistic regression";

    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    /// Batch gradient descent on the log-loss, starting from zero weights.
    ///
    /// Only used to build stand-in models, so there is no convergence check.
    pub fn fit(rows: &[Vec<f64>], labels: &[u8], iterations: usize, learning_rate: f64) -> Self {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let count = rows.len().max(1) as f64;
        let mut model = Self::new(vec![0.0; width], 0.0);

        for _ in 0..iterations {
            let mut grad_w = vec![0.0; width];
            let mut grad_b = 0.0;

            for (row, label) in rows.iter().zip(labels) {
                let error = sigmoid(dot(&model.coefficients, row) + model.intercept) - f64::from(*label);
                for (g, x) in grad_w.iter_mut().zip(row) {
                    *g += error * x;
                }
                grad_b += error;
            }

            for (w, g) in model.coefficients.iter_mut().zip(&grad_w) {
                *w -= learning_rate * g / count;
            }
            model.intercept -= learning_rate * grad_b / count;
        }

        model
    }
}

impl BinaryClassifier for LogisticRegression {
    fn input_width(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, InferenceError> {
        check_width(Self::STAGE, self.input_width(), features)?;
        let z = ensure_finite(Self::STAGE, dot(&self.coefficients, features) + self.intercept)?;
        ensure_probability(Self::STAGE, sigmoid(z))
    }
}

/// SVM kernel function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kernel {
    Linear,
    Rbf { gamma: f64 },
}

impl Kernel {
    fn apply(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Self::Linear => dot(a, b),
            Self::Rbf { gamma } => {
                let distance: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
                (-gamma * distance).exp()
            }
        }
    }
}

/// Kernel SVM with Platt-scaled probabilities.
///
/// The label follows the sign of the decision function; the probability
/// comes from the Platt sigmoid and may disagree with it near the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportVectorMachine {
    kernel: Kernel,
    support_vectors: Vec<Vec<f64>>,
    dual_coef: Vec<f64>,
    intercept: f64,
    prob_a: f64,
    prob_b: f64,
}

impl SupportVectorMachine {
    const STAGE: &'static str = "svm";

    pub fn new(
        kernel: Kernel,
        support_vectors: Vec<Vec<f64>>,
        dual_coef: Vec<f64>,
        intercept: f64,
        prob_a: f64,
        prob_b: f64,
    ) -> Self {
        Self {
            kernel,
            support_vectors,
            dual_coef,
            intercept,
            prob_a,
            prob_b,
        }
    }

    fn decision(&self, features: &[f64]) -> Result<f64, InferenceError> {
        check_width(Self::STAGE, self.input_width(), features)?;

        if self.support_vectors.len() != self.dual_coef.len() {
            return Err(InferenceError::malformed(
                Self::STAGE,
                format!(
                    "{} support vectors but {} dual coefficients",
                    self.support_vectors.len(),
                    self.dual_coef.len()
                ),
            ));
        }

        let mut total = self.intercept;
        for (sv, alpha) in self.support_vectors.iter().zip(&self.dual_coef) {
            check_width(Self::STAGE, features.len(), sv)?;
            total += alpha * self.kernel.apply(sv, features);
        }

        ensure_finite(Self::STAGE, total)
    }

    fn platt(&self, decision: f64) -> f64 {
        1.0 / (1.0 + (self.prob_a * decision + self.prob_b).exp())
    }
}

impl BinaryClassifier for SupportVectorMachine {
    fn input_width(&self) -> usize {
        self.support_vectors.first().map(Vec::len).unwrap_or(0)
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, InferenceError> {
        let decision = self.decision(features)?;
        ensure_probability(Self::STAGE, self.platt(decision))
    }

    fn predict(&self, features: &[f64]) -> Result<Verdict, InferenceError> {
        let decision = self.decision(features)?;
        Ok(Verdict {
            label: u8::from(decision > 0.0),
            probability: ensure_probability(Self::STAGE, self.platt(decision))?,
        })
    }
}

/// Gradient-boosted trees with a logistic link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    n_features: usize,
    #[serde(default)]
    base_margin: f64,
    trees: Vec<DecisionTree>,
}

impl GradientBoostedTrees {
    const STAGE: &'static str = "gradient boosted trees";

    pub fn new(n_features: usize, base_margin: f64, trees: Vec<DecisionTree>) -> Self {
        Self {
            n_features,
            base_margin,
            trees,
        }
    }

    /// Highest feature index any tree splits on
    pub fn max_feature(&self) -> Option<usize> {
        max_split_feature(&self.trees)
    }
}

impl BinaryClassifier for GradientBoostedTrees {
    fn input_width(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, InferenceError> {
        check_width(Self::STAGE, self.n_features, features)?;

        let mut margin = self.base_margin;
        for tree in &self.trees {
            margin += tree.evaluate(Self::STAGE, features)?;
        }

        let margin = ensure_finite(Self::STAGE, margin)?;
        ensure_probability(Self::STAGE, sigmoid(margin))
    }
}

/// Random forest averaging per-tree positive-class fractions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    const STAGE: &'static str = "random forest";

    pub fn new(n_features: usize, trees: Vec<DecisionTree>) -> Self {
        Self { n_features, trees }
    }

    /// Highest feature index any tree splits on
    pub fn max_feature(&self) -> Option<usize> {
        max_split_feature(&self.trees)
    }
}

impl BinaryClassifier for RandomForest {
    fn input_width(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, InferenceError> {
        check_width(Self::STAGE, self.n_features, features)?;

        if self.trees.is_empty() {
            return Err(InferenceError::malformed(Self::STAGE, "forest has no trees"));
        }

        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.evaluate(Self::STAGE, features)?;
        }

        ensure_probability(Self::STAGE, total / self.trees.len() as f64)
    }
}

/// Any learner that can sit in a model slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Learner {
    Logistic(LogisticRegression),
    Svm(SupportVectorMachine),
    GradientBoosted(GradientBoostedTrees),
    RandomForest(RandomForest),
}

impl Learner {
    fn classifier(&self) -> &dyn BinaryClassifier {
        match self {
            Self::Logistic(m) => m,
            Self::Svm(m) => m,
            Self::GradientBoosted(m) => m,
            Self::RandomForest(m) => m,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Logistic(_) => "logistic",
            Self::Svm(_) => "svm",
            Self::GradientBoosted(_) => "gradient_boosted",
            Self::RandomForest(_) => "random_forest",
        }
    }

    /// Highest input index a tree ensemble reads; `None` for dense models
    pub fn max_feature(&self) -> Option<usize> {
        match self {
            Self::GradientBoosted(m) => m.max_feature(),
            Self::RandomForest(m) => m.max_feature(),
            Self::Logistic(_) | Self::Svm(_) => None,
        }
    }

    /// Declared width, plus a check that no split reads past it
    pub(crate) fn check_input(&self, role: &str, expected: usize, produced_by: &str) -> Result<(), String> {
        if self.input_width() != expected {
            return Err(format!(
                "{} expects {} features, {} {}",
                role,
                self.input_width(),
                produced_by,
                expected
            ));
        }

        match self.max_feature() {
            Some(feature) if feature >= expected => Err(format!(
                "{} {} splits on feature {} but has only {} inputs",
                role,
                self.kind(),
                feature,
                expected
            )),
            _ => Ok(()),
        }
    }
}

impl BinaryClassifier for Learner {
    fn input_width(&self) -> usize {
        self.classifier().input_width()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, InferenceError> {
        self.classifier().predict_proba(features)
    }

    fn predict(&self, features: &[f64]) -> Result<Verdict, InferenceError> {
        self.classifier().predict(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::tree::TreeNode;

    fn stump(feature: usize, low: f64, high: f64) -> DecisionTree {
        DecisionTree::new(vec![
            TreeNode::Split {
                feature,
                threshold: 0.0,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf(low),
            TreeNode::Leaf(high),
        ])
    }

    #[test]
    fn test_logistic_probability() {
        let model = LogisticRegression::new(vec![1.0, -1.0], 0.0);

        assert_eq!(model.predict_proba(&[2.0, 2.0]).unwrap(), 0.5);
        assert!(model.predict_proba(&[3.0, 0.0]).unwrap() > 0.9);
        assert_eq!(model.predict(&[0.0, 3.0]).unwrap().label, 0);
    }

    #[test]
    fn test_logistic_width_mismatch() {
        let model = LogisticRegression::new(vec![1.0; 9], 0.0);
        let err = model.predict_proba(&[1.0; 8]).unwrap_err();

        assert_eq!(err, InferenceError::width_mismatch("logistic regression", 9, 8));
    }

    #[test]
    fn test_logistic_fit_separates_classes() {
        let rows = vec![vec![-2.0], vec![-1.0], vec![1.0], vec![2.0]];
        let labels = [0, 0, 1, 1];
        let model = LogisticRegression::fit(&rows, &labels, 200, 0.5);

        assert!(model.predict_proba(&[2.0]).unwrap() > 0.5);
        assert!(model.predict_proba(&[-2.0]).unwrap() < 0.5);
    }

    #[test]
    fn test_svm_label_follows_decision_sign() {
        // Platt parameters chosen so the probability stays below 0.5 for a
        // small positive decision value.
        let svm = SupportVectorMachine::new(
            Kernel::Linear,
            vec![vec![1.0, 0.0]],
            vec![1.0],
            0.0,
            -1.0,
            1.0,
        );

        let verdict = svm.predict(&[0.5, 0.0]).unwrap();
        assert_eq!(verdict.label, 1);
        assert!(verdict.probability < 0.5);
    }

    #[test]
    fn test_svm_rbf_kernel() {
        let svm = SupportVectorMachine::new(
            Kernel::Rbf { gamma: 0.5 },
            vec![vec![0.0, 0.0], vec![2.0, 2.0]],
            vec![1.0, -1.0],
            0.0,
            -2.0,
            0.0,
        );

        let near_positive = svm.predict(&[0.0, 0.0]).unwrap();
        let near_negative = svm.predict(&[2.0, 2.0]).unwrap();

        assert_eq!(near_positive.label, 1);
        assert_eq!(near_negative.label, 0);
        assert!(near_positive.probability > near_negative.probability);
    }

    #[test]
    fn test_svm_inconsistent_arrays_are_malformed() {
        let svm = SupportVectorMachine::new(Kernel::Linear, vec![vec![1.0]], vec![], 0.0, -1.0, 0.0);
        assert!(matches!(
            svm.predict_proba(&[1.0]),
            Err(InferenceError::Malformed { .. })
        ));
    }

    #[test]
    fn test_gradient_boosted_sums_margins() {
        let model = GradientBoostedTrees::new(2, 0.0, vec![stump(0, -1.0, 1.0), stump(1, -1.0, 1.0)]);

        let high = model.predict_proba(&[1.0, 1.0]).unwrap();
        let mixed = model.predict_proba(&[1.0, -1.0]).unwrap();

        assert!((high - sigmoid(2.0)).abs() < 1e-12);
        assert_eq!(mixed, 0.5);
    }

    #[test]
    fn test_random_forest_averages_trees() {
        let forest = RandomForest::new(1, vec![stump(0, 0.0, 1.0), stump(0, 0.0, 0.5)]);

        assert_eq!(forest.predict_proba(&[1.0]).unwrap(), 0.75);
        assert_eq!(forest.predict(&[-1.0]).unwrap().label, 0);
    }

    #[test]
    fn test_random_forest_rejects_out_of_range_leaf() {
        let forest = RandomForest::new(1, vec![stump(0, 0.0, 3.0)]);
        assert!(forest.predict_proba(&[1.0]).is_err());
    }

    #[test]
    fn test_learner_deserialization() {
        let json = r#"{"type":"logistic","coefficients":[0.5,0.5],"intercept":-1.0}"#;
        let learner: Learner = serde_json::from_str(json).unwrap();

        assert_eq!(learner.kind(), "logistic");
        assert_eq!(learner.input_width(), 2);
        assert_eq!(learner.predict_proba(&[1.0, 1.0]).unwrap(), 0.5);
    }

    #[test]
    fn test_svm_deserialization() {
        let json = r#"{
            "type": "svm",
            "kernel": {"type": "rbf", "gamma": 0.1},
            "support_vectors": [[0.0, 1.0]],
            "dual_coef": [1.0],
            "intercept": 0.0,
            "prob_a": -1.0,
            "prob_b": 0.0
        }"#;
        let learner: Learner = serde_json::from_str(json).unwrap();

        assert_eq!(learner.kind(), "svm");
        assert_eq!(learner.input_width(), 2);
    }

    #[test]
    fn test_max_feature_across_trees() {
        let gbt = Learner::GradientBoosted(GradientBoostedTrees::new(
            8,
            0.0,
            vec![stump(2, -1.0, 1.0), stump(50, -1.0, 1.0)],
        ));
        let forest = Learner::RandomForest(RandomForest::new(1, vec![stump(0, 0.0, 1.0)]));
        let dense = Learner::Logistic(LogisticRegression::new(vec![1.0; 3], 0.0));

        assert_eq!(gbt.max_feature(), Some(50));
        assert_eq!(forest.max_feature(), Some(0));
        assert_eq!(dense.max_feature(), None);
    }

    #[test]
    fn test_check_input_rejects_out_of_range_split() {
        let gbt = Learner::GradientBoosted(GradientBoostedTrees::new(8, 0.0, vec![stump(50, -1.0, 1.0)]));

        let err = gbt.check_input("base learner", 8, "dataset expects").unwrap_err();
        assert_eq!(err, "base learner gradient_boosted splits on feature 50 but has only 8 inputs");
        assert!(gbt.check_input("base learner", 51, "dataset expects").is_err());
    }
}
