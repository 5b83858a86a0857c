//! Model domain - Fitted scalers, learners and the slots that stack them

mod error;
mod learner;
mod scaler;
mod slot;
mod tree;

pub use error::InferenceError;
pub use learner::{
    BinaryClassifier, GradientBoostedTrees, Kernel, Learner, LogisticRegression, RandomForest,
    SupportVectorMachine, Verdict,
};
pub use scaler::StandardScaler;
pub use slot::{ModelMetrics, ModelSlot};
pub use tree::{DecisionTree, TreeNode};
