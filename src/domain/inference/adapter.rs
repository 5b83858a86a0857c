//! Feature adapter - reshape a sample to the width a dataset's models expect

use serde::Serialize;

/// What the adapter did to reach the target width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentPolicy {
    Exact,
    Truncated,
    Padded,
}

/// Record of one adaptation, returned to callers so lossy reshaping is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureAdjustment {
    pub input_width: usize,
    pub target_width: usize,
    pub policy: AdjustmentPolicy,
}

/// Features reshaped to a fixed width
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptedFeatures {
    pub values: Vec<f64>,
    pub adjustment: FeatureAdjustment,
}

/// Truncate trailing values or right-pad with zeros to exactly `target_width`.
///
/// Truncation silently drops data; callers surface the returned adjustment
/// instead of treating it as an error.
pub fn adapt(vector: &[f64], target_width: usize) -> AdaptedFeatures {
    let input_width = vector.len();

    let policy = match input_width.cmp(&target_width) {
        std::cmp::Ordering::Equal => AdjustmentPolicy::Exact,
        std::cmp::Ordering::Greater => AdjustmentPolicy::Truncated,
        std::cmp::Ordering::Less => AdjustmentPolicy::Padded,
    };

    let mut values: Vec<f64> = vector.iter().take(target_width).copied().collect();
    values.resize(target_width, 0.0);

    AdaptedFeatures {
        values,
        adjustment: FeatureAdjustment {
            input_width,
            target_width,
            policy,
        },
    }
}
