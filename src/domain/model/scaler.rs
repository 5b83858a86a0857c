//! Mean/variance feature scaler

use serde::{Deserialize, Serialize};

use super::error::{ensure_finite, InferenceError};

const STAGE: &str = "scaler";

/// Standardizes each feature to zero mean and unit variance using
/// statistics learned at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScalerParams")]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

#[derive(Deserialize)]
struct ScalerParams {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl TryFrom<ScalerParams> for StandardScaler {
    type Error = InferenceError;

    fn try_from(params: ScalerParams) -> Result<Self, Self::Error> {
        Self::new(params.mean, params.scale)
    }
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, InferenceError> {
        if mean.len() != scale.len() {
            return Err(InferenceError::malformed(
                STAGE,
                format!("{} means but {} scales", mean.len(), scale.len()),
            ));
        }

        Ok(Self { mean, scale })
    }

    /// Learn per-column mean and population standard deviation
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let count = rows.len().max(1) as f64;

        let mut mean = vec![0.0; width];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x / count;
            }
        }

        let mut scale = vec![0.0; width];
        for row in rows {
            for ((s, x), m) in scale.iter_mut().zip(row).zip(&mean) {
                *s += (x - m).powi(2) / count;
            }
        }
        for s in scale.iter_mut() {
            *s = s.sqrt();
        }

        Self { mean, scale }
    }

    /// Number of features this scaler was fitted on
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if features.len() != self.width() {
            return Err(InferenceError::width_mismatch(
                STAGE,
                self.width(),
                features.len(),
            ));
        }

        features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                // Constant columns are centred but not divided.
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                ensure_finite(STAGE, (x - mean) / scale)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        let scaler = StandardScaler::new(vec![1.0, 10.0], vec![2.0, 5.0]).unwrap();
        assert_eq!(scaler.transform(&[3.0, 0.0]).unwrap(), vec![1.0, -2.0]);
    }

    #[test]
    fn test_constant_column_is_not_divided() {
        let scaler = StandardScaler::new(vec![4.0], vec![0.0]).unwrap();
        assert_eq!(scaler.transform(&[6.0]).unwrap(), vec![2.0]);
    }

    #[test]
    fn test_width_mismatch() {
        let scaler = StandardScaler::new(vec![0.0; 8], vec![1.0; 8]).unwrap();
        let err = scaler.transform(&[1.0; 3]).unwrap_err();

        assert_eq!(err, InferenceError::width_mismatch("scaler", 8, 3));
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let scaler = StandardScaler::new(vec![0.0], vec![1.0]).unwrap();
        assert!(scaler.transform(&[f64::NAN]).is_err());
    }

    #[test]
    fn test_fit() {
        let scaler = StandardScaler::fit(&[vec![1.0, 5.0], vec![3.0, 5.0]]);

        assert_eq!(scaler.width(), 2);
        assert_eq!(scaler.transform(&[3.0, 5.0]).unwrap(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_mismatched_parameters_rejected() {
        assert!(StandardScaler::new(vec![0.0, 1.0], vec![1.0]).is_err());

        let parsed = serde_json::from_str::<StandardScaler>(r#"{"mean":[0.0,1.0],"scale":[1.0]}"#);
        assert!(parsed.is_err());
    }
}
