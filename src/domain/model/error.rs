use thiserror::Error;

/// Failure inside a single model evaluation
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InferenceError {
    #[error("{stage} expects {expected} features, got {actual}")]
    WidthMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{stage} produced a non-finite value")]
    NonFinite { stage: &'static str },

    #[error("{stage} is malformed: {message}")]
    Malformed {
        stage: &'static str,
        message: String,
    },
}

impl InferenceError {
    pub fn width_mismatch(stage: &'static str, expected: usize, actual: usize) -> Self {
        Self::WidthMismatch {
            stage,
            expected,
            actual,
        }
    }

    pub fn non_finite(stage: &'static str) -> Self {
        Self::NonFinite { stage }
    }

    pub fn malformed(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            stage,
            message: message.into(),
        }
    }
}

/// Reject NaN and infinities coming out of a model stage
pub(crate) fn ensure_finite(stage: &'static str, value: f64) -> Result<f64, InferenceError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InferenceError::non_finite(stage))
    }
}
