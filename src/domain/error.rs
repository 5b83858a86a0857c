use thiserror::Error;

/// Core domain errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("Dataset {dataset} not supported")]
    UnsupportedDataset { dataset: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn unsupported_dataset(dataset: impl Into<String>) -> Self {
        Self::UnsupportedDataset {
            dataset: dataset.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
