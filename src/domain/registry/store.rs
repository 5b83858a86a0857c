//! Artifact store trait

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::model::ModelSlot;

/// Why an artifact could not be turned into a usable slot
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ArtifactError {
    #[error("Model file not found: {location}")]
    Missing { location: String },

    #[error("Error loading {location}: {message}")]
    Corrupt { location: String, message: String },

    #[error("Incompatible artifact {location}: {message}")]
    Incompatible { location: String, message: String },

    #[error("Error reading {location}: {message}")]
    Io { location: String, message: String },
}

impl ArtifactError {
    pub fn missing(location: impl Into<String>) -> Self {
        Self::Missing {
            location: location.into(),
        }
    }

    pub fn corrupt(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn incompatible(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Incompatible {
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn io(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// Source of serialized model slots, addressed by dataset and slot name
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Human-readable location of an artifact, used in logs and health
    fn locate(&self, dataset: &str, slot: &str) -> String;

    /// Load and deserialize one slot
    async fn load(&self, dataset: &str, slot: &str) -> Result<ModelSlot, ArtifactError>;
}
