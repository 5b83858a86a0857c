//! Infrastructure layer - Artifact loading, CSV input, logging and metrics

pub mod artifact;
pub mod logging;
pub mod observability;
pub mod services;
pub mod tabular;
