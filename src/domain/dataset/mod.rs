//! Dataset domain - Static profiles of the supported biomedical datasets

mod catalog;
mod profile;

pub use catalog::{DatasetCatalog, TARGET_COLUMN_CANDIDATES};
pub use profile::{DatasetKind, DatasetProfile, FeatureWidth};
