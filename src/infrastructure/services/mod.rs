//! Application services

mod classification_service;

pub use classification_service::{BatchReport, ClassificationService};
