//! Dataset compatibility analysis over tabular metadata

use serde::Serialize;

use crate::domain::dataset::{DatasetCatalog, DatasetKind, TARGET_COLUMN_CANDIDATES};

/// Feature counts at or below this match the clinical family
pub const CLINICAL_MAX_FEATURES: usize = 10;

/// Feature counts above this match the gene-expression family
pub const GENE_EXPRESSION_MIN_FEATURES: usize = 100;

/// Structural comparison of an uploaded table with the known datasets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityReport {
    pub rows: usize,
    pub columns: Vec<String>,
    pub column_count: usize,
    pub has_target: bool,
    pub target_column: Option<String>,
    pub feature_count: usize,
    pub suggested_datasets: Vec<String>,
}

/// First known target column present in `columns`, by priority
pub fn detect_target_column(columns: &[String]) -> Option<&'static str> {
    TARGET_COLUMN_CANDIDATES
        .iter()
        .copied()
        .find(|candidate| columns.iter().any(|c| c == candidate))
}

/// Suggest dataset families whose feature space a table could fit.
///
/// Counts in (10, 100] match neither family and yield no suggestion.
pub fn analyze(catalog: &DatasetCatalog, columns: &[String], row_count: usize) -> CompatibilityReport {
    let target_column = detect_target_column(columns);
    let has_target = target_column.is_some();
    let feature_count = columns.len().saturating_sub(usize::from(has_target));

    let mut suggested_datasets = Vec::new();
    if feature_count <= CLINICAL_MAX_FEATURES {
        suggested_datasets.extend(catalog.ids_of_kind(DatasetKind::Clinical));
    }
    if feature_count > GENE_EXPRESSION_MIN_FEATURES {
        suggested_datasets.extend(catalog.ids_of_kind(DatasetKind::GeneExpression));
    }

    CompatibilityReport {
        rows: row_count,
        columns: columns.to_vec(),
        column_count: columns.len(),
        has_target,
        target_column: target_column.map(str::to_string),
        feature_count,
        suggested_datasets,
    }
}
