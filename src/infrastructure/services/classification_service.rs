//! Classification service - registry-backed prediction, batches and analysis

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::registry::{DatasetSummary, MetricsRecord};
use crate::domain::{
    analyze, classify, run_batch, BatchEntry, BatchRow, CompatibilityReport, DatasetCatalog,
    DatasetPrediction, DomainError, FeatureSample, ModelRegistry, RegistryHealth,
};
use crate::infrastructure::observability::{record_batch, record_prediction};
use crate::infrastructure::tabular::Table;

/// Result of a batch run, rows in input order
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub dataset: String,
    pub total_rows: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<BatchEntry>,
}

impl BatchReport {
    fn new(dataset: &str, results: Vec<BatchEntry>) -> Self {
        let succeeded = results.iter().filter(|e| e.is_success()).count();

        Self {
            dataset: dataset.to_string(),
            total_rows: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}

/// Application service over the read-only model registry
#[derive(Debug, Clone)]
pub struct ClassificationService {
    registry: Arc<ModelRegistry>,
    catalog: DatasetCatalog,
    chunk_size: usize,
}

impl ClassificationService {
    pub fn new(registry: Arc<ModelRegistry>, catalog: DatasetCatalog, chunk_size: usize) -> Self {
        Self {
            registry,
            catalog,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn health(&self) -> RegistryHealth {
        self.registry.health()
    }

    pub fn metrics(&self, dataset: Option<&str>) -> Result<Vec<MetricsRecord>, DomainError> {
        self.registry.metrics(dataset)
    }

    pub fn datasets(&self) -> Vec<DatasetSummary> {
        self.registry.summaries()
    }

    /// Classify one sample against every slot of `dataset`
    pub fn predict(
        &self,
        dataset: &str,
        sample: &FeatureSample,
    ) -> Result<DatasetPrediction, DomainError> {
        let prediction = classify(&self.registry, dataset, sample)?;

        debug!(
            dataset = %dataset,
            consensus = prediction.consensus.prediction,
            confidence = prediction.consensus.confidence,
            abstained = prediction.abstained_count(),
            "Classified sample"
        );
        record_prediction(&prediction);

        Ok(prediction)
    }

    /// Classify many rows on the blocking pool, `chunk_size` rows per task.
    ///
    /// The batch dataset must exist; per-row overrides and row-level problems
    /// are reported inside the report instead.
    pub async fn predict_batch(
        &self,
        dataset: &str,
        rows: Vec<BatchRow>,
    ) -> Result<BatchReport, DomainError> {
        self.registry.dataset(dataset)?;

        let start = Instant::now();
        let rows = Arc::new(rows);

        let tasks = (0..rows.len()).step_by(self.chunk_size).map(|offset| {
            let registry = Arc::clone(&self.registry);
            let rows = Arc::clone(&rows);
            let dataset = dataset.to_string();
            let end = (offset + self.chunk_size).min(rows.len());

            tokio::task::spawn_blocking(move || {
                run_batch(&registry, &dataset, &rows[offset..end], offset + 1)
            })
        });

        let mut entries = Vec::with_capacity(rows.len());
        for chunk in join_all(tasks).await {
            let chunk = chunk.map_err(|e| DomainError::internal(format!("Batch worker failed: {}", e)))?;
            entries.extend(chunk);
        }
        entries.sort_by_key(|e| e.row);

        let report = BatchReport::new(dataset, entries);
        record_batch(dataset, &report.results, start.elapsed());

        info!(
            dataset = %dataset,
            rows = report.total_rows,
            succeeded = report.succeeded,
            failed = report.failed,
            duration_ms = start.elapsed().as_millis() as u64,
            "Batch prediction complete"
        );

        Ok(report)
    }

    /// Parse a CSV upload and classify every row
    pub async fn predict_csv(&self, dataset: &str, bytes: Bytes) -> Result<BatchReport, DomainError> {
        self.registry.dataset(dataset)?;

        let rows = parse_csv(bytes, Table::into_batch_rows).await?;
        self.predict_batch(dataset, rows).await
    }

    pub fn analyze(&self, columns: &[String], row_count: usize) -> CompatibilityReport {
        analyze(&self.catalog, columns, row_count)
    }

    /// Compatibility report for a CSV upload
    pub async fn analyze_csv(&self, bytes: Bytes) -> Result<CompatibilityReport, DomainError> {
        let catalog = self.catalog.clone();

        parse_csv(bytes, move |table| {
            analyze(&catalog, table.columns(), table.row_count())
        })
        .await
    }
}

/// Parse an upload and shape it on the blocking pool; uploads can be large
async fn parse_csv<T, F>(bytes: Bytes, shape: F) -> Result<T, DomainError>
where
    T: Send + 'static,
    F: FnOnce(Table) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || Table::parse(&bytes).map(shape))
        .await
        .map_err(|e| DomainError::internal(format!("CSV parser failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::test_support::loaded_registry;

    fn service(chunk_size: usize) -> ClassificationService {
        ClassificationService::new(
            Arc::new(loaded_registry()),
            DatasetCatalog::standard(),
            chunk_size,
        )
    }

    fn sample(value: f64) -> FeatureSample {
        FeatureSample::new().with_feature("x", value)
    }

    #[test]
    fn test_predict() {
        let prediction = service(8).predict("breast", &sample(3.0)).unwrap();

        assert_eq!(prediction.predictions.len(), 3);
        assert_eq!(prediction.consensus.prediction, 1);
    }

    #[test]
    fn test_predict_unsupported_dataset() {
        let err = service(8).predict("colon", &sample(3.0)).unwrap_err();
        assert_eq!(err, DomainError::unsupported_dataset("colon"));
    }

    #[tokio::test]
    async fn test_batch_keeps_order_across_chunks() {
        let rows: Vec<BatchRow> = (0..25)
            .map(|i| {
                let value = if i % 2 == 0 { 1.0 } else { -1.0 };
                BatchRow::sample(sample(value))
            })
            .collect();

        let report = service(4).predict_batch("lung", rows).await.unwrap();

        assert_eq!(report.total_rows, 25);
        assert_eq!(report.succeeded, 25);
        for (i, entry) in report.results.iter().enumerate() {
            assert_eq!(entry.row, i + 1);
            let expected = if i % 2 == 0 { 1 } else { 0 };
            assert_eq!(entry.consensus().unwrap().prediction, expected);
        }
    }

    #[tokio::test]
    async fn test_batch_isolates_failed_row() {
        let rows = vec![
            BatchRow::sample(sample(1.0)),
            BatchRow::for_dataset("colon", sample(1.0)),
            BatchRow::sample(sample(1.0)),
        ];

        let report = service(2).predict_batch("breast", rows).await.unwrap();

        assert_eq!(report.total_rows, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert!(report.results[0].is_success());
        assert_eq!(report.results[1].row, 2);
        assert!(!report.results[1].is_success());
        assert!(report.results[2].is_success());
    }

    #[tokio::test]
    async fn test_batch_with_unsupported_default_dataset_fails() {
        let result = service(8).predict_batch("colon", vec![BatchRow::sample(sample(1.0))]).await;
        assert!(matches!(result, Err(DomainError::UnsupportedDataset { .. })));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let report = service(8).predict_batch("breast", vec![]).await.unwrap();

        assert_eq!(report.total_rows, 0);
        assert!(report.results.is_empty());
    }

    #[tokio::test]
    async fn test_predict_csv() {
        let csv = b"mean_radius,mean_texture,diagnosis\n2.0,1.0,M\nbad,1.0,B\n-2.0,0.5,B\n";
        let report = service(8)
            .predict_csv("breast", Bytes::from_static(csv))
            .await
            .unwrap();

        assert_eq!(report.total_rows, 3);
        assert_eq!(report.results[0].consensus().unwrap().prediction, 1);
        assert!(!report.results[1].is_success());
        assert_eq!(report.results[2].consensus().unwrap().prediction, 0);
    }

    #[tokio::test]
    async fn test_analyze_csv() {
        let report = service(8)
            .analyze_csv(Bytes::from_static(b"a,b,classes\n1,2,0\n3,4,1\n"))
            .await
            .unwrap();

        assert_eq!(report.rows, 2);
        assert_eq!(report.feature_count, 2);
        assert_eq!(report.suggested_datasets, vec!["breast"]);
    }

    #[tokio::test]
    async fn test_wide_csv_rows_share_column_names() {
        let header: Vec<String> = (0..1200).map(|i| format!("gene_{}", i)).collect();
        let row = vec!["-1.0"; 1200].join(",");
        let csv = format!("{}\n{}\n{}\n", header.join(","), row, row);

        let report = service(1)
            .predict_csv("gastric", Bytes::from(csv))
            .await
            .unwrap();

        assert_eq!(report.total_rows, 2);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.results[1].consensus().unwrap().prediction, 0);
    }

    #[tokio::test]
    async fn test_invalid_csv_upload_is_validation_error() {
        let err = service(8)
            .analyze_csv(Bytes::from_static(b"a,b\n1,2,3\n"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn test_metrics_and_datasets() {
        let service = service(8);

        assert_eq!(service.metrics(None).unwrap().len(), 9);
        assert_eq!(service.datasets().len(), 3);
        assert_eq!(service.health().total_count, 9);
    }
}
