//! CSV parsing into column metadata and batch rows

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::inference::SharedColumns;
use crate::domain::{detect_target_column, BatchRow, DomainError, FeatureSample};

/// A parsed CSV table: header plus raw records
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    records: Vec<csv::StringRecord>,
}

impl Table {
    /// Parse CSV bytes with a header row
    pub fn parse(bytes: &[u8]) -> Result<Self, DomainError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| DomainError::validation(format!("Invalid CSV header: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::validation(format!("Invalid CSV: {}", e)))?;

        Ok(Self { columns, records })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Convert every record into a batch row, consuming the table.
    ///
    /// The detected target column is excluded from the features; a record
    /// with a non-numeric feature cell becomes a rejected row. Every row
    /// shares one copy of the column names. A repeated header keeps its first
    /// position and takes the value of its last occurrence.
    pub fn into_batch_rows(self) -> Vec<BatchRow> {
        let layout = FeatureLayout::new(&self.columns);

        self.records
            .into_iter()
            .map(|record| layout.row(&record))
            .collect()
    }
}

/// Which record cells feed which feature, resolved once per table
struct FeatureLayout {
    names: SharedColumns,
    sources: Vec<usize>,
}

impl FeatureLayout {
    fn new(columns: &[String]) -> Self {
        let target = detect_target_column(columns);
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut names: Vec<Arc<str>> = Vec::new();
        let mut sources = Vec::new();

        for (index, column) in columns.iter().enumerate() {
            if Some(column.as_str()) == target {
                continue;
            }
            match seen.get(column.as_str()) {
                Some(&existing) => sources[existing] = index,
                None => {
                    seen.insert(column.as_str(), names.len());
                    names.push(Arc::from(column.as_str()));
                    sources.push(index);
                }
            }
        }

        Self {
            names: Arc::new(names),
            sources,
        }
    }

    fn row(&self, record: &csv::StringRecord) -> BatchRow {
        let mut values = Vec::with_capacity(self.sources.len());

        for (name, &source) in self.names.iter().zip(&self.sources) {
            let cell = record.get(source).unwrap_or_default();
            match cell.parse::<f64>() {
                Ok(value) => values.push(value),
                Err(_) => {
                    return BatchRow::rejected(format!(
                        "column '{}' is not numeric: '{}'",
                        name, cell
                    ));
                }
            }
        }

        BatchRow::sample(FeatureSample::from_shared(Arc::clone(&self.names), values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_columns_and_rows() {
        let table = Table::parse(b"a,b,diagnosis\n1.0,2.0,M\n3.5,4,B\n").unwrap();

        assert_eq!(table.columns(), &["a", "b", "diagnosis"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_target_column_is_excluded_from_features() {
        let table = Table::parse(b"a,b,diagnosis\n1.0,2.0,M\n").unwrap();
        let rows = table.into_batch_rows();

        match &rows[0] {
            BatchRow::Sample { dataset, features } => {
                assert!(dataset.is_none());
                assert_eq!(features.values().to_vec(), vec![1.0, 2.0]);
                assert_eq!(features.names().collect::<Vec<_>>(), vec!["a", "b"]);
            }
            BatchRow::Rejected { reason } => panic!("unexpected rejection: {}", reason),
        }
    }

    #[test]
    fn test_non_numeric_cell_rejects_row_only() {
        let table = Table::parse(b"x,y\n1,2\nabc,3\n4, 5\n").unwrap();
        let rows = table.into_batch_rows();

        assert_eq!(rows.len(), 3);
        assert!(matches!(rows[0], BatchRow::Sample { .. }));
        assert_eq!(rows[1], BatchRow::rejected("column 'x' is not numeric: 'abc'"));
        assert!(matches!(rows[2], BatchRow::Sample { .. }));
    }

    #[test]
    fn test_repeated_header_keeps_last_value() {
        let rows = Table::parse(b"g1,g2,g1\n1,2,3\n").unwrap().into_batch_rows();

        match &rows[0] {
            BatchRow::Sample { features, .. } => {
                assert_eq!(features.names().collect::<Vec<_>>(), vec!["g1", "g2"]);
                assert_eq!(features.values().to_vec(), vec![3.0, 2.0]);
            }
            BatchRow::Rejected { reason } => panic!("unexpected rejection: {}", reason),
        }
    }

    #[test]
    fn test_ragged_csv_is_invalid() {
        let result = Table::parse(b"a,b\n1,2,3\n");
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }
}
