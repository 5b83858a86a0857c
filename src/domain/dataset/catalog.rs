//! Catalog of supported datasets

use super::profile::{DatasetKind, DatasetProfile};

/// Known target/label column names, in detection priority order
pub const TARGET_COLUMN_CANDIDATES: [&str; 5] =
    ["classes", "Sample_Characteristics", "target", "label", "diagnosis"];

const BREAST_FEATURES: [&str; 8] = [
    "mean_radius",
    "mean_texture",
    "mean_perimeter",
    "mean_area",
    "mean_smoothness",
    "mean_compactness",
    "mean_concavity",
    "mean_concave_points",
];

/// Read-only set of dataset profiles, in declaration order
#[derive(Debug, Clone)]
pub struct DatasetCatalog {
    profiles: Vec<DatasetProfile>,
}

impl DatasetCatalog {
    pub fn new(profiles: Vec<DatasetProfile>) -> Self {
        Self { profiles }
    }

    /// The three datasets the service ships models for
    pub fn standard() -> Self {
        Self::new(vec![
            DatasetProfile::clinical("breast", "Breast Cancer", "diagnosis", &BREAST_FEATURES),
            DatasetProfile::gene_expression("gastric", "Gastric Cancer", "Sample_Characteristics"),
            DatasetProfile::gene_expression("lung", "Lung Cancer", "classes"),
        ])
    }

    /// Restrict the catalog to the given ids, keeping the requested order.
    /// Repeated ids are kept once. Unknown ids are returned separately so the
    /// caller can report them.
    pub fn select(&self, ids: &[String]) -> (Self, Vec<String>) {
        let mut selected: Vec<DatasetProfile> = Vec::new();
        let mut unknown = Vec::new();

        for id in ids {
            if selected.iter().any(|p| p.id() == id) {
                continue;
            }
            match self.get(id) {
                Some(profile) => selected.push(profile.clone()),
                None => unknown.push(id.clone()),
            }
        }

        (Self::new(selected), unknown)
    }

    pub fn get(&self, id: &str) -> Option<&DatasetProfile> {
        self.profiles.iter().find(|p| p.id() == id)
    }

    pub fn profiles(&self) -> &[DatasetProfile] {
        &self.profiles
    }

    /// Ids of every dataset of the given kind, in catalog order
    pub fn ids_of_kind(&self, kind: DatasetKind) -> Vec<String> {
        self.profiles
            .iter()
            .filter(|p| p.kind() == kind)
            .map(|p| p.id().to_string())
            .collect()
    }
}

impl Default for DatasetCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog() {
        let catalog = DatasetCatalog::standard();
        let ids: Vec<&str> = catalog.profiles().iter().map(|p| p.id()).collect();

        assert_eq!(ids, vec!["breast", "gastric", "lung"]);
        assert_eq!(catalog.get("breast").unwrap().features().unwrap().len(), 8);
        assert_eq!(catalog.get("gastric").unwrap().target_column(), "Sample_Characteristics");
    }

    #[test]
    fn test_ids_of_kind() {
        let catalog = DatasetCatalog::standard();

        assert_eq!(catalog.ids_of_kind(DatasetKind::Clinical), vec!["breast"]);
        assert_eq!(
            catalog.ids_of_kind(DatasetKind::GeneExpression),
            vec!["gastric", "lung"]
        );
    }

    #[test]
    fn test_select_reports_unknown_ids() {
        let catalog = DatasetCatalog::standard();
        let (selected, unknown) =
            catalog.select(&["lung".to_string(), "colon".to_string()]);

        assert_eq!(selected.profiles().len(), 1);
        assert_eq!(selected.profiles()[0].id(), "lung");
        assert_eq!(unknown, vec!["colon"]);
    }

    #[test]
    fn test_select_keeps_repeated_id_once() {
        let catalog = DatasetCatalog::standard();
        let ids: Vec<String> = ["breast", "lung", "breast"].iter().map(|s| s.to_string()).collect();
        let (selected, unknown) = catalog.select(&ids);

        let selected_ids: Vec<&str> = selected.profiles().iter().map(|p| p.id()).collect();
        assert_eq!(selected_ids, vec!["breast", "lung"]);
        assert!(unknown.is_empty());
    }
}
