//! Dataset profile and related types

use serde::Serialize;

/// Structural family of a dataset's feature space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Low-dimensional clinical measurements
    Clinical,
    /// High-dimensional gene-expression panel
    GeneExpression,
}

impl DatasetKind {
    /// Width every model of this kind was trained on
    pub const fn target_width(self) -> usize {
        match self {
            Self::Clinical => 8,
            Self::GeneExpression => 1000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clinical => "clinical",
            Self::GeneExpression => "gene_expression",
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declared input width of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureWidth {
    Fixed(usize),
    Dynamic,
}

impl Serialize for FeatureWidth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Fixed(width) => serializer.serialize_u64(*width as u64),
            Self::Dynamic => serializer.serialize_str("dynamic"),
        }
    }
}

/// Static description of one supported dataset
#[derive(Debug, Clone, Serialize)]
pub struct DatasetProfile {
    id: String,
    name: String,
    kind: DatasetKind,
    feature_width: FeatureWidth,
    target_column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<Vec<String>>,
}

impl DatasetProfile {
    /// Profile for a clinical dataset with named features
    pub fn clinical(
        id: impl Into<String>,
        name: impl Into<String>,
        target_column: impl Into<String>,
        features: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: DatasetKind::Clinical,
            feature_width: FeatureWidth::Fixed(features.len()),
            target_column: target_column.into(),
            features: Some(features.iter().map(|f| f.to_string()).collect()),
        }
    }

    /// Profile for a gene-expression dataset whose genes are not fixed
    pub fn gene_expression(
        id: impl Into<String>,
        name: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: DatasetKind::GeneExpression,
            feature_width: FeatureWidth::Dynamic,
            target_column: target_column.into(),
            features: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn feature_width(&self) -> FeatureWidth {
        self.feature_width
    }

    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    pub fn features(&self) -> Option<&[String]> {
        self.features.as_deref()
    }

    /// Width incoming samples are adapted to before inference.
    ///
    /// Resolved from the dataset kind, not from the loaded models.
    pub fn target_width(&self) -> usize {
        self.kind.target_width()
    }
}
