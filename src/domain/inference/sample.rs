//! Feature sample - named numeric features in caller order

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Column names shared by every row of one upload
pub type SharedColumns = Arc<Vec<Arc<str>>>;

/// Ordered feature-name to value mapping.
///
/// Insertion order defines vector order. Names are carried for display only
/// and are never matched against the names a model was trained on.
#[derive(Debug, Clone, Default)]
pub struct FeatureSample {
    names: SharedColumns,
    values: Vec<f64>,
    /// Lookup for `push`; empty until the first push on a shared-column sample
    positions: HashMap<Arc<str>, usize>,
}

impl FeatureSample {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample over a column list shared with other rows.
    ///
    /// `names` must be free of repeats and as long as `values`.
    pub fn from_shared(names: SharedColumns, values: Vec<f64>) -> Self {
        debug_assert_eq!(names.len(), values.len());

        Self {
            names,
            values,
            positions: HashMap::new(),
        }
    }

    pub fn with_feature(mut self, name: impl Into<Arc<str>>, value: f64) -> Self {
        self.push(name, value);
        self
    }

    /// Append a feature; a repeated name replaces the earlier value in place
    pub fn push(&mut self, name: impl Into<Arc<str>>, value: f64) {
        let name = name.into();

        if self.positions.len() != self.names.len() {
            self.positions = self
                .names
                .iter()
                .enumerate()
                .map(|(i, n)| (Arc::clone(n), i))
                .collect();
        }

        match self.positions.get(&name) {
            Some(&position) => self.values[position] = value,
            None => {
                self.positions.insert(Arc::clone(&name), self.values.len());
                Arc::make_mut(&mut self.names).push(name);
                self.values.push(value);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|n| &**n)
    }

    /// Values in insertion order
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl PartialEq for FeatureSample {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names && self.values == other.values
    }
}

impl<N: Into<Arc<str>>> FromIterator<(N, f64)> for FeatureSample {
    fn from_iter<I: IntoIterator<Item = (N, f64)>>(iter: I) -> Self {
        let mut sample = Self::new();
        for (name, value) in iter {
            sample.push(name, value);
        }
        sample
    }
}

impl Serialize for FeatureSample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.names().zip(&self.values) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct FeatureSampleVisitor;

impl<'de> Visitor<'de> for FeatureSampleVisitor {
    type Value = FeatureSample;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a map of feature names to numbers")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut sample = FeatureSample::new();
        while let Some((name, value)) = access.next_entry::<String, f64>()? {
            sample.push(name, value);
        }
        Ok(sample)
    }
}

impl<'de> Deserialize<'de> for FeatureSample {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FeatureSampleVisitor)
    }
}
