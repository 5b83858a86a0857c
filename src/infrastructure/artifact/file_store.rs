//! Filesystem artifact store reading JSON model slots

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::registry::{ArtifactError, ArtifactStore};
use crate::domain::ModelSlot;

/// Reads `{dir}/{dataset}_cancer_{slot}.{extension}`
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    dir: PathBuf,
    extension: String,
}

impl FileArtifactStore {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn path_for(&self, dataset: &str, slot: &str) -> PathBuf {
        self.dir
            .join(format!("{}_cancer_{}.{}", dataset, slot, self.extension))
    }
}

#[async_trait]
impl ArtifactStore for FileArtifactStore {
    fn locate(&self, dataset: &str, slot: &str) -> String {
        self.path_for(dataset, slot).display().to_string()
    }

    async fn load(&self, dataset: &str, slot: &str) -> Result<ModelSlot, ArtifactError> {
        let path = self.path_for(dataset, slot);
        let location = path.display().to_string();

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ArtifactError::missing(location));
            }
            Err(e) => return Err(ArtifactError::io(location, e.to_string())),
        };

        debug!(path = %location, size = bytes.len(), "Read model artifact");

        serde_json::from_slice(&bytes).map_err(|e| ArtifactError::corrupt(location, e.to_string()))
    }
}
