//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::ClassificationService;

/// Application state shared by every handler.
///
/// The registry behind the service is immutable, so handlers read it
/// concurrently without locking.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<ClassificationService>,
}

impl AppState {
    pub fn new(classifier: Arc<ClassificationService>) -> Self {
        Self { classifier }
    }
}

/// State over the fully loaded test registry
#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    use crate::domain::registry::test_support::loaded_registry;
    use crate::domain::DatasetCatalog;

    AppState::new(Arc::new(ClassificationService::new(
        Arc::new(loaded_registry()),
        DatasetCatalog::standard(),
        16,
    )))
}
