//! Model artifact loading - filesystem store, fallback slots and registry assembly

mod fallback;
mod file_store;
mod loader;

pub use fallback::FallbackSlotFactory;
pub use file_store::FileArtifactStore;
pub use loader::RegistryLoader;
