//! Host buff catalog - the live list of buff prefabs used for the one-time sync

use crate::types::BuffPrefab;
use thiserror::Error;

/// Failure to obtain a catalog snapshot from the host
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Buff catalog unavailable: {0}")]
    Unavailable(String),
}

/// Source of every statically-known buff prefab in the host
pub trait BuffCatalog {
    /// Enumerate all prefabs. Order is irrelevant.
    fn snapshot(&self) -> Result<Vec<BuffPrefab>, CatalogError>;
}

impl BuffCatalog for [BuffPrefab] {
    fn snapshot(&self) -> Result<Vec<BuffPrefab>, CatalogError> {
        Ok(self.to_vec())
    }
}

impl BuffCatalog for Vec<BuffPrefab> {
    fn snapshot(&self) -> Result<Vec<BuffPrefab>, CatalogError> {
        Ok(self.clone())
    }
}
