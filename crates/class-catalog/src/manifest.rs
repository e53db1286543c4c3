//! Class manifest shipped with the model artifact
//!
//! The explicit class-name-to-index pairing, persisted as JSON next to the
//! model so the catalog no longer has to be re-derived from a directory
//! listing at runtime.

use crate::{CatalogError, ClassCatalog};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Class labels in model output order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassManifest {
    pub classes: Vec<String>,
}

impl ClassManifest {
    pub fn read(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| CatalogError::Manifest(e.to_string()))
    }

    /// Persist the manifest next to the model artifact.
    pub fn write(&self, path: &Path) -> Result<(), CatalogError> {
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| CatalogError::Manifest(e.to_string()))?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Capture the current dataset layout as a manifest, for operators
    /// exporting a new model artifact.
    pub fn from_dataset_dir(dataset_dir: &Path) -> Result<Self, CatalogError> {
        let catalog = ClassCatalog::from_dataset_dir(dataset_dir)?;
        Ok(Self {
            classes: catalog.names().to_vec(),
        })
    }
}
