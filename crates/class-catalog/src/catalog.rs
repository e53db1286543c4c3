//! Catalog construction and validation

use crate::{CatalogError, ClassManifest};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Training dataset layout: one subdirectory per class
    pub dataset_dir: PathBuf,

    /// Manifest filename expected inside the model directory
    pub manifest_name: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from("dataset"),
            manifest_name: "classes.json".to_string(),
        }
    }
}

/// Ordered class labels, index-aligned with the model output vector.
///
/// The prediction output is a fixed-length score vector whose index `i`
/// corresponds to the `i`-th label here, so the ordering must match the order
/// the model was exported with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCatalog {
    names: Vec<String>,
}

impl ClassCatalog {
    /// Enumerate class names from a dataset directory.
    ///
    /// Lists subdirectories only and sorts them lexicographically, matching
    /// the order the training export used. Plain files in the directory are
    /// ignored.
    pub fn from_dataset_dir(dataset_dir: &Path) -> Result<Self, CatalogError> {
        if !dataset_dir.is_dir() {
            return Err(CatalogError::MissingCatalog(dataset_dir.to_path_buf()));
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(dataset_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();

        debug!(
            "Enumerated {} classes from {}",
            names.len(),
            dataset_dir.display()
        );
        Ok(Self { names })
    }

    /// Build the catalog from a manifest persisted alongside the model.
    ///
    /// Manifest order is trusted as the training export order.
    pub fn from_manifest(path: &Path) -> Result<Self, CatalogError> {
        let manifest = ClassManifest::read(path)?;
        info!(
            "Loaded class manifest from {} ({} classes)",
            path.display(),
            manifest.classes.len()
        );
        Ok(Self {
            names: manifest.classes,
        })
    }

    /// Catalog from an explicit ordered list
    pub fn from_names(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Class label for an output-vector index
    pub fn name_for(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// All labels in output-vector order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Fail fast when the catalog cannot index the model's output vector.
    pub fn validate_len(&self, model_len: usize) -> Result<(), CatalogError> {
        if self.names.is_empty() || self.names.len() != model_len {
            return Err(CatalogError::Mismatch {
                catalog_len: self.names.len(),
                model_len,
            });
        }
        Ok(())
    }
}
