//! Class Catalog
//!
//! Ordered class labels aligned by index to the classifier's output vector,
//! sourced either from a manifest shipped with the model artifact or from the
//! training dataset's directory layout.

mod catalog;
mod manifest;

pub use catalog::{CatalogConfig, ClassCatalog};
pub use manifest::ClassManifest;

use std::path::PathBuf;
use thiserror::Error;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Reference dataset directory not found: {}", .0.display())]
    MissingCatalog(PathBuf),

    #[error("Catalog has {catalog_len} classes but the model outputs {model_len}")]
    Mismatch {
        catalog_len: usize,
        model_len: usize,
    },

    #[error("Class manifest error: {0}")]
    Manifest(String),

    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),
}
