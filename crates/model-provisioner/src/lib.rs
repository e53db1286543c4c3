//! Model Provisioner
//!
//! Guarantees a classifier model artifact is present on local storage,
//! downloading and unpacking it on first use, then loads it into memory
//! exactly once per process.

mod archive;
mod config;
mod fetcher;
mod model;
mod provisioner;

pub use config::ProvisionerConfig;
pub use fetcher::{ArtifactFetcher, HttpArtifactFetcher};
pub use model::{ClassifierModel, INPUT_SIZE};
pub use provisioner::ModelProvisioner;

use thiserror::Error;

/// Errors during model provisioning
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Artifact fetch failed: {0}")]
    Fetch(String),
    #[error("Archive extraction failed: {0}")]
    Archive(String),
    #[error("Model load failed: {0}")]
    ModelLoad(String),
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),
}
