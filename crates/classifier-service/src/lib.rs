//! Classifier Service
//!
//! Top-level application context for the animal classifier: owns the lazily
//! provisioned model and the class catalog, validates their pairing at
//! startup, and exposes the classify operation to the hosting runtime.
//!
//! The hosting runtime (process startup, request dispatch, presentation) is
//! an external collaborator; this crate hands it exactly three values per
//! request: the predicted label, the confidence, and the ordered class list.

mod service;

pub use inference_engine::Prediction;
pub use service::{ClassifierService, ServiceConfig};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Service-level errors.
///
/// Provisioning and catalog errors are fatal at startup and should halt the
/// process; inference decode errors are per-request and leave the service
/// usable for other sessions.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Provision(#[from] model_provisioner::ProvisionError),

    #[error(transparent)]
    Catalog(#[from] class_catalog::CatalogError),

    #[error(transparent)]
    Inference(#[from] inference_engine::InferenceError),
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
