//! Inference Engine
//!
//! Transforms one uploaded image into a labeled prediction: decode, resize
//! and normalize into the model's input tensor, run the classifier, and
//! reduce the score vector to its arg-max label and confidence.

mod engine;
mod preprocess;

pub use engine::{top_prediction, InferencePipeline, Prediction};
pub use model_provisioner::INPUT_SIZE;
pub use preprocess::{decode_image, to_input_tensor};

use thiserror::Error;

/// Errors during a single inference request.
///
/// `Decode` is recoverable and reported to the requesting session only;
/// `CatalogMismatch` indicates a broken model/catalog pairing and should have
/// been caught at startup.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Uploaded bytes are not a decodable image: {0}")]
    Decode(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Catalog has {catalog_len} classes but the model returned {score_len} scores")]
    CatalogMismatch {
        catalog_len: usize,
        score_len: usize,
    },
}
