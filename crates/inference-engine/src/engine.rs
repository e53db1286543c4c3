//! Classification pipeline

use crate::{preprocess, InferenceError};
use class_catalog::ClassCatalog;
use model_provisioner::ClassifierModel;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Result of classifying one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class label
    pub label: String,
    /// Index of the winning class in the output vector
    pub class_index: usize,
    /// Model certainty in [0, 1]
    pub confidence: f32,
}

impl Prediction {
    /// Confidence as a display percentage in [0, 100]
    pub fn confidence_percent(&self) -> f32 {
        self.confidence * 100.0
    }
}

/// One-image-at-a-time classification pipeline.
///
/// Runs synchronously to completion within one invocation: no internal
/// concurrency, no cancellation. The model handle is shared and read-only,
/// so independent sessions may classify concurrently.
pub struct InferencePipeline {
    model: Arc<ClassifierModel>,
    catalog: ClassCatalog,
}

impl InferencePipeline {
    pub fn new(model: Arc<ClassifierModel>, catalog: ClassCatalog) -> Self {
        Self { model, catalog }
    }

    pub fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    /// Classify raw uploaded bytes.
    ///
    /// Undecodable bytes fail this one call with a decode error and nothing
    /// else.
    pub fn classify(&self, bytes: &[u8]) -> Result<Prediction, InferenceError> {
        let image = preprocess::decode_image(bytes)?;
        self.classify_image(&image)
    }

    /// Classify an already-decoded image.
    pub fn classify_image(
        &self,
        image: &image::DynamicImage,
    ) -> Result<Prediction, InferenceError> {
        let input = preprocess::to_input_tensor(image);
        let scores = self
            .model
            .predict(input)
            .map_err(|e| InferenceError::Inference(e.to_string()))?;

        let prediction = top_prediction(&scores, &self.catalog)?;
        debug!(
            "Predicted {} at {:.2}%",
            prediction.label,
            prediction.confidence_percent()
        );
        Ok(prediction)
    }
}

/// Reduce a score vector to its arg-max label and confidence.
///
/// An empty vector or a length mismatch against the catalog is an explicit
/// error, never an out-of-bounds lookup. Ties resolve to the lowest index.
pub fn top_prediction(
    scores: &[f32],
    catalog: &ClassCatalog,
) -> Result<Prediction, InferenceError> {
    if scores.is_empty() || scores.len() != catalog.len() {
        return Err(InferenceError::CatalogMismatch {
            catalog_len: catalog.len(),
            score_len: scores.len(),
        });
    }

    let mut best = 0;
    for (i, score) in scores.iter().enumerate() {
        if *score > scores[best] {
            best = i;
        }
    }

    let label = catalog
        .name_for(best)
        .ok_or(InferenceError::CatalogMismatch {
            catalog_len: catalog.len(),
            score_len: scores.len(),
        })?
        .to_string();

    Ok(Prediction {
        label,
        class_index: best,
        confidence: scores[best],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn catalog(names: &[&str]) -> ClassCatalog {
        ClassCatalog::from_names(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_argmax_prediction() {
        let prediction =
            top_prediction(&[0.1, 0.7, 0.2], &catalog(&["cat", "dog", "zebra"])).unwrap();

        assert_eq!(prediction.label, "dog");
        assert_eq!(prediction.class_index, 1);
        assert!((prediction.confidence - 0.7).abs() < f32::EPSILON);
        assert!((prediction.confidence_percent() - 70.0).abs() < 1e-4);
    }

    #[test]
    fn test_tie_resolves_to_lowest_index() {
        let prediction =
            top_prediction(&[0.4, 0.4, 0.2], &catalog(&["cat", "dog", "zebra"])).unwrap();
        assert_eq!(prediction.label, "cat");
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let result = top_prediction(&[0.5, 0.5], &catalog(&["cat", "dog", "zebra"]));
        assert!(matches!(
            result,
            Err(InferenceError::CatalogMismatch {
                catalog_len: 3,
                score_len: 2,
            })
        ));
    }

    #[test]
    fn test_empty_scores_are_an_error() {
        let result = top_prediction(&[], &catalog(&[]));
        assert!(matches!(
            result,
            Err(InferenceError::CatalogMismatch { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_confidence_is_the_bounded_max(
            scores in proptest::collection::vec(0.0f32..=1.0, 1..64)
        ) {
            let names = (0..scores.len()).map(|i| format!("class_{i:03}")).collect();
            let catalog = ClassCatalog::from_names(names);

            let prediction = top_prediction(&scores, &catalog).unwrap();
            prop_assert!((0.0..=1.0).contains(&prediction.confidence));
            prop_assert!(scores.iter().all(|s| *s <= prediction.confidence));
            prop_assert_eq!(scores[prediction.class_index], prediction.confidence);
        }
    }
}
