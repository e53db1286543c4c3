//! Loaded classifier model handle

use crate::ProvisionError;
use std::path::Path;
use tract_onnx::prelude::*;
use tracing::info;

/// Input image edge length the classifier was exported with
pub const INPUT_SIZE: usize = 224;

/// In-memory handle to the loaded classifier.
///
/// Wraps a tract execution plan. `predict` takes `&self` and tract allocates
/// per-run state internally, so one handle may serve concurrent sessions
/// without extra locking. Constructed once per process by the provisioner
/// and shared behind an `Arc` for the process lifetime.
pub struct ClassifierModel {
    plan: TypedRunnableModel<TypedModel>,
    output_len: usize,
}

impl ClassifierModel {
    /// Load an ONNX graph expecting an NHWC `[1, S, S, 3]` float input.
    pub fn load(model_path: &Path, input_size: usize) -> Result<Self, ProvisionError> {
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .map_err(|e| ProvisionError::ModelLoad(e.to_string()))?
            .with_input_fact(0, f32::fact([1, input_size, input_size, 3]).into())
            .map_err(|e| ProvisionError::ModelLoad(e.to_string()))?
            .into_optimized()
            .map_err(|e| ProvisionError::ModelLoad(e.to_string()))?;

        let output_len = model
            .output_fact(0)
            .map_err(|e| ProvisionError::ModelLoad(e.to_string()))?
            .shape
            .as_concrete()
            .map(|dims| dims.iter().product::<usize>())
            .ok_or_else(|| {
                ProvisionError::ModelLoad("model output shape is not concrete".to_string())
            })?;

        let plan = model
            .into_runnable()
            .map_err(|e| ProvisionError::ModelLoad(e.to_string()))?;

        info!(
            "Loaded classifier model from {} ({} output classes)",
            model_path.display(),
            output_len
        );

        Ok(Self { plan, output_len })
    }

    /// Run the classifier on one preprocessed batch.
    ///
    /// Returns the raw score vector, index-aligned with the class catalog.
    pub fn predict(&self, input: tract_ndarray::Array4<f32>) -> TractResult<Vec<f32>> {
        let tensor = Tensor::from(input);
        let outputs = self.plan.run(tvec!(tensor.into()))?;
        let scores = outputs[0].to_array_view::<f32>()?;
        Ok(scores.iter().copied().collect())
    }

    /// Length of the model's output vector (number of classes)
    pub fn output_len(&self) -> usize {
        self.output_len
    }
}
