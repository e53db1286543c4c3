//! Provisioner configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Model provisioning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionerConfig {
    /// Opaque artifact identifier on the blob host
    pub artifact_id: String,

    /// Base URL the identifier is appended to
    pub artifact_base_url: String,

    /// Where the downloaded archive is staged before extraction
    pub archive_path: PathBuf,

    /// Directory the archive unpacks into; its presence means "provisioned"
    pub model_dir: PathBuf,

    /// Model graph filename inside `model_dir`
    pub model_file: String,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            artifact_id: String::new(),
            artifact_base_url: "https://drive.google.com/uc?id=".to_string(),
            archive_path: PathBuf::from("models/animal-classifier.zip"),
            model_dir: PathBuf::from("models/animal-classifier"),
            model_file: "model.onnx".to_string(),
        }
    }
}

impl ProvisionerConfig {
    /// Config for a specific remote artifact, defaults elsewhere
    pub fn for_artifact(artifact_id: impl Into<String>) -> Self {
        Self {
            artifact_id: artifact_id.into(),
            ..Default::default()
        }
    }

    /// Full download URL for the artifact
    pub fn artifact_url(&self) -> String {
        format!("{}{}", self.artifact_base_url, self.artifact_id)
    }

    /// Path to the model graph file
    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(&self.model_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_url() {
        let config = ProvisionerConfig::for_artifact("abc123");
        assert_eq!(config.artifact_url(), "https://drive.google.com/uc?id=abc123");
    }

    #[test]
    fn test_model_path() {
        let config = ProvisionerConfig::default();
        assert_eq!(
            config.model_path(),
            PathBuf::from("models/animal-classifier/model.onnx")
        );
    }
}
