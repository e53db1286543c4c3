//! Application context and request entry point

use crate::ServiceError;
use class_catalog::{CatalogConfig, ClassCatalog};
use inference_engine::{InferencePipeline, Prediction};
use model_provisioner::{ArtifactFetcher, ModelProvisioner, ProvisionerConfig};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub provisioner: ProvisionerConfig,
    pub catalog: CatalogConfig,
}

/// Top-level classifier context.
///
/// Owns the provisioner and the initialized pipeline as an explicit resource
/// rather than a process global. Initialization runs at most once; every
/// session shares the same model handle and catalog.
pub struct ClassifierService {
    catalog_config: CatalogConfig,
    provisioner: ModelProvisioner,
    pipeline: OnceCell<InferencePipeline>,
}

impl ClassifierService {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            provisioner: ModelProvisioner::new(config.provisioner),
            catalog_config: config.catalog,
            pipeline: OnceCell::new(),
        }
    }

    /// Service with a custom artifact fetcher (tests, mirrors)
    pub fn with_fetcher(config: ServiceConfig, fetcher: Box<dyn ArtifactFetcher>) -> Self {
        Self {
            provisioner: ModelProvisioner::with_fetcher(config.provisioner, fetcher),
            catalog_config: config.catalog,
            pipeline: OnceCell::new(),
        }
    }

    /// Provision the model, resolve the catalog, and validate their pairing.
    ///
    /// Any failure here is fatal for the process: surface it to the operator
    /// and halt rather than serving from a half-initialized context.
    pub async fn init(&self) -> Result<(), ServiceError> {
        self.pipeline().await.map(|_| ())
    }

    /// Classify one uploaded image.
    ///
    /// A bad upload fails only this call; the service stays usable for other
    /// sessions.
    pub async fn classify(&self, bytes: &[u8]) -> Result<Prediction, ServiceError> {
        let pipeline = self.pipeline().await?;
        Ok(pipeline.classify(bytes)?)
    }

    /// Ordered class labels for display
    pub async fn class_names(&self) -> Result<Vec<String>, ServiceError> {
        let pipeline = self.pipeline().await?;
        Ok(pipeline.catalog().names().to_vec())
    }

    async fn pipeline(&self) -> Result<&InferencePipeline, ServiceError> {
        self.pipeline
            .get_or_try_init(|| async {
                let model = self.provisioner.provision().await?;
                let catalog = self.resolve_catalog()?;
                catalog.validate_len(model.output_len())?;
                info!("Classifier ready with {} classes", catalog.len());
                Ok(InferencePipeline::new(model, catalog))
            })
            .await
    }

    /// Prefer the manifest shipped inside the model directory; fall back to
    /// enumerating the dataset directory when no manifest is present.
    fn resolve_catalog(&self) -> Result<ClassCatalog, ServiceError> {
        let manifest_path = self
            .provisioner
            .config()
            .model_dir
            .join(&self.catalog_config.manifest_name);

        if manifest_path.is_file() {
            return Ok(ClassCatalog::from_manifest(&manifest_path)?);
        }

        warn!(
            "No class manifest at {}, enumerating {}",
            manifest_path.display(),
            self.catalog_config.dataset_dir.display()
        );
        Ok(ClassCatalog::from_dataset_dir(
            &self.catalog_config.dataset_dir,
        )?)
    }
}
