//! Lazy, memoized provisioning of the classifier model

use crate::{
    archive, ArtifactFetcher, ClassifierModel, HttpArtifactFetcher, ProvisionError,
    ProvisionerConfig, INPUT_SIZE,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Ensures a model artifact exists on local storage and loads it at most
/// once per process.
///
/// Owned by the application's top-level context; every caller observes the
/// same model handle. There is no eviction and no invalidation: once loaded,
/// the handle lives until process exit.
pub struct ModelProvisioner {
    config: ProvisionerConfig,
    fetcher: Box<dyn ArtifactFetcher>,
    model: OnceCell<Arc<ClassifierModel>>,
}

impl ModelProvisioner {
    /// Provisioner with the default HTTP fetcher
    pub fn new(config: ProvisionerConfig) -> Self {
        Self::with_fetcher(config, Box::new(HttpArtifactFetcher::new()))
    }

    /// Provisioner with a custom fetcher (tests, mirrors)
    pub fn with_fetcher(config: ProvisionerConfig, fetcher: Box<dyn ArtifactFetcher>) -> Self {
        Self {
            config,
            fetcher,
            model: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &ProvisionerConfig {
        &self.config
    }

    /// Whether the model directory is already on local storage.
    ///
    /// Presence is trusted as-is: no integrity or version check. A hash
    /// manifest would slot in here if one is ever shipped with the artifact.
    pub fn is_provisioned(&self) -> bool {
        self.config.model_dir.exists()
    }

    /// Download and unpack the model artifact unless it is already present.
    ///
    /// Fetch, extraction, or cleanup failure fails the whole operation; there
    /// is no retry and no partial-recovery path.
    pub async fn ensure_artifact(&self) -> Result<(), ProvisionError> {
        if self.is_provisioned() {
            debug!(
                "Model directory {} already present, skipping fetch",
                self.config.model_dir.display()
            );
            return Ok(());
        }

        let url = self.config.artifact_url();
        self.fetcher.fetch(&url, &self.config.archive_path).await?;

        let archive_path = self.config.archive_path.clone();
        let dest = self
            .config
            .model_dir
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        tokio::task::spawn_blocking(move || archive::unpack_archive(&archive_path, &dest))
            .await
            .map_err(|e| ProvisionError::Archive(e.to_string()))??;

        tokio::fs::remove_file(&self.config.archive_path).await?;

        info!(
            "Model artifact unpacked into {}",
            self.config.model_dir.display()
        );
        Ok(())
    }

    /// Provision and load the model, at most once per process.
    ///
    /// Concurrent callers share one initialization; the remote fetch happens
    /// at most once. A provisioning failure is fatal for the current process
    /// and is surfaced unchanged to the caller.
    pub async fn provision(&self) -> Result<Arc<ClassifierModel>, ProvisionError> {
        self.model
            .get_or_try_init(|| async {
                self.ensure_artifact().await?;
                let model = ClassifierModel::load(&self.config.model_path(), INPUT_SIZE)?;
                Ok(Arc::new(model))
            })
            .await
            .cloned()
    }
}
