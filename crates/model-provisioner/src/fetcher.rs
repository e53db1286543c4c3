//! Remote artifact retrieval

use crate::ProvisionError;
use async_trait::async_trait;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Fetches a remote artifact to a local path.
///
/// The default implementation goes over HTTP; tests and mirrors can
/// substitute their own.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), ProvisionError>;
}

/// Reqwest-backed fetcher for blob-hosting services.
///
/// A single unauthenticated GET by opaque identifier, streamed to disk so a
/// multi-hundred-megabyte artifact is never buffered whole in memory. No
/// integrity hash is verified post-download.
///
/// Known limitation: Google Drive answers plain GETs on files above its
/// virus-scan size limit with an HTML confirm page instead of the blob. Such
/// artifacts need a host that serves the bytes directly, or a fetcher that
/// negotiates the confirm token.
pub struct HttpArtifactFetcher {
    client: reqwest::Client,
}

impl HttpArtifactFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpArtifactFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactFetcher for HttpArtifactFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), ProvisionError> {
        info!("Downloading model artifact from {}", url);

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProvisionError::Fetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| ProvisionError::Fetch(e.to_string()))?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written: u64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ProvisionError::Fetch(e.to_string()))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!("Streamed {} bytes to {}", written, dest.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::io::AsyncReadExt;

    /// One-shot HTTP server returning a fixed response
    async fn serve_once(status_line: &'static str, body: Vec<u8>) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;

            let header = format!(
                "{status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(header.as_bytes()).await.unwrap();
            socket.write_all(&body).await.unwrap();
        });

        addr
    }

    #[tokio::test]
    async fn test_fetch_streams_body_to_disk() {
        let body = vec![0xA5u8; 256 * 1024];
        let addr = serve_once("HTTP/1.1 200 OK", body.clone()).await;

        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("models/artifact.zip");

        let fetcher = HttpArtifactFetcher::new();
        fetcher
            .fetch(&format!("http://{addr}/artifact"), &dest)
            .await
            .unwrap();

        assert_eq!(tokio::fs::read(&dest).await.unwrap(), body);
    }

    #[tokio::test]
    async fn test_fetch_rejects_error_status() {
        let addr = serve_once("HTTP/1.1 404 Not Found", b"gone".to_vec()).await;

        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("artifact.zip");

        let fetcher = HttpArtifactFetcher::new();
        let result = fetcher.fetch(&format!("http://{addr}/artifact"), &dest).await;

        assert!(matches!(result, Err(ProvisionError::Fetch(_))));
        assert!(!dest.exists());
    }
}
